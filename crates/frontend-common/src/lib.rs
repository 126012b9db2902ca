//! Browser side of the onboarding portal client

pub mod config;
pub mod context;
pub mod guard;
pub mod logging;
pub mod routes;
pub mod storage;

pub use config::FrontendConfig;
pub use context::{
    PortalAction, PortalContext, PortalProvider, PortalState, create_portal_service,
    use_current_user, use_portal,
};
pub use guard::{GuestOnly, RequireAdmin, resolve_admin_route, resolve_guest_route};
pub use logging::init_logging;
pub use routes::AppRoute;
pub use storage::{LocalStorageBackend, browser_session};
