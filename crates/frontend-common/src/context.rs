//! Portal context and provider
//!
//! Components share one [`PortalService`] through a reducer handle. Session
//! state itself lives in storage; the reducer only bumps a revision so that
//! guards and views re-render after login or logout.

use crate::config::FrontendConfig;
use crate::storage::browser_session;
use portal_core::{SessionStore, UserProfile};
use portal_http::{ClientError, PortalClient, PortalService};
use std::rc::Rc;
use tracing::info;
use yew::prelude::*;

/// Build the service the app runs against: compile-time config plus a
/// `localStorage` session
pub fn create_portal_service() -> Result<PortalService, ClientError> {
    let client = PortalClient::from_config(&FrontendConfig::client_config(), browser_session())?;
    Ok(PortalService::new(client))
}

#[derive(Clone, PartialEq)]
pub struct PortalState {
    service: PortalService,
    revision: u64,
}

impl PortalState {
    pub const fn new(service: PortalService) -> Self {
        Self {
            service,
            revision: 0,
        }
    }

    pub const fn service(&self) -> &PortalService {
        &self.service
    }

    pub fn session(&self) -> &SessionStore {
        self.service.session()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.service.stored_user()
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

pub enum PortalAction {
    /// Storage was written elsewhere (login, register); re-render consumers
    SessionChanged,
    Logout,
}

impl Reducible for PortalState {
    type Action = PortalAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        if matches!(action, PortalAction::Logout) {
            self.service.logout();
            info!("Signed out");
        }
        Rc::new(Self {
            service: self.service.clone(),
            revision: self.revision.wrapping_add(1),
        })
    }
}

pub type PortalContext = UseReducerHandle<PortalState>;

#[derive(Properties, PartialEq)]
pub struct PortalProviderProps {
    pub service: PortalService,
    pub children: Children,
}

#[function_component(PortalProvider)]
pub fn portal_provider(props: &PortalProviderProps) -> Html {
    let service = props.service.clone();
    let state = use_reducer(move || PortalState::new(service));

    html! {
        <ContextProvider<PortalContext> context={state}>
            {props.children.clone()}
        </ContextProvider<PortalContext>>
    }
}

/// Hook to use the portal context
#[hook]
pub fn use_portal() -> PortalContext {
    use_context::<PortalContext>()
        .expect("PortalContext not found. Make sure to wrap your component with PortalProvider")
}

/// Hook for the signed-in user, if any
#[hook]
pub fn use_current_user() -> Option<UserProfile> {
    use_portal().user()
}
