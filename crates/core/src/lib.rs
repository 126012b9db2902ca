//! Portal core types and session state

pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod tests;

pub use config::ClientConfig;
pub use error::{CoreError, CoreResult};
pub use guard::{Destination, GuardDecision, admin_guard, guest_guard};
pub use session::{SessionError, SessionStore};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, SessionStorage};
pub use types::{Session, UserProfile};
