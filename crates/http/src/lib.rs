//! Portal HTTP client
//!
//! [`PortalClient`] speaks to the backend and surfaces every failure as a
//! [`ClientError`]. [`PortalService`] wraps it and reduces each call to an
//! [`Outcome`], the form UI and CLI code consume.

pub mod client;
pub mod service;
pub mod types;

pub use client::{ClientError, ErrorResponse, PortalClient, PortalClientBuilder};
pub use service::{Envelope, Outcome, PortalService};
