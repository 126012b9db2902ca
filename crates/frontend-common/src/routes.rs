//! Application routes

use portal_core::Destination;
use yew_router::Routable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Routable)]
pub enum AppRoute {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/dashboard")]
    Dashboard,
    #[at("/admin/review")]
    AdminReview,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<Destination> for AppRoute {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Login => Self::Login,
            Destination::Dashboard => Self::Dashboard,
            Destination::AdminLanding => Self::AdminReview,
        }
    }
}
