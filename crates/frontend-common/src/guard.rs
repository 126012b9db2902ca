//! Route guard components

use crate::context::use_portal;
use crate::routes::AppRoute;
use portal_core::{GuardDecision, SessionStore, admin_guard, guest_guard};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    pub children: Children,
}

fn render(decision: GuardDecision, children: &Children) -> Html {
    match decision {
        GuardDecision::Allow => html! { <>{ children.clone() }</> },
        GuardDecision::Redirect(to) => html! { <Redirect<AppRoute> to={AppRoute::from(to)} /> },
    }
}

/// Renders its children for admins only
#[function_component(RequireAdmin)]
pub fn require_admin(props: &GuardProps) -> Html {
    let portal = use_portal();
    render(admin_guard(portal.session()), &props.children)
}

/// Renders its children only while nobody is signed in
#[function_component(GuestOnly)]
pub fn guest_only(props: &GuardProps) -> Html {
    let portal = use_portal();
    render(guest_guard(portal.session()), &props.children)
}

/// Where an admin-only navigation to `route` should end up
pub fn resolve_admin_route(session: &SessionStore, route: AppRoute) -> AppRoute {
    admin_guard(session)
        .redirect_target()
        .map_or(route, AppRoute::from)
}

/// Where a guest-only navigation to `route` should end up
pub fn resolve_guest_route(session: &SessionStore, route: AppRoute) -> AppRoute {
    guest_guard(session)
        .redirect_target()
        .map_or(route, AppRoute::from)
}
