use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use shared_types::{AccessController, Decision, NavMode, SessionStore};
use shared_ui::PageSkeleton;

use crate::auth::use_session;
use crate::routes::Route;

/// Adapter from the Dioxus router to the controller's navigator.
struct RouterNavigator {
    path: String,
    router: Navigator,
}

impl shared_types::Navigator for RouterNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn redirect_to(&mut self, path: &str, mode: NavMode) {
        let route = match path.parse::<Route>() {
            Ok(route) => route,
            Err(e) => {
                tracing::error!(%path, error = %e, "redirect target is not a route");
                return;
            }
        };
        let failure = match mode {
            NavMode::Replace => self.router.replace(route),
            NavMode::Push => self.router.push(route),
        };
        if let Some(failure) = failure {
            tracing::error!(%path, ?failure, "navigation failed");
        }
        self.path = path.to_string();
    }
}

/// Outermost layout: restores the session once, then gates every page.
///
/// Rendering uses the pure decision (so denied content never flashes);
/// the single effect below is the only place that navigates.
#[component]
pub fn RouteGuard() -> Element {
    let mut session = use_session();
    let route: Route = use_route();
    let path = route.to_string();
    let router = navigator();

    let current_user =
        use_server_future(move || async move { server::api::get_current_user().await })?;

    use_effect(move || {
        if session.is_hydrated() {
            return;
        }
        match &*current_user.read() {
            Some(Ok(user)) => session.hydrate(user.clone()),
            Some(Err(e)) => {
                tracing::error!(error = %e, "session could not be restored; staying in loading state")
            }
            None => {}
        }
    });

    let controller = use_hook(|| Rc::new(RefCell::new(AccessController::default())));
    let decision = controller.borrow().evaluate(&path, &session);

    let enforcer = controller.clone();
    use_effect(use_reactive((&path,), move |(path,)| {
        let mut nav = RouterNavigator { path, router };
        enforcer.borrow_mut().enforce(&session, &mut nav);
    }));

    rsx! {
        Gate { decision, Outlet::<Route> {} }
    }
}

/// Renders `children` only for [`Decision::Allow`]; every other outcome gets
/// a placeholder, so no page content shows before the session is known.
#[component]
fn Gate(decision: Decision, children: Element) -> Element {
    match decision {
        Decision::Allow => children,
        Decision::Suspend => rsx! { PageSkeleton {} },
        Decision::Redirect { .. } => rsx! {
            div { class: "page-skeleton", role: "status", aria_busy: "true", "Redirecting…" }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(decision: Decision) -> String {
        dioxus_ssr::render_element(rsx! {
            Gate { decision,
                p { "quarterly premiums" }
            }
        })
    }

    #[test]
    fn allow_renders_the_page() {
        let html = render(Decision::Allow);
        assert!(html.contains("quarterly premiums"));
        assert!(!html.contains("page-skeleton"));
    }

    #[test]
    fn suspend_shows_only_the_skeleton() {
        let html = render(Decision::Suspend);
        assert!(html.contains("page-skeleton"));
        assert!(!html.contains("quarterly premiums"));
    }

    #[test]
    fn redirect_never_renders_the_page() {
        for to in ["/login", "/agent/dashboard"] {
            let html = render(Decision::Redirect { to });
            assert!(html.contains("Redirecting"));
            assert!(!html.contains("quarterly premiums"), "{to}");
        }
    }
}
