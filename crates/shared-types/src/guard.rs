//! The side-effecting half of access control.
//!
//! [`AccessController::enforce`] reads the session through [`SessionStore`],
//! evaluates [`decide`] for the navigator's current path and, when the answer
//! is a redirect, asks the [`Navigator`] to replace the history entry. It
//! remembers the last redirect it issued so that re-running with unchanged
//! inputs (a second effect pass before the router commits) navigates once.

use crate::access::{decide, normalize_path, Decision, RouteTable, ROUTES};
use crate::models::Session;

/// Read side of the process-wide session state.
pub trait SessionStore {
    fn session(&self) -> Option<Session>;
    /// Whether the session has been restored since page load.
    fn is_hydrated(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    /// Overwrite the current history entry.
    Replace,
    Push,
}

/// Client-side router as seen by the controller.
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect_to(&mut self, path: &str, mode: NavMode);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IssuedRedirect {
    from: String,
    to: &'static str,
}

#[derive(Debug)]
pub struct AccessController {
    table: &'static RouteTable,
    last_redirect: Option<IssuedRedirect>,
}

impl Default for AccessController {
    fn default() -> Self {
        Self::new(&ROUTES)
    }
}

impl AccessController {
    pub fn new(table: &'static RouteTable) -> Self {
        Self {
            table,
            last_redirect: None,
        }
    }

    /// Pure decision for `path`. Safe to call during render.
    pub fn evaluate<S>(&self, path: &str, store: &S) -> Decision
    where
        S: SessionStore + ?Sized,
    {
        decide(
            self.table,
            path,
            store.session().as_ref(),
            store.is_hydrated(),
        )
    }

    /// Evaluate the navigator's current path and navigate if denied.
    ///
    /// Returns the decision that was acted on.
    pub fn enforce<S, N>(&mut self, store: &S, navigator: &mut N) -> Decision
    where
        S: SessionStore + ?Sized,
        N: Navigator + ?Sized,
    {
        let path = normalize_path(&navigator.current_path());
        let decision = self.evaluate(&path, store);

        match decision {
            Decision::Suspend => {
                tracing::debug!(%path, "session not hydrated; holding navigation");
            }
            Decision::Allow => {
                self.last_redirect = None;
            }
            Decision::Redirect { to } => {
                let issued = IssuedRedirect {
                    from: path.clone(),
                    to,
                };
                if path == to {
                    tracing::warn!(%path, "redirect target equals current path; not navigating");
                } else if self.last_redirect.as_ref() == Some(&issued) {
                    tracing::debug!(from = %path, to, "redirect already issued");
                } else {
                    tracing::info!(from = %path, to, "access denied; redirecting");
                    navigator.redirect_to(to, NavMode::Replace);
                    self.last_redirect = Some(issued);
                }
            }
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use pretty_assertions::assert_eq;

    struct FakeStore {
        session: Option<Session>,
        hydrated: bool,
    }

    impl FakeStore {
        fn signed_in(role: &str) -> Self {
            Self {
                session: Some(Session {
                    user_id: 12,
                    username: "jdoe".into(),
                    display_name: "Jane Doe".into(),
                    email: "jane@policydesk.test".into(),
                    role: role.into(),
                }),
                hydrated: true,
            }
        }

        fn signed_out() -> Self {
            Self {
                session: None,
                hydrated: true,
            }
        }

        fn loading() -> Self {
            Self {
                session: None,
                hydrated: false,
            }
        }
    }

    impl SessionStore for FakeStore {
        fn session(&self) -> Option<Session> {
            self.session.clone()
        }

        fn is_hydrated(&self) -> bool {
            self.hydrated
        }
    }

    /// Records calls. With `follow`, the path updates like a committed navigation.
    struct RecordingNavigator {
        path: String,
        follow: bool,
        calls: Vec<(String, NavMode)>,
    }

    impl RecordingNavigator {
        fn at(path: &str) -> Self {
            Self {
                path: path.into(),
                follow: true,
                calls: Vec::new(),
            }
        }

        fn pending(path: &str) -> Self {
            Self {
                follow: false,
                ..Self::at(path)
            }
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.path.clone()
        }

        fn redirect_to(&mut self, path: &str, mode: NavMode) {
            self.calls.push((path.to_string(), mode));
            if self.follow {
                self.path = path.to_string();
            }
        }
    }

    #[test]
    fn agent_on_admin_page_is_replaced_with_agent_dashboard() {
        let mut controller = AccessController::default();
        let store = FakeStore::signed_in("agent");
        let mut nav = RecordingNavigator::at("/admin/dashboard");

        let decision = controller.enforce(&store, &mut nav);

        assert_eq!(
            decision,
            Decision::Redirect {
                to: "/agent/dashboard"
            }
        );
        assert_eq!(
            nav.calls,
            vec![("/agent/dashboard".to_string(), NavMode::Replace)]
        );
    }

    #[test]
    fn anonymous_on_reviewer_page_goes_to_login() {
        let mut controller = AccessController::default();
        let mut nav = RecordingNavigator::at("/reviewer/dashboard");

        controller.enforce(&FakeStore::signed_out(), &mut nav);

        assert_eq!(nav.calls, vec![("/login".to_string(), NavMode::Replace)]);
    }

    #[test]
    fn admin_on_login_goes_to_admin_dashboard() {
        let mut controller = AccessController::default();
        let mut nav = RecordingNavigator::at("/login");

        controller.enforce(&FakeStore::signed_in("admin"), &mut nav);

        assert_eq!(
            nav.calls,
            vec![("/admin/dashboard".to_string(), NavMode::Replace)]
        );
    }

    #[test]
    fn loading_state_never_navigates() {
        let mut controller = AccessController::default();
        for path in ["/", "/login", "/admin/users", "/profile", "/nowhere"] {
            let mut nav = RecordingNavigator::at(path);
            let decision = controller.enforce(&FakeStore::loading(), &mut nav);
            assert_eq!(decision, Decision::Suspend);
            assert!(nav.calls.is_empty(), "navigated from {path}");
        }
    }

    #[test]
    fn repeated_enforce_before_commit_navigates_once() {
        let mut controller = AccessController::default();
        let store = FakeStore::signed_in("reviewer");
        let mut nav = RecordingNavigator::pending("/agent/clients");

        let first = controller.enforce(&store, &mut nav);
        let second = controller.enforce(&store, &mut nav);

        assert_eq!(first, second);
        assert_eq!(nav.calls.len(), 1);
    }

    #[test]
    fn repeated_enforce_after_commit_settles() {
        let mut controller = AccessController::default();
        let store = FakeStore::signed_in("agent");
        let mut nav = RecordingNavigator::at("/");

        controller.enforce(&store, &mut nav);
        let settled = controller.enforce(&store, &mut nav);
        let again = controller.enforce(&store, &mut nav);

        assert_eq!(settled, Decision::Allow);
        assert_eq!(again, Decision::Allow);
        assert_eq!(nav.path, "/agent/dashboard");
        assert_eq!(nav.calls.len(), 1);
    }

    #[test]
    fn returning_to_a_denied_page_redirects_again() {
        let mut controller = AccessController::default();
        let store = FakeStore::signed_in("agent");
        let mut nav = RecordingNavigator::at("/admin/users");

        controller.enforce(&store, &mut nav);
        controller.enforce(&store, &mut nav);
        nav.path = "/admin/users".into();
        controller.enforce(&store, &mut nav);

        assert_eq!(nav.calls.len(), 2);
    }

    #[test]
    fn hydration_completing_triggers_the_deferred_redirect() {
        let mut controller = AccessController::default();
        let mut nav = RecordingNavigator::at("/admin/reports");

        controller.enforce(&FakeStore::loading(), &mut nav);
        assert!(nav.calls.is_empty());

        controller.enforce(&FakeStore::signed_out(), &mut nav);
        assert_eq!(nav.calls, vec![("/login".to_string(), NavMode::Replace)]);
    }

    #[test]
    fn sign_out_on_protected_page_redirects_to_login() {
        let mut controller = AccessController::default();
        let mut nav = RecordingNavigator::at("/profile");

        assert_eq!(
            controller.enforce(&FakeStore::signed_in("admin"), &mut nav),
            Decision::Allow
        );
        controller.enforce(&FakeStore::signed_out(), &mut nav);

        assert_eq!(nav.path, "/login");
    }

    #[test]
    fn unknown_role_fails_closed() {
        let mut controller = AccessController::default();
        let mut nav = RecordingNavigator::at("/agent/dashboard");

        controller.enforce(&FakeStore::signed_in("client"), &mut nav);

        assert_eq!(nav.calls, vec![("/login".to_string(), NavMode::Replace)]);
    }

    #[test]
    fn evaluate_matches_enforce_without_navigating() {
        let controller = AccessController::default();
        let store = FakeStore::signed_in("admin");
        for role in Role::ALL {
            let path = role.landing_path();
            let expected = if role == Role::Admin {
                Decision::Allow
            } else {
                Decision::Redirect {
                    to: "/admin/dashboard",
                }
            };
            assert_eq!(controller.evaluate(path, &store), expected);
        }
    }
}
