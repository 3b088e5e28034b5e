//! Route classification and the access decision.
//!
//! Every navigable path is classified by a static, ordered [`RouteTable`].
//! [`decide`] combines that classification with the session and the
//! hydration flag into a [`Decision`]. It is pure: callers may evaluate it
//! as often as they like (during render, in effects) without side effects.
//! Navigation itself lives in [`crate::guard::AccessController`].

use crate::models::{Role, Session};

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Bare root path. Kept only so old links land somewhere sensible.
pub const ROOT_PATH: &str = "/";

/// How a path is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Sign-in surface. Open to everyone; a signed-in session is sent to its
    /// landing page instead.
    Public,
    /// Only sessions holding exactly this role.
    RoleScoped(Role),
    /// Any signed-in role.
    Authenticated,
    /// Historical entry point that never renders its own content.
    LegacyRedirect,
}

/// Path matcher used by a [`RouteRule`]. Matching runs on normalized paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    /// The path itself and everything below it (`/admin` matches `/admin`
    /// and `/admin/users`, not `/administrator`).
    Prefix(&'static str),
}

impl PathPattern {
    pub fn matches(&self, normalized: &str) -> bool {
        match *self {
            PathPattern::Exact(p) => normalized == p,
            PathPattern::Prefix(p) => {
                normalized == p
                    || normalized
                        .strip_prefix(p)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub class: RouteClass,
}

impl RouteRule {
    pub const fn new(pattern: PathPattern, class: RouteClass) -> Self {
        Self { pattern, class }
    }
}

/// Ordered list of rules; the first match wins.
#[derive(Debug)]
pub struct RouteTable {
    rules: &'static [RouteRule],
}

/// Paths that match no rule. Unknown paths still require a signed-in user.
const UNMATCHED: RouteClass = RouteClass::Authenticated;

impl RouteTable {
    pub const fn new(rules: &'static [RouteRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [RouteRule] {
        self.rules
    }

    /// Classify a raw path (query string and trailing slashes allowed).
    pub fn classify(&self, path: &str) -> RouteClass {
        let normalized = normalize_path(path);
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(&normalized))
            .map(|rule| rule.class)
            .unwrap_or(UNMATCHED)
    }
}

/// The console's route table.
pub static ROUTES: RouteTable = RouteTable::new(&[
    RouteRule::new(PathPattern::Exact(ROOT_PATH), RouteClass::LegacyRedirect),
    RouteRule::new(PathPattern::Exact(LOGIN_PATH), RouteClass::Public),
    RouteRule::new(PathPattern::Prefix("/admin"), RouteClass::RoleScoped(Role::Admin)),
    RouteRule::new(PathPattern::Prefix("/agent"), RouteClass::RoleScoped(Role::Agent)),
    RouteRule::new(
        PathPattern::Prefix("/reviewer"),
        RouteClass::RoleScoped(Role::Reviewer),
    ),
    RouteRule::new(PathPattern::Exact("/profile"), RouteClass::Authenticated),
]);

/// Strip query and fragment, collapse empty segments.
///
/// `/admin//users/?tab=2` becomes `/admin/users`; the empty string becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    let segments: Vec<&str> = path[..end].split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Session state is not restored yet. Render a neutral placeholder and
    /// do not navigate.
    Suspend,
    /// Render the requested page.
    Allow,
    /// Leave for `to` (history replace).
    Redirect { to: &'static str },
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match *self {
            Decision::Redirect { to } => Some(to),
            _ => None,
        }
    }
}

/// Decide whether `path` may render for `session`.
///
/// A session whose role tag is not a known [`Role`] counts as no session.
pub fn decide(
    table: &RouteTable,
    path: &str,
    session: Option<&Session>,
    hydrated: bool,
) -> Decision {
    if !hydrated {
        return Decision::Suspend;
    }

    let role = session.and_then(Session::role);
    match (table.classify(path), role) {
        (RouteClass::Public, None) => Decision::Allow,
        (RouteClass::Public, Some(role)) => Decision::Redirect {
            to: role.landing_path(),
        },
        (_, None) => Decision::Redirect { to: LOGIN_PATH },
        (RouteClass::LegacyRedirect, Some(role)) => Decision::Redirect {
            to: role.landing_path(),
        },
        (RouteClass::RoleScoped(required), Some(role)) if required != role => {
            Decision::Redirect {
                to: role.landing_path(),
            }
        }
        (RouteClass::RoleScoped(_) | RouteClass::Authenticated, Some(_)) => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every page the console exposes, plus a few oddities.
    const SAMPLE_PATHS: &[&str] = &[
        "/",
        "/login",
        "/admin/dashboard",
        "/admin/users",
        "/admin/reports",
        "/agent/dashboard",
        "/agent/clients",
        "/reviewer/dashboard",
        "/reviewer/reports",
        "/profile",
        "/does-not-exist",
        "/admin/dashboard/?from=email",
    ];

    fn session(role: &str) -> Session {
        Session {
            user_id: 1,
            username: "user".into(),
            display_name: "User".into(),
            email: "user@policydesk.test".into(),
            role: role.into(),
        }
    }

    fn scoped_paths() -> Vec<(&'static str, Role)> {
        SAMPLE_PATHS
            .iter()
            .filter_map(|p| match ROUTES.classify(p) {
                RouteClass::RoleScoped(r) => Some((*p, r)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn normalize_strips_query_fragment_and_slashes() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/login?redirect=%2Fadmin"), "/login");
        assert_eq!(normalize_path("/admin//users/"), "/admin/users");
        assert_eq!(normalize_path("/agent/clients#top"), "/agent/clients");
        assert_eq!(normalize_path("?x=1"), "/");
    }

    #[test]
    fn prefix_respects_segment_boundaries() {
        let admin = PathPattern::Prefix("/admin");
        assert!(admin.matches("/admin"));
        assert!(admin.matches("/admin/users"));
        assert!(!admin.matches("/administrator"));
        assert!(!admin.matches("/"));
    }

    #[test]
    fn classification_of_known_paths() {
        assert_eq!(ROUTES.classify("/"), RouteClass::LegacyRedirect);
        assert_eq!(ROUTES.classify("/login"), RouteClass::Public);
        assert_eq!(
            ROUTES.classify("/admin/users"),
            RouteClass::RoleScoped(Role::Admin)
        );
        assert_eq!(
            ROUTES.classify("/agent/clients/"),
            RouteClass::RoleScoped(Role::Agent)
        );
        assert_eq!(
            ROUTES.classify("/reviewer/reports?start=2024-01-01"),
            RouteClass::RoleScoped(Role::Reviewer)
        );
        assert_eq!(ROUTES.classify("/profile"), RouteClass::Authenticated);
    }

    #[test]
    fn unknown_paths_require_sign_in() {
        assert_eq!(ROUTES.classify("/billing"), RouteClass::Authenticated);
        assert_eq!(
            decide(&ROUTES, "/billing", None, true),
            Decision::Redirect { to: LOGIN_PATH }
        );
        assert_eq!(
            decide(&ROUTES, "/billing", Some(&session("agent")), true),
            Decision::Allow
        );
    }

    #[test]
    fn unhydrated_always_suspends() {
        let sessions = [
            None,
            Some(session("admin")),
            Some(session("agent")),
            Some(session("reviewer")),
            Some(session("client")),
        ];
        for path in SAMPLE_PATHS {
            for s in &sessions {
                assert_eq!(
                    decide(&ROUTES, path, s.as_ref(), false),
                    Decision::Suspend,
                    "path {path} session {s:?}"
                );
            }
        }
    }

    #[test]
    fn mismatched_role_goes_to_own_dashboard() {
        for (path, required) in scoped_paths() {
            for role in Role::ALL.into_iter().filter(|r| *r != required) {
                let s = session(role.as_str());
                assert_eq!(
                    decide(&ROUTES, path, Some(&s), true),
                    Decision::Redirect {
                        to: role.landing_path()
                    },
                    "{role:?} on {path}"
                );
            }
        }
    }

    #[test]
    fn matching_role_is_allowed() {
        for (path, required) in scoped_paths() {
            let s = session(required.as_str());
            assert_eq!(decide(&ROUTES, path, Some(&s), true), Decision::Allow);
        }
    }

    #[test]
    fn signed_out_protected_paths_go_to_login() {
        for path in SAMPLE_PATHS {
            let class = ROUTES.classify(path);
            if class == RouteClass::Public {
                continue;
            }
            assert_eq!(
                decide(&ROUTES, path, None, true),
                Decision::Redirect { to: LOGIN_PATH },
                "{path} ({class:?})"
            );
        }
    }

    #[test]
    fn signed_in_users_leave_login() {
        for role in Role::ALL {
            let s = session(role.as_str());
            assert_eq!(
                decide(&ROUTES, "/login?redirect=/x", Some(&s), true),
                Decision::Redirect {
                    to: role.landing_path()
                }
            );
        }
        assert_eq!(decide(&ROUTES, "/login", None, true), Decision::Allow);
    }

    #[test]
    fn root_never_renders() {
        assert_eq!(
            decide(&ROUTES, "/", None, true),
            Decision::Redirect { to: LOGIN_PATH }
        );
        for role in Role::ALL {
            let s = session(role.as_str());
            let decision = decide(&ROUTES, "/", Some(&s), true);
            assert!(!decision.is_allow());
            assert_eq!(decision.redirect_target(), Some(role.landing_path()));
        }
    }

    #[test]
    fn unknown_role_is_signed_out() {
        for tag in ["client", "superuser", "", "Admin?"] {
            let s = session(tag);
            assert_eq!(
                decide(&ROUTES, "/admin/dashboard", Some(&s), true),
                Decision::Redirect { to: LOGIN_PATH },
                "tag {tag:?}"
            );
            assert_eq!(decide(&ROUTES, "/login", Some(&s), true), Decision::Allow);
        }
    }

    #[test]
    fn scenario_agent_on_admin_dashboard() {
        let s = session("agent");
        assert_eq!(
            decide(&ROUTES, "/admin/dashboard", Some(&s), true),
            Decision::Redirect {
                to: "/agent/dashboard"
            }
        );
    }

    #[test]
    fn scenario_anonymous_on_reviewer_dashboard() {
        assert_eq!(
            decide(&ROUTES, "/reviewer/dashboard", None, true),
            Decision::Redirect { to: "/login" }
        );
    }

    #[test]
    fn scenario_admin_on_login() {
        let s = session("admin");
        assert_eq!(
            decide(&ROUTES, "/login", Some(&s), true),
            Decision::Redirect {
                to: "/admin/dashboard"
            }
        );
    }

    #[test]
    fn landing_pages_are_reachable_by_their_role() {
        for role in Role::ALL {
            let s = session(role.as_str());
            assert_eq!(
                decide(&ROUTES, role.landing_path(), Some(&s), true),
                Decision::Allow
            );
        }
    }

    #[test]
    fn decision_is_deterministic() {
        let s = session("reviewer");
        for path in SAMPLE_PATHS {
            let first = decide(&ROUTES, path, Some(&s), true);
            let second = decide(&ROUTES, path, Some(&s), true);
            assert_eq!(first, second);
        }
    }
}
