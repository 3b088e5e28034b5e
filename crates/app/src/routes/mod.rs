pub mod clients;
pub mod dashboard;
pub mod guard;
pub mod login;
pub mod not_found;
pub mod profile;
pub mod reports;
pub mod users;

use crate::auth::{use_role, use_session};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdBriefcase, LdFileText, LdLayoutDashboard, LdUserCheck, LdUsers,
};
use dioxus_free_icons::Icon;
use shared_types::Role;
use shared_ui::{Button, ButtonVariant};

use clients::AgentClients;
use dashboard::{AdminDashboard, AgentDashboard, ReviewerDashboard};
use guard::RouteGuard;
use login::Login;
use not_found::NotFound;
use profile::Profile;
use reports::{AdminReports, ReviewerReports};
use users::AdminUsers;

/// Every page sits behind [`RouteGuard`]; pages never check roles themselves.
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(RouteGuard)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[layout(AppLayout)]
            #[route("/admin/dashboard")]
            AdminDashboard {},
            #[route("/admin/users")]
            AdminUsers {},
            #[route("/admin/reports")]
            AdminReports {},
            #[route("/agent/dashboard")]
            AgentDashboard {},
            #[route("/agent/clients")]
            AgentClients {},
            #[route("/reviewer/dashboard")]
            ReviewerDashboard {},
            #[route("/reviewer/reports")]
            ReviewerReports {},
            #[route("/profile")]
            Profile {},
            #[route("/:..route")]
            NotFound { route: Vec<String> },
        #[end_layout]
    #[end_layout]
}

/// `/` has no content; the guard always sends it elsewhere.
#[component]
fn Home() -> Element {
    rsx! {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum NavIcon {
    Dashboard,
    Users,
    Clients,
    Reports,
    Profile,
}

#[derive(Clone, Debug, PartialEq)]
struct NavItem {
    to: Route,
    label: &'static str,
    icon: NavIcon,
}

/// Sidebar entries for a role, in display order.
fn nav_items(role: Role) -> Vec<NavItem> {
    let item = |to, label, icon| NavItem { to, label, icon };
    let mut items = match role {
        Role::Admin => vec![
            item(Route::AdminDashboard {}, "Dashboard", NavIcon::Dashboard),
            item(Route::AdminUsers {}, "Users", NavIcon::Users),
            item(Route::AdminReports {}, "Reports", NavIcon::Reports),
        ],
        Role::Agent => vec![
            item(Route::AgentDashboard {}, "Dashboard", NavIcon::Dashboard),
            item(Route::AgentClients {}, "Clients", NavIcon::Clients),
        ],
        Role::Reviewer => vec![
            item(Route::ReviewerDashboard {}, "Dashboard", NavIcon::Dashboard),
            item(Route::ReviewerReports {}, "Reports", NavIcon::Reports),
        ],
    };
    items.push(item(Route::Profile {}, "Profile", NavIcon::Profile));
    items
}

#[component]
fn NavGlyph(icon: NavIcon) -> Element {
    match icon {
        NavIcon::Dashboard => rsx! { Icon { icon: LdLayoutDashboard, width: 18, height: 18 } },
        NavIcon::Users => rsx! { Icon { icon: LdUsers, width: 18, height: 18 } },
        NavIcon::Clients => rsx! { Icon { icon: LdBriefcase, width: 18, height: 18 } },
        NavIcon::Reports => rsx! { Icon { icon: LdFileText, width: 18, height: 18 } },
        NavIcon::Profile => rsx! { Icon { icon: LdUserCheck, width: 18, height: 18 } },
    }
}

/// Ends the session on the server, then locally. The guard takes the user
/// to the login page once the local session is gone.
#[component]
pub(crate) fn SignOutButton(#[props(default)] variant: ButtonVariant) -> Element {
    let mut session = use_session();
    let mut signing_out = use_signal(|| false);

    let sign_out = move |_| async move {
        signing_out.set(true);
        if let Err(e) = server::api::logout().await {
            tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
        }
        session.sign_out();
    };

    rsx! {
        Button {
            variant,
            busy: signing_out(),
            onclick: sign_out,
            "Sign out"
        }
    }
}

/// Console chrome: role navigation on the left, page content on the right.
#[component]
fn AppLayout() -> Element {
    let route: Route = use_route();
    let session = use_session();
    let role = use_role();

    let display_name = session
        .display_name()
        .unwrap_or_else(|| "Signed out".to_string());
    let items = role.map(nav_items).unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./layout.css") }

        div { class: "app-shell",
            nav { class: "app-sidebar", aria_label: "Main",
                div { class: "app-brand", "PolicyDesk" }
                ul { class: "app-nav",
                    for item in items {
                        li { key: "{item.to}",
                            Link {
                                to: item.to.clone(),
                                class: if item.to == route { "app-nav-link active" } else { "app-nav-link" },
                                NavGlyph { icon: item.icon }
                                span { "{item.label}" }
                            }
                        }
                    }
                }
                div { class: "app-sidebar-footer",
                    div { class: "app-user",
                        span { class: "app-user-name", "{display_name}" }
                        if let Some(role) = role {
                            span { class: "app-user-role", {role.label()} }
                        }
                    }
                    SignOutButton { variant: ButtonVariant::Ghost }
                }
            }
            main { class: "app-main",
                Outlet::<Route> {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{decide, Decision, Session, ROUTES};

    fn session(role: Role) -> Session {
        Session {
            user_id: 1,
            username: role.as_str().into(),
            display_name: role.label().into(),
            email: format!("{}@policydesk.test", role.as_str()),
            role: role.as_str().into(),
        }
    }

    #[test]
    fn sidebar_only_links_to_allowed_pages() {
        for role in Role::ALL {
            let me = session(role);
            for item in nav_items(role) {
                let path = item.to.to_string();
                assert_eq!(
                    decide(&ROUTES, &path, Some(&me), true),
                    Decision::Allow,
                    "{role:?} -> {path}"
                );
            }
        }
    }

    #[test]
    fn landing_pages_are_routes() {
        for role in Role::ALL {
            let route: Route = role.landing_path().parse().unwrap();
            assert!(!matches!(route, Route::NotFound { .. }), "{role:?}");
            assert_eq!(route.to_string(), role.landing_path());
        }
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        let route: Route = "/admin/nonexistent".parse().unwrap();
        assert!(matches!(route, Route::NotFound { .. }));
    }

    #[test]
    fn first_nav_item_is_the_landing_page() {
        for role in Role::ALL {
            assert_eq!(nav_items(role)[0].to.to_string(), role.landing_path());
        }
    }
}
