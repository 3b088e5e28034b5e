use dioxus::prelude::*;

use crate::auth::use_role;
use shared_types::LOGIN_PATH;

/// 404 for signed-in users. Signed-out visitors are sent to sign in first.
#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = format!("/{}", route.join("/"));
    let home = use_role().map(|r| r.landing_path()).unwrap_or(LOGIN_PATH);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./not_found.css") }

        div { class: "not-found-page",
            div { class: "not-found-code", "404" }
            h1 { class: "not-found-title", "Page not found" }
            p { class: "not-found-message",
                "Nothing lives at "
                code { "{path}" }
                "."
            }
            Link { to: home, class: "not-found-link", "Back to your dashboard" }
        }
    }
}
