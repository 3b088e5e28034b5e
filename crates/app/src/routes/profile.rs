use dioxus::prelude::*;
use shared_types::SessionStore;
use shared_ui::{ButtonVariant, Card, CardContent, CardHeader, CardTitle, PageHeader};

use crate::auth::use_session;
use crate::routes::SignOutButton;

#[component]
pub fn Profile() -> Element {
    let session = use_session();
    let Some(me) = session.session() else {
        return rsx! {};
    };
    let role_label = me.role().map(|r| r.label()).unwrap_or("Unknown");

    rsx! {
        PageHeader { title: "Profile",
            SignOutButton { variant: ButtonVariant::Secondary }
        }
        Card {
            CardHeader { CardTitle { "{me.display_name}" } }
            CardContent {
                dl { class: "profile-details",
                    dt { "Username" }
                    dd { "{me.username}" }
                    dt { "Email" }
                    dd { "{me.email}" }
                    dt { "Role" }
                    dd { "{role_label}" }
                }
            }
        }
    }
}
