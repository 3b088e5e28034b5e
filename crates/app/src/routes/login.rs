use crate::auth::use_session;
use dioxus::prelude::*;
use shared_types::{AppError, FeatureFlags};
use shared_ui::{
    Alert, AlertKind, Button, Card, CardContent, CardDescription, CardHeader, CardTitle, TextField,
};
use std::collections::HashMap;

/// Sign-in form.
///
/// On success the session is stored and the route guard takes the user to
/// their role's dashboard; this page never navigates by itself.
#[component]
pub fn Login() -> Element {
    let mut session = use_session();
    let flags: FeatureFlags = use_context();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        match server::api::login(email(), password()).await {
            Ok(user) => session.sign_in(user),
            Err(e) => {
                let err_str = e.to_string();
                let fields = AppError::parse_field_errors(&err_str);
                if fields.is_empty() {
                    error_msg.set(Some(AppError::friendly_message(&err_str)));
                } else {
                    field_errors.set(fields);
                }
                loading.set(false);
            }
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./login.css") }

        div { class: "auth-page",
            Card { class: "auth-card",
                CardHeader {
                    CardTitle { "Sign in to PolicyDesk" }
                    CardDescription { "Use the account your administrator created for you." }
                }

                CardContent {
                    if let Some(err) = error_msg() {
                        Alert { kind: AlertKind::Error, "{err}" }
                    }

                    form { onsubmit: handle_login, novalidate: true,
                        TextField {
                            name: "email",
                            label: "Email",
                            input_type: "email",
                            autocomplete: "username",
                            placeholder: "you@company.com",
                            value: email(),
                            error: field_errors.read().get("email").cloned(),
                            on_input: move |e: FormEvent| email.set(e.value()),
                        }
                        TextField {
                            name: "password",
                            label: "Password",
                            input_type: "password",
                            autocomplete: "current-password",
                            value: password(),
                            error: field_errors.read().get("password").cloned(),
                            on_input: move |e: FormEvent| password.set(e.value()),
                        }
                        Button {
                            button_type: "submit",
                            busy: loading(),
                            class: "auth-submit",
                            if loading() { "Signing in…" } else { "Sign in" }
                        }
                    }

                    if flags.seed_demo {
                        Alert { kind: AlertKind::Info,
                            p { "Demo accounts: admin@, agent@ and reviewer@policydesk.test" }
                            p { "Password: policydesk-demo" }
                        }
                    }
                }
            }
        }
    }
}
