use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaCircleExclamation, FaCircleInfo};
use dioxus_free_icons::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlertKind {
    #[default]
    Info,
    Error,
}

/// Inline message box. Errors are announced to screen readers.
#[component]
pub fn Alert(#[props(default)] kind: AlertKind, children: Element) -> Element {
    let (class, role) = match kind {
        AlertKind::Info => ("alert alert-info", "status"),
        AlertKind::Error => ("alert alert-error", "alert"),
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class, role,
            match kind {
                AlertKind::Info => rsx! { Icon { width: 16, height: 16, icon: FaCircleInfo } },
                AlertKind::Error => rsx! { Icon { width: 16, height: 16, icon: FaCircleExclamation } },
            }
            div { class: "alert-body", {children} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_use_alert_role() {
        let html = dioxus_ssr::render_element(rsx! {
            Alert { kind: AlertKind::Error, "Invalid email or password" }
        });
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Invalid email or password"));
    }
}
