use dioxus::prelude::*;

use crate::with_class;

/// Bordered surface for grouping related content.
#[component]
pub fn Card(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let merged = with_class("card", attributes);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        section {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardHeader(children: Element) -> Element {
    rsx! {
        header { class: "card-header", {children} }
    }
}

#[component]
pub fn CardTitle(children: Element) -> Element {
    rsx! {
        h3 { class: "card-title", {children} }
    }
}

#[component]
pub fn CardDescription(children: Element) -> Element {
    rsx! {
        p { class: "card-description", {children} }
    }
}

#[component]
pub fn CardContent(children: Element) -> Element {
    rsx! {
        div { class: "card-content", {children} }
    }
}

/// Dashboard counter: a caption over a large number.
///
/// `value: None` renders a pulsing placeholder while the number loads.
#[component]
pub fn StatCard(label: String, value: Option<i64>, #[props(default)] hint: String) -> Element {
    rsx! {
        Card { class: "stat-card",
            CardContent {
                p { class: "stat-label", "{label}" }
                match value {
                    Some(v) => rsx! { p { class: "stat-value", "{v}" } },
                    None => rsx! { div { class: "stat-value skeleton", aria_busy: "true" } },
                }
                if !hint.is_empty() {
                    p { class: "stat-hint", "{hint}" }
                }
            }
        }
    }
}
