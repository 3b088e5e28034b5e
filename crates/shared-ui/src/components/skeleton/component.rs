use dioxus::prelude::*;

use crate::with_class;

/// Pulsing placeholder block.
#[component]
pub fn Skeleton(#[props(extends = GlobalAttributes)] attributes: Vec<Attribute>) -> Element {
    let merged = with_class("skeleton", attributes);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { aria_hidden: "true", ..merged }
    }
}

/// Full-page placeholder shown while the session is being restored.
#[component]
pub fn PageSkeleton(#[props(default = 3)] rows: usize) -> Element {
    rsx! {
        div { class: "page-skeleton", aria_busy: "true", role: "status",
            Skeleton { class: "skeleton-title" }
            for i in 0..rows {
                Skeleton { key: "{i}", class: "skeleton-row" }
            }
            span { class: "sr-only", "Loading…" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_skeleton_renders_requested_rows() {
        let html = dioxus_ssr::render_element(rsx! { PageSkeleton { rows: 4 } });
        assert_eq!(html.matches("skeleton-row").count(), 4);
        assert!(html.contains("aria-busy=\"true\""));
    }
}
