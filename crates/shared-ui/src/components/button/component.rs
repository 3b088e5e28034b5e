use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
}

impl ButtonVariant {
    fn as_str(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "primary",
            ButtonVariant::Secondary => "secondary",
            ButtonVariant::Ghost => "ghost",
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct ButtonProps {
    #[props(default)]
    pub variant: ButtonVariant,
    #[props(default = "button")]
    pub button_type: &'static str,
    /// Disables the button and shows a spinner.
    #[props(default = false)]
    pub busy: bool,
    #[props(default = false)]
    pub disabled: bool,
    #[props(default)]
    pub onclick: Option<EventHandler<MouseEvent>>,
    #[props(extends = GlobalAttributes)]
    pub attributes: Vec<Attribute>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let merged = dioxus_primitives::merge_attributes(vec![
        vec![
            Attribute::new("class", "button", None, false),
            Attribute::new("data-style", props.variant.as_str(), None, false),
        ],
        props.attributes,
    ]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        button {
            r#type: props.button_type,
            disabled: props.disabled || props.busy,
            aria_busy: props.busy,
            onclick: move |evt| {
                if let Some(handler) = &props.onclick {
                    handler.call(evt);
                }
            },
            ..merged,
            if props.busy {
                span { class: "button-spinner", aria_hidden: "true" }
            }
            {props.children}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_button_is_disabled() {
        let html = dioxus_ssr::render_element(rsx! {
            Button { busy: true, button_type: "submit", "Sign in" }
        });
        assert!(html.contains("disabled"));
        assert!(html.contains("button-spinner"));
        assert!(html.contains("type=\"submit\""));
    }

    #[test]
    fn variant_is_exposed_as_data_style() {
        let html = dioxus_ssr::render_element(rsx! {
            Button { variant: ButtonVariant::Ghost, "Sign out" }
        });
        assert!(html.contains("data-style=\"ghost\""));
        assert!(!html.contains("button-spinner"));
    }
}
