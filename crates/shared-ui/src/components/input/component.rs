use dioxus::prelude::*;

use crate::with_class;

/// Labelled text input with an optional inline error.
///
/// The error text is linked to the input through `aria-describedby`.
#[component]
pub fn TextField(
    name: &'static str,
    label: String,
    value: String,
    on_input: EventHandler<FormEvent>,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] placeholder: String,
    #[props(default)] autocomplete: String,
    #[props(default)] error: Option<String>,
    #[props(default = false)] disabled: bool,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
) -> Element {
    let merged = with_class("input", attributes);
    let input_id = format!("field-{name}");
    let error_id = format!("{input_id}-error");
    let invalid = error.is_some();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "field",
            label { class: "field-label", r#for: "{input_id}", "{label}" }
            input {
                id: "{input_id}",
                name,
                r#type: input_type,
                value,
                placeholder,
                autocomplete,
                disabled,
                aria_invalid: invalid,
                aria_describedby: if invalid { error_id.clone() },
                oninput: move |evt| on_input.call(evt),
                ..merged,
            }
            if let Some(message) = error {
                p { id: "{error_id}", class: "field-error", "{message}" }
            }
        }
    }
}
