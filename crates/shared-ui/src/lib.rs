//! Presentational components for the PolicyDesk console.
//!
//! Each component ships its own stylesheet next to it and pulls it in with
//! `document::Link`, so pages only import the components they render.

pub mod components;

pub use components::*;

use dioxus::prelude::*;

/// `class` attribute list with `base` first, merged with caller attributes.
pub(crate) fn with_class(base: &'static str, attributes: Vec<Attribute>) -> Vec<Attribute> {
    dioxus_primitives::merge_attributes(vec![
        vec![Attribute::new("class", base, None, false)],
        attributes,
    ])
}
