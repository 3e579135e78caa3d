//! Tag → presentation lookup table.

use papermark_markup::color::{is_valid_color, FALLBACK_COLOR};
use papermark_markup::Parameter;

/// Text rendered before a bullet's content.
pub const BULLET_MARKER: &str = " · ";

/// How one tag is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    /// CSS class for the wrapping element.
    pub class: Option<String>,
    /// Inline CSS for the wrapping element.
    pub css: Option<String>,
    /// Text emitted before the node's children.
    pub prefix: Option<&'static str>,
}

/// Look up the presentation of `tag`. Unknown tags render unstyled.
pub fn style_for(tag: &str, param: Option<&Parameter>) -> Style {
    match tag {
        "color" => Style {
            css: param.map(|color| format!("color: {}", css_color(color))),
            ..Style::default()
        },
        "head" => Style {
            class: param
                .map(|level| level.to_string())
                .filter(|level| !level.is_empty() && level.bytes().all(|b| b.is_ascii_digit()))
                .map(|level| format!("mu-head-{level}")),
            ..Style::default()
        },
        "bold" => class("mu-bold"),
        "italic" => class("mu-italic"),
        "bolditalic" => class("mu-bold-italic"),
        "bullet" => Style {
            prefix: Some(BULLET_MARKER),
            ..class("mu-bullet")
        },
        _ => Style::default(),
    }
}

/// Only resolved colors reach the `style` attribute; anything else could
/// carry extra declarations.
fn css_color(param: &Parameter) -> String {
    match param {
        Parameter::Color(color) => color.value.clone(),
        Parameter::Text(text) if is_valid_color(text) => text.clone(),
        _ => FALLBACK_COLOR.to_string(),
    }
}

fn class(name: &str) -> Style {
    Style {
        class: Some(name.to_string()),
        ..Style::default()
    }
}
