//! Known tags and the checks run against every opening tag.
//!
//! Adding a tag is a table row: either in [`TagRegistry::builtin`] or in a
//! TOML file loaded with [`TagRegistry::extend_from_toml`]:
//!
//! ```text
//! [[tag]]
//! name = "underline"
//!
//! [[tag]]
//! name = "rule"
//! self_closing = true
//!
//! [[tag]]
//! name = "size"
//! param = "int"
//! ```

use serde::Deserialize;

use crate::color::is_valid_color;
use crate::diagnostic::Diagnostic;
use crate::node::{Node, ParamKind, Parameter};
use crate::RegistryError;

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSpec {
    pub name: String,
    #[serde(default)]
    pub self_closing: bool,
    #[serde(default)]
    pub param: ParamKind,
}

impl TagSpec {
    pub fn new(name: impl Into<String>, self_closing: bool, param: ParamKind) -> Self {
        Self {
            name: name.into(),
            self_closing,
            param,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "tag")]
    tags: Vec<TagSpec>,
}

/// Ordered table of known tags, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<TagSpec>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagRegistry {
    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// The tags every renderer understands.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert(TagSpec::new("color", false, ParamKind::Color));
        registry.insert(TagSpec::new("head", false, ParamKind::Int));
        registry.insert(TagSpec::new("bold", false, ParamKind::None));
        registry.insert(TagSpec::new("italic", false, ParamKind::None));
        registry.insert(TagSpec::new("bolditalic", false, ParamKind::None));
        registry.insert(TagSpec::new("bullet", true, ParamKind::None));
        registry
    }

    /// Add a row, replacing any existing row with the same name in place.
    pub fn insert(&mut self, spec: TagSpec) {
        match self.tags.iter_mut().find(|t| t.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.tags.push(spec),
        }
    }

    /// Add every `[[tag]]` row of a TOML document.
    pub fn extend_from_toml(&mut self, source: &str) -> Result<(), RegistryError> {
        let file: RegistryFile = toml::from_str(source)?;
        for spec in file.tags {
            // Must be writable as a tag: [A-Za-z][A-Za-z0-9]*
            let writable = spec.name.starts_with(|c: char| c.is_ascii_alphabetic())
                && spec.name.chars().all(|c| c.is_ascii_alphanumeric());
            if !writable {
                return Err(RegistryError::InvalidName(spec.name));
            }
            self.insert(spec);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TagSpec> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagSpec> {
        self.tags.iter()
    }

    /// Check an opening tag against its row. Other node kinds always pass.
    pub fn validate(&self, node: &Node) -> Vec<Diagnostic> {
        if !node.is_open() {
            return Vec::new();
        }
        let name = node.value.as_str();
        let Some(spec) = self.get(name) else {
            return vec![Diagnostic::unknown_tag(name, node.span)];
        };

        let mut diagnostics = Vec::new();
        if spec.self_closing && !node.self_closing {
            diagnostics.push(Diagnostic::self_closing_required(name, node.span));
        }
        match (spec.param, &node.param) {
            (ParamKind::None, None) => {}
            (ParamKind::None, Some(_)) => {
                diagnostics.push(Diagnostic::unexpected_parameter(name, node.span));
            }
            (expected, None) => {
                diagnostics.push(Diagnostic::missing_parameter(name, expected, node.span));
            }
            (expected, Some(param)) => {
                if !accepts(expected, param) {
                    diagnostics.push(Diagnostic::invalid_parameter(
                        name,
                        &param.raw(),
                        expected,
                        node.span,
                    ));
                }
            }
        }
        diagnostics
    }
}

/// Re-check the parameter text against the kind's own format, regardless of
/// which grammar branch produced it.
fn accepts(expected: ParamKind, param: &Parameter) -> bool {
    let raw = param.raw();
    match expected {
        ParamKind::None => false,
        ParamKind::Color => is_valid_color(&raw),
        ParamKind::Int => {
            !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) && raw.parse::<u32>().is_ok()
        }
    }
}
