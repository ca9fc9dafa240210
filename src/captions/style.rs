use crate::captions::template::Template;
use crate::errors::StyleError;

// @module: Caption style resolution

/// Outcome of resolving a requested style against a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleResolution {
    /// Style name to put on every dialogue record
    pub name: String,

    /// Set when the requested style was missing and the first declared one was used
    pub fallback_from: Option<String>,
}

impl StyleResolution {
    /// Whether the requested style had to be replaced
    pub fn is_fallback(&self) -> bool {
        self.fallback_from.is_some()
    }
}

/// Resolve `requested` against the styles declared in `template`.
///
/// A declared name is returned unchanged. Otherwise the first declared style
/// is used and the resolution records which name it replaced.
pub fn resolve_style(template: &Template, requested: &str) -> Result<StyleResolution, StyleError> {
    resolve_from_declared(template.declared_styles(), requested)
}

/// Same as [`resolve_style`] over a bare list of declared names
pub fn resolve_from_declared(declared: &[String], requested: &str) -> Result<StyleResolution, StyleError> {
    if declared.iter().any(|name| name == requested) {
        return Ok(StyleResolution {
            name: requested.to_string(),
            fallback_from: None,
        });
    }

    declared
        .first()
        .map(|first| StyleResolution {
            name: first.clone(),
            fallback_from: Some(requested.to_string()),
        })
        .ok_or(StyleError::NoStylesAvailable)
}
