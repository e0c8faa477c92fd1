//! Template catalog — pairs marker names with instantiable prefabs.
//!
//! The catalog is owned by the hosting application and shared with the
//! lifecycle manager. Name matching is case-insensitive, so a template named
//! `"Target"` serves markers reported as `"target"` or `"TARGET"`.

use crate::config::TemplateMatch;
use crate::error::CatalogError;

/// Case-insensitive marker name comparison.
///
/// ASCII names take the fast path; anything else is compared by Unicode
/// lowercase mapping.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// A catalog entry: a marker name and the prefab instantiated for it.
#[derive(Debug, Clone)]
pub struct MarkerTemplate<P> {
    /// Reference image name this template serves.
    pub name: String,
    /// Engine-specific blueprint handed to [`crate::Scene::instantiate`].
    pub prefab: P,
}

impl<P> MarkerTemplate<P> {
    pub fn new(name: impl Into<String>, prefab: P) -> Self {
        Self {
            name: name.into(),
            prefab,
        }
    }

    pub fn matches(&self, marker_name: &str) -> bool {
        names_match(&self.name, marker_name)
    }
}

/// Immutable, ordered set of templates.
#[derive(Debug, Clone)]
pub struct Catalog<P> {
    templates: Vec<MarkerTemplate<P>>,
}

impl<P> Catalog<P> {
    pub fn new(templates: Vec<MarkerTemplate<P>>) -> Result<Self, CatalogError> {
        if let Some(index) = templates.iter().position(|t| t.name.is_empty()) {
            return Err(CatalogError::EmptyName(index));
        }
        Ok(Self { templates })
    }

    /// First pair of templates whose names match the same markers.
    pub fn ambiguity(&self) -> Option<(&str, &str)> {
        self.templates.iter().enumerate().find_map(|(i, first)| {
            self.templates[i + 1..]
                .iter()
                .find(|t| first.matches(&t.name))
                .map(|second| (first.name.as_str(), second.name.as_str()))
        })
    }

    /// Check the catalog can be used under `rule`.
    pub fn validate(&self, rule: TemplateMatch) -> Result<(), CatalogError> {
        if rule != TemplateMatch::ErrorOnAmbiguous {
            return Ok(());
        }
        match self.ambiguity() {
            Some((first, second)) => Err(CatalogError::AmbiguousTemplate {
                first: first.to_owned(),
                second: second.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Resolve the template for a detected marker name.
    pub fn lookup(&self, marker_name: &str, rule: TemplateMatch) -> Option<&MarkerTemplate<P>> {
        let mut candidates = self.templates.iter().filter(|t| t.matches(marker_name));
        match rule {
            TemplateMatch::FirstMatch | TemplateMatch::ErrorOnAmbiguous => candidates.next(),
            TemplateMatch::LastMatch => candidates.last(),
        }
    }

    pub fn templates(&self) -> &[MarkerTemplate<P>] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
