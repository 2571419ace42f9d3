//! Selector resolution
//!
//! Turns a [`FieldDescriptor`] into a compound CSS selector and looks it up on
//! the page.

use crate::browser::{BrowserSession, Element};
use crate::core::{FieldDescriptor, FormError, Result};

/// Resolves field descriptors against a live page
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorResolver;

impl SelectorResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compound selector for a descriptor, in class, id, name, value order.
    ///
    /// Returns `None` when no fragment is present.
    pub fn compose(descriptor: &FieldDescriptor) -> Option<String> {
        let mut selector = String::new();

        if let Some(class) = &descriptor.class {
            selector.push('.');
            selector.push_str(class);
        }
        if let Some(id) = &descriptor.id {
            selector.push('#');
            selector.push_str(id);
        }
        if let Some(name) = &descriptor.name {
            selector.push_str(&format!("[name=\"{}\"]", name));
        }
        if let Some(value) = &descriptor.value {
            selector.push_str(&format!("[value=\"{}\"]", value));
        }

        if selector.is_empty() {
            None
        } else {
            Some(selector)
        }
    }

    /// Resolve a descriptor to the first matching element.
    ///
    /// Several matches are not disambiguated: the page's first match wins.
    /// An empty descriptor fails without querying the page.
    pub async fn resolve(
        &self,
        descriptor: &FieldDescriptor,
        session: &mut dyn BrowserSession,
    ) -> Result<Element> {
        let selector = Self::compose(descriptor).ok_or(FormError::EmptyDescriptor)?;
        session.find_element(&selector).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_single_fragments() {
        assert_eq!(
            SelectorResolver::compose(&FieldDescriptor::by_class("newsletter")),
            Some(".newsletter".to_string())
        );
        assert_eq!(
            SelectorResolver::compose(&FieldDescriptor::by_id("subBtn")),
            Some("#subBtn".to_string())
        );
        assert_eq!(
            SelectorResolver::compose(&FieldDescriptor::by_name("email")),
            Some("[name=\"email\"]".to_string())
        );
    }

    #[test]
    fn test_compose_fixed_order() {
        let descriptor = FieldDescriptor {
            value: Some("yes".to_string()),
            name: Some("consent".to_string()),
            id: Some("c1".to_string()),
            class: Some("opt".to_string()),
        };
        assert_eq!(
            SelectorResolver::compose(&descriptor).as_deref(),
            Some(".opt#c1[name=\"consent\"][value=\"yes\"]")
        );
    }

    #[test]
    fn test_compose_empty_descriptor() {
        assert_eq!(SelectorResolver::compose(&FieldDescriptor::default()), None);
    }
}
