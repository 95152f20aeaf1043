//! Generic element trees: the input boundary of the encoder.
//!
//! The encoder does not read bytes. It consumes an already-parsed tree of
//! named elements with string attributes, ordered children, and an optional
//! text payload — whatever parser produced it is out of scope. This module
//! provides that tree shape together with required-vs-optional lookup
//! semantics: a required lookup that finds nothing fails the whole
//! translation.

use std::collections::BTreeMap;

/// Errors raised while navigating an element tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A mandated child element is absent.
    #[error("element '{parent}' is missing required child '{tag}'")]
    MissingElement {
        /// Name of the element that was searched.
        parent: String,
        /// Tag of the missing child.
        tag: String,
    },

    /// A mandated attribute is absent.
    #[error("element '{element}' is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Name of the element that was searched.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// A boolean attribute holds something other than `true` or `false`.
    #[error("attribute '{attribute}' of element '{element}' is not a boolean: '{value}'")]
    InvalidAttribute {
        /// Name of the element carrying the attribute.
        element: String,
        /// Name of the offending attribute.
        attribute: String,
        /// The raw attribute value.
        value: String,
    },
}

/// One node in a parsed document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given tag name and no content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the text payload.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// The tag name of this element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The text payload of this element. Empty unless set.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All children, in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// All children with the given tag, in document order.
    pub fn children_named<'a, 'b>(&'a self, tag: &'b str) -> impl Iterator<Item = &'a Self> + use<'a, 'b> {
        self.children.iter().filter(move |child| child.name == tag)
    }

    /// The first child with the given tag, if any.
    #[must_use]
    pub fn optional_child(&self, tag: &str) -> Option<&Self> {
        self.children_named(tag).next()
    }

    /// The first child with the given tag.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingElement`] if no such child exists.
    pub fn required_child(&self, tag: &str) -> Result<&Self, DocumentError> {
        self.optional_child(tag)
            .ok_or_else(|| DocumentError::MissingElement {
                parent: self.name.clone(),
                tag: tag.to_string(),
            })
    }

    /// The value of the given attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The value of the given attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingAttribute`] if the attribute is absent.
    pub fn required_attribute(&self, name: &str) -> Result<&str, DocumentError> {
        self.attribute(name)
            .ok_or_else(|| DocumentError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// The value of an optional boolean attribute.
    ///
    /// An absent attribute reads as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidAttribute`] if the attribute is present
    /// but holds neither `true` nor `false`.
    pub fn bool_attribute(&self, name: &str) -> Result<bool, DocumentError> {
        match self.attribute(name) {
            None => Ok(false),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(DocumentError::InvalidAttribute {
                element: self.name.clone(),
                attribute: name.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn sample() -> Element {
        Element::new("featureModel")
            .with_child(Element::new("struct").with_child(
                Element::new("feature").with_attribute("name", "Base"),
            ))
            .with_child(Element::new("constraints"))
            .with_child(Element::new("comments"))
    }

    #[test]
    fn required_child_finds_first_match() {
        let doc = sample();
        assert_eq!(doc.required_child("struct").unwrap().name(), "struct");
    }

    #[test]
    fn required_child_missing_is_an_error() {
        let doc = sample();
        let err = doc.required_child("calculations").unwrap_err();
        assert_eq!(
            err,
            DocumentError::MissingElement {
                parent: "featureModel".to_string(),
                tag: "calculations".to_string(),
            }
        );
    }

    #[test]
    fn optional_child_missing_is_none() {
        assert!(sample().optional_child("calculations").is_none());
    }

    #[test]
    fn children_named_preserves_document_order() {
        let doc = Element::new("rule")
            .with_child(Element::new("var").with_text("A"))
            .with_child(Element::new("other"))
            .with_child(Element::new("var").with_text("B"));

        let texts: Vec<_> = doc.children_named("var").map(Element::text).collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn required_attribute_missing_is_an_error() {
        let feature = Element::new("feature");
        let err = feature.required_attribute("name").unwrap_err();
        assert_eq!(
            err,
            DocumentError::MissingAttribute {
                element: "feature".to_string(),
                attribute: "name".to_string(),
            }
        );
    }

    #[test_case(None, Ok(false); "absent defaults to false")]
    #[test_case(Some("true"), Ok(true); "true value")]
    #[test_case(Some("false"), Ok(false); "false value")]
    fn bool_attribute_values(value: Option<&str>, expected: Result<bool, DocumentError>) {
        let mut feature = Element::new("feature");
        if let Some(value) = value {
            feature = feature.with_attribute("mandatory", value);
        }
        assert_eq!(feature.bool_attribute("mandatory"), expected);
    }

    #[test]
    fn bool_attribute_rejects_other_values() {
        let feature = Element::new("feature").with_attribute("mandatory", "yes");
        assert!(matches!(
            feature.bool_attribute("mandatory"),
            Err(DocumentError::InvalidAttribute { .. })
        ));
    }
}
