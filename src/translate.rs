//! The translation driver.
//!
//! A [`Translator`] turns one parsed feature-model document into one
//! propositional formula. The driver encodes the required structural subtree,
//! collects the optional cross-tree constraints (which may reference any
//! variable registered by the structural pass), and finalizes the accumulated
//! constraint list into a single conjunction. Translation is all-or-nothing:
//! every error aborts the run and no partial formula is exposed.

use tracing::{debug, instrument};

use crate::{
    constraints::{collect_constraints, ConstraintError},
    document::{DocumentError, Element},
    encoder::{encode_structure, EncodeError},
    expr::Expr,
    registry::VariableRegistry,
};

const FEATURE_MODEL: &str = "featureModel";
const STRUCT: &str = "struct";
const CONSTRAINTS: &str = "constraints";

/// Any fatal translation failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is structurally incomplete or malformed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The structural subtree could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A cross-tree constraint could not be parsed.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Formulas cannot be written back to the feature-model format.
    #[error("serializing a formula back to a feature-model document is not supported")]
    Unsupported,
}

/// Translates one feature-model document into a propositional formula.
///
/// A translator holds the variable registry and the accumulating constraint
/// list for exactly one run; [`Translator::translate`] consumes it, so a fresh
/// instance is required per input document.
#[derive(Debug, Default)]
pub struct Translator {
    registry: VariableRegistry,
    constraints: Vec<Expr>,
}

impl Translator {
    /// Creates a translator with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates `document` into a single formula.
    ///
    /// The document root must be a `featureModel` element with a required
    /// `struct` child and an optional `constraints` child. The satisfying
    /// assignments of the returned formula are exactly the valid
    /// configurations of the model.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the document is missing mandated structure, a
    /// feature name is duplicated, or a cross-tree constraint is malformed or
    /// references an unknown variable.
    #[instrument(skip_all)]
    pub fn translate(mut self, document: &Element) -> Result<Expr, Error> {
        if document.name() != FEATURE_MODEL {
            return Err(DocumentError::MissingElement {
                parent: document.name().to_string(),
                tag: FEATURE_MODEL.to_string(),
            }
            .into());
        }

        let structure = document.required_child(STRUCT)?;
        encode_structure(structure, &mut self.registry, &mut self.constraints)?;

        if let Some(cross_tree) = document.optional_child(CONSTRAINTS) {
            collect_constraints(cross_tree, &self.registry, &mut self.constraints)?;
        }

        debug!(
            variables = self.registry.len(),
            constraints = self.constraints.len(),
            "feature model encoded"
        );
        Ok(finalize(self.constraints))
    }

    /// Writes a formula back into a feature-model document.
    ///
    /// The encoder is one-directional by design; this always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn serialize(_formula: &Expr) -> Result<Element, Error> {
        Err(Error::Unsupported)
    }
}

/// Collapses the accumulated constraint list into the final formula.
///
/// An empty list yields the neutral conjunction. Otherwise, a first entry
/// without sub-expressions — the root feature encoded as a standalone literal,
/// with no substructure contributing to it — is replaced by the empty
/// disjunction before the list is wrapped in one conjunction.
fn finalize(mut constraints: Vec<Expr>) -> Expr {
    if constraints.is_empty() {
        return Expr::And(Vec::new());
    }
    if constraints[0].arity() == 0 {
        constraints[0] = Expr::Or(Vec::new());
    }
    Expr::And(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FeatureName;

    fn feature(name: &str) -> Element {
        Element::new("feature").with_attribute("name", name)
    }

    fn var(name: &str) -> Element {
        Element::new("var").with_text(name)
    }

    /// A literal as it appears in translated output.
    fn literal(names: &[&str], name: &str) -> Expr {
        let mut registry = VariableRegistry::new();
        for n in names {
            registry
                .add_boolean_variable(FeatureName::try_from(*n).unwrap())
                .unwrap();
        }
        registry
            .literal(&FeatureName::try_from(name).unwrap())
            .unwrap()
            .into()
    }

    #[test]
    fn empty_model_is_the_neutral_conjunction() {
        let document = Element::new("featureModel")
            .with_child(Element::new("struct"))
            .with_child(Element::new("constraints"));

        let formula = Translator::new().translate(&document).unwrap();
        assert_eq!(formula, Expr::And(Vec::new()));
    }

    #[test]
    fn missing_struct_subtree_is_fatal() {
        let document = Element::new("featureModel");
        let err = Translator::new().translate(&document).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingElement { .. })
        ));
    }

    #[test]
    fn wrong_root_element_is_fatal() {
        let document = Element::new("configuration");
        let err = Translator::new().translate(&document).unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::MissingElement { .. })
        ));
    }

    #[test]
    fn constraints_subtree_is_optional() {
        let document = Element::new("featureModel")
            .with_child(Element::new("struct").with_child(feature("Base")));

        assert!(Translator::new().translate(&document).is_ok());
    }

    // Pins the exact output for a model that is nothing but a root feature:
    // the root's standalone literal has no sub-expressions, so finalization
    // replaces it with the empty disjunction.
    #[test]
    fn lone_root_literal_is_rewritten_to_the_empty_disjunction() {
        let document = Element::new("featureModel")
            .with_child(Element::new("struct").with_child(feature("Base")));

        let formula = Translator::new().translate(&document).unwrap();
        assert_eq!(formula, Expr::And(vec![Expr::Or(Vec::new())]));
    }

    #[test]
    fn first_entry_with_children_is_left_alone() {
        let document = Element::new("featureModel").with_child(
            Element::new("struct").with_child(
                Element::new("and")
                    .with_attribute("name", "Base")
                    .with_child(feature("A")),
            ),
        );

        let formula = Translator::new().translate(&document).unwrap();
        let Expr::And(entries) = formula else {
            panic!("expected a top-level conjunction");
        };
        // The root assertion is still a bare literal and is rewritten; the
        // parent implication that follows it is untouched.
        assert_eq!(entries[0], Expr::Or(Vec::new()));
        assert_eq!(
            entries[1],
            Expr::implies(literal(&["Base", "A"], "A"), literal(&["Base", "A"], "Base"))
        );
    }

    #[test]
    fn base_core_addon_scenario() {
        let names = &["Base", "Core", "Addon"];
        let document = Element::new("featureModel")
            .with_child(
                Element::new("struct").with_child(
                    Element::new("and")
                        .with_attribute("name", "Base")
                        .with_child(feature("Core").with_attribute("mandatory", "true"))
                        .with_child(feature("Addon")),
                ),
            )
            .with_child(
                Element::new("constraints").with_child(
                    Element::new("rule").with_child(
                        Element::new("imp")
                            .with_child(var("Addon"))
                            .with_child(var("Core")),
                    ),
                ),
            );

        let formula = Translator::new().translate(&document).unwrap();
        let expected = Expr::And(vec![
            // Root assertion `Base`, rewritten because it had no children.
            Expr::Or(Vec::new()),
            Expr::implies(literal(names, "Core"), literal(names, "Base")),
            Expr::implies(literal(names, "Base"), literal(names, "Core")),
            Expr::implies(literal(names, "Addon"), literal(names, "Base")),
            // The cross-tree constraint comes last.
            Expr::implies(literal(names, "Addon"), literal(names, "Core")),
        ]);
        assert_eq!(formula, expected);
    }

    #[test]
    fn constraint_on_unknown_feature_is_fatal() {
        let document = Element::new("featureModel")
            .with_child(Element::new("struct").with_child(feature("Base")))
            .with_child(
                Element::new("constraints")
                    .with_child(Element::new("rule").with_child(var("Ghost"))),
            );

        let err = Translator::new().translate(&document).unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));
    }

    #[test]
    fn duplicate_feature_name_is_fatal() {
        let document = Element::new("featureModel").with_child(
            Element::new("struct").with_child(
                Element::new("and")
                    .with_attribute("name", "Base")
                    .with_child(feature("Base")),
            ),
        );

        let err = Translator::new().translate(&document).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate feature name!");
    }

    #[test]
    fn serialization_is_unsupported() {
        let formula = Expr::And(Vec::new());
        assert!(matches!(
            Translator::serialize(&formula),
            Err(Error::Unsupported)
        ));
    }
}
