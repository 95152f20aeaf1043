//! Feature models as propositional formulas.
//!
//! A feature model is a tree of named features with structural constraints
//! (mandatory and optional children; and-, or-, and alternative-groups) plus a
//! separate list of cross-tree constraints. This crate translates such a
//! model, given as an already-parsed element tree, into one boolean formula
//! whose satisfying assignments are exactly the valid configurations.
//!
//! The translation is a one-directional structural encoding: no
//! satisfiability checking, no CNF normalization, no deduplication, and no
//! formula-to-document round-tripping.
//!
//! ```
//! use feature_formula::{Element, Translator};
//!
//! let document = Element::new("featureModel").with_child(
//!     Element::new("struct").with_child(
//!         Element::new("and")
//!             .with_attribute("name", "Base")
//!             .with_child(
//!                 Element::new("feature")
//!                     .with_attribute("name", "Core")
//!                     .with_attribute("mandatory", "true"),
//!             ),
//!     ),
//! );
//!
//! let formula = Translator::new().translate(&document).unwrap();
//! assert_eq!(formula.to_string(), "(false & (Core -> Base) & (Base -> Core))");
//! ```

pub mod constraints;
pub use constraints::ConstraintError;

pub mod document;
pub use document::{DocumentError, Element};

pub mod encoder;
pub use encoder::{EncodeError, GroupKind};

pub mod expr;
pub use expr::Expr;

pub mod registry;
pub use registry::{
    Error as RegistryError, FeatureName, InvalidFeatureNameError, Literal, VariableRegistry,
};

pub mod translate;
pub use translate::{Error, Translator};
