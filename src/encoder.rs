//! Depth-first encoding of the structural feature tree.
//!
//! Each feature element registers one boolean variable and contributes zero or
//! more constraints: the root feature is asserted outright, every other
//! feature implies its parent, mandatory features are additionally implied by
//! their parent, and compound features contribute a group constraint over
//! their children. `abstract` and `hidden` flags are accepted but carry no
//! semantic weight, as does any metadata child element (descriptions,
//! graphics, and so on).

use tracing::debug;

use crate::{
    document::{DocumentError, Element},
    expr::Expr,
    registry::{self, FeatureName, InvalidFeatureNameError, Literal, VariableRegistry},
};

const FEATURE: &str = "feature";
const AND: &str = "and";
const OR: &str = "or";
const ALT: &str = "alt";

const NAME: &str = "name";
const MANDATORY: &str = "mandatory";
const ABSTRACT: &str = "abstract";
const HIDDEN: &str = "hidden";

/// The sibling-group semantics of a compound feature.
///
/// The group kind is carried by the element tag itself: `and`, `or`, and `alt`
/// elements are compound features, `feature` elements are leaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// No constraint beyond each child's own mandatory/optional implication.
    And,
    /// At least one child must be selected when the owner is selected.
    Or,
    /// Exactly one child must be selected when the owner is selected.
    Alternative,
}

impl GroupKind {
    /// Maps a compound-feature tag to its group kind.
    ///
    /// Returns `None` for leaf features and non-feature tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            AND => Some(Self::And),
            OR => Some(Self::Or),
            ALT => Some(Self::Alternative),
            _ => None,
        }
    }
}

/// Returns `true` if `tag` denotes a feature element (leaf or compound).
fn is_feature_tag(tag: &str) -> bool {
    tag == FEATURE || GroupKind::from_tag(tag).is_some()
}

/// Errors raised while encoding the structural subtree.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A feature name was registered twice, or a literal could not be issued.
    #[error(transparent)]
    Registry(#[from] registry::Error),

    /// A feature element is missing its `name` or carries a malformed flag.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A feature carries an empty name.
    #[error(transparent)]
    Name(#[from] InvalidFeatureNameError),
}

/// Encodes the structural subtree rooted at `structure`.
///
/// Every feature element below `structure` registers a variable in `registry`
/// and appends its constraints to `constraints`, depth-first and pre-order.
/// An empty structural subtree contributes nothing.
///
/// # Errors
///
/// Returns an [`EncodeError`] on a duplicate feature name, a feature without a
/// `name` attribute, or a malformed boolean flag. Any error aborts the
/// translation; no partial result is exposed.
pub fn encode_structure(
    structure: &Element,
    registry: &mut VariableRegistry,
    constraints: &mut Vec<Expr>,
) -> Result<(), EncodeError> {
    for child in structure.children() {
        if is_feature_tag(child.name()) {
            encode_feature(child, None, registry, constraints)?;
        }
    }
    Ok(())
}

/// Encodes one feature element and, recursively, its children.
///
/// Registers the feature's variable, appends its parent implication (or the
/// root assertion when `parent` is `None`), recurses into child features
/// passing this feature's literal down, and finally appends the group
/// constraint once all child literals are collected. Returns this feature's
/// literal so the caller can use it as the parent reference one level up.
///
/// # Errors
///
/// See [`encode_structure`].
pub fn encode_feature(
    element: &Element,
    parent: Option<&Literal>,
    registry: &mut VariableRegistry,
    constraints: &mut Vec<Expr>,
) -> Result<Literal, EncodeError> {
    let name = FeatureName::new(element.required_attribute(NAME)?.to_string())?;
    if registry.has_variable(&name) {
        return Err(registry::Error::Duplicate(name).into());
    }
    registry.add_boolean_variable(name.clone())?;
    let literal = registry.literal(&name)?;

    let mandatory = element.bool_attribute(MANDATORY)?;
    // Accepted but without semantic weight.
    element.bool_attribute(ABSTRACT)?;
    element.bool_attribute(HIDDEN)?;

    if let Some(parent) = parent {
        constraints.push(Expr::implies(literal.clone().into(), parent.clone().into()));
        if mandatory {
            constraints.push(Expr::implies(parent.clone().into(), literal.clone().into()));
        }
    } else {
        // The root feature is always selected.
        constraints.push(Expr::Literal(literal.clone()));
    }
    debug!(feature = %name, mandatory, "registered feature");

    let mut child_literals = Vec::new();
    for child in element.children() {
        if is_feature_tag(child.name()) {
            child_literals.push(encode_feature(child, Some(&literal), registry, constraints)?);
        }
        // Anything else (description, graphics, ...) is metadata.
    }

    if let Some(kind) = GroupKind::from_tag(element.name()) {
        encode_group(kind, &literal, &child_literals, constraints);
    }

    Ok(literal)
}

/// Appends the group constraint for a compound feature.
///
/// `owner` is the compound feature's own literal and `children` the ordered
/// literals of its child features, whose parent implications have already been
/// appended by [`encode_feature`].
pub fn encode_group(
    kind: GroupKind,
    owner: &Literal,
    children: &[Literal],
    constraints: &mut Vec<Expr>,
) {
    let child_exprs = || children.iter().cloned().map(Expr::Literal);
    match kind {
        GroupKind::And => {}
        GroupKind::Or => {
            constraints.push(Expr::implies(owner.clone().into(), Expr::or(child_exprs())));
        }
        GroupKind::Alternative => {
            if let [only] = children {
                constraints.push(Expr::implies(owner.clone().into(), only.clone().into()));
            } else {
                constraints.push(Expr::and([
                    Expr::implies(owner.clone().into(), Expr::or(child_exprs())),
                    Expr::at_most_one(children),
                ]));
            }
        }
    }
}
