//! Collection of cross-tree constraints.
//!
//! Cross-tree constraints are declared separately from the hierarchy, one
//! `rule` element each, and further restrict the valid configurations. Each
//! rule holds a single expression over already-registered variables, written
//! as nested connective elements: `var` (text payload is the feature name),
//! `not`, `conj`, `disj`, `imp`, and `eq`. Parsed expressions are appended to
//! the constraint list verbatim, in document order, after the entire
//! structural subtree.

use tracing::trace;

use crate::{
    document::Element,
    expr::Expr,
    registry::{self, FeatureName, InvalidFeatureNameError, VariableRegistry},
};

const RULE: &str = "rule";
const VAR: &str = "var";
const NOT: &str = "not";
const CONJ: &str = "conj";
const DISJ: &str = "disj";
const IMP: &str = "imp";
const EQ: &str = "eq";

/// Tags accepted inside a rule that carry no logical content.
const METADATA: &[&str] = &["description", "graphics", "tags"];

/// Errors raised while parsing cross-tree constraints.
///
/// All of them are fatal: a constraint referencing an unknown variable or
/// carrying malformed syntax aborts the whole translation.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    /// A constraint references a variable that was never registered.
    #[error(transparent)]
    Registry(#[from] registry::Error),

    /// A `var` element carries an empty name.
    #[error(transparent)]
    Name(#[from] InvalidFeatureNameError),

    /// An element is not a recognized logical connective.
    #[error("unknown connective '{tag}' in cross-tree constraint")]
    Connective {
        /// The unrecognized tag.
        tag: String,
    },

    /// A fixed-arity connective has the wrong number of operands.
    #[error("connective '{tag}' expects {expected} operands, found {found}")]
    Arity {
        /// The connective tag.
        tag: String,
        /// The arity the connective requires.
        expected: usize,
        /// The number of operands found.
        found: usize,
    },

    /// A rule does not hold exactly one expression.
    #[error("constraint rule must contain exactly one expression")]
    RuleShape,
}

/// Collects every rule below `element` into `constraints`, in document order.
///
/// Rules may only reference variables already present in `registry`; the
/// structural subtree must therefore be encoded first. Metadata attached to a
/// rule is accepted and ignored.
///
/// # Errors
///
/// Returns a [`ConstraintError`] if any rule references an unregistered
/// variable or has a malformed expression.
pub fn collect_constraints(
    element: &Element,
    registry: &VariableRegistry,
    constraints: &mut Vec<Expr>,
) -> Result<(), ConstraintError> {
    for rule in element.children_named(RULE) {
        let expression = rule_expression(rule, registry)?;
        trace!(%expression, "collected cross-tree constraint");
        constraints.push(expression);
    }
    Ok(())
}

/// Extracts the single expression of a rule, skipping metadata children.
fn rule_expression(rule: &Element, registry: &VariableRegistry) -> Result<Expr, ConstraintError> {
    let mut expressions = rule
        .children()
        .iter()
        .filter(|child| !METADATA.contains(&child.name()));

    let expression = expressions.next().ok_or(ConstraintError::RuleShape)?;
    if expressions.next().is_some() {
        return Err(ConstraintError::RuleShape);
    }
    parse_expression(expression, registry)
}

/// Recursively parses one connective element into an expression.
fn parse_expression(
    element: &Element,
    registry: &VariableRegistry,
) -> Result<Expr, ConstraintError> {
    match element.name() {
        VAR => {
            let name = FeatureName::new(element.text().trim().to_string())?;
            Ok(registry.literal(&name)?.into())
        }
        NOT => {
            let [operand] = operands::<1>(element)?;
            Ok(Expr::not(parse_expression(operand, registry)?))
        }
        CONJ => Ok(Expr::and(parse_operands(element, registry)?)),
        DISJ => Ok(Expr::or(parse_operands(element, registry)?)),
        IMP => {
            let [premise, conclusion] = operands::<2>(element)?;
            Ok(Expr::implies(
                parse_expression(premise, registry)?,
                parse_expression(conclusion, registry)?,
            ))
        }
        EQ => {
            let [lhs, rhs] = operands::<2>(element)?;
            let lhs = parse_expression(lhs, registry)?;
            let rhs = parse_expression(rhs, registry)?;
            // Biimplication, expressed as a pair of implications.
            Ok(Expr::and([
                Expr::implies(lhs.clone(), rhs.clone()),
                Expr::implies(rhs, lhs),
            ]))
        }
        tag => Err(ConstraintError::Connective {
            tag: tag.to_string(),
        }),
    }
}

/// The children of a fixed-arity connective, checked for arity.
fn operands<const N: usize>(element: &Element) -> Result<&[Element; N], ConstraintError> {
    element
        .children()
        .try_into()
        .map_err(|_| ConstraintError::Arity {
            tag: element.name().to_string(),
            expected: N,
            found: element.children().len(),
        })
}

/// Parses every child of an n-ary connective.
fn parse_operands(
    element: &Element,
    registry: &VariableRegistry,
) -> Result<Vec<Expr>, ConstraintError> {
    element
        .children()
        .iter()
        .map(|child| parse_expression(child, registry))
        .collect()
}
