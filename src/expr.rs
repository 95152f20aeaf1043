//! Boolean expression trees over feature literals.
//!
//! Formulas are plain owned trees; there is no structural sharing and no
//! normalization. The neutral-element conventions matter for the encoder: a
//! conjunction with no operands is trivially true, a disjunction with no
//! operands is trivially false.

use std::fmt;

use crate::registry::Literal;

/// A node in a boolean expression tree.
///
/// Conjunction and disjunction are n-ary; implication and negation have fixed
/// arity. Literals are created through the
/// [`VariableRegistry`](crate::registry::VariableRegistry), so every literal in
/// a formula references a registered variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A positive reference to a registered variable.
    Literal(Literal),
    /// Logical negation of the operand.
    Not(Box<Expr>),
    /// N-ary conjunction. `And([])` is trivially true.
    And(Vec<Expr>),
    /// N-ary disjunction. `Or([])` is trivially false.
    Or(Vec<Expr>),
    /// Material implication, premise first.
    Implies(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Negates an expression.
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Builds an n-ary conjunction over `operands`.
    #[must_use]
    pub fn and(operands: impl IntoIterator<Item = Self>) -> Self {
        Self::And(operands.into_iter().collect())
    }

    /// Builds an n-ary disjunction over `operands`.
    #[must_use]
    pub fn or(operands: impl IntoIterator<Item = Self>) -> Self {
        Self::Or(operands.into_iter().collect())
    }

    /// Builds the implication `premise → conclusion`.
    #[must_use]
    pub fn implies(premise: Self, conclusion: Self) -> Self {
        Self::Implies(Box::new(premise), Box::new(conclusion))
    }

    /// Builds a pairwise "at most one" encoding over `literals`.
    ///
    /// The result is a conjunction of one clause `¬a ∨ ¬b` per unordered pair,
    /// forbidding any two of the literals from being selected simultaneously.
    /// With fewer than two literals there are no pairs and the result is the
    /// trivially true conjunction.
    #[must_use]
    pub fn at_most_one(literals: &[Literal]) -> Self {
        let mut clauses = Vec::new();
        for (i, a) in literals.iter().enumerate() {
            for b in &literals[i + 1..] {
                clauses.push(Self::or([
                    Self::not(Self::Literal(a.clone())),
                    Self::not(Self::Literal(b.clone())),
                ]));
            }
        }
        Self::And(clauses)
    }

    /// The number of direct sub-expressions of this node.
    ///
    /// Literals have no sub-expressions; an arity of zero therefore identifies
    /// a bare literal (or an empty connective, which the encoder never
    /// produces as a top-level entry).
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Literal(_) => 0,
            Self::Not(_) => 1,
            Self::Implies(_, _) => 2,
            Self::And(operands) | Self::Or(operands) => operands.len(),
        }
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

fn write_operands(f: &mut fmt::Formatter, operands: &[Expr], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {separator} ")?;
        }
        write!(f, "{operand}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Not(operand) => write!(f, "!{operand}"),
            Self::And(operands) if operands.is_empty() => write!(f, "true"),
            Self::Or(operands) if operands.is_empty() => write!(f, "false"),
            Self::And(operands) => write_operands(f, operands, "&"),
            Self::Or(operands) => write_operands(f, operands, "|"),
            Self::Implies(premise, conclusion) => write!(f, "({premise} -> {conclusion})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FeatureName, VariableRegistry};

    fn literals(names: &[&str]) -> Vec<Literal> {
        let mut registry = VariableRegistry::new();
        names
            .iter()
            .map(|s| {
                let name = FeatureName::try_from(*s).unwrap();
                registry.add_boolean_variable(name.clone()).unwrap();
                registry.literal(&name).unwrap()
            })
            .collect()
    }

    #[test]
    fn at_most_one_of_nothing_is_trivially_true() {
        assert_eq!(Expr::at_most_one(&[]), Expr::And(Vec::new()));
    }

    #[test]
    fn at_most_one_of_a_single_literal_is_trivially_true() {
        let lits = literals(&["A"]);
        assert_eq!(Expr::at_most_one(&lits), Expr::And(Vec::new()));
    }

    #[test]
    fn at_most_one_is_pairwise() {
        let lits = literals(&["A", "B", "C"]);
        let clause = |a: &Literal, b: &Literal| {
            Expr::or([
                Expr::not(a.clone().into()),
                Expr::not(b.clone().into()),
            ])
        };

        let expected = Expr::and([
            clause(&lits[0], &lits[1]),
            clause(&lits[0], &lits[2]),
            clause(&lits[1], &lits[2]),
        ]);
        assert_eq!(Expr::at_most_one(&lits), expected);
    }

    #[test]
    fn arity_counts_direct_operands() {
        let lits = literals(&["A", "B"]);
        let a = Expr::from(lits[0].clone());
        let b = Expr::from(lits[1].clone());

        assert_eq!(a.arity(), 0);
        assert_eq!(Expr::not(a.clone()).arity(), 1);
        assert_eq!(Expr::implies(a.clone(), b.clone()).arity(), 2);
        assert_eq!(Expr::and([a.clone(), b.clone()]).arity(), 2);
        assert_eq!(Expr::Or(Vec::new()).arity(), 0);
    }

    #[test]
    fn display_uses_neutral_element_names() {
        assert_eq!(Expr::And(Vec::new()).to_string(), "true");
        assert_eq!(Expr::Or(Vec::new()).to_string(), "false");
    }

    #[test]
    fn display_nested_formula() {
        let lits = literals(&["A", "B", "C"]);
        let formula = Expr::implies(
            lits[0].clone().into(),
            Expr::or([lits[1].clone().into(), Expr::not(lits[2].clone().into())]),
        );
        assert_eq!(formula.to_string(), "(A -> (B | !C))");
    }
}
