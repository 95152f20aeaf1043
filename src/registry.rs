//! The variable registry: one boolean variable per feature name.
//!
//! A [`VariableRegistry`] is exclusively owned by a single translation run. It
//! is populated incrementally while the feature tree is walked and is never
//! pruned; registering the same name twice is a fatal error, not a silent
//! overwrite.

use std::{collections::BTreeMap, fmt, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated, non-empty feature name.
///
/// Feature names are case-sensitive and must be unique within one feature
/// model. The name doubles as the name of the boolean variable the feature is
/// encoded as.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeatureName(NonEmptyString);

impl FeatureName {
    /// Creates a new `FeatureName` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFeatureNameError`] if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidFeatureNameError> {
        let non_empty = NonEmptyString::new(s).map_err(|_| InvalidFeatureNameError)?;
        Ok(Self(non_empty))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FeatureName {
    type Error = InvalidFeatureNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FeatureName {
    type Error = InvalidFeatureNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for FeatureName {
    type Err = InvalidFeatureNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for FeatureName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a feature name is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Feature names must not be empty")]
pub struct InvalidFeatureNameError;

/// An opaque identity for a registered boolean variable.
///
/// Identities are assigned in registration order and are only meaningful
/// within the registry that issued them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    /// Returns the zero-based registration index of the variable.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A positive-polarity reference to a registered variable.
///
/// Literals are plain values: the same feature's literal is freely shared
/// between its parent implication, its group constraints, and any cross-tree
/// constraints that mention it. Negation is expressed by the caller wrapping
/// the literal in a negation node, never by the literal itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    var: VariableId,
    name: FeatureName,
}

impl Literal {
    /// The identity of the referenced variable.
    #[must_use]
    pub const fn var(&self) -> VariableId {
        self.var
    }

    /// The name of the referenced variable.
    #[must_use]
    pub const fn name(&self) -> &FeatureName {
        &self.name
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Errors raised by the variable registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A feature name collided with one that is already registered.
    #[error("Duplicate feature name!")]
    Duplicate(FeatureName),

    /// A literal was requested for a name that was never registered.
    #[error("unknown feature '{0}'")]
    Unknown(FeatureName),
}

/// Owns the set of boolean variables for one translation run.
///
/// The registry maps each feature name to an opaque [`VariableId`] and hands
/// out positive [`Literal`]s on demand. A fresh registry is required per input
/// document; registries must not be reused across translations.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    variables: BTreeMap<FeatureName, VariableId>,
}

impl VariableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` has already been registered.
    ///
    /// Pure lookup; no side effects.
    #[must_use]
    pub fn has_variable(&self, name: &FeatureName) -> bool {
        self.variables.contains_key(name)
    }

    /// Registers a new boolean variable for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] if `name` is already registered.
    pub fn add_boolean_variable(&mut self, name: FeatureName) -> Result<VariableId, Error> {
        if self.has_variable(&name) {
            return Err(Error::Duplicate(name));
        }
        let id = VariableId(self.variables.len());
        self.variables.insert(name, id);
        Ok(id)
    }

    /// Creates a positive literal referencing the variable registered for
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unknown`] if `name` was never registered.
    pub fn literal(&self, name: &FeatureName) -> Result<Literal, Error> {
        let var = self
            .variables
            .get(name)
            .copied()
            .ok_or_else(|| Error::Unknown(name.clone()))?;
        Ok(Literal {
            var,
            name: name.clone(),
        })
    }

    /// The number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
