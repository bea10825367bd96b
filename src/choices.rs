//! Closed choice lists derived from the registry.
//!
//! A [`SourceChoices`] is a snapshot of `(alias, title)` pairs for one realm,
//! used wherever a stored value must be one of the registered aliases.  It is
//! rebuilt on every [`SourceRegistry::choices`](crate::SourceRegistry::choices)
//! call; sources registered later do not show up in lists already handed out.

use serde::Serialize;

use crate::error::SourceError;

/// One member of a choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Stored value: the source alias.
    pub value: String,
    /// Display label: the source title.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceChoices {
    realm: String,
    choices: Vec<Choice>,
}

impl SourceChoices {
    /// Build a choice list, rejecting repeated values.
    pub fn from_pairs<I, V, L>(realm: impl Into<String>, pairs: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let realm = realm.into();
        let mut choices: Vec<Choice> = Vec::new();

        for (value, label) in pairs {
            let value = value.into();
            if choices.iter().any(|c| c.value == value) {
                return Err(SourceError::DuplicateChoice { realm, alias: value });
            }
            choices.push(Choice {
                value,
                label: label.into(),
            });
        }

        Ok(Self { realm, choices })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Check that `value` is a member, returning it.
    pub fn validate(&self, value: &str) -> Result<&Choice, SourceError> {
        self.choices
            .iter()
            .find(|c| c.value == value)
            .ok_or_else(|| SourceError::UnknownChoice {
                realm: self.realm.clone(),
                value: value.to_string(),
            })
    }

    pub fn contains(&self, value: &str) -> bool {
        self.validate(value).is_ok()
    }

    pub fn label(&self, value: &str) -> Option<&str> {
        self.validate(value).ok().map(|c| c.label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|c| c.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceChoices {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
