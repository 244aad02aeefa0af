//! Match and filter rules over probe results.
//!
//! A [`PredicateSet`] holds two independent [`RuleGroup`]s. Matchers list the
//! accepted values per field and fail closed when the result lacks the field;
//! filters list rejected values per field and never exclude on an absent field.
//! A result surfaces only when it passes both.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::probe::ProbeResult;

/// Errors raised while building rules from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    /// The field name is not a result field.
    #[error("unknown field '{name}' (expected one of: {})", Field::names().join(", "))]
    UnknownField {
        /// The rejected field name.
        name: String,
    },

    /// The value cannot be compared against the field's type.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue {
        /// The field the value was meant for.
        field: Field,
        /// The rejected raw value.
        value: String,
    },

    /// A `field=values` rule without `=`.
    #[error("invalid rule '{raw}': expected FIELD=VALUE[,VALUE...]")]
    MalformedRule {
        /// The raw rule text.
        raw: String,
    },
}

/// Result fields that rules can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    StatusCode,
    ContentLength,
    ContentType,
    ContentHash,
    Title,
    FaviconHash,
    CdnDetected,
    WafDetected,
}

impl Field {
    /// Every field, in output order.
    pub const ALL: [Self; 8] = [
        Self::StatusCode,
        Self::ContentLength,
        Self::ContentType,
        Self::ContentHash,
        Self::Title,
        Self::FaviconHash,
        Self::CdnDetected,
        Self::WafDetected,
    ];

    /// Returns the snake_case field name used in output and rules.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatusCode => "status_code",
            Self::ContentLength => "content_length",
            Self::ContentType => "content_type",
            Self::ContentHash => "content_hash",
            Self::Title => "title",
            Self::FaviconHash => "favicon_hash",
            Self::CdnDetected => "cdn_detected",
            Self::WafDetected => "waf_detected",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|field| field.as_str()).collect()
    }

    /// Reads this field from a result.
    #[must_use]
    pub fn value_of(self, result: &ProbeResult) -> Option<FieldValue> {
        match self {
            Self::StatusCode => result.status_code().map(FieldValue::from),
            Self::ContentLength => result.content_length().map(FieldValue::Int),
            Self::ContentType => result.content_type().map(FieldValue::from),
            Self::ContentHash => result.content_hash().map(FieldValue::from),
            Self::Title => result.title().map(FieldValue::from),
            Self::FaviconHash => result.favicon_hash().map(FieldValue::from),
            Self::CdnDetected => result.cdn_detected().map(FieldValue::Bool),
            Self::WafDetected => result.waf_detected().map(FieldValue::Bool),
        }
    }

    /// Parses a raw rule value into this field's value type.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError::InvalidValue`] when `raw` doesn't fit the type.
    pub fn parse_value(self, raw: &str) -> Result<FieldValue, PredicateError> {
        let invalid = || PredicateError::InvalidValue {
            field: self,
            value: raw.to_string(),
        };
        match self {
            Self::StatusCode | Self::ContentLength | Self::FaviconHash => raw
                .trim()
                .parse::<u64>()
                .map(FieldValue::Int)
                .map_err(|_| invalid()),
            Self::CdnDetected | Self::WafDetected => raw
                .trim()
                .parse::<bool>()
                .map(FieldValue::Bool)
                .map_err(|_| invalid()),
            Self::ContentType | Self::ContentHash | Self::Title => {
                Ok(FieldValue::from(raw.trim()))
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = PredicateError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PredicateError::UnknownField {
                name: name.to_string(),
            })
    }
}

/// A comparable field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldValue {
    Int(u64),
    Text(String),
    Bool(bool),
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Field-to-values rules. Empty groups constrain nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleGroup {
    rules: BTreeMap<Field, BTreeSet<FieldValue>>,
}

impl RuleGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds values for a field, merging with any already present.
    ///
    /// An empty `values` adds no constraint.
    pub fn insert<I, V>(&mut self, field: Field, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let mut values = values.into_iter().map(Into::into).peekable();
        if values.peek().is_none() {
            return;
        }
        self.rules.entry(field).or_default().extend(values);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<I, V>(mut self, field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.insert(field, values);
        self
    }

    /// Adds a `field=v1,v2` rule parsed from user input.
    ///
    /// # Errors
    ///
    /// Returns a [`PredicateError`] for a missing `=`, an unknown field, or
    /// a value that doesn't fit the field's type.
    pub fn insert_rule(&mut self, raw: &str) -> Result<(), PredicateError> {
        let Some((name, values)) = raw.split_once('=') else {
            return Err(PredicateError::MalformedRule {
                raw: raw.to_string(),
            });
        };
        let field: Field = name.parse()?;
        let parsed = values
            .split(',')
            .filter(|value| !value.trim().is_empty())
            .map(|value| field.parse_value(value))
            .collect::<Result<Vec<_>, _>>()?;
        self.insert(field, parsed);
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &BTreeSet<FieldValue>)> {
        self.rules.iter().map(|(field, values)| (*field, values))
    }
}

/// Returns `true` when every matcher field is present on the result with an
/// accepted value.
#[must_use]
pub fn matches(result: &ProbeResult, matchers: &RuleGroup) -> bool {
    matchers.iter().all(|(field, accepted)| {
        field
            .value_of(result)
            .is_some_and(|value| accepted.contains(&value))
    })
}

/// Returns `true` unless some filter field carries a rejected value.
#[must_use]
pub fn passes_filter(result: &ProbeResult, filters: &RuleGroup) -> bool {
    filters.iter().all(|(field, rejected)| {
        field
            .value_of(result)
            .is_none_or(|value| !rejected.contains(&value))
    })
}

/// Matchers and filters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    pub matchers: RuleGroup,
    pub filters: RuleGroup,
}

impl PredicateSet {
    #[must_use]
    pub fn new(matchers: RuleGroup, filters: RuleGroup) -> Self {
        Self { matchers, filters }
    }

    /// Returns `true` when the result should surface.
    #[must_use]
    pub fn accepts(&self, result: &ProbeResult) -> bool {
        matches(result, &self.matchers) && passes_filter(result, &self.filters)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty() && self.filters.is_empty()
    }
}
