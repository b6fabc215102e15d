//! Field rules
//!
//! Every field of a rule-set is checked by one [`Rule`]: a predicate over the
//! field's raw string value. A rejected value produces a [`RuleViolation`] whose
//! message always quotes the offending value.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Date format accepted by [`Rule::Date`] (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    /// A single non-negative integer, or a bracketed `, ` separated list of them
    static ref REFERENCE_LIST: Regex = Regex::new(r"^(?:[0-9]+|\[[0-9]+(?:, [0-9]+)*\])$")
        .expect("reference list pattern is valid");
}

/// A rejected field value
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct RuleViolation {
    pub message: String,
}

impl RuleViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A predicate over a front-matter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Any value is accepted
    Any,
    /// The value must be one of the listed strings (case-sensitive)
    OneOf(Vec<String>),
    /// The value must be a calendar date in [`DATE_FORMAT`]
    Date,
    /// The value must be `N` or `[N, M, ...]`
    ReferenceList,
}

impl Rule {
    /// Convenience constructor for [`Rule::OneOf`]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Check `value` for the field called `field`.
    ///
    /// The field name only feeds the violation message.
    pub fn check(&self, field: &str, value: &str) -> Result<(), RuleViolation> {
        match self {
            Rule::Any => Ok(()),
            Rule::OneOf(allowed) => {
                if allowed.iter().any(|a| a == value) {
                    Ok(())
                } else {
                    Err(RuleViolation::new(format!(
                        "invalid {} '{}' (expected one of: {})",
                        field,
                        value,
                        allowed.join(", ")
                    )))
                }
            }
            Rule::Date => {
                if is_valid_date(value) {
                    Ok(())
                } else {
                    Err(RuleViolation::new(format!(
                        "invalid {} '{}' (expected a date in YYYY-MM-DD format)",
                        field, value
                    )))
                }
            }
            Rule::ReferenceList => {
                if is_reference_list(value) {
                    Ok(())
                } else {
                    Err(RuleViolation::new(format!(
                        "invalid {} '{}' (expected a number or a list like [1, 2])",
                        field, value
                    )))
                }
            }
        }
    }
}

/// Returns true if `value` is a calendar date written exactly as [`DATE_FORMAT`]
///
/// chrono's parser also takes unpadded fields and signed years, so the parsed
/// date must format back to the same text.
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == value)
}

/// Returns true if `value` is `N` or `[N, M, ...]` with exactly one space after each comma
pub fn is_reference_list(value: &str) -> bool {
    REFERENCE_LIST.is_match(value)
}
