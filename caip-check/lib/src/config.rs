//! Rule-set configuration
//!
//! A [`CheckConfig`] names the document kind (its prefix, e.g. `caip`) and holds
//! two ordered tables of field rules: fields every document must carry, and
//! fields that are checked only when present. The built-in CAIP rule-set is
//! available from [`CheckConfig::caip`]; other rule-sets are assembled with a
//! [`CheckConfigBuilder`] or loaded from YAML. Both routes check that the prefix
//! is set and that no field name repeats, so every `CheckConfig` is valid.

use crate::rules::Rule;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building or loading a rule-set
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule-set file could not be read
    #[error("failed to read rule-set {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule-set file is not valid YAML for a rule-set
    #[error("invalid rule-set YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document prefix is empty
    #[error("rule-set prefix cannot be empty")]
    EmptyPrefix,

    /// A rule name that is not one of `any`, `date`, `reference_list`
    #[error("unknown rule '{rule}' for field '{field}'")]
    UnknownRule { field: String, rule: String },

    /// A field is declared twice, or as both required and optional
    #[error("field '{field}' is declared more than once in the rule-set")]
    DuplicateField { field: String },
}

/// A field name paired with the rule its value must satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub rule: Rule,
}

/// The rule-set applied to every document of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    prefix: String,
    required: Vec<FieldRule>,
    optional: Vec<FieldRule>,
}

/// On-disk shape of a rule-set
///
/// `serde_yaml::Mapping` keeps key order, so fields are checked in the order
/// they are written.
#[derive(Debug, Deserialize)]
struct RawConfig {
    prefix: String,
    #[serde(default)]
    required: serde_yaml::Mapping,
    #[serde(default)]
    optional: serde_yaml::Mapping,
}

/// On-disk shape of a single rule: `any`, `date`, `reference_list` or
/// `{ one_of: [A, B] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Named(String),
    OneOf { one_of: Vec<String> },
}

impl RawRule {
    fn into_rule(self, field: &str) -> Result<Rule, ConfigError> {
        match self {
            RawRule::OneOf { one_of } => Ok(Rule::OneOf(one_of)),
            RawRule::Named(name) => match name.as_str() {
                "any" => Ok(Rule::Any),
                "date" => Ok(Rule::Date),
                "reference_list" => Ok(Rule::ReferenceList),
                _ => Err(ConfigError::UnknownRule {
                    field: field.to_string(),
                    rule: name,
                }),
            },
        }
    }
}

/// Collects field rules before they are checked and frozen into a [`CheckConfig`]
#[derive(Debug, Clone)]
pub struct CheckConfigBuilder {
    prefix: String,
    required: Vec<FieldRule>,
    optional: Vec<FieldRule>,
}

impl CheckConfigBuilder {
    /// Add a field that every document must carry
    pub fn require(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.required.push(FieldRule {
            name: name.into(),
            rule,
        });
        self
    }

    /// Add a field that is checked only when present
    pub fn optional(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.optional.push(FieldRule {
            name: name.into(),
            rule,
        });
        self
    }

    /// Check the rule-set's invariants and freeze it.
    ///
    /// # Errors
    ///
    /// * `EmptyPrefix` - the prefix is blank
    /// * `DuplicateField` - a name repeats within a table or appears in both
    pub fn build(self) -> Result<CheckConfig, ConfigError> {
        if self.prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let mut seen: Vec<&str> = Vec::new();
        for field in self.required.iter().chain(self.optional.iter()) {
            if seen.contains(&field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    field: field.name.clone(),
                });
            }
            seen.push(&field.name);
        }

        Ok(CheckConfig {
            prefix: self.prefix,
            required: self.required,
            optional: self.optional,
        })
    }
}

impl CheckConfig {
    /// Start a rule-set for documents named `<prefix>-<n>.md`
    pub fn builder(prefix: impl Into<String>) -> CheckConfigBuilder {
        CheckConfigBuilder {
            prefix: prefix.into(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// The CAIP rule-set
    ///
    /// | Field | Required | Rule |
    /// |---|---|---|
    /// | title | yes | any |
    /// | status | yes | Draft, Active, Review, Final, Superseded |
    /// | type | yes | Meta, Standard |
    /// | author | yes | any |
    /// | created | yes | date |
    /// | requires | no | reference list |
    /// | discussions-to | no | any |
    /// | superseded-by | no | any |
    /// | updated | no | date |
    pub fn caip() -> Self {
        Self::builder("caip")
            .require("title", Rule::Any)
            .require(
                "status",
                Rule::one_of(["Draft", "Active", "Review", "Final", "Superseded"]),
            )
            .require("type", Rule::one_of(["Meta", "Standard"]))
            .require("author", Rule::Any)
            .require("created", Rule::Date)
            .optional("requires", Rule::ReferenceList)
            .optional("discussions-to", Rule::Any)
            .optional("superseded-by", Rule::Any)
            .optional("updated", Rule::Date)
            .build()
            .expect("built-in CAIP rule-set has unique fields")
    }

    /// Parse a rule-set from YAML
    ///
    /// ```
    /// use caip_check_lib::{CheckConfig, Rule};
    ///
    /// let config = CheckConfig::from_yaml_str(
    ///     "prefix: eip\nrequired:\n  status: { one_of: [Draft, Final] }\noptional:\n  updated: date\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.prefix(), "eip");
    /// assert_eq!(config.required()[0].rule, Rule::one_of(["Draft", "Final"]));
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;

        let mut builder = Self::builder(raw.prefix);
        builder.required = field_rules(raw.required)?;
        builder.optional = field_rules(raw.optional)?;
        builder.build()
    }

    /// Read and parse a YAML rule-set file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn required(&self) -> &[FieldRule] {
        &self.required
    }

    pub fn optional_fields(&self) -> &[FieldRule] {
        &self.optional
    }

    /// Plural display name of the document kind, e.g. `CAIPs`
    pub fn display_plural(&self) -> String {
        format!("{}s", self.prefix.to_uppercase())
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::caip()
    }
}

fn field_rules(table: serde_yaml::Mapping) -> Result<Vec<FieldRule>, ConfigError> {
    table
        .into_iter()
        .map(|(name, rule)| {
            let name: String = serde_yaml::from_value(name)?;
            let raw: RawRule = serde_yaml::from_value(rule)?;
            let rule = raw.into_rule(&name)?;
            Ok(FieldRule { name, rule })
        })
        .collect()
}
