//! Front-matter validation for CAIP proposal documents
//!
//! A folder of proposals is checked document by document: each file's
//! front-matter is parsed into raw `key: value` strings and every field named
//! by the rule-set is checked against its [`Rule`]. The first problem aborts the
//! run with a [`CheckError`] that names the document and the field.
//!
//! ```no_run
//! use caip_check_lib::{CheckConfig, check_folder};
//! use std::path::Path;
//!
//! match check_folder(Path::new("CAIPs"), &CheckConfig::caip()) {
//!     Ok(summary) => println!("{}", summary),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod rules;

pub use check::{CheckSummary, check_document, check_folder};
pub use config::{CheckConfig, CheckConfigBuilder, ConfigError, FieldRule};
pub use error::CheckError;
pub use frontmatter::{Frontmatter, FrontmatterError, parse_document};
pub use rules::{DATE_FORMAT, Rule, RuleViolation};
