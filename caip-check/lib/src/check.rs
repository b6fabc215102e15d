//! Folder and document checks
//!
//! [`check_folder`] walks the immediate `.md` files of a folder in file name
//! order and applies a [`CheckConfig`] to each one. The first problem aborts the
//! run; there is no partial summary.

use crate::config::{CheckConfig, FieldRule};
use crate::error::CheckError;
use crate::frontmatter::{Frontmatter, parse_document};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Result of a successful folder check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// The folder that was checked
    pub folder: PathBuf,
    /// Plural name of the document kind, e.g. `CAIPs`
    pub kind: String,
    /// File names of the checked documents, in check order
    pub documents: Vec<String>,
}

impl CheckSummary {
    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {} passed validation",
            self.count(),
            self.kind,
            self.folder.display()
        )
    }
}

/// Check every document in `folder` against `config`.
///
/// Only regular files with an `.md` extension directly inside `folder` are
/// documents. Subdirectories and other files are skipped.
///
/// # Errors
///
/// * `FolderNotFound` - `folder` is missing or not a directory
/// * `Io` - the folder or a document could not be read
/// * `Parse`, `MissingField`, `InvalidValue` - the first invalid document
///
/// # Example
///
/// ```no_run
/// use caip_check_lib::{CheckConfig, check_folder};
/// use std::path::Path;
///
/// let summary = check_folder(Path::new("CAIPs"), &CheckConfig::caip()).unwrap();
/// println!("{}", summary);
/// ```
pub fn check_folder(folder: &Path, config: &CheckConfig) -> Result<CheckSummary, CheckError> {
    if !folder.is_dir() {
        return Err(CheckError::FolderNotFound(folder.to_path_buf()));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file() || !is_markdown(path) {
            debug!("Skipping non-document entry: {}", path.display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        check_document(&name, &content, config)?;
        debug!("Document {} passed", name);
        documents.push(name);
    }

    let summary = CheckSummary {
        folder: folder.to_path_buf(),
        kind: config.display_plural(),
        documents,
    };
    info!(
        documents = summary.count(),
        folder = %folder.display(),
        "Folder check passed"
    );

    Ok(summary)
}

/// Check a single document's content.
///
/// `name` is the document's file name; it labels errors and, when it follows
/// the `<prefix>-<n>.md` pattern, is compared with the document's own
/// `<prefix>` field.
///
/// Presence of every required field is checked first. Then each required
/// field, followed by each optional field that is present, is checked against
/// its rule in rule-set order. Fields the rule-set does not mention are ignored.
pub fn check_document(
    name: &str,
    content: &str,
    config: &CheckConfig,
) -> Result<Frontmatter, CheckError> {
    let (frontmatter, _body) = parse_document(content).map_err(|source| CheckError::Parse {
        document: name.to_string(),
        source,
    })?;

    // A missing field is reported even when an earlier field is also invalid
    if let Some(missing) = config
        .required()
        .iter()
        .find(|field| !frontmatter.contains(&field.name))
    {
        return Err(CheckError::MissingField {
            document: name.to_string(),
            field: missing.name.clone(),
        });
    }

    let present = config
        .required()
        .iter()
        .chain(config.optional_fields())
        .filter_map(|field| frontmatter.get(&field.name).map(|value| (field, value)));
    for (field, value) in present {
        apply_rule(name, field, value)?;
    }

    check_document_number(name, &frontmatter, config.prefix())?;

    Ok(frontmatter)
}

fn apply_rule(document: &str, field: &FieldRule, value: &str) -> Result<(), CheckError> {
    field
        .rule
        .check(&field.name, value)
        .map_err(|violation| CheckError::InvalidValue {
            document: document.to_string(),
            field: field.name.clone(),
            value: value.to_string(),
            reason: violation.message,
        })
}

/// A document named `<prefix>-<n>.md` that carries a `<prefix>` field must
/// carry `n` there.
fn check_document_number(
    name: &str,
    frontmatter: &Frontmatter,
    prefix: &str,
) -> Result<(), CheckError> {
    let Some(expected) = number_from_file_name(name, prefix) else {
        return Ok(());
    };
    let Some(value) = frontmatter.get(prefix) else {
        return Ok(());
    };

    if value.parse::<u64>().ok() == Some(expected) {
        return Ok(());
    }

    Err(CheckError::InvalidValue {
        document: name.to_string(),
        field: prefix.to_string(),
        value: value.to_string(),
        reason: format!(
            "invalid {} '{}' (file name says {})",
            prefix, value, expected
        ),
    })
}

fn number_from_file_name(name: &str, prefix: &str) -> Option<u64> {
    let stem = name.strip_suffix(".md")?;
    let digits = stem.strip_prefix(prefix)?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn doc(fields: &str) -> String {
        format!("---\n{}---\n\n## Simple Summary\n", fields)
    }

    const VALID: &str = "title: Test\nstatus: Draft\ntype: Standard\nauthor: Someone\ncreated: 2023-01-01\n";

    #[test]
    fn test_valid_document() {
        let fm = check_document("caip-1.md", &doc(VALID), &CheckConfig::caip()).unwrap();
        assert_eq!(fm.get("status"), Some("Draft"));
    }

    #[test]
    fn test_invalid_status_names_value() {
        let content = doc(&VALID.replace("Draft", "Obsolete"));
        let err = check_document("caip-1.md", &content, &CheckConfig::caip()).unwrap_err();
        match &err {
            CheckError::InvalidValue { field, value, .. } => {
                assert_eq!(field, "status");
                assert_eq!(value, "Obsolete");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
        assert!(err.to_string().contains("Obsolete"));
        assert!(err.to_string().contains("caip-1.md"));
    }

    #[test]
    fn test_missing_field_reported_regardless_of_other_fields() {
        let content = doc("title: Test\nstatus: Obsolete\ntype: Nonsense\ncreated: nope\n");
        let err = check_document("caip-1.md", &content, &CheckConfig::caip()).unwrap_err();
        assert!(matches!(err, CheckError::MissingField { ref field, .. } if field == "author"));
    }

    #[test]
    fn test_rules_applied_in_rule_set_order() {
        let content = doc("title: Test\nstatus: Draft\ntype: Nonsense\nauthor: a\ncreated: nope\n");
        let err = check_document("caip-1.md", &content, &CheckConfig::caip()).unwrap_err();
        assert!(matches!(err, CheckError::InvalidValue { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_missing_each_required_field() {
        for missing in ["title", "status", "type", "author", "created"] {
            let fields: String = VALID
                .lines()
                .filter(|line| !line.starts_with(&format!("{}:", missing)))
                .map(|line| format!("{}\n", line))
                .collect();
            let err = check_document("caip-1.md", &doc(&fields), &CheckConfig::caip()).unwrap_err();
            match err {
                CheckError::MissingField { field, document } => {
                    assert_eq!(field, missing);
                    assert_eq!(document, "caip-1.md");
                }
                other => panic!("Expected MissingField for {}, got {:?}", missing, other),
            }
        }
    }

    #[test]
    fn test_optional_fields_validated_when_present() {
        let config = CheckConfig::caip();

        let ok = doc(&format!("{}requires: [1, 2]\nupdated: 2024-02-29\n", VALID));
        assert!(check_document("caip-3.md", &ok, &config).is_ok());

        let bad = doc(&format!("{}requires: [1,2]\n", VALID));
        let err = check_document("caip-3.md", &bad, &config).unwrap_err();
        assert!(matches!(err, CheckError::InvalidValue { ref field, .. } if field == "requires"));

        let bad = doc(&format!("{}updated: 2024-02-30\n", VALID));
        let err = check_document("caip-3.md", &bad, &config).unwrap_err();
        assert!(matches!(err, CheckError::InvalidValue { ref field, .. } if field == "updated"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let content = doc(&format!("{}replaces: anything\nx-custom: [1,2]\n", VALID));
        assert!(check_document("caip-1.md", &content, &CheckConfig::caip()).is_ok());
    }

    #[test]
    fn test_parse_error_names_document() {
        let err = check_document("caip-9.md", "no front-matter", &CheckConfig::caip()).unwrap_err();
        assert!(matches!(err, CheckError::Parse { .. }));
        assert_eq!(err.document(), Some("caip-9.md"));
    }

    #[test]
    fn test_document_number_matches_file_name() {
        let content = doc(&format!("caip: 10\n{}", VALID));
        assert!(check_document("caip-10.md", &content, &CheckConfig::caip()).is_ok());
    }

    #[test]
    fn test_document_number_mismatch() {
        let content = doc(&format!("caip: 11\n{}", VALID));
        let err = check_document("caip-10.md", &content, &CheckConfig::caip()).unwrap_err();
        match err {
            CheckError::InvalidValue { field, value, reason, .. } => {
                assert_eq!(field, "caip");
                assert_eq!(value, "11");
                assert!(reason.contains("10"));
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_document_number_ignored_for_other_file_names() {
        let content = doc(&format!("caip: 11\n{}", VALID));
        assert!(check_document("draft.md", &content, &CheckConfig::caip()).is_ok());
        assert!(check_document("caip-x.md", &content, &CheckConfig::caip()).is_ok());
    }

    #[test]
    fn test_number_from_file_name() {
        assert_eq!(number_from_file_name("caip-2.md", "caip"), Some(2));
        assert_eq!(number_from_file_name("caip-002.md", "caip"), Some(2));
        assert_eq!(number_from_file_name("caip-.md", "caip"), None);
        assert_eq!(number_from_file_name("caip-2.txt", "caip"), None);
        assert_eq!(number_from_file_name("eip-2.md", "caip"), None);
        assert_eq!(number_from_file_name("caip-+2.md", "caip"), None);
    }

    #[test]
    fn test_summary_display() {
        let summary = CheckSummary {
            folder: PathBuf::from("CAIPs"),
            kind: "CAIPs".to_string(),
            documents: vec!["caip-1.md".to_string(), "caip-2.md".to_string()],
        };
        assert_eq!(summary.to_string(), "2 CAIPs in CAIPs passed validation");
    }

    #[test]
    fn test_missing_folder() {
        let err = check_folder(Path::new("/no/such/folder"), &CheckConfig::caip()).unwrap_err();
        assert!(matches!(err, CheckError::FolderNotFound(_)));
    }

    #[traced_test]
    #[test]
    fn test_folder_check_logs_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("caip-1.md"), doc(VALID)).unwrap();

        let summary = check_folder(dir.path(), &CheckConfig::caip()).unwrap();
        assert_eq!(summary.count(), 1);
        assert!(logs_contain("Folder check passed"));
    }
}
