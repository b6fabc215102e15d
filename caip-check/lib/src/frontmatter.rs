//! Front-matter extraction for proposal documents
//!
//! A proposal starts with a `---` delimited block of `key: value` lines. This
//! module splits a document into that block and its body, and turns the block
//! into an ordered list of raw string fields. Values are kept verbatim (apart
//! from trimming and one pair of surrounding quotes) because the reference list
//! rule matches the literal text, e.g. `[1, 2]` versus `[1,2]`.

use thiserror::Error;

/// Errors that can occur while reading a document's front-matter
#[derive(Debug, Error, PartialEq)]
pub enum FrontmatterError {
    /// The document does not start with the front-matter delimiter (---)
    #[error("document must start with front-matter (---) on line 1")]
    MissingFrontmatter,

    /// The front-matter is missing the closing delimiter (---)
    #[error("front-matter is missing closing delimiter (---)")]
    UnclosedFrontmatter,

    /// A line inside the block is not a `key: value` pair
    #[error("malformed front-matter line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    /// The same key appears twice in the block
    #[error("duplicate front-matter field '{field}'")]
    DuplicateField { field: String },
}

/// Parsed front-matter of a single document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frontmatter {
    fields: Vec<(String, String)>,
}

impl Frontmatter {
    /// Looks up the raw value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the field is present (even with an empty value)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over fields in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a document into its raw front-matter block and body.
///
/// Returns `(block, body)`. The opening delimiter must be the first non-blank
/// content; the closing delimiter is the next line that holds only `---`
/// (trailing whitespace and CRLF endings are tolerated).
///
/// # Errors
///
/// * `MissingFrontmatter` - content does not start with `---`
/// * `UnclosedFrontmatter` - no closing `---` line was found
pub fn split_frontmatter(content: &str) -> Result<(&str, &str), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content).trim_start();

    let Some(after_dashes) = content.strip_prefix("---") else {
        return Err(FrontmatterError::MissingFrontmatter);
    };

    // The opening line must hold nothing but the delimiter
    let Some(newline) = after_dashes.find('\n') else {
        return Err(FrontmatterError::UnclosedFrontmatter);
    };
    if !after_dashes[..newline].trim().is_empty() {
        return Err(FrontmatterError::MissingFrontmatter);
    }
    let block_and_body = &after_dashes[newline + 1..];

    let mut offset = 0;
    for line in block_and_body.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let block = &block_and_body[..offset];
            let body = &block_and_body[offset + line.len()..];
            return Ok((block, body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::UnclosedFrontmatter)
}

/// Parse the `key: value` lines of a front-matter block.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers in errors
/// are 1-based and count from the first line of the block.
pub fn parse_block(block: &str) -> Result<Frontmatter, FrontmatterError> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for (idx, raw) in block.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || FrontmatterError::MalformedLine {
            line: idx + 1,
            content: line.to_string(),
        };

        let (key, value) = line.split_once(':').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed());
        }

        if fields.iter().any(|(existing, _)| existing == key) {
            return Err(FrontmatterError::DuplicateField {
                field: key.to_string(),
            });
        }

        fields.push((key.to_string(), unquote(value.trim()).to_string()));
    }

    Ok(Frontmatter { fields })
}

/// Parse a whole document, returning its front-matter and body.
pub fn parse_document(content: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let (block, body) = split_frontmatter(content)?;
    let frontmatter = parse_block(block)?;
    Ok((frontmatter, body))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
