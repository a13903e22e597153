//! List filters understood by the control plane.

use std::fmt;

use crate::error::{Error, Result};

/// Longest display name the control plane accepts.
pub const MAX_DISPLAY_NAME_LEN: usize = 128;

/// Filter matching resources whose display name equals a given value.
///
/// Renders as `display_name=<name>`. Names containing whitespace, quotes
/// or filter operators are rendered quoted and escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayNameFilter {
    display_name: String,
}

impl DisplayNameFilter {
    pub fn new(display_name: impl Into<String>) -> Result<Self> {
        let display_name = display_name.into();
        validate_display_name(&display_name)?;
        Ok(Self { display_name })
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether `candidate` is what this filter selects.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.display_name == candidate
    }

    fn needs_quoting(&self) -> bool {
        self.display_name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | '=' | '<' | '>' | ':' | '(' | ')'))
    }
}

impl fmt::Display for DisplayNameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_quoting() {
            let escaped = self.display_name.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "display_name=\"{escaped}\"")
        } else {
            write!(f, "display_name={}", self.display_name)
        }
    }
}

/// Reject names the control plane would refuse.
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidDisplayName("must not be empty".to_string()));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(Error::InvalidDisplayName(format!(
            "{name:?} is longer than {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filter() {
        let filter = DisplayNameFilter::new("docs-index").unwrap();
        assert_eq!(filter.to_string(), "display_name=docs-index");
    }

    #[test]
    fn test_quoted_filter() {
        let filter = DisplayNameFilter::new(r#"my "docs" index"#).unwrap();
        assert_eq!(filter.to_string(), r#"display_name="my \"docs\" index""#);
    }

    #[test]
    fn test_matches_exact_only() {
        let filter = DisplayNameFilter::new("docs").unwrap();
        assert!(filter.matches("docs"));
        assert!(!filter.matches("docs2"));
        assert!(!filter.matches("Docs"));
    }

    #[test]
    fn test_rejects_empty_and_long_names() {
        assert!(DisplayNameFilter::new("").is_err());
        assert!(DisplayNameFilter::new("   ").is_err());
        assert!(DisplayNameFilter::new("x".repeat(129)).is_err());
        assert!(DisplayNameFilter::new("x".repeat(128)).is_ok());
    }
}
