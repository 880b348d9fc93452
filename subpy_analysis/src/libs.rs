//! Library allow-list matching.
//!
//! Each allow-list entry is a dotted module name, optionally ending in `*`
//! to accept any suffix (`numpy.*` accepts `numpy.linalg`). All entries are
//! compiled into one anchored alternation, so a candidate must match an
//! entry in full.

use crate::error::{AnalysisError, AnalysisResult};
use regex::Regex;

/// Compiled library allow-list.
#[derive(Debug, Clone)]
pub struct LibraryMatcher {
    regex: Regex,
    patterns: Vec<String>,
}

impl LibraryMatcher {
    /// Compile an allow-list. Returns `Ok(None)` for an empty list, which
    /// disables library checking.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidLibraryPattern`] if the combined
    /// expression fails to compile.
    pub fn compile<I, S>(libraries: I) -> AnalysisResult<Option<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = libraries
            .into_iter()
            .map(|lib| lib.as_ref().trim().to_string())
            .filter(|lib| !lib.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(None);
        }

        let alternation = patterns
            .iter()
            .map(|p| translate(p))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!("^(?:{alternation})$");
        let regex =
            Regex::new(&source).map_err(|e| AnalysisError::InvalidLibraryPattern(e.to_string()))?;
        Ok(Some(Self { regex, patterns }))
    }

    /// True if `name` is allowed.
    #[inline]
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The allow-list entries as given.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn translate(pattern: &str) -> String {
    match pattern.strip_suffix('*') {
        Some(prefix) => format!("{}.*", regex::escape(prefix)),
        None => regex::escape(pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(libs: &[&str]) -> LibraryMatcher {
        LibraryMatcher::compile(libs).unwrap().unwrap()
    }

    #[test]
    fn test_empty_list_disables() {
        assert!(LibraryMatcher::compile(Vec::<String>::new()).unwrap().is_none());
        assert!(LibraryMatcher::compile(["", "  "]).unwrap().is_none());
    }

    #[test]
    fn test_literal_is_full_match() {
        let m = matcher(&["numpy"]);
        assert!(m.matches("numpy"));
        assert!(!m.matches("numpy.linalg"));
        assert!(!m.matches("numpyx"));
        assert!(!m.matches("xnumpy"));
    }

    #[test]
    fn test_dots_are_literal() {
        let m = matcher(&["os.path"]);
        assert!(m.matches("os.path"));
        assert!(!m.matches("osXpath"));
    }

    #[test]
    fn test_wildcard_suffix() {
        let m = matcher(&["numpy.*", "math"]);
        assert!(m.matches("numpy.linalg"));
        assert!(m.matches("numpy.linalg.norm"));
        assert!(m.matches("math"));
        assert!(!m.matches("numpy"));
        assert!(!m.matches("scipy.linalg"));
        assert_eq!(m.patterns(), &["numpy.*".to_string(), "math".to_string()]);
    }

    #[test]
    fn test_bare_star_accepts_everything() {
        let m = matcher(&["*"]);
        assert!(m.matches("anything.at.all"));
    }
}
