//! What an analysis run permits.

use crate::error::AnalysisResult;
use crate::feature::{Feature, FeatureSet};
use crate::libs::LibraryMatcher;

/// Allowed features plus an optional library allow-list.
#[derive(Debug, Clone)]
pub struct Policy {
    features: FeatureSet,
    libraries: Option<LibraryMatcher>,
}

impl Policy {
    /// Allow `features` and every library.
    #[must_use]
    pub fn new(features: FeatureSet) -> Self {
        Self {
            features,
            libraries: None,
        }
    }

    /// Allow the whole catalog and every library.
    #[must_use]
    pub fn full() -> Self {
        Self::new(FeatureSet::full())
    }

    /// Restrict imports to `libraries`. An empty list keeps every library
    /// allowed.
    ///
    /// # Errors
    /// Returns [`crate::AnalysisError::InvalidLibraryPattern`] if the list
    /// does not compile.
    pub fn with_libraries<I, S>(mut self, libraries: I) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.libraries = LibraryMatcher::compile(libraries)?;
        Ok(self)
    }

    /// Allowed features.
    #[inline]
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Whether `feature` is allowed.
    #[inline]
    #[must_use]
    pub fn allows(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    /// The library matcher, if library checking is enabled.
    #[inline]
    #[must_use]
    pub fn libraries(&self) -> Option<&LibraryMatcher> {
        self.libraries.as_ref()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::full()
    }
}

impl From<FeatureSet> for Policy {
    fn from(features: FeatureSet) -> Self {
        Self::new(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_policy() {
        let policy = Policy::full();
        assert!(policy.features().is_full());
        assert!(policy.libraries().is_none());
        assert!(policy.allows(Feature::Exec));
    }

    #[test]
    fn test_with_libraries() {
        let policy = Policy::new(FeatureSet::EMPTY)
            .with_libraries(["math", "numpy.*"])
            .unwrap();
        assert!(!policy.allows(Feature::Lambda));
        let libs = policy.libraries().unwrap();
        assert!(libs.matches("numpy.fft"));
        assert!(!libs.matches("os"));
    }

    #[test]
    fn test_empty_libraries_stay_disabled() {
        let policy = Policy::full().with_libraries(Vec::<&str>::new()).unwrap();
        assert!(policy.libraries().is_none());
    }
}
