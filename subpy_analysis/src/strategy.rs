//! Report strategies: what happens when the walker finds a feature.
//!
//! - [`Detector`] records everything.
//! - [`Checker`] records features outside an allowed set.
//! - [`Validator`] fails on the first feature outside an allowed set.

use crate::error::{AnalysisError, AnalysisResult, Violation};
use crate::feature::{Feature, FeatureSet};
use rustc_hash::FxHashMap;

/// Location of a reported feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'s> {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
    /// Full text of the line.
    pub source_line: &'s str,
}

/// Receives the features found by a walk.
pub trait Reporter {
    /// Strategy name used in logs.
    const NAME: &'static str;

    /// Features the walker should not report.
    fn allowed(&self) -> FeatureSet;

    /// Handle one feature occurrence. An error aborts the walk.
    fn report(&mut self, feature: Feature, site: &Site<'_>) -> AnalysisResult<()>;
}

// =============================================================================
// Detection Result
// =============================================================================

/// Lines at which each feature occurs, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    sites: FxHashMap<Feature, Vec<usize>>,
}

impl DetectionResult {
    /// An empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence.
    pub fn record(&mut self, feature: Feature, line: usize) {
        self.sites.entry(feature).or_default().push(line);
    }

    /// Lines for `feature`, if it occurred.
    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<&[usize]> {
        self.sites.get(&feature).map(Vec::as_slice)
    }

    /// Whether `feature` occurred.
    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.sites.contains_key(&feature)
    }

    /// The set of features that occurred.
    #[must_use]
    pub fn features(&self) -> FeatureSet {
        self.sites.keys().copied().collect()
    }

    /// Number of distinct features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Features with their lines, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &[usize])> {
        Feature::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|lines| (f, lines)))
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Records every feature.
#[derive(Debug, Default)]
pub struct Detector {
    result: DetectionResult,
}

impl Detector {
    /// A detector with an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Features recorded so far.
    #[must_use]
    pub fn result(&self) -> &DetectionResult {
        &self.result
    }

    /// Consume the detector.
    #[must_use]
    pub fn into_result(self) -> DetectionResult {
        self.result
    }
}

impl Reporter for Detector {
    const NAME: &'static str = "detect";

    fn allowed(&self) -> FeatureSet {
        FeatureSet::EMPTY
    }

    fn report(&mut self, feature: Feature, site: &Site<'_>) -> AnalysisResult<()> {
        self.result.record(feature, site.line);
        Ok(())
    }
}

/// Records every feature outside an allowed set.
#[derive(Debug)]
pub struct Checker {
    allowed: FeatureSet,
    result: DetectionResult,
}

impl Checker {
    /// A checker permitting `allowed`.
    #[must_use]
    pub fn new(allowed: FeatureSet) -> Self {
        Self {
            allowed,
            result: DetectionResult::new(),
        }
    }

    /// Infractions recorded so far.
    #[must_use]
    pub fn result(&self) -> &DetectionResult {
        &self.result
    }

    /// Consume the checker.
    #[must_use]
    pub fn into_result(self) -> DetectionResult {
        self.result
    }
}

impl Reporter for Checker {
    const NAME: &'static str = "check";

    fn allowed(&self) -> FeatureSet {
        self.allowed
    }

    fn report(&mut self, feature: Feature, site: &Site<'_>) -> AnalysisResult<()> {
        if !self.allowed.contains(feature) {
            self.result.record(feature, site.line);
        }
        Ok(())
    }
}

/// Fails on the first feature outside an allowed set.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    allowed: FeatureSet,
}

impl Validator {
    /// A validator permitting `allowed`.
    #[must_use]
    pub fn new(allowed: FeatureSet) -> Self {
        Self { allowed }
    }
}

impl Reporter for Validator {
    const NAME: &'static str = "validate";

    fn allowed(&self) -> FeatureSet {
        self.allowed
    }

    fn report(&mut self, feature: Feature, site: &Site<'_>) -> AnalysisResult<()> {
        if self.allowed.contains(feature) {
            return Ok(());
        }
        Err(AnalysisError::FeatureNotSupported(Violation {
            feature,
            line: site.line,
            column: site.column,
            source_line: site.source_line.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: Site<'static> = Site {
        line: 2,
        column: 5,
        source_line: "    yield x",
    };

    #[test]
    fn test_detection_result_order() {
        let mut result = DetectionResult::new();
        result.record(Feature::Printing, 7);
        result.record(Feature::Generators, 3);
        result.record(Feature::Printing, 1);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get(Feature::Printing), Some(&[7, 1][..]));
        assert_eq!(result.get(Feature::Lambda), None);
        assert!(result.contains(Feature::Generators));

        let order: Vec<_> = result.iter().map(|(f, _)| f).collect();
        assert_eq!(order, vec![Feature::Generators, Feature::Printing]);
        assert_eq!(
            result.features(),
            FeatureSet::from(Feature::Generators) | Feature::Printing
        );
    }

    #[test]
    fn test_detector_records_everything() {
        let mut detector = Detector::new();
        assert!(detector.allowed().is_empty());
        detector.report(Feature::Generators, &SITE).unwrap();
        detector.report(Feature::Generators, &SITE).unwrap();
        assert_eq!(detector.result().get(Feature::Generators), Some(&[2, 2][..]));
    }

    #[test]
    fn test_checker_skips_allowed() {
        let mut checker = Checker::new(FeatureSet::from(Feature::Generators));
        checker.report(Feature::Generators, &SITE).unwrap();
        checker.report(Feature::Lambda, &SITE).unwrap();
        let result = checker.into_result();
        assert!(!result.contains(Feature::Generators));
        assert_eq!(result.get(Feature::Lambda), Some(&[2][..]));
    }

    #[test]
    fn test_validator_fails_fast() {
        let mut validator = Validator::new(FeatureSet::from(Feature::Lambda));
        assert!(validator.report(Feature::Lambda, &SITE).is_ok());

        let err = validator.report(Feature::Generators, &SITE).unwrap_err();
        let violation = err.violation().unwrap();
        assert_eq!(violation.feature, Feature::Generators);
        assert_eq!((violation.line, violation.column), (2, 5));
        assert_eq!(violation.source_line, "    yield x");
    }
}
