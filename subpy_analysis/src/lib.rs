//! # subpy analysis
//!
//! Classifies Python programs against a closed catalog of language features
//! and enforces feature and library allow-lists.
//!
//! Three entry points share one traversal:
//!
//! - [`detect`] reports every feature a program uses.
//! - [`check`] reports every use of a feature outside a [`Policy`].
//! - [`validate`] stops at the first feature or import outside a [`Policy`].
//!
//! ```
//! use subpy_analysis::{Feature, FeatureSet, Policy, detect, validate};
//!
//! let found = detect("def f():\n    yield 1\n").unwrap();
//! assert_eq!(found.get(Feature::Generators), Some(&[2][..]));
//!
//! let policy = Policy::new(FeatureSet::full() - Feature::Generators);
//! assert!(validate("def f():\n    yield 1\n", &policy).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod feature;
pub mod libs;
pub mod policy;
pub mod scope;
pub mod strategy;
pub mod walker;

pub use error::{AnalysisError, AnalysisResult, ImportSite, Violation};
pub use feature::{Feature, FeatureSet, UnknownFeature};
pub use libs::LibraryMatcher;
pub use policy::Policy;
pub use scope::{ScopeFrame, ScopeKind, ScopeTracker};
pub use strategy::{Checker, DetectionResult, Detector, Reporter, Site, Validator};
pub use walker::Walker;

pub use subpy_parser::SourceUnit;

/// Every feature used by `source`, with the lines it occurs on.
///
/// # Errors
/// Returns [`AnalysisError::Parse`] if `source` does not parse.
pub fn detect(source: &str) -> AnalysisResult<DetectionResult> {
    detect_unit(&SourceUnit::parse(source)?)
}

/// [`detect`] over an already parsed unit.
///
/// # Errors
/// Returns [`AnalysisError::UnhandledConstruct`] for a malformed tree.
pub fn detect_unit(unit: &SourceUnit) -> AnalysisResult<DetectionResult> {
    Walker::new(unit, Detector::new(), None)
        .run()
        .map(Detector::into_result)
}

/// Every use of a feature `policy` does not allow.
///
/// # Errors
/// Returns [`AnalysisError::Parse`] if `source` does not parse, and
/// [`AnalysisError::LibraryNotSupported`] at the first rejected import.
pub fn check(source: &str, policy: &Policy) -> AnalysisResult<DetectionResult> {
    check_unit(&SourceUnit::parse(source)?, policy)
}

/// [`check`] over an already parsed unit.
///
/// # Errors
/// See [`check`].
pub fn check_unit(unit: &SourceUnit, policy: &Policy) -> AnalysisResult<DetectionResult> {
    Walker::new(unit, Checker::new(policy.features()), policy.libraries())
        .run()
        .map(Checker::into_result)
}

/// Succeed only if `source` stays within `policy`.
///
/// # Errors
/// Returns [`AnalysisError::FeatureNotSupported`] at the first disallowed
/// feature, [`AnalysisError::LibraryNotSupported`] at the first rejected
/// import, or [`AnalysisError::Parse`] if `source` does not parse.
pub fn validate(source: &str, policy: &Policy) -> AnalysisResult<()> {
    validate_unit(&SourceUnit::parse(source)?, policy)
}

/// [`validate`] over an already parsed unit.
///
/// # Errors
/// See [`validate`].
pub fn validate_unit(unit: &SourceUnit, policy: &Policy) -> AnalysisResult<()> {
    Walker::new(unit, Validator::new(policy.features()), policy.libraries())
        .run()
        .map(|_| ())
}
