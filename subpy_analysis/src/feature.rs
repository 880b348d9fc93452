//! The feature catalog and compact feature sets.
//!
//! [`Feature`] is the closed vocabulary of language capabilities the walker
//! classifies. [`FeatureSet`] packs any subset of it into one `u64`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Sub};
use std::str::FromStr;

// =============================================================================
// Feature
// =============================================================================

macro_rules! features {
    ($($(#[$doc:meta])* $name:ident = $value:literal,)*) => {
        /// One classifiable language feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum Feature {
            $($(#[$doc])* $name = $value,)*
        }

        impl Feature {
            /// Every feature, in catalog order.
            pub const ALL: [Feature; 34] = [$(Feature::$name,)*];

            /// Stable name of the feature.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Feature::$name => stringify!($name),)*
                }
            }
        }
    };
}

features! {
    /// Arithmetic mixing numeric literal types, or numbers used as booleans.
    ImplicitCasts = 1,
    /// `yield` and `yield from`.
    Generators = 2,
    /// `del` statements.
    DelVar = 3,
    /// Functions defined inside functions.
    Closures = 4,
    /// Class definitions.
    Classes = 5,
    /// Decorated functions.
    Decorators = 6,
    /// `*args` in definitions or calls.
    VarArgs = 7,
    /// `**kwargs`, defaults and named call arguments.
    KeywordArgs = 8,
    /// Classes with a base.
    Inheritance = 9,
    /// Classes with several bases.
    MInheritance = 10,
    /// Decorated classes.
    ClassDecorators = 11,
    /// `assert` statements.
    Assertions = 12,
    /// `a < b < c`.
    ChainComparison = 13,
    /// `raise`, `try` and `except`.
    Exceptions = 14,
    /// `lambda` expressions.
    Lambda = 15,
    /// `from . import x`.
    RelativeImports = 16,
    /// `from m import *`.
    ImportStar = 17,
    /// List displays mixing element kinds.
    HeteroList = 18,
    /// `continue` statements.
    Continue = 19,
    /// `return a, b`.
    MultipleReturn = 20,
    /// Dict comprehensions.
    DictComp = 21,
    /// `...` in subscripts.
    Ellipsi = 22,
    /// Destructuring or chained assignment.
    TupleUnpacking = 23,
    /// Dynamic code execution.
    Exec = 24,
    /// Multi-dimensional slicing.
    FancyIndexing = 25,
    /// `global` declarations.
    Globals = 26,
    /// `with` statements.
    ContextManagers = 27,
    /// Generator expressions.
    GeneratorExp = 28,
    /// Conditional expressions.
    Ternary = 29,
    /// List comprehensions.
    ListComp = 30,
    /// Set comprehensions.
    SetComp = 31,
    /// Loops over anything but `range`/`xrange`.
    CustomIterators = 32,
    /// Printing.
    Printing = 33,
    /// Metaclass declarations.
    Metaclasses = 34,
}

impl Feature {
    /// Numeric identifier, 1-based in catalog order.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look a feature up by its numeric identifier.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised feature name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeature(pub String);

impl fmt::Display for UnknownFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown feature '{}'", self.0)
    }
}

impl std::error::Error for UnknownFeature {}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

// =============================================================================
// Feature Set
// =============================================================================

/// A set of features, one bit per catalog entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureSet(u64);

impl FeatureSet {
    /// No features.
    pub const EMPTY: Self = Self(0);

    /// Every feature in the catalog.
    #[must_use]
    pub const fn full() -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Feature::ALL.len() {
            bits |= Feature::ALL[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Add a feature; returns whether it was absent.
    #[inline]
    pub fn insert(&mut self, feature: Feature) -> bool {
        let absent = !self.contains(feature);
        self.0 |= feature.bit();
        absent
    }

    /// Remove a feature; returns whether it was present.
    #[inline]
    pub fn remove(&mut self, feature: Feature) -> bool {
        let present = self.contains(feature);
        self.0 &= !feature.bit();
        present
    }

    /// Membership test.
    #[inline]
    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Features in either set.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Features in `self` but not in `other`.
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Number of features.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no feature is present.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every catalog feature is present.
    #[inline]
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.0 == Self::full().0
    }

    /// Iterate in catalog order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for feature in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            f.write_str(feature.name())?;
        }
        Ok(())
    }
}

impl From<Feature> for FeatureSet {
    fn from(feature: Feature) -> Self {
        Self(feature.bit())
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl Extend<Feature> for FeatureSet {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        for feature in iter {
            self.insert(feature);
        }
    }
}

impl BitOr for FeatureSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOr<Feature> for FeatureSet {
    type Output = Self;

    fn bitor(self, rhs: Feature) -> Self {
        self.union(rhs.into())
    }
}

impl BitOrAssign for FeatureSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Sub for FeatureSet {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl Sub<Feature> for FeatureSet {
    type Output = Self;

    fn sub(self, rhs: Feature) -> Self {
        self.difference(rhs.into())
    }
}

/// Parses `all`, `none`, or a comma-separated list of feature names.
impl FromStr for FeatureSet {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("all") => Ok(Self::full()),
            t if t.eq_ignore_ascii_case("none") || t.is_empty() => Ok(Self::EMPTY),
            t => t
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(Feature::from_str)
                .collect(),
        }
    }
}
