//! Property tests over the catalog and the three strategies.

use proptest::prelude::*;
use subpy_analysis::{Feature, FeatureSet, Policy, check, detect, validate};

/// Programs that exercise exactly one feature, with where it is reported.
const SAMPLES: &[(&str, Feature, usize, usize)] = &[
    ("x = 1 + 2.0\n", Feature::ImplicitCasts, 1, 5),
    ("def f():\n    yield 1\n", Feature::Generators, 2, 5),
    ("x = 3\ndel x\n", Feature::DelVar, 2, 1),
    ("def f():\n    def g():\n        pass\n", Feature::Closures, 2, 5),
    ("class A:\n    pass\n", Feature::Classes, 1, 1),
    ("@d\ndef f():\n    pass\n", Feature::Decorators, 2, 1),
    ("f(*a)\n", Feature::VarArgs, 1, 1),
    ("f(a=1)\n", Feature::KeywordArgs, 1, 1),
    ("assert x\n", Feature::Assertions, 1, 1),
    ("a < b < c\n", Feature::ChainComparison, 1, 1),
    ("raise E\n", Feature::Exceptions, 1, 1),
    ("f = lambda: 0\n", Feature::Lambda, 1, 5),
    ("from . import m\n", Feature::RelativeImports, 1, 1),
    ("from m import *\n", Feature::ImportStar, 1, 1),
    ("x = [1, 'a']\n", Feature::HeteroList, 1, 5),
    ("while x:\n    continue\n", Feature::Continue, 2, 5),
    ("def f():\n    return a, b\n", Feature::MultipleReturn, 2, 5),
    ("d = {k: v for k in ks}\n", Feature::DictComp, 1, 5),
    ("x[...]\n", Feature::Ellipsi, 1, 1),
    ("a, b = c\n", Feature::TupleUnpacking, 1, 1),
    ("exec code\n", Feature::Exec, 1, 1),
    ("x[1:2, 3]\n", Feature::FancyIndexing, 1, 1),
    ("global g\n", Feature::Globals, 1, 1),
    ("with m:\n    pass\n", Feature::ContextManagers, 1, 1),
    ("g = (a for a in b)\n", Feature::GeneratorExp, 1, 5),
    ("y = a if b else c\n", Feature::Ternary, 1, 5),
    ("y = [a for a in b]\n", Feature::ListComp, 1, 5),
    ("y = {a for a in b}\n", Feature::SetComp, 1, 5),
    ("for a in b:\n    pass\n", Feature::CustomIterators, 1, 1),
    ("print x\n", Feature::Printing, 1, 1),
];

fn any_feature() -> impl Strategy<Value = Feature> {
    (0..Feature::ALL.len()).prop_map(|i| Feature::ALL[i])
}

fn any_feature_set() -> impl Strategy<Value = FeatureSet> {
    proptest::collection::vec(any_feature(), 0..12).prop_map(|v| v.into_iter().collect())
}

/// A program stitched together from the single-feature samples.
fn any_program() -> impl Strategy<Value = String> {
    proptest::collection::vec(0..SAMPLES.len(), 0..8)
        .prop_map(|picks| picks.into_iter().map(|i| SAMPLES[i].0).collect())
}

#[test]
fn test_each_sample_detects_exactly_its_feature() {
    for &(source, feature, line, _) in SAMPLES {
        let found = detect(source).unwrap();
        assert_eq!(found.features(), FeatureSet::from(feature), "{source:?}");
        assert_eq!(found.get(feature), Some(&[line][..]), "{source:?}");
    }
}

#[test]
fn test_each_sample_fails_validation_at_its_site() {
    for &(source, feature, line, column) in SAMPLES {
        let policy = Policy::new(FeatureSet::full() - feature);
        let err = validate(source, &policy).unwrap_err();
        let violation = err.violation().expect("expected a violation");
        assert_eq!(violation.feature, feature, "{source:?}");
        assert_eq!((violation.line, violation.column), (line, column), "{source:?}");
    }
}

proptest! {
    #[test]
    fn prop_feature_id_round_trip(feature in any_feature()) {
        prop_assert_eq!(Feature::from_id(feature.id()), Some(feature));
        prop_assert_eq!(feature.name().parse::<Feature>(), Ok(feature));
    }

    #[test]
    fn prop_set_algebra(a in any_feature_set(), b in any_feature_set()) {
        let union = a | b;
        prop_assert!(a.iter().all(|f| union.contains(f)));
        prop_assert!(b.iter().all(|f| union.contains(f)));
        prop_assert_eq!((a - b).len() + (a - (a - b)).len(), a.len());
        prop_assert!((a - b).iter().all(|f| !b.contains(f)));
        prop_assert_eq!(a.to_string().parse::<FeatureSet>(), Ok(a));
    }

    #[test]
    fn prop_detect_is_idempotent(program in any_program()) {
        let first = detect(&program).unwrap();
        let second = detect(&program).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_full_policy_check_is_empty(program in any_program()) {
        prop_assert!(check(&program, &Policy::full()).unwrap().is_empty());
        prop_assert!(validate(&program, &Policy::full()).is_ok());
    }

    #[test]
    fn prop_check_matches_detect_minus_allowed(
        program in any_program(),
        allowed in any_feature_set(),
    ) {
        let detected = detect(&program).unwrap();
        let checked = check(&program, &Policy::new(allowed)).unwrap();
        prop_assert_eq!(checked.features(), detected.features() - allowed);
        for (feature, lines) in checked.iter() {
            prop_assert_eq!(detected.get(feature), Some(lines));
        }
    }

    #[test]
    fn prop_validate_agrees_with_check(
        program in any_program(),
        allowed in any_feature_set(),
    ) {
        let policy = Policy::new(allowed);
        let checked = check(&program, &policy).unwrap();
        match validate(&program, &policy) {
            Ok(()) => prop_assert!(checked.is_empty()),
            Err(err) => {
                let violation = err.violation().expect("expected a violation");
                prop_assert!(checked.contains(violation.feature));
            }
        }
    }

    #[test]
    fn prop_unrelated_denial_does_not_fail(index in 0..SAMPLES.len(), other in any_feature()) {
        let (source, feature, _, _) = SAMPLES[index];
        prop_assume!(other != feature);
        prop_assert!(validate(source, &Policy::new(FeatureSet::full() - other)).is_ok());
    }
}
