//! Property tests for version classification and cache keys.

use proptest::prelude::*;

use quarry::domain::value_objects::{parse_version_loose, VersionConstraint, VersionSpec};
use quarry::infrastructure::cache::cache_key;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: classification never panics and a constraint keeps its text.
    #[test]
    fn property_classify_is_total(raw in "\\PC{0,24}") {
        match VersionSpec::classify(&raw) {
            VersionSpec::Any => prop_assert!(raw.trim().is_empty()),
            VersionSpec::Constraint(c) => prop_assert_eq!(c.as_str(), raw.trim()),
            VersionSpec::Channel(channel) => prop_assert_eq!(channel, raw.trim()),
        }
    }

    /// PROPERTY: a bare version is an exact pin that matches itself.
    #[test]
    fn property_bare_version_pins_exactly(
        major in 0u64..50, minor in 0u64..50, patch in 0u64..50, prefixed in any::<bool>()
    ) {
        let raw = format!("{}{major}.{minor}.{patch}", if prefixed { "v" } else { "" });
        let constraint = VersionConstraint::parse(&raw).unwrap();
        let version = parse_version_loose(&raw).unwrap();

        prop_assert!(constraint.matches(&version));
        let next = semver::Version::new(major, minor, patch + 1);
        prop_assert!(!constraint.matches(&next));
    }

    /// PROPERTY: cache keys are fixed-width hex and separate uri from channel.
    #[test]
    fn property_cache_key_shape(uri in "[a-z:/.]{0,20}", channel in "[a-z]{0,8}") {
        let key = cache_key(&uri, &channel);
        prop_assert_eq!(key.len(), 64);
        prop_assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        if !channel.is_empty() {
            let shifted = cache_key(&format!("{uri}{channel}"), "");
            prop_assert_ne!(key, shifted);
        }
    }
}
