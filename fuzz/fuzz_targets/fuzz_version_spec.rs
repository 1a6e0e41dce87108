#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::domain::value_objects::{parse_version_loose, VersionSpec};

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Classification and matching should never panic
        if let VersionSpec::Constraint(constraint) = VersionSpec::classify(raw) {
            if let Some(version) = parse_version_loose(raw) {
                let _ = constraint.matches_relaxed(&version);
            }
        }
    }
});
