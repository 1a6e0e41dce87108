#![no_main]

use libfuzzer_sys::fuzz_target;
use quarry::infrastructure::repositories::{parse_lockfile, render_lockfile};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz lockfile YAML parsing - this should never panic
        if let Ok(lockfile) = parse_lockfile(content) {
            let _ = render_lockfile(&lockfile);
        }
    }
});
