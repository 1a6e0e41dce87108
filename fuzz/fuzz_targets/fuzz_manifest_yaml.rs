#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use quarry::infrastructure::repositories::{parse_module_manifest, parse_root_manifest};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz manifest parsing - this should never panic
        let _ = parse_module_manifest(content);
        let _ = parse_root_manifest(content, Path::new("/project"));
    }
});
