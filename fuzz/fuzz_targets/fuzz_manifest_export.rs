#![no_main]

use libfuzzer_sys::fuzz_target;
use rankdeploy::domain::entities::LockFormat;
use rankdeploy::domain::services::resolve_manifest;
use rankdeploy::infrastructure::lockfiles::parse_lockfile;

// Dependency graphs from arbitrary locks may be cyclic or dangling
fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    for format in [LockFormat::Uv, LockFormat::Poetry] {
        if let Ok(lock) = parse_lockfile(format, content) {
            if let Ok(manifest) = resolve_manifest(&lock, &[]) {
                let _ = manifest.render();
            }
        }
    }
});
