#![no_main]

use libfuzzer_sys::fuzz_target;
use rankdeploy::domain::entities::LockFormat;
use rankdeploy::infrastructure::lockfiles::parse_lockfile;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = parse_lockfile(LockFormat::Uv, content);
        let _ = parse_lockfile(LockFormat::Poetry, content);
    }
});
