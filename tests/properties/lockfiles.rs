//! Property tests for lockfile parsing and manifest export.

use proptest::prelude::*;

use rankdeploy::domain::entities::LockFormat;
use rankdeploy::domain::services::resolve_manifest;
use rankdeploy::infrastructure::lockfiles::parse_lockfile;

fn package_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,12}").unwrap()
}

fn version() -> impl Strategy<Value = String> {
    (0u32..20, 0u32..20, 0u32..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}"))
}

/// uv lock where the project depends on every generated package directly
fn uv_lock(packages: &[(String, String)]) -> String {
    let mut out = String::from("version = 1\n\n[[package]]\nname = \"crypto-rank-tracker\"\n");
    out.push_str("version = \"0.1.0\"\nsource = { virtual = \".\" }\ndependencies = [");
    let deps: Vec<String> = packages
        .iter()
        .map(|(n, _)| format!("{{ name = \"{n}\" }}"))
        .collect();
    out.push_str(&deps.join(", "));
    out.push_str("]\n");
    for (name, version) in packages {
        out.push_str(&format!(
            "\n[[package]]\nname = \"{name}\"\nversion = \"{version}\"\nsource = {{ registry = \"https://pypi.org/simple\" }}\n"
        ));
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary text never panics, for either format.
    #[test]
    fn property_parse_never_panics(input in "\\PC{0,200}") {
        let _ = parse_lockfile(LockFormat::Uv, &input);
        let _ = parse_lockfile(LockFormat::Poetry, &input);
    }

    /// PROPERTY: Export pins every direct dependency, sorted, and is deterministic.
    #[test]
    fn property_export_is_sorted_and_complete(
        packages in proptest::collection::btree_map(package_name(), version(), 1..8),
    ) {
        let packages: Vec<(String, String)> = packages
            .into_iter()
            .filter(|(n, _)| n != "crypto-rank-tracker")
            .collect();
        prop_assume!(!packages.is_empty());

        let lock = parse_lockfile(LockFormat::Uv, &uv_lock(&packages)).unwrap();
        let manifest = resolve_manifest(&lock, &[]).unwrap();
        let again = resolve_manifest(&lock, &[]).unwrap();
        prop_assert_eq!(manifest.render(), again.render());

        let lines: Vec<String> = manifest.render().lines().skip(1).map(str::to_string).collect();
        let expected: Vec<String> = packages.iter().map(|(n, v)| format!("{n}=={v}")).collect();
        prop_assert_eq!(lines, expected);
    }
}
