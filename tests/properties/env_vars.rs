//! Property tests for the `--set-env-vars` value.

use proptest::prelude::*;

use rankdeploy::domain::entities::FunctionEnv;
use rankdeploy::domain::value_objects::StorageMethod;
use rankdeploy::infrastructure::gcloud::commands::env_vars_value;

fn webhook() -> impl Strategy<Value = String> {
    proptest::string::string_regex("https://hooks\\.example/[A-Za-z0-9,;@|~#_-]{0,30}").unwrap()
}

/// Split a gcloud dict-flag value back into pairs, honoring `^D^` delimiters
fn split_pairs(value: &str) -> Vec<(String, String)> {
    let (delimiter, body) = match value.strip_prefix('^') {
        Some(rest) => {
            let mut chars = rest.chars();
            let delimiter = chars.next().unwrap();
            let body = chars.as_str().strip_prefix('^').unwrap();
            (delimiter, body)
        }
        None => (',', value),
    };
    body.split(delimiter)
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            (k.to_string(), v.to_string())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: gcloud recovers exactly the three variables, whatever the webhook contains.
    #[test]
    fn property_env_vars_survive_gcloud_splitting(
        url in webhook(),
        bucket in proptest::option::of("[a-z0-9-]{0,20}"),
    ) {
        let env = FunctionEnv::new(StorageMethod::Gcs, bucket.as_deref(), url.clone());
        let pairs = split_pairs(&env_vars_value(&env));

        prop_assert_eq!(pairs.len(), 3);
        prop_assert_eq!(&pairs[0], &("STATE_STORAGE_METHOD".to_string(), "GCS".to_string()));
        prop_assert_eq!(&pairs[1].1, env.bucket_name());
        prop_assert_eq!(&pairs[2], &("WEBHOOK_URL".to_string(), url));
        if let Some(bucket) = bucket.filter(|b| !b.is_empty()) {
            prop_assert_eq!(env.bucket_name(), bucket.as_str());
        }
    }

    /// PROPERTY: A blank bucket always falls back to the default.
    #[test]
    fn property_blank_bucket_uses_default(spaces in " {0,5}") {
        let env = FunctionEnv::new(StorageMethod::Gcs, Some(&spaces), "https://hooks.example/x");
        prop_assert_eq!(env.bucket_name(), "storage");
    }
}
