//! Property tests for cron schedules and attempt deadlines.

use proptest::prelude::*;

use rankdeploy::domain::value_objects::{AttemptDeadline, CronSchedule};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary text never panics.
    #[test]
    fn property_cron_parse_never_panics(input in "\\PC{0,40}") {
        let _ = CronSchedule::parse(&input);
    }

    /// PROPERTY: `*/n * * * *` is accepted for every minute step and reports its interval.
    #[test]
    fn property_minute_step_reports_interval(n in 1u32..=59) {
        let cron = CronSchedule::parse(&format!("*/{n} * * * *")).unwrap();
        prop_assert_eq!(cron.interval_minutes(), Some(n));
    }

    /// PROPERTY: Whitespace between fields is normalized to single spaces.
    #[test]
    fn property_cron_normalizes_whitespace(
        minute in 0u32..=59,
        hour in 0u32..=23,
        gaps in proptest::collection::vec(1usize..4, 4),
    ) {
        let fields = [minute.to_string(), hour.to_string(), "*".into(), "*".into(), "*".into()];
        let mut raw = fields[0].clone();
        for (field, gap) in fields[1..].iter().zip(&gaps) {
            raw.push_str(&" ".repeat(*gap));
            raw.push_str(field);
        }
        let cron = CronSchedule::parse(&raw).unwrap();
        prop_assert_eq!(cron.as_str(), format!("{minute} {hour} * * *"));
    }

    /// PROPERTY: Out-of-range minutes are rejected.
    #[test]
    fn property_cron_rejects_out_of_range_minute(minute in 60u32..10_000) {
        let raw = format!("{minute} * * * *");
        prop_assert!(CronSchedule::parse(&raw).is_err());
    }

    /// PROPERTY: Deadlines inside 15s..=30m are accepted and rendered in seconds.
    #[test]
    fn property_deadline_in_range_renders_seconds(secs in 15u64..=1800) {
        let deadline = AttemptDeadline::parse(&secs.to_string()).unwrap();
        prop_assert_eq!(deadline.to_gcloud(), format!("{secs}s"));
    }

    /// PROPERTY: Deadline parsing never panics, even on overflowing values.
    #[test]
    fn property_deadline_parse_never_panics(input in "[0-9]{0,25}[smh]?") {
        let _ = AttemptDeadline::parse(&input);
    }
}
