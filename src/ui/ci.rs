//! GitHub Actions workflow commands

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Error,
}

pub fn github_actions_annotation(
    level: AnnotationLevel,
    message: &str,
    title: Option<&str>,
) -> String {
    let level_str = match level {
        AnnotationLevel::Notice => "notice",
        AnnotationLevel::Warning => "warning",
        AnnotationLevel::Error => "error",
    };

    let prop_str = match title {
        Some(title) => format!(" title={}", escape_property(title)),
        None => String::new(),
    };

    format!("::{}{}::{}", level_str, prop_str, escape_data(message))
}

/// Start a collapsible log group
pub fn group_start(title: &str) -> String {
    format!("::group::{}", escape_data(title))
}

pub fn group_end() -> &'static str {
    "::endgroup::"
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
