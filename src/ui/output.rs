use rankdeploy::config::ConfigWarning;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

pub fn print_config_warnings(warnings: &[ConfigWarning], ui: &UiContext) {
    if ui.json {
        for w in warnings {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "config_warning",
                "key": w.key,
                "file": w.file.display().to_string(),
                "line": w.line,
                "suggestion": w.suggestion,
            }));
        }
        return;
    }

    for w in warnings {
        eprintln!("{}", format_config_warning(w, ui.color, ui.unicode));
    }
}

fn format_config_warning(w: &ConfigWarning, color: bool, unicode: bool) -> String {
    let location = match w.line {
        Some(line) => format!("{}:{}", w.file.display(), line),
        None => w.file.display().to_string(),
    };
    let mut out = format!(
        "{} Unknown config key '{}' in {}",
        Icon::Warning.colored(color, unicode),
        w.key,
        location
    );
    if let Some(suggestion) = &w.suggestion {
        out.push_str(&format!("\n   Did you mean '{}'?", suggestion));
    }
    out
}
