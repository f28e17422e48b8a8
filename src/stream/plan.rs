//! Execution-plan payload formatting.

use serde_json::Value;

const HEADING: &str = "## Execution Plan";
const HEADING_UPDATED: &str = "## Execution Plan (updated)";

pub const ICON_IN_PROGRESS: &str = "⏳";
pub const ICON_COMPLETED: &str = "✅";
pub const ICON_PENDING: &str = "📋";

/// Turn a planner payload (a serialized task list) into a markdown checklist.
///
/// Already formatted text and anything that fails to parse is returned
/// unchanged.
pub fn format_plan(raw: &str) -> String {
    if looks_formatted(raw) {
        return raw.to_string();
    }
    let (Some(open), Some(close)) = (raw.find('['), raw.rfind(']')) else {
        return raw.to_string();
    };
    if close <= open {
        return raw.to_string();
    }
    let Ok(records) = serde_json::from_str::<Vec<Value>>(&raw[open..=close]) else {
        return raw.to_string();
    };

    let bullets = records.iter().filter_map(plan_bullet).collect::<Vec<_>>();
    if bullets.is_empty() {
        return raw.to_string();
    }

    let heading = if raw.to_lowercase().contains("update") {
        HEADING_UPDATED
    } else {
        HEADING
    };
    format!("{heading}\n\n{}", bullets.join("\n"))
}

fn looks_formatted(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    trimmed.starts_with(ICON_COMPLETED)
        || trimmed.starts_with("- ✅")
        || trimmed.contains(ICON_PENDING)
}

fn plan_bullet(record: &Value) -> Option<String> {
    let text = record
        .get("content")
        .or_else(|| record.get("task"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())?;
    let icon = match record.get("status").and_then(Value::as_str) {
        Some("in_progress") => ICON_IN_PROGRESS,
        Some("completed") => ICON_COMPLETED,
        _ => ICON_PENDING,
    };
    Some(format!("- {icon} {text}"))
}
