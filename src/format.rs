const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// "FALL" -> "Fall". Absent or empty input yields an empty string.
pub fn format_season(season: Option<&str>) -> String {
    let Some(season) = season else {
        return String::new();
    };
    let mut chars = season.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out
}

/// Compact countdown such as "1d 1h 1m". Seconds only show up when every larger
/// unit is zero.
pub fn format_time_until_airing(total_seconds: i64) -> String {
    if total_seconds < 0 {
        return "Already aired".to_string();
    }
    let days = total_seconds / SECS_PER_DAY;
    let hours = (total_seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_seconds % SECS_PER_MINUTE;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }

    let joined = parts.join(" ");
    if joined.is_empty() {
        "Soon".to_string()
    } else {
        joined
    }
}
