//! Duration parsing utilities.

use std::time::Duration;

use anyhow::Context;

/// Parse a duration string like "500ms", "2.5s", "30m", "1h" or "5".
/// Supports:
/// - Plain numbers (interpreted as seconds, fractions allowed): "5", "2.5"
/// - Milliseconds suffix: "500ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        let millis: u64 = num_str
            .trim()
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {num_str}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(num_str) = s.strip_suffix('h') {
        return scaled_secs(num_str, 3600.0)
            .with_context(|| format!("Invalid hours value: {num_str}"));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        return scaled_secs(num_str, 60.0)
            .with_context(|| format!("Invalid minutes value: {num_str}"));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return scaled_secs(num_str, 1.0)
            .with_context(|| format!("Invalid seconds value: {num_str}"));
    }

    // No suffix - treat as seconds
    scaled_secs(s, 1.0).with_context(|| format!("Invalid duration value: {s}"))
}

fn scaled_secs(num_str: &str, scale: f64) -> anyhow::Result<Duration> {
    let value: f64 = num_str.trim().parse()?;
    Ok(Duration::try_from_secs_f64(value * scale)?)
}
