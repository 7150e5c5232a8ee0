use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimeParseError;

// @module: Time formatting, parsing and frame stepping

/// Duration of one video frame at the 30 fps review rate, in seconds
pub const FRAME_STEP_SECONDS: f64 = 1.0 / 30.0;

// @const: mm:ss with optional fractional seconds (up to millisecond precision)
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?:\.(\d{1,3}))?$").unwrap()
});

/// Format seconds as `mm:ss`, or `mm:ss.mmm` when `with_millis` is set.
///
/// Minutes and seconds are floored; milliseconds are rounded to three digits
/// and carried into the seconds when they round up to a full second.
/// Negative and non-finite input is clamped to zero.
pub fn format_seconds(seconds: f64, with_millis: bool) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    if with_millis {
        let total_ms = (seconds * 1000.0).round() as u64;
        let minutes = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    } else {
        let total = seconds.floor() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Parse a `mm:ss` or `mm:ss.mmm` string into seconds.
///
/// The fractional part is read as a decimal fraction, so `"01:02.5"` is
/// 62.5 seconds. A missing fractional part counts as zero.
pub fn parse_time_string(text: &str) -> Result<f64, TimeParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let caps = TIME_REGEX
        .captures(trimmed)
        .ok_or_else(|| TimeParseError::InvalidFormat(trimmed.to_string()))?;

    // The regex guarantees digits, so a parse failure means u64 overflow
    let minutes: u64 = caps[1]
        .parse()
        .map_err(|_| TimeParseError::OutOfRange {
            input: trimmed.to_string(),
            component: "minutes",
        })?;
    let secs: u64 = caps[2]
        .parse()
        .map_err(|_| TimeParseError::InvalidFormat(trimmed.to_string()))?;

    if secs >= 60 {
        return Err(TimeParseError::OutOfRange {
            input: trimmed.to_string(),
            component: "seconds",
        });
    }

    let millis = match caps.get(3) {
        Some(frac) => {
            let digits = frac.as_str();
            // Right-pad so ".5" means 500ms, not 5ms
            let padded = format!("{:0<3}", digits);
            padded
                .parse::<u64>()
                .map_err(|_| TimeParseError::InvalidFormat(trimmed.to_string()))?
        }
        None => 0,
    };

    let total_ms = minutes
        .checked_mul(60_000)
        .and_then(|ms| ms.checked_add(secs * 1_000 + millis))
        .ok_or_else(|| TimeParseError::OutOfRange {
            input: trimmed.to_string(),
            component: "minutes",
        })?;
    Ok(total_ms as f64 / 1000.0)
}

/// Move `seconds` by a whole number of frames, clamping at zero.
pub fn nudge_by_frames(seconds: f64, frames: i32) -> f64 {
    (seconds + f64::from(frames) * FRAME_STEP_SECONDS).max(0.0)
}
