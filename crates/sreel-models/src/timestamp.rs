//! Clock-time parsing for subtitle and catalog data.
//!
//! External subtitle generators emit cue times as `HH:MM:SS.mmm` (or the
//! SRT-style `HH:MM:SS,mmm`); catalog tooling often shortens to `MM:SS` or
//! bare seconds. These helpers convert between those forms and the
//! seconds-as-f64 representation used throughout the core.

/// Maximum reasonable narration/source duration (24 hours in seconds).
pub const MAX_CLOCK_SECS: f64 = 86400.0;

/// Parse a clock string to total seconds.
///
/// Supports `HH:MM:SS`, `MM:SS`, and `SS`, each with an optional `.mmm` or
/// SRT-style `,mmm` fraction.
///
/// # Examples
/// ```
/// use sreel_models::timestamp::parse_clock;
/// assert_eq!(parse_clock("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_clock("00:00:02,500").unwrap(), 2.5);
/// assert_eq!(parse_clock("90").unwrap(), 90.0);
/// ```
pub fn parse_clock(raw: &str) -> Result<f64, ClockError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClockError::Empty);
    }

    // SRT uses a comma before milliseconds; normalize to a dot.
    let normalized = raw.replace(',', ".");

    let parts: Vec<&str> = normalized.split(':').collect();
    let component = |name: &'static str, value: &str| -> Result<f64, ClockError> {
        let parsed: f64 = value
            .parse()
            .map_err(|_| ClockError::InvalidValue(name, value.to_string()))?;
        if parsed < 0.0 {
            return Err(ClockError::Negative);
        }
        Ok(parsed)
    };

    let total = match parts.as_slice() {
        [secs] => component("seconds", secs)?,
        [mins, secs] => component("minutes", mins)? * 60.0 + component("seconds", secs)?,
        [hours, mins, secs] => {
            component("hours", hours)? * 3600.0
                + component("minutes", mins)? * 60.0
                + component("seconds", secs)?
        }
        _ => return Err(ClockError::InvalidFormat(raw.to_string())),
    };

    if total > MAX_CLOCK_SECS {
        return Err(ClockError::ExceedsMax(MAX_CLOCK_SECS));
    }
    Ok(total)
}

/// Format seconds as `HH:MM:SS` (or `HH:MM:SS.mmm` when a fraction is present).
pub fn format_clock(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Validate a start/end clock pair, returning the span in seconds.
///
/// Checks that both values parse, that start precedes end, and that the span
/// fits within the media duration when one is known (with a one-second
/// buffer for container rounding).
pub fn validate_span(
    start: &str,
    end: &str,
    media_duration: Option<f64>,
) -> Result<(f64, f64), ClockError> {
    let start_secs = parse_clock(start)?;
    let end_secs = parse_clock(end)?;

    if start_secs >= end_secs {
        return Err(ClockError::StartNotBeforeEnd);
    }

    if let Some(duration) = media_duration {
        if end_secs > duration + 1.0 {
            return Err(ClockError::ExceedsMediaDuration {
                end_secs,
                media_duration: duration,
            });
        }
    }

    Ok((start_secs, end_secs))
}

/// Clock parsing/validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    #[error("clock value cannot be empty")]
    Empty,

    #[error("clock value cannot be negative")]
    Negative,

    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("invalid clock format '{0}': use HH:MM:SS(.mmm), MM:SS, or SS")]
    InvalidFormat(String),

    #[error("start time must be before end time")]
    StartNotBeforeEnd,

    #[error("clock value exceeds maximum duration ({0} seconds)")]
    ExceedsMax(f64),

    #[error("end time ({end_secs:.1}s) exceeds media duration ({media_duration:.1}s)")]
    ExceedsMediaDuration { end_secs: f64, media_duration: f64 },
}
