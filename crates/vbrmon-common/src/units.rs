//! Parsing and formatting helpers for the string-typed values the backup
//! server reports: durations ("1.02:03:04"), processing rates ("1,1 GB/s"),
//! and the usual byte/percent rendering.

const KIB: f64 = 1024.0;

/// Parse a duration string in "HH:MM:SS" or "D.HH:MM:SS" form to seconds.
///
/// # Examples
///
/// ```
/// use vbrmon_common::units::parse_duration_secs;
///
/// assert_eq!(parse_duration_secs("00:03:26"), Some(206));
/// assert_eq!(parse_duration_secs("1.02:03:04"), Some(93784));
/// ```
pub fn parse_duration_secs(s: &str) -> Option<u64> {
    let mut parts = s.split(':');
    let hours_part = parts.next()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let (days, hours): (u64, u64) = match hours_part.split_once('.') {
        Some((d, h)) => (d.parse().ok()?, h.parse().ok()?),
        None => (0, hours_part.parse().ok()?),
    };

    Some(days * 86_400 + hours * 3_600 + minutes * 60 + seconds)
}

/// Format seconds as "HH:MM:SS".
///
/// Not day-aware: inputs of a day or more render with an hours field above
/// 24 ("26:03:04"), even though the parser accepts the day-prefixed form.
pub fn format_duration_hms(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parse a processing-rate string like "1,1 GB/s" or "500 MB/s" to
/// bytes per second.
///
/// Accepts the comma-as-decimal-point locale form and a bare unit without
/// the "/s" suffix; "1,1 GB/s", "1.1 GB/s" and "1.1 GB" all parse to the
/// same value. Unknown units fall back to a multiplier of 1.
pub fn parse_rate_bytes_per_sec(s: &str) -> Option<f64> {
    let normalized = s.replace(',', ".");
    let mut parts = normalized.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let unit = unit.to_uppercase();
    let unit = unit.strip_suffix("/S").unwrap_or(&unit);
    let multiplier = match unit {
        "B" => 1.0,
        "KB" => KIB,
        "MB" => KIB * KIB,
        "GB" => KIB * KIB * KIB,
        "TB" => KIB * KIB * KIB * KIB,
        _ => 1.0,
    };

    Some(value * multiplier)
}

/// Render a byte count with binary units, e.g. "1.50 GiB".
pub fn render_bytes(bytes: f64) -> String {
    let mut value = bytes;
    for unit in ["B", "KiB", "MiB", "GiB", "TiB"] {
        if value.abs() < KIB || unit == "TiB" {
            return if unit == "B" {
                format!("{value:.0} {unit}")
            } else {
                format!("{value:.2} {unit}")
            };
        }
        value /= KIB;
    }
    unreachable!()
}

/// Render a percentage with one decimal, e.g. "90.0%".
pub fn render_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Render a span of seconds in a compact human form, e.g. "2h 5m".
pub fn render_timespan(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 3_600 {
        return format!("{}m {}s", seconds / 60, seconds % 60);
    }
    if seconds < 86_400 {
        return format!("{}h {}m", seconds / 3_600, (seconds % 3_600) / 60);
    }
    format!("{}d {}h", seconds / 86_400, (seconds % 86_400) / 3_600)
}
