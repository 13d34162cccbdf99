//! Helpers for API key resolution and metric time ranges.

use chrono::{DateTime, TimeDelta, Utc};

/// Environment variable holding the API key in plain text.
pub const API_KEY_ENV: &str = "UPDOWN_API_KEY";

/// Source from which the API key was obtained (for diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Passed explicitly (CLI flag or `UPDOWN_API_KEY`).
    Explicit,
    OnePassword,
    Bitwarden,
    Keepassxc,
}

/// Resolve the API key: an explicit non-empty value wins, then the secret
/// backends in order (1Password, Bitwarden, KeePassXC). See [crate::secret]
/// for the `UPDOWN_*` variables each backend reads.
pub fn get_api_key(explicit: Option<&str>) -> Result<(String, ApiKeySource), String> {
    if let Some(k) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok((k.to_string(), ApiKeySource::Explicit));
    }
    let backends: [(fn() -> Option<String>, ApiKeySource); 3] = [
        (crate::secret::one_password, ApiKeySource::OnePassword),
        (crate::secret::bitwarden, ApiKeySource::Bitwarden),
        (crate::secret::keepassxc, ApiKeySource::Keepassxc),
    ];
    for (read, source) in backends {
        if let Some(k) = read().filter(|k| !k.is_empty()) {
            tracing::debug!(?source, "API key resolved from secret backend");
            return Ok((k, source));
        }
    }
    Err(format!(
        "API key not found. Set {API_KEY_ENV} or configure a secret backend: \
         UPDOWN_OP_ENTRY_PATH (1Password), UPDOWN_BW_ITEM_ID (Bitwarden), \
         or UPDOWN_KPXC_DB+UPDOWN_KPXC_ENTRY (KeePassXC)."
    ))
}

/// Format time as ISO 8601 for the API.
pub fn format_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse ISO 8601 time string.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim().trim_end_matches('Z').trim_end_matches('z');
    let parsed = chrono::DateTime::parse_from_rfc3339(&format!("{}Z", s))
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(s))
        .map_err(|e| e.to_string())?;
    Ok(parsed.with_timezone(&Utc))
}

/// Parse range string (e.g. "30min", "6hours", "1day", "7days") into seconds.
pub fn parse_range(range_str: &str) -> Result<u64, String> {
    let s = range_str.trim().to_lowercase().replace(' ', "");
    let num_end = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let num: u64 = s[..num_end]
        .parse()
        .map_err(|_| format!("Invalid range: {}", range_str))?;
    let unit: u64 = match &s[num_end..] {
        u if u.starts_with("min") => 60,
        u if u.starts_with('h') => 3600,
        u if u.starts_with('d') => 86400,
        u if u.starts_with('w') => 7 * 86400,
        _ => return Err(format!("Unknown time unit in range: {}", range_str)),
    };
    num.checked_mul(unit)
        .ok_or_else(|| format!("Range too large: {}", range_str))
}

/// Compute (from, to) ISO 8601 strings for a range ending at `to` (or now).
pub fn calculate_range(range: &str, to: Option<&str>) -> Result<(String, String), String> {
    let end_time = match to {
        Some(t) => parse_time(t)?,
        None => Utc::now(),
    };
    let too_large = || format!("Range too large: {}", range);
    let secs = i64::try_from(parse_range(range)?).map_err(|_| too_large())?;
    let start_time = TimeDelta::try_seconds(secs)
        .and_then(|delta| end_time.checked_sub_signed(delta))
        .ok_or_else(too_large)?;
    Ok((format_time(start_time), format_time(end_time)))
}
