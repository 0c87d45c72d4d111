//! Human-readable durations for config files: "200ms", "15s", "2m", "1h",
//! or combinations such as "1m30s".
//!
//! Use with `#[serde(with = "peermon::serde_duration")]`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*duration))
}

pub(crate) fn parse(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration '{s}'"));
        }
        let value: u64 = rest[..digits].parse().map_err(|_| format!("invalid duration '{s}'"))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let out_of_range = || format!("duration '{s}' out of range");
        let unit = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(out_of_range)?),
            "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(out_of_range)?),
            "d" => Duration::from_secs(value.checked_mul(86400).ok_or_else(out_of_range)?),
            other => return Err(format!("unknown duration unit '{other}' in '{s}'")),
        };
        total = total.checked_add(unit).ok_or_else(out_of_range)?;
        rest = &rest[unit_len..];
    }
    Ok(total)
}

pub(crate) fn format(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        "0s".to_string()
    } else if millis % 1000 != 0 {
        format!("{millis}ms")
    } else {
        let secs = duration.as_secs();
        let (hours, mins, secs) = (secs / 3600, secs / 60 % 60, secs % 60);
        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("{hours}h"));
        }
        if mins > 0 {
            out.push_str(&format!("{mins}m"));
        }
        if secs > 0 {
            out.push_str(&format!("{secs}s"));
        }
        out
    }
}
