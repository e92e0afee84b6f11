use serde::{Deserialize, Deserializer};

/// Parse a Go-style duration such as `1m30s`, `45s`, `1.5s`, `500ms` or
/// `1h0m0s` into seconds, rounded to the nearest whole second. A bare
/// number is taken as seconds.
pub fn parse_seconds(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Some(secs);
    }

    let mut total = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let amount: f64 = number.parse().ok()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 1e-3,
            "us" | "µs" => 1e-6,
            "ns" => 1e-9,
            // Includes trailing digits without a unit
            _ => return None,
        };

        total += amount * scale;
        rest = tail;
    }

    (total.is_finite() && total < u64::MAX as f64).then(|| total.round() as u64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

/// Accepts `null`, a number of seconds, or a duration string.
pub fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDuration>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawDuration::Seconds(s)) => Ok(Some(s)),
        Some(RawDuration::Text(t)) if t.trim().is_empty() => Ok(None),
        Some(RawDuration::Text(t)) => parse_seconds(&t)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid duration: {t}"))),
    }
}

/// Like [`deserialize_seconds`], but an unreadable duration decodes as
/// `None` so the rest of a backend record still loads.
pub fn deserialize_lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(t)) => {
            let parsed = parse_seconds(&t);
            if parsed.is_none() && !t.trim().is_empty() {
                tracing::warn!("Ignoring unreadable duration '{t}'");
            }
            parsed
        }
        Some(other) => {
            tracing::warn!("Ignoring unreadable duration {other}");
            None
        }
    })
}
