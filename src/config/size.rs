//! Byte sizes as written in config files and on the command line ("10M", "512K").

const UNITS: [(&str, u64); 4] = [("", 1), ("K", 1 << 10), ("M", 1 << 20), ("G", 1 << 30)];

/// Parses a plain byte count or a `K`/`M`/`G` size (binary units), with an optional
/// trailing `B`. Fractions are allowed: `"1.5M"`.
#[must_use]
pub fn parse_size(s: &str) -> Option<u64> {
    let upper = s.trim().to_ascii_uppercase();
    let body = upper.strip_suffix('B').unwrap_or(&upper);
    let split = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    let (number, unit) = body.split_at(split);

    let multiplier = UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit.trim())
        .map(|&(_, m)| m)?;

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier);
    }
    let fraction = number.parse::<f64>().ok()?;
    if !fraction.is_finite() {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let bytes = (fraction * multiplier as f64) as u64;
    Some(bytes)
}

/// Human-readable byte count for purge reports: `"512 B"`, `"2.00 KB"`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let Some(&(unit, scale)) = UNITS.iter().rev().find(|&&(_, scale)| bytes >= scale && scale > 1)
    else {
        return format!("{bytes} B");
    };
    #[allow(clippy::cast_precision_loss)]
    let scaled = bytes as f64 / scale as f64;
    format!("{scaled:.2} {unit}B")
}
