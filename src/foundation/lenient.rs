//! Serde helpers for Laravel-style JSON where decimals arrive as strings and flags as 0/1.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
    Bool(bool),
}

fn to_f64(v: NumOrStr) -> Option<f64> {
    match v {
        NumOrStr::Num(n) => Some(n),
        NumOrStr::Str(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        NumOrStr::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
    }
}

/// Number or numeric string; `null`, empty and unparsable values become `0`.
pub fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Option::<NumOrStr>::deserialize(d)?;
    Ok(v.and_then(to_f64).filter(|n| n.is_finite()).unwrap_or(0.0))
}

/// Number or numeric string; `null`, empty and unparsable values become `None`.
pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<NumOrStr>::deserialize(d)?;
    Ok(v.and_then(to_f64).filter(|n| n.is_finite()))
}

/// Non-negative integer from number or string.
pub fn u32_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let n = f64_or_zero(d)?;
    Ok(if n <= 0.0 { 0 } else { n.min(f64::from(u32::MAX)) as u32 })
}

/// Optional non-negative integer from number or string.
pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(opt_f64(d)?.map(|n| if n <= 0.0 { 0 } else { n.min(f64::from(u32::MAX)) as u32 }))
}

/// `true`, `1` or `"1"` are true; everything else is false.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let v = Option::<NumOrStr>::deserialize(d)?;
    Ok(match v {
        Some(NumOrStr::Bool(b)) => b,
        Some(NumOrStr::Str(s)) => matches!(s.trim(), "1" | "true"),
        Some(NumOrStr::Num(n)) => n == 1.0,
        None => false,
    })
}

/// Empty or whitespace-only strings become `None`.
pub fn non_blank<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<String>::deserialize(d)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/lenient.rs"]
mod tests;
