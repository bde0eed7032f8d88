//! Scalar text encodings.

use crate::primitives::{COORDINATE_SCALE, RADIANS_TO_DEGREES, SECONDS_EPSILON};
use crate::source::Position;

/// Render an angle in radians as a short sexagesimal string.
///
/// The result is `D-M` with an optional `-S.sss` suffix, prefixed by `-`
/// for negative angles. Seconds below 0.001 are omitted, and seconds that
/// would print as 60 roll over into the minutes.
#[must_use]
pub fn radians_as_short_string(radians: f64) -> String {
    let signed = radians * RADIANS_TO_DEGREES;
    let abs = signed.abs();

    let deg = abs.trunc();
    let rem = (abs - deg) * 60.0;
    let mins = rem.trunc();
    let mut secs = (rem - mins) * 60.0;

    let mut ideg = deg as u32;
    let mut imins = mins as u32;

    if (secs - 60.0).abs() < SECONDS_EPSILON {
        secs = 0.0;
        imins += 1;
    }
    if imins >= 60 {
        imins = 0;
        ideg += 1;
    }

    let sign = if signed < 0.0 { "-" } else { "" };
    let mut out = format!("{sign}{ideg}-{imins}");
    if secs >= SECONDS_EPSILON {
        out.push_str(&format!("-{secs:.3}"));
    }
    out
}

/// Render a micro-unit value as a decimal with six places.
#[must_use]
pub fn micro_to_decimal(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let scale = COORDINATE_SCALE.unsigned_abs();
    format!("{sign}{}.{:06}", abs / scale, abs % scale)
}

/// Render polyline vertices as `x y,x y,...`.
#[must_use]
pub fn line_string(vertices: &[Position]) -> String {
    vertices
        .iter()
        .map(|p| format!("{} {}", micro_to_decimal(p.x), micro_to_decimal(p.y)))
        .collect::<Vec<_>>()
        .join(",")
}
