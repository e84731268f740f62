// SPDX-License-Identifier: MIT

//! Spherical geodesy helpers: coordinate string decoding, great-circle
//! distance and true course.

use std::f64::consts::PI;

/// Earth radius used for all distance computations, in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Converts a degrees/minutes/seconds string with a leading hemisphere letter
/// (`N323200`, `W1002233`) to decimal degrees.
///
/// Seven characters mean two-digit degrees, anything else three-digit degrees.
/// Unparseable components count as zero; use [`dmd_to_decimal`] when a
/// malformed value must be rejected.
pub fn dms_to_decimal(dms: &str) -> f64 {
    let (degrees, minutes, seconds) = if dms.len() == 7 {
        (dms.get(1..3), dms.get(3..5), dms.get(5..))
    } else {
        (dms.get(1..4), dms.get(4..6), dms.get(6..))
    };

    let component = |s: Option<&str>| s.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0);
    let value = component(degrees) + (component(minutes) / 60.0) + (component(seconds) / 3600.0);

    if dms.starts_with('S') || dms.starts_with('W') {
        -value
    } else {
        value
    }
}

/// Converts a degrees + decimal minutes string, the encoding used by IGC fix
/// and task records, to decimal degrees.
///
/// Accepts the hemisphere letter leading (`N4616018`) or trailing
/// (`4616018N`). Latitudes carry two degree digits, longitudes three, both
/// followed by two minute digits and three digits of thousandths of a minute.
/// Returns `None` for anything else.
pub fn dmd_to_decimal(dmd: &str) -> Option<f64> {
    let first = dmd.chars().next()?;
    let last = dmd.chars().last()?;

    let (hemisphere, digits) = if first.is_ascii_alphabetic() {
        (first, &dmd[1..])
    } else if last.is_ascii_alphabetic() {
        (last, &dmd[..dmd.len() - 1])
    } else {
        return None;
    };

    let degree_width = match hemisphere {
        'N' | 'S' => 2,
        'E' | 'W' => 3,
        _ => return None,
    };

    if digits.len() != degree_width + 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let degrees: f64 = digits[..degree_width].parse().ok()?;
    let minutes: f64 = digits[degree_width..degree_width + 2].parse().ok()?;
    let thousandths: f64 = digits[degree_width + 2..].parse().ok()?;

    let value = degrees + ((minutes + (thousandths / 1000.0)) / 60.0);
    Some(match hemisphere {
        'S' | 'W' => -value,
        _ => value,
    })
}

/// Great-circle (haversine) distance in meters between two points given in
/// decimal degrees.
pub fn gc_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    gc_distance_radians(
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    )
}

/// Same as [`gc_distance`] with all inputs already in radians.
pub fn gc_distance_radians(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon1 - lon2) / 2.0).sin().powi(2);
    (2.0 * a.sqrt().asin()) * EARTH_RADIUS
}

/// True course in degrees from point 1 to point 2 (decimal degree inputs).
///
/// The result is `atan2(..) mod 2π` converted to degrees and may be negative;
/// it is not normalized to `[0, 360)`.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    bearing_radians(
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    )
}

/// Same as [`bearing`] with inputs in radians. The result is still degrees.
pub fn bearing_radians(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let course = ((lon1 - lon2).sin() * lat2.cos())
        .atan2(lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon1 - lon2).cos());
    (course % (2.0 * PI)).to_degrees()
}
