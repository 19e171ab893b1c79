//! # Priority mappers
//! Pure, testable functions that map a NewsML feed priority to a Slack
//! attachment color and a human-readable label. No I/O.
//!
//! Wire priorities run 1 (flash) to 8 (lowest). The color ramp interpolates
//! red → yellow → green across control points 1, 3 and 8; inputs outside
//! `[1, 8]` extrapolate along the nearest segment instead of clamping.

const RED: [f64; 3] = [255.0, 0.0, 0.0];
const YELLOW: [f64; 3] = [255.0, 255.0, 0.0];
const GREEN: [f64; 3] = [0.0, 128.0, 0.0];

fn channel(from: f64, to: f64, t: f64) -> u8 {
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

/// Interpolated `#rrggbb` color for a feed priority.
///
/// Piecewise-linear per channel: priority 8 → green, 3 → yellow, 1 → red.
pub fn priority_color(priority: i32) -> String {
    let p = f64::from(priority);
    let (t, from, to) = if p <= 3.0 {
        ((p - 1.0) / 2.0, RED, YELLOW)
    } else {
        ((p - 3.0) / 5.0, YELLOW, GREEN)
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(from[0], to[0], t),
        channel(from[1], to[1], t),
        channel(from[2], to[2], t)
    )
}

/// Human-readable label for a feed priority.
///
/// Total over `i32`: anything outside the wire table falls through to
/// "Priority not set" rather than failing.
pub fn priority_label(priority: i32) -> &'static str {
    match priority {
        1 => ":rotating_light: CRAZY-HIGH PRIORITY :rotating_light:",
        2 => ":rotating_light: Super high priority :rotating_light:",
        3 => "High priority",
        4 => "Medium priority",
        5 => "Medium-low priority",
        6 => "Low priority",
        7 => "Lower priority",
        8 => "Lowest priority",
        _ => "Priority not set",
    }
}
