//! Numeric helpers shared by the engine.

// Every finite f64 is exact at 1074 decimal places; the formatter rejects
// precisions above `u16::MAX`.
const EXACT_DIGITS: u32 = 1100;

/// Rounds `value` to `precision` decimal places.
///
/// Goes through the correctly rounded decimal formatter rather than
/// `(v * 10^p).round() / 10^p`, so ties resolve on the exact binary value and
/// large `precision` never overflows. NaN and infinities pass through.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = if precision > EXACT_DIGITS {
        value
    } else {
        format!("{:.*}", precision as usize, value)
            .parse::<f64>()
            .unwrap_or(value)
    };
    // `-0.0000` parses back as negative zero
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// `n` evenly spaced points over `[start, stop]`, both endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
