use std::ops::Range;

/// Multiplier from a Google Benchmark `time_unit` to nanoseconds
pub fn time_unit_to_ns(unit: &str) -> Option<f64> {
    match unit.trim() {
        "ns" => Some(1.0),
        "us" => Some(1e3),
        "ms" => Some(1e6),
        "s" => Some(1e9),
        _ => None,
    }
}

pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// Axis range for a logarithmic axis over the strictly positive values.
///
/// `pad` is the factor applied below the minimum and above the maximum.
pub fn log_bounds<I>(values: I, pad: f64) -> Option<Range<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
    let pad = pad.max(1.0);
    if min == max {
        // widen around a lone value so the axis is not empty
        Some(min / (pad * 2.0)..max * pad * 2.0)
    } else {
        Some(min / pad..max * pad)
    }
}

/// Integer axis range for discrete x values such as thread counts
pub fn discrete_bounds<I>(values: I) -> Option<Range<u64>>
where
    I: IntoIterator<Item = u64>,
{
    let mut values = values.into_iter();
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(min.saturating_sub(1)..max + 1)
}
