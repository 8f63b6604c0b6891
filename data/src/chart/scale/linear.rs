/// Ticks may overshoot the requested maximum by this much.
const TOLERANCE: f64 = 1e-9;
/// Span used in place of a zero-width domain.
pub const MIN_SPAN: f64 = 1e-9;

/// Upper bound on the requested tick count.
pub const MAX_TICKS: usize = 50;

const MAX_ITERATIONS: usize = 1000;
const MAX_REFINEMENTS: usize = 64;

/// Smallest span worth stepping through at this magnitude.
fn span_floor(min: f64, max: f64) -> f64 {
    MIN_SPAN.max(min.abs().max(max.abs()) * f64::EPSILON * 64.0)
}

/// Rounds `span / desired` up to the nearest 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(span: f64, desired: usize) -> f64 {
    let raw = span.max(MIN_SPAN) / desired.max(1) as f64;
    let pow10 = 10f64.powf(raw.log10().floor());
    let n = raw / pow10;

    let multiplier = if n <= 1.0 {
        1.0
    } else if n <= 2.0 {
        2.0
    } else if n <= 5.0 {
        5.0
    } else {
        10.0
    };

    multiplier * pow10
}

/// The next smaller step in the 1-2-5 sequence.
fn finer_step(step: f64) -> f64 {
    let pow10 = 10f64.powf(step.log10().floor());

    match (step / pow10).round() as u32 {
        5 => 2.0 * pow10,
        2 => pow10,
        _ => 0.5 * pow10,
    }
}

fn on_step_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() * step;
    if !first.is_finite() {
        return Vec::new();
    }

    let mut values: Vec<f64> = Vec::new();
    for i in 0..MAX_ITERATIONS {
        let value = first + i as f64 * step;
        if value > max + TOLERANCE {
            break;
        }

        let value = round_decimals(value, 10);
        if values.last().is_none_or(|&last| value > last) {
            values.push(value);
        }
    }

    values
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;

    if rounded.is_finite() { rounded } else { value }
}

/// Tick values for a price axis spanning `[min_value, max_value]`.
///
/// The first entry is always `min_value` itself, followed by every multiple
/// of the chosen step inside the range. When the range is so narrow that no
/// multiple fits, the step is refined until one does. The requested count is
/// capped at [`MAX_TICKS`]; a span too wide for `f64` yields `[min, max]`.
pub fn compute_ticks(min_value: f64, max_value: f64, desired_count: usize) -> Vec<f64> {
    if !min_value.is_finite() || !max_value.is_finite() {
        return Vec::new();
    }

    let (min, max) = if max_value < min_value {
        (max_value, min_value)
    } else {
        (min_value, max_value)
    };

    let span = (max - min).max(span_floor(min, max));
    let mut step = nice_step(span, desired_count.clamp(1, MAX_TICKS));
    if !step.is_finite() || step <= 0.0 {
        return vec![min, max];
    }

    let mut values = on_step_values(min, max, step);

    for _ in 0..MAX_REFINEMENTS {
        if !values.is_empty() {
            break;
        }
        step = finer_step(step);
        if step <= 0.0 {
            break;
        }
        values = on_step_values(min, max, step);
    }

    if values.is_empty() {
        values.push(max);
    }

    let mut ticks = Vec::with_capacity(values.len() + 1);
    ticks.push(min);
    ticks.extend(values);

    ticks
}
