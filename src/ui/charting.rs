use crate::time_series::SpeedSample;

/// Compute X (seconds) and Y (chars/sec) bounds for the round-over chart
pub fn compute_chart_params(trace: &[SpeedSample]) -> (f64, f64) {
    let highest_speed = trace.iter().map(|p| p.speed).fold(0.0, f64::max);

    let overall_duration = trace.last().map(|p| p.t).unwrap_or(1.0).max(1.0);

    (overall_duration, highest_speed.ceil().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
