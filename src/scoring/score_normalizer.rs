/// Squash an unbounded risk score into [0, 1].
///
/// `risk / (|risk| + 10)` saturates toward 1 for large positive scores; every
/// non-positive score maps to 0.
pub fn normalize_risk(risk: f64) -> f64 {
    if risk == 0.0 {
        return 0.0;
    }
    (risk / (risk.abs() + 10.0)).clamp(0.0, 1.0)
}
