/// One speed reading taken while a round is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    /// Seconds since the round started
    pub t: f64,
    /// Characters per second at `t`
    pub speed: f64,
}

impl SpeedSample {
    pub fn new(t: f64, speed: f64) -> Self {
        Self { t, speed }
    }
}

impl From<SpeedSample> for (f64, f64) {
    fn from(p: SpeedSample) -> Self {
        (p.t, p.speed)
    }
}
