// src/engine/gain.rs

/// A linear gain change between two points on the graph clock (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearRamp {
    pub start_time: f64,
    pub end_time: f64,
    pub from: f32,
    pub to: f32,
}

impl LinearRamp {
    fn value_at(&self, t: f64) -> f32 {
        if t <= self.start_time {
            return self.from;
        }
        if t >= self.end_time {
            return self.to;
        }
        let progress = ((t - self.start_time) / (self.end_time - self.start_time)) as f32;
        self.from + (self.to - self.from) * progress
    }
}

/// Automatable gain. Holds a target value and at most one pending ramp
/// towards it; once the ramp ends the target value holds.
#[derive(Clone, Debug, PartialEq)]
pub struct GainParam {
    value: f32,
    ramp: Option<LinearRamp>,
}

impl GainParam {
    pub fn new(value: f32) -> Self {
        Self { value, ramp: None }
    }

    /// Jump to `value`, cancelling any ramp in progress.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.ramp = None;
    }

    /// Ramp from `from` to `to` starting at `start_time`. A non-positive
    /// duration sets `to` directly.
    pub fn linear_ramp(&mut self, from: f32, to: f32, start_time: f64, duration: f64) {
        self.value = to;
        self.ramp = (duration > 0.0).then_some(LinearRamp {
            start_time,
            end_time: start_time + duration,
            from,
            to,
        });
    }

    pub fn value_at(&self, t: f64) -> f32 {
        match &self.ramp {
            Some(ramp) if t < ramp.end_time => ramp.value_at(t),
            _ => self.value,
        }
    }

    /// Value the parameter ends up at once any ramp completes.
    pub fn target(&self) -> f32 {
        self.value
    }

    pub fn ramp(&self) -> Option<&LinearRamp> {
        self.ramp.as_ref()
    }

    /// Drop a ramp that has finished by time `t`.
    pub fn settle(&mut self, t: f64) {
        if self.ramp.is_some_and(|r| t >= r.end_time) {
            self.ramp = None;
        }
    }
}

impl Default for GainParam {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ramp_interpolates_linearly() {
        let mut gain = GainParam::new(0.0);
        gain.linear_ramp(0.0, 0.35, 1.0, 2.0);

        assert_relative_eq!(gain.value_at(0.5), 0.0);
        assert_relative_eq!(gain.value_at(1.0), 0.0);
        assert_relative_eq!(gain.value_at(2.0), 0.175, epsilon = 1e-6);
        assert_relative_eq!(gain.value_at(3.0), 0.35);
        assert_relative_eq!(gain.value_at(10.0), 0.35);
        assert_relative_eq!(gain.target(), 0.35);
    }

    #[test]
    fn set_value_cancels_ramp() {
        let mut gain = GainParam::new(0.2);
        gain.linear_ramp(0.2, 0.0, 0.0, 2.0);
        gain.set_value(0.8);
        assert!(gain.ramp().is_none());
        assert_relative_eq!(gain.value_at(1.0), 0.8);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut gain = GainParam::new(1.0);
        gain.linear_ramp(1.0, 0.0, 5.0, 0.0);
        assert!(gain.ramp().is_none());
        assert_relative_eq!(gain.value_at(5.0), 0.0);
    }

    #[test]
    fn settle_drops_only_finished_ramps() {
        let mut gain = GainParam::new(0.0);
        gain.linear_ramp(0.0, 1.0, 0.0, 2.0);
        gain.settle(1.0);
        assert!(gain.ramp().is_some());
        gain.settle(2.0);
        assert!(gain.ramp().is_none());
        assert_relative_eq!(gain.value_at(2.5), 1.0);
    }
}
