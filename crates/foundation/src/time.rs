/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    /// Browser clocks (`performance.now()`, rAF timestamps) report milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: Time(start.0 + duration_s.max(0.0)),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Linear progress through the span in `[0, 1]`.
    ///
    /// Zero-length spans are complete as soon as they start.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, t: Time) -> bool {
        t.0 >= self.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn millis_round_trip() {
        let t = Time::from_millis(1500.0);
        assert_eq!(t, Time(1.5));
        assert_eq!(t.as_millis(), 1500.0);
    }

    #[test]
    fn progress_is_clamped() {
        let span = TimeSpan::starting_at(Time(2.0), 0.5);
        assert_eq!(span.progress(Time(1.0)), 0.0);
        assert_eq!(span.progress(Time(2.25)), 0.5);
        assert_eq!(span.progress(Time(9.0)), 1.0);
        assert!(span.is_finished(Time(2.5)));
        assert!(!span.is_finished(Time(2.4)));
    }

    #[test]
    fn zero_length_span_completes_immediately() {
        let span = TimeSpan::starting_at(Time(1.0), 0.0);
        assert_eq!(span.progress(Time(1.0)), 1.0);
        assert_eq!(span.progress(Time(0.5)), 0.0);
    }
}
