use foundation::time::{Time, TimeSpan};

use crate::symbology::Color;

/// Symmetric cubic easing; slow start, fast middle, slow finish.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FillTransition {
    pub from: Color,
    pub to: Color,
    pub span: TimeSpan,
}

impl FillTransition {
    pub fn new(from: Color, to: Color, start: Time, duration_s: f64) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::starting_at(start, duration_s),
        }
    }

    pub fn sample(&self, now: Time) -> Color {
        self.from
            .lerp(self.to, ease_cubic_in_out(self.span.progress(now)))
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.span.is_finished(now)
    }
}

/// Fill of one shape: the last settled color plus at most one in-flight
/// transition. Retargeting replaces the transition; it never queues.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FillState {
    settled: Option<Color>,
    active: Option<FillTransition>,
}

impl FillState {
    /// Color on screen at `now`; `None` until the first paint.
    pub fn displayed(&self, now: Time) -> Option<Color> {
        match self.active {
            Some(tr) => Some(tr.sample(now)),
            None => self.settled,
        }
    }

    /// Color the shape is heading to.
    pub fn target(&self) -> Option<Color> {
        self.active.map(|tr| tr.to).or(self.settled)
    }

    pub fn active(&self) -> Option<&FillTransition> {
        self.active.as_ref()
    }

    /// Start moving from whatever is displayed at `now` towards `to`.
    ///
    /// A never-painted shape has nothing to interpolate from and takes `to`
    /// immediately.
    pub fn retarget(&mut self, to: Color, now: Time, duration_s: f64) {
        match self.displayed(now) {
            None => {
                self.settled = Some(to);
                self.active = None;
            }
            Some(from) if self.active.is_none() && from == to => {}
            Some(from) => {
                self.settled = Some(from);
                self.active = Some(FillTransition::new(from, to, now, duration_s));
            }
        }
    }

    /// Folds a finished transition into the settled color.
    pub fn settle(&mut self, now: Time) -> Option<Color> {
        if let Some(tr) = self.active
            && tr.is_finished(now)
        {
            self.settled = Some(tr.to);
            self.active = None;
        }
        self.displayed(now)
    }

    pub fn is_animating(&self, now: Time) -> bool {
        self.active.is_some_and(|tr| !tr.is_finished(now))
    }
}

#[cfg(test)]
mod tests {
    use super::{FillState, FillTransition, ease_cubic_in_out};
    use crate::symbology::Color;
    use foundation::time::Time;

    const WHITE: Color = Color::rgb(255, 255, 255);
    const BLACK: Color = Color::rgb(0, 0, 0);
    const GREY: Color = Color::rgb(0xee, 0xee, 0xee);

    #[test]
    fn easing_fixed_points() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn transition_samples_between_endpoints() {
        let tr = FillTransition::new(WHITE, BLACK, Time(1.0), 0.5);
        assert_eq!(tr.sample(Time(0.0)), WHITE);
        assert_eq!(tr.sample(Time(1.25)), Color::rgb(128, 128, 128));
        assert_eq!(tr.sample(Time(2.0)), BLACK);
        assert!(tr.is_finished(Time(1.5)));
    }

    #[test]
    fn first_paint_is_immediate() {
        let mut fill = FillState::default();
        assert_eq!(fill.displayed(Time(0.0)), None);
        fill.retarget(GREY, Time(0.0), 0.5);
        assert_eq!(fill.displayed(Time(0.0)), Some(GREY));
        assert!(!fill.is_animating(Time(0.0)));
    }

    #[test]
    fn retarget_mid_flight_starts_from_displayed_color() {
        let mut fill = FillState::default();
        fill.retarget(WHITE, Time(0.0), 0.5);
        fill.retarget(BLACK, Time(1.0), 0.5);
        let mid = fill.displayed(Time(1.25)).expect("painted");
        assert_eq!(mid, Color::rgb(128, 128, 128));

        // Last write wins: the new transition departs from the in-flight color.
        fill.retarget(GREY, Time(1.25), 0.5);
        assert_eq!(fill.active().map(|t| t.from), Some(mid));
        assert_eq!(fill.target(), Some(GREY));
        assert!(fill.is_animating(Time(1.5)));

        assert_eq!(fill.settle(Time(1.75)), Some(GREY));
        assert!(fill.active().is_none());
        assert!(!fill.is_animating(Time(1.75)));
    }

    #[test]
    fn retarget_to_same_settled_color_is_a_no_op() {
        let mut fill = FillState::default();
        fill.retarget(GREY, Time(0.0), 0.5);
        fill.retarget(GREY, Time(1.0), 0.5);
        assert!(fill.active().is_none());
    }
}
