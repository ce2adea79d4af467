use crate::types::Tick;

/// Turns irregular wall-clock readings into a sequence of fixed steps.
///
/// The clock only counts; what a step does is up to the caller. Steps are
/// yielded lazily so a caller that finishes mid-frame can stop consuming and
/// leave the residue untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    step_seconds: f64,
    accumulated: f64,
    last_now: Option<f64>,
    tick: Tick,
}

impl SimulationClock {
    pub fn new(step_seconds: f64) -> Self {
        SimulationClock {
            step_seconds,
            accumulated: 0.0,
            last_now: None,
            tick: 0,
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    /// Feed the current wall time in seconds. The first reading only sets the
    /// reference point. A clock that goes backwards contributes nothing, and
    /// a non-finite reading is dropped without moving the reference.
    pub fn advance(&mut self, now_seconds: f64) -> FixedSteps<'_> {
        if !now_seconds.is_finite() {
            return FixedSteps { clock: self };
        }
        if let Some(last) = self.last_now {
            let delta = now_seconds - last;
            if delta > 0.0 {
                self.accumulated += delta;
            }
        }
        self.last_now = Some(now_seconds);
        FixedSteps { clock: self }
    }
}

/// Iterator over the fixed steps owed after one [`SimulationClock::advance`].
/// Each item is the tick number of the step, starting at 1.
pub struct FixedSteps<'a> {
    clock: &'a mut SimulationClock,
}

impl Iterator for FixedSteps<'_> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let clock = &mut *self.clock;
        if clock.step_seconds <= 0.0 || clock.accumulated < clock.step_seconds {
            return None;
        }
        clock.accumulated -= clock.step_seconds;
        clock.tick += 1;
        Some(clock.tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn first_reading_sets_reference() {
        let mut clock = SimulationClock::new(DT);
        assert_eq!(clock.advance(1000.0).count(), 0);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.accumulated(), 0.0);
    }

    #[test]
    fn one_second_is_sixty_steps() {
        let mut clock = SimulationClock::new(DT);
        clock.advance(0.0).count();
        // A hair over one second so float residue cannot drop the last step.
        let ticks: Vec<Tick> = clock.advance(1.0 + 1e-9).collect();
        assert_eq!(ticks.len(), 60);
        assert_eq!(ticks.first(), Some(&1));
        assert_eq!(ticks.last(), Some(&60));
    }

    #[test]
    fn residue_carries_forward() {
        let mut clock = SimulationClock::new(0.25);
        clock.advance(0.0).count();
        assert_eq!(clock.advance(0.375).count(), 1);
        assert_eq!(clock.accumulated(), 0.125);
        assert_eq!(clock.advance(0.5).count(), 1);
        assert_eq!(clock.accumulated(), 0.0);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn backwards_time_is_ignored() {
        let mut clock = SimulationClock::new(0.25);
        clock.advance(10.0).count();
        assert_eq!(clock.advance(5.0).count(), 0);
        assert_eq!(clock.accumulated(), 0.0);
        // Reference moves to the new reading.
        assert_eq!(clock.advance(5.5).count(), 2);
    }

    #[test]
    fn non_finite_readings_are_dropped() {
        let mut clock = SimulationClock::new(0.25);
        clock.advance(0.0).count();
        assert_eq!(clock.advance(f64::NAN).count(), 0);
        assert_eq!(clock.advance(f64::INFINITY).count(), 0);
        assert_eq!(clock.accumulated(), 0.0);
        assert_eq!(clock.advance(0.5).count(), 2);

        // Nothing anchors on a bad first reading either.
        let mut clock = SimulationClock::new(0.25);
        clock.advance(f64::NAN).count();
        assert_eq!(clock.advance(3.0).count(), 0);
        assert_eq!(clock.advance(3.25).count(), 1);
    }

    #[test]
    fn stopping_early_keeps_residue() {
        let mut clock = SimulationClock::new(0.25);
        clock.advance(0.0).count();
        let taken: Vec<Tick> = clock.advance(1.0).take(1).collect();
        assert_eq!(taken, vec![1]);
        assert_eq!(clock.accumulated(), 0.75);
        assert_eq!(clock.advance(1.0).count(), 3);
        assert_eq!(clock.tick(), 4);
    }

    proptest! {
        #[test]
        fn ticks_are_consecutive(frames in proptest::collection::vec(0.0f64..0.2, 1..200)) {
            let mut clock = SimulationClock::new(DT);
            let mut now = 0.0;
            clock.advance(now).count();
            let mut expected = 1;
            for dt in frames {
                now += dt;
                for tick in clock.advance(now) {
                    prop_assert_eq!(tick, expected);
                    expected += 1;
                }
                prop_assert!(clock.accumulated() >= 0.0);
                prop_assert!(clock.accumulated() < DT);
            }
        }
    }
}
