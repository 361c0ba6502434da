use super::clock::Millis;

/// Fixed timestep accumulator.
///
/// Turns variable wall-clock deltas into a whole number of uniform simulation
/// steps. Leftover time is carried to the next call.
///
/// There is no ceiling on steps per call: a long stall is paid back in full on
/// the next iteration, so the step size stays the same no matter how the loop
/// was scheduled.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    step_ms: Millis,
    accumulator: Millis,
}

impl FixedStepScheduler {
    /// `step_ms` must be positive and finite.
    pub fn new(step_ms: Millis) -> Self {
        debug_assert!(step_ms > 0.0 && step_ms.is_finite(), "invalid step budget {step_ms}");
        Self {
            step_ms,
            accumulator: 0.0,
        }
    }

    /// Scheduler running `ups` steps per second.
    pub fn from_rate(ups: f64) -> Self {
        Self::new(1000.0 / ups)
    }

    /// Adds `elapsed_ms` and calls `on_step` once per whole step available.
    ///
    /// Returns the number of steps taken.
    pub fn advance_with<F>(&mut self, elapsed_ms: Millis, mut on_step: F) -> u64
    where
        F: FnMut(Millis),
    {
        debug_assert!(elapsed_ms >= 0.0, "negative elapsed time {elapsed_ms}");
        self.accumulator += elapsed_ms;

        let mut steps = 0;
        while self.accumulator >= self.step_ms {
            on_step(self.step_ms);
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }

    /// Same as [`advance_with`](Self::advance_with) without a step callback.
    pub fn advance(&mut self, elapsed_ms: Millis) -> u64 {
        self.advance_with(elapsed_ms, |_| {})
    }

    /// Residual time not yet consumed by a full step.
    pub fn accumulator(&self) -> Millis {
        self.accumulator
    }

    pub fn step_budget_ms(&self) -> Millis {
        self.step_ms
    }

    /// Interpolation alpha for rendering between steps, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_step_emits_one() {
        let mut s = FixedStepScheduler::new(25.0);
        assert_eq!(s.advance(25.0), 1);
        assert_eq!(s.accumulator(), 0.0);
    }

    #[test]
    fn step_count_is_floor_of_total() {
        let step = 25.0;
        for before in [0.0, 5.0, 12.5, 24.0] {
            for elapsed in [0.0, 1.0, 24.0, 25.0, 26.5, 74.0, 75.0, 250.0] {
                let mut s = FixedStepScheduler::new(step);
                s.advance(before);
                let expected = ((before + elapsed) / step).floor() as u64;

                assert_eq!(s.advance(elapsed), expected, "before={before} elapsed={elapsed}");
                assert!(s.accumulator() >= 0.0);
                assert!(s.accumulator() < step);
            }
        }
    }

    #[test]
    fn zero_elapsed_is_a_no_op() {
        let mut s = FixedStepScheduler::new(25.0);
        s.advance(10.0);
        for _ in 0..100 {
            assert_eq!(s.advance(0.0), 0);
            assert_eq!(s.accumulator(), 10.0);
        }
    }

    #[test]
    fn split_advance_matches_single_advance() {
        let pairs = [(10.0, 15.0), (24.0, 1.0), (30.0, 70.0), (0.0, 125.5), (62.5, 62.5)];
        for (e1, e2) in pairs {
            let mut split = FixedStepScheduler::new(25.0);
            let n = split.advance(e1) + split.advance(e2);

            let mut whole = FixedStepScheduler::new(25.0);
            assert_eq!(whole.advance(e1 + e2), n, "e1={e1} e2={e2}");
            assert_eq!(whole.accumulator(), split.accumulator());
        }
    }

    #[test]
    fn thirty_ups_with_uneven_frames() {
        let mut s = FixedStepScheduler::from_rate(30.0);

        assert_eq!(s.advance(16.0), 0);
        assert_eq!(s.accumulator(), 16.0);

        // 33 ms is still short of 33.33 ms.
        assert_eq!(s.advance(17.0), 0);
        assert_eq!(s.accumulator(), 33.0);

        assert_eq!(s.advance(17.0), 1);
        assert!((s.accumulator() - 16.6667).abs() < 1e-3, "acc = {}", s.accumulator());
    }

    #[test]
    fn stall_is_paid_back_in_one_burst() {
        let mut s = FixedStepScheduler::new(33.33);
        let mut calls = 0;
        let steps = s.advance_with(500.0, |dt| {
            assert_eq!(dt, 33.33);
            calls += 1;
        });
        assert_eq!(steps, 15);
        assert_eq!(calls, 15);
        assert!(s.accumulator() < 33.33);

        assert_eq!(s.advance(0.0), 0);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut s = FixedStepScheduler::new(20.0);
        s.advance(30.0);
        assert_eq!(s.alpha(), 0.5);
    }
}
