use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A wall-clock reading in milliseconds.
pub type Millis = f64;

/// Monotonic millisecond time source.
///
/// Implementations must never go backwards for the lifetime of a loop.
/// Callers do not guard against violations.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Clock backed by `Instant`, measured from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test can hand one copy to the loop and
/// keep another to drive time forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, ms: Millis) {
        debug_assert!(ms >= 0.0, "ManualClock cannot run backwards");
        self.now.set(self.now.get() + ms);
    }

    pub fn advance_by(&self, d: Duration) {
        self.advance(d.as_secs_f64() * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();
        handle.advance(5.0);
        assert_eq!(clock.now(), 15.0);

        handle.advance_by(Duration::from_millis(2));
        assert_eq!(clock.now(), 17.0);
    }
}
