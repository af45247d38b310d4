use crate::easing::{Easing, Tween};

pub const COUNT_UP_DURATION_MS: f64 = 2_000.0;

/// Animated integer display. A new value always starts from whatever is on
/// screen right now, so retargets never jump or restart from zero.
#[derive(Debug, Clone)]
pub struct CountUp {
    tween: Tween,
}

impl CountUp {
    pub fn new(initial: u64) -> Self {
        let v = initial as f64;
        Self {
            tween: Tween::new(v, v, 0.0, 0.0, Easing::EaseInOutQuart),
        }
    }

    pub fn target(&self) -> u64 {
        self.tween.to as u64
    }

    /// Returns `false` when `value` is already the target.
    pub fn set_target(&mut self, value: u64, now_ms: f64) -> bool {
        if value == self.target() {
            return false;
        }
        let from = self.tween.value_at(now_ms);
        self.tween = Tween::new(
            from,
            value as f64,
            now_ms,
            COUNT_UP_DURATION_MS,
            Easing::EaseInOutQuart,
        );
        true
    }

    pub fn value_at(&self, now_ms: f64) -> u64 {
        self.tween.value_at(now_ms).round().max(0.0) as u64
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        !self.tween.is_finished(now_ms)
    }
}

impl Default for CountUp {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{COUNT_UP_DURATION_MS, CountUp};

    fn frames(counter: &CountUp, start: f64, end: f64) -> Vec<u64> {
        let mut out = Vec::new();
        let mut t = start;
        while t <= end {
            out.push(counter.value_at(t));
            t += 16.0;
        }
        out
    }

    #[test]
    fn counts_up_monotonically_to_the_target() {
        let mut counter = CountUp::new(0);
        counter.set_target(12_345, 0.0);
        let values = frames(&counter, 0.0, COUNT_UP_DURATION_MS + 32.0);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.last(), Some(&12_345));
    }

    #[test]
    fn counts_down_monotonically() {
        let mut counter = CountUp::new(9_000);
        counter.set_target(150, 500.0);
        let values = frames(&counter, 500.0, 500.0 + COUNT_UP_DURATION_MS + 32.0);
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(values.last(), Some(&150));
    }

    #[test]
    fn retarget_continues_from_the_displayed_value() {
        let mut counter = CountUp::new(0);
        counter.set_target(1_000, 0.0);
        let shown = counter.value_at(1_000.0);
        assert!(shown > 0 && shown < 1_000);

        counter.set_target(5_000, 1_000.0);
        assert_eq!(counter.value_at(1_000.0), shown);
        let values = frames(&counter, 1_000.0, 1_000.0 + COUNT_UP_DURATION_MS + 32.0);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.last(), Some(&5_000));
    }

    #[test]
    fn same_target_is_a_no_op() {
        let mut counter = CountUp::new(7);
        assert!(!counter.set_target(7, 10.0));
        assert!(!counter.is_animating(10.0));
        assert!(counter.set_target(8, 10.0));
        assert!(counter.is_animating(11.0));
    }
}
