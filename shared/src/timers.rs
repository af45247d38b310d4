/// Generation counter for a group of scheduled callbacks.
///
/// Every timer or frame callback is armed with a ticket. Cancelling the
/// group bumps the generation, so callbacks that still fire afterwards (a
/// timeout already queued by the host, a frame already requested) see a
/// stale ticket and do nothing.
#[derive(Debug, Default, Clone)]
pub struct TimerGroup {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket {
    generation: u64,
}

impl TimerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) -> TimerTicket {
        TimerTicket {
            generation: self.generation,
        }
    }

    pub fn is_live(&self, ticket: TimerTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn cancel_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::TimerGroup;

    #[test]
    fn tickets_go_stale_after_cancel() {
        let mut group = TimerGroup::new();
        let before = group.arm();
        assert!(group.is_live(before));

        group.cancel_all();
        assert!(!group.is_live(before));

        let after = group.arm();
        assert!(group.is_live(after));
        assert_ne!(before, after);
    }

    #[test]
    fn generation_is_monotonic() {
        let mut group = TimerGroup::new();
        for expected in 1..=5 {
            group.cancel_all();
            assert_eq!(group.generation(), expected);
        }
    }
}
