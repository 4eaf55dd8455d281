//! Bounded per-host latency history.

/// One probe outcome retained in history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Round-trip latency in milliseconds.
    Latency(f64),
    /// The probe failed or timed out.
    Failed,
}

impl Sample {
    pub fn is_success(&self) -> bool {
        matches!(self, Sample::Latency(_))
    }
}

/// Fixed-capacity circular buffer of samples, oldest evicted first.
///
/// Backed by a preallocated slot arena with head/len indices; the buffer is
/// never resized after construction.
#[derive(Debug, Clone)]
pub struct History {
    slots: Vec<Sample>,
    head: usize,
    len: usize,
}

impl History {
    /// Create an empty history. Capacity below 1 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![Sample::Failed; capacity],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a sample, evicting the oldest once the buffer is full.
    pub fn push(&mut self, sample: Sample) {
        let cap = self.slots.len();
        if self.len < cap {
            self.slots[(self.head + self.len) % cap] = sample;
            self.len += 1;
        } else {
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % cap;
        }
    }

    /// Iterate samples oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        let cap = self.slots.len();
        (0..self.len).map(move |i| self.slots[(self.head + i) % cap])
    }

    /// Owned chronological copy, for reads that outlive the lock.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = History::new(4);
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.capacity(), 4);
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut history = History::new(0);
        assert_eq!(history.capacity(), 1);

        history.push(Sample::Latency(1.0));
        history.push(Sample::Latency(2.0));
        assert_eq!(history.snapshot(), vec![Sample::Latency(2.0)]);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut history = History::new(8);
        history.push(Sample::Latency(10.0));
        history.push(Sample::Failed);
        history.push(Sample::Latency(30.0));

        assert_eq!(
            history.snapshot(),
            vec![Sample::Latency(10.0), Sample::Failed, Sample::Latency(30.0)]
        );
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut history = History::new(3);
        for i in 0..10 {
            history.push(Sample::Latency(i as f64));
            assert!(history.len() <= 3);
        }
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn keeps_most_recent_after_wrap() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(Sample::Latency(i as f64));
        }

        // Five insertions into capacity three leaves the last three.
        assert_eq!(
            history.snapshot(),
            vec![
                Sample::Latency(2.0),
                Sample::Latency(3.0),
                Sample::Latency(4.0),
            ]
        );
    }

    #[test]
    fn wraps_repeatedly() {
        let mut history = History::new(2);
        for i in 0..101 {
            history.push(Sample::Latency(i as f64));
        }
        assert_eq!(
            history.snapshot(),
            vec![Sample::Latency(99.0), Sample::Latency(100.0)]
        );
    }
}
