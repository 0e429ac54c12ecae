use crate::route::Interval;

/// Cursor over `{interval index -> repeat index}`.
#[derive(Debug, Clone)]
pub struct IntervalProgress {
    intervals: Vec<Interval>,
    interval: usize,
    repeat: u32,
}

impl IntervalProgress {
    /// Expects a validated, non-empty interval list.
    pub fn new(intervals: Vec<Interval>) -> Self {
        IntervalProgress {
            intervals,
            interval: 0,
            repeat: 0,
        }
    }

    #[inline]
    pub fn current(&self) -> Interval {
        self.intervals[self.interval]
    }

    #[inline]
    pub fn position(&self) -> (usize, u32) {
        (self.interval, self.repeat)
    }

    pub fn total_length(&self) -> f64 {
        self.intervals.iter().map(|i| i.repeats as f64 * i.length).sum()
    }

    pub fn is_last(&self) -> bool {
        self.peek_next().is_none()
    }

    fn peek_next(&self) -> Option<(usize, u32)> {
        if self.repeat + 1 < self.intervals[self.interval].repeats {
            Some((self.interval, self.repeat + 1))
        } else if self.interval + 1 < self.intervals.len() {
            Some((self.interval + 1, 0))
        } else {
            None
        }
    }

    /// Moves to the next repeat, returning its position, or `None` when
    /// the last repeat is done.
    pub fn advance(&mut self) -> Option<(usize, u32)> {
        let next = self.peek_next()?;
        self.interval = next.0;
        self.repeat = next.1;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(repeats: u32, length: f64) -> Interval {
        Interval {
            repeats,
            length,
            rest_seconds: 60.0,
        }
    }

    #[test]
    fn test_walks_repeats_then_intervals() {
        let mut progress = IntervalProgress::new(vec![interval(2, 0.25), interval(1, 1.0)]);

        assert_eq!(progress.position(), (0, 0));
        assert_eq!(progress.advance(), Some((0, 1)));
        assert_eq!(progress.advance(), Some((1, 0)));
        assert_eq!(progress.current().length, 1.0);
        assert!(progress.is_last());
        assert_eq!(progress.advance(), None);
        assert_eq!(progress.position(), (1, 0));
    }

    #[test]
    fn test_total_length() {
        let progress = IntervalProgress::new(vec![interval(4, 0.25), interval(2, 1.5)]);

        assert!((progress.total_length() - 4.0).abs() < 1e-12);
    }
}
