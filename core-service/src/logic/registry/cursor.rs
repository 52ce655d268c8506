//! Replay cursor over a finite record sequence.

/// Position of the next record to replay. Always within `[0, len)` once
/// stepped; wraps back to 0 after the last record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayCursor {
    index: usize,
    len: usize,
}

/// Outcome of one cursor step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Index of the record to replay now
    pub index: usize,
    /// True when this step restarted the sequence
    pub wrapped: bool,
}

impl ReplayCursor {
    /// `len` must be non-zero; sequences are validated at dataset load
    pub fn new(len: usize) -> Self {
        Self { index: 0, len: len.max(1) }
    }

    pub fn step(&mut self) -> Step {
        let wrapped = self.index >= self.len;
        if wrapped {
            self.index = 0;
        }

        let index = self.index;
        self.index += 1;

        Step { index, wrapped }
    }

    /// Index the next step will replay (before wrap handling)
    pub fn position(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_walks_then_wraps() {
        let mut cursor = ReplayCursor::new(3);
        let indices: Vec<_> = (0..7).map(|_| cursor.step()).collect();

        assert_eq!(
            indices.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 0, 1, 2, 0]
        );
        assert_eq!(
            indices.iter().map(|s| s.wrapped).collect::<Vec<_>>(),
            vec![false, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_single_record_sequence() {
        let mut cursor = ReplayCursor::new(1);
        assert_eq!(cursor.step(), Step { index: 0, wrapped: false });
        assert_eq!(cursor.step(), Step { index: 0, wrapped: true });
        assert_eq!(cursor.step(), Step { index: 0, wrapped: true });
    }
}
