use crate::{
    error::{Error, Result},
    MAX_DEPTH,
};

/// Counts how deeply nested the current container is, and fails once it passes the limit.
///
/// The root document sits at depth 0. Each nested document or array is one level deeper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthTracker {
    depth: usize,
    max: usize,
}

impl DepthTracker {
    /// Create a new depth tracker
    pub fn new(max: usize) -> Self {
        Self { depth: 0, max }
    }

    /// Tracker for the next level down. Fails if that level would exceed the limit.
    pub fn descend(self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.max {
            log::debug!("nesting depth {} exceeds limit of {}", depth, self.max);
            return Err(Error::DepthLimit { max: self.max });
        }
        Ok(Self { depth, ..self })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for DepthTracker {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn limit() {
        let mut tracker = DepthTracker::new(3);
        for expected in 1..=3 {
            tracker = tracker.descend().unwrap();
            assert_eq!(tracker.depth(), expected);
        }
        assert_eq!(tracker.descend(), Err(Error::DepthLimit { max: 3 }));
    }

    #[test]
    fn zero_limit() {
        assert!(DepthTracker::new(0).descend().is_err());
        assert_eq!(DepthTracker::default().max(), MAX_DEPTH);
    }
}
