//! Undo/redo history over the measurement set.
//!
//! The history is an append-only sequence of complete measurement-set
//! snapshots with a movable cursor. Every mutation records a new snapshot
//! after truncating anything past the cursor, so undo/redo is strictly
//! linear: editing after an undo discards the redo branch.

use crate::measurement::Measurement;

/// Snapshot history with linear undo semantics.
///
/// Invariants: the snapshot list is never empty, the first snapshot is
/// always the empty set, and the cursor always indexes a live snapshot.
#[derive(Debug, Clone)]
pub struct MeasurementHistory {
    snapshots: Vec<Vec<Measurement>>,
    cursor: usize,
}

impl MeasurementHistory {
    /// A fresh history holding only the empty set.
    pub fn new() -> Self {
        Self {
            snapshots: vec![Vec::new()],
            cursor: 0,
        }
    }

    /// Record a new snapshot, discarding any redo branch first.
    pub fn record(&mut self, set: Vec<Measurement>) {
        if self.cursor + 1 < self.snapshots.len() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(set);
        self.cursor = self.snapshots.len() - 1;
        log::debug!(
            "History: recorded snapshot {} ({} measurements)",
            self.cursor,
            self.current().len()
        );
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Step the cursor back, returning the now-current set. No-op at the
    /// initial snapshot.
    pub fn undo(&mut self) -> Option<&[Measurement]> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::debug!("History: undo to snapshot {}", self.cursor);
        Some(self.current())
    }

    /// Step the cursor forward, returning the now-current set. No-op at
    /// the newest snapshot.
    pub fn redo(&mut self) -> Option<&[Measurement]> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::debug!("History: redo to snapshot {}", self.cursor);
        Some(self.current())
    }

    /// The measurement set at the cursor.
    pub fn current(&self) -> &[Measurement] {
        &self.snapshots[self.cursor]
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when only the initial empty snapshot exists.
    pub fn is_empty(&self) -> bool {
        self.snapshots.len() == 1 && self.cursor == 0
    }

    /// Current cursor index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reinitialize to a single empty snapshot.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.snapshots.push(Vec::new());
        self.cursor = 0;
        log::debug!("History cleared");
    }
}

impl Default for MeasurementHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::measurement::MeasurementShape;

    fn sample(id: &str) -> Measurement {
        Measurement {
            id: id.to_string(),
            value: "1.0 mm".to_string(),
            shape: MeasurementShape::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 0.0),
            },
            timestamp_ms: 0,
        }
    }

    fn ids(set: &[Measurement]) -> Vec<&str> {
        set.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_starts_with_empty_snapshot() {
        let history = MeasurementHistory::new();
        assert!(history.current().is_empty());
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_flow() {
        let mut history = MeasurementHistory::new();
        history.record(vec![sample("a")]);
        history.record(vec![sample("a"), sample("b")]);

        assert_eq!(ids(history.undo().unwrap()), vec!["a"]);
        assert!(history.undo().unwrap().is_empty());
        assert!(history.undo().is_none());

        assert_eq!(ids(history.redo().unwrap()), vec!["a"]);
        assert_eq!(ids(history.redo().unwrap()), vec!["a", "b"]);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_after_undo_discards_redo_branch() {
        let mut history = MeasurementHistory::new();
        history.record(vec![sample("a")]);
        history.record(vec![sample("a"), sample("b")]);
        history.undo();

        history.record(vec![sample("a"), sample("c")]);
        assert!(!history.can_redo());
        assert_eq!(ids(history.current()), vec!["a", "c"]);
        // Initial empty, ["a"], ["a", "c"].
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_replay_matches_cursor_prefix() {
        // The set at the cursor always equals replaying records up to it.
        let mut history = MeasurementHistory::new();
        let steps = [vec![sample("a")], vec![sample("a"), sample("b")], vec![
            sample("b"),
        ]];
        for step in &steps {
            history.record(step.clone());
        }
        history.undo();
        history.undo();
        assert_eq!(ids(history.current()), ids(&steps[0]));
        history.redo();
        assert_eq!(ids(history.current()), ids(&steps[1]));
    }

    #[test]
    fn test_reset() {
        let mut history = MeasurementHistory::new();
        history.record(vec![sample("a")]);
        history.reset();
        assert!(history.is_empty());
        assert!(history.current().is_empty());
        assert!(!history.can_undo() && !history.can_redo());
    }
}
