//! Bounded undo/redo of diagram snapshots.

use std::collections::VecDeque;

use crate::diagram::Diagram;

/// Undo and redo stacks of whole-diagram snapshots.
///
/// The undo stack keeps at most `limit` snapshots, dropping the oldest.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Diagram>,
    redo: Vec<Diagram>,
    limit: usize,
}

impl History {
    /// Creates an empty history keeping at most `limit` undo steps.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            undo: VecDeque::with_capacity(limit),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records the state before a mutation and forgets the redo stack.
    pub fn record(&mut self, snapshot: Diagram) {
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
        self.redo.clear();
    }

    /// Steps back: returns the previous state and stores `current` for redo.
    pub fn undo(&mut self, current: Diagram) -> Option<Diagram> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Steps forward again: returns the undone state and stores `current`
    /// for undo.
    pub fn redo(&mut self, current: Diagram) -> Option<Diagram> {
        let next = self.redo.pop()?;
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use umlsketch_core::model::DiagramType;

    use super::*;

    fn state(counter: usize) -> Diagram {
        // The diagram type doubles as a cheap marker for which state this is
        let diagram_type = match counter % 4 {
            0 => DiagramType::Sequence,
            1 => DiagramType::Class,
            2 => DiagramType::Usecase,
            _ => DiagramType::Component,
        };
        Diagram::new(diagram_type)
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = History::new(10);
        assert!(!history.can_undo());

        history.record(state(0));
        let current = state(1);

        let previous = history.undo(current.clone()).unwrap();
        assert_eq!(previous, state(0));
        assert!(history.can_redo());

        let next = history.redo(previous).unwrap();
        assert_eq!(next, current);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new(10);
        history.record(state(0));
        history.undo(state(1)).unwrap();
        assert!(history.can_redo());

        history.record(state(2));
        assert!(!history.can_redo());
        assert_eq!(history.redo(state(3)), None);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(3);
        for counter in 0..5 {
            history.record(state(counter));
        }

        let mut current = state(1);
        let mut seen = Vec::new();
        while let Some(previous) = history.undo(current) {
            seen.push(previous.diagram_type());
            current = previous;
        }
        assert_eq!(
            seen,
            vec![
                DiagramType::Sequence,
                DiagramType::Component,
                DiagramType::Usecase
            ]
        );
    }

    #[test]
    fn test_zero_limit_keeps_one_step() {
        let mut history = History::new(0);
        history.record(state(0));
        history.record(state(1));

        assert_eq!(history.undo(state(2)), Some(state(1)));
        assert!(!history.can_undo());
    }
}
