use crate::stroke::Stroke;

/// Ordered stroke history with undo/redo. Insertion order is paint order.
/// Every operation is a list tail move; stroke geometry is never copied.
///
/// Committing a new stroke drops the redoable list, the usual undo/redo
/// convention.
#[derive(Debug, Default)]
pub struct HistoryStack {
    committed: Vec<Stroke>,
    redoable: Vec<Stroke>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, stroke: Stroke) {
        self.redoable.clear();
        self.committed.push(stroke);
    }

    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(stroke) => {
                self.redoable.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redoable.pop() {
            Some(stroke) => {
                self.committed.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.redoable.clear();
    }

    /// Drop the current contents and start over from a saved document.
    pub fn replace(&mut self, strokes: Vec<Stroke>) {
        self.committed = strokes;
        self.redoable.clear();
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn redoable(&self) -> &[Stroke] {
        &self.redoable
    }
}
