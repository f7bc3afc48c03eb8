use gridmark_model::{ParsedTable, TableError, TableRecord};

use crate::drag::{DragObserver, DragState};

/// Synchronous, single-writer editing engine over one [`TableRecord`].
///
/// Every mutation validates first, applies, bumps the record's metadata, then
/// notifies change listeners in registration order with the post-mutation
/// record. A listener that panics propagates to the caller; there is no
/// isolation. The editor is non-reentrant: listeners must not call back into
/// it.
pub struct TableEditor {
    pub(crate) record: TableRecord,
    pub(crate) drag: DragState,
    pub(crate) change_listeners: Vec<Box<dyn FnMut(&TableRecord)>>,
    pub(crate) drag_observers: Vec<Box<dyn DragObserver>>,
}

impl TableEditor {
    pub fn new(record: TableRecord) -> Self {
        TableEditor {
            record,
            drag: DragState::Idle,
            change_listeners: Vec::new(),
            drag_observers: Vec::new(),
        }
    }

    /// Build an editor straight from parser output.
    pub fn from_parsed(
        parsed: ParsedTable,
        source: impl Into<String>,
        table_index: usize,
    ) -> Result<Self, TableError> {
        Ok(Self::new(TableRecord::from_parsed(parsed, source, table_index)?))
    }

    /// Borrowed view of the current record.
    pub fn record(&self) -> &TableRecord {
        &self.record
    }

    /// Independent copy of the current record, for previews and undo history.
    pub fn snapshot(&self) -> TableRecord {
        self.record.clone()
    }

    /// Register a change listener. Listeners run synchronously after every
    /// mutation, in registration order.
    pub fn add_change_listener(&mut self, listener: impl FnMut(&TableRecord) + 'static) {
        self.change_listeners.push(Box::new(listener));
    }

    /// Register a drag observer. Observers run synchronously during drag
    /// transitions, in registration order.
    pub fn add_drag_observer(&mut self, observer: impl DragObserver + 'static) {
        self.drag_observers.push(Box::new(observer));
    }

    /// Serialize the current record; the engine's only persistence-facing
    /// surface.
    pub fn serialize_to_markdown(&self) -> String {
        gridmark_markdown::serialize_table(&self.record)
    }

    /// Bookkeeping after a value-level edit: cell contents changed, structure
    /// intact, raw lines stay usable.
    pub(crate) fn finish_value_edit(&mut self) {
        self.record.touch();
        self.notify_change();
    }

    /// Bookkeeping after a structural edit: row/column count or order
    /// changed. Discards the verbatim source lines irrecoverably.
    pub(crate) fn finish_structural_edit(&mut self) {
        self.record.discard_raw_lines();
        self.record.touch();
        self.notify_change();
    }

    pub(crate) fn notify_change(&mut self) {
        let record = &self.record;
        for listener in &mut self.change_listeners {
            listener(record);
        }
    }
}
