use std::collections::{BTreeSet, HashSet};

use log::trace;

use crate::model::{Message, MessageId};

/// Which way the single read/unread toggle points for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadToggle {
    MarkRead,
    MarkUnread,
}

impl ReadToggle {
    pub fn target(self) -> bool {
        self == Self::MarkRead
    }
}

/// Ids of selected rows, kept ordered so batch requests list them ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<MessageId>,
}

impl SelectionSet {
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: MessageId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = MessageId>) {
        self.ids.extend(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove_all(&mut self, ids: &[MessageId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> Vec<MessageId> {
        self.ids.iter().copied().collect()
    }

    /// Drops every selected id that is not in `live_ids`. Returns how many
    /// were dropped.
    pub fn reconcile(&mut self, live_ids: &HashSet<MessageId>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| live_ids.contains(id));
        let dropped = before - self.ids.len();
        if dropped > 0 {
            trace!("dropped {dropped} selected ids no longer loaded");
        }
        dropped
    }

    fn selected<'a>(&'a self, rows: &'a [Message]) -> impl Iterator<Item = &'a Message> {
        rows.iter().filter(|row| self.contains(row.id()))
    }

    /// True iff something is selected and every selected loaded row is read.
    pub fn all_selected_read(&self, rows: &[Message]) -> bool {
        let mut selected = self.selected(rows).peekable();
        selected.peek().is_some() && selected.all(Message::is_read)
    }

    /// True iff something is selected and every selected loaded row is unread.
    pub fn all_selected_unread(&self, rows: &[Message]) -> bool {
        let mut selected = self.selected(rows).peekable();
        selected.peek().is_some() && selected.all(|row| !row.is_read())
    }

    /// `None` while nothing loaded is selected. Mixed selections are marked read.
    pub fn read_toggle(&self, rows: &[Message]) -> Option<ReadToggle> {
        if self.selected(rows).next().is_none() {
            None
        } else if self.all_selected_read(rows) {
            Some(ReadToggle::MarkUnread)
        } else {
            Some(ReadToggle::MarkRead)
        }
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use crate::model::MessageBuilder;

    use super::*;

    fn id(id: u64) -> MessageId {
        MessageId::from(id)
    }

    fn message(message_id: u64, is_read: bool) -> Message {
        assert_ok!(
            MessageBuilder::default()
                .id(message_id)
                .is_read(is_read)
                .build()
        )
    }

    #[fixture]
    fn rows() -> Vec<Message> {
        vec![message(1, true), message(2, false), message(3, true)]
    }

    #[fixture]
    fn selection() -> SelectionSet {
        SelectionSet::default()
    }

    #[rstest]
    fn test_toggle_adds_and_removes(mut selection: SelectionSet) {
        assert!(selection.toggle(id(3)));
        assert!(selection.contains(id(3)));
        assert!(!selection.toggle(id(3)));
        assert!(!selection.contains(id(3)));
        assert!(selection.is_empty());
    }

    #[rstest]
    fn test_ids_are_sorted(mut selection: SelectionSet) {
        selection.toggle(id(9));
        selection.toggle(id(3));
        selection.toggle(id(7));

        assert_eq!(vec![id(3), id(7), id(9)], selection.ids());
    }

    #[rstest]
    fn test_reconcile_drops_ids_not_loaded(mut selection: SelectionSet) {
        selection.select_all([id(1), id(2), id(5)]);

        let dropped = selection.reconcile(&HashSet::from([id(1), id(2), id(3)]));

        assert_eq!(1, dropped);
        assert_eq!(vec![id(1), id(2)], selection.ids());
    }

    #[rstest]
    fn test_reconcile_against_empty_page_clears(mut selection: SelectionSet) {
        selection.select_all([id(1), id(2)]);

        selection.reconcile(&HashSet::new());

        assert!(selection.is_empty());
    }

    #[rstest]
    fn test_remove_all_keeps_others(mut selection: SelectionSet) {
        selection.select_all([id(1), id(2), id(3)]);

        selection.remove_all(&[id(2), id(4)]);

        assert_eq!(2, selection.len());
        assert!(!selection.contains(id(2)));
    }

    #[rstest]
    fn test_empty_selection_is_neither_read_nor_unread(
        selection: SelectionSet,
        rows: Vec<Message>,
    ) {
        assert!(!selection.all_selected_read(&rows));
        assert!(!selection.all_selected_unread(&rows));
        assert_none!(selection.read_toggle(&rows));
    }

    #[rstest]
    fn test_all_read_selection_toggles_to_unread(mut selection: SelectionSet, rows: Vec<Message>) {
        selection.select_all([id(1), id(3)]);

        assert!(selection.all_selected_read(&rows));
        assert!(!selection.all_selected_unread(&rows));
        assert_eq!(Some(ReadToggle::MarkUnread), selection.read_toggle(&rows));
    }

    #[rstest]
    fn test_all_unread_selection_toggles_to_read(mut selection: SelectionSet, rows: Vec<Message>) {
        selection.toggle(id(2));

        assert!(selection.all_selected_unread(&rows));
        assert_eq!(Some(ReadToggle::MarkRead), selection.read_toggle(&rows));
    }

    #[rstest]
    fn test_mixed_selection_toggles_to_read(mut selection: SelectionSet, rows: Vec<Message>) {
        selection.select_all([id(1), id(2)]);

        assert!(!selection.all_selected_read(&rows));
        assert!(!selection.all_selected_unread(&rows));
        assert_eq!(Some(ReadToggle::MarkRead), selection.read_toggle(&rows));
    }

    #[rstest]
    fn test_selection_of_unloaded_rows_has_no_polarity(
        mut selection: SelectionSet,
        rows: Vec<Message>,
    ) {
        selection.toggle(id(42));

        assert!(!selection.all_selected_read(&rows));
        assert_none!(selection.read_toggle(&rows));
    }
}
