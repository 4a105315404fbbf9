use log::trace;

use crate::{
    inbox::BatchAction,
    model::{Message, MessageId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchedField {
    Read(bool),
    Archived(bool),
}

/// The one field of the open message a local patch changed, with its value
/// before the patch, used to undo it if the mutation behind it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPatch {
    id: MessageId,
    previous: PatchedField,
}

/// The message shown in full.
///
/// The held copy is the one place a message changes locally: read and
/// archived flags are patched as soon as a mutation for the open message is
/// issued. The next fetch containing the message replaces the copy.
#[derive(Debug, Default)]
pub struct DetailViewController {
    active: Option<Message>,
    auto_read_issued: Option<MessageId>,
}

impl DetailViewController {
    /// Shows `message`. Returns the patch when the message was unread and the
    /// caller must now send the single mark-read mutation.
    ///
    /// Opening the message that is already open does nothing, so the
    /// mark-read mutation goes out at most once per opened message.
    pub fn open(&mut self, message: Message) -> Option<DetailPatch> {
        if self.active_id() == Some(message.id()) {
            trace!("message {} already open", message.id());
            return None;
        }

        let id = message.id();
        let unread = !message.is_read();
        self.active = Some(message);
        self.auto_read_issued = None;

        if unread {
            self.auto_read_issued = Some(id);
            self.patch(BatchAction::SetRead(true))
        } else {
            None
        }
    }

    pub fn close(&mut self) {
        self.active = None;
        self.auto_read_issued = None;
    }

    pub fn active(&self) -> Option<&Message> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<MessageId> {
        self.active.as_ref().map(Message::id)
    }

    pub fn auto_read_issued(&self) -> Option<MessageId> {
        self.auto_read_issued
    }

    /// Applies `action` to the open copy. `None` when nothing is open or the
    /// open message is already in the requested state.
    pub fn patch(&mut self, action: BatchAction) -> Option<DetailPatch> {
        let message = self.active.as_mut()?;
        let previous = match action {
            BatchAction::SetRead(is_read) if message.is_read() != is_read => {
                message.set_read(is_read);
                PatchedField::Read(!is_read)
            }
            BatchAction::SetArchived(is_archived) if message.is_archived() != is_archived => {
                message.set_archived(is_archived);
                PatchedField::Archived(!is_archived)
            }
            _ => return None,
        };

        Some(DetailPatch {
            id: message.id(),
            previous,
        })
    }

    /// Undoes `patch` if its message is still open. Other fields keep their
    /// value, including those changed by patches still in flight.
    pub fn revert(&mut self, patch: DetailPatch) {
        if let Some(message) = self.active.as_mut().filter(|m| m.id() == patch.id) {
            trace!("reverting local patch of message {}", patch.id);
            match patch.previous {
                PatchedField::Read(is_read) => message.set_read(is_read),
                PatchedField::Archived(is_archived) => message.set_archived(is_archived),
            }
        }
    }

    /// Replaces the open copy with its row from a fetch, if present.
    pub fn sync_from(&mut self, rows: &[Message]) {
        let Some(id) = self.active_id() else {
            return;
        };
        if let Some(row) = rows.iter().find(|row| row.id() == id) {
            self.active = Some(row.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use crate::model::MessageBuilder;

    use super::*;

    fn message(id: u64, is_read: bool) -> Message {
        assert_ok!(MessageBuilder::default().id(id).is_read(is_read).build())
    }

    #[fixture]
    fn detail() -> DetailViewController {
        DetailViewController::default()
    }

    #[rstest]
    fn test_open_unread_requests_mark_read_and_patches(mut detail: DetailViewController) {
        let patch = assert_some!(detail.open(message(5, false)));

        assert_eq!(MessageId::from(5), patch.id);
        assert_eq!(PatchedField::Read(false), patch.previous);
        assert!(assert_some!(detail.active()).is_read());
        assert_eq!(Some(MessageId::from(5)), detail.auto_read_issued());
    }

    #[rstest]
    fn test_open_read_message_requests_nothing(mut detail: DetailViewController) {
        assert_none!(detail.open(message(5, true)));
        assert_none!(detail.auto_read_issued());
        assert_eq!(Some(MessageId::from(5)), detail.active_id());
    }

    #[rstest]
    fn test_reopening_open_message_requests_nothing(mut detail: DetailViewController) {
        assert_some!(detail.open(message(5, false)));

        assert_none!(detail.open(message(5, false)));
    }

    #[rstest]
    fn test_close_then_open_requests_again(mut detail: DetailViewController) {
        assert_some!(detail.open(message(5, false)));
        detail.close();

        assert_none!(detail.active());
        assert_some!(detail.open(message(5, false)));
    }

    #[rstest]
    fn test_patch_skips_when_already_in_state(mut detail: DetailViewController) {
        detail.open(message(5, true));

        assert_none!(detail.patch(BatchAction::SetRead(true)));
        assert_none!(detail.patch(BatchAction::SetArchived(false)));
        assert_none!(detail.patch(BatchAction::Delete));
    }

    #[rstest]
    fn test_patch_without_open_message(mut detail: DetailViewController) {
        assert_none!(detail.patch(BatchAction::SetRead(true)));
    }

    #[rstest]
    fn test_revert_restores_previous_flags(mut detail: DetailViewController) {
        detail.open(message(5, true));
        let patch = assert_some!(detail.patch(BatchAction::SetArchived(true)));
        assert!(assert_some!(detail.active()).is_archived());

        detail.revert(patch);

        let active = assert_some!(detail.active());
        assert!(!active.is_archived());
        assert!(active.is_read());
    }

    #[rstest]
    fn test_revert_keeps_field_of_overlapping_patch(mut detail: DetailViewController) {
        detail.open(message(5, true));
        let archive = assert_some!(detail.patch(BatchAction::SetArchived(true)));
        assert_some!(detail.patch(BatchAction::SetRead(false)));

        detail.revert(archive);

        let active = assert_some!(detail.active());
        assert!(!active.is_archived());
        assert!(!active.is_read());
    }

    #[rstest]
    fn test_revert_ignores_other_message(mut detail: DetailViewController) {
        let patch = assert_some!(detail.open(message(5, false)));
        detail.close();
        detail.open(message(6, true));

        detail.revert(patch);

        assert!(assert_some!(detail.active()).is_read());
    }

    #[rstest]
    fn test_sync_from_replaces_open_copy(mut detail: DetailViewController) {
        detail.open(message(5, false));

        detail.sync_from(&[message(4, false), message(5, true)]);
        assert!(assert_some!(detail.active()).is_read());

        detail.sync_from(&[message(4, false)]);
        assert_eq!(Some(MessageId::from(5)), detail.active_id());
    }
}
