use std::collections::BTreeSet;

use log::{debug, warn};
use serde_json::Value;

use crate::{
    api::{MESSAGES_PATH, MutationBody, Transport},
    error::ApiError,
    model::MessageId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    SetRead(bool),
    SetArchived(bool),
    Delete,
}

impl BatchAction {
    /// Whether a successful run takes the rows out of the current filtered view.
    pub fn removes_from_view(self) -> bool {
        matches!(self, Self::SetArchived(_) | Self::Delete)
    }

    pub fn success_text(self, affected: u64) -> String {
        let noun = if affected == 1 { "message" } else { "messages" };
        match self {
            Self::SetRead(true) => format!("Marked {affected} {noun} as read"),
            Self::SetRead(false) => format!("Marked {affected} {noun} as unread"),
            Self::SetArchived(true) => format!("Archived {affected} {noun}"),
            Self::SetArchived(false) => format!("Unarchived {affected} {noun}"),
            Self::Delete => format!("Deleted {affected} {noun}"),
        }
    }
}

/// One batch mutation, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    action: BatchAction,
    body: MutationBody,
}

impl MutationRequest {
    /// Builds the single request for `action` on `ids`. Duplicate ids are
    /// sent once; an empty id set yields `None` and nothing is sent.
    pub fn prepare(action: BatchAction, ids: impl IntoIterator<Item = MessageId>) -> Option<Self> {
        let ids: Vec<MessageId> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        if ids.is_empty() {
            debug!("{action:?} without ids, nothing to send");
            return None;
        }

        let body = match action {
            BatchAction::SetRead(is_read) => MutationBody::Update {
                ids,
                is_read: Some(is_read),
                is_archived: None,
            },
            BatchAction::SetArchived(is_archived) => MutationBody::Update {
                ids,
                is_read: None,
                is_archived: Some(is_archived),
            },
            BatchAction::Delete => MutationBody::Delete { ids },
        };

        Some(Self { action, body })
    }

    pub fn action(&self) -> BatchAction {
        self.action
    }

    pub fn ids(&self) -> &[MessageId] {
        self.body.ids()
    }

    pub fn body(&self) -> &MutationBody {
        &self.body
    }

    /// Sends the request and returns the number of affected messages the
    /// server reported.
    pub async fn send(&self, transport: &impl Transport, token: &str) -> Result<u64, ApiError> {
        let response = match transport
            .mutate(self.body.method(), MESSAGES_PATH, &self.body, token)
            .await
        {
            Ok(response) => response,
            Err(ApiError::Malformed(e)) => {
                warn!("unreadable response to {:?}: {e}", self.action);
                Value::Null
            }
            Err(e) => return Err(e),
        };

        let key = self.body.count_key();
        Ok(response.get(key).and_then(Value::as_u64).unwrap_or_else(|| {
            warn!("response to {:?} has no {key} count", self.action);
            0
        }))
    }
}
