use std::fmt::{Display, Formatter, Result};

use derive_builder::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<MessageId> for u64 {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

/// A single row of the remote collection.
///
/// Rows are replaced wholesale by every applied fetch. The only in-place
/// changes happen on the copy held by the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Message {
    id: MessageId,
    #[builder(default)]
    sender: String,
    #[builder(default)]
    receiver: String,
    #[builder(default)]
    subject: String,
    #[builder(default)]
    body: String,
    #[builder(default)]
    created_at: Timestamp,
    #[serde(default)]
    #[builder(default)]
    is_read: bool,
    #[serde(default)]
    #[builder(default)]
    is_archived: bool,
}

impl Message {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub(crate) fn set_read(&mut self, is_read: bool) {
        self.is_read = is_read;
    }

    pub(crate) fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }
}
