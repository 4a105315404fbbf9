use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

use crate::model::MessageId;

pub const MESSAGES_PATH: &str = "/api/messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request body of a batch mutation on the collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MutationBody {
    Update {
        ids: Vec<MessageId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_read: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_archived: Option<bool>,
    },
    Delete {
        ids: Vec<MessageId>,
    },
}

impl MutationBody {
    pub fn ids(&self) -> &[MessageId] {
        match self {
            Self::Update { ids, .. } | Self::Delete { ids } => ids,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Update { .. } => Method::Put,
            Self::Delete { .. } => Method::Delete,
        }
    }

    /// Key of the affected-row count in the response.
    pub fn count_key(&self) -> &'static str {
        match self {
            Self::Update { .. } => "updated",
            Self::Delete { .. } => "deleted",
        }
    }
}
