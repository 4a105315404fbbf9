use std::collections::HashSet;

use log::warn;
use serde_json::Value;

use crate::{
    error::MalformedResponseError,
    model::{Message, MessageId, PageQuery},
};

/// One page of rows as returned by the server plus the size of the whole
/// filtered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    rows: Vec<Message>,
    total_items: u64,
    degraded: bool,
}

impl FetchResult {
    pub fn new(rows: Vec<Message>, total_items: u64) -> Self {
        Self {
            rows,
            total_items,
            degraded: false,
        }
    }

    /// Stands in for a response that could not be read. Its total of 0 says
    /// nothing about the collection.
    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Parses `{data: Message[] | null, pagination: {totalItems}}`.
    ///
    /// Rows that do not deserialize are dropped; a response whose shape is
    /// wrong as a whole is an error.
    pub fn parse(value: Value) -> Result<Self, MalformedResponseError> {
        let Value::Object(mut object) = value else {
            return Err(MalformedResponseError::NotAnObject);
        };

        let rows = match object.remove("data") {
            Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<Message>(item) {
                    Ok(message) => Some(message),
                    Err(e) => {
                        warn!("dropping unparsable row: {e}");
                        None
                    }
                })
                .collect(),
            _ => return Err(MalformedResponseError::RowsNotAnArray),
        };

        let total_items = object
            .get("pagination")
            .and_then(|pagination| pagination.get("totalItems"))
            .and_then(Value::as_u64)
            .ok_or(MalformedResponseError::MissingTotalItems)?;

        Ok(Self::new(rows, total_items))
    }

    /// Enforces what a page of `query` may contain: at most `pageSize` rows
    /// with unique ids.
    pub fn conform_to(mut self, query: &PageQuery) -> Self {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| {
            let unique = seen.insert(row.id());
            if !unique {
                warn!("dropping duplicate row {}", row.id());
            }
            unique
        });

        let page_size = query.page_size().get() as usize;
        if self.rows.len() > page_size {
            warn!(
                "server returned {} rows for a page of {page_size}, truncating",
                self.rows.len()
            );
            self.rows.truncate(page_size);
        }

        self
    }

    pub fn rows(&self) -> &[Message] {
        &self.rows
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn ids(&self) -> HashSet<MessageId> {
        self.rows.iter().map(Message::id).collect()
    }

    pub fn into_parts(self) -> (Vec<Message>, u64) {
        (self.rows, self.total_items)
    }
}
