use std::{cell::RefCell, collections::HashMap};

use futures::channel::oneshot;
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    api::{MESSAGES_PATH, Method, Transport},
    error::ApiError,
};

type Reply = Result<Value, ApiError>;

#[derive(Debug, Clone)]
pub struct Call {
    pub key: String,
    pub token: String,
    pub body: Option<Value>,
}

struct Slot {
    sender: Option<oneshot::Sender<Reply>>,
    receiver: Option<oneshot::Receiver<Reply>>,
}

#[derive(Default)]
struct Queue {
    slots: Vec<Slot>,
    next_call: usize,
    next_reply: usize,
}

impl Queue {
    fn slot(&mut self, index: usize) -> &mut Slot {
        while self.slots.len() <= index {
            let (sender, receiver) = oneshot::channel();
            self.slots.push(Slot {
                sender: Some(sender),
                receiver: Some(receiver),
            });
        }
        &mut self.slots[index]
    }
}

/// Records every request and answers them from replies scripted per
/// request key (`"GET <path>"`, `"PUT /api/messages"`, ...).
///
/// Replies are matched to calls in order per key, independent of whether the
/// reply is scripted before or after the call happens. A call without a reply
/// stays pending.
#[derive(Default)]
pub struct MockTransport {
    calls: RefCell<Vec<Call>>,
    queues: RefCell<HashMap<String, Queue>>,
}

impl MockTransport {
    pub fn reply(&self, key: &str, reply: Reply) {
        let mut queues = self.queues.borrow_mut();
        let queue = queues.entry(key.to_string()).or_default();
        let index = queue.next_reply;
        queue.next_reply += 1;
        if let Some(sender) = queue.slot(index).sender.take() {
            let _ = sender.send(reply);
        }
    }

    pub fn reply_get(&self, path: &str, reply: Reply) {
        self.reply(&format!("GET {path}"), reply);
    }

    pub fn reply_post(&self, reply: Reply) {
        self.reply(&format!("POST {MESSAGES_PATH}"), reply);
    }

    pub fn reply_put(&self, reply: Reply) {
        self.reply(&format!("PUT {MESSAGES_PATH}"), reply);
    }

    pub fn reply_delete(&self, reply: Reply) {
        self.reply(&format!("DELETE {MESSAGES_PATH}"), reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.key.starts_with(prefix))
            .cloned()
            .collect()
    }

    async fn call(&self, key: String, token: &str, body: Option<Value>) -> Reply {
        let receiver = {
            let mut queues = self.queues.borrow_mut();
            let queue = queues.entry(key.clone()).or_default();
            let index = queue.next_call;
            queue.next_call += 1;
            queue.slot(index).receiver.take()
        };
        self.calls.borrow_mut().push(Call {
            key,
            token: token.to_string(),
            body,
        });

        match receiver {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("mock reply dropped".to_string()))),
            None => Err(ApiError::Network("mock slot reused".to_string())),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        self.call(format!("GET {path}"), token, None).await
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
        token: &str,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).ok();
        self.call(format!("{method} {path}"), token, body).await
    }
}

pub fn row(id: u64, is_read: bool) -> Value {
    json!({
        "id": id,
        "sender": "bob",
        "receiver": "alice",
        "subject": format!("subject {id}"),
        "body": format!("body {id}"),
        "is_read": is_read,
        "is_archived": false,
        "created_at": "2025-01-01T00:00:00Z"
    })
}

/// Collection response with the given `(id, is_read)` rows.
pub fn page(rows: &[(u64, bool)], total_items: u64) -> Value {
    let data: Vec<Value> = rows
        .iter()
        .map(|(id, is_read)| row(*id, *is_read))
        .collect();
    json!({ "data": data, "pagination": { "totalItems": total_items } })
}
