use serde::Serialize;

/// A message to send, as posted to the collection endpoint. The sender is
/// whoever the bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    receiver: String,
    subject: String,
    body: String,
}

impl NewMessage {
    pub fn new(
        receiver: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            subject: subject.into(),
            body: body.into(),
        }
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
}
