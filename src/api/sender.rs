use log::{debug, warn};

use crate::{
    api::{MESSAGES_PATH, Method, Transport},
    error::ApiError,
    model::{Message, MessageId, NewMessage},
};

/// Posts `message` and returns the id the server assigned, if the response
/// names one. An unreadable success body still counts as sent.
pub async fn send_message(
    transport: &impl Transport,
    token: &str,
    message: &NewMessage,
) -> Result<Option<MessageId>, ApiError> {
    debug!("sending message to {}", message.receiver());
    let response = match transport
        .mutate(Method::Post, MESSAGES_PATH, message, token)
        .await
    {
        Ok(response) => response,
        Err(ApiError::Malformed(e)) => {
            warn!("unreadable response to sent message: {e}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_value::<Message>(response) {
        Ok(created) => Ok(Some(created.id())),
        Err(e) => {
            warn!("response to sent message is not a message: {e}");
            Ok(None)
        }
    }
}
