use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::AssistantAnswer;
use crate::domain::models::Event;

/// Streams `answer` into the message one character per `delay`, then sends the
/// final update carrying the full text and sources.
pub async fn reveal_answer(
    message_id: &str,
    answer: AssistantAnswer,
    delay: Duration,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let mut buf = [0u8; 4];
    for c in answer.answer.chars() {
        time::sleep(delay).await;
        tx.send(Event::AssistantDelta {
            message_id: message_id.to_string(),
            delta: c.encode_utf8(&mut buf).to_string(),
        })?;
    }

    tx.send(Event::AssistantAnswered {
        message_id: message_id.to_string(),
        answer,
    })?;

    return Ok(());
}
