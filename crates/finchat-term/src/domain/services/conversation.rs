#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;

use super::SessionStore;
use crate::domain::models::Action;
use crate::domain::models::AssistantAnswer;
use crate::domain::models::AssistantQuestion;
use crate::domain::models::Message;
use crate::domain::models::Role;

pub const ERROR_PREFIX: &str = "⚠️ Error:";

/// Drives one question/answer exchange at a time on top of a [`SessionStore`].
///
/// The network call and the reveal timing run in the actions worker; this type
/// applies their results to the store and owns the `loading` flag.
pub struct Conversation {
    store: SessionStore,
    loading: bool,
}

impl Conversation {
    pub fn new(store: SessionStore) -> Conversation {
        return Conversation {
            store,
            loading: false,
        };
    }

    pub fn store(&self) -> &SessionStore {
        return &self.store;
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        return &mut self.store;
    }

    pub fn is_loading(&self) -> bool {
        return self.loading;
    }

    /// Returns false when nothing was sent: blank text, no active session, or
    /// an exchange already in flight.
    pub fn send_message(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        let question = text.trim();
        if question.is_empty() || self.loading || self.store.active_id().is_none() {
            return Ok(false);
        }

        self.store.add_message(Message::new(Role::User, question));
        self.loading = true;

        let placeholder = Message::placeholder();
        let message_id = placeholder.id.clone();
        self.store.add_message(placeholder);

        tracing::info!(message_id = %message_id, "asking assistant");
        if let Err(err) = tx.send(Action::AssistantRequest {
            message_id: message_id.clone(),
            question: AssistantQuestion {
                question: question.to_string(),
            },
        }) {
            self.fail(&message_id, "The request worker is not running.");
            return Err(err.into());
        }

        return Ok(true);
    }

    pub fn reveal(&mut self, message_id: &str, delta: &str) {
        self.store
            .update_message(message_id, |message| message.append(delta));
    }

    pub fn complete(&mut self, message_id: &str, answer: AssistantAnswer) {
        self.store.update_message(message_id, |message| {
            message.text = answer.answer;
            message.sources = Some(answer.sources);
            message.time = Some(Utc::now());
        });
        self.loading = false;
    }

    pub fn fail(&mut self, message_id: &str, reason: &str) {
        tracing::warn!(message_id = %message_id, reason = %reason, "assistant request failed");
        self.store.update_message(message_id, |message| {
            message.text = format!("{ERROR_PREFIX} {reason}");
            message.sources = Some(vec![]);
            message.time = Some(Utc::now());
        });
        self.loading = false;
    }
}
