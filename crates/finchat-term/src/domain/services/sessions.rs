#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use chrono::Utc;

use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::SessionStorageBox;

pub const STORAGE_KEY: &str = "finchat_sessions";

/// Owns the session collection and the active session id. Every mutation of
/// the collection is mirrored to storage in full.
pub struct SessionStore {
    sessions: Vec<Session>,
    active_id: Option<String>,
    storage: SessionStorageBox,
}

impl SessionStore {
    /// Reads persisted sessions and selects the first one. Unreadable or
    /// unparsable data starts an empty store.
    pub fn load(storage: SessionStorageBox) -> SessionStore {
        let sessions = match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Session>>(&raw) {
                Ok(sessions) => sessions,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring unparsable sessions");
                    vec![]
                }
            },
            Ok(None) => vec![],
            Err(err) => {
                tracing::warn!(error = ?err, "failed to read sessions");
                vec![]
            }
        };

        let active_id = sessions.first().map(|session| session.id.clone());
        tracing::debug!(count = sessions.len(), "loaded sessions");

        return SessionStore {
            sessions,
            active_id,
            storage,
        };
    }

    pub fn sessions(&self) -> &[Session] {
        return &self.sessions;
    }

    pub fn active_id(&self) -> Option<&str> {
        return self.active_id.as_deref();
    }

    pub fn active(&self) -> Option<&Session> {
        let active_id = self.active_id.as_deref()?;
        return self
            .sessions
            .iter()
            .find(|session| session.id == active_id);
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        return self.sessions.iter().position(|session| session.id == id);
    }

    /// Makes an existing session active. Returns false for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }

        self.active_id = Some(id.to_string());
        return true;
    }

    pub fn start_new_session(&mut self) -> String {
        let created_at = Utc::now();
        let mut millis = created_at.timestamp_millis();
        while self.position(&millis.to_string()).is_some() {
            millis += 1;
        }

        let id = millis.to_string();
        self.sessions
            .insert(0, Session::new(id.clone(), created_at));
        self.active_id = Some(id.clone());
        self.persist();

        tracing::info!(session_id = %id, "started session");
        return id;
    }

    pub fn delete_session(&mut self, id: &str) {
        let Some(index) = self.position(id) else {
            return;
        };

        self.sessions.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.sessions.first().map(|session| session.id.clone());
        }
        self.persist();

        tracing::info!(session_id = %id, "deleted session");
    }

    /// Drops every session and removes the stored entry rather than writing an
    /// empty collection.
    pub fn clear_all(&mut self) {
        self.sessions.clear();
        self.active_id = None;

        if let Err(err) = self.storage.remove(STORAGE_KEY) {
            tracing::warn!(error = ?err, "failed to remove stored sessions");
        }

        tracing::info!("cleared all sessions");
    }

    /// Appends to the active session. Dropped when no session is active.
    pub fn add_message(&mut self, message: Message) -> bool {
        let Some(active_id) = self.active_id.clone() else {
            tracing::debug!("no active session, dropping message");
            return false;
        };

        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| session.id == active_id)
        else {
            return false;
        };

        session.messages.push(message);
        self.persist();
        return true;
    }

    /// Mutates the message with the given id in whichever session holds it.
    pub fn update_message<F>(&mut self, message_id: &str, update: F) -> bool
    where
        F: FnOnce(&mut Message),
    {
        let message = self
            .sessions
            .iter_mut()
            .flat_map(|session| session.messages.iter_mut())
            .find(|message| message.id == message_id);

        let Some(message) = message else {
            return false;
        };

        update(message);
        self.persist();
        return true;
    }

    fn persist(&self) {
        let serialized = match serde_json::to_string(&self.sessions) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize sessions");
                return;
            }
        };

        if let Err(err) = self.storage.write(STORAGE_KEY, &serialized) {
            tracing::warn!(error = ?err, "failed to persist sessions");
        }
    }
}
