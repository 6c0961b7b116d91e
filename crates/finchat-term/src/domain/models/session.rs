use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Message;
use super::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(id: String, created_at: DateTime<Utc>) -> Session {
        return Session {
            id,
            created_at,
            messages: vec![],
        };
    }

    /// Sidebar label: the first line of the first user message, or "New chat".
    pub fn title(&self, max_width: usize) -> String {
        let first_question = self
            .messages
            .iter()
            .find(|message| message.role == Role::User)
            .and_then(|message| message.text.lines().next());

        let title = match first_question {
            Some(line) if !line.trim().is_empty() => line.trim().replace('\t', " "),
            _ => return "New chat".to_string(),
        };

        if title.chars().count() <= max_width {
            return title;
        }

        let mut truncated: String = title.chars().take(max_width.saturating_sub(1)).collect();
        truncated.push('…');
        return truncated;
    }
}
