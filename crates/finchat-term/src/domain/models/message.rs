#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Role;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.to_string(),
            time: Some(Utc::now()),
            sources: None,
        };
    }

    /// An empty bot message that holds the reply slot while a question is in flight.
    pub fn placeholder() -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role: Role::Bot,
            text: String::new(),
            time: None,
            sources: None,
        };
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn sources(&self) -> &[String] {
        match &self.sources {
            Some(sources) => sources,
            None => &[],
        }
    }

    pub fn is_pending(&self) -> bool {
        return self.role == Role::Bot && self.text.is_empty();
    }
}
