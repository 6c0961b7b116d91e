use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantQuestion {
    pub question: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssistantAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait AssistantClient: Send + Sync {
    async fn ask(&self, question: AssistantQuestion) -> Result<AssistantAnswer, AskError>;
}

pub type AssistantClientBox = Box<dyn AssistantClient>;
