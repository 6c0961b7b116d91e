//! Terminal chat client for a financial-information assistant.
//!
//! This crate provides a terminal interface for asking questions of a
//! retrieval-backed assistant, with a sidebar of saved chats, a typing-style
//! reveal of each answer and numbered source links. Chats are kept in a JSON
//! file under the data directory.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{
    Action, AskError, AssistantAnswer, AssistantClient, AssistantQuestion, Event, Message, Role,
    Session,
};
pub use domain::services::{ActionsService, AppStateProps, SessionStore};
