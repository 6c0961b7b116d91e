mod http_assistant;

pub use http_assistant::HttpAssistant;
