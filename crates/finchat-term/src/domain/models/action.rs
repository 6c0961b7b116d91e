use super::AssistantQuestion;

#[derive(Debug, Clone)]
pub enum Action {
    /// Ask the assistant and reveal the answer into the message with this id.
    AssistantRequest {
        message_id: String,
        question: AssistantQuestion,
    },
}
