use tui_textarea::Input;

use super::AssistantAnswer;

#[derive(Debug)]
pub enum Event {
    AssistantDelta { message_id: String, delta: String },
    AssistantAnswered { message_id: String, answer: AssistantAnswer },
    AssistantFailed { message_id: String, reason: String },
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardEnter,
    KeyboardNewline,
    KeyboardPaste(String),
    SessionNew,
    SessionActivate,
    SessionDelete,
    SessionsClear,
    SidebarNext,
    SidebarPrevious,
    UIClick { column: u16, row: u16 },
    UITick,
    UIScrollDown,
    UIScrollUp,
    UIScrollPageDown,
    UIScrollPageUp,
}
