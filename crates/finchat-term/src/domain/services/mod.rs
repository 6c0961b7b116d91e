pub mod actions;
mod app_state;
mod conversation;
pub mod events;
mod reveal;
mod scroll;
mod sessions;

pub use actions::ActionsService;
pub use app_state::*;
pub use conversation::*;
pub use events::EventsService;
pub use reveal::reveal_answer;
pub use scroll::Scroll;
pub use sessions::*;
