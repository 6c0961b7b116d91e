mod action;
mod assistant_client;
mod event;
mod message;
mod role;
mod session;
mod storage;

pub use action::*;
pub use assistant_client::*;
pub use event::*;
pub use message::*;
pub use role::*;
pub use session::*;
pub use storage::*;
