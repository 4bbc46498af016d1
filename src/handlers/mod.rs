//! Chain handlers realizing the per-event orchestration: commands first, then
//! pending prompt captures, then plain conversation turns.

mod capture_handler;
mod chat_handler;
mod command_handler;

pub use capture_handler::CaptureHandler;
pub use chat_handler::ChatHandler;
pub use command_handler::CommandHandler;
