//! Presentation layer.
//!
//! The player runs in a terminal: state changes arrive as
//! [`PlayerEvent`](crate::ports::outbound::PlayerEvent)s on the event bus and
//! are rendered as plain lines.

pub mod console;
pub mod input;

pub use console::{attach, ConsoleRenderer};
pub use input::{is_affirmative, Command, LoginPrompt, REFRESH_CONFIRMATION};
