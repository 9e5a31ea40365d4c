pub mod abstract_action;
pub mod action;
pub mod error;
pub mod node;
pub mod seat;

pub use abstract_action::{AbstractAction, Play};
pub use action::Action;
pub use error::{ErrorKind, Result};
pub use node::{AwardMode, Config, Node};
pub use seat::{Chips, Seat};
