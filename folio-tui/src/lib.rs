mod feeders;
mod styles;
mod transcript;
mod tui;
mod view;

pub use feeders::read_input;
pub use tui::{TuiActor, TuiMsg, TuiOptions};
