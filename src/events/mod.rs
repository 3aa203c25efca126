pub mod buttons;
pub mod pointer;

pub use buttons::{wire_buttons, Buttons};
pub use pointer::{wire_input_handlers, InputWiring};
