//! Input handling: keyboard shortcuts, pointer routing and interactive grabs.

mod actions;
pub mod binds;
pub mod grab;
mod keyboard;
mod pointer;

pub use binds::BindTable;
pub use grab::{GrabMode, InteractiveGrab};
