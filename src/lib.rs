#[macro_use]
extern crate tracing;

pub mod cli;
mod handlers;
pub mod input;
pub mod layout;
pub mod platform;
pub mod state;
pub mod utils;
pub mod window;

#[cfg(test)]
mod tests;

pub use state::State;
