pub mod history;
pub mod poll_loop;
pub mod queue;
pub mod session_controller;

#[cfg(test)]
pub(crate) mod testing;

pub use poll_loop::{PollConfig, PollEvent};
pub use session_controller::{SessionController, SessionUpdate};
