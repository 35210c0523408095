//! The countdown. [state::SessionTimer] is the state machine, [controller::SessionController]
//! records what it produces and [runner::run_session] drives it in real time.

pub mod controller;
pub mod duration;
pub mod notify;
pub mod runner;
pub mod shutdown;
pub mod state;
