//! Terminal timer for deep work sessions. Finished sessions are stored locally and can be
//! reviewed in a calendar that shows how much focused time went into each day.
//!

pub mod cli;
pub mod session;
pub mod stats;
pub mod timer;
pub mod utils;
