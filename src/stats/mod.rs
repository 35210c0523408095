//! Calendar views over stored sessions. Everything here is a pure function of the records it is
//! given, recomputed on every call.

pub mod aggregator;
pub mod month;
