//! Persistence of finished sessions.
//!  - Every finished session becomes one [record::SessionRecord].
//!  - All records live in a single named slot holding a JSON array.
//!  - The slot is reached through [slot::SlotStorage], so [store::SessionStore] works the same
//!    over a file or over memory.
//!  - Reading never fails loudly. Statistics are optional, the timer is not.

pub mod record;
pub mod slot;
pub mod store;
