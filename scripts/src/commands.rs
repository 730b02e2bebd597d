//! Implementations of the action routines
//!
//! Each routine resolves the contracts it needs from the registry, checks its
//! preconditions against chain state, and only then signs and sends anything.

pub mod batches;
pub mod deploy;
pub mod reads;
pub mod relayed;
pub mod writes;
