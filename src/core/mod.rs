/*!
 * Core Module
 * Error types, shared constants, and the snapshot cell used for registry versions
 */

pub mod errors;
pub mod limits;
pub mod rcu;

// Re-export for convenience
pub use errors::*;
pub use rcu::RcuCell;
