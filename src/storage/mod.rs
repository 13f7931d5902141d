//! Synchronous storage devices.
//!
//! Storage types here are primitive channels: they buffer writes during a
//! cycle and make them visible in the scheduler's update phase.

/// Change logging for storage devices.
pub mod change_log;

/// Operator surface of synchronous registers.
pub mod ops;

/// Synchronous register.
pub mod sync_reg;

pub use change_log::{ChangeEntry, ChangeLog};
pub use sync_reg::SyncReg;
