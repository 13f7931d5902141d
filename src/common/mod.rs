//! Common types used throughout the simulator.
//!
//! This module provides the register value abstraction and the error type
//! shared by the scheduler, storage and driver layers.

/// Error types.
pub mod error;

/// Register value types and operator tags.
pub mod value;

pub use error::{Result, SimError};
pub use value::{BinOp, CastFrom, CmpOp, RegValue};
