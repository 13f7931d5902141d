//! Simulation driver support: the demonstration model, the process signal
//! hook and the stderr log backend.

pub mod logger;
pub mod model;
pub mod signals;

pub use model::Model;
pub use signals::SignalAction;
