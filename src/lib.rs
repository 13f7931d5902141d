//! Synchronous Storage Simulation Library.
//!
//! This crate provides storage primitives with cycle-accurate update
//! semantics for discrete-event hardware simulation. Writes to a
//! [`storage::SyncReg`] are buffered and only become visible when the
//! scheduler commits them at the end of the cycle, the way a clocked
//! register behaves.
//!
//! # Architecture
//!
//! * **Scheduler**: the `Scheduler`/`Channel` contract and a reference
//!   delta-cycle kernel.
//! * **Storage**: the synchronous register, its operator surface and its
//!   change log.
//! * **Driver**: configuration, statistics, signal handling and a demo model.
//!
//! # Modules
//!
//! * `common`: Value types, operator tags and error handling.
//! * `config`: Configuration loading and parsing.
//! * `sched`: Scheduler interface and reference kernel.
//! * `sim`: Demo model, signal hook and logger.
//! * `stats`: Simulation statistics registry.
//! * `storage`: Synchronous storage devices.

/// Register value types, operator tags and the crate error type.
pub mod common;

/// Configuration for the kernel, change logging and the demo model.
///
/// Loads and parses TOML configuration files.
pub mod config;

/// Scheduler interface consumed by storage devices, and a reference
/// delta-cycle kernel implementing it.
pub mod sched;

/// Driver support: demonstration model, process signal hook and log backend.
pub mod sim;

/// Simulation statistics registry.
///
/// Tracks cycles, delta cycles and per-channel commits during a run.
pub mod stats;

/// Synchronous storage devices.
///
/// Implements the two-phase synchronous register, its compound-assignment
/// and comparison operators, and change logging with file persistence.
pub mod storage;
