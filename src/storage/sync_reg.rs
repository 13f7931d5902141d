//! Synchronous Register.
//!
//! A storage cell with two-phase write semantics, modeling a clocked
//! hardware register:
//! 1. **Request**: [`SyncReg::write`] buffers the new value in the pending
//!    slot and asks the scheduler for an update at the end of the current
//!    delta cycle.
//! 2. **Commit**: the scheduler calls [`Channel::update`], which promotes the
//!    pending value to the committed slot.
//!
//! Readers see the committed value through [`SyncReg::read`] for the whole
//! cycle, no matter how many writes were issued; [`SyncReg::async_read`]
//! peeks at the in-flight value. Writes are last-write-wins within a cycle.
//!
//! [`SyncReg::suspend`] gates the clock for one cycle: the next commit only
//! re-enables the register. A write pending in the same cycle is dropped.

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::common::error::Result;
use crate::common::value::{BinOp, CastFrom, CmpOp, RegValue};
use crate::sched::{Channel, UpdatePort};
use crate::storage::change_log::{ChangeEntry, ChangeLog};

/// Synchronous register holding a value of type `T`.
pub struct SyncReg<T: RegValue> {
    name: String,
    /// Visible value.
    committed: T,
    /// Last written value; meaningful only while `dirty`.
    pending: T,
    /// A write is waiting for its commit.
    dirty: bool,
    /// Cleared by `suspend` for exactly one commit.
    enabled: bool,
    size: usize,
    log: ChangeLog<T>,
    port: UpdatePort,
}

impl<T: RegValue> SyncReg<T> {
    /// Creates a register named `name` holding `init`, committing through
    /// `port`. Change logging starts disabled.
    pub fn new(name: &str, init: T, port: UpdatePort) -> Self {
        Self {
            name: name.to_string(),
            committed: init,
            pending: init,
            dirty: false,
            enabled: true,
            size: std::mem::size_of::<T>(),
            log: ChangeLog::new(false),
            port,
        }
    }

    /// Creates `<name>_copy` on `port`, holding this register's committed
    /// value and enable state. The change log is not copied.
    pub fn duplicate(&self, port: UpdatePort) -> Self {
        let mut copy = Self::new(&format!("{}_copy", self.name), self.read(), port);
        copy.enabled = self.enabled;
        copy
    }

    /// Returns the committed value.
    #[inline]
    pub fn read(&self) -> T {
        self.committed
    }

    /// Returns the value that the next commit would expose.
    #[inline]
    pub fn async_read(&self) -> T {
        if self.dirty {
            self.pending
        } else {
            self.committed
        }
    }

    /// Schedules `value` to become visible at the end of the current cycle.
    /// A later write in the same cycle replaces it.
    pub fn write(&mut self, value: T) {
        log::trace!("{}: write {} (committed {})", self.name, value, self.committed);
        self.pending = value;
        self.dirty = true;
        self.port.request_update();
    }

    /// Overwrites the committed and pending values immediately, as an
    /// asynchronous set or clear line would. Ignored while suspended.
    pub fn async_write(&mut self, value: T) {
        if !self.enabled {
            log::warn!("{}: async write of {} ignored while suspended", self.name, value);
            return;
        }
        log::trace!("{}: async write {}", self.name, value);
        self.log.push(0, value, self.port.current_time());
        self.committed = value;
        self.pending = value;
        self.dirty = false;
    }

    /// Freezes the register for one cycle: the next commit is skipped and
    /// only re-enables the register.
    pub fn suspend(&mut self) {
        log::trace!("{}: suspend", self.name);
        self.enabled = false;
        self.port.request_update();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the value type in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` while a write is waiting for its commit.
    pub fn is_pending(&self) -> bool {
        self.dirty
    }

    pub fn port(&self) -> &UpdatePort {
        &self.port
    }

    /// Writes `value`. Same as [`SyncReg::write`].
    pub fn assign(&mut self, value: T) {
        self.write(value);
    }

    /// Writes `value` converted to `T`.
    pub fn assign_cast<U>(&mut self, value: U)
    where
        T: CastFrom<U>,
    {
        self.write(T::cast_from(value));
    }

    /// Writes the committed value of `other`, converted to `T`.
    pub fn assign_from<U: RegValue>(&mut self, other: &SyncReg<U>)
    where
        T: CastFrom<U>,
    {
        self.assign_cast(other.read());
    }

    /// Writes `read() <op> rhs`. Every compound assignment lands here, so
    /// it takes effect at the next commit like any other write.
    pub fn apply(&mut self, op: BinOp, rhs: T) {
        let value = self.read().apply(op, rhs);
        self.write(value);
    }

    /// [`SyncReg::apply`] with an operand of another value type.
    pub fn apply_cast<U>(&mut self, op: BinOp, rhs: U)
    where
        T: CastFrom<U>,
    {
        self.apply(op, T::cast_from(rhs));
    }

    /// [`SyncReg::apply`] with the committed value of another register.
    pub fn apply_reg<U: RegValue>(&mut self, op: BinOp, rhs: &SyncReg<U>)
    where
        T: CastFrom<U>,
    {
        self.apply_cast(op, rhs.read());
    }

    /// Evaluates `read() <op> rhs`.
    pub fn compare(&self, op: CmpOp, rhs: T) -> bool {
        op.eval(self.read(), rhs)
    }

    /// [`SyncReg::compare`] with an operand of another value type.
    pub fn compare_cast<U>(&self, op: CmpOp, rhs: U) -> bool
    where
        T: CastFrom<U>,
    {
        self.compare(op, T::cast_from(rhs))
    }

    /// [`SyncReg::compare`] against the committed value of another register.
    pub fn compare_reg<U: RegValue>(&self, op: CmpOp, rhs: &SyncReg<U>) -> bool
    where
        T: CastFrom<U>,
    {
        self.compare_cast(op, rhs.read())
    }

    /// Turns change logging on or off. Existing entries are kept.
    pub fn set_logging(&mut self, enabled: bool) {
        self.log.set_enabled(enabled);
    }

    pub fn is_logging(&self) -> bool {
        self.log.is_enabled()
    }

    /// Opens the persistence file used by [`SyncReg::change_save`].
    pub fn bind_log_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.log.bind(path)
    }

    /// Clears the in-memory change log.
    pub fn reset_log(&mut self) {
        self.log.clear();
    }

    /// Writes the change report to `output`; nothing when the log is empty.
    pub fn change_dump<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        self.log.dump(&self.name, output)
    }

    /// Appends the entries not saved yet to the bound log file.
    pub fn change_save(&mut self) -> Result<()> {
        self.log.save(&self.name)
    }

    /// Logged changes, oldest first.
    pub fn changes(&self) -> &[ChangeEntry<T>] {
        self.log.entries()
    }
}

impl<T: RegValue> Channel for SyncReg<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self) {
        if !self.enabled {
            // Freeze consumes this commit, and the write it would have made.
            self.enabled = true;
            self.pending = self.committed;
            self.dirty = false;
            log::trace!("{}: commit skipped, re-enabled", self.name);
            return;
        }
        self.log.push(0, self.pending, self.port.current_time());
        self.committed = self.pending;
        self.dirty = false;
        log::trace!("{}: commit {}", self.name, self.committed);
    }
}

impl<T: RegValue> fmt::Debug for SyncReg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncReg")
            .field("name", &self.name)
            .field("committed", &self.committed)
            .field("pending", &self.async_read())
            .field("enabled", &self.enabled)
            .field("size", &self.size)
            .finish()
    }
}

impl<T: RegValue> fmt::Display for SyncReg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::Kernel;

    #[test]
    fn write_is_deferred_until_commit() {
        let mut kernel = Kernel::new(1);
        let pc = kernel.sync_reg("PC", 0i32);
        pc.borrow_mut().write(4);
        assert_eq!(pc.borrow().read(), 0);
        assert_eq!(pc.borrow().async_read(), 4);
        assert!(pc.borrow().is_pending());
        kernel.tick().unwrap();
        assert_eq!(pc.borrow().read(), 4);
        assert!(!pc.borrow().is_pending());
    }

    #[test]
    fn frozen_commit_drops_pending_write() {
        let mut kernel = Kernel::new(1);
        let r = kernel.sync_reg("R", 7u8);
        r.borrow_mut().suspend();
        r.borrow_mut().write(9);
        kernel.tick().unwrap();
        let r = r.borrow();
        assert_eq!(r.read(), 7);
        assert_eq!(r.async_read(), 7);
        assert!(r.is_enabled());
    }

    #[test]
    fn size_matches_value_type() {
        let mut kernel = Kernel::new(1);
        assert_eq!(kernel.sync_reg("a", 0u8).borrow().size(), 1);
        assert_eq!(kernel.sync_reg("b", 0i64).borrow().size(), 8);
    }
}
