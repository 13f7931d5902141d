//! Demonstration model run by the driver binary.
//!
//! A program counter advances by a fixed stride each cycle and is frozen
//! every `stall_every` cycles. An accumulator sums the committed program
//! counter, and a status register flags when the accumulator's low byte
//! wraps. All three are synchronous, so each cycle only sees the values
//! committed at the end of the previous one.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::error::Result;
use crate::common::value::BinOp;
use crate::config::Config;
use crate::sched::{Kernel, StateRef};
use crate::storage::SyncReg;

/// Status bit set when the accumulator's low byte wrapped last cycle.
pub const STATUS_WRAP: u8 = 0x01;

pub struct Model {
    pub pc: StateRef<SyncReg<u32>>,
    pub acc: StateRef<SyncReg<i64>>,
    pub status: StateRef<SyncReg<u8>>,
    stride: u32,
    stall_every: u64,
}

impl Model {
    /// Builds the model's registers on `kernel`, enabling change logging and
    /// binding per-register persistence files as configured.
    pub fn new(kernel: &mut Kernel, config: &Config) -> Result<Self> {
        let model = Self {
            pc: kernel.sync_reg("PC", 0u32),
            acc: kernel.sync_reg("ACC", 0i64),
            status: kernel.sync_reg("STATUS", 0u8),
            stride: config.model.stride,
            stall_every: config.model.stall_every,
        };

        if config.log.enabled {
            model.pc.borrow_mut().set_logging(true);
            model.acc.borrow_mut().set_logging(true);
            model.status.borrow_mut().set_logging(true);
            if let Some(base) = &config.log.save_path {
                let base = Path::new(base);
                model.bind_log_files(base)?;
            }
        }

        // Reset line: clear status without waiting for a clock edge.
        model.status.borrow_mut().async_write(0);
        Ok(model)
    }

    fn bind_log_files(&self, base: &Path) -> Result<()> {
        let path = log_path(base, self.pc.borrow().name());
        self.pc.borrow_mut().bind_log_file(path)?;
        let path = log_path(base, self.acc.borrow().name());
        self.acc.borrow_mut().bind_log_file(path)?;
        let path = log_path(base, self.status.borrow().name());
        self.status.borrow_mut().bind_log_file(path)
    }

    /// Evaluation phase of cycle `cycle`.
    pub fn eval(&self, cycle: u64) {
        let mut pc = self.pc.borrow_mut();
        if self.stall_every != 0 && cycle % self.stall_every == self.stall_every - 1 {
            pc.suspend();
        }
        *pc += self.stride;

        let mut acc = self.acc.borrow_mut();
        let before = acc.read();
        acc.apply_reg(BinOp::Add, &*pc);

        let wrapped = (before & 0xff) + i64::from(pc.read() & 0xff) > 0xff;
        let mut status = self.status.borrow_mut();
        if wrapped {
            *status |= STATUS_WRAP;
        } else {
            *status &= !STATUS_WRAP;
        }
    }

    /// Writes the change report of every register to `output`.
    pub fn change_dump<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        self.pc.borrow().change_dump(output)?;
        self.acc.borrow().change_dump(output)?;
        self.status.borrow().change_dump(output)
    }

    /// Persists the change log of every register.
    pub fn change_save(&self) -> Result<()> {
        self.pc.borrow_mut().change_save()?;
        self.acc.borrow_mut().change_save()?;
        self.status.borrow_mut().change_save()
    }
}

/// Derives a register's log file from the configured base path:
/// `changes.jsonl` becomes `changes.PC.jsonl`.
pub fn log_path(base: &Path, register: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "changes".to_string());
    let file = match base.extension() {
        Some(ext) => format!("{}.{}.{}", stem, register, ext.to_string_lossy()),
        None => format!("{}.{}", stem, register),
    };
    base.with_file_name(file)
}
