//! Storage Change Log.
//!
//! An append-only record of committed value transitions, stamped with the
//! simulated time of the commit. The log can be:
//! * Rendered as a fixed-width text report with [`ChangeLog::dump`].
//! * Appended to a bound file as JSON lines with [`ChangeLog::save`], and read
//!   back with [`ChangeLog::load`].
//!
//! A log created disabled ignores every operation, so storage types can carry
//! one unconditionally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::error::{Result, SimError};
use crate::common::value::RegValue;
use crate::sched::SimTime;

const RULE: &str = "***************************************************";

/// One logged change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry<T> {
    /// Address tag; registers always log 0.
    pub addr: u64,
    pub value: T,
    pub time: SimTime,
}

impl<T: fmt::Display> fmt::Display for ChangeEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}     {:>10}     {:>10}", self.addr, self.value, self.time)
    }
}

/// Change log of a single storage device.
pub struct ChangeLog<T> {
    enabled: bool,
    entries: Vec<ChangeEntry<T>>,
    /// Entries before this index are already in the bound file.
    saved: usize,
    file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
}

impl<T: RegValue> ChangeLog<T> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
            saved: 0,
            file: None,
            path: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Appends an entry when logging is enabled.
    pub fn push(&mut self, addr: u64, value: T, time: SimTime) {
        if self.enabled {
            self.entries.push(ChangeEntry { addr, value, time });
        }
    }

    /// Drops all in-memory entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.saved = 0;
    }

    pub fn entries(&self) -> &[ChangeEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the bound persistence file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Opens `path` for appending (creating it if needed) as the
    /// persistence stream. Rebinding closes the previous file. The save
    /// cursor restarts only when the path changes, so rebinding the same
    /// file never writes an entry twice.
    pub fn bind(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if let Some(mut previous) = self.file.take() {
            previous.flush()?;
        }
        if self.path.as_deref() != Some(path) {
            self.saved = 0;
        }
        self.file = Some(BufWriter::new(file));
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Writes the report for device `name` to `output`. Nothing is written
    /// when the log is empty.
    pub fn dump<W: Write + ?Sized>(&self, name: &str, output: &mut W) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        writeln!(output)?;
        writeln!(output)?;
        writeln!(output, "**************** ArchC Change log *****************")?;
        writeln!(output, "* Device: {}\t\t", name)?;
        writeln!(output, "{}", RULE)?;
        writeln!(output, "*        Address         Value          Time      *")?;
        writeln!(output, "{}", RULE)?;
        for entry in &self.entries {
            writeln!(output, "*  {}     *", entry)?;
        }
        writeln!(output, "{}", RULE)?;
        Ok(())
    }

    /// Appends every entry not yet saved to the bound file, one JSON object
    /// per line. Entries stay in memory. Entries recorded before logging was
    /// turned off are still saved.
    ///
    /// # Errors
    ///
    /// [`SimError::LogNotBound`] when there is something to save but no file
    /// was bound, or the underlying I/O and encoding errors.
    pub fn save(&mut self, name: &str) -> Result<()> {
        if self.saved == self.entries.len() {
            return Ok(());
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| SimError::LogNotBound(name.to_string()))?;
        for entry in &self.entries[self.saved..] {
            serde_json::to_writer(&mut *file, entry)?;
            file.write_all(b"\n")?;
        }
        file.flush()?;
        self.saved = self.entries.len();
        Ok(())
    }

    /// Reads back a persistence file written by [`ChangeLog::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<ChangeEntry<T>>> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }
}

impl<T> fmt::Debug for ChangeLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeLog")
            .field("enabled", &self.enabled)
            .field("entries", &self.entries.len())
            .field("saved", &self.saved)
            .field("path", &self.path)
            .finish()
    }
}
