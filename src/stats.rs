//! Simulation statistics collection and reporting.
//!
//! [`SimStats`] is the run's statistics registry. It is created when a run
//! starts, fed by the kernel as cycles settle, finalized with
//! [`SimStats::finish`] and printed at exit or on a report signal.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::sched::SimTime;

/// Simulation statistics structure tracking kernel activity.
pub struct SimStats {
    start_time: Instant,
    host_elapsed: Option<Duration>,
    pub cycles: u64,
    pub delta_cycles: u64,
    pub sim_time: SimTime,

    pub commits: u64,
    pub dropped_requests: u64,

    /// Update callbacks delivered, per channel name.
    pub channel_commits: BTreeMap<String, u64>,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            host_elapsed: None,
            cycles: 0,
            delta_cycles: 0,
            sim_time: 0,
            commits: 0,
            dropped_requests: 0,
            channel_commits: BTreeMap::new(),
        }
    }
}

impl SimStats {
    /// Counts one update delivered to `channel`.
    pub fn record_commit(&mut self, channel: &str) {
        self.commits += 1;
        match self.channel_commits.get_mut(channel) {
            Some(count) => *count += 1,
            None => {
                self.channel_commits.insert(channel.to_string(), 1);
            }
        }
    }

    /// Freezes the host-time measurement. Later calls keep the first value.
    pub fn finish(&mut self) {
        if self.host_elapsed.is_none() {
            self.host_elapsed = Some(self.start_time.elapsed());
        }
    }

    /// Returns `true` once [`SimStats::finish`] has been called.
    pub fn is_finished(&self) -> bool {
        self.host_elapsed.is_some()
    }

    /// Host time spent so far, or the frozen value after `finish`.
    pub fn host_elapsed(&self) -> Duration {
        self.host_elapsed
            .unwrap_or_else(|| self.start_time.elapsed())
    }

    /// Renders the statistics report.
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!();
        print!("{}", self);
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.host_elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        writeln!(f, "==========================================================")?;
        writeln!(f, "SYNCHRONOUS STORAGE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {:.4} s", seconds)?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_time                 {}", self.sim_time)?;
        writeln!(f, "sim_freq                 {:.2} kHz", khz)?;
        writeln!(f, "sim_deltas               {}", self.delta_cycles)?;
        writeln!(
            f,
            "sim_deltas_per_cycle     {:.4}",
            self.delta_cycles as f64 / cyc as f64
        )?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "UPDATES")?;
        writeln!(f, "  commits.total          {}", self.commits)?;
        writeln!(f, "  requests.dropped       {}", self.dropped_requests)?;
        for (name, count) in &self.channel_commits {
            writeln!(
                f,
                "  {:<22} {} ({:.2}%)",
                name,
                count,
                (*count as f64 / cyc as f64) * 100.0
            )?;
        }
        writeln!(f, "==========================================================")
    }
}
