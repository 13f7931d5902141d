//! Reference Delta-Cycle Kernel.
//!
//! A deterministic single-threaded engine implementing [`Scheduler`]. Each
//! simulated cycle is split into:
//! 1. **Evaluation**: model code reads committed values and issues writes.
//! 2. **Update**: [`Kernel::delta`] delivers every requested update, in the
//!    order the requests were first made. Updates requested during an update
//!    phase are delivered in the following delta cycle.
//! 3. **Advance**: once no requests remain, time moves forward by one period.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use crate::common::error::{Result, SimError};
use crate::common::value::RegValue;
use crate::config::KernelConfig;
use crate::sched::{Channel, ChannelId, Scheduler, SimTime, StateRef, UpdatePort};
use crate::stats::SimStats;
use crate::storage::SyncReg;

/// Request set and clock shared between the kernel and its ports.
#[derive(Default)]
struct KernelCore {
    time: Cell<SimTime>,
    requests: RefCell<Vec<ChannelId>>,
    requested: RefCell<HashSet<ChannelId>>,
}

impl KernelCore {
    fn take_requests(&self) -> Vec<ChannelId> {
        self.requested.borrow_mut().clear();
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    fn has_requests(&self) -> bool {
        !self.requests.borrow().is_empty()
    }
}

impl Scheduler for KernelCore {
    fn request_update(&self, channel: ChannelId) {
        if self.requested.borrow_mut().insert(channel) {
            self.requests.borrow_mut().push(channel);
        }
    }

    fn current_time(&self) -> SimTime {
        self.time.get()
    }
}

/// Delta-cycle simulation kernel.
pub struct Kernel {
    core: Rc<KernelCore>,
    channels: Vec<Weak<RefCell<dyn Channel>>>,
    period: SimTime,
    max_deltas: usize,
    cycle: u64,
    anonymous: usize,
    /// Statistics registry fed by this kernel.
    pub stats: SimStats,
}

impl Kernel {
    /// Creates a kernel whose cycles last `period` ticks.
    pub fn new(period: SimTime) -> Self {
        Self::from_config(&KernelConfig {
            period,
            ..KernelConfig::default()
        })
    }

    /// Creates a kernel from its configuration section.
    pub fn from_config(config: &KernelConfig) -> Self {
        Self {
            core: Rc::new(KernelCore::default()),
            channels: Vec::new(),
            period: config.period,
            max_deltas: config.max_deltas.max(1),
            cycle: 0,
            anonymous: 0,
            stats: SimStats::default(),
        }
    }

    /// Returns this kernel as a shareable [`Scheduler`].
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.core.clone()
    }

    /// Builds a channel bound to this kernel and starts tracking it.
    ///
    /// The kernel only keeps a weak reference: dropping the returned
    /// [`StateRef`] releases the channel, and later requests for it are
    /// discarded.
    pub fn attach<C, F>(&mut self, build: F) -> StateRef<C>
    where
        C: Channel + 'static,
        F: FnOnce(UpdatePort) -> C,
    {
        let id = ChannelId(self.channels.len());
        let port = UpdatePort::new(self.scheduler(), id);
        let channel = Rc::new(RefCell::new(build(port)));
        let tracked: Rc<RefCell<dyn Channel>> = channel.clone();
        self.channels.push(Rc::downgrade(&tracked));
        log::debug!("attached channel '{}' as {}", channel.borrow().name(), id);
        channel
    }

    /// Creates a named synchronous register.
    pub fn sync_reg<T: RegValue>(&mut self, name: &str, init: T) -> StateRef<SyncReg<T>> {
        self.attach(|port| SyncReg::new(name, init, port))
    }

    /// Creates a synchronous register with a generated unique name.
    pub fn anon_reg<T: RegValue>(&mut self, init: T) -> StateRef<SyncReg<T>> {
        let name = format!("sync_reg_anonymous_{}", self.anonymous);
        self.anonymous += 1;
        self.sync_reg(&name, init)
    }

    /// Creates a copy of `src` named `<src>_copy`, holding its committed
    /// value and enable state.
    pub fn copy_reg<T: RegValue>(&mut self, src: &SyncReg<T>) -> StateRef<SyncReg<T>> {
        self.attach(|port| src.duplicate(port))
    }

    /// Runs one update phase and returns the number of channels updated.
    pub fn delta(&mut self) -> usize {
        let batch = self.core.take_requests();
        let mut updated = 0;
        for id in batch {
            let Some(channel) = self.channels.get(id.0).and_then(Weak::upgrade) else {
                log::warn!("dropping update request for released channel {}", id);
                self.stats.dropped_requests += 1;
                continue;
            };
            let mut channel = channel.borrow_mut();
            channel.update();
            self.stats.record_commit(channel.name());
            updated += 1;
        }
        self.stats.delta_cycles += 1;
        log::trace!(
            "cycle {} delta {}: {} update(s)",
            self.cycle,
            self.stats.delta_cycles,
            updated
        );
        updated
    }

    /// Settles the current cycle and advances simulated time by one period.
    ///
    /// # Errors
    ///
    /// [`SimError::DeltaLimit`] if update requests are still pending after
    /// the configured number of delta cycles, [`SimError::TimeOverflow`] if
    /// the next period does not fit in [`SimTime`].
    pub fn tick(&mut self) -> Result<()> {
        let mut deltas = 0;
        while self.core.has_requests() {
            if deltas == self.max_deltas {
                return Err(SimError::DeltaLimit {
                    cycle: self.cycle,
                    limit: self.max_deltas,
                });
            }
            self.delta();
            deltas += 1;
        }
        let next = self
            .core
            .time
            .get()
            .checked_add(self.period)
            .ok_or(SimError::TimeOverflow { cycle: self.cycle })?;
        self.cycle += 1;
        self.core.time.set(next);
        self.stats.cycles = self.cycle;
        self.stats.sim_time = self.core.time.get();
        Ok(())
    }

    /// Runs `cycles` cycles, calling `eval` for the evaluation phase of each
    /// one with the kernel and the cycle number.
    pub fn run<F>(&mut self, cycles: u64, mut eval: F) -> Result<()>
    where
        F: FnMut(&Kernel, u64) -> Result<()>,
    {
        for _ in 0..cycles {
            eval(self, self.cycle)?;
            self.tick()?;
        }
        Ok(())
    }

    /// Current simulated time.
    pub fn time(&self) -> SimTime {
        self.core.time.get()
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Length of one cycle in ticks.
    pub fn period(&self) -> SimTime {
        self.period
    }

    /// Number of updates requested but not yet delivered.
    pub fn pending(&self) -> usize {
        self.core.requests.borrow().len()
    }

    /// Number of channels ever attached, live or released.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
