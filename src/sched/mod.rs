//! Scheduler Interface.
//!
//! Storage primitives do not advance time on their own. They rely on a
//! discrete-event scheduler that:
//! 1. Reports the current simulated time.
//! 2. Accepts update requests from channels during a delta cycle.
//! 3. Invokes each requesting channel's [`Channel::update`] exactly once at
//!    the end of that delta cycle, before the next cycle begins.
//!
//! [`Kernel`] is a reference implementation of this contract. Any other
//! engine can drive the storage types by implementing [`Scheduler`] and
//! calling `update` on the channels it was asked to commit.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Reference delta-cycle kernel.
pub mod kernel;

pub use kernel::Kernel;

/// Simulated time, in kernel ticks.
pub type SimTime = u64;

/// A shared mutable reference to a channel owned by the model.
pub type StateRef<T> = Rc<RefCell<T>>;

/// Identifies a channel within its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub usize);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// The services a channel consumes from its scheduler.
pub trait Scheduler {
    /// Asks for `channel` to be updated at the end of the current delta
    /// cycle. Repeated requests within one delta cycle collapse into one.
    fn request_update(&self, channel: ChannelId);

    /// Returns the current simulated time.
    fn current_time(&self) -> SimTime;
}

/// A primitive channel: state whose visible change happens in the update
/// phase of a delta cycle.
pub trait Channel {
    /// Returns the channel's name for diagnostics and statistics.
    fn name(&self) -> &str;

    /// Commit callback, invoked by the scheduler once per honored request.
    fn update(&mut self);
}

/// A channel's connection to its scheduler.
#[derive(Clone)]
pub struct UpdatePort {
    scheduler: Rc<dyn Scheduler>,
    id: ChannelId,
}

impl UpdatePort {
    /// Binds channel `id` to `scheduler`.
    pub fn new(scheduler: Rc<dyn Scheduler>, id: ChannelId) -> Self {
        Self { scheduler, id }
    }

    /// Returns the id this port requests updates for.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Requests an update of the bound channel.
    #[inline]
    pub fn request_update(&self) {
        self.scheduler.request_update(self.id);
    }

    /// Returns the scheduler's current simulated time.
    #[inline]
    pub fn current_time(&self) -> SimTime {
        self.scheduler.current_time()
    }

    /// Returns the scheduler this port is bound to.
    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for UpdatePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdatePort").field("id", &self.id).finish()
    }
}
