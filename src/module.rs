//! Computation units and the capability contracts they implement.
//!
//! A [`Module`] declares which nodes it requires and which it produces; the
//! kernel uses those declarations to place it into a schedule layer. What a
//! module can *do* is expressed through three independent capabilities:
//!
//! - [`Updatable`]: refresh internal state once per tick (scan geometry,
//!   hysteresis timers, anything that advances with `dt`)
//! - [`Computable`]: produce output signal values for one batch entry
//! - [`Evaluable`]: answer a boolean question about one batch entry
//!
//! A unit may implement any subset. Presence is discovered through the
//! virtual-call accessors [`Module::as_updatable`] and
//! [`Module::as_computable`]; returning `None` makes the kernel skip the
//! unit for that phase, so idle hooks cost one dynamic call per tick, not
//! one per entry.
//!
//! Hooks never touch the kernel directly. They receive restricted views
//! ([`UpdateCtx`] for the tick-wide Update phase, [`EntryCtx`] for the
//! per-entry Compute phase), which makes reading another entry's data
//! inexpressible rather than merely forbidden.

use crate::store::SignalStore;
use crate::types::{EntryId, NodeId};

/// Tick-wide context handed to [`Updatable::update`].
///
/// Carries the elapsed time since the previous tick, the 1-based tick
/// number, and a read-only view of the *previous* tick's signal values
/// (the store is not reset until the Compute phase begins). The raw batch
/// is deliberately absent: it may be mid-replacement during Update, and
/// per-entry data belongs to the Compute phase.
pub struct UpdateCtx<'a> {
    dt: f64,
    tick: u64,
    signals: &'a SignalStore,
}

impl<'a> UpdateCtx<'a> {
    /// Assemble a context. Normally done by the kernel once per tick;
    /// public so custom units can be exercised in isolation.
    pub fn new(dt: f64, tick: u64, signals: &'a SignalStore) -> Self {
        Self { dt, tick, signals }
    }

    /// Seconds of clock time since the end of the previous tick.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// 1-based tick number.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Signal values as left by the previous tick's Compute phase.
    #[must_use]
    pub fn signals(&self) -> &SignalStore {
        self.signals
    }
}

/// Per-entry context handed to [`Computable::compute`] and
/// [`Evaluable::evaluate`].
///
/// Exposes exactly one batch record and that entry's signal lane. Signals
/// read through [`signal`](Self::signal) are those produced by earlier
/// layers this tick; asking for a node that is undeclared, unproduced, or
/// scheduled later yields `false`, a defined value rather than an error.
pub struct EntryCtx<'a, R> {
    entry: &'a EntryId,
    record: &'a R,
    signals: &'a SignalStore,
}

impl<'a, R> EntryCtx<'a, R> {
    /// Assemble a context. Normally done by the kernel per (module, entry)
    /// invocation; public so predicates and units can be unit-tested.
    pub fn new(entry: &'a EntryId, record: &'a R, signals: &'a SignalStore) -> Self {
        Self {
            entry,
            record,
            signals,
        }
    }

    /// Key of the entry currently being computed.
    #[must_use]
    pub fn entry(&self) -> &EntryId {
        self.entry
    }

    /// The raw batch record for this entry.
    #[must_use]
    pub fn record(&self) -> &R {
        self.record
    }

    /// Value of `node` for this entry, as produced by an earlier layer
    /// this tick. `false` when absent.
    #[must_use]
    pub fn signal(&self, node: &str) -> bool {
        self.signals
            .get(node, self.entry.as_str())
            .unwrap_or(false)
    }
}

/// Values a [`Computable`] hands back for the kernel to commit against the
/// module's declared outputs.
///
/// Writes address outputs positionally, so a module cannot name (let alone
/// clobber) a node it does not own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalWrites {
    /// One value for the first (usually only) declared output.
    One(bool),
    /// Values zipped positionally with the declared outputs. Surplus values
    /// are dropped; missing ones leave their output unset for this entry.
    Many(Vec<bool>),
}

/// Per-tick state refresh.
pub trait Updatable: Send {
    /// Advance internal state by `ctx.dt()` seconds. Runs once per tick,
    /// layer by layer then module by module, before any compute hook.
    fn update(&mut self, ctx: &UpdateCtx<'_>);
}

/// Per-entry signal production.
pub trait Computable<R>: Send {
    /// Produce this module's output values for the ctx's entry. Invoked
    /// once per entry per tick, after every earlier layer has computed
    /// that entry.
    fn compute(&self, ctx: &EntryCtx<'_, R>) -> SignalWrites;
}

/// Per-entry boolean read.
pub trait Evaluable<R>: Send {
    /// Answer the predicate for the ctx's entry.
    fn evaluate(&self, ctx: &EntryCtx<'_, R>) -> bool;
}

/// A computation unit of the signal graph.
///
/// Declares dependencies and outputs (both ordered and duplicate-free) and
/// exposes whichever capabilities the concrete type implements. The kernel
/// places each module into exactly one schedule layer at compile time and
/// owns it from then on.
///
/// # Examples
///
/// A compute-only unit that lifts a record field into a signal:
///
/// ```rust
/// use gatewave::module::{Computable, EntryCtx, Module, SignalWrites};
/// use gatewave::types::NodeId;
/// use serde_json::Value;
///
/// struct EmitterFlag {
///     output: [NodeId; 1],
/// }
///
/// impl Module<Value> for EmitterFlag {
///     fn requires(&self) -> &[NodeId] {
///         &[]
///     }
///
///     fn produces(&self) -> &[NodeId] {
///         &self.output
///     }
///
///     fn as_computable(&self) -> Option<&dyn Computable<Value>> {
///         Some(self)
///     }
/// }
///
/// impl Computable<Value> for EmitterFlag {
///     fn compute(&self, ctx: &EntryCtx<'_, Value>) -> SignalWrites {
///         SignalWrites::One(ctx.record()["emitting"].as_bool().unwrap_or(false))
///     }
/// }
/// ```
pub trait Module<R>: Send {
    /// Diagnostic label used in compile errors, layouts, and logs.
    /// Defaults to the first output node's name.
    fn name(&self) -> &str {
        self.produces().first().map_or("module", NodeId::as_str)
    }

    /// Node names this module reads. Every one must be produced by a
    /// module placed in a strictly earlier layer.
    fn requires(&self) -> &[NodeId];

    /// Node names this module writes. Each may have only this producer
    /// graph-wide.
    fn produces(&self) -> &[NodeId];

    /// The update capability, if this unit has one.
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// The compute capability, if this unit has one.
    fn as_computable(&self) -> Option<&dyn Computable<R>> {
        None
    }
}
