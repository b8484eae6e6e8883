//! The running engine: tick-driven propagation of signals over a batch.
//!
//! A [`Kernel`] owns the compiled [`Schedule`](crate::graph::Schedule), the
//! [`SignalStore`](crate::store::SignalStore), and the current
//! [`Batch`](crate::batch::Batch). Each call to [`Kernel::tick`] runs one
//! frame:
//!
//! 1. **Update**: every module with an update hook runs once, layer by
//!    layer, with the elapsed time since the previous tick ended.
//! 2. **Batch handover**: if a producer published a fresh batch through the
//!    kernel's [`BatchSlot`](crate::batch::BatchSlot), it replaces the
//!    current one wholesale. A tick never sees a mix of two batches.
//! 3. **Compute**: signal storage is cleared, then for every entry in the
//!    batch each computing module runs in layer order, so reads of earlier
//!    layers' outputs always see this tick's values.
//!
//! Ticking is infallible. A compiled kernel has, by construction, exactly
//! one producer per node and a producible order for every dependency, so
//! there is nothing left to go wrong at runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::batch::{Batch, BatchSlot};
use crate::clock::Clock;
use crate::graph::Schedule;
use crate::module::{EntryCtx, UpdateCtx};
use crate::store::SignalStore;

/// Summary of one completed tick.
///
/// Returned by [`Kernel::tick`] and, when a sink is registered via
/// [`KernelBuilder::with_report_sink`](crate::graph::KernelBuilder::with_report_sink),
/// also sent down the channel after each frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    /// 1-based tick counter.
    pub tick: u64,
    /// Seconds elapsed since the previous tick ended.
    pub dt: f64,
    /// Entries in the batch this tick computed over.
    pub entries: usize,
    /// Modules whose update hook ran.
    pub refreshed: usize,
    /// Compute invocations (entries x computing modules).
    pub evaluations: usize,
    /// Whether a freshly published batch replaced the current one.
    pub batch_replaced: bool,
    /// Wall-clock completion stamp.
    pub when: DateTime<Utc>,
}

/// A compiled, tickable propagation engine.
///
/// Built by [`KernelBuilder::compile`](crate::graph::KernelBuilder::compile).
/// The kernel owns its batch and signal storage outright; producers hand
/// over new batches through a cloned [`BatchSlot`], never by reaching into
/// the kernel.
///
/// # Examples
///
/// ```
/// use gatewave::clock::ManualClock;
/// use gatewave::expr::Expr;
/// use gatewave::graph::KernelBuilder;
/// use rustc_hash::FxHashMap;
/// use serde_json::{json, Value};
///
/// let clock = ManualClock::new();
/// let mut kernel = KernelBuilder::new()
///     .add_expr("hot", Expr::<Value>::filter(|record: &Value| {
///         record["temp"].as_f64().unwrap_or(0.0) > 50.0
///     }))
///     .with_clock(clock.clone())
///     .compile()?;
///
/// let mut batch = FxHashMap::default();
/// batch.insert("probe-1".into(), json!({"temp": 71.0}));
/// batch.insert("probe-2".into(), json!({"temp": 12.0}));
/// kernel.set_batch(batch);
///
/// clock.advance(0.1);
/// let report = kernel.tick();
///
/// assert_eq!(report.entries, 2);
/// assert_eq!(kernel.signals().get("hot", "probe-1"), Some(true));
/// assert_eq!(kernel.signals().get("hot", "probe-2"), Some(false));
/// # Ok::<(), gatewave::graph::CompileError>(())
/// ```
pub struct Kernel<R> {
    schedule: Schedule<R>,
    signals: SignalStore,
    batch: Batch<R>,
    slot: BatchSlot<R>,
    clock: Box<dyn Clock>,
    /// Clock reading taken when the previous tick ended.
    mark: f64,
    ticks: u64,
    reports: Option<flume::Sender<TickReport>>,
}

impl<R> Kernel<R> {
    pub(crate) fn from_parts(
        schedule: Schedule<R>,
        clock: Box<dyn Clock>,
        reports: Option<flume::Sender<TickReport>>,
    ) -> Self {
        let signals = SignalStore::with_nodes(schedule.nodes().cloned());
        let mark = clock.now();
        Self {
            schedule,
            signals,
            batch: Batch::default(),
            slot: BatchSlot::new(),
            clock,
            mark,
            ticks: 0,
            reports,
        }
    }

    /// Run one frame: update hooks, batch handover, then compute.
    ///
    /// Requires `&mut self`, so a tick can never overlap another tick on
    /// the same kernel.
    #[instrument(skip(self), fields(tick = self.ticks + 1))]
    pub fn tick(&mut self) -> TickReport {
        let Kernel {
            schedule,
            signals,
            batch,
            slot,
            clock,
            mark,
            ticks,
            reports,
        } = self;

        *ticks += 1;
        let dt = clock.now() - *mark;

        // Update phase. Signal storage still holds the previous tick's
        // values here, so update hooks may read them.
        let mut refreshed = 0usize;
        let ctx = UpdateCtx::new(dt, *ticks, signals);
        for layer in schedule.layers_mut() {
            for module in layer.slots_mut() {
                if let Some(updatable) = module.as_updatable() {
                    updatable.update(&ctx);
                    refreshed += 1;
                }
            }
        }

        // Batch handover. A publish that lands after this point waits for
        // the next tick; this tick computes over one batch start to finish.
        let batch_replaced = match slot.take() {
            Some(fresh) => {
                *batch = fresh;
                true
            }
            None => false,
        };
        if batch_replaced {
            debug!(
                target: "gatewave::batch",
                entries = batch.len(),
                "batch adopted"
            );
        }

        // Compute phase. Every registered node starts the phase with a
        // fresh empty lane; stale entry keys cannot survive a reset.
        signals.reset();
        let mut evaluations = 0usize;
        for (entry, record) in batch.iter() {
            for layer in schedule.layers() {
                for module in layer.modules() {
                    if let Some(computable) = module.as_computable() {
                        let writes = {
                            let ctx = EntryCtx::new(entry, record, signals);
                            computable.compute(&ctx)
                        };
                        signals.commit(module.produces(), entry, writes);
                        evaluations += 1;
                    }
                }
            }
        }

        *mark = clock.now();
        let report = TickReport {
            tick: *ticks,
            dt,
            entries: batch.len(),
            refreshed,
            evaluations,
            batch_replaced,
            when: Utc::now(),
        };
        debug!(
            target: "gatewave::kernel",
            tick = report.tick,
            dt = report.dt,
            entries = report.entries,
            refreshed = report.refreshed,
            evaluations = report.evaluations,
            batch_replaced = report.batch_replaced,
            "tick complete"
        );
        if let Some(tx) = reports {
            // A full or dropped receiver must not stall the engine.
            if tx.try_send(report.clone()).is_err() {
                trace!(target: "gatewave::kernel", "report sink unavailable, report dropped");
            }
        }
        report
    }

    /// Stage `batch` for adoption at the start of the next tick's compute
    /// phase. Replaces any batch staged earlier in the same gap.
    pub fn set_batch(&self, batch: Batch<R>) {
        self.slot.publish(batch);
    }

    /// Handle for publishing batches from other threads.
    #[must_use]
    pub fn batch_slot(&self) -> BatchSlot<R> {
        self.slot.clone()
    }

    /// Signal values computed by the most recent tick.
    #[must_use]
    pub fn signals(&self) -> &SignalStore {
        &self.signals
    }

    /// The batch the most recent tick computed over.
    #[must_use]
    pub fn batch(&self) -> &Batch<R> {
        &self.batch
    }

    /// The compiled execution plan.
    #[must_use]
    pub fn schedule(&self) -> &Schedule<R> {
        &self.schedule
    }

    /// Completed tick count.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<R> std::fmt::Debug for Kernel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("layers", &self.schedule.layer_count())
            .field("modules", &self.schedule.module_count())
            .field("entries", &self.batch.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
