use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gatewave::batch::{Batch, BatchSlot};
use gatewave::module::{Computable, EntryCtx, Module, SignalWrites, Updatable, UpdateCtx};
use gatewave::types::NodeId;
use parking_lot::Mutex;
use serde_json::Value;

/// Always writes a fixed value to its single output.
#[derive(Debug, Clone)]
pub struct ConstModule {
    name: String,
    requires: Vec<NodeId>,
    produces: Vec<NodeId>,
    value: bool,
}

impl ConstModule {
    pub fn new(output: &str, value: bool) -> Self {
        Self {
            name: output.to_string(),
            requires: Vec::new(),
            produces: vec![NodeId::new(output)],
            value,
        }
    }

    pub fn with_requires(mut self, deps: &[&str]) -> Self {
        self.requires = deps.iter().map(|d| NodeId::new(*d)).collect();
        self
    }
}

impl Module<Value> for ConstModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[NodeId] {
        &self.requires
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_computable(&self) -> Option<&dyn Computable<Value>> {
        Some(self)
    }
}

impl Computable<Value> for ConstModule {
    fn compute(&self, _ctx: &EntryCtx<'_, Value>) -> SignalWrites {
        SignalWrites::One(self.value)
    }
}

/// Copies one input node's value to its output, entry by entry.
#[derive(Debug, Clone)]
pub struct RelayModule {
    name: String,
    requires: Vec<NodeId>,
    produces: Vec<NodeId>,
}

impl RelayModule {
    pub fn new(input: &str, output: &str) -> Self {
        Self {
            name: output.to_string(),
            requires: vec![NodeId::new(input)],
            produces: vec![NodeId::new(output)],
        }
    }
}

impl Module<Value> for RelayModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[NodeId] {
        &self.requires
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_computable(&self) -> Option<&dyn Computable<Value>> {
        Some(self)
    }
}

impl Computable<Value> for RelayModule {
    fn compute(&self, ctx: &EntryCtx<'_, Value>) -> SignalWrites {
        SignalWrites::One(ctx.signal(self.requires[0].as_str()))
    }
}

/// Writes `true` and appends every hook invocation to a shared log, so
/// tests can assert phase and layer ordering.
pub struct RecordingModule {
    name: String,
    requires: Vec<NodeId>,
    produces: Vec<NodeId>,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingModule {
    pub fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            requires: Vec::new(),
            produces: vec![NodeId::new(name)],
            log: Arc::clone(log),
        }
    }

    pub fn with_requires(mut self, deps: &[&str]) -> Self {
        self.requires = deps.iter().map(|d| NodeId::new(*d)).collect();
        self
    }
}

impl Module<Value> for RecordingModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[NodeId] {
        &self.requires
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }

    fn as_computable(&self) -> Option<&dyn Computable<Value>> {
        Some(self)
    }
}

impl Updatable for RecordingModule {
    fn update(&mut self, _ctx: &UpdateCtx<'_>) {
        self.log.lock().push(format!("update:{}", self.name));
    }
}

impl Computable<Value> for RecordingModule {
    fn compute(&self, ctx: &EntryCtx<'_, Value>) -> SignalWrites {
        self.log
            .lock()
            .push(format!("compute:{}:{}", self.name, ctx.entry()));
        SignalWrites::One(true)
    }
}

/// Update-only module with no outputs; records every dt it is handed.
pub struct TickProbe {
    dts: Arc<Mutex<Vec<f64>>>,
    refreshes: Arc<AtomicUsize>,
}

impl TickProbe {
    pub fn new() -> Self {
        Self {
            dts: Arc::new(Mutex::new(Vec::new())),
            refreshes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dts(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.dts)
    }

    pub fn refreshes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.refreshes)
    }
}

impl Default for TickProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Module<Value> for TickProbe {
    fn name(&self) -> &str {
        "tick_probe"
    }

    fn requires(&self) -> &[NodeId] {
        &[]
    }

    fn produces(&self) -> &[NodeId] {
        &[]
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for TickProbe {
    fn update(&mut self, ctx: &UpdateCtx<'_>) {
        self.dts.lock().push(ctx.dt());
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Publishes a replacement batch through the kernel's slot from inside its
/// own compute hook, once. Lets tests prove a tick never mixes batches.
///
/// The kernel's slot only exists after compile, so the module is built
/// around an empty handle the test fills in afterwards.
pub struct MidTickPublisher {
    produces: Vec<NodeId>,
    slot: Arc<Mutex<Option<BatchSlot<Value>>>>,
    replacement: Mutex<Option<Batch<Value>>>,
}

impl MidTickPublisher {
    pub fn new(
        output: &str,
        replacement: Batch<Value>,
    ) -> (Self, Arc<Mutex<Option<BatchSlot<Value>>>>) {
        let slot = Arc::new(Mutex::new(None));
        let module = Self {
            produces: vec![NodeId::new(output)],
            slot: Arc::clone(&slot),
            replacement: Mutex::new(Some(replacement)),
        };
        (module, slot)
    }
}

impl Module<Value> for MidTickPublisher {
    fn requires(&self) -> &[NodeId] {
        &[]
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_computable(&self) -> Option<&dyn Computable<Value>> {
        Some(self)
    }
}

impl Computable<Value> for MidTickPublisher {
    fn compute(&self, _ctx: &EntryCtx<'_, Value>) -> SignalWrites {
        if let Some(slot) = self.slot.lock().as_ref() {
            if let Some(batch) = self.replacement.lock().take() {
                slot.publish(batch);
            }
        }
        SignalWrites::One(true)
    }
}

/// Produces the conjunction of its required nodes (vacuously true with no
/// requirements). The workhorse for randomized layering tests.
#[derive(Debug, Clone)]
pub struct WaveModule {
    name: String,
    requires: Vec<NodeId>,
    produces: Vec<NodeId>,
}

impl WaveModule {
    pub fn new(output: &str, deps: &[String]) -> Self {
        Self {
            name: output.to_string(),
            requires: deps.iter().map(NodeId::new).collect(),
            produces: vec![NodeId::new(output)],
        }
    }
}

impl Module<Value> for WaveModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[NodeId] {
        &self.requires
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_computable(&self) -> Option<&dyn Computable<Value>> {
        Some(self)
    }
}

impl Computable<Value> for WaveModule {
    fn compute(&self, ctx: &EntryCtx<'_, Value>) -> SignalWrites {
        let all = self
            .requires
            .iter()
            .all(|node| ctx.signal(node.as_str()));
        SignalWrites::One(all)
    }
}
