//! Wavefront layering: fixed-point placement of modules into dependency
//! order.
//!
//! Placement repeatedly partitions the unplaced modules into a `ready` wave
//! (every dependency already produced by an earlier wave) and a `deferred`
//! rest. Each wave becomes one [`Layer`]; a pass that readies nothing while
//! modules remain means the set can never be satisfied (a missing producer
//! or a cycle, deliberately not distinguished). Input order is preserved
//! within a wave, which makes layering deterministic for a given module
//! list.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::module::Module;
use crate::types::NodeId;

/// One module that could not be placed, with the dependencies no wave
/// produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckModule {
    /// Diagnostic label of the module.
    pub module: String,
    /// Its unmet dependency node names.
    pub missing: Vec<NodeId>,
}

impl fmt::Display for StuckModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' missing [", self.module)?;
        for (i, node) in self.missing.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{node}")?;
        }
        f.write_str("]")
    }
}

fn render_stuck(stuck: &[StuckModule]) -> String {
    stuck
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fatal construction errors. Either one aborts kernel assembly; there is
/// no runtime error path after a successful compile.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// Some modules' dependencies can never be met by any producible wave.
    /// Covers missing producers and dependency cycles alike.
    #[error("unsatisfiable dependency set: {}", render_stuck(.stuck))]
    #[diagnostic(
        code(gatewave::graph::unsatisfiable),
        help("Every required node needs exactly one producing module placeable in an earlier layer. Check for misspelled node names, missing producers, or dependency cycles among the listed modules.")
    )]
    Unsatisfiable {
        /// Every unplaceable module with its unmet dependencies.
        stuck: Vec<StuckModule>,
    },

    /// Two modules claim the same output node.
    #[error("duplicate producer for node '{node}': '{first}' and '{second}'")]
    #[diagnostic(
        code(gatewave::graph::duplicate_producer),
        help("A node may have exactly one producer. Rename one of the outputs or drop the duplicate module.")
    )]
    DuplicateProducer {
        /// The contested node name.
        node: NodeId,
        /// Module that registered the node first.
        first: String,
        /// Module that tried to register it again.
        second: String,
    },
}

/// One wave of mutually independent modules.
///
/// Every module in a layer has all dependencies satisfied by strictly
/// earlier layers, so members never read each other's outputs.
pub struct Layer<R> {
    modules: Vec<Box<dyn Module<R>>>,
}

impl<R> Layer<R> {
    /// Number of modules in this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True when the layer holds no modules (never produced by placement).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate the layer's modules in placement order.
    pub fn modules(&self) -> impl Iterator<Item = &dyn Module<R>> {
        self.modules.iter().map(Box::as_ref)
    }

    pub(crate) fn slots(&self) -> &[Box<dyn Module<R>>] {
        &self.modules
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Box<dyn Module<R>>] {
        &mut self.modules
    }
}

impl<R> fmt::Debug for Layer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.modules().map(Module::name))
            .finish()
    }
}

/// The ordered execution plan: layers of modules in dependency order.
pub struct Schedule<R> {
    layers: Vec<Layer<R>>,
}

impl<R> Schedule<R> {
    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of modules across all layers.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Iterate the layers in execution order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer<R>> {
        self.layers.iter()
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer<R>] {
        &mut self.layers
    }

    /// Every node produced somewhere in the schedule, in layer then module
    /// then output order. This is the kernel's node registry.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.layers
            .iter()
            .flat_map(|layer| layer.modules())
            .flat_map(Module::produces)
    }

    /// Serializable snapshot of the plan for dashboards, demos, and tests.
    #[must_use]
    pub fn layout(&self) -> ScheduleLayout {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                layer
                    .modules()
                    .map(|module| ModuleLayout {
                        module: module.name().to_string(),
                        requires: module.requires().to_vec(),
                        produces: module.produces().to_vec(),
                    })
                    .collect()
            })
            .collect();
        ScheduleLayout { layers }
    }
}

impl<R> fmt::Debug for Schedule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.layers).finish()
    }
}

/// Declarative description of a compiled schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLayout {
    /// Per layer, per module: its label and declared node sets.
    pub layers: Vec<Vec<ModuleLayout>>,
}

impl ScheduleLayout {
    /// Module labels per layer, handy for order assertions.
    #[must_use]
    pub fn module_names(&self) -> Vec<Vec<String>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(|m| m.module.clone()).collect())
            .collect()
    }
}

/// One module's declarations inside a [`ScheduleLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLayout {
    /// Diagnostic label.
    pub module: String,
    /// Declared dependency node names.
    pub requires: Vec<NodeId>,
    /// Declared output node names.
    pub produces: Vec<NodeId>,
}

/// Place `modules` into dependency-ordered layers.
pub(crate) fn plan<R>(modules: Vec<Box<dyn Module<R>>>) -> Result<Schedule<R>, CompileError> {
    // Producer map doubles as the satisfied-node set and names claimants
    // in duplicate diagnostics.
    let mut producers: FxHashMap<NodeId, String> = FxHashMap::default();
    let mut remaining = modules;
    let mut layers = Vec::new();

    while !remaining.is_empty() {
        let (ready, deferred): (Vec<_>, Vec<_>) = remaining.into_iter().partition(|module| {
            module
                .requires()
                .iter()
                .all(|dep| producers.contains_key(dep))
        });

        if ready.is_empty() {
            let stuck = deferred
                .iter()
                .map(|module| StuckModule {
                    module: module.name().to_string(),
                    missing: module
                        .requires()
                        .iter()
                        .filter(|dep| !producers.contains_key(*dep))
                        .cloned()
                        .collect(),
                })
                .collect();
            return Err(CompileError::Unsatisfiable { stuck });
        }

        for module in &ready {
            for output in module.produces() {
                if let Some(first) = producers.insert(output.clone(), module.name().to_string()) {
                    return Err(CompileError::DuplicateProducer {
                        node: output.clone(),
                        first,
                        second: module.name().to_string(),
                    });
                }
            }
        }

        layers.push(Layer { modules: ready });
        remaining = deferred;
    }

    Ok(Schedule { layers })
}
