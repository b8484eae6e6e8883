//! Fluent assembly of a [`Kernel`] from module declarations.

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::expr::{Expr, ExprModule};
use crate::kernel::{Kernel, TickReport};
use crate::module::Module;
use crate::types::NodeId;

use super::layering::{self, CompileError};

/// Collects modules and kernel options, then compiles them into a running
/// [`Kernel`].
///
/// Registration order is the tie-break: modules that land in the same layer
/// run in the order they were added.
///
/// # Examples
///
/// ```
/// use gatewave::expr::Expr;
/// use gatewave::graph::KernelBuilder;
/// use serde_json::Value;
///
/// let visible = Expr::<Value>::filter(|record: &Value| {
///     record["los"].as_bool().unwrap_or(false)
/// });
/// let tracked = Expr::<Value>::node("visible").and(Expr::node("radar_lock"));
/// let lock = Expr::<Value>::filter(|record: &Value| {
///     record["lock"].as_bool().unwrap_or(false)
/// });
///
/// let kernel = KernelBuilder::new()
///     .add_expr("visible", visible)
///     .add_expr("radar_lock", lock)
///     .add_expr("tracked", tracked)
///     .compile()?;
///
/// assert_eq!(kernel.schedule().layer_count(), 2);
/// # Ok::<(), gatewave::graph::CompileError>(())
/// ```
pub struct KernelBuilder<R> {
    modules: Vec<Box<dyn Module<R>>>,
    clock: Option<Box<dyn Clock>>,
    report_sink: Option<flume::Sender<TickReport>>,
}

impl<R> Default for KernelBuilder<R> {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            clock: None,
            report_sink: None,
        }
    }
}

impl<R> KernelBuilder<R> {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Same-layer execution order follows registration
    /// order.
    #[must_use]
    pub fn add_module(mut self, module: impl Module<R> + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Register an expression tree as the producer of `output`.
    ///
    /// Shorthand for wrapping the tree in an [`ExprModule`].
    #[must_use]
    pub fn add_expr(self, output: impl Into<NodeId>, expr: Expr<R>) -> Self
    where
        R: 'static,
    {
        self.add_module(ExprModule::new(output, expr))
    }

    /// Drive tick timing from `clock` instead of the default wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Send a [`TickReport`] down `sink` after every tick.
    #[must_use]
    pub fn with_report_sink(mut self, sink: flume::Sender<TickReport>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    /// Layer the registered modules and produce a ready kernel.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Unsatisfiable`] when some modules' required
    /// nodes can never be produced (missing producer or cycle), and
    /// [`CompileError::DuplicateProducer`] when two modules claim the same
    /// output node.
    pub fn compile(self) -> Result<Kernel<R>, CompileError> {
        let schedule = layering::plan(self.modules)?;
        info!(
            target: "gatewave::graph",
            modules = schedule.module_count(),
            layers = schedule.layer_count(),
            nodes = schedule.nodes().count(),
            "kernel compiled"
        );
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::start()));
        Ok(Kernel::from_parts(schedule, clock, self.report_sink))
    }
}
