//! Kernel assembly and dependency layering.
//!
//! This module turns a flat list of module declarations into an executable
//! [`Kernel`](crate::kernel::Kernel). The main entry point is
//! [`KernelBuilder`], which collects modules and compiles them into layers
//! via fixed-point wavefront placement.
//!
//! # Core Concepts
//!
//! - **Modules**: Units of work implementing the [`Module`](crate::module::Module) trait
//! - **Nodes**: Named boolean signals modules require and produce
//! - **Layers**: Waves of modules whose dependencies are met by earlier waves
//! - **Compilation**: Validation and conversion into a [`Schedule`]
//!
//! Compilation is the only fallible step. A module set with a missing
//! producer or a dependency cycle fails with
//! [`CompileError::Unsatisfiable`]; two modules claiming the same output
//! node fail with [`CompileError::DuplicateProducer`]. After a successful
//! compile the kernel runs without an error path.
//!
//! # Quick Start
//!
//! ```
//! use gatewave::expr::Expr;
//! use gatewave::graph::KernelBuilder;
//! use serde_json::Value;
//!
//! let armed = Expr::<Value>::filter(|record: &Value| {
//!     record["armed"].as_bool().unwrap_or(false)
//! });
//! let hostile = Expr::<Value>::node("armed").and(Expr::filter(|record: &Value| {
//!     record["iff"].as_str() == Some("foe")
//! }));
//!
//! let kernel = KernelBuilder::new()
//!     .add_expr("armed", armed)
//!     .add_expr("hostile", hostile)
//!     .compile()?;
//!
//! assert_eq!(kernel.schedule().layer_count(), 2);
//! assert_eq!(kernel.schedule().module_count(), 2);
//! # Ok::<(), gatewave::graph::CompileError>(())
//! ```

mod builder;
mod layering;

pub use builder::KernelBuilder;
pub use layering::{CompileError, Layer, ModuleLayout, Schedule, ScheduleLayout, StuckModule};
