//! # Gatewave: Layered Boolean Signal Propagation
//!
//! Gatewave evaluates named boolean signals over batches of domain records,
//! tick by tick, with dependencies resolved into layers at construction so
//! that every signal read during a tick sees a value computed earlier in
//! the same tick.
//!
//! ## Core Concepts
//!
//! - **Nodes**: Named boolean signals, each produced by exactly one module
//! - **Modules**: Units of work declaring which nodes they require and produce
//! - **Batch**: The keyed set of domain records signals are computed over
//! - **Schedule**: Modules layered in dependency order by wavefront placement
//! - **Kernel**: The tick loop driving update hooks and per-entry compute
//!
//! Construction is the only fallible step: a missing producer, a dependency
//! cycle, or two modules claiming one node all abort
//! [`KernelBuilder::compile`](graph::KernelBuilder::compile) with a
//! diagnostic. A kernel that compiled runs without a runtime error path.
//!
//! ## Quick Start
//!
//! ### Declaring Signals with Expressions
//!
//! Most signals are boolean expressions over a record and other signals.
//! [`Expr`](expr::Expr) trees declare their dependencies automatically:
//!
//! ```
//! use gatewave::expr::Expr;
//! use gatewave::graph::KernelBuilder;
//! use rustc_hash::FxHashMap;
//! use serde_json::{json, Value};
//!
//! // Leaf signals test the record; combinators reference other signals.
//! let in_range = Expr::<Value>::filter(|r: &Value| {
//!     r["distance"].as_f64().unwrap_or(f64::MAX) < 100.0
//! });
//! let visible = Expr::<Value>::filter(|r: &Value| {
//!     r["los"].as_bool().unwrap_or(false)
//! });
//! let engageable = Expr::<Value>::node("in_range").and(Expr::node("visible"));
//!
//! let mut kernel = KernelBuilder::new()
//!     .add_expr("in_range", in_range)
//!     .add_expr("visible", visible)
//!     .add_expr("engageable", engageable)
//!     .compile()?;
//!
//! let mut batch = FxHashMap::default();
//! batch.insert("bogey-7".into(), json!({"distance": 42.0, "los": true}));
//! batch.insert("bogey-9".into(), json!({"distance": 420.0, "los": true}));
//! kernel.set_batch(batch);
//! kernel.tick();
//!
//! assert_eq!(kernel.signals().get("engageable", "bogey-7"), Some(true));
//! assert_eq!(kernel.signals().get("engageable", "bogey-9"), Some(false));
//! # Ok::<(), gatewave::graph::CompileError>(())
//! ```
//!
//! ### Driving Time Yourself
//!
//! Update hooks receive the seconds elapsed since the previous tick ended.
//! Tests and simulations swap the wall clock for a
//! [`ManualClock`](clock::ManualClock):
//!
//! ```
//! use gatewave::clock::ManualClock;
//! use gatewave::expr::Expr;
//! use gatewave::graph::KernelBuilder;
//! use serde_json::Value;
//!
//! let clock = ManualClock::new();
//! let mut kernel = KernelBuilder::new()
//!     .add_expr("always", Expr::<Value>::filter(|_: &Value| true))
//!     .with_clock(clock.clone())
//!     .compile()?;
//!
//! clock.advance(5.0);
//! assert_eq!(kernel.tick().dt, 5.0);
//! clock.advance(2.5);
//! assert_eq!(kernel.tick().dt, 2.5);
//! # Ok::<(), gatewave::graph::CompileError>(())
//! ```
//!
//! ### Publishing Batches from Another Thread
//!
//! The kernel owns its batch. Producers stage replacements through a cloned
//! [`BatchSlot`](batch::BatchSlot); the kernel adopts the newest staged
//! batch wholesale at the start of the next compute phase, so a tick never
//! observes a mix of two batches:
//!
//! ```
//! use gatewave::expr::Expr;
//! use gatewave::graph::KernelBuilder;
//! use rustc_hash::FxHashMap;
//! use serde_json::{json, Value};
//!
//! let mut kernel = KernelBuilder::new()
//!     .add_expr("alive", Expr::<Value>::filter(|r: &Value| {
//!         r["hp"].as_i64().unwrap_or(0) > 0
//!     }))
//!     .compile()?;
//!
//! let slot = kernel.batch_slot();
//! let feeder = std::thread::spawn(move || {
//!     let mut batch = FxHashMap::default();
//!     batch.insert("unit-1".into(), json!({"hp": 30}));
//!     slot.publish(batch);
//! });
//! feeder.join().unwrap();
//!
//! assert!(kernel.tick().batch_replaced);
//! assert_eq!(kernel.signals().get("alive", "unit-1"), Some(true));
//! # Ok::<(), gatewave::graph::CompileError>(())
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Node and entry identifier newtypes
//! - [`module`] - The [`Module`](module::Module) trait and its capability traits
//! - [`expr`] - Boolean expression trees and their module adapter
//! - [`graph`] - Builder, wavefront layering, and compile diagnostics
//! - [`kernel`] - The tick loop and per-tick reports
//! - [`store`] - Per-node, per-entry signal storage
//! - [`batch`] - Batch type and the cross-thread publish slot
//! - [`clock`] - Wall, manual, and closure-backed clocks

pub mod batch;
pub mod clock;
pub mod expr;
pub mod graph;
pub mod kernel;
pub mod module;
pub mod store;
pub mod types;
