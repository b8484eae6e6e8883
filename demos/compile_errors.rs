//! Example demonstrating how kernel compile failures render as rich
//! diagnostics.
//!
//! Both failure classes are shown:
//! - `Unsatisfiable`: a dependency no wave can ever produce (missing
//!   producer or cycle), listing every stuck module with its unmet nodes
//! - `DuplicateProducer`: two modules claiming the same output node
//!
//! Run with:
//! ```bash
//! cargo run --example compile_errors
//! ```

use miette::Report;
use serde_json::Value;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gatewave::expr::Expr;
use gatewave::graph::KernelBuilder;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(true),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("gatewave=info".parse().unwrap())
                .add_directive("compile_errors=info".parse().unwrap()),
        )
        .with(ErrorLayer::default())
        .init();
}

fn main() {
    init_tracing();

    // A consumer of "radar_lock" with nobody producing it, plus a genuine
    // two-module cycle. Both land in the same unsatisfiable report.
    println!("--- unsatisfiable dependency set ---");
    let err = KernelBuilder::new()
        .add_expr("tracked", Expr::<Value>::node("radar_lock"))
        .add_expr("ping", Expr::<Value>::node("pong"))
        .add_expr("pong", Expr::<Value>::node("ping"))
        .compile()
        .expect_err("missing producer and cycle cannot compile");
    println!("{:?}", Report::new(err));

    // Two modules claiming the same output node.
    println!("--- duplicate producer ---");
    let err = KernelBuilder::new()
        .add_expr(
            "visible",
            Expr::<Value>::filter(|r: &Value| r["los"].as_bool().unwrap_or(false)),
        )
        .add_expr(
            "visible",
            Expr::<Value>::filter(|r: &Value| r["optical"].as_bool().unwrap_or(false)),
        )
        .compile()
        .expect_err("one node cannot have two producers");
    println!("{:?}", Report::new(err));
}
