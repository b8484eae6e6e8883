//! Demo: Contact Board
//!
//! This demonstration drives a small air-picture board: a feeder task
//! publishes radar sweeps while the main loop ticks the kernel and prints
//! which signals hold for each contact.
//!
//! What You'll Learn:
//! 1. Expression Signals: Filters over records combined with `and`/`or`
//! 2. Custom Modules: An update-phase strobe accumulating real `dt`
//! 3. Batch Handover: Publishing whole sweeps from another task
//! 4. Tick Reports: Observing per-frame counters through a flume sink
//!
//! Running This Demo:
//! ```bash
//! cargo run --example contact_board
//! ```

use std::time::Duration;

use miette::Result;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gatewave::batch::Batch;
use gatewave::expr::Expr;
use gatewave::graph::KernelBuilder;
use gatewave::module::{Computable, EntryCtx, Module, SignalWrites, Updatable, UpdateCtx};
use gatewave::types::NodeId;

/// One radar return. Sweeps replace the whole batch of these at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Contact {
    range_km: f64,
    los: bool,
    iff: Option<String>,
}

/// Flips a shared strobe signal at a fixed period, accumulated from the
/// elapsed time the update phase hands it.
struct StrobeModule {
    period: f64,
    elapsed: f64,
    lit: bool,
    produces: Vec<NodeId>,
}

impl StrobeModule {
    fn new(period: f64) -> Self {
        Self {
            period,
            elapsed: 0.0,
            lit: false,
            produces: vec![NodeId::new("strobe")],
        }
    }
}

impl Module<Contact> for StrobeModule {
    fn requires(&self) -> &[NodeId] {
        &[]
    }

    fn produces(&self) -> &[NodeId] {
        &self.produces
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }

    fn as_computable(&self) -> Option<&dyn Computable<Contact>> {
        Some(self)
    }
}

impl Updatable for StrobeModule {
    fn update(&mut self, ctx: &UpdateCtx<'_>) {
        self.elapsed += ctx.dt();
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            self.lit = !self.lit;
        }
    }
}

impl Computable<Contact> for StrobeModule {
    fn compute(&self, _ctx: &EntryCtx<'_, Contact>) -> SignalWrites {
        SignalWrites::One(self.lit)
    }
}

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        // Log span open/close so instrumented ticks are visible
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,gatewave=info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn init_miette() {
    // Pretty panic reports
    miette::set_panic_hook();
}

/// Deterministic sweep data: contacts close in a little on every sweep.
fn sweep_batch(sweep: u64) -> Batch<Contact> {
    let drift = sweep as f64 * 18.0;
    [
        (
            "falcon-2",
            Contact {
                range_km: 96.0 - drift,
                los: true,
                iff: Some("friend".into()),
            },
        ),
        (
            "bogey-7",
            Contact {
                range_km: 132.0 - drift,
                los: sweep > 0,
                iff: None,
            },
        ),
        (
            "viper-9",
            Contact {
                range_km: 84.0 - drift,
                los: true,
                iff: Some("foe".into()),
            },
        ),
    ]
    .into_iter()
    .map(|(key, contact)| (key.into(), contact))
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_miette();

    let (report_tx, report_rx) = flume::unbounded();

    let mut kernel = KernelBuilder::new()
        .add_expr("visible", Expr::<Contact>::filter(|c: &Contact| c.los))
        .add_expr(
            "in_range",
            Expr::<Contact>::filter(|c: &Contact| c.range_km < 80.0),
        )
        .add_expr(
            "threat",
            Expr::<Contact>::filter(|c: &Contact| c.iff.as_deref() == Some("foe")),
        )
        .add_expr(
            "engageable",
            Expr::<Contact>::node("visible").and(Expr::node("in_range")),
        )
        .add_expr(
            "priority",
            Expr::<Contact>::node("engageable").and(Expr::node("threat")),
        )
        .add_expr(
            "tracked",
            Expr::<Contact>::node("visible").or(Expr::node("priority")),
        )
        .add_expr(
            "strobe_mark",
            Expr::<Contact>::node("priority").and(Expr::node("strobe")),
        )
        .add_module(StrobeModule::new(0.25))
        .with_report_sink(report_tx)
        .compile()?;

    println!("compiled schedule:");
    println!(
        "{}",
        serde_json::to_string_pretty(&kernel.schedule().layout().module_names())
            .expect("layout serializes")
    );

    // Feeder task: three sweeps, spaced wider than the tick interval so
    // some frames recompute the previous sweep.
    let slot = kernel.batch_slot();
    let feeder = tokio::spawn(async move {
        for sweep in 0..3 {
            slot.publish(sweep_batch(sweep));
            info!(sweep, "sweep published");
            tokio::time::sleep(Duration::from_millis(240)).await;
        }
    });

    let mut frames = tokio::time::interval(Duration::from_millis(100));
    for _ in 0..8 {
        frames.tick().await;
        let report = kernel.tick();
        info!(
            tick = report.tick,
            entries = report.entries,
            replaced = report.batch_replaced,
            "frame"
        );

        let mut keys: Vec<_> = kernel.batch().keys().collect();
        keys.sort();
        for key in keys {
            let flag = |node: &str| {
                if kernel.signals().get(node, key.as_str()).unwrap_or(false) {
                    'x'
                } else {
                    ' '
                }
            };
            println!(
                "  {key:<10} visible[{}] in_range[{}] threat[{}] engageable[{}] priority[{}] mark[{}]",
                flag("visible"),
                flag("in_range"),
                flag("threat"),
                flag("engageable"),
                flag("priority"),
                flag("strobe_mark"),
            );
        }
    }
    let _ = feeder.await;

    let total_evaluations: usize = report_rx.try_iter().map(|r| r.evaluations).sum();
    println!("total compute invocations across the run: {total_evaluations}");

    Ok(())
}
