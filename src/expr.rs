//! Boolean expression trees evaluated per batch entry.
//!
//! An [`Expr`] composes two kinds of leaves, graph reads ([`Expr::Node`])
//! and raw-record tests ([`Expr::Filter`]), with binary AND/OR
//! combinators. Expressions know their own node dependency set, so
//! a module built from one ([`ExprModule`]) declares exactly what the
//! leaves read, and the schedule places it after the producers of those
//! nodes.
//!
//! Combinators evaluate left-first and short-circuit: `AND` skips its
//! right child when the left is false, `OR` when the left is true. Both
//! return an explicit boolean for every operand combination.
//!
//! # Examples
//!
//! ```rust
//! use gatewave::expr::Expr;
//! use gatewave::module::{EntryCtx, Evaluable};
//! use gatewave::store::SignalStore;
//! use gatewave::types::{EntryId, NodeId};
//!
//! struct Contact {
//!     closing: bool,
//!     emitting: bool,
//! }
//!
//! // visible && (closing || emitting): `visible` comes from the graph,
//! // the other two are tested straight off the record.
//! let expr = Expr::node("visible").and(
//!     Expr::filter(|c: &Contact| c.closing).or(Expr::filter(|c: &Contact| c.emitting)),
//! );
//!
//! let visible = NodeId::from("visible");
//! let entry = EntryId::from("c-1");
//! let mut signals = SignalStore::with_nodes([visible.clone()]);
//! signals.insert(&visible, &entry, true);
//!
//! let record = Contact {
//!     closing: false,
//!     emitting: true,
//! };
//! let ctx = EntryCtx::new(&entry, &record, &signals);
//!
//! assert!(expr.evaluate(&ctx));
//! assert_eq!(expr.dependencies().len(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::module::{
    Computable, EntryCtx, Evaluable, Module, SignalWrites, Updatable, UpdateCtx,
};
use crate::types::NodeId;

/// A domain-supplied test over one raw batch record.
///
/// Implement this for stateful predicates (hysteresis thresholds, scan
/// geometry that sweeps with time): override [`wants_update`]
/// (Self::wants_update) to opt into the Update phase and advance state in
/// [`update`](Self::update). Stateless tests need none of that; any
/// `Fn(&R) -> bool + Send` closure is already a predicate.
pub trait Predicate<R>: Send {
    /// Does the predicate hold for this record?
    fn holds(&self, record: &R) -> bool;

    /// Whether this predicate needs the per-tick Update phase.
    fn wants_update(&self) -> bool {
        false
    }

    /// Advance per-tick state. Only called when [`wants_update`]
    /// (Self::wants_update) is true somewhere beneath the hosting module.
    fn update(&mut self, _ctx: &UpdateCtx<'_>) {}
}

impl<R, F> Predicate<R> for F
where
    F: Fn(&R) -> bool + Send,
{
    fn holds(&self, record: &R) -> bool {
        self(record)
    }
}

/// Composable boolean predicate over a single batch entry.
///
/// Built with [`Expr::node`], [`Expr::filter`], and the consuming
/// [`and`](Expr::and)/[`or`](Expr::or) combinators.
pub enum Expr<R> {
    /// Reads a previously produced node's value for the current entry.
    /// Contributes that node to the dependency set.
    Node(NodeId),
    /// Tests the raw batch record with a domain predicate. Contributes no
    /// dependencies.
    Filter(Box<dyn Predicate<R>>),
    /// Left-first short-circuit conjunction.
    And(Box<Expr<R>>, Box<Expr<R>>),
    /// Left-first short-circuit disjunction.
    Or(Box<Expr<R>>, Box<Expr<R>>),
}

impl<R> Expr<R> {
    /// Leaf reading the named node.
    pub fn node(name: impl Into<NodeId>) -> Self {
        Self::Node(name.into())
    }

    /// Leaf testing the raw record with `predicate`.
    pub fn filter(predicate: impl Predicate<R> + 'static) -> Self {
        Self::Filter(Box::new(predicate))
    }

    /// `self AND rhs`, evaluating `self` first.
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        Self::And(Box::new(self), Box::new(rhs))
    }

    /// `self OR rhs`, evaluating `self` first.
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        Self::Or(Box::new(self), Box::new(rhs))
    }

    /// The ordered, duplicate-free union of every node this expression
    /// reads.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<NodeId> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, into: &mut BTreeSet<NodeId>) {
        match self {
            Expr::Node(name) => {
                into.insert(name.clone());
            }
            Expr::Filter(_) => {}
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_dependencies(into);
                right.collect_dependencies(into);
            }
        }
    }

    /// True iff any predicate beneath this expression asks for the Update
    /// phase. Hosting modules use this to stay out of the Update phase
    /// entirely when the whole tree is stateless.
    #[must_use]
    pub fn wants_update(&self) -> bool {
        match self {
            Expr::Node(_) => false,
            Expr::Filter(predicate) => predicate.wants_update(),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.wants_update() || right.wants_update()
            }
        }
    }
}

impl<R> Evaluable<R> for Expr<R> {
    fn evaluate(&self, ctx: &EntryCtx<'_, R>) -> bool {
        match self {
            Expr::Node(name) => ctx.signal(name.as_str()),
            Expr::Filter(predicate) => predicate.holds(ctx.record()),
            // `&&`/`||` carry the left-first short-circuit order and stay
            // total over every operand combination.
            Expr::And(left, right) => left.evaluate(ctx) && right.evaluate(ctx),
            Expr::Or(left, right) => left.evaluate(ctx) || right.evaluate(ctx),
        }
    }
}

impl<R> Updatable for Expr<R> {
    fn update(&mut self, ctx: &UpdateCtx<'_>) {
        match self {
            Expr::Node(_) => {}
            Expr::Filter(predicate) => predicate.update(ctx),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.update(ctx);
                right.update(ctx);
            }
        }
    }
}

impl<R> fmt::Debug for Expr<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Node(name) => f.debug_tuple("Node").field(name).finish(),
            Expr::Filter(_) => f.write_str("Filter(..)"),
            Expr::And(left, right) => f.debug_tuple("And").field(left).field(right).finish(),
            Expr::Or(left, right) => f.debug_tuple("Or").field(left).field(right).finish(),
        }
    }
}

/// Module adapter around a single expression and one output node.
///
/// Dependencies are the expression's dependency set; the sole output is the
/// given node; `compute` writes the expression's value for each entry. The
/// adapter joins the Update phase only when the expression asks for it.
///
/// # Examples
///
/// ```rust
/// use gatewave::expr::{Expr, ExprModule};
/// use gatewave::module::Module;
///
/// let module = ExprModule::new(
///     "engageable",
///     Expr::node("in_range").and(Expr::filter(|speed: &f64| *speed > 0.0)),
/// );
///
/// assert_eq!(module.name(), "engageable");
/// assert_eq!(module.requires().len(), 1);
/// assert_eq!(module.produces().len(), 1);
/// ```
pub struct ExprModule<R> {
    name: String,
    output: [NodeId; 1],
    requires: Vec<NodeId>,
    wants_update: bool,
    expr: Expr<R>,
}

impl<R> ExprModule<R> {
    /// Wrap `expr` as the producer of `output`.
    pub fn new(output: impl Into<NodeId>, expr: Expr<R>) -> Self {
        let output = output.into();
        let requires = expr.dependencies().into_iter().collect();
        let wants_update = expr.wants_update();
        Self {
            name: output.as_str().to_string(),
            output: [output],
            requires,
            wants_update,
            expr,
        }
    }

    /// Override the diagnostic label (defaults to the output node's name).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The wrapped expression.
    #[must_use]
    pub fn expr(&self) -> &Expr<R> {
        &self.expr
    }
}

impl<R> fmt::Debug for ExprModule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprModule")
            .field("name", &self.name)
            .field("output", &self.output[0])
            .field("requires", &self.requires)
            .field("wants_update", &self.wants_update)
            .finish_non_exhaustive()
    }
}

impl<R> Module<R> for ExprModule<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> &[NodeId] {
        &self.requires
    }

    fn produces(&self) -> &[NodeId] {
        &self.output
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        if self.wants_update { Some(self) } else { None }
    }

    fn as_computable(&self) -> Option<&dyn Computable<R>> {
        Some(self)
    }
}

impl<R> Computable<R> for ExprModule<R> {
    fn compute(&self, ctx: &EntryCtx<'_, R>) -> SignalWrites {
        SignalWrites::One(self.expr.evaluate(ctx))
    }
}

impl<R> Updatable for ExprModule<R> {
    fn update(&mut self, ctx: &UpdateCtx<'_>) {
        self.expr.update(ctx);
    }
}
