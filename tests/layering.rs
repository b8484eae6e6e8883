mod common;

use common::*;
use gatewave::expr::Expr;
use gatewave::graph::{CompileError, KernelBuilder};
use gatewave::types::NodeId;
use serde_json::Value;

#[test]
fn test_single_module_compiles_to_one_layer() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .compile()
        .unwrap();

    assert_eq!(kernel.schedule().layer_count(), 1);
    assert_eq!(kernel.schedule().module_count(), 1);
}

#[test]
fn test_dependent_modules_split_into_layers() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .add_module(RelayModule::new("a", "b"))
        .compile()
        .unwrap();

    let names = kernel.schedule().layout().module_names();
    assert_eq!(names, vec![vec!["a"], vec!["b"]]);
}

#[test]
fn test_registration_order_breaks_ties() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("gamma", true))
        .add_module(ConstModule::new("alpha", true))
        .add_module(ConstModule::new("beta", true))
        .compile()
        .unwrap();

    let names = kernel.schedule().layout().module_names();
    assert_eq!(names, vec![vec!["gamma", "alpha", "beta"]]);
}

#[test]
fn test_declaration_order_does_not_gate_placement() {
    // Consumer registered before its producer still lands in a later layer.
    let kernel = KernelBuilder::new()
        .add_module(RelayModule::new("a", "b"))
        .add_module(ConstModule::new("a", true))
        .compile()
        .unwrap();

    let names = kernel.schedule().layout().module_names();
    assert_eq!(names, vec![vec!["a"], vec!["b"]]);
}

#[test]
fn test_diamond_dependency_layout() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("root", true))
        .add_module(RelayModule::new("root", "left"))
        .add_module(RelayModule::new("root", "right"))
        .add_module(
            ConstModule::new("joined", true).with_requires(&["left", "right"]),
        )
        .compile()
        .unwrap();

    let names = kernel.schedule().layout().module_names();
    assert_eq!(
        names,
        vec![vec!["root"], vec!["left", "right"], vec!["joined"]],
    );
}

#[test]
fn test_exprs_layer_by_their_node_reads() {
    let base = Expr::<Value>::filter(|r: &Value| r["ok"].as_bool().unwrap_or(false));
    let derived = Expr::<Value>::node("base").or(Expr::node("base"));

    let kernel = KernelBuilder::new()
        .add_expr("derived", derived)
        .add_expr("base", base)
        .compile()
        .unwrap();

    let names = kernel.schedule().layout().module_names();
    assert_eq!(names, vec![vec!["base"], vec!["derived"]]);
}

#[test]
fn test_duplicate_producer_is_rejected() {
    let err = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .add_module(ConstModule::new("a", false))
        .compile()
        .unwrap_err();

    match err {
        CompileError::DuplicateProducer { node, first, second } => {
            assert_eq!(node, NodeId::new("a"));
            assert_eq!(first, "a");
            assert_eq!(second, "a");
        }
        other => panic!("expected DuplicateProducer, got {other:?}"),
    }
}

#[test]
fn test_missing_producer_is_rejected() {
    let err = KernelBuilder::new()
        .add_expr("lonely", Expr::<Value>::node("z"))
        .compile()
        .unwrap_err();

    match &err {
        CompileError::Unsatisfiable { stuck } => {
            assert_eq!(stuck.len(), 1);
            assert_eq!(stuck[0].module, "lonely");
            assert_eq!(stuck[0].missing, vec![NodeId::new("z")]);
        }
        other => panic!("expected Unsatisfiable, got {other:?}"),
    }
    assert!(err.to_string().contains("unsatisfiable dependency set"));
}

#[test]
fn test_dependency_cycle_is_rejected() {
    let err = KernelBuilder::new()
        .add_expr("ping", Expr::<Value>::node("pong"))
        .add_expr("pong", Expr::<Value>::node("ping"))
        .compile()
        .unwrap_err();

    match err {
        CompileError::Unsatisfiable { stuck } => {
            let modules: Vec<_> = stuck.iter().map(|s| s.module.as_str()).collect();
            assert_eq!(modules, vec!["ping", "pong"]);
        }
        other => panic!("expected Unsatisfiable, got {other:?}"),
    }
}

#[test]
fn test_compile_errors_carry_diagnostic_codes() {
    let unsatisfiable = KernelBuilder::new()
        .add_expr("lonely", Expr::<Value>::node("z"))
        .compile()
        .unwrap_err();
    let duplicate = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .add_module(ConstModule::new("a", true))
        .compile()
        .unwrap_err();

    let code = |err: &CompileError| miette::Diagnostic::code(err).map(|c| c.to_string());
    assert_eq!(
        code(&unsatisfiable).as_deref(),
        Some("gatewave::graph::unsatisfiable"),
    );
    assert_eq!(
        code(&duplicate).as_deref(),
        Some("gatewave::graph::duplicate_producer"),
    );
}

#[test]
fn test_schedule_nodes_lists_every_output() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .add_module(RelayModule::new("a", "b"))
        .compile()
        .unwrap();

    let mut nodes: Vec<&str> = kernel.schedule().nodes().map(NodeId::as_str).collect();
    nodes.sort_unstable();
    assert_eq!(nodes, vec!["a", "b"]);
}

#[test]
fn test_layout_survives_serialization() {
    let kernel = KernelBuilder::new()
        .add_module(ConstModule::new("a", true))
        .add_module(RelayModule::new("a", "b"))
        .compile()
        .unwrap();

    let layout = kernel.schedule().layout();
    let json = serde_json::to_string(&layout).unwrap();
    let restored: gatewave::graph::ScheduleLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, layout);
}
