//! Tests for the graph builder API.

#![allow(missing_docs, reason = "test suite")]


use std::sync::Arc;

use test_utils::{noop, say, tiny_schema};
use weft_graph::{END, GraphBuilder, START, Target};
use weft_state::State;

#[test]
fn builder_methods_chain() {
    let mut builder = GraphBuilder::new(tiny_schema());
    builder
        .add_node("a", noop())
        .add_node("b", noop())
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);

    let graph = builder.compile().unwrap();
    assert_eq!(graph.node_count(), 2);
    assert!(graph.contains("a"));
    assert!(graph.contains("b"));
    assert!(!graph.contains("c"));
}

#[test]
fn sentinels_are_not_nodes() {
    let mut builder = GraphBuilder::new(tiny_schema());
    builder
        .add_node("only", noop())
        .add_edge(START, "only")
        .add_edge("only", END);
    let graph = builder.compile().unwrap();

    assert!(!graph.contains(START));
    assert!(!graph.contains(END));
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn end_target_via_str_and_enum_are_equivalent() {
    let mut via_str = GraphBuilder::new(tiny_schema());
    via_str
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", END);

    let mut via_enum = GraphBuilder::new(tiny_schema());
    via_enum
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", Target::End);

    assert!(via_str.compile().is_ok());
    assert!(via_enum.compile().is_ok());
}

#[test]
fn router_graph_compiles() {
    let mut builder = GraphBuilder::new(tiny_schema());
    builder
        .add_node("pick", noop())
        .add_node("left", say("left"))
        .add_node("right", say("right"))
        .add_edge(START, "pick")
        .add_router("pick", |_state: &State| Target::node("left"))
        .add_edge("left", END)
        .add_edge("right", END);

    assert!(builder.compile().is_ok());
}

#[test]
fn compiled_graph_is_shareable() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let mut builder = GraphBuilder::new(tiny_schema());
    builder
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", END);
    let graph = Arc::new(builder.compile().unwrap());

    assert_send_sync(&graph);
}

#[test]
fn debug_output_lists_nodes() {
    let mut builder = GraphBuilder::new(tiny_schema());
    builder
        .add_node("b", noop())
        .add_node("a", noop())
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = builder.compile().unwrap();

    let debug = format!("{graph:?}");
    assert!(debug.contains("\"a\""));
    assert!(debug.contains("\"b\""));
}
