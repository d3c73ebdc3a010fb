//! Integration tests for the full schema → graph → executor flow.
//!
//! These tests verify that both layers work together correctly:
//! - Layer 1: `weft_state` (schema, defaults, reducers, merging)
//! - Layer 2: `weft_graph` (builder, compiled graph, executor)
//!
//! Tests validate the core philosophy:
//! - Nodes are pure async functions from state to a partial update
//! - All state changes flow through the schema's merge
//! - The compiled graph is immutable and shared across runs
//! - Routing decisions read only the merged state

#![allow(missing_docs, reason = "test suite")]


use std::sync::Arc;

use serde_json::{Value, json};
use test_utils::{bump_attempts, pipeline_schema, say};
use weft_graph::{END, Executor, GraphBuilder, START, Target, node_fn};
use weft_state::{PartialState, State};

// ─────────────────────────────────────────────────────────────────────────────
// Linear pipelines
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_step_pipeline_produces_expected_state() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node(
            "summarize",
            node_fn(|state| async move {
                let input = state
                    .get("input")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(PartialState::new()
                    .with("summary", format!("summary of {input}"))
                    .with("messages", vec!["summarized".to_string()]))
            }),
        )
        .add_node(
            "analyze",
            node_fn(|state| async move {
                let summary = state
                    .get("summary")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(PartialState::new()
                    .with("summary", format!("{summary} (analyzed)"))
                    .with("messages", vec!["analyzed".to_string()]))
            }),
        )
        .add_edge(START, "summarize")
        .add_edge("summarize", "analyze")
        .add_edge("analyze", END);
    let graph = builder.compile().unwrap();

    let state = graph
        .invoke(PartialState::new().with("input", "the report"))
        .await
        .unwrap();

    assert_eq!(state.get("input"), Some(&json!("the report")));
    assert_eq!(
        state.get("summary"),
        Some(&json!("summary of the report (analyzed)"))
    );
    assert_eq!(
        state.get("messages"),
        Some(&json!(["summarized", "analyzed"]))
    );
    assert_eq!(state.get("attempts"), Some(&json!(0)));
}

#[tokio::test]
async fn summarize_then_analyze_with_overwrite_fields() {
    let schema = weft_state::StateSchema::builder()
        .field("input", weft_state::FieldType::String)
        .field("summary", weft_state::FieldType::String)
        .field("analysis", weft_state::FieldType::String)
        .build()
        .unwrap();

    let mut builder = GraphBuilder::new(schema);
    builder
        .add_node(
            "summarize",
            node_fn(|state| async move {
                let input = state
                    .get("input")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(PartialState::new().with("summary", format!("echo: {input}")))
            }),
        )
        .add_node(
            "analyze",
            node_fn(|_state| async move {
                Ok(PartialState::new().with("analysis", "neutral"))
            }),
        )
        .add_edge(START, "summarize")
        .add_edge("summarize", "analyze")
        .add_edge("analyze", END);
    let graph = builder.compile().unwrap();

    let state = graph
        .invoke(PartialState::new().with("input", "hello"))
        .await
        .unwrap();

    assert_eq!(state.get("input"), Some(&json!("hello")));
    assert_eq!(state.get("summary"), Some(&json!("echo: hello")));
    assert_eq!(state.get("analysis"), Some(&json!("neutral")));
    assert_eq!(state.len(), 3);
}

#[tokio::test]
async fn reducer_accumulates_across_nodes() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node("first", say("m1"))
        .add_node("second", say("m2"))
        .add_node("third", say("m3"))
        .add_edge(START, "first")
        .add_edge("first", "second")
        .add_edge("second", "third")
        .add_edge("third", END);
    let graph = builder.compile().unwrap();

    let state = graph.invoke(PartialState::new()).await.unwrap();
    assert_eq!(state.get("messages"), Some(&json!(["m1", "m2", "m3"])));
}

#[tokio::test]
async fn overwrite_field_keeps_last_writer() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node("first", test_utils::set("summary", "draft"))
        .add_node("second", test_utils::set("summary", "final"))
        .add_edge(START, "first")
        .add_edge("first", "second")
        .add_edge("second", END);
    let graph = builder.compile().unwrap();

    let state = graph.invoke(PartialState::new()).await.unwrap();
    assert_eq!(state.get("summary"), Some(&json!("final")));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conditional routing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn router_picks_branch_from_merged_state() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node("classify", test_utils::set("summary", "long"))
        .add_node("shorten", say("shortened"))
        .add_node("keep", say("kept"))
        .add_edge(START, "classify")
        .add_router("classify", |state: &State| {
            if state.get("summary").and_then(Value::as_str) == Some("long") {
                Target::node("shorten")
            } else {
                Target::node("keep")
            }
        })
        .add_edge("shorten", END)
        .add_edge("keep", END);
    let graph = builder.compile().unwrap();

    let state = graph.invoke(PartialState::new()).await.unwrap();
    assert_eq!(state.get("messages"), Some(&json!(["shortened"])));
}

#[tokio::test]
async fn router_can_finish_the_run_directly() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node("check", say("checked"))
        .add_node("never", say("never"))
        .add_edge(START, "check")
        .add_router("check", |_state: &State| Target::End)
        .add_edge("never", END);
    let graph = builder.compile().unwrap();

    let state = graph.invoke(PartialState::new()).await.unwrap();
    assert_eq!(state.get("messages"), Some(&json!(["checked"])));
}

// ─────────────────────────────────────────────────────────────────────────────
// Cycles
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn counter_bounded_cycle_terminates() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node("retry", bump_attempts())
        .add_edge(START, "retry")
        .add_router("retry", |state: &State| {
            let attempts = state
                .get("attempts")
                .and_then(Value::as_i64)
                .unwrap_or_default();
            if attempts < 3 {
                Target::node("retry")
            } else {
                Target::End
            }
        });
    let graph = builder.compile().unwrap();

    let state = graph.invoke(PartialState::new()).await.unwrap();
    assert_eq!(state.get("attempts"), Some(&json!(3)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared graph, concurrent runs
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_runs_are_isolated() {
    let mut builder = GraphBuilder::new(pipeline_schema());
    builder
        .add_node(
            "echo",
            node_fn(|state| async move {
                let input = state
                    .get("input")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(PartialState::new().with("summary", format!("echo: {input}")))
            }),
        )
        .add_edge(START, "echo")
        .add_edge("echo", END);
    let graph = Arc::new(builder.compile().unwrap());

    let mut handles = Vec::new();
    for i in 0..8 {
        let graph = Arc::clone(&graph);
        handles.push(tokio::spawn(async move {
            let executor = Executor::new();
            let state = executor
                .invoke(&graph, PartialState::new().with("input", format!("run {i}")))
                .await
                .unwrap();
            (i, state)
        }));
    }

    for handle in handles {
        let (i, state) = handle.await.unwrap();
        assert_eq!(state.get("summary"), Some(&json!(format!("echo: run {i}"))));
    }
}
