//! Graph construction, compile-time validation, and the compiled graph.
//!
//! A workflow is declared on a [`GraphBuilder`]: named nodes, one outgoing
//! route per node, and an entry edge from [`START`]. Calling
//! [`GraphBuilder::compile`] validates the whole declaration and freezes it
//! into an immutable [`CompiledGraph`] that can be shared across concurrent
//! runs.

use core::fmt;
use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use weft_state::{PartialState, State, StateSchema};

use crate::edge::{END, Route, START, Target};
use crate::executor::{ExecutionError, Executor};
use crate::node::{Node, SharedNode};
use crate::router::Router;

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable workflow declaration.
///
/// Misconfigurations made while building (duplicate node names, conflicting
/// edges, reserved names) are recorded rather than panicking; they surface
/// together with structural problems when [`compile`](Self::compile) is
/// called.
///
/// # Example
///
/// ```
/// use weft_graph::{GraphBuilder, START, END, node_fn};
/// use weft_state::{FieldType, PartialState, StateSchema};
///
/// let schema = StateSchema::builder()
///     .field("input", FieldType::String)
///     .build()
///     .unwrap();
///
/// let mut builder = GraphBuilder::new(schema);
/// builder
///     .add_node("echo", node_fn(|_state| async move { Ok(PartialState::new()) }))
///     .add_edge(START, "echo")
///     .add_edge("echo", END);
/// let graph = builder.compile().unwrap();
/// assert_eq!(graph.node_count(), 1);
/// ```
pub struct GraphBuilder {
    schema: StateSchema,
    nodes: HashMap<String, SharedNode>,
    routes: HashMap<String, Route>,
    errors: Vec<CompileError>,
}

impl GraphBuilder {
    /// Creates a builder for a workflow over the given schema.
    #[must_use]
    pub fn new(schema: StateSchema) -> Self {
        Self {
            schema,
            nodes: HashMap::new(),
            routes: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Registers a named node.
    ///
    /// Names must be unique and must not be the [`START`] or [`END`]
    /// sentinels. Violations are recorded and reported by
    /// [`compile`](Self::compile).
    pub fn add_node(&mut self, name: impl Into<String>, node: impl Node + 'static) -> &mut Self {
        let name = name.into();
        if name == START || name == END {
            self.errors.push(CompileError::ReservedName { name });
            return self;
        }
        if self.nodes.contains_key(&name) {
            self.errors.push(CompileError::DuplicateNode { name });
            return self;
        }
        self.nodes.insert(name, std::sync::Arc::new(node));
        self
    }

    /// Adds an unconditional edge from `from` to `to`.
    ///
    /// `from` may be [`START`] to select the entry node; `to` may be [`END`]
    /// to finish the run. Each source has exactly one outgoing route, so a
    /// second edge or router from the same source is recorded as a conflict.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<Target>) -> &mut Self {
        self.add_route(from.into(), Route::To(to.into()))
    }

    /// Adds a router evaluated against the state after `from` runs.
    ///
    /// The same single-outgoing-route rule as [`add_edge`](Self::add_edge)
    /// applies.
    pub fn add_router(&mut self, from: impl Into<String>, router: impl Router + 'static) -> &mut Self {
        self.add_route(from.into(), Route::Router(Box::new(router)))
    }

    fn add_route(&mut self, from: String, route: Route) -> &mut Self {
        if from == END {
            self.errors.push(CompileError::EdgeFromEnd);
            return self;
        }
        match self.routes.entry(from) {
            hashbrown::hash_map::Entry::Occupied(entry) => {
                self.errors.push(CompileError::ConflictingEdge {
                    from: entry.key().clone(),
                });
            }
            hashbrown::hash_map::Entry::Vacant(entry) => {
                entry.insert(route);
            }
        }
        self
    }

    /// Validates the declaration and freezes it into a [`CompiledGraph`].
    ///
    /// All problems are collected and returned together rather than stopping
    /// at the first one:
    ///
    /// - errors recorded while building (duplicates, conflicts, reserved names)
    /// - routes whose source or fixed target names no registered node
    /// - no entry edge from [`START`]
    /// - nodes with no outgoing route
    /// - nodes unreachable from [`START`]
    /// - nodes from which no path leads to [`END`]
    ///
    /// Routers are opaque at compile time, so reachability treats a router as
    /// possibly reaching every node and [`END`].
    ///
    /// # Errors
    ///
    /// Returns the collected [`CompileError`]s if the declaration is invalid.
    pub fn compile(mut self) -> Result<CompiledGraph, Vec<CompileError>> {
        let mut errors = core::mem::take(&mut self.errors);

        let mut node_names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        node_names.sort_unstable();

        // Routes must connect registered nodes.
        let mut sources: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        sources.sort_unstable();
        for from in &sources {
            if *from != START && !self.nodes.contains_key(*from) {
                errors.push(CompileError::UnknownSource {
                    from: (*from).to_string(),
                });
            }
            if let Some(Route::To(Target::Node(to))) = self.routes.get(*from)
                && !self.nodes.contains_key(to)
            {
                errors.push(CompileError::UnknownTarget {
                    from: (*from).to_string(),
                    to: to.clone(),
                });
            }
        }

        if !self.routes.contains_key(START) {
            errors.push(CompileError::MissingEntry);
        }

        for name in &node_names {
            if !self.routes.contains_key(*name) {
                errors.push(CompileError::DeadEnd {
                    node: (*name).to_string(),
                });
            }
        }

        let reachable = self.reachable_from_start();
        for name in &node_names {
            if !reachable.contains(*name) {
                errors.push(CompileError::Unreachable {
                    node: (*name).to_string(),
                });
            }
        }

        let can_end = self.can_reach_end();
        for name in &node_names {
            if reachable.contains(*name) && !can_end.contains(*name) {
                errors.push(CompileError::NoPathToEnd {
                    node: (*name).to_string(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        drop(reachable);
        drop(can_end);

        Ok(CompiledGraph {
            schema: self.schema,
            nodes: self.nodes,
            routes: self.routes,
        })
    }

    /// Nodes reachable from the start sentinel.
    ///
    /// A router edge over-approximates to every registered node, since its
    /// destinations are not known until runtime.
    fn reachable_from_start(&self) -> HashSet<&str> {
        let mut reachable: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([START]);

        while let Some(from) = queue.pop_front() {
            match self.routes.get(from) {
                Some(Route::To(Target::Node(to))) => {
                    if let Some((name, _)) = self.nodes.get_key_value(to)
                        && reachable.insert(name.as_str())
                    {
                        queue.push_back(name.as_str());
                    }
                }
                Some(Route::Router(_)) => {
                    for name in self.nodes.keys() {
                        if reachable.insert(name.as_str()) {
                            queue.push_back(name.as_str());
                        }
                    }
                }
                _ => {}
            }
        }
        reachable
    }

    /// Nodes from which some path reaches the end sentinel.
    ///
    /// A router counts as possibly routing to [`END`] directly.
    fn can_reach_end(&self) -> HashSet<&str> {
        let mut can_end: HashSet<&str> = self
            .routes
            .iter()
            .filter(|(_, route)| matches!(route, Route::To(Target::End) | Route::Router(_)))
            .map(|(from, _)| from.as_str())
            .collect();

        loop {
            let mut changed = false;
            for (from, route) in &self.routes {
                if can_end.contains(from.as_str()) {
                    continue;
                }
                if let Route::To(Target::Node(to)) = route
                    && can_end.contains(to.as_str())
                {
                    can_end.insert(from.as_str());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        can_end
    }
}

impl fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("nodes", &self.nodes.len())
            .field("routes", &self.routes.len())
            .field("errors", &self.errors)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiled graph
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable, validated workflow ready for execution.
///
/// A compiled graph is `Send + Sync` and can be shared (for example behind
/// an `Arc`) across concurrent runs; each run gets its own fresh state.
pub struct CompiledGraph {
    schema: StateSchema,
    nodes: HashMap<String, SharedNode>,
    routes: HashMap<String, Route>,
}

impl CompiledGraph {
    /// Returns the schema states of this graph are created and merged with.
    #[must_use]
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// Returns true if a node with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, name: &str) -> Option<&SharedNode> {
        self.nodes.get(name)
    }

    pub(crate) fn route(&self, from: &str) -> Option<&Route> {
        self.routes.get(from)
    }

    /// Runs the graph with a default [`Executor`].
    ///
    /// Shorthand for `Executor::new().invoke(&graph, overrides)`.
    ///
    /// # Errors
    ///
    /// See [`Executor::invoke`].
    pub async fn invoke(&self, overrides: PartialState) -> Result<State, ExecutionError> {
        Executor::new().invoke(self, overrides).await
    }
}

impl fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CompiledGraph")
            .field("nodes", &names)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors detected while declaring or compiling a graph.
///
/// All variants are reported together by [`GraphBuilder::compile`], allowing
/// every structural problem to be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A node was registered under a sentinel name.
    ReservedName {
        /// The offending name.
        name: String,
    },
    /// Two nodes were registered under the same name.
    DuplicateNode {
        /// The duplicated name.
        name: String,
    },
    /// A source already has an outgoing edge or router.
    ConflictingEdge {
        /// The source with more than one outgoing route.
        from: String,
    },
    /// An edge or router was declared with the end sentinel as its source.
    EdgeFromEnd,
    /// A route's source names no registered node.
    UnknownSource {
        /// The unknown source name.
        from: String,
    },
    /// An edge's target names no registered node.
    UnknownTarget {
        /// The edge's source.
        from: String,
        /// The unknown target name.
        to: String,
    },
    /// No entry edge from the start sentinel was declared.
    MissingEntry,
    /// A node has no outgoing edge or router.
    DeadEnd {
        /// The node with no outgoing route.
        node: String,
    },
    /// A node cannot be reached from the start sentinel.
    Unreachable {
        /// The unreachable node.
        node: String,
    },
    /// No path from a node leads to the end sentinel.
    NoPathToEnd {
        /// The node with no path to the end.
        node: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::ReservedName { name } => {
                write!(f, "node name is reserved: {name}")
            }
            CompileError::DuplicateNode { name } => {
                write!(f, "duplicate node name: {name}")
            }
            CompileError::ConflictingEdge { from } => {
                write!(f, "node already has an outgoing route: {from}")
            }
            CompileError::EdgeFromEnd => {
                write!(f, "cannot add an edge from {END}")
            }
            CompileError::UnknownSource { from } => {
                write!(f, "edge source is not a registered node: {from}")
            }
            CompileError::UnknownTarget { from, to } => {
                write!(f, "edge from {from} targets unknown node: {to}")
            }
            CompileError::MissingEntry => {
                write!(f, "graph has no entry edge from {START}")
            }
            CompileError::DeadEnd { node } => {
                write!(f, "node has no outgoing route: {node}")
            }
            CompileError::Unreachable { node } => {
                write!(f, "node is unreachable from {START}: {node}")
            }
            CompileError::NoPathToEnd { node } => {
                write!(f, "no path from node to {END}: {node}")
            }
        }
    }
}

impl core::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::node_fn;
    use weft_state::FieldType;

    fn schema() -> StateSchema {
        StateSchema::builder()
            .field("input", FieldType::String)
            .build()
            .unwrap()
    }

    fn noop() -> impl Node {
        node_fn(|_state| async move { Ok(PartialState::new()) })
    }

    #[test]
    fn builder_records_duplicate_node() {
        let mut builder = GraphBuilder::new(schema());
        builder
            .add_node("a", noop())
            .add_node("a", noop())
            .add_edge(START, "a")
            .add_edge("a", END);

        let errors = builder.compile().unwrap_err();
        assert!(errors.contains(&CompileError::DuplicateNode {
            name: "a".to_string()
        }));
    }

    #[test]
    fn builder_records_reserved_names() {
        let mut builder = GraphBuilder::new(schema());
        builder.add_node(START, noop()).add_node(END, noop());

        let errors = builder.compile().unwrap_err();
        assert!(errors.contains(&CompileError::ReservedName {
            name: START.to_string()
        }));
        assert!(errors.contains(&CompileError::ReservedName {
            name: END.to_string()
        }));
    }

    #[test]
    fn compile_collects_multiple_errors() {
        let mut builder = GraphBuilder::new(schema());
        builder.add_node("a", noop());

        let errors = builder.compile().unwrap_err();
        assert!(errors.contains(&CompileError::MissingEntry));
        assert!(errors.contains(&CompileError::DeadEnd {
            node: "a".to_string()
        }));
        assert!(errors.contains(&CompileError::Unreachable {
            node: "a".to_string()
        }));
    }

    #[test]
    fn compile_error_display() {
        let err = CompileError::UnknownTarget {
            from: "a".to_string(),
            to: "ghost".to_string(),
        };
        assert_eq!(format!("{err}"), "edge from a targets unknown node: ghost");

        let err = CompileError::MissingEntry;
        assert_eq!(format!("{err}"), "graph has no entry edge from __start__");
    }

    #[test]
    fn router_counts_as_reaching_all_nodes() {
        let mut builder = GraphBuilder::new(schema());
        builder
            .add_node("pick", noop())
            .add_node("left", noop())
            .add_node("right", noop())
            .add_edge(START, "pick")
            .add_router("pick", |_state: &State| Target::node("left"))
            .add_edge("left", END)
            .add_edge("right", END);

        // "right" is only reachable through the router, which is opaque.
        assert!(builder.compile().is_ok());
    }
}
