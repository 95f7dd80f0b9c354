//! Tree nodes and the arena that owns them.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`], so a
//! split can re-parent a whole subtree by rewriting a few indices. Nodes are
//! never removed; the arena only grows while routes are registered.

use std::fmt;

use crate::routing::pattern::{PARAM_MARKER, WILDCARD_MARKER};

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// What an edge consumes from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text; may be split at any char boundary.
    Static,
    /// One non-empty segment, up to the next `/`.
    Param,
    /// Everything that is left. Always a leaf.
    Wildcard,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Static => write!(f, "static"),
            NodeKind::Param => write!(f, "param"),
            NodeKind::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// A single edge of the radix tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    pub(crate) kind: NodeKind,
    /// Text consumed by this edge. `:` for params, `*` for wildcards.
    pub(crate) prefix: String,
    /// First char of `prefix`. Static siblings never share a label.
    pub(crate) label: char,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Shortcuts into `children`, kept in step by [`Arena`].
    pub(crate) param_child: Option<NodeId>,
    pub(crate) wildcard_child: Option<NodeId>,
    /// Pattern text from the root up to and including this edge.
    pub(crate) full_path: String,
    /// Parameter names bound from the root down to this node, in order.
    pub(crate) param_names: Vec<String>,
    /// Empty unless this node terminates a registered pattern.
    pub(crate) handlers: Vec<H>,
}

impl<H> Node<H> {
    fn new(kind: NodeKind, prefix: String, parent: Option<NodeId>, full_path: String, param_names: Vec<String>) -> Self {
        let label = prefix.chars().next().unwrap_or('/');
        Self {
            kind,
            prefix,
            label,
            parent,
            children: Vec::new(),
            param_child: None,
            wildcard_child: None,
            full_path,
            param_names,
            handlers: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn label(&self) -> char {
        self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    /// True when a param or wildcard edge hangs off this node.
    pub fn has_dynamic_child(&self) -> bool {
        self.param_child.is_some() || self.wildcard_child.is_some()
    }

    /// True when a registered pattern ends here.
    pub fn is_terminus(&self) -> bool {
        !self.handlers.is_empty()
    }

    /// Name bound by this edge, for param and wildcard nodes.
    pub(crate) fn bound_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Static => None,
            NodeKind::Param | NodeKind::Wildcard => self.param_names.last().map(String::as_str),
        }
    }
}

/// Growable node storage for one tree.
#[derive(Debug, Clone)]
pub(crate) struct Arena<H> {
    nodes: Vec<Node<H>>,
}

impl<H> Arena<H> {
    /// An arena holding only the `/` root.
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Static, "/".to_string(), None, "/".to_string(), Vec::new())],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id.0]
    }

    /// Static child of `id` whose edge starts with `label`.
    pub(crate) fn static_child(&self, id: NodeId, label: char) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&c| {
                let child = self.get(c);
                child.kind == NodeKind::Static && child.label == label
            })
    }

    /// The param or wildcard child of `id`. There is at most one of each.
    pub(crate) fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let node = self.get(id);
        match kind {
            NodeKind::Static => None,
            NodeKind::Param => node.param_child,
            NodeKind::Wildcard => node.wildcard_child,
        }
    }

    /// Append a static child carrying `text`.
    pub(crate) fn push_static(&mut self, parent: NodeId, text: &str) -> NodeId {
        let up = self.get(parent);
        let full_path = format!("{}{}", up.full_path, text);
        let names = up.param_names.clone();
        self.attach(parent, Node::new(NodeKind::Static, text.to_string(), Some(parent), full_path, names))
    }

    /// Append a param (`:name`) or wildcard (`*name`) child.
    pub(crate) fn push_dynamic(&mut self, parent: NodeId, kind: NodeKind, name: &str) -> NodeId {
        let marker = char::from(match kind {
            NodeKind::Param => PARAM_MARKER,
            _ => WILDCARD_MARKER,
        });
        let up = self.get(parent);
        let full_path = format!("{}{}{}", up.full_path, marker, name);
        let mut names = up.param_names.clone();
        names.push(name.to_string());
        self.attach(parent, Node::new(kind, marker.to_string(), Some(parent), full_path, names))
    }

    fn attach(&mut self, parent: NodeId, node: Node<H>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = node.kind;
        self.nodes.push(node);
        let up = self.get_mut(parent);
        up.children.push(id);
        match kind {
            NodeKind::Static => {}
            NodeKind::Param => up.param_child = Some(id),
            NodeKind::Wildcard => up.wildcard_child = Some(id),
        }
        id
    }

    /// Split static node `id` so that it keeps `prefix[..at]` and a new child
    /// takes `prefix[at..]` together with the original handlers and children.
    ///
    /// The moved-down node keeps the original full path and parameter names,
    /// and the upper node's full path is truncated by the suffix length so
    /// repeated splits stay correct. Splitting at `0` or at the end of the
    /// prefix is a no-op.
    pub(crate) fn split(&mut self, id: NodeId, at: usize) {
        let lower_id = NodeId(self.nodes.len());
        let node = self.get_mut(id);
        if at == 0 || at >= node.prefix.len() {
            return;
        }
        debug_assert_eq!(node.kind, NodeKind::Static);

        let suffix = node.prefix.split_off(at);
        let children = std::mem::take(&mut node.children);
        let handlers = std::mem::take(&mut node.handlers);
        let param_child = node.param_child.take();
        let wildcard_child = node.wildcard_child.take();
        let full_path = node.full_path.clone();
        node.full_path.truncate(full_path.len() - suffix.len());
        let names = node.param_names.clone();
        node.children.push(lower_id);

        let mut lower = Node::new(NodeKind::Static, suffix, Some(id), full_path, names);
        lower.handlers = handlers;
        lower.param_child = param_child;
        lower.wildcard_child = wildcard_child;
        for &child in &children {
            self.get_mut(child).parent = Some(lower_id);
        }
        lower.children = children;
        self.nodes.push(lower);
    }
}
