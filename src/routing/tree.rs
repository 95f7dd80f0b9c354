//! Radix tree for one HTTP method.
//!
//! # Insertion
//! A pattern is parsed into static runs and dynamic segments, checked for
//! conflicts by a read-only walk, and only then written into the arena. A
//! failed `add_route` therefore leaves the tree exactly as it was.
//!
//! # Lookup
//! Depth-first with priority static > param > wildcard at every node. Each
//! time a lower-priority alternative exists at a node, a branch point is
//! pushed; a dead end pops the most recent one and resumes with the next
//! kind. A lookup never mutates the tree, so a built `Tree` can be shared
//! across threads without locking.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::node::{Arena, Node, NodeId, NodeKind};
use crate::routing::params::Params;
use crate::routing::pattern::{self, common_prefix_len, Segment};

/// Outcome of a successful [`Tree::add_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new pattern was registered.
    Added,
    /// The pattern already existed; its handler chain was replaced.
    Replaced,
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t, 'p, H> {
    /// Handler chain of the matched pattern.
    pub handlers: &'t [H],
    /// Bound parameters in pattern order.
    pub params: Params<'t, 'p>,
    /// The registered pattern that matched, e.g. `/users/:id`.
    pub pattern: &'t str,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Arrive,
    Static,
    Param,
    Wildcard,
    Backtrack,
}

#[derive(Debug, Clone, Copy)]
struct Branch {
    node: NodeId,
    pos: usize,
    values: usize,
    resume: Step,
}

/// Route tree for a single HTTP method.
#[derive(Debug, Clone)]
pub struct Tree<H> {
    arena: Arena<H>,
    routes: usize,
}

impl<H> Default for Tree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Tree<H> {
    /// An empty tree whose root consumes `/`.
    pub fn new() -> Self {
        Self {
            arena: Arena::with_root(),
            routes: 0,
        }
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node<H> {
        self.arena.get(id)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Register `handlers` under `pattern`.
    ///
    /// Re-registering an existing pattern replaces its chain.
    pub fn add_route(&mut self, pattern: &str, handlers: Vec<H>) -> RouteResult<Insertion> {
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlers {
                pattern: pattern.to_string(),
            });
        }
        let segments = pattern::parse(pattern).map_err(|e| RouteError::malformed(pattern, e))?;
        self.check_conflicts(pattern, &segments)?;

        let mut cn = NodeId::ROOT;
        for (i, segment) in segments.iter().enumerate() {
            cn = match *segment {
                Segment::Static(text) => self.insert_static(cn, leading(i, text)),
                Segment::Param(name) => self.dynamic_child(cn, NodeKind::Param, name),
                Segment::Wildcard(name) => self.dynamic_child(cn, NodeKind::Wildcard, name),
            };
        }

        let node = self.arena.get_mut(cn);
        let outcome = if node.handlers.is_empty() {
            self.routes += 1;
            Insertion::Added
        } else {
            warn!(pattern, "Route registered twice, replacing handler chain");
            Insertion::Replaced
        };
        node.handlers = handlers;
        Ok(outcome)
    }

    /// Walk the tree along `segments` without mutating it and reject a
    /// parameter or wildcard whose name differs from the one already
    /// registered at the same position.
    fn check_conflicts(&self, pattern: &str, segments: &[Segment<'_>]) -> RouteResult<()> {
        let mut cn = NodeId::ROOT;
        for (i, segment) in segments.iter().enumerate() {
            match *segment {
                Segment::Static(text) => {
                    let mut rest = leading(i, text);
                    while let Some(label) = rest.chars().next() {
                        let Some(child) = self.arena.static_child(cn, label) else {
                            return Ok(());
                        };
                        let prefix = self.arena.get(child).prefix();
                        let l = common_prefix_len(prefix, rest);
                        if l < prefix.len() {
                            // The edge gets split; everything below is new.
                            return Ok(());
                        }
                        cn = child;
                        rest = &rest[l..];
                    }
                }
                Segment::Param(name) | Segment::Wildcard(name) => {
                    let kind = match segment {
                        Segment::Param(_) => NodeKind::Param,
                        _ => NodeKind::Wildcard,
                    };
                    let Some(child) = self.arena.child_of_kind(cn, kind) else {
                        return Ok(());
                    };
                    let node = self.arena.get(child);
                    let existing = node.bound_name().unwrap_or_default();
                    if existing != name {
                        return Err(RouteError::ConflictingParameter {
                            pattern: pattern.to_string(),
                            position: node.full_path().to_string(),
                            existing: existing.to_string(),
                            new: name.to_string(),
                        });
                    }
                    cn = child;
                }
            }
        }
        Ok(())
    }

    /// Consume `text` below `cn`, descending into label-matching children and
    /// splitting an edge where the text diverges from it. Returns the node
    /// whose full path ends exactly at the end of `text`.
    fn insert_static(&mut self, mut cn: NodeId, text: &str) -> NodeId {
        let mut rest = text;
        while let Some(label) = rest.chars().next() {
            let Some(child) = self.arena.static_child(cn, label) else {
                let id = self.arena.push_static(cn, rest);
                debug!(prefix = rest, full_path = self.arena.get(id).full_path(), "Appended static edge");
                return id;
            };
            let node = self.arena.get(child);
            let l = common_prefix_len(node.prefix(), rest);
            if l < node.prefix().len() {
                debug!(prefix = node.prefix(), at = l, "Splitting edge");
                self.arena.split(child, l);
            }
            cn = child;
            rest = &rest[l..];
        }
        cn
    }

    fn dynamic_child(&mut self, cn: NodeId, kind: NodeKind, name: &str) -> NodeId {
        match self.arena.child_of_kind(cn, kind) {
            Some(child) => child,
            None => self.arena.push_dynamic(cn, kind, name),
        }
    }

    /// Resolve `path` to the best registered pattern.
    pub fn find<'t, 'p>(&'t self, path: &'p str) -> Option<Match<'t, 'p, H>> {
        let root = self.arena.get(NodeId::ROOT);
        if !path.starts_with(root.prefix()) {
            return None;
        }

        let mut node = NodeId::ROOT;
        let mut pos = root.prefix().len();
        let mut values: Vec<(usize, usize)> = Vec::new();
        let mut branches: Vec<Branch> = Vec::new();
        let mut step = Step::Arrive;

        loop {
            match step {
                Step::Arrive => {
                    step = if pos < path.len() {
                        Step::Static
                    } else if self.arena.get(node).is_terminus() {
                        return Some(self.matched(node, path, &values));
                    } else {
                        Step::Backtrack
                    };
                }
                Step::Static => {
                    step = Step::Param;
                    let rest = &path[pos..];
                    let child = rest
                        .chars()
                        .next()
                        .and_then(|label| self.arena.static_child(node, label));
                    if let Some(child) = child {
                        let prefix = self.arena.get(child).prefix();
                        if rest.starts_with(prefix) {
                            if self.arena.get(node).has_dynamic_child() {
                                branches.push(Branch { node, pos, values: values.len(), resume: Step::Param });
                            }
                            node = child;
                            pos += prefix.len();
                            step = Step::Arrive;
                        }
                    }
                }
                Step::Param => {
                    step = Step::Wildcard;
                    if let Some(child) = self.arena.child_of_kind(node, NodeKind::Param) {
                        let end = path[pos..].find('/').map_or(path.len(), |i| pos + i);
                        if end > pos {
                            if self.arena.child_of_kind(node, NodeKind::Wildcard).is_some() {
                                branches.push(Branch { node, pos, values: values.len(), resume: Step::Wildcard });
                            }
                            values.push((pos, end));
                            node = child;
                            pos = end;
                            step = Step::Arrive;
                        }
                    }
                }
                Step::Wildcard => {
                    step = Step::Backtrack;
                    if let Some(child) = self.arena.child_of_kind(node, NodeKind::Wildcard) {
                        if self.arena.get(child).is_terminus() {
                            values.push((pos, path.len()));
                            return Some(self.matched(child, path, &values));
                        }
                    }
                }
                Step::Backtrack => {
                    let branch = branches.pop()?;
                    node = branch.node;
                    pos = branch.pos;
                    values.truncate(branch.values);
                    step = branch.resume;
                }
            }
        }
    }

    fn matched<'t, 'p>(&'t self, id: NodeId, path: &'p str, values: &[(usize, usize)]) -> Match<'t, 'p, H> {
        let node = self.arena.get(id);
        debug_assert_eq!(node.param_names().len(), values.len());
        let mut params = Params::with_capacity(values.len());
        for (name, &(start, end)) in node.param_names().iter().zip(values) {
            params.push(name.as_str(), &path[start..end]);
        }
        Match {
            handlers: node.handlers(),
            params,
            pattern: node.full_path(),
        }
    }

    /// Every registered pattern, depth first in insertion order.
    pub fn routes(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.routes);
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.arena.get(id);
            if node.is_terminus() {
                out.push(node.full_path());
            }
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// Level-order description of every node, one line each.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut level = vec![NodeId::ROOT];
        let mut depth = 1;
        while !level.is_empty() {
            let _ = writeln!(out, "level {depth}");
            let mut next = Vec::new();
            for id in level {
                let node = self.arena.get(id);
                let _ = writeln!(
                    out,
                    "  {:<8} {:<16} full_path={} params={:?} handlers={}",
                    node.kind().to_string(),
                    format!("{:?}", node.prefix()),
                    node.full_path(),
                    node.param_names(),
                    node.handlers().len(),
                );
                next.extend_from_slice(node.children());
            }
            level = next;
            depth += 1;
        }
        out
    }
}

/// The root edge already consumes the pattern's leading `/`.
fn leading(index: usize, text: &str) -> &str {
    if index == 0 {
        text.strip_prefix('/').unwrap_or(text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::PatternError;

    fn tree(patterns: &[&'static str]) -> Tree<&'static str> {
        let mut tree = Tree::new();
        for p in patterns {
            tree.add_route(p, vec![*p]).unwrap();
        }
        tree
    }

    fn lookup<'t, 'p>(tree: &'t Tree<&'static str>, path: &'p str) -> Option<(&'static str, Vec<(&'t str, &'p str)>)> {
        tree.find(path).map(|m| (m.handlers[0], m.params.iter().collect()))
    }

    #[test]
    fn test_static_routes() {
        let t = tree(&["/", "/user/profile", "/user/settings", "/users"]);
        assert_eq!(lookup(&t, "/"), Some(("/", vec![])));
        assert_eq!(lookup(&t, "/user/profile"), Some(("/user/profile", vec![])));
        assert_eq!(lookup(&t, "/user/settings"), Some(("/user/settings", vec![])));
        assert_eq!(lookup(&t, "/users"), Some(("/users", vec![])));
        assert_eq!(lookup(&t, "/user"), None);
        assert_eq!(lookup(&t, "/user/"), None);
        assert_eq!(lookup(&t, "/user/profiles"), None);
        assert_eq!(lookup(&t, ""), None);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_split_shares_common_node() {
        let t = tree(&["/user/profile", "/user/settings"]);
        let root = t.node(t.root());
        assert_eq!(root.children().len(), 1);

        let shared = t.node(root.children()[0]);
        assert_eq!(shared.prefix(), "user/");
        assert_eq!(shared.full_path(), "/user/");
        assert!(!shared.is_terminus());

        let mut labels: Vec<_> = shared
            .children()
            .iter()
            .map(|&c| t.node(c).prefix().to_string())
            .collect();
        labels.sort();
        assert_eq!(labels, vec!["profile", "settings"]);
    }

    #[test]
    fn test_static_precedence_over_param() {
        let t = tree(&["/users/:id", "/users/new"]);
        assert_eq!(lookup(&t, "/users/new"), Some(("/users/new", vec![])));
        assert_eq!(lookup(&t, "/users/42"), Some(("/users/:id", vec![("id", "42")])));
        assert_eq!(lookup(&t, "/users/newbie"), Some(("/users/:id", vec![("id", "newbie")])));
        assert_eq!(lookup(&t, "/users/ne"), Some(("/users/:id", vec![("id", "ne")])));
    }

    #[test]
    fn test_param_precedence_over_wildcard() {
        let t = tree(&["/files/*path", "/files/:name", "/files/latest"]);
        assert_eq!(lookup(&t, "/files/latest"), Some(("/files/latest", vec![])));
        assert_eq!(lookup(&t, "/files/a.txt"), Some(("/files/:name", vec![("name", "a.txt")])));
        assert_eq!(
            lookup(&t, "/files/a/b/c"),
            Some(("/files/*path", vec![("path", "a/b/c")]))
        );
        assert_eq!(
            lookup(&t, "/files/latest/x"),
            Some(("/files/*path", vec![("path", "latest/x")]))
        );
    }

    #[test]
    fn test_wildcard_takes_rest_of_path() {
        let t = tree(&["/files/*path"]);
        let m = t.find("/files/a/b/c").unwrap();
        assert_eq!(m.pattern, "/files/*path");
        assert_eq!(m.params.get("path"), Some("a/b/c"));
        assert!(t.find("/files/").is_none());
        assert!(t.find("/files").is_none());
    }

    #[test]
    fn test_no_partial_match() {
        let t = tree(&["/a/:id"]);
        assert!(t.find("/a").is_none());
        assert!(t.find("/a/").is_none());
        assert_eq!(lookup(&t, "/a/1"), Some(("/a/:id", vec![("id", "1")])));
        assert!(t.find("/a/1/").is_none());
    }

    #[test]
    fn test_param_values_exclude_slash() {
        let t = tree(&["/users/:id/posts/:post"]);
        assert_eq!(
            lookup(&t, "/users/7/posts/hello"),
            Some(("/users/:id/posts/:post", vec![("id", "7"), ("post", "hello")]))
        );
        assert!(t.find("/users/7/8/posts/hello").is_none());
    }

    #[test]
    fn test_shared_param_position() {
        let t = tree(&["/users/:id", "/users/:id/posts", "/users/:id/posts/:post"]);
        assert_eq!(lookup(&t, "/users/1"), Some(("/users/:id", vec![("id", "1")])));
        assert_eq!(lookup(&t, "/users/1/posts"), Some(("/users/:id/posts", vec![("id", "1")])));
        assert_eq!(
            lookup(&t, "/users/1/posts/2"),
            Some(("/users/:id/posts/:post", vec![("id", "1"), ("post", "2")]))
        );
    }

    #[test]
    fn test_backtracks_through_nested_branches() {
        let t = tree(&["/a/b/c/d", "/a/b/:y/e", "/a/:x/c/f"]);
        assert_eq!(lookup(&t, "/a/b/c/d"), Some(("/a/b/c/d", vec![])));
        assert_eq!(lookup(&t, "/a/b/c/e"), Some(("/a/b/:y/e", vec![("y", "c")])));
        assert_eq!(lookup(&t, "/a/b/c/f"), Some(("/a/:x/c/f", vec![("x", "b")])));
        assert!(t.find("/a/b/c/g").is_none());
    }

    #[test]
    fn test_backtrack_discards_stale_values() {
        let t = tree(&["/:a/x/:b/end", "/:a/:c/y"]);
        assert_eq!(
            lookup(&t, "/1/x/2/end"),
            Some(("/:a/x/:b/end", vec![("a", "1"), ("b", "2")]))
        );
        assert_eq!(lookup(&t, "/1/x/y"), Some(("/:a/:c/y", vec![("a", "1"), ("c", "x")])));
    }

    #[test]
    fn test_param_pattern_with_trailing_slash() {
        let t = tree(&["/a/:id/"]);
        assert!(t.find("/a/1").is_none());
        assert_eq!(lookup(&t, "/a/1/"), Some(("/a/:id/", vec![("id", "1")])));
    }

    #[test]
    fn test_root_level_param_and_wildcard() {
        let t = tree(&["/:name", "/*rest"]);
        assert_eq!(lookup(&t, "/bob"), Some(("/:name", vec![("name", "bob")])));
        assert_eq!(lookup(&t, "/bob/x"), Some(("/*rest", vec![("rest", "bob/x")])));
        assert!(t.find("/").is_none());
    }

    #[test]
    fn test_reregistration_replaces_chain() {
        let mut t = Tree::new();
        assert_eq!(t.add_route("/a/:id", vec!["first"]), Ok(Insertion::Added));
        assert_eq!(t.add_route("/a/:id", vec!["second", "third"]), Ok(Insertion::Replaced));
        let m = t.find("/a/1").unwrap();
        assert_eq!(m.handlers, &["second", "third"]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_intermediate_node_becomes_terminus() {
        let mut t = tree(&["/user/profile", "/user/settings"]);
        assert!(t.find("/user/").is_none());
        assert_eq!(t.add_route("/user/", vec!["/user/"]), Ok(Insertion::Added));
        assert_eq!(lookup(&t, "/user/"), Some(("/user/", vec![])));
        assert_eq!(lookup(&t, "/user/profile"), Some(("/user/profile", vec![])));
    }

    #[test]
    fn test_prefix_of_existing_edge() {
        let t = tree(&["/contact", "/con", "/co"]);
        assert_eq!(lookup(&t, "/contact"), Some(("/contact", vec![])));
        assert_eq!(lookup(&t, "/con"), Some(("/con", vec![])));
        assert_eq!(lookup(&t, "/co"), Some(("/co", vec![])));
        assert!(t.find("/c").is_none());
        assert!(t.find("/cont").is_none());
    }

    #[test]
    fn test_malformed_patterns_rejected() {
        let mut t: Tree<u8> = Tree::new();
        let err = t.add_route("/files/*path/extra", vec![1]).unwrap_err();
        assert_eq!(
            err,
            RouteError::MalformedPattern {
                pattern: "/files/*path/extra".into(),
                source: PatternError::WildcardNotLast("path".into()),
            }
        );
        assert!(matches!(t.add_route("", vec![1]), Err(RouteError::MalformedPattern { .. })));
        assert!(matches!(t.add_route("x", vec![1]), Err(RouteError::MalformedPattern { .. })));
        assert!(matches!(t.add_route("/a/:", vec![1]), Err(RouteError::MalformedPattern { .. })));
        assert!(matches!(t.add_route("/a", vec![]), Err(RouteError::EmptyHandlers { .. })));
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
    }

    #[test]
    fn test_conflicting_param_names_rejected() {
        let mut t = tree(&["/user/:id/profile"]);
        let before = t.node_count();
        let err = t.add_route("/user/:name", vec!["/user/:name"]).unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingParameter {
                pattern: "/user/:name".into(),
                position: "/user/:id".into(),
                existing: "id".into(),
                new: "name".into(),
            }
        );
        assert_eq!(t.node_count(), before);
        assert!(t.find("/user/1").is_none());

        let mut t = tree(&["/files/*path"]);
        assert!(matches!(
            t.add_route("/files/*rest", vec!["x"]),
            Err(RouteError::ConflictingParameter { .. })
        ));
    }

    #[test]
    fn test_failed_insert_leaves_tree_untouched() {
        let mut t = tree(&["/shop/:item/buy"]);
        let before = t.dump();
        assert!(t.add_route("/shop/:sku/sell", vec!["x"]).is_err());
        assert_eq!(t.dump(), before);
        assert_eq!(lookup(&t, "/shop/7/buy"), Some(("/shop/:item/buy", vec![("item", "7")])));
    }

    #[test]
    fn test_static_siblings_are_label_disjoint() {
        let t = tree(&["/search", "/support", "/status", "/s/:id", "/shop"]);
        let mut stack = vec![t.root()];
        while let Some(id) = stack.pop() {
            let node = t.node(id);
            let mut labels: Vec<char> = node
                .children()
                .iter()
                .map(|&c| t.node(c))
                .filter(|n| n.kind() == NodeKind::Static)
                .map(|n| n.label())
                .collect();
            let total = labels.len();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), total, "duplicate label under {}", node.full_path());
            stack.extend(node.children());
        }
        for p in ["/search", "/support", "/status", "/shop"] {
            assert_eq!(lookup(&t, p), Some((p, vec![])));
        }
    }

    #[test]
    fn test_no_dangling_nodes() {
        let t = tree(&["/a/b/c", "/a/b/d", "/a/:x", "/ab", "/files/*p"]);
        let mut stack = vec![t.root()];
        while let Some(id) = stack.pop() {
            let node = t.node(id);
            if id != t.root() {
                assert!(!node.prefix().is_empty());
                assert!(node.is_terminus() || !node.children().is_empty());
            }
            if node.kind() == NodeKind::Wildcard {
                assert!(node.children().is_empty());
            }
            stack.extend(node.children());
        }
    }

    #[test]
    fn test_routes_lists_every_pattern() {
        let t = tree(&["/a/b", "/a/:id", "/c", "/files/*p"]);
        let mut routes = t.routes();
        routes.sort();
        assert_eq!(routes, vec!["/a/:id", "/a/b", "/c", "/files/*p"]);
    }

    #[test]
    fn test_dump_lists_levels() {
        let t = tree(&["/user/:id"]);
        let dump = t.dump();
        assert!(dump.contains("level 1"));
        assert!(dump.contains("full_path=/user/:id"));
        assert!(dump.contains("params=[\"id\"]"));
    }

    #[test]
    fn test_unicode_prefixes_split_on_char_boundaries() {
        let t = tree(&["/caf\u{e9}", "/caf\u{e8}"]);
        assert_eq!(lookup(&t, "/caf\u{e9}"), Some(("/caf\u{e9}", vec![])));
        assert_eq!(lookup(&t, "/caf\u{e8}"), Some(("/caf\u{e8}", vec![])));
        assert!(t.find("/caf").is_none());
    }

    #[test]
    fn test_tree_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tree<std::sync::Arc<dyn Fn() + Send + Sync>>>();
    }
}
