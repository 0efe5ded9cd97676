//! Tag tree: the navigable hierarchy derived from a board's tag paths
//!
//! The tree is a pure projection over a set of [`TagPath`]s. It holds no
//! identity and is rebuilt from scratch whenever the underlying set changes;
//! there is nothing to persist or invalidate.
//!
//! Every supplied path gets a node, and so does every strict prefix of a
//! supplied path (implicit intermediate nodes). `is_leaf` records "this
//! exact path was supplied", independent of where the node sits in the
//! tree: a path that is both supplied and extended by a deeper path is a
//! leaf with children.

use crate::tag_path::TagPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// A node in the derived tag hierarchy
///
/// Children are keyed by segment name in a `BTreeMap`, so sibling traversal
/// order is alphabetical (case-sensitive ordinal) and stable across rebuilds
/// by construction — no separate sort pass.
#[derive(Debug, Clone, Serialize)]
pub struct TagNode {
    name: String,
    full_path: String,
    children: BTreeMap<String, TagNode>,
    is_leaf: bool,
    link_count: Option<usize>,
}

impl TagNode {
    fn root() -> Self {
        TagNode {
            name: String::new(),
            full_path: String::new(),
            children: BTreeMap::new(),
            is_leaf: false,
            link_count: None,
        }
    }

    /// Last segment of the node's path; empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Complete path from the root; empty for the root
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// True iff this exact path was present in the source set
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Number of link memberships at exactly this path, when annotated
    ///
    /// Does not include descendants' counts. `None` on implicit nodes and
    /// on trees built without counts.
    pub fn link_count(&self) -> Option<usize> {
        self.link_count
    }

    /// Child nodes in traversal order
    pub fn children(&self) -> impl Iterator<Item = &TagNode> {
        self.children.values()
    }

    /// Look up a direct child by segment name
    pub fn child(&self, name: &str) -> Option<&TagNode> {
        self.children.get(name)
    }

    /// True iff the node has at least one child
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A single entry of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Segment name at this depth
    pub name: String,
    /// Full prefix path up to and including this segment
    pub path: TagPath,
}

/// The tag hierarchy for one board
#[derive(Debug, Clone, Serialize)]
pub struct TagTree {
    root: TagNode,
}

impl TagTree {
    /// Build the tree from a set of tag paths
    ///
    /// Duplicate input paths are harmless; the result depends only on the
    /// set of distinct paths.
    pub fn build(paths: &[TagPath]) -> TagTree {
        let mut root = TagNode::root();

        for path in paths {
            let mut current = &mut root;
            let mut full = String::new();
            let depth = path.depth();

            for (i, segment) in path.segments().iter().enumerate() {
                if !full.is_empty() {
                    full.push('/');
                }
                full.push_str(segment);

                current = current
                    .children
                    .entry(segment.clone())
                    .or_insert_with(|| TagNode {
                        name: segment.clone(),
                        full_path: full.clone(),
                        children: BTreeMap::new(),
                        is_leaf: false,
                        link_count: None,
                    });

                if i + 1 == depth {
                    // Marked regardless of whether the node pre-existed as
                    // an implicit ancestor, so input order cannot matter.
                    current.is_leaf = true;
                }
            }
        }

        TagTree { root }
    }

    /// Build the tree and annotate nodes with exact-path membership counts
    ///
    /// A node's count is the number of memberships whose tag path equals the
    /// node's full path; nodes absent from `counts` stay unannotated.
    pub fn build_with_counts(paths: &[TagPath], counts: &HashMap<TagPath, usize>) -> TagTree {
        let mut tree = Self::build(paths);
        let by_string: HashMap<String, usize> =
            counts.iter().map(|(p, n)| (p.to_string(), *n)).collect();
        annotate(&mut tree.root, &by_string);
        tree
    }

    /// The root node; empty name and path, never itself selectable
    pub fn root(&self) -> &TagNode {
        &self.root
    }

    /// True iff the tree has no nodes beyond the root
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Walk children by segment name; `None` if any segment is missing
    pub fn find(&self, path: &TagPath) -> Option<&TagNode> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = current.children.get(segment)?;
        }
        Some(current)
    }

    /// Pre-order traversal of every node, excluding the root
    pub fn flatten(&self) -> Vec<&TagNode> {
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// Full paths of the subtree rooted at `path`, the path itself included
    ///
    /// Pre-order, so the path itself comes first. Empty when the path has no
    /// node in this tree. Used to remove a tag and everything under it.
    pub fn descendant_paths(&self, path: &TagPath) -> Vec<TagPath> {
        let Some(node) = self.find(path) else {
            return Vec::new();
        };

        let mut nodes = vec![node];
        collect(node, &mut nodes);
        nodes
            .into_iter()
            .map(|n| TagPath::from_validated_segments(
                n.full_path.split('/').map(str::to_string).collect(),
            ))
            .collect()
    }
}

fn collect<'a>(node: &'a TagNode, out: &mut Vec<&'a TagNode>) {
    for child in node.children.values() {
        out.push(child);
        collect(child, out);
    }
}

fn annotate(node: &mut TagNode, counts: &HashMap<String, usize>) {
    if !node.full_path.is_empty() {
        node.link_count = counts.get(&node.full_path).copied();
    }
    for child in node.children.values_mut() {
        annotate(child, counts);
    }
}

/// Breadcrumb trail for a path, one entry per prefix length, root-to-leaf
///
/// Operates on the path structurally; the path need not have a node in any
/// tree.
pub fn breadcrumbs(path: &TagPath) -> Vec<Breadcrumb> {
    let segments = path.segments();
    (1..=segments.len())
        .map(|len| Breadcrumb {
            name: segments[len - 1].clone(),
            path: TagPath::from_validated_segments(segments[..len].to_vec()),
        })
        .collect()
}

/// All strict ancestor paths, root-to-parent
///
/// Tree-level convenience for [`TagPath::ancestors`].
pub fn parent_paths(path: &TagPath) -> Vec<TagPath> {
    path.ancestors()
}
