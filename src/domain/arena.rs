use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::media::{MediaComponent, PlaybackSink};

/// Tree node in the arena-based media hierarchy.
#[derive(Debug)]
pub struct TreeNode {
    /// The participant performed when this node is visited
    pub item: Box<dyn MediaComponent>,
    /// Index of parent node in the arena, None for detached/root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree of playable media.
///
/// Nodes are inserted detached and then attached with [`MediaTree::add`], which
/// refuses anything that would give a node two parents or close a cycle.
/// A single arena may hold several independent roots.
#[derive(Debug)]
pub struct MediaTree {
    arena: Arena<TreeNode>,
}

impl Default for MediaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, item: Box<dyn MediaComponent>) -> Index {
        self.arena.insert(TreeNode {
            item,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Attach `child` as the last child of `parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        let parent_node = self.node(parent)?;
        if !parent_node.item.accepts_children() {
            return Err(DomainError::NotComposite(parent_node.item.name().to_string()));
        }
        let child_node = self.node(child)?;

        if self.is_ancestor_or_self(child, parent) {
            return Err(DomainError::CycleDetected {
                parent: parent_node.item.name().to_string(),
                child: child_node.item.name().to_string(),
            });
        }
        if child_node.parent.is_some() {
            return Err(DomainError::AlreadyAttached(child_node.item.name().to_string()));
        }

        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        debug!("attached {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Perform `node` and everything below it, pre-order, children in insertion order.
    #[instrument(level = "debug", skip(self, sink))]
    pub fn perform(&self, node: Index, sink: &mut dyn PlaybackSink) -> DomainResult<()> {
        self.node(node)?;
        for (_, current) in self.preorder(node) {
            current.item.play(sink);
        }
        Ok(())
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    fn node(&self, idx: Index) -> DomainResult<&TreeNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::NodeNotFound(format!("{idx:?}")))
    }

    /// True if `candidate` is `node` or lies on the path from `node` to its root.
    fn is_ancestor_or_self(&self, candidate: Index, node: Index) -> bool {
        let mut current = Some(node);
        while let Some(idx) = current {
            if idx == candidate {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> Vec<Index> {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn preorder(&self, start: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, start)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Render the subtree below `start` for display.
    pub fn to_termtree(&self, start: Index) -> DomainResult<Tree<String>> {
        fn label(node: &TreeNode) -> String {
            format!("{}: {}", node.item.kind(), node.item.name())
        }

        fn build_tree(tree: &MediaTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let root = self.node(start)?;
        let mut rendered = Tree::new(label(root));
        build_tree(self, start, &mut rendered);
        Ok(rendered)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a MediaTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a MediaTree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
