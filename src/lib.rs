mod nf;

pub use nf::Locus;

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("input text is empty")]
    EmptyText,
    #[error("input text must end with a sentinel byte that occurs nowhere else")]
    MissingSentinel,
}

// A node together with its incoming edge. Internal edges are text[start..end),
// frozen at creation; leaf edges run to the tree-wide global_end, so every
// leaf grows by one byte per phase without being touched. The two child maps
// never share a key.
struct InternalNode {
    start: usize,
    end: usize,
    internal_children: HashMap<u8, NodeId>,
    leaf_children: HashMap<u8, NodeId>,
    suffix_link: Option<NodeId>,
    // inverse suffix links; deduplicated at insertion
    weiner_links: Vec<NodeId>,
    nf: i64,
}

struct LeafNode {
    start: usize,
}

enum Node {
    Internal(InternalNode),
    Leaf(LeafNode),
}

impl Node {
    fn new_internal(start: usize, end: usize) -> Node {
        Node::Internal(InternalNode {
            start,
            end,
            internal_children: HashMap::new(),
            leaf_children: HashMap::new(),
            suffix_link: None,
            weiner_links: Vec::new(),
            nf: 0,
        })
    }

    fn new_leaf(start: usize) -> Node {
        Node::Leaf(LeafNode { start })
    }
}

pub struct SuffixTree<'a> {
    text: &'a [u8],
    nodes: Vec<Node>,

    // Ukkonen state; quiescent once construction finishes.
    active_node: NodeId,
    active_edge: usize,
    active_length: usize,
    remainder: usize,
    global_end: usize,
    need_link: Option<NodeId>,
}

impl<'a> SuffixTree<'a> {
    pub fn new(text: &'a [u8]) -> Result<SuffixTree<'a>, Error> {
        let (&sentinel, body) = text.split_last().ok_or(Error::EmptyText)?;
        if body.contains(&sentinel) {
            return Err(Error::MissingSentinel);
        }

        let mut tree = SuffixTree {
            text,
            nodes: vec![Node::new_internal(0, 0)],

            active_node: ROOT,
            active_edge: 0,
            active_length: 0,
            remainder: 0,
            global_end: 0,
            need_link: None,
        };

        for k in 0..text.len() {
            tree.extend(k);
        }

        debug!(
            text_len = text.len(),
            nodes = tree.nodes.len(),
            "suffix tree built"
        );

        Ok(tree)
    }

    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    fn extend(&mut self, k: usize) {
        self.need_link = None;
        self.remainder += 1;

        while self.remainder > 0 {
            if self.active_length == 0 {
                self.active_edge = k;
            }

            let key = self.text[self.active_edge];
            let active = self.internal(self.active_node);
            let child = match (
                active.leaf_children.get(&key).copied(),
                active.internal_children.get(&key).copied(),
            ) {
                (None, None) => None,
                (Some(id), None) => Some((id, true)),
                (None, Some(id)) => Some((id, false)),
                (Some(_), Some(_)) => unreachable!("child maps share a first byte"),
            };

            match child {
                None => {
                    // rule 2b: no outgoing edge starts with text[k], attach a
                    // fresh leaf directly to the active node
                    let leaf = self.add_node(Node::new_leaf(k));
                    self.internal_mut(self.active_node)
                        .leaf_children
                        .insert(key, leaf);
                    self.add_links(self.active_node);
                }
                Some((child, child_is_leaf)) => {
                    // skip/count: the active point sits at or beyond the far
                    // end of this edge, walk down into the child
                    let len = self.edge_length(child);
                    if self.active_length >= len {
                        debug_assert!(!child_is_leaf, "walked into a leaf edge");
                        self.active_edge += len;
                        self.active_length -= len;
                        self.active_node = child;
                        continue;
                    }

                    // rule 3: text[k] is already on the edge; a show-stopper,
                    // the carried remainder is dealt with in later phases
                    let child_start = self.start(child);
                    if self.text[child_start + self.active_length] == self.text[k] {
                        self.active_length += 1;
                        self.add_links(self.active_node);
                        break;
                    }

                    // rule 2a: the edge disagrees with text[k] at the active
                    // point, split it there
                    self.split_edge(child, child_is_leaf, k);
                }
            }

            self.remainder -= 1;

            if self.active_node == ROOT && self.active_length > 0 {
                self.active_length -= 1;
                // first byte of the next pending suffix
                self.active_edge = k - self.remainder + 1;
            } else {
                self.active_node = self
                    .internal(self.active_node)
                    .suffix_link
                    .unwrap_or(ROOT);
            }
        }

        self.global_end += 1;
    }

    fn split_edge(&mut self, child: NodeId, child_is_leaf: bool, k: usize) {
        let edge_key = self.text[self.active_edge];
        let prev_start = self.start(child);
        let split = prev_start + self.active_length;
        self.set_start(child, split);

        let mid = self.add_node(Node::new_internal(prev_start, split));
        let leaf = self.add_node(Node::new_leaf(k));

        let new_byte = self.text[k];
        let child_key = self.text[split];

        self.internal_mut(mid).leaf_children.insert(new_byte, leaf);
        if child_is_leaf {
            // child moves between the leaf-child maps
            self.internal_mut(mid).leaf_children.insert(child_key, child);
            let active = self.internal_mut(self.active_node);
            active.leaf_children.remove(&edge_key);
            active.internal_children.insert(edge_key, mid);
        } else {
            // mid takes over child's slot in the active node's map
            self.internal_mut(mid)
                .internal_children
                .insert(child_key, child);
            self.internal_mut(self.active_node)
                .internal_children
                .insert(edge_key, mid);
        }

        self.add_links(mid);
    }

    fn add_links(&mut self, target: NodeId) {
        if let Some(from) = self.need_link {
            self.internal_mut(from).suffix_link = Some(target);
            let links = &mut self.internal_mut(target).weiner_links;
            if !links.contains(&from) {
                links.push(from);
            }
        }
        self.need_link = Some(target);
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn internal(&self, id: NodeId) -> &InternalNode {
        match &self.nodes[id] {
            Node::Internal(node) => node,
            Node::Leaf(_) => unreachable!("expected an internal node"),
        }
    }

    fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode {
        match &mut self.nodes[id] {
            Node::Internal(node) => node,
            Node::Leaf(_) => unreachable!("expected an internal node"),
        }
    }

    fn start(&self, id: NodeId) -> usize {
        match &self.nodes[id] {
            Node::Internal(node) => node.start,
            Node::Leaf(leaf) => leaf.start,
        }
    }

    fn set_start(&mut self, id: NodeId, start: usize) {
        match &mut self.nodes[id] {
            Node::Internal(node) => node.start = start,
            Node::Leaf(leaf) => leaf.start = start,
        }
    }

    fn edge_length(&self, id: NodeId) -> usize {
        match &self.nodes[id] {
            Node::Internal(node) => node.end - node.start,
            Node::Leaf(leaf) => self.global_end - leaf.start,
        }
    }

    // Indented dump of the tree, one edge per line. Internal nodes carry the
    // net frequency left behind by the last bulk pass, when nonzero.
    pub fn visualize(&self) {
        self.print_subtree(ROOT, 0);
    }

    fn print_subtree(&self, id: NodeId, indent: usize) {
        let node = self.internal(id);
        for &child in node.internal_children.values() {
            let inner = self.internal(child);
            let label = String::from_utf8_lossy(&self.text[inner.start..inner.end]);
            if inner.nf > 0 {
                println!("{}{} [nf {}]", " ".repeat(indent), label, inner.nf);
            } else {
                println!("{}{}", " ".repeat(indent), label);
            }
            self.print_subtree(child, indent + 4);
        }
        for &leaf in node.leaf_children.values() {
            let start = self.start(leaf);
            let label = String::from_utf8_lossy(&self.text[start..self.global_end]);
            println!("{}{}", " ".repeat(indent), label);
        }
    }
}
