//! Scene graph and hierarchical scene organization.
//!
//! The graph is an arena: nodes live in one `Vec` and refer to each other by
//! [`NodeId`]. A node owns the ordered list of its children's ids and keeps a
//! non-owning index to its parent. Exactly one root exists per graph; it is
//! created together with the graph and cannot be removed.

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::data_structures::{instance::Instance, mesh::Mesh};

/// Index of a node inside its [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraphNode {
    pub name: String,
    pub local: Instance,
    pub mesh: Option<Mesh>,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneGraphNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Instance::default(),
            mesh: None,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_transform(mut self, local: Instance) -> Self {
        self.local = local;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneGraphNode>,
    height: usize,
}

impl SceneGraph {
    pub fn new(root: SceneGraphNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![root],
            height: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// Returns `None` (and leaves the graph untouched) if `parent` does not belong to this graph.
    pub fn add_child(&mut self, parent: NodeId, node: SceneGraphNode) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            warn!(
                "You tried to attach `{}` to node {} but the graph only has {} nodes.",
                node.name,
                parent.0,
                self.nodes.len()
            );
            return None;
        }
        let id = NodeId(self.nodes.len());
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        self.height = self.height.max(self.depth(id) + 1);
        Some(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneGraphNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneGraphNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(SceneGraphNode::parent)
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /**
     * Walks from `id`'s parent up to the root.
     *
     * The walk is an explicit loop capped at the graph's height, so a corrupted
     * parent chain terminates instead of cycling.
     */
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.parent(id),
            remaining: self.height,
        }
    }

    /// True if `node` is `ancestor` itself or lies in its subtree.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Breadth-first search for the first node named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|id| self.nodes[id.0].name == name)
    }

    /// `id` followed by every node of its subtree, breadth first.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut queue = std::collections::VecDeque::new();
        if self.get(id).is_some() {
            queue.push_back(id);
        }
        std::iter::from_fn(move || {
            let next = queue.pop_front()?;
            queue.extend(self.nodes[next.0].children.iter().copied());
            Some(next)
        })
    }

    /**
     * Moves the whole graph under a new root named `name`.
     *
     * The new root carries an identity transform, so anything set on it later
     * is applied on top of the old root's own transform.
     */
    pub fn wrapped(self, name: impl Into<String>) -> SceneGraph {
        let shift = |id: NodeId| NodeId(id.0 + 1);
        let mut container = SceneGraphNode::new(name);
        container.children.push(shift(self.root()));

        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.push(container);
        nodes.extend(self.nodes.into_iter().map(|mut node| {
            node.parent = Some(node.parent.map_or(NodeId(0), shift));
            node.children.iter_mut().for_each(|child| *child = shift(*child));
            node
        }));
        SceneGraph {
            nodes,
            height: self.height + 1,
        }
    }

    /// World matrix of `id`, the product of all local matrices on its root path.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let node = self.get(id)?;
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        let parent = chain
            .iter()
            .rev()
            .fold(Matrix4::identity(), |acc, a| acc * self.nodes[a.0].local.to_matrix());
        Some(parent * node.local.to_matrix())
    }

    /// Visible unless the node or any of its ancestors is hidden.
    pub fn is_visible(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(node) => node.visible && self.ancestors(id).all(|a| self.nodes[a.0].visible),
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.name.as_str())
    }
}

pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}
