use super::primitive::MeshPart;
use crate::math::{Mat4, Transform};

/// Index of a node inside its owning [`SceneGraph`].
///
/// Ids are only meaningful for the graph that issued them. They are used as
/// weak handles: holding one never keeps a node alive or re-parents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<&'static str>,
    pub transform: Transform,
    pub mesh: Option<MeshPart>,
    pub visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn new(name: Option<&'static str>, transform: Transform, mesh: Option<MeshPart>) -> Self {
        Self {
            name,
            transform,
            mesh,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Tree of transform nodes stored in a flat arena.
///
/// Each node has exactly one owner (its parent, or the graph itself for
/// roots). A parent is always inserted before its children, so the arena
/// never contains cycles.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

/// Maps ids from a grafted graph into the graph that absorbed it.
#[derive(Debug, Clone, Copy)]
pub struct IdMap {
    base: usize,
}

impl IdMap {
    pub fn map(&self, id: NodeId) -> NodeId {
        NodeId(id.0 + self.base)
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    /// Adds an empty group node.
    pub fn add_group(&mut self, parent: Option<NodeId>, name: &'static str, transform: Transform) -> NodeId {
        self.insert(parent, Node::new(Some(name), transform, None))
    }

    /// Adds a renderable node.
    pub fn add_mesh(&mut self, parent: Option<NodeId>, mesh: MeshPart, transform: Transform) -> NodeId {
        self.insert(parent, Node::new(None, transform, Some(mesh)))
    }

    fn insert(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        id
    }

    /// Moves every node of `other` into this graph, hanging its roots under
    /// `parent`. Returns the mapping for ids issued by `other`.
    pub fn graft(&mut self, parent: Option<NodeId>, other: SceneGraph) -> IdMap {
        let map = IdMap {
            base: self.nodes.len(),
        };

        for mut node in other.nodes {
            node.parent = node.parent.map(|p| map.map(p));
            node.children = node.children.iter().map(|&c| map.map(c)).collect();
            self.nodes.push(node);
        }

        for root in other.roots {
            let root = map.map(root);
            self.nodes[root.0].parent = parent;
            match parent {
                Some(p) => self.nodes[p.0].children.push(root),
                None => self.roots.push(root),
            }
        }

        map
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == Some(name))
            .map(NodeId)
    }

    /// Depth-first walk from every root, handing each node its world matrix.
    /// Invisible nodes are skipped together with their subtree.
    pub fn visit<F: FnMut(NodeId, &Node, Mat4)>(&self, mut f: F) {
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&r| (r, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.to_matrix();
            f(id, node, world);
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut world = self.nodes[id.0].transform.to_matrix();
        let mut cursor = self.nodes[id.0].parent;
        while let Some(p) = cursor {
            world = self.nodes[p.0].transform.to_matrix() * world;
            cursor = self.nodes[p.0].parent;
        }
        world
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for &child in &self.nodes[current.0].children {
                out.push(child);
                stack.push(child);
            }
        }
        out
    }
}
