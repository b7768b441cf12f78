use crate::math::{Mat4, Transform};
use crate::scene::MeshPart;

/// Role of a prop, which decides the animation it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    /// Translucent beaker.
    Vessel,
    Flame,
    Sphere,
    Clock,
    /// Glowing marker above the vessel once a step resolves.
    ResultGlow,
}

/// A transient equipment mesh placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub mesh: MeshPart,
    pub transform: Transform,
}

impl Prop {
    pub fn new(kind: PropKind, mesh: MeshPart, transform: Transform) -> Self {
        Self {
            kind,
            mesh,
            transform,
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}

/// Ordered, single-owner set of props for one view. It is never diffed:
/// a change of action state clears it and builds it again.
#[derive(Debug, Clone, Default)]
pub struct PropRegistry {
    props: Vec<Prop>,
}

impl PropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.props.clear();
    }

    pub fn push(&mut self, prop: Prop) {
        self.props.push(prop);
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prop> {
        self.props.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Prop> {
        self.props.iter_mut()
    }

    pub fn find(&self, kind: PropKind) -> Option<&Prop> {
        self.props.iter().find(|p| p.kind == kind)
    }

    pub fn kinds(&self) -> Vec<PropKind> {
        self.props.iter().map(|p| p.kind).collect()
    }
}

impl<'a> IntoIterator for &'a PropRegistry {
    type Item = &'a Prop;
    type IntoIter = std::slice::Iter<'a, Prop>;

    fn into_iter(self) -> Self::IntoIter {
        self.props.iter()
    }
}
