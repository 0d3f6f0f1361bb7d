use glam::{Mat4, Quat, Vec3};

use crate::error::SceneError;
use crate::geometry::Wireframe;

/// Index d'un nœud dans l'arène du [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Un nœud : transform local, liens parent/enfants, maillage optionnel.
#[derive(Clone, Debug)]
pub struct Node {
    /// Nom lisible (debug, messages d'erreur).
    pub name: &'static str,
    /// Position locale, relative au parent.
    pub position: Vec3,
    /// Orientation locale (quaternion unitaire).
    pub rotation: Quat,
    /// Géométrie filaire dessinée à ce nœud. `None` = pivot pur.
    pub mesh: Option<Wireframe>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &'static str, parent: Option<NodeId>) -> Self {
        Self {
            name,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mesh: None,
            parent,
            children: Vec::new(),
        }
    }

    /// Parent du nœud (`None` pour la racine).
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Enfants, dans l'ordre d'insertion.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Graphe de scène en arène : chaque nœud stocke l'index de son parent et
/// la liste de ses enfants.
///
/// Un nœud ne peut être rattaché qu'à un parent déjà existant, au moment de
/// sa création : le graphe reste un arbre sans cycle.
///
/// # Example
/// ```
/// use gy_scene::graph::SceneGraph;
/// use glam::Vec3;
///
/// let mut graph = SceneGraph::new();
/// let pivot = graph.add_child(graph.root(), "pivot");
/// graph.node_mut(pivot).position = Vec3::new(1.0, 0.0, 0.0);
/// let child = graph.add_child(pivot, "child");
/// graph.node_mut(child).position = Vec3::new(0.0, 2.0, 0.0);
/// assert_eq!(graph.world_position(child), Vec3::new(1.0, 2.0, 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    /// Crée un graphe contenant uniquement la racine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("root", None)],
        }
    }

    /// La racine, toujours présente.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Ajoute un nœud sous `parent` et renvoie son identifiant.
    pub fn add_child(&mut self, parent: NodeId, name: &'static str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Nombre de nœuds, racine comprise.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Toujours faux : la racine existe dès la construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Iterate over `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Transform monde `(position, rotation)` : composition de tous les ancêtres.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> (Vec3, Quat) {
        let node = &self.nodes[id.0];
        match node.parent {
            None => (node.position, node.rotation),
            Some(parent) => {
                let (p_pos, p_rot) = self.world_transform(parent);
                (p_pos + p_rot * node.position, p_rot * node.rotation)
            }
        }
    }

    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_transform(id).0
    }

    #[must_use]
    pub fn world_rotation(&self, id: NodeId) -> Quat {
        self.world_transform(id).1
    }

    /// Rotation monde du parent, identité pour la racine.
    #[must_use]
    pub fn parent_world_rotation(&self, id: NodeId) -> Quat {
        self.nodes[id.0]
            .parent
            .map_or(Quat::IDENTITY, |p| self.world_rotation(p))
    }

    /// Matrice monde (pas d'échelle dans ce graphe).
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let (pos, rot) = self.world_transform(id);
        Mat4::from_rotation_translation(rot, pos)
    }

    /// Vérifie que tous les transforms locaux sont finis.
    ///
    /// # Errors
    /// Returns [`SceneError::NonFinite`] naming the first bad node.
    pub fn check_finite(&self) -> Result<(), SceneError> {
        match self
            .nodes
            .iter()
            .find(|n| !n.position.is_finite() || !n.rotation.is_finite())
        {
            Some(n) => Err(SceneError::NonFinite { node: n.name }),
            None => Ok(()),
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn world_transform_composes_rotation_then_translation() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a");
        graph.node_mut(a).rotation = Quat::from_rotation_y(FRAC_PI_2);
        let b = graph.add_child(a, "b");
        graph.node_mut(b).position = Vec3::new(0.0, 0.0, 1.0);
        // +Z tourné de 90° autour de Y → +X
        assert!(approx(graph.world_position(b), Vec3::X));
    }

    #[test]
    fn parent_links_are_recorded() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "a");
        let b = graph.add_child(a, "b");
        let c = graph.add_child(a, "c");
        assert_eq!(graph.node(b).parent(), Some(a));
        assert_eq!(graph.node(a).children(), &[b, c]);
        assert_eq!(graph.node(graph.root()).parent(), None);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn check_finite_names_bad_node() {
        let mut graph = SceneGraph::new();
        let a = graph.add_child(graph.root(), "cube");
        assert!(graph.check_finite().is_ok());
        graph.node_mut(a).position.x = f32::NAN;
        assert_eq!(
            graph.check_finite(),
            Err(SceneError::NonFinite { node: "cube" })
        );
    }
}
