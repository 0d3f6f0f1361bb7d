use std::time::Duration;

use glam::{Mat3, Quat, Vec3};

use crate::graph::{NodeId, SceneGraph};

/// En dessous de cette longueur une direction est considérée nulle.
pub const MIN_DIRECTION: f32 = 1e-4;

/// Oriente `mesh` pour que son sommet de référence pointe vers `target`.
///
/// La rotation minimale entre la direction monde actuelle du sommet et la
/// direction `pivot → target` est composée avec l'orientation monde du
/// maillage, ramenée dans l'espace du parent, puis approchée par slerp
/// (`smoothing` ∈ [0, 1]).
///
/// Renvoie `false` (orientation inchangée) si la direction est dégénérée.
pub fn aim_at(
    graph: &mut SceneGraph,
    pivot: NodeId,
    mesh: NodeId,
    reference_vertex: Vec3,
    target: Vec3,
    smoothing: f32,
) -> bool {
    let to_target = target - graph.world_position(pivot);
    if !to_target.is_finite() || to_target.length() < MIN_DIRECTION {
        return false;
    }
    let target_dir = to_target.normalize();

    let mesh_world = graph.world_rotation(mesh);
    let reference_world = (mesh_world * reference_vertex).normalize_or_zero();
    if reference_world == Vec3::ZERO {
        return false;
    }

    let arc = Quat::from_rotation_arc(reference_world, target_dir);
    let new_world = arc * mesh_world;
    let local = graph.parent_world_rotation(mesh).inverse() * new_world;

    let node = graph.node_mut(mesh);
    node.rotation = node.rotation.slerp(local, smoothing).normalize();
    true
}

/// Rapproche la position locale de `follower` du milieu des positions monde
/// de `a` et `b`.
///
/// Le milieu monde sert directement de cible locale, sans passage dans
/// l'espace du parent : quand le parent tourne, le point d'équilibre tourne
/// avec lui.
pub fn follow_midpoint(graph: &mut SceneGraph, follower: NodeId, a: NodeId, b: NodeId, factor: f32) {
    let mid = (graph.world_position(a) + graph.world_position(b)) * 0.5;
    let node = graph.node_mut(follower);
    node.position = node.position.lerp(mid, factor);
}

/// Orientation dont l'axe Z local est `axis` (normalisé).
///
/// La base orthonormée est complétée par un vecteur de référence : +Y, ou
/// +X quand l'axe est presque parallèle à +Y.
#[must_use]
pub fn basis_rotation(axis: Vec3) -> Quat {
    let reference = if axis.dot(Vec3::Y).abs() < 0.9 {
        Vec3::Y
    } else {
        Vec3::X
    };
    let y = axis.cross(reference).normalize();
    let z = axis;
    let x = y.cross(z).normalize();
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Facteur de slerp dépendant du pas de temps : `base + min(0.5, dt)`,
/// borné à [0, 1].
///
/// # Example
/// ```
/// use gy_scene::motion::body_slerp_factor;
/// use std::time::Duration;
/// assert!((body_slerp_factor(0.1, Duration::from_millis(16)) - 0.116).abs() < 1e-6);
/// assert!((body_slerp_factor(0.1, Duration::from_secs(3)) - 0.6).abs() < 1e-6);
/// ```
#[must_use]
pub fn body_slerp_factor(base: f32, dt: Duration) -> f32 {
    (base + dt.as_secs_f32().min(0.5)).clamp(0.0, 1.0)
}

/// Aligne `body` sur l'axe `from → to` (positions monde).
///
/// L'orientation désirée est mélangée à `blend` vers l'identité (orientation
/// de référence stable), ramenée dans l'espace du parent puis approchée par
/// slerp de facteur `factor`. Renvoie `false` si l'axe est dégénéré.
pub fn orient_body(
    graph: &mut SceneGraph,
    body: NodeId,
    from: NodeId,
    to: NodeId,
    blend: f32,
    factor: f32,
) -> bool {
    let axis = graph.world_position(to) - graph.world_position(from);
    if !axis.is_finite() || axis.length() < MIN_DIRECTION {
        return false;
    }
    let desired = basis_rotation(axis.normalize());
    let blended = Quat::IDENTITY.slerp(desired, blend);
    let local = graph.parent_world_rotation(body).inverse() * blended;

    let node = graph.node_mut(body);
    node.rotation = node.rotation.slerp(local, factor).normalize();
    true
}
