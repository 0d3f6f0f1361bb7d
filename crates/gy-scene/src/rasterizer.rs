use std::time::Duration;

use glam::{Vec2, Vec3};
use gy_core::config::SceneConfig;
use gy_core::frame::FrameBuffer;

use crate::camera::{PerspectiveCamera, Plane};
use crate::error::SceneError;
use crate::geometry::{self, tetra_reference_direction};
use crate::graph::{NodeId, SceneGraph};
use crate::layout::ViewportLayout;
use crate::motion;
use crate::wire::WirePainter;

/// Plan de visée du pointeur : `z = 3.5`.
pub const AIM_PLANE_CONSTANT: f32 = -3.5;

/// Identifiants des nœuds de la chaîne de pivots.
///
/// root → groupe dodécaèdre (+ maillage) → pivot cube (+ maillage)
/// → pivot tétraèdre (+ maillage).
#[derive(Clone, Copy, Debug)]
pub struct PivotChain {
    pub dodeca_group: NodeId,
    pub dodeca_mesh: NodeId,
    pub cube_pivot: NodeId,
    pub cube_mesh: NodeId,
    pub tetra_pivot: NodeId,
    pub tetra_mesh: NodeId,
}

impl PivotChain {
    fn build(graph: &mut SceneGraph) -> Self {
        let dodeca_group = graph.add_child(graph.root(), "dodeca_group");
        let dodeca_mesh = graph.add_child(dodeca_group, "dodecahedron");
        let cube_pivot = graph.add_child(dodeca_group, "cube_pivot");
        let cube_mesh = graph.add_child(cube_pivot, "cube");
        let tetra_pivot = graph.add_child(cube_pivot, "tetra_pivot");
        let tetra_mesh = graph.add_child(tetra_pivot, "tetrahedron");
        Self {
            dodeca_group,
            dodeca_mesh,
            cube_pivot,
            cube_mesh,
            tetra_pivot,
            tetra_mesh,
        }
    }
}

/// Ce qu'un tick a effectivement mis à jour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Le tétraèdre a visé le pointeur.
    pub aimed: bool,
    /// Le corps a été réorienté.
    pub oriented: bool,
}

/// Possède la scène et la cible off-screen ; avance et rasterise une frame
/// par tick.
///
/// # Example
/// ```
/// use gy_scene::rasterizer::FrameRasterizer;
/// use gy_core::config::SceneConfig;
/// use glam::Vec2;
/// use std::time::Duration;
///
/// let config = SceneConfig::default();
/// let mut r = FrameRasterizer::new(120, 48, (240.0, 96.0), &config);
/// r.tick(Duration::from_millis(16), Vec2::ZERO, &config).unwrap();
/// assert_eq!(r.frame().data.len(), 120 * 48 * 4);
/// ```
pub struct FrameRasterizer {
    graph: SceneGraph,
    chain: PivotChain,
    camera: PerspectiveCamera,
    layout: ViewportLayout,
    painter: WirePainter,
    frame: FrameBuffer,
    aim_plane: Plane,
    reference_vertex: Vec3,
}

impl FrameRasterizer {
    /// Construit la scène pour une cible `cols × rows` et un viewport
    /// `(largeur, hauteur)` en unités d'affichage.
    #[must_use]
    pub fn new(cols: u32, rows: u32, viewport: (f32, f32), config: &SceneConfig) -> Self {
        let mut graph = SceneGraph::new();
        let chain = PivotChain::build(&mut graph);
        let layout = ViewportLayout::compute(
            viewport.0,
            viewport.1,
            config.fov_degrees,
            config.camera_distance,
        );
        let camera = PerspectiveCamera::new(config.fov_degrees, layout.aspect, config.camera_distance);
        let mut rasterizer = Self {
            graph,
            chain,
            camera,
            layout,
            painter: WirePainter::new(cols, rows),
            frame: FrameBuffer::new(cols, rows),
            aim_plane: Plane::new(Vec3::Z, AIM_PLANE_CONSTANT),
            reference_vertex: Vec3::ZERO,
        };
        rasterizer.apply_layout();
        rasterizer
    }

    /// Recalcule la mise à l'échelle après un redimensionnement du viewport.
    pub fn resize(&mut self, width: f32, height: f32, config: &SceneConfig) {
        self.layout =
            ViewportLayout::compute(width, height, config.fov_degrees, config.camera_distance);
        self.camera =
            PerspectiveCamera::new(config.fov_degrees, self.layout.aspect, config.camera_distance);
        self.apply_layout();
        log::debug!(
            "Viewport {width:.0}×{height:.0} → scale {:.3}",
            self.layout.scale_factor
        );
    }

    /// Reconstruit les maillages aux tailles courantes et replace le tétraèdre.
    fn apply_layout(&mut self) {
        let l = self.layout;
        self.graph.node_mut(self.chain.dodeca_mesh).mesh =
            Some(geometry::dodecahedron(l.dodeca_radius));
        self.graph.node_mut(self.chain.cube_mesh).mesh = Some(geometry::cube(l.cube_size));
        self.graph.node_mut(self.chain.tetra_mesh).mesh =
            Some(geometry::tetrahedron(l.tetra_radius));
        self.graph.node_mut(self.chain.tetra_pivot).position = l.tetra_offset();
        self.reference_vertex = tetra_reference_direction() * l.tetra_radius;
    }

    /// Un tick complet : visée, suivi du cube, orientation du corps, rendu.
    ///
    /// `pointer_ndc` est la position du pointeur en coordonnées normalisées
    /// ([-1, 1], y vers le haut).
    ///
    /// # Errors
    /// Returns [`SceneError::NonFinite`] if a transform degenerates; the frame
    /// is then left as it was.
    pub fn tick(
        &mut self,
        dt: Duration,
        pointer_ndc: Vec2,
        config: &SceneConfig,
    ) -> Result<TickReport, SceneError> {
        self.sync_camera(config);
        let report = self.update(dt, pointer_ndc, config);
        self.graph.check_finite()?;
        self.render()?;
        Ok(report)
    }

    /// Suit un changement de caméra issu d'une config rechargée.
    fn sync_camera(&mut self, config: &SceneConfig) {
        let fov_changed = (self.camera.fov_degrees - config.fov_degrees).abs() > f32::EPSILON;
        let dist_changed = (self.camera.distance() - config.camera_distance).abs() > 1e-4;
        if fov_changed || dist_changed {
            self.resize(self.layout.width, self.layout.height, config);
        }
    }

    /// Mises à jour d'orientation/position, sans rendu.
    pub fn update(&mut self, dt: Duration, pointer_ndc: Vec2, config: &SceneConfig) -> TickReport {
        let c = self.chain;

        let aimed = self
            .pointer_target(pointer_ndc)
            .is_some_and(|target| {
                motion::aim_at(
                    &mut self.graph,
                    c.tetra_pivot,
                    c.tetra_mesh,
                    self.reference_vertex,
                    target,
                    config.aim_smoothing,
                )
            });

        if config.follow_factor > 0.0 {
            motion::follow_midpoint(
                &mut self.graph,
                c.cube_pivot,
                c.dodeca_group,
                c.tetra_pivot,
                config.follow_factor,
            );
        }

        let oriented = motion::orient_body(
            &mut self.graph,
            c.dodeca_group,
            c.cube_pivot,
            c.tetra_pivot,
            config.body_blend,
            motion::body_slerp_factor(config.body_base_slerp, dt),
        );

        TickReport { aimed, oriented }
    }

    /// Point visé : rayon caméra→pointeur intersecté avec le plan `z = 3.5`.
    #[must_use]
    pub fn pointer_target(&self, pointer_ndc: Vec2) -> Option<Vec3> {
        if !pointer_ndc.is_finite() {
            return None;
        }
        self.camera
            .ray_from_ndc(pointer_ndc)
            .intersect_plane(&self.aim_plane)
    }

    /// Rasterise la scène dans la cible off-screen.
    ///
    /// # Errors
    /// Propagates [`SceneError::TargetMismatch`] from the painter.
    pub fn render(&mut self) -> Result<(), SceneError> {
        self.painter.paint(&self.graph, &self.camera, &mut self.frame)
    }

    /// Dernière frame rasterisée (lignes de bas en haut).
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[must_use]
    pub fn layout(&self) -> &ViewportLayout {
        &self.layout
    }

    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Accès mutable au graphe (réglages manuels, tests).
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    #[must_use]
    pub fn chain(&self) -> PivotChain {
        self.chain
    }

    #[must_use]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Longueur de l'axe cube → tétraèdre, en monde.
    #[must_use]
    pub fn axis_length(&self) -> f32 {
        self.graph
            .world_position(self.chain.tetra_pivot)
            .distance(self.graph.world_position(self.chain.cube_pivot))
    }

    /// Remplace le plan de visée.
    pub fn set_aim_plane(&mut self, plane: Plane) {
        self.aim_plane = plane;
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    fn setup() -> (FrameRasterizer, SceneConfig) {
        let config = SceneConfig::default();
        (FrameRasterizer::new(120, 48, (240.0, 96.0), &config), config)
    }

    #[test]
    fn chain_is_nested() {
        let (r, _) = setup();
        let c = r.chain();
        let g = r.graph();
        assert_eq!(g.node(c.cube_pivot).parent(), Some(c.dodeca_group));
        assert_eq!(g.node(c.tetra_pivot).parent(), Some(c.cube_pivot));
        assert_eq!(g.node(c.tetra_mesh).parent(), Some(c.tetra_pivot));
        assert_eq!(g.node(c.dodeca_group).parent(), Some(g.root()));
    }

    #[test]
    fn first_tick_draws_something() {
        let (mut r, config) = setup();
        r.tick(Duration::from_millis(16), Vec2::ZERO, &config).unwrap();
        assert!(r.frame().data.chunks_exact(4).any(|p| p[1] > 0));
        assert!(r.frame().data.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn resize_moves_tetra_pivot() {
        let (mut r, config) = setup();
        let before = r.graph().node(r.chain().tetra_pivot).position;
        r.resize(60.0, 96.0, &config);
        let after = r.graph().node(r.chain().tetra_pivot).position;
        assert!(after.z < before.z);
        assert_eq!(after, r.layout().tetra_offset());
    }

    #[test]
    fn parallel_pointer_ray_keeps_orientation() {
        let (mut r, config) = setup();
        // Plan contenant l'axe de visée de la caméra : tout rayon vers le
        // centre lui est parallèle.
        r.set_aim_plane(Plane::new(Vec3::X, 5.0));
        let mesh = r.chain().tetra_mesh;
        r.graph_mut().node_mut(mesh).rotation = Quat::from_rotation_y(0.5);
        let before = r.graph().node(mesh).rotation;
        let report = r.tick(Duration::from_millis(16), Vec2::ZERO, &config).unwrap();
        assert!(!report.aimed);
        assert_eq!(r.graph().node(mesh).rotation, before);
        assert!(r.graph().check_finite().is_ok());
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let (mut r, config) = setup();
        let report = r
            .tick(Duration::from_millis(16), Vec2::new(f32::NAN, 0.0), &config)
            .unwrap();
        assert!(!report.aimed);
    }

    #[test]
    fn degenerate_transform_faults_tick() {
        let (mut r, config) = setup();
        let cube = r.chain().cube_pivot;
        r.graph_mut().node_mut(cube).position = Vec3::splat(f32::NAN);
        let err = r
            .tick(Duration::from_millis(16), Vec2::ZERO, &config)
            .unwrap_err();
        assert!(matches!(err, SceneError::NonFinite { .. }));
    }

    #[test]
    fn long_run_stays_finite_and_aims() {
        let (mut r, config) = setup();
        let pointer = Vec2::new(0.6, -0.4);
        for _ in 0..300 {
            r.tick(Duration::from_millis(16), pointer, &config).unwrap();
        }
        let target = r.pointer_target(pointer).unwrap();
        let c = r.chain();
        let g = r.graph();
        let pointing = (g.world_rotation(c.tetra_mesh) * tetra_reference_direction()).normalize();
        let wanted = (target - g.world_position(c.tetra_pivot)).normalize();
        assert!(pointing.dot(wanted) > 0.99, "dot = {}", pointing.dot(wanted));
        assert!(r.axis_length() > 0.0);
    }

    #[test]
    fn config_camera_change_relayouts() {
        let (mut r, mut config) = setup();
        let before = r.layout().scale_factor;
        config.camera_distance = 40.0;
        r.tick(Duration::from_millis(16), Vec2::ZERO, &config).unwrap();
        assert!(r.layout().scale_factor > before);
        assert!((r.camera().distance() - 40.0).abs() < 1e-4);
    }
}
