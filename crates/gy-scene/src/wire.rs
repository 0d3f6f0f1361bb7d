use glam::{Mat4, Vec3, Vec4};
use gy_core::frame::FrameBuffer;

use crate::camera::PerspectiveCamera;
use crate::error::SceneError;
use crate::graph::SceneGraph;

/// Rasteriseur filaire logiciel avec test de profondeur.
///
/// Les lignes sont écrites de bas en haut (ligne 0 = bas), comme une relecture
/// de cible off-screen. Fond noir opaque.
pub struct WirePainter {
    width: u32,
    height: u32,
    /// NDC z par pixel, `INFINITY` = vide.
    depth: Vec<f32>,
}

/// Point projeté : coordonnées pixel (y vers le haut) et profondeur NDC.
#[derive(Clone, Copy, Debug)]
struct ScreenPoint {
    x: f32,
    y: f32,
    z: f32,
}

impl WirePainter {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; width as usize * height as usize],
        }
    }

    /// Efface `target` puis dessine toutes les arêtes des nœuds maillés.
    ///
    /// # Errors
    /// Returns [`SceneError::TargetMismatch`] if `target` is not
    /// `width × height`; the target is then left untouched.
    pub fn paint(
        &mut self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        target: &mut FrameBuffer,
    ) -> Result<(), SceneError> {
        if target.width != self.width || target.height != self.height {
            return Err(SceneError::TargetMismatch {
                expected_w: self.width,
                expected_h: self.height,
                actual_w: target.width,
                actual_h: target.height,
            });
        }
        target.fill((0, 0, 0, 255));
        self.depth.fill(f32::INFINITY);

        let view_proj = camera.view_projection();
        for (id, node) in graph.iter() {
            let Some(mesh) = node.mesh.as_ref() else {
                continue;
            };
            let mvp = view_proj * graph.world_matrix(id);
            for &(a, b) in &mesh.edges {
                let (Some(va), Some(vb)) = (mesh.vertices.get(a), mesh.vertices.get(b)) else {
                    continue;
                };
                self.draw_edge(&mvp, *va, *vb, mesh.color, target);
            }
        }
        Ok(())
    }

    fn draw_edge(&mut self, mvp: &Mat4, a: Vec3, b: Vec3, color: (u8, u8, u8), target: &mut FrameBuffer) {
        let ca = *mvp * a.extend(1.0);
        let cb = *mvp * b.extend(1.0);
        let Some((ca, cb)) = clip_near(ca, cb) else {
            return;
        };
        let pa = self.to_screen(ca);
        let pb = self.to_screen(cb);
        let Some((pa, pb)) = self.clip_to_viewport(pa, pb) else {
            return;
        };
        self.draw_line(pa, pb, color, target);
    }

    fn to_screen(&self, clip: Vec4) -> ScreenPoint {
        let ndc = clip.truncate() / clip.w;
        ScreenPoint {
            x: (ndc.x * 0.5 + 0.5) * self.width as f32,
            y: (ndc.y * 0.5 + 0.5) * self.height as f32,
            z: ndc.z,
        }
    }

    /// Liang–Barsky sur le rectangle `[0, width] × [0, height]`.
    fn clip_to_viewport(&self, a: ScreenPoint, b: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let w = self.width as f32;
        let h = self.height as f32;
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;
        for (p, q) in [(-dx, a.x), (dx, w - a.x), (-dy, a.y), (dy, h - a.y)] {
            if p.abs() < f32::EPSILON {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let lerp = |t: f32| ScreenPoint {
            x: a.x + dx * t,
            y: a.y + dy * t,
            z: a.z + (b.z - a.z) * t,
        };
        Some((lerp(t0), lerp(t1)))
    }

    /// DDA, un échantillon par pixel le long de l'axe majeur.
    fn draw_line(&mut self, a: ScreenPoint, b: ScreenPoint, color: (u8, u8, u8), target: &mut FrameBuffer) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.x + dx * t).floor();
            let y = (a.y + dy * t).floor();
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (px, py) = (x as u32, y as u32);
            if px >= self.width || py >= self.height {
                continue;
            }
            let z = a.z + (b.z - a.z) * t;
            let idx = py as usize * self.width as usize + px as usize;
            if z <= self.depth[idx] {
                self.depth[idx] = z;
                target.set_pixel(px, py, color);
            }
        }
    }
}

/// Découpe le segment contre le plan proche (`z + w ≥ 0` en clip space).
fn clip_near(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    let da = a.z + a.w;
    let db = b.z + b.w;
    match (da >= 0.0, db >= 0.0) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (true, false) => Some((a, a + (b - a) * (da / (da - db)))),
        (false, true) => Some((a + (b - a) * (da / (da - db)), b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Wireframe;

    fn lit_pixels(fb: &FrameBuffer) -> usize {
        fb.data
            .chunks_exact(4)
            .filter(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
            .count()
    }

    fn segment(a: Vec3, b: Vec3) -> Wireframe {
        Wireframe {
            vertices: vec![a, b],
            edges: vec![(0, 1)],
            color: (255, 255, 255),
        }
    }

    #[test]
    fn horizontal_segment_lands_on_middle_row() {
        let mut graph = SceneGraph::new();
        let n = graph.add_child(graph.root(), "seg");
        graph.node_mut(n).mesh = Some(segment(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)));
        let cam = PerspectiveCamera::new(45.0, 40.0 / 20.0, 20.0);
        let mut fb = FrameBuffer::new(40, 20);
        WirePainter::new(40, 20).paint(&graph, &cam, &mut fb).unwrap();
        assert!(lit_pixels(&fb) > 3);
        for y in 0..20 {
            for x in 0..40 {
                if fb.pixel(x, y).0 != 0 {
                    assert!(y == 9 || y == 10, "pixel allumé hors de la ligne médiane : {x},{y}");
                }
            }
        }
    }

    #[test]
    fn upper_geometry_fills_upper_rows_bottom_up() {
        let mut graph = SceneGraph::new();
        let n = graph.add_child(graph.root(), "seg");
        graph.node_mut(n).mesh = Some(segment(Vec3::new(-1.0, 4.0, 0.0), Vec3::new(1.0, 4.0, 0.0)));
        let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
        let mut fb = FrameBuffer::new(20, 20);
        WirePainter::new(20, 20).paint(&graph, &cam, &mut fb).unwrap();
        let mut rows = Vec::new();
        for y in 0..20 {
            if (0..20).any(|x| fb.pixel(x, y).0 != 0) {
                rows.push(y);
            }
        }
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| y >= 10), "rangées {rows:?}");
    }

    #[test]
    fn geometry_behind_camera_is_culled() {
        let mut graph = SceneGraph::new();
        let n = graph.add_child(graph.root(), "seg");
        graph.node_mut(n).mesh = Some(segment(Vec3::new(-1.0, 0.0, 30.0), Vec3::new(1.0, 0.0, 30.0)));
        let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
        let mut fb = FrameBuffer::new(20, 20);
        WirePainter::new(20, 20).paint(&graph, &cam, &mut fb).unwrap();
        assert_eq!(lit_pixels(&fb), 0);
    }

    #[test]
    fn segment_crossing_near_plane_is_clipped_not_dropped() {
        let mut graph = SceneGraph::new();
        let n = graph.add_child(graph.root(), "seg");
        graph.node_mut(n).mesh = Some(segment(Vec3::new(0.5, 0.5, 0.0), Vec3::new(0.5, 0.5, 40.0)));
        let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
        let mut fb = FrameBuffer::new(20, 20);
        WirePainter::new(20, 20).paint(&graph, &cam, &mut fb).unwrap();
        assert!(lit_pixels(&fb) > 0);
    }

    #[test]
    fn nearer_edge_wins_depth_test() {
        let mut graph = SceneGraph::new();
        let far = graph.add_child(graph.root(), "far");
        graph.node_mut(far).mesh = Some(Wireframe {
            vertices: vec![Vec3::new(-3.0, 0.0, -2.0), Vec3::new(3.0, 0.0, -2.0)],
            edges: vec![(0, 1)],
            color: (10, 10, 10),
        });
        let near = graph.add_child(graph.root(), "near");
        graph.node_mut(near).mesh = Some(Wireframe {
            vertices: vec![Vec3::new(0.0, -3.0, 2.0), Vec3::new(0.0, 3.0, 2.0)],
            edges: vec![(0, 1)],
            color: (200, 200, 200),
        });
        let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
        let mut fb = FrameBuffer::new(21, 21);
        WirePainter::new(21, 21).paint(&graph, &cam, &mut fb).unwrap();
        assert_eq!(fb.pixel(10, 10).0, 200);
    }

    #[test]
    fn mismatched_target_is_left_untouched() {
        let graph = SceneGraph::new();
        let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
        let mut fb = FrameBuffer::new(5, 5);
        let err = WirePainter::new(10, 10).paint(&graph, &cam, &mut fb).unwrap_err();
        assert!(matches!(err, SceneError::TargetMismatch { actual_w: 5, .. }));
        assert!(fb.data.iter().all(|&b| b == 0));
    }
}
