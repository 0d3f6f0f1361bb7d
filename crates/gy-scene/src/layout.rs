use glam::Vec3;

/// Taille de référence du dodécaèdre avant mise à l'échelle.
pub const BASE_SIZE: f32 = 6.0;
/// Part maximale du frustum occupée par le dodécaèdre.
pub const FILL_RATIO: f32 = 0.8;
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 4.0;

/// Tailles des formes dérivées des dimensions du viewport.
///
/// # Example
/// ```
/// use gy_scene::layout::ViewportLayout;
/// let layout = ViewportLayout::compute(240.0, 96.0, 45.0, 20.0);
/// assert!((layout.scale_factor - 2.2091).abs() < 1e-3);
/// assert!((layout.cube_size - 3.0 * layout.scale_factor).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportLayout {
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
    /// Facteur uniforme, borné à [`MIN_SCALE`, `MAX_SCALE`].
    pub scale_factor: f32,
    /// Rayon du dodécaèdre (`BASE_SIZE × scale`).
    pub dodeca_radius: f32,
    /// Arête du cube (`3 × scale`).
    pub cube_size: f32,
    /// Rayon du tétraèdre (`1.3 × scale`).
    pub tetra_radius: f32,
}

impl ViewportLayout {
    /// Calcule la mise à l'échelle pour un viewport `width × height`, une
    /// caméra de champ vertical `fov_degrees` placée à `camera_distance`.
    ///
    /// Les dimensions non finies ou inférieures à 1 sont ramenées à 1.
    #[must_use]
    pub fn compute(width: f32, height: f32, fov_degrees: f32, camera_distance: f32) -> Self {
        let width = sanitize(width);
        let height = sanitize(height);
        let aspect = width / height;

        let visible_height = 2.0 * (fov_degrees.to_radians() / 2.0).tan() * camera_distance;
        let visible_width = visible_height * aspect;

        let scale_y = visible_height * FILL_RATIO / BASE_SIZE;
        let scale_x = visible_width * FILL_RATIO / BASE_SIZE;

        let raw = scale_x.min(scale_y);
        let scale_factor = if raw.is_finite() {
            raw.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        };

        Self {
            width,
            height,
            aspect,
            scale_factor,
            dodeca_radius: BASE_SIZE * scale_factor,
            cube_size: 3.0 * scale_factor,
            tetra_radius: 1.3 * scale_factor,
        }
    }

    /// Décalage local du pivot du tétraèdre : posé sur la face +Z du cube.
    #[must_use]
    pub fn tetra_offset(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.cube_size / 2.0 + self.tetra_radius / 2.0)
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() && v >= 1.0 { v } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_clamped_for_extreme_viewports() {
        let cases = [
            (1.0, 1.0),
            (1.0, 10_000.0),
            (10_000.0, 1.0),
            (0.0, 0.0),
            (f32::NAN, 40.0),
            (f32::INFINITY, f32::INFINITY),
            (-5.0, 12.0),
            (1e30, 1e-30),
        ];
        for (w, h) in cases {
            for (fov, dist) in [(45.0, 20.0), (10.0, 5.0), (120.0, 100.0)] {
                let l = ViewportLayout::compute(w, h, fov, dist);
                assert!(
                    (MIN_SCALE..=MAX_SCALE).contains(&l.scale_factor),
                    "{w}×{h} fov {fov} → {}",
                    l.scale_factor
                );
            }
        }
    }

    #[test]
    fn tall_viewport_is_width_limited() {
        let tall = ViewportLayout::compute(100.0, 800.0, 45.0, 20.0);
        let wide = ViewportLayout::compute(400.0, 100.0, 45.0, 20.0);
        assert!(tall.scale_factor < wide.scale_factor);
        assert!((tall.scale_factor - MIN_SCALE).abs() < 1e-6);
    }

    #[test]
    fn far_camera_hits_upper_bound() {
        let l = ViewportLayout::compute(200.0, 100.0, 120.0, 100.0);
        assert!((l.scale_factor - MAX_SCALE).abs() < 1e-6);
    }

    #[test]
    fn tetra_sits_on_cube_face() {
        let l = ViewportLayout::compute(240.0, 96.0, 45.0, 20.0);
        let off = l.tetra_offset();
        assert!((off.z - (l.cube_size + l.tetra_radius) / 2.0).abs() < 1e-6);
        assert_eq!(off.x, 0.0);
    }
}
