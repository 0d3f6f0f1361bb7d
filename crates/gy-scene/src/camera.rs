use glam::{Mat4, Vec2, Vec3};

/// Caméra perspective regardant une cible, up = +Y.
///
/// # Example
/// ```
/// use gy_scene::camera::PerspectiveCamera;
/// let cam = PerspectiveCamera::new(45.0, 2.5, 20.0);
/// assert!((cam.distance() - 20.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Champ vertical, en degrés.
    pub fov_degrees: f32,
    /// Largeur / hauteur du viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    /// Caméra placée en `(0, 0, distance)` regardant l'origine.
    #[must_use]
    pub fn new(fov_degrees: f32, aspect: f32, distance: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection OpenGL (NDC z ∈ [-1, 1]).
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Distance de la caméra à sa cible.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Rayon partant de la caméra et passant par le point NDC `ndc`.
    ///
    /// # Example
    /// ```
    /// use gy_scene::camera::PerspectiveCamera;
    /// use glam::{Vec2, Vec3};
    /// let cam = PerspectiveCamera::new(45.0, 1.0, 20.0);
    /// let ray = cam.ray_from_ndc(Vec2::ZERO);
    /// assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    /// ```
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or_zero(),
        }
    }
}

/// Rayon paramétrique `origin + t·direction`, `t ≥ 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Plan `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    #[must_use]
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Distance signée d'un point au plan.
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

impl Ray {
    /// Intersection avec un plan.
    ///
    /// `None` si le rayon est parallèle au plan (et hors du plan), si
    /// l'intersection est derrière l'origine, ou si le résultat n'est pas fini.
    ///
    /// # Example
    /// ```
    /// use gy_scene::camera::{Plane, Ray};
    /// use glam::Vec3;
    /// let plane = Plane::new(Vec3::Z, -3.5);
    /// let down = Ray { origin: Vec3::new(0.0, 0.0, 20.0), direction: Vec3::NEG_Z };
    /// assert_eq!(down.intersect_plane(&plane), Some(Vec3::new(0.0, 0.0, 3.5)));
    /// let parallel = Ray { origin: Vec3::new(0.0, 0.0, 20.0), direction: Vec3::X };
    /// assert_eq!(parallel.intersect_plane(&plane), None);
    /// ```
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < f32::EPSILON {
            return (plane.distance_to_point(self.origin).abs() < f32::EPSILON)
                .then_some(self.origin);
        }
        let t = -plane.distance_to_point(self.origin) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        let hit = self.origin + self.direction * t;
        hit.is_finite().then_some(hit)
    }
}
