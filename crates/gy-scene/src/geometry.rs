use glam::Vec3;

/// Couleur du tétraèdre (#bfefff).
pub const TETRA_COLOR: (u8, u8, u8) = (0xbf, 0xef, 0xff);
/// Couleur du cube (#ffc0ea).
pub const CUBE_COLOR: (u8, u8, u8) = (0xff, 0xc0, 0xea);
/// Couleur du dodécaèdre (#d7ffb3).
pub const DODECA_COLOR: (u8, u8, u8) = (0xd7, 0xff, 0xb3);

/// Maillage filaire : sommets locaux, arêtes par paires d'indices, couleur
/// non éclairée.
#[derive(Clone, Debug, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<(usize, usize)>,
    pub color: (u8, u8, u8),
}

/// Direction du sommet de référence du tétraèdre (premier sommet émis par la
/// géométrie), avant mise à l'échelle par le rayon.
#[must_use]
pub fn tetra_reference_direction() -> Vec3 {
    Vec3::new(-1.0, -1.0, 1.0).normalize()
}

/// Tétraèdre régulier inscrit dans une sphère de rayon `radius`.
///
/// # Example
/// ```
/// use gy_scene::geometry::tetrahedron;
/// let t = tetrahedron(1.3);
/// assert_eq!(t.vertices.len(), 4);
/// assert_eq!(t.edges.len(), 6);
/// ```
#[must_use]
pub fn tetrahedron(radius: f32) -> Wireframe {
    let vertices: Vec<Vec3> = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .iter()
    .map(|v| v.normalize() * radius)
    .collect();
    Wireframe {
        edges: shortest_edges(&vertices),
        vertices,
        color: TETRA_COLOR,
    }
}

/// Cube centré d'arête `size`.
///
/// # Example
/// ```
/// use gy_scene::geometry::cube;
/// let c = cube(3.0);
/// assert_eq!(c.vertices.len(), 8);
/// assert_eq!(c.edges.len(), 12);
/// ```
#[must_use]
pub fn cube(size: f32) -> Wireframe {
    let h = size / 2.0;
    let mut vertices = Vec::with_capacity(8);
    for &x in &[-h, h] {
        for &y in &[-h, h] {
            for &z in &[-h, h] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    Wireframe {
        edges: shortest_edges(&vertices),
        vertices,
        color: CUBE_COLOR,
    }
}

/// Dodécaèdre régulier inscrit dans une sphère de rayon `radius`.
///
/// # Example
/// ```
/// use gy_scene::geometry::dodecahedron;
/// let d = dodecahedron(6.0);
/// assert_eq!(d.vertices.len(), 20);
/// assert_eq!(d.edges.len(), 30);
/// ```
#[must_use]
pub fn dodecahedron(radius: f32) -> Wireframe {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;
    let mut raw = Vec::with_capacity(20);
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                raw.push(Vec3::new(x, y, z));
            }
        }
    }
    for &a in &[-inv, inv] {
        for &b in &[-phi, phi] {
            raw.push(Vec3::new(0.0, a, b));
            raw.push(Vec3::new(a, b, 0.0));
            raw.push(Vec3::new(b, 0.0, a));
        }
    }
    let vertices: Vec<Vec3> = raw.iter().map(|v| v.normalize() * radius).collect();
    Wireframe {
        edges: shortest_edges(&vertices),
        vertices,
        color: DODECA_COLOR,
    }
}

/// Arêtes d'un polyèdre régulier : toutes les paires à la distance minimale.
fn shortest_edges(vertices: &[Vec3]) -> Vec<(usize, usize)> {
    let mut min = f32::INFINITY;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    let tolerance = min * 1e-3;
    let mut edges = Vec::new();
    for (i, a) in vertices.iter().enumerate() {
        for (j, b) in vertices.iter().enumerate().skip(i + 1) {
            if (a.distance(*b) - min).abs() <= tolerance {
                edges.push((i, j));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_lie_on_circumsphere() {
        for v in dodecahedron(6.0).vertices {
            assert!((v.length() - 6.0).abs() < 1e-4);
        }
        for v in tetrahedron(1.3).vertices {
            assert!((v.length() - 1.3).abs() < 1e-5);
        }
    }

    #[test]
    fn every_dodeca_vertex_has_three_edges() {
        let d = dodecahedron(1.0);
        for i in 0..d.vertices.len() {
            let degree = d.edges.iter().filter(|&&(a, b)| a == i || b == i).count();
            assert_eq!(degree, 3, "sommet {i}");
        }
    }

    #[test]
    fn reference_direction_is_a_tetra_vertex() {
        let t = tetrahedron(2.0);
        let r = tetra_reference_direction() * 2.0;
        assert!(t.vertices.iter().any(|v| (*v - r).length() < 1e-5));
    }

    #[test]
    fn cube_edges_have_side_length() {
        let c = cube(3.0);
        for &(a, b) in &c.edges {
            assert!((c.vertices[a].distance(c.vertices[b]) - 3.0).abs() < 1e-5);
        }
    }
}
