//! Geometric predicates on tetrahedra
//!
//! Plain floating point implementations. Callers are expected to apply their
//! own tolerances, since what counts as "on" a face or sphere depends on the
//! scale of the data.

// external crates
use nalgebra::{Matrix3, Vector3};

/// Six times the signed volume of the tetrahedron (a, b, c, d)
///
/// Positive when `d` lies below the plane of (a, b, c) as seen with (a, b, c)
/// ordered anti-clockwise, zero for coplanar points.
///
/// ```rust
/// # use thermofit_delaunay::orient3d;
/// # use nalgebra::Vector3;
/// let a = Vector3::new(1.0, 0.0, 0.0);
/// let b = Vector3::new(0.0, 1.0, 0.0);
/// let c = Vector3::new(0.0, 0.0, 1.0);
/// let d = Vector3::new(0.0, 0.0, 0.0);
/// assert_eq!(orient3d(&a, &b, &c, &d), 1.0);
/// assert_eq!(orient3d(&b, &a, &c, &d), -1.0);
/// ```
pub fn orient3d(a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>, d: &Vector3<f64>) -> f64 {
    (a - d).dot(&(b - d).cross(&(c - d)))
}

/// Orientation scaled by the lengths of the three edges meeting at `d`
///
/// Dimensionless, so a single tolerance can be used regardless of the units
/// or spacing of the point cloud. Zero if any edge has zero length.
pub fn normalised_orient3d(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    c: &Vector3<f64>,
    d: &Vector3<f64>,
) -> f64 {
    let (u, v, w) = (a - d, b - d, c - d);
    let scale = u.norm() * v.norm() * w.norm();
    if scale == 0.0 {
        return 0.0;
    }
    u.dot(&v.cross(&w)) / scale
}

/// Circumscribed sphere of a tetrahedron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Circumcentre
    pub centre: Vector3<f64>,
    /// Squared circumradius
    pub radius_squared: f64,
}

impl Sphere {
    /// Sphere through the four vertices, `None` for flat tetrahedra
    ///
    /// Solves for the circumcentre relative to `a`, where each row of the
    /// system is the perpendicular bisector plane of an edge from `a`.
    ///
    /// ```rust
    /// # use thermofit_delaunay::Sphere;
    /// # use nalgebra::Vector3;
    /// let sphere = Sphere::circumscribe(
    ///     &Vector3::new(0.0, 0.0, 0.0),
    ///     &Vector3::new(2.0, 0.0, 0.0),
    ///     &Vector3::new(0.0, 2.0, 0.0),
    ///     &Vector3::new(0.0, 0.0, 2.0),
    /// )
    /// .unwrap();
    ///
    /// assert!((sphere.centre - Vector3::new(1.0, 1.0, 1.0)).norm() < 1e-12);
    /// assert!((sphere.radius_squared - 3.0).abs() < 1e-12);
    /// ```
    pub fn circumscribe(
        a: &Vector3<f64>,
        b: &Vector3<f64>,
        c: &Vector3<f64>,
        d: &Vector3<f64>,
    ) -> Option<Sphere> {
        let (ab, ac, ad) = (b - a, c - a, d - a);
        let system = Matrix3::from_rows(&[ab.transpose(), ac.transpose(), ad.transpose()]);
        let rhs = Vector3::new(ab.norm_squared(), ac.norm_squared(), ad.norm_squared()) * 0.5;

        let offset = system.lu().solve(&rhs)?;
        if !offset.iter().all(|x| x.is_finite()) {
            return None;
        }

        Some(Sphere {
            centre: a + offset,
            radius_squared: offset.norm_squared(),
        })
    }

    /// Point inside or on the sphere, within a relative tolerance on r²
    pub fn contains(&self, point: &Vector3<f64>, tolerance: f64) -> bool {
        (point - self.centre).norm_squared() <= self.radius_squared * (1.0 + tolerance)
    }
}

/// Barycentric coordinates of `r` in the tetrahedron (p0, p1, p2, p3)
///
/// The first three weights come from an LU solve of
/// `[p0 - p3 | p1 - p3 | p2 - p3] b = r - p3`, and the last is whatever is
/// left to make them sum to one. Returns `None` for a singular tetrahedron.
///
/// ```rust
/// # use thermofit_delaunay::barycentric;
/// # use nalgebra::Vector3;
/// let weights = barycentric(
///     &Vector3::new(0.0, 0.0, 0.0),
///     &Vector3::new(1.0, 0.0, 0.0),
///     &Vector3::new(0.0, 1.0, 0.0),
///     &Vector3::new(0.0, 0.0, 1.0),
///     &Vector3::new(0.25, 0.25, 0.25),
/// )
/// .unwrap();
///
/// for w in weights {
///     assert!((w - 0.25).abs() < 1e-12);
/// }
/// ```
pub fn barycentric(
    p0: &Vector3<f64>,
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    p3: &Vector3<f64>,
    r: &Vector3<f64>,
) -> Option<[f64; 4]> {
    let edges = Matrix3::from_columns(&[p0 - p3, p1 - p3, p2 - p3]);
    let b = edges.lu().solve(&(r - p3))?;

    if !b.iter().all(|x| x.is_finite()) {
        return None;
    }

    Some([b.x, b.y, b.z, 1.0 - b.x - b.y - b.z])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vector3<f64> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn orient_coplanar() {
        let o = orient3d(
            &v(0.0, 0.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &v(0.0, 1.0, 0.0),
            &v(0.3, 0.7, 0.0),
        );
        assert_eq!(o, 0.0);
    }

    #[test]
    fn normalised_orient_is_scale_free() {
        let small = normalised_orient3d(
            &v(1e-6, 0.0, 0.0),
            &v(0.0, 1e-6, 0.0),
            &v(0.0, 0.0, 1e-6),
            &v(0.0, 0.0, 0.0),
        );
        let large = normalised_orient3d(
            &v(1e6, 0.0, 0.0),
            &v(0.0, 1e6, 0.0),
            &v(0.0, 0.0, 1e6),
            &v(0.0, 0.0, 0.0),
        );
        assert!((small - 1.0).abs() < 1e-12);
        assert!((large - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_tetrahedron_has_no_sphere() {
        let sphere = Sphere::circumscribe(
            &v(0.0, 0.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &v(0.0, 1.0, 0.0),
            &v(1.0, 1.0, 0.0),
        );
        assert!(sphere.is_none());
    }

    #[test]
    fn sphere_contains_vertices() {
        let (a, b, c, d) = (
            v(0.1, 0.0, 0.3),
            v(1.0, 0.2, 0.0),
            v(0.0, 1.0, 0.1),
            v(0.2, 0.1, 1.0),
        );
        let sphere = Sphere::circumscribe(&a, &b, &c, &d).unwrap();
        for p in [a, b, c, d] {
            assert!(sphere.contains(&p, 1e-12));
        }
        assert!(!sphere.contains(&v(5.0, 5.0, 5.0), 1e-12));
    }

    #[test]
    fn barycentric_vertices_and_outside() {
        let (p0, p1, p2, p3) = (
            v(0.0, 0.0, 0.0),
            v(2.0, 0.0, 0.0),
            v(0.0, 2.0, 0.0),
            v(0.0, 0.0, 2.0),
        );

        let at_p1 = barycentric(&p0, &p1, &p2, &p3, &p1).unwrap();
        assert!((at_p1[1] - 1.0).abs() < 1e-12);
        assert!(at_p1[0].abs() < 1e-12 && at_p1[2].abs() < 1e-12 && at_p1[3].abs() < 1e-12);

        let outside = barycentric(&p0, &p1, &p2, &p3, &v(3.0, 3.0, 3.0)).unwrap();
        assert!(outside.iter().any(|w| *w < 0.0));
        assert!((outside.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn barycentric_singular() {
        let flat = barycentric(
            &v(0.0, 0.0, 0.0),
            &v(1.0, 0.0, 0.0),
            &v(0.0, 1.0, 0.0),
            &v(1.0, 1.0, 0.0),
            &v(0.5, 0.5, 0.0),
        );
        assert!(flat.is_none());
    }
}
