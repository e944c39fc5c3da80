//! Circle and sphere fitting through taught points.

use crate::error::GeometryError;
use nalgebra::Vector3;

/// Relative tolerance for collinearity and coplanarity checks
pub const DEGENERACY_EPSILON: f64 = 1e-12;

/// Center of the circle through three points.
///
/// Returns [`GeometryError::Collinear`] when the points do not span a plane.
pub fn circumcenter(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    c: &Vector3<f64>,
) -> Result<Vector3<f64>, GeometryError> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let n2 = n.norm_squared();

    if n2 <= DEGENERACY_EPSILON * ab.norm_squared() * ac.norm_squared() {
        return Err(GeometryError::Collinear);
    }

    let to_center = (n.cross(&ab) * ac.norm_squared() + ac.cross(&n) * ab.norm_squared())
        / (2.0 * n2);
    Ok(a + to_center)
}

/// Center of the sphere through four points.
///
/// The center lies on the line through the circumcenter of `a, b, c` along
/// the plane normal, at the height where it is as far from `d` as from `a`.
pub fn spherecenter(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    c: &Vector3<f64>,
    d: &Vector3<f64>,
) -> Result<Vector3<f64>, GeometryError> {
    let o = circumcenter(a, b, c)?;
    let normal = (b - a).cross(&(c - a)).normalize();

    let r2 = (a - o).norm_squared();
    let od = d - o;
    // signed distance of d to the circle plane
    let h = normal.dot(&od);
    // squared distance of d to the normal line through o
    let rho2 = od.norm_squared() - h * h;

    if h.abs() <= DEGENERACY_EPSILON.sqrt() * r2.sqrt().max(1.0) {
        return Err(GeometryError::Coplanar);
    }

    let t = (rho2 + h * h - r2) / (2.0 * h);
    Ok(o + normal * t)
}

/// Component of `v` orthogonal to `direction`.
///
/// A zero direction leaves `v` unchanged.
pub fn reject(v: &Vector3<f64>, direction: &Vector3<f64>) -> Vector3<f64> {
    let d2 = direction.norm_squared();
    if d2 == 0.0 {
        return *v;
    }
    v - direction * (v.dot(direction) / d2)
}

/// Unit vector of `v`, or [`GeometryError::ZeroLength`] naming `what`.
pub fn unit(v: &Vector3<f64>, what: &str) -> Result<Vector3<f64>, GeometryError> {
    v.try_normalize(0.0)
        .filter(|u| u.iter().all(|c| c.is_finite()))
        .ok_or_else(|| GeometryError::ZeroLength {
            what: what.to_string(),
        })
}

/// Unit vector of `v`, or zero when `v` is zero
pub fn unit_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Angle between two vectors in radians, clamped against rounding
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circumcenter_reference_points() {
        let a = Vector3::new(1945.180, 103.261, 742.669);
        let b = Vector3::new(2054.380, -349.238, 1246.420);
        let c = Vector3::new(1812.530, -488.013, 731.441);
        let o = circumcenter(&a, &b, &c).unwrap();

        let ra = (a - o).norm();
        let rb = (b - o).norm();
        let rc = (c - o).norm();
        assert!((ra - rb).abs() < 1e-6);
        assert!((ra - rc).abs() < 1e-6);
        // Center lies in the plane of the three points
        let n = (b - a).cross(&(c - a)).normalize();
        assert!(n.dot(&(o - a)).abs() < 1e-6);
    }

    #[test]
    fn test_circumcenter_unit_circle() {
        let o = circumcenter(
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();
        assert!(o.norm() < 1e-12);
    }

    #[test]
    fn test_circumcenter_collinear() {
        let r = circumcenter(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
            &Vector3::new(2.0, 2.0, 2.0),
        );
        assert_eq!(r, Err(GeometryError::Collinear));
    }

    #[test]
    fn test_spherecenter_reference_points() {
        let a = Vector3::new(1428.600, 1075.290, 1689.900);
        let b = Vector3::new(1261.610, -8.888, 1967.420);
        let c = Vector3::new(1143.090, 1136.160, 1084.010);
        let d = Vector3::new(812.207, -596.970, 1014.130);
        let s = spherecenter(&a, &b, &c, &d).unwrap();

        let ra = (a - s).norm();
        for p in [b, c, d] {
            assert!(((p - s).norm() - ra).abs() < 1e-5);
        }
    }

    #[test]
    fn test_spherecenter_coplanar() {
        let r = spherecenter(
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(-1.0, 0.0, 0.0),
            &Vector3::new(0.0, -1.0, 0.0),
        );
        assert_eq!(r, Err(GeometryError::Coplanar));
    }

    #[test]
    fn test_reject() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        let r = reject(&v, &Vector3::new(2.0, 0.0, 0.0));
        assert!((r - Vector3::new(0.0, 4.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(&Vector3::x(), &Vector3::y());
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(angle_between(&Vector3::zeros(), &Vector3::y()), 0.0);
    }
}
