use crate::error::GeometryError;

/// A 2D point, or a 3D landmark projected onto the image plane.
pub type Point2 = (f64, f64);

// Rays shorter than this are treated as zero length.
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Angle at vertex `b` between rays `b->a` and `b->c`, in degrees within [0, 180].
///
/// Uses the arctangent difference of the two rays, folding reflex results back
/// below 180. Fails when either ray has no length, since the angle is undefined.
pub fn angle(a: Point2, b: Point2, c: Point2) -> Result<f64, GeometryError> {
    let finite = [a.0, a.1, b.0, b.1, c.0, c.1]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(GeometryError::NonFinite);
    }

    if ray_length(a, b) < MIN_RAY_LENGTH {
        return Err(GeometryError::Degenerate("first point"));
    }
    if ray_length(c, b) < MIN_RAY_LENGTH {
        return Err(GeometryError::Degenerate("third point"));
    }

    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let mut degrees = (radians * 180.0 / std::f64::consts::PI).abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    Ok(degrees.clamp(0.0, 180.0))
}

fn ray_length(p: Point2, vertex: Point2) -> f64 {
    (p.0 - vertex.0).hypot(p.1 - vertex.1)
}
