//! Arc-length parameterization of a chain of circular arcs.
//!
//! A boundary `p0, p1, ..., p2n` is read as `n` arcs `(p0 p1 p2)`,
//! `(p2 p3 p4)`, ... each passing through its middle point. Sampling walks
//! the chain by arc length, so samples are evenly spaced along the curve
//! regardless of how unevenly the points were taught.

use nalgebra::Vector3;
use polishkit_core::geometry::{axis_angle_to_matrix, circumcenter, unit};
use polishkit_core::{GeometryError, Result};

/// One arc of the chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    /// Circle center
    pub center: Vector3<f64>,
    /// Circle radius
    pub radius: f64,
    /// Unit rotation axis, oriented so the arc runs counter-clockwise about it
    pub axis: Vector3<f64>,
    /// Vector from the center to the arc start
    pub start: Vector3<f64>,
    /// Length of the arc start→middle
    pub first_length: f64,
    /// Length of the whole arc
    pub length: f64,
}

impl ArcSegment {
    /// Arc from `a` through `m` to `b`
    pub fn through(a: &Vector3<f64>, m: &Vector3<f64>, b: &Vector3<f64>) -> Result<Self> {
        let center = circumcenter(a, m, b)?;
        let axis = unit(&(m - a).cross(&(b - a)), "arc plane normal")?;
        let oa = a - center;
        let om = m - center;
        let ob = b - center;
        let radius = oa.norm();

        let first = swept_angle(&oa, &om, &axis);
        let second = swept_angle(&om, &ob, &axis);

        Ok(Self {
            center,
            radius,
            axis,
            start: oa,
            first_length: first * radius,
            length: (first + second) * radius,
        })
    }

    /// Point at arc length `s` from the start, with its radial vector
    pub fn at(&self, s: f64) -> Result<(Vector3<f64>, Vector3<f64>)> {
        if self.radius <= 0.0 {
            return Err(GeometryError::DegenerateArc {
                reason: "zero radius".to_string(),
            }
            .into());
        }
        let angle = (s / self.radius).to_degrees();
        let radial = axis_angle_to_matrix(&self.axis, angle)? * self.start;
        Ok((self.center + radial, radial))
    }
}

/// Counter-clockwise angle from `from` to `to` about `axis`, in `[0, 2π)`
fn swept_angle(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let angle = from.cross(to).dot(axis).atan2(from.dot(to));
    if angle < 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}

/// A sample on the chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSample {
    /// Point on the curve
    pub point: Vector3<f64>,
    /// Vector from the arc center to the point
    pub radial: Vector3<f64>,
    /// Index of the arc the sample lies on
    pub segment: usize,
}

/// Consecutive arcs sharing end points
#[derive(Debug, Clone, PartialEq)]
pub struct ArcChain {
    segments: Vec<ArcSegment>,
    total: f64,
}

impl ArcChain {
    /// Chain through `points`, which must have odd length of at least 3
    pub fn through(points: &[Vector3<f64>]) -> Result<Self> {
        if points.len() < 3 || points.len() % 2 == 0 {
            return Err(GeometryError::DegenerateArc {
                reason: format!("{} boundary points cannot form arcs", points.len()),
            }
            .into());
        }

        let segments = points
            .windows(3)
            .step_by(2)
            .map(|w| ArcSegment::through(&w[0], &w[1], &w[2]))
            .collect::<Result<Vec<_>>>()?;
        let total = segments.iter().map(|s| s.length).sum();

        Ok(Self { segments, total })
    }

    /// Arcs in order
    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }

    /// First arc
    pub fn first(&self) -> &ArcSegment {
        // `through` guarantees at least one segment
        &self.segments[0]
    }

    /// Total length of the chain
    pub fn total_length(&self) -> f64 {
        self.total
    }

    /// Sample at arc length `s`, clamped to the chain
    pub fn sample_at(&self, s: f64) -> Result<ArcSample> {
        let (last, init) = self
            .segments
            .split_last()
            .ok_or_else(|| GeometryError::DegenerateArc {
                reason: "empty chain".to_string(),
            })?;

        let mut remaining = s.clamp(0.0, self.total);
        for (index, segment) in init.iter().enumerate() {
            if remaining <= segment.length {
                let (point, radial) = segment.at(remaining)?;
                return Ok(ArcSample {
                    point,
                    radial,
                    segment: index,
                });
            }
            remaining -= segment.length;
        }

        let (point, radial) = last.at(remaining.min(last.length))?;
        Ok(ArcSample {
            point,
            radial,
            segment: init.len(),
        })
    }

    /// `divisions + 1` samples evenly spaced by arc length, ends included
    pub fn sample(&self, divisions: usize) -> Result<Vec<ArcSample>> {
        if divisions == 0 {
            return Ok(vec![self.sample_at(0.0)?]);
        }
        let step = self.total / divisions as f64;
        (0..=divisions)
            .map(|i| self.sample_at(step * i as f64))
            .collect()
    }
}
