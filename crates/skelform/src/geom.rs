//! Planar helpers for side-constraint refinement.
//!
//! - `HalfPlane`: open half-plane `n · p < c`, built from a directed line.
//! - `Polygon`: simple polygon with even-odd membership and rejection sampling.
//! - `clip_box`: a box intersected with a half-plane, as an angle-ordered polygon.
//!
//! Orientation: "left of a → b" is the sign convention
//! `dx·(py − ay) − dy·(px − ax) < 0`, i.e. left when drawn with y pointing down.

use nalgebra::Vector2;

use crate::sampler::Sampler;
use crate::types::PlacementBox;

/// Open half-plane `n · p < c` (no normalization required here).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfPlane {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl HalfPlane {
    /// Points strictly left of the directed line `a → b`.
    #[inline]
    pub fn left_of(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        let d = b - a;
        let n = Vector2::new(-d.y, d.x);
        Self { n, c: n.dot(&a) }
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        self.n.dot(&p) < self.c
    }
}

/// `true` iff `p` lies strictly left of the directed line `a → b`.
#[inline]
pub fn to_left(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> bool {
    HalfPlane::left_of(a, b).contains(p)
}

/// Simple polygon given by its vertex cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub verts: Vec<Vector2<f64>>,
}

impl Polygon {
    /// Order `points` by angle around their vertex average to obtain a simple polygon.
    pub fn from_points_by_angle(mut points: Vec<Vector2<f64>>) -> Self {
        if let Some(c) = vertex_average(&points) {
            points.sort_by(|p, q| {
                let ap = (p.y - c.y).atan2(p.x - c.x);
                let aq = (q.y - c.y).atan2(q.x - c.x);
                ap.partial_cmp(&aq).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        Self { verts: points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Vertex average (not the area centroid).
    #[inline]
    pub fn centroid(&self) -> Option<Vector2<f64>> {
        vertex_average(&self.verts)
    }

    pub fn bounding_box(&self) -> Option<PlacementBox> {
        let first = self.verts.first()?;
        let init = PlacementBox::new(first.x, first.x, first.y, first.y);
        Some(self.verts.iter().skip(1).fold(init, |b, p| {
            PlacementBox::new(b.x0.min(p.x), b.x1.max(p.x), b.y0.min(p.y), b.y1.max(p.y))
        }))
    }

    /// Even-odd ray casting.
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        let n = self.verts.len();
        let mut inside = false;
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let (vi, vj) = (self.verts[i], self.verts[j]);
            if (vi.y > p.y) != (vj.y > p.y)
                && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Uniform point via rejection over the bounding box; centroid after `max_attempts` misses.
    pub fn sample<S: Sampler + ?Sized>(
        &self,
        sampler: &mut S,
        max_attempts: usize,
    ) -> Option<Vector2<f64>> {
        let bb = self.bounding_box()?;
        for _ in 0..max_attempts {
            let x = sampler.uniform(bb.x0, bb.x1);
            let y = sampler.uniform(bb.y0, bb.y1);
            let p = Vector2::new(x, y);
            if self.contains(p) {
                return Some(p);
            }
        }
        self.centroid()
    }
}

fn vertex_average(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Points where the line through `a` and `b` meets the edges of `bb`.
///
/// Only intersections inside the finite edge segments are kept. A line lying on
/// an edge contributes the overlap of the segment `a–b` with that edge.
pub fn line_box_intersections(a: Vector2<f64>, b: Vector2<f64>, bb: &PlacementBox) -> Vec<Vector2<f64>> {
    let d = b - a;
    let threshold = d.y * a.x - d.x * a.y;
    let mut out = Vec::with_capacity(4);
    for y in [bb.y0, bb.y1] {
        if d.y != 0.0 {
            let x = (threshold + d.x * y) / d.y;
            if x >= bb.x0 && x <= bb.x1 {
                out.push(Vector2::new(x, y));
            }
        } else if a.y == y && a.x.max(b.x) >= bb.x0 && a.x.min(b.x) <= bb.x1 {
            out.push(Vector2::new(bb.x0.max(a.x.min(b.x)), y));
            out.push(Vector2::new(bb.x1.min(a.x.max(b.x)), y));
        }
    }
    for x in [bb.x0, bb.x1] {
        if d.x != 0.0 {
            let y = (d.y * x - threshold) / d.x;
            if y >= bb.y0 && y <= bb.y1 {
                out.push(Vector2::new(x, y));
            }
        } else if a.x == x && a.y.max(b.y) >= bb.y0 && a.y.min(b.y) <= bb.y1 {
            out.push(Vector2::new(x, bb.y0.max(a.y.min(b.y))));
            out.push(Vector2::new(x, bb.y1.min(a.y.max(b.y))));
        }
    }
    out
}

/// Part of `bb` strictly left of `a → b`, closed by the cut points.
///
/// `None` when no corner is on the left side or fewer than 3 distinct vertices remain.
pub fn clip_box(bb: &PlacementBox, a: Vector2<f64>, b: Vector2<f64>) -> Option<Polygon> {
    let hp = HalfPlane::left_of(a, b);
    let mut pts: Vec<Vector2<f64>> = bb.corners().into_iter().filter(|c| hp.contains(*c)).collect();
    if pts.is_empty() {
        return None;
    }
    for p in line_box_intersections(a, b, bb) {
        if !pts.iter().any(|q| (q - p).norm() < 1e-12) {
            pts.push(p);
        }
    }
    if pts.len() < 3 {
        return None;
    }
    Some(Polygon::from_points_by_angle(pts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SeededSampler;
    use nalgebra::vector;

    #[test]
    fn left_side_sign_convention() {
        let a = vector![0.0, 0.0];
        let b = vector![1.0, 0.0];
        // dx·(py − ay) < 0 for py < 0.
        assert!(to_left(vector![0.5, -1.0], a, b));
        assert!(!to_left(vector![0.5, 1.0], a, b));
        assert!(!to_left(vector![0.5, 0.0], a, b));
    }

    #[test]
    fn even_odd_on_square() {
        let sq = Polygon::from_points_by_angle(PlacementBox::unit().corners().to_vec());
        assert!(sq.contains(vector![0.5, 0.5]));
        assert!(!sq.contains(vector![1.5, 0.5]));
        assert!(!sq.contains(vector![0.5, -0.1]));
    }

    #[test]
    fn diagonal_cut_gives_triangle() {
        // Line (0,1)→(1,0): the left side holds the corner (0,0) only.
        let bb = PlacementBox::unit();
        let poly = clip_box(&bb, vector![0.0, 1.0], vector![1.0, 0.0]);
        // Corner (0,0): dx·(0−1) − dy·(0−0) = −1 < 0 → left.
        let poly = poly.expect("triangle");
        assert_eq!(poly.len(), 3);
        assert!(poly.contains(vector![0.2, 0.2]));
        assert!(!poly.contains(vector![0.8, 0.8]));
    }

    #[test]
    fn vertical_cut_gives_half_box() {
        let bb = PlacementBox::new(0.0, 2.0, 0.0, 1.0);
        // Upward line at x=1: left side (y-down reading) is x > 1.
        let poly = clip_box(&bb, vector![1.0, 0.0], vector![1.0, 1.0]).expect("rect");
        assert_eq!(poly.len(), 4);
        let pb = poly.bounding_box().unwrap();
        assert_eq!(pb, PlacementBox::new(1.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn line_on_edge_uses_segment_overlap() {
        let bb = PlacementBox::unit();
        let pts = line_box_intersections(vector![0.25, 0.0], vector![0.75, 0.0], &bb);
        assert!(pts.contains(&vector![0.25, 0.0]));
        assert!(pts.contains(&vector![0.75, 0.0]));
    }

    #[test]
    fn infeasible_cut_is_none() {
        let bb = PlacementBox::unit();
        // Everything lies right of this line.
        assert!(clip_box(&bb, vector![5.0, 0.0], vector![5.0, 1.0]).is_none());
    }

    #[test]
    fn samples_stay_inside() {
        let poly = clip_box(&PlacementBox::unit(), vector![0.0, 1.0], vector![1.0, 0.0]).unwrap();
        let mut s = SeededSampler::from_seed(3);
        for _ in 0..50 {
            let p = poly.sample(&mut s, 1000).unwrap();
            assert!(poly.contains(p));
        }
    }
}
