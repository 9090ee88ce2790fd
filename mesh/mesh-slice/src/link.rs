//! Greedy chaining of intersection segments into closed contours.
//!
//! Chaining is order-sensitive: the seed is always the last
//! remaining segment, and each extension takes the earliest remaining segment
//! whose start touches the chain's tail, falling back to the earliest one whose
//! end does. The spatial hash only narrows the candidates; it never changes
//! which segment wins.

// Cell coordinates of millimeter-scale geometry fit comfortably in i64
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashMap;
use mesh_types::Point3;

use crate::layer::{planar_distance, Contour, Segment};
use crate::params::LinkParams;

/// Cross products below this fraction of `|a|·|b|` count as straight.
const COLLINEAR_EPS: f64 = 1e-6;

/// Result of linking one layer's segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkOutcome {
    /// Closed contours in the order they were completed.
    pub contours: Vec<Contour>,
    /// Chains that could not be closed.
    pub discarded: usize,
}

/// Chain segments into closed contours.
///
/// Zero-length segments are ignored. Chains whose ends stay further apart
/// than `params.tolerance` are dropped and counted in
/// [`LinkOutcome::discarded`].
///
/// # Example
///
/// ```
/// use mesh_slice::{link_segments, LinkParams, Segment};
/// use mesh_types::Point3;
///
/// let p = |x, y| Point3::new(x, y, 0.2);
/// let segments = [
///     Segment::new(p(0.0, 0.0), p(1.0, 0.0)),
///     Segment::new(p(0.0, 1.0), p(1.0, 1.0)),
///     Segment::new(p(1.0, 0.0), p(1.0, 1.0)),
///     Segment::new(p(0.0, 0.0), p(0.0, 1.0)),
/// ];
///
/// let outcome = link_segments(&segments, &LinkParams::default());
/// assert_eq!(outcome.contours.len(), 1);
/// assert_eq!(outcome.contours[0].corner_count(), 4);
/// ```
#[must_use]
pub fn link_segments(segments: &[Segment], params: &LinkParams) -> LinkOutcome {
    let tolerance = params.tolerance;
    let pool: Vec<Segment> = segments
        .iter()
        .copied()
        .filter(|s| s.length() > 0.0)
        .collect();

    let index = EndpointIndex::build(&pool, tolerance);
    let mut alive = vec![true; pool.len()];
    let mut outcome = LinkOutcome::default();

    while let Some(seed) = alive.iter().rposition(|&a| a) {
        alive[seed] = false;
        let mut chain = vec![pool[seed].start, pool[seed].end];

        loop {
            let tail = chain[chain.len() - 1];
            if let Some(i) = index.first_match(&index.starts, &pool, &alive, &tail, |s| s.start) {
                alive[i] = false;
                chain.push(pool[i].end);
            } else if let Some(i) = index.first_match(&index.ends, &pool, &alive, &tail, |s| s.end)
            {
                alive[i] = false;
                chain.push(pool[i].start);
            } else {
                break;
            }
        }

        let closed = planar_distance(&chain[0], &chain[chain.len() - 1]) < tolerance;
        if closed {
            let points = if params.merge_collinear {
                merge_collinear(&chain, tolerance)
            } else {
                chain
            };
            outcome.contours.push(Contour::new(points));
        } else {
            outcome.discarded += 1;
        }
    }

    outcome
}

/// Segment endpoints bucketed on a square grid with cell size = tolerance.
///
/// Any point within `tolerance` of a query lies in the query's cell or one of
/// its eight neighbors.
struct EndpointIndex {
    cell_size: f64,
    starts: HashMap<(i64, i64), Vec<usize>>,
    ends: HashMap<(i64, i64), Vec<usize>>,
}

impl EndpointIndex {
    fn build(pool: &[Segment], cell_size: f64) -> Self {
        let mut starts: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        let mut ends: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, seg) in pool.iter().enumerate() {
            starts.entry(cell_of(&seg.start, cell_size)).or_default().push(i);
            ends.entry(cell_of(&seg.end, cell_size)).or_default().push(i);
        }
        Self {
            cell_size,
            starts,
            ends,
        }
    }

    /// Lowest alive pool index whose selected endpoint is within tolerance of `p`.
    fn first_match(
        &self,
        cells: &HashMap<(i64, i64), Vec<usize>>,
        pool: &[Segment],
        alive: &[bool],
        p: &Point3<f64>,
        endpoint: impl Fn(&Segment) -> Point3<f64>,
    ) -> Option<usize> {
        let (cx, cy) = cell_of(p, self.cell_size);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &i in candidates {
                    if !alive[i] || best.is_some_and(|b| b <= i) {
                        continue;
                    }
                    if planar_distance(&endpoint(&pool[i]), p) < self.cell_size {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }
}

fn cell_of(p: &Point3<f64>, cell_size: f64) -> (i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}

/// Whether `b` sits on the straight run `a → b → c` (turning back is a corner).
fn is_straight(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> bool {
    let u = (b.x - a.x, b.y - a.y);
    let v = (c.x - b.x, c.y - b.y);
    let cross = u.0 * v.1 - u.1 * v.0;
    let dot = u.0 * v.0 + u.1 * v.1;
    let scale = u.0.hypot(u.1) * v.0.hypot(v.1);
    dot > 0.0 && cross.abs() <= COLLINEAR_EPS * scale
}

/// Drop repeated points and interior points of straight runs from a closed chain.
///
/// Returns the chain unchanged when fewer than three corners would remain.
fn merge_collinear(chain: &[Point3<f64>], tolerance: f64) -> Vec<Point3<f64>> {
    let ring = &chain[..chain.len() - 1];
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(ring.len() + 1);

    for p in ring {
        if out
            .last()
            .is_some_and(|last| planar_distance(last, p) < tolerance)
        {
            continue;
        }
        while out.len() >= 2 && is_straight(&out[out.len() - 2], &out[out.len() - 1], p) {
            out.pop();
        }
        out.push(*p);
    }

    // The seam between the last and first point
    while out.len() > 1 && planar_distance(&out[out.len() - 1], &out[0]) < tolerance {
        out.pop();
    }
    loop {
        let n = out.len();
        if n < 3 {
            break;
        }
        if is_straight(&out[n - 2], &out[n - 1], &out[0]) {
            out.pop();
        } else if is_straight(&out[n - 1], &out[0], &out[1]) {
            out.remove(0);
        } else {
            break;
        }
    }

    if out.len() < 3 {
        return chain.to_vec();
    }
    out.push(out[0]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3<f64> {
        Point3::new(x, y, 1.0)
    }

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(p(a.0, a.1), p(b.0, b.1))
    }

    /// Pool scan with no spatial index, kept to check the grid picks the same segments.
    fn link_naive(segments: &[Segment], tolerance: f64) -> (Vec<Vec<Point3<f64>>>, usize) {
        let mut pool: Vec<Segment> = segments.iter().copied().filter(|s| s.length() > 0.0).collect();
        let mut chains = Vec::new();
        let mut discarded = 0;
        while let Some(seed) = pool.pop() {
            let mut chain = vec![seed.start, seed.end];
            loop {
                let tail = chain[chain.len() - 1];
                if let Some(i) = pool.iter().position(|s| planar_distance(&s.start, &tail) < tolerance) {
                    chain.push(pool.remove(i).end);
                } else if let Some(i) = pool.iter().position(|s| planar_distance(&s.end, &tail) < tolerance) {
                    chain.push(pool.remove(i).start);
                } else {
                    break;
                }
            }
            if planar_distance(&chain[0], &chain[chain.len() - 1]) < tolerance {
                chains.push(chain);
            } else {
                discarded += 1;
            }
        }
        (chains, discarded)
    }

    fn unmerged() -> LinkParams {
        LinkParams {
            merge_collinear: false,
            ..LinkParams::default()
        }
    }

    #[test]
    fn square_with_mixed_directions() {
        let segments = [
            seg((0.0, 0.0), (5.0, 0.0)),
            seg((5.0, 5.0), (5.0, 0.0)),
            seg((0.0, 5.0), (5.0, 5.0)),
            seg((0.0, 5.0), (0.0, 0.0)),
        ];
        let outcome = link_segments(&segments, &unmerged());
        assert_eq!(outcome.discarded, 0);
        assert_eq!(outcome.contours.len(), 1);

        let c = &outcome.contours[0];
        // Seeded from the last segment
        assert_eq!(c.points[0], p(0.0, 5.0));
        assert_eq!(c.points[1], p(0.0, 0.0));
        assert_eq!(c.corner_count(), 4);
        assert_relative_eq!(c.area(), 25.0);
    }

    #[test]
    fn open_chain_is_discarded() {
        let segments = [seg((0.0, 0.0), (1.0, 0.0)), seg((1.0, 0.0), (1.0, 1.0))];
        let outcome = link_segments(&segments, &LinkParams::default());
        assert!(outcome.contours.is_empty());
        assert_eq!(outcome.discarded, 1);
    }

    #[test]
    fn endpoints_within_tolerance_join() {
        let segments = [
            seg((0.0, 0.0), (2.0, 0.0)),
            seg((2.0004, 0.0), (2.0, 2.0)),
            seg((2.0, 2.0), (0.0, 0.0003)),
        ];
        let outcome = link_segments(&segments, &unmerged());
        assert_eq!(outcome.contours.len(), 1);
        assert!(outcome.contours[0].is_closed(1e-3));
    }

    #[test]
    fn zero_length_segments_ignored() {
        let segments = [
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((3.0, 3.0), (3.0, 3.0)),
            seg((1.0, 0.0), (0.0, 1.0)),
            seg((0.0, 1.0), (0.0, 0.0)),
        ];
        let outcome = link_segments(&segments, &LinkParams::default());
        assert_eq!(outcome.contours.len(), 1);
        assert_eq!(outcome.discarded, 0);
    }

    #[test]
    fn collinear_runs_merge_to_corners() {
        // Square edges split into two pieces each
        let segments = [
            seg((0.0, 0.0), (2.0, 0.0)),
            seg((2.0, 0.0), (4.0, 0.0)),
            seg((4.0, 0.0), (4.0, 2.0)),
            seg((4.0, 2.0), (4.0, 4.0)),
            seg((4.0, 4.0), (2.0, 4.0)),
            seg((2.0, 4.0), (0.0, 4.0)),
            seg((0.0, 4.0), (0.0, 2.0)),
            seg((0.0, 2.0), (0.0, 0.0)),
        ];
        let raw = link_segments(&segments, &unmerged());
        assert_eq!(raw.contours[0].corner_count(), 8);

        let merged = link_segments(&segments, &LinkParams::default());
        let c = &merged.contours[0];
        assert_eq!(c.corner_count(), 4);
        assert_eq!(c.points.first(), c.points.last());
        assert_relative_eq!(c.perimeter(), 16.0);
        assert_relative_eq!(c.area(), 16.0);
    }

    #[test]
    fn two_islands() {
        let square = |x: f64| {
            [
                seg((x, 0.0), (x + 1.0, 0.0)),
                seg((x + 1.0, 0.0), (x + 1.0, 1.0)),
                seg((x + 1.0, 1.0), (x, 1.0)),
                seg((x, 1.0), (x, 0.0)),
            ]
        };
        let mut segments = square(0.0).to_vec();
        segments.extend(square(10.0));

        let outcome = link_segments(&segments, &LinkParams::default());
        assert_eq!(outcome.contours.len(), 2);
        // Last segment belongs to the second island, so it is found first
        assert!(outcome.contours[0].points[0].x >= 10.0);
    }

    #[test]
    fn grid_matches_naive_scan() {
        // Shuffled, reversed and touching segments around a shared vertex
        let segments = [
            seg((0.0, 0.0), (1.0, 0.0)),
            seg((1.0, 1.0), (1.0, 0.0)),
            seg((2.0, 1.0), (1.0, 1.0)),
            seg((1.0, 1.0), (0.0, 1.0)),
            seg((0.0, 1.0), (0.0, 0.0)),
            seg((2.0, 2.0), (2.0, 1.0)),
            seg((1.0, 1.0), (2.0, 2.0)),
            seg((5.0, 5.0), (6.0, 5.0)),
            seg((0.0005, 0.0), (0.5, -1.0)),
            seg((0.5, -1.0), (0.0, 0.0)),
        ];
        let tolerance = 1e-3;
        let (chains, discarded) = link_naive(&segments, tolerance);
        let outcome = link_segments(
            &segments,
            &LinkParams {
                tolerance,
                merge_collinear: false,
            },
        );

        assert_eq!(outcome.discarded, discarded);
        let linked: Vec<Vec<Point3<f64>>> =
            outcome.contours.into_iter().map(|c| c.points).collect();
        assert_eq!(linked, chains);
    }

    #[test]
    fn merge_keeps_degenerate_chain() {
        // Out and back along one line: nothing to merge into a polygon
        let chain = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)];
        assert_eq!(merge_collinear(&chain, 1e-3), chain.to_vec());
    }
}
