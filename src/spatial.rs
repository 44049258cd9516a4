//! Neighbor search for proximity connections.
//!
//! The brute-force pass checks every unordered pair. The grid pass buckets
//! points into square cells at least one search radius wide, so every
//! pair closer than the radius lies in the same or an adjacent cell. Both
//! report the same set of pairs; only the order differs.

use glam::Vec2;

use crate::config::NeighborSearch;

/// Upper bound on cells per axis; cells grow past the radius beyond this.
const MAX_CELLS_PER_AXIS: usize = 1024;

/// A pair of point indices (`a < b`) and the distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

/// All pairs of `points` strictly closer than `radius`.
///
/// `extent` is the size of the box the points live in; it only matters
/// for the grid strategy.
pub fn pairs_within(points: &[Vec2], radius: f32, extent: Vec2, search: NeighborSearch) -> Vec<Pair> {
    if radius <= 0.0 || points.len() < 2 {
        return Vec::new();
    }
    match search {
        NeighborSearch::BruteForce => brute_force(points, radius),
        NeighborSearch::Grid => SpatialGrid::build(points, radius, extent).pairs_within(points, radius),
    }
}

fn brute_force(points: &[Vec2], radius: f32) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for (a, &pa) in points.iter().enumerate() {
        for (b, &pb) in points.iter().enumerate().skip(a + 1) {
            let distance = pa.distance(pb);
            if distance < radius {
                pairs.push(Pair { a, b, distance });
            }
        }
    }
    pairs
}

/// Uniform bucket grid over `[0, extent]`.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

/// Forward half of the 3x3 neighborhood, so each cell pair is visited once.
const FORWARD_NEIGHBORS: [(isize, isize); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

impl SpatialGrid {
    pub fn build(points: &[Vec2], radius: f32, extent: Vec2) -> Self {
        let extent = extent.max(Vec2::ZERO);
        let longest = extent.x.max(extent.y);
        let cell_size = radius.max(longest / MAX_CELLS_PER_AXIS as f32).max(f32::MIN_POSITIVE);
        let cols = ((extent.x / cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);
        let rows = ((extent.y / cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS);

        let mut grid = Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        };
        for (i, &p) in points.iter().enumerate() {
            let (cx, cy) = grid.cell_of(p);
            grid.cells[cy * cols + cx].push(i);
        }
        grid
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Cell containing `p`; out-of-box points land in the nearest edge cell.
    pub fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let to_index = |v: f32, len: usize| {
            let i = (v / self.cell_size).floor();
            if i.is_nan() || i < 0.0 {
                0
            } else {
                (i as usize).min(len - 1)
            }
        };
        (to_index(p.x, self.cols), to_index(p.y, self.rows))
    }

    pub fn pairs_within(&self, points: &[Vec2], radius: f32) -> Vec<Pair> {
        let mut pairs = Vec::new();
        let mut check = |i: usize, j: usize| {
            let distance = points[i].distance(points[j]);
            if distance < radius {
                let (a, b) = if i < j { (i, j) } else { (j, i) };
                pairs.push(Pair { a, b, distance });
            }
        };

        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let here = &self.cells[cy * self.cols + cx];
                for (n, &i) in here.iter().enumerate() {
                    for &j in &here[n + 1..] {
                        check(i, j);
                    }
                }
                for (dx, dy) in FORWARD_NEIGHBORS {
                    let nx = cx as isize + dx;
                    let ny = cy as isize + dy;
                    if nx < 0 || nx >= self.cols as isize || ny >= self.rows as isize {
                        continue;
                    }
                    let there = &self.cells[ny as usize * self.cols + nx as usize];
                    for &i in here {
                        for &j in there {
                            check(i, j);
                        }
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn sorted(mut pairs: Vec<Pair>) -> Vec<(usize, usize)> {
        pairs.sort_by_key(|p| (p.a, p.b));
        pairs.into_iter().map(|p| (p.a, p.b)).collect()
    }

    #[test]
    fn brute_force_finds_close_pair_only() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), Vec2::new(500.0, 0.0)];
        let pairs = pairs_within(&points, 150.0, Vec2::new(600.0, 10.0), NeighborSearch::BruteForce);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 1));
        assert!((pairs[0].distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn threshold_is_exclusive() {
        let points = [Vec2::ZERO, Vec2::new(150.0, 0.0)];
        for search in [NeighborSearch::BruteForce, NeighborSearch::Grid] {
            assert!(pairs_within(&points, 150.0, Vec2::new(200.0, 200.0), search).is_empty());
        }
    }

    #[test]
    fn grid_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(7);
        let extent = Vec2::new(1280.0, 720.0);
        let points: Vec<Vec2> = (0..300)
            .map(|_| Vec2::new(rng.gen_range(0.0..=extent.x), rng.gen_range(0.0..=extent.y)))
            .collect();
        let brute = sorted(pairs_within(&points, 150.0, extent, NeighborSearch::BruteForce));
        let grid = sorted(pairs_within(&points, 150.0, extent, NeighborSearch::Grid));
        assert!(!brute.is_empty());
        assert_eq!(brute, grid);
    }

    #[test]
    fn grid_handles_degenerate_extent() {
        let points = [Vec2::ZERO, Vec2::ZERO, Vec2::new(0.0, 1.0)];
        let pairs = pairs_within(&points, 5.0, Vec2::ZERO, NeighborSearch::Grid);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn grid_caps_cell_count() {
        let grid = SpatialGrid::build(&[], 0.001, Vec2::new(4096.0, 4096.0));
        let (cols, rows) = grid.dimensions();
        assert!(cols <= MAX_CELLS_PER_AXIS && rows <= MAX_CELLS_PER_AXIS);
        assert!(grid.cell_size() >= 4.0);
    }

    #[test]
    fn zero_radius_finds_nothing() {
        let points = [Vec2::ZERO, Vec2::ZERO];
        assert!(pairs_within(&points, 0.0, Vec2::ONE, NeighborSearch::Grid).is_empty());
    }
}
