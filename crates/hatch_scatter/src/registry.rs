//! Uniform-bucket spatial hash enforcing minimum separation between placed points.
//!
//! Every accepted streamline or stipple is registered under a fresh [`OwnerId`].
//! Proximity queries may exempt one owner with a relaxed distance so that a new
//! line or point can start right next to the lineage that spawned it.
use glam::Vec2;

use crate::error::{ensure_positive, Error, Result};

/// Upper bound on the number of buckets a registry may allocate.
pub const MAX_BUCKETS: usize = 1 << 22;

/// Identifier of the streamline or stipple that produced a registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u32);

impl OwnerId {
    /// Never allocated; passing it as the exempt owner disables the exemption.
    pub const NONE: OwnerId = OwnerId(0);
}

/// A registered point and the owner it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryEntry {
    pub point: Vec2,
    pub owner: OwnerId,
}

/// Append-only spatial hash over a `width x height` pixel domain.
#[derive(Clone, Debug)]
pub struct SpatialRegistry {
    width: f32,
    height: f32,
    cell_size: f32,
    cells_x: usize,
    cells_y: usize,
    next_owner: u32,
    len: usize,
    /// Flat bucket array indexed by `cy * cells_x + cx`.
    buckets: Vec<Vec<RegistryEntry>>,
}

impl SpatialRegistry {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "registry domain must be > 0, got {width}x{height}"
            )));
        }
        ensure_positive("registry cell_size", cell_size)?;

        let cells_x = (width as f64 / cell_size as f64).ceil().max(1.0);
        let cells_y = (height as f64 / cell_size as f64).ceil().max(1.0);
        if cells_x * cells_y > MAX_BUCKETS as f64 {
            return Err(Error::InvalidConfig(format!(
                "registry cell_size {cell_size} is too small for {width}x{height}: \
                 {cells_x}x{cells_y} buckets exceed {MAX_BUCKETS}"
            )));
        }
        let cells_x = cells_x as usize;
        let cells_y = cells_y as usize;

        Ok(Self {
            width: width as f32,
            height: height as f32,
            cell_size,
            cells_x,
            cells_y,
            next_owner: 1,
            len: 0,
            buckets: vec![Vec::new(); cells_x * cells_y],
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of buckets along each axis.
    pub fn cell_counts(&self) -> (usize, usize) {
        (self.cells_x, self.cells_y)
    }

    /// Number of registered points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registers a single point under a new owner.
    pub fn insert_point(&mut self, p: Vec2) -> OwnerId {
        let owner = self.allocate_owner();
        self.push(p, owner);
        owner
    }

    /// Registers every point of a path under one new owner.
    pub fn insert_path(&mut self, points: &[Vec2]) -> OwnerId {
        let owner = self.allocate_owner();
        for &p in points {
            self.push(p, owner);
        }
        owner
    }

    /// Returns `true` if `p` lies inside the domain and keeps at least `d_min` from
    /// every registered point, except points of `exempt` which only need
    /// `d_min_relaxed`.
    ///
    /// The scanned neighborhood is sized by `d_min`, so `d_min_relaxed` is expected
    /// not to exceed it.
    pub fn is_allowed(&self, p: Vec2, d_min: f32, d_min_relaxed: f32, exempt: OwnerId) -> bool {
        let inside_x = p.x >= 0.0 && p.x < self.width - 1.0;
        let inside_y = p.y >= 0.0 && p.y < self.height - 1.0;
        if !(inside_x && inside_y) {
            return false;
        }

        let radius = ((d_min / self.cell_size).ceil().max(0.0) as usize)
            .min(self.cells_x.max(self.cells_y));
        let (cx, cy) = self.cell_coordinates(p);
        let x_min = cx.saturating_sub(radius);
        let x_max = (cx + radius).min(self.cells_x - 1);
        let y_min = cy.saturating_sub(radius);
        let y_max = (cy + radius).min(self.cells_y - 1);

        let d_min_sq = d_min * d_min;
        let d_relaxed_sq = d_min_relaxed * d_min_relaxed;

        for iy in y_min..=y_max {
            for ix in x_min..=x_max {
                for entry in &self.buckets[iy * self.cells_x + ix] {
                    let required = if entry.owner == exempt {
                        d_relaxed_sq
                    } else {
                        d_min_sq
                    };
                    if entry.point.distance_squared(p) < required {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Iterates over all registered entries in bucket order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.buckets.iter().flatten()
    }

    /// Squared distance from `p` to the closest entry not owned by `exclude`.
    ///
    /// Linear scan; meant for diagnostics and tests rather than hot loops.
    pub fn nearest_distance_sq(&self, p: Vec2, exclude: OwnerId) -> Option<f32> {
        self.entries()
            .filter(|e| e.owner != exclude)
            .map(|e| e.point.distance_squared(p))
            .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))))
    }

    fn allocate_owner(&mut self) -> OwnerId {
        let id = OwnerId(self.next_owner);
        self.next_owner += 1;
        id
    }

    fn push(&mut self, p: Vec2, owner: OwnerId) {
        let (cx, cy) = self.cell_coordinates(p);
        self.buckets[cy * self.cells_x + cx].push(RegistryEntry { point: p, owner });
        self.len += 1;
    }

    #[inline]
    fn cell_coordinates(&self, p: Vec2) -> (usize, usize) {
        let cx = ((p.x / self.cell_size) as isize).clamp(0, self.cells_x as isize - 1) as usize;
        let cy = ((p.y / self.cell_size) as isize).clamp(0, self.cells_y as isize - 1) as usize;
        (cx, cy)
    }
}
