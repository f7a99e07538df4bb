//! Grid traversal: stepping a ray through unit cells one boundary at a time.
//
// This is the Amanatides & Woo traversal ("A Fast Voxel Traversal Algorithm
// for Ray Tracing", 1987). Rather than storing the ray parameter t, we keep,
// per axis, the t at which the ray next crosses a cell boundary on that axis
// (`t_max`) and how much t grows per full cell on that axis (`t_delta`). The
// smallest `t_max` says which boundary comes next.

use glam::{IVec3, Vec3};
use voxcast_common::MAX_RENDER_DISTANCE;
use voxcast_kernel::VoxelGrid;

/// Stand-in for a zero direction component, so per-axis reciprocals stay finite.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Origins at or beyond this coordinate magnitude are not traversed; their
/// cell boundaries are no longer representable in f32.
pub const ORIGIN_LIMIT: f32 = (1 << 22) as f32;

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `direction` must be unit length; distances are reported in its units.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// First solid cell along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the face that was entered.
    pub distance: f32,
    pub cell: IVec3,
    /// Outward normal of the entered face. Zero if the ray started inside
    /// the hit cell.
    pub normal: Vec3,
}

/// One cell visited by a [`Raycaster`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastStep {
    pub cell: IVec3,
    /// Distance at which the ray entered `cell` (0 for the starting cell).
    pub distance: f32,
    /// Outward normal of the face crossed to enter `cell`, zero for the
    /// starting cell.
    pub normal: Vec3,
}

impl From<RaycastStep> for RayHit {
    fn from(step: RaycastStep) -> Self {
        Self {
            distance: step.distance,
            cell: step.cell,
            normal: step.normal,
        }
    }
}

/// Iterator over the cells a ray passes through, nearest first, ending once
/// the entry distance reaches `max_distance`.
///
/// `max_distance` is clamped to [`MAX_RENDER_DISTANCE`]. Nothing is visited
/// when the origin or direction is not finite, the origin lies beyond
/// [`ORIGIN_LIMIT`], or `max_distance` is NaN.
///
/// The first item is always the cell containing the origin. When the ray
/// crosses exactly through an edge or corner, x is stepped before y and y
/// before z.
#[derive(Debug, Clone)]
pub struct Raycaster {
    cell: IVec3,
    step: IVec3,
    t_delta: Vec3,
    t_max: Vec3,
    distance: f32,
    normal: Vec3,
    max_distance: f32,
}

impl Raycaster {
    pub fn new(ray: Ray, max_distance: f32) -> Self {
        let traversable = ray.origin.is_finite()
            && ray.direction.is_finite()
            && ray.origin.abs().max_element() < ORIGIN_LIMIT
            && !max_distance.is_nan();
        let (origin, max_distance) = if traversable {
            (ray.origin, max_distance.min(MAX_RENDER_DISTANCE))
        } else {
            (Vec3::ZERO, 0.0)
        };
        let cell = origin.floor().as_ivec3();
        let mut step = IVec3::ZERO;
        let mut t_delta = Vec3::ZERO;
        let mut t_max = Vec3::ZERO;

        for axis in 0..3 {
            let d = ray.direction[axis];
            let s = signum(d);
            let safe = if d != 0.0 { d } else { DIRECTION_EPSILON };
            let delta = (1.0 / safe).abs();
            let to_boundary = match s {
                1 => cell[axis] as f32 + 1.0 - origin[axis],
                -1 => origin[axis] - cell[axis] as f32,
                // Never stepped: one whole cell at 1/epsilon is out of reach.
                _ => 1.0,
            };
            step[axis] = s;
            t_delta[axis] = delta;
            t_max[axis] = to_boundary * delta;
        }

        Self {
            cell,
            step,
            t_delta,
            t_max,
            distance: 0.0,
            normal: Vec3::ZERO,
            max_distance,
        }
    }

    #[inline]
    fn next_axis(&self) -> usize {
        let t = self.t_max;
        if t.x <= t.y && t.x <= t.z {
            0
        } else if t.y <= t.z {
            1
        } else {
            2
        }
    }
}

impl Iterator for Raycaster {
    type Item = RaycastStep;

    #[inline]
    fn next(&mut self) -> Option<RaycastStep> {
        if self.distance >= self.max_distance {
            return None;
        }
        let current = RaycastStep {
            cell: self.cell,
            distance: self.distance,
            normal: self.normal,
        };

        let axis = self.next_axis();
        self.cell[axis] += self.step[axis];
        self.distance = self.t_max[axis];
        self.t_max[axis] += self.t_delta[axis];
        self.normal = Vec3::ZERO;
        self.normal[axis] = -(self.step[axis] as f32);

        Some(current)
    }
}

/// Find the first solid cell of `grid` along `ray` within `max_distance`.
pub fn cast(grid: &VoxelGrid, ray: Ray, max_distance: f32) -> Option<RayHit> {
    Raycaster::new(ray, max_distance)
        .find(|step| grid.at(step.cell).solid)
        .map(RayHit::from)
}

#[inline]
fn signum(v: f32) -> i32 {
    (v > 0.0) as i32 - (v < 0.0) as i32
}
