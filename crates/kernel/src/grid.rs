use glam::IVec3;
use rand::Rng;
use voxcast_common::Rgba;

/// Errors from grid mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {cell} is outside a grid of side {side}")]
    OutOfBounds { cell: IVec3, side: usize },
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Voxel {
    pub solid: bool,
    pub color: Rgba,
}

impl Voxel {
    /// Empty, zero-color cell. Also what every out-of-range query returns.
    pub const AIR: Self = Self {
        solid: false,
        color: Rgba::TRANSPARENT,
    };

    pub const fn solid(color: Rgba) -> Self {
        Self { solid: true, color }
    }
}

/// Dense cube of voxels with side `side`, indexed `x + y*side + z*side²`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    side: usize,
    voxels: Vec<Voxel>,
}

impl VoxelGrid {
    /// An all-air grid.
    pub fn new(side: usize) -> Self {
        Self::filled(side, Voxel::AIR)
    }

    /// A grid with every cell set to `voxel`.
    pub fn filled(side: usize, voxel: Voxel) -> Self {
        Self {
            side,
            voxels: vec![voxel; side * side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    /// Whether `cell` lies inside the cube.
    #[inline]
    pub fn contains(&self, cell: IVec3) -> bool {
        self.index(cell).is_some()
    }

    #[inline]
    fn index(&self, cell: IVec3) -> Option<usize> {
        let side = self.side as i64;
        let in_range = |c: i32| (0..side).contains(&(c as i64));
        if in_range(cell.x) && in_range(cell.y) && in_range(cell.z) {
            let (x, y, z) = (cell.x as usize, cell.y as usize, cell.z as usize);
            Some(x + y * self.side + z * self.side * self.side)
        } else {
            None
        }
    }

    /// The voxel at `cell`, or [`Voxel::AIR`] if `cell` is out of range.
    #[inline]
    pub fn at(&self, cell: IVec3) -> Voxel {
        match self.index(cell) {
            Some(i) => self.voxels[i],
            None => Voxel::AIR,
        }
    }

    pub fn set(&mut self, cell: IVec3, voxel: Voxel) -> Result<(), GridError> {
        let i = self.index(cell).ok_or(GridError::OutOfBounds {
            cell,
            side: self.side,
        })?;
        self.voxels[i] = voxel;
        Ok(())
    }

    /// Fill every cell from `rng`: solid with probability `1 / solid_one_in`,
    /// random opaque color either way.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, solid_one_in: u32) {
        for voxel in &mut self.voxels {
            let solid = rng.random_ratio(1, solid_one_in.max(1));
            let color = Rgba::new(rng.random(), rng.random(), rng.random(), 255);
            *voxel = Voxel { solid, color };
        }
    }

    /// Make the whole `y == 0` layer solid white.
    pub fn add_floor(&mut self) {
        let layer = self.side * self.side;
        for z in 0..self.side {
            let start = z * layer;
            for voxel in &mut self.voxels[start..start + self.side] {
                *voxel = Voxel::solid(Rgba::WHITE);
            }
        }
    }

    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.solid).count()
    }

    /// Every cell with its coordinates, in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (IVec3, Voxel)> + '_ {
        let side = self.side;
        self.voxels.iter().enumerate().map(move |(i, v)| {
            let x = i % side;
            let y = (i / side) % side;
            let z = i / (side * side);
            (IVec3::new(x as i32, y as i32, z as i32), *v)
        })
    }
}
