use glam::{IVec2, Vec2};

/// Which family of grid lines a ray crossed when it struck a wall.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    /// vertical grid line, the ray advanced along X
    X,
    /// horizontal grid line, the ray advanced along Y
    Y,
}

/// A single view ray. Built fresh per column, per frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ray {
    pub angle: f32,
    /// unit vector `(cos angle, sin angle)`
    pub dir: Vec2,
}

impl Ray {
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            dir: Vec2::from_angle(angle),
        }
    }
}

/// Result of casting one ray.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hit {
    pub ray: Ray,
    /// perpendicular distance to the view plane, world units
    pub distance: f32,
    /// distance travelled along the ray, world units
    pub euclidean: f32,
    /// struck cell, or the last cell visited on a miss
    pub cell: IVec2,
    /// tile code of the struck cell, 0 on a miss
    pub tile: u8,
    pub side: Side,
    /// false when the ray escaped the grid or ran out of depth
    pub hit: bool,
}

impl Hit {
    pub(crate) fn miss(ray: Ray, cell: IVec2, max_depth_world: f32) -> Self {
        Self {
            ray,
            distance: max_depth_world,
            euclidean: max_depth_world,
            cell,
            tile: 0,
            side: Side::X,
            hit: false,
        }
    }

    /// world position where the ray stopped
    pub fn world_point(&self, origin: Vec2) -> Vec2 {
        origin + self.ray.dir * self.euclidean
    }
}
