use crate::config::Config;
use crate::map::HIDDEN_WALL;
use crate::ray::{Hit, Side};
use glam::Vec2;
use std::fmt;
use std::str::FromStr;

/// keeps `wall_scale / distance` finite for a viewer touching a wall
const DISTANCE_EPSILON: f32 = 1e-4;

/// tiles from a grid intersection within which tile lines are painted
const TILE_LINE_TOLERANCE: f32 = 0.03;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    pub fn darken(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }
}

/// Color of a wall code in palette mode.
pub fn palette(tile: u8) -> Rgb {
    match tile {
        0 => Rgb::BLACK,
        // ivory
        1 => Rgb::new(255, 255, 240),
        2 => Rgb::new(0, 0, 139),
        3 => Rgb::new(0, 205, 0),
        4 => Rgb::new(139, 0, 0),
        5 => Rgb::new(85, 26, 139),
        // burlywood
        6 => Rgb::new(205, 170, 125),
        HIDDEN_WALL => Rgb::YELLOW,
        _ => Rgb::new(255, 0, 255),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ShadingMode {
    /// brightness falls off linearly with distance
    #[default]
    Grayscale,
    /// color per tile code, X-side faces darker
    Palette,
}

impl ShadingMode {
    pub fn toggle(self) -> Self {
        match self {
            ShadingMode::Grayscale => ShadingMode::Palette,
            ShadingMode::Palette => ShadingMode::Grayscale,
        }
    }
}

impl FromStr for ShadingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" | "gray" => Ok(ShadingMode::Grayscale),
            "palette" | "color" | "colour" => Ok(ShadingMode::Palette),
            other => anyhow::bail!("unknown shading mode: {other}"),
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShadingMode::Grayscale => "grayscale",
            ShadingMode::Palette => "palette",
        })
    }
}

/// One screen column of wall, in pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WallSlab {
    pub column: usize,
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Turns hits into wall slabs.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Projector {
    pub screen_height: f32,
    /// first pixel column of the 3D view
    pub view_origin_x: f32,
    pub column_width: f32,
    /// pixels times world units
    pub wall_scale: f32,
    /// world units
    pub shade_distance: f32,
    pub shading: ShadingMode,
    pub side_darkening: u8,
    /// world units per tile, for locating grid intersections
    pub tile_size: f32,
    /// paint slabs black where the ray struck a grid intersection
    pub tile_lines: bool,
    /// column painted red to mark the line of sight
    pub pov_column: Option<usize>,
}

impl Projector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            screen_height: config.screen_height as f32,
            view_origin_x: config.view_origin_x as f32,
            column_width: config.column_width(),
            wall_scale: config.wall_scale,
            shade_distance: config.shade_distance,
            shading: config.shading,
            side_darkening: config.side_darkening,
            tile_size: config.tile_size,
            tile_lines: false,
            pov_column: None,
        }
    }

    /// Wall height in pixels for a perpendicular world distance, never taller than the screen.
    pub fn wall_height(&self, distance: f32) -> f32 {
        (self.wall_scale / (distance + DISTANCE_EPSILON)).min(self.screen_height)
    }

    /// 255 up close, fading linearly to 0 at `shade_distance`
    pub fn intensity(&self, distance: f32) -> u8 {
        let fraction = (1. - distance / self.shade_distance).clamp(0., 1.);
        (fraction * 255.).round() as u8
    }

    /// Slab for the `column`-th hit. Misses draw nothing.
    pub fn project(&self, column: usize, hit: &Hit, origin: Vec2) -> Option<WallSlab> {
        if !hit.hit {
            return None;
        }

        let height = self.wall_height(hit.distance);
        Some(WallSlab {
            column,
            x: self.view_origin_x + column as f32 * self.column_width,
            top: (self.screen_height - height) / 2.,
            // one pixel of overlap hides seams between columns
            width: self.column_width + 1.,
            height,
            color: self.shade(column, hit, origin),
        })
    }

    fn shade(&self, column: usize, hit: &Hit, origin: Vec2) -> Rgb {
        if self.pov_column == Some(column) {
            return Rgb::RED;
        }
        if hit.tile == HIDDEN_WALL {
            return Rgb::YELLOW;
        }
        if self.tile_lines && self.on_intersection(hit.world_point(origin)) {
            return Rgb::BLACK;
        }

        match self.shading {
            ShadingMode::Grayscale => Rgb::gray(self.intensity(hit.distance)),
            ShadingMode::Palette => match hit.side {
                Side::X => palette(hit.tile).darken(self.side_darkening),
                Side::Y => palette(hit.tile),
            },
        }
    }

    fn on_intersection(&self, point: Vec2) -> bool {
        let tiles = point / self.tile_size;
        (tiles - tiles.round())
            .abs()
            .cmple(Vec2::splat(TILE_LINE_TOLERANCE))
            .all()
    }
}
