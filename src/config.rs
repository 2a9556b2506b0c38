use crate::caster::Strategy;
use crate::map::{levels, Map};
use crate::projection::ShadingMode;
use anyhow::Context;
use std::f32::consts::PI;
use std::str::FromStr;

/// prefix of the environment variables read by [`Config::from_env`]
pub const ENV_PREFIX: &str = "RAYCAST_";

/// Every tunable of the renderer.
///
/// Units are noted per field: *world* units are map space (a tile is
/// `tile_size` world units wide), *tiles* are grid cells, *pixels* are screen
/// space.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// world units per tile
    pub tile_size: f32,
    /// horizontal field of view, radians
    pub fov: f32,
    pub ray_count: usize,
    /// tiles a ray may travel before it counts as a miss
    pub max_depth: f32,
    pub screen_width: u32,
    pub screen_height: u32,
    /// pixel column where the 3D view starts (the minimap sits left of it)
    pub view_origin_x: u32,
    /// pixels times world units: `wall_height = wall_scale / distance`
    pub wall_scale: f32,
    /// world distance at which grayscale walls fade to black
    pub shade_distance: f32,
    pub shading: ShadingMode,
    pub strategy: Strategy,
    /// world units between naive marching samples
    pub march_step: f32,
    /// world units per frame
    pub player_speed: f32,
    /// radians per frame
    pub rotation_speed: f32,
    /// side of the player's square collision box, world units
    pub player_size: f32,
    /// subtracted from every channel of X-side faces in palette mode
    pub side_darkening: u8,
    pub target_fps: u64,
}

impl Default for Config {
    fn default() -> Self {
        let tile_size = 64.;
        let screen_height = 1080;
        Self {
            tile_size,
            fov: PI / 3.,
            ray_count: 120,
            max_depth: 20.,
            screen_width: 1920,
            screen_height,
            // minimap of the built-in level fills the left of the screen
            view_origin_x: levels::COURTYARD[0].len() as u32 * tile_size as u32,
            wall_scale: screen_height as f32 * tile_size,
            shade_distance: 8. * tile_size,
            shading: ShadingMode::Grayscale,
            strategy: Strategy::Dda,
            march_step: 1.,
            player_speed: 5.,
            rotation_speed: PI / 90.,
            player_size: 16.,
            side_darkening: 25,
            target_fps: 60,
        }
    }
}

impl Config {
    /// default config with overrides taken from `RAYCAST_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let overrides = std::env::vars().filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|key| (key.to_ascii_lowercase(), value))
        });

        let mut config = Self::default();
        config.apply_overrides(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// apply `(key, value)` pairs on top of the current values
    pub fn apply_overrides<K, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> anyhow::Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());

            match key {
                "ray_count" => self.ray_count = parse_value(key, value)?,
                "fov_degrees" => self.fov = parse_value::<f32>(key, value)?.to_radians(),
                "max_depth" => self.max_depth = parse_value(key, value)?,
                "tile_size" => self.tile_size = parse_value(key, value)?,
                "strategy" => self.strategy = parse_value(key, value)?,
                "shading" => self.shading = parse_value(key, value)?,
                "march_step" => self.march_step = parse_value(key, value)?,
                "screen_width" => self.screen_width = parse_value(key, value)?,
                "screen_height" => self.screen_height = parse_value(key, value)?,
                "wall_scale" => self.wall_scale = parse_value(key, value)?,
                "shade_distance" => self.shade_distance = parse_value(key, value)?,
                "player_speed" => self.player_speed = parse_value(key, value)?,
                "rotation_degrees" => {
                    self.rotation_speed = parse_value::<f32>(key, value)?.to_radians()
                }
                "player_size" => self.player_size = parse_value(key, value)?,
                "side_darkening" => self.side_darkening = parse_value(key, value)?,
                "target_fps" => self.target_fps = parse_value(key, value)?,
                // the logger reads its own variable
                "log" => continue,
                other => anyhow::bail!("unrecognized config key: {other}"),
            }
            log::debug!("config override {key} = {value}");
        }

        Ok(())
    }

    /// move the 3D view so it starts right of `map`'s minimap
    pub fn fit_minimap(&mut self, map: &Map) -> anyhow::Result<()> {
        self.view_origin_x = map.world_size().x.ceil() as u32;
        self.validate()
            .with_context(|| format!("{}x{} map", map.width(), map.height()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ray_count == 0 {
            anyhow::bail!("ray count must be at least 1");
        }
        // rays at or past 90 degrees off the heading have no perpendicular distance
        if !(self.fov > 0. && self.fov < PI) {
            anyhow::bail!("field of view must be in (0, pi), got {}", self.fov);
        }
        for (name, value) in [
            ("tile size", self.tile_size),
            ("max depth", self.max_depth),
            ("march step", self.march_step),
            ("wall scale", self.wall_scale),
            ("shade distance", self.shade_distance),
            ("player speed", self.player_speed),
            ("player size", self.player_size),
        ] {
            if !(value.is_finite() && value > 0.) {
                anyhow::bail!("{name} must be positive and finite, got {value}");
            }
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            anyhow::bail!(
                "screen must be non-empty, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        if self.view_origin_x >= self.screen_width {
            anyhow::bail!(
                "3D view origin {} lies outside the {} pixel wide screen",
                self.view_origin_x,
                self.screen_width
            );
        }
        if self.march_step > self.tile_size {
            log::warn!(
                "march step {} exceeds tile size {}, naive rays can tunnel through walls",
                self.march_step,
                self.tile_size
            );
        }

        Ok(())
    }

    /// pixels available to the 3D view
    pub fn viewable_width(&self) -> u32 {
        self.screen_width.saturating_sub(self.view_origin_x)
    }

    /// pixels per ray column, before the one pixel seam overlap
    pub fn column_width(&self) -> f32 {
        self.viewable_width() as f32 / self.ray_count as f32
    }

    /// angle between neighbouring rays, radians
    pub fn ray_step(&self) -> f32 {
        self.fov / self.ray_count as f32
    }

    pub fn max_depth_world(&self) -> f32 {
        self.max_depth * self.tile_size
    }

    /// next ray count in the cycle: doubles until one ray per pixel, then starts over
    pub fn next_ray_count(&self) -> usize {
        let full = self.viewable_width().max(1) as usize;
        if self.ray_count >= full {
            Self::default().ray_count.min(full)
        } else {
            (self.ray_count * 2).min(full)
        }
    }
}

fn parse_value<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    let parsed: anyhow::Result<T> = value.parse::<T>().map_err(Into::into);
    parsed.with_context(|| format!("invalid value for {key}: {value:?}"))
}
