use crate::config::Config;
use crate::map::{Map, EMPTY};
use crate::player::Player;
use crate::ray::{Hit, Ray, Side};
use glam::{IVec2, Vec2};
use std::fmt;
use std::str::FromStr;

/// How rays find walls.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Strategy {
    /// fixed-step marching along the ray, kept as a cross-check
    Naive,
    /// grid traversal from boundary to boundary
    #[default]
    Dda,
}

impl Strategy {
    pub fn toggle(self) -> Self {
        match self {
            Strategy::Naive => Strategy::Dda,
            Strategy::Dda => Strategy::Naive,
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" | "march" => Ok(Strategy::Naive),
            "dda" => Ok(Strategy::Dda),
            other => anyhow::bail!("unknown cast strategy: {other}"),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Naive => "naive",
            Strategy::Dda => "dda",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CastStats {
    pub rays: usize,
    /// grid cells tested for walls over the whole cast
    pub checks: usize,
}

/// Everything one frame's cast produced.
#[derive(Clone, Debug, Default)]
pub struct Cast {
    /// one hit per ray, left to right
    pub hits: Vec<Hit>,
    pub stats: CastStats,
    /// world points the traced rays tested on their way out
    pub probes: Vec<Vec2>,
}

/// Casts rays over a [`Map`]. Holds no per-frame state, so one caster can
/// serve every frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Caster {
    pub strategy: Strategy,
    /// tiles
    pub max_depth: f32,
    /// world units between naive samples
    pub march_step: f32,
    /// trace probe points of every n-th ray
    pub probe_every: Option<usize>,
}

impl Caster {
    pub fn new(strategy: Strategy, max_depth: f32) -> Self {
        Self {
            strategy,
            max_depth,
            march_step: 1.,
            probe_every: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            strategy: config.strategy,
            max_depth: config.max_depth,
            march_step: config.march_step,
            probe_every: None,
        }
    }

    pub fn with_probes(mut self, every: usize) -> Self {
        self.probe_every = (every > 0).then_some(every);
        self
    }

    /// Cast `ray_count` rays spread evenly over `[heading - fov/2, heading + fov/2)`.
    ///
    /// Always yields exactly `ray_count` hits in left-to-right order, misses included.
    pub fn cast_frame(&self, map: &Map, player: &Player, fov: f32, ray_count: usize) -> Cast {
        let start = player.heading - fov / 2.;
        let step = fov / ray_count as f32;

        let mut cast = Cast {
            hits: Vec::with_capacity(ray_count),
            ..Default::default()
        };

        for ray_number in 0..ray_count {
            let ray = Ray::new(start + ray_number as f32 * step);
            let probes = match self.probe_every {
                Some(every) if ray_number % every == 0 => Some(&mut cast.probes),
                _ => None,
            };
            let hit = self.trace(
                map,
                player.pos,
                player.heading,
                ray,
                &mut cast.stats.checks,
                probes,
            );
            cast.hits.push(hit);
        }
        cast.stats.rays = ray_count;

        log::trace!(
            "{} cast: {} rays, {} checks",
            self.strategy,
            cast.stats.rays,
            cast.stats.checks
        );

        cast
    }

    /// cast a single ray at `angle` for a viewer looking along `heading`
    pub fn cast_ray(&self, map: &Map, origin: Vec2, heading: f32, angle: f32) -> Hit {
        let mut checks = 0;
        self.trace(map, origin, heading, Ray::new(angle), &mut checks, None)
    }

    fn trace(
        &self,
        map: &Map,
        origin: Vec2,
        heading: f32,
        ray: Ray,
        checks: &mut usize,
        probes: Option<&mut Vec<Vec2>>,
    ) -> Hit {
        match self.strategy {
            Strategy::Dda => dda(map, origin, heading, ray, self.max_depth, checks, probes),
            Strategy::Naive => march(
                map,
                origin,
                heading,
                ray,
                self.max_depth,
                self.march_step,
                checks,
                probes,
            ),
        }
    }
}

/// Grid traversal: hop from one grid line to the next, always taking the
/// nearer of the next vertical and next horizontal line.
fn dda(
    map: &Map,
    origin: Vec2,
    heading: f32,
    ray: Ray,
    max_depth: f32,
    checks: &mut usize,
    mut probes: Option<&mut Vec<Vec2>>,
) -> Hit {
    let tile_size = map.tile_size();
    let max_depth_world = max_depth * tile_size;
    // projects ray length onto the view direction
    let view_cos = (ray.angle - heading).cos();

    // everything below is in tile units until the final conversion
    let pos = origin / tile_size;
    let mut cell = pos.floor().as_ivec2();

    *checks += 1;
    match map.tile_at(cell.x, cell.y) {
        None => return Hit::miss(ray, cell, max_depth_world),
        Some(EMPTY) => {}
        Some(tile) => {
            return Hit {
                ray,
                distance: 0.,
                euclidean: 0.,
                cell,
                tile,
                side: Side::X,
                hit: true,
            }
        }
    }

    let (step_x, delta_x, mut side_x) = axis_params(pos.x, cell.x, ray.dir.x);
    let (step_y, delta_y, mut side_y) = axis_params(pos.y, cell.y, ray.dir.y);
    let step = IVec2::new(step_x, step_y);

    // each axis crosses at most one line per tile of depth, and no ray needs
    // more than width + height crossings to leave the grid
    let depth_steps = (2. * (max_depth.ceil() + 1.)) as usize;
    let max_steps = depth_steps.min(map.width() + map.height() + 2);
    for _ in 0..max_steps {
        let (t, side) = if side_x < side_y {
            let t = side_x;
            side_x += delta_x;
            cell.x += step.x;
            (t, Side::X)
        } else {
            let t = side_y;
            side_y += delta_y;
            cell.y += step.y;
            (t, Side::Y)
        };

        if t > max_depth {
            return Hit::miss(ray, cell, max_depth_world);
        }

        *checks += 1;
        if let Some(probes) = probes.as_deref_mut() {
            probes.push(origin + ray.dir * (t * tile_size));
        }

        match map.tile_at(cell.x, cell.y) {
            // escaped the grid
            None => return Hit::miss(ray, cell, max_depth_world),
            Some(EMPTY) => continue,
            Some(tile) => {
                let along = match side {
                    Side::X => {
                        (cell.x as f32 - pos.x + (1 - step.x) as f32 / 2.) / ray.dir.x
                    }
                    Side::Y => {
                        (cell.y as f32 - pos.y + (1 - step.y) as f32 / 2.) / ray.dir.y
                    }
                };
                let euclidean = along * tile_size;
                return Hit {
                    ray,
                    distance: euclidean * view_cos,
                    euclidean,
                    cell,
                    tile,
                    side,
                    hit: true,
                };
            }
        }
    }

    Hit::miss(ray, cell, max_depth_world)
}

/// Step direction, distance between successive grid lines and distance to
/// the first grid line along one axis, all in tile units. A zero direction
/// component never crosses a line on that axis.
fn axis_params(pos: f32, cell: i32, dir: f32) -> (i32, f32, f32) {
    if dir == 0. {
        return (1, f32::INFINITY, f32::INFINITY);
    }

    let delta = (1. / dir).abs();
    if dir < 0. {
        (-1, delta, (pos - cell as f32) * delta)
    } else {
        (1, delta, (cell as f32 + 1. - pos) * delta)
    }
}

/// finest naive sampling allowed, whatever the configured step
const MAX_SAMPLES_PER_TILE: f32 = 1024.;

/// Fixed-step marching. Simple and slow, and it can tunnel through walls
/// thinner than `step`.
#[allow(clippy::too_many_arguments)]
fn march(
    map: &Map,
    origin: Vec2,
    heading: f32,
    ray: Ray,
    max_depth: f32,
    step: f32,
    checks: &mut usize,
    mut probes: Option<&mut Vec<Vec2>>,
) -> Hit {
    let max_depth_world = max_depth * map.tile_size();
    let view_cos = (ray.angle - heading).cos();
    let finest = map.tile_size() / MAX_SAMPLES_PER_TILE;
    let step = if step.is_finite() { step.max(finest) } else { finest };
    // past the grid diagonal every sample is out of bounds
    let reach = map.world_size().length() + step;
    let samples = (max_depth_world.min(reach) / step).floor() as usize;

    let mut prev = map.cell_of(origin);
    for sample in 0..=samples {
        let depth = sample as f32 * step;
        let point = origin + ray.dir * depth;
        let cell = map.cell_of(point);

        *checks += 1;
        if !map.contains(cell.x, cell.y) {
            return Hit::miss(ray, prev, max_depth_world);
        }
        if let Some(probes) = probes.as_deref_mut() {
            probes.push(point);
        }

        let tile = map.tile_at(cell.x, cell.y).unwrap_or(EMPTY);
        if tile != EMPTY {
            // the wall boundary lies between this sample and the previous one
            let euclidean = (depth - step / 2.).max(0.);
            let side = if cell.y != prev.y && cell.x == prev.x {
                Side::Y
            } else {
                Side::X
            };
            return Hit {
                ray,
                distance: euclidean * view_cos,
                euclidean,
                cell,
                tile,
                side,
                hit: true,
            };
        }
        prev = cell;
    }

    Hit::miss(ray, prev, max_depth_world)
}
