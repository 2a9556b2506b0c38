use crate::caster::{Caster, Strategy};
use crate::config::Config;
use crate::map::Map;
use crate::player::Player;
use crate::projection::{palette, Projector, Rgb};
use crate::timing::FrameTimes;
use glam::Vec2;
use std::fmt;

/// only every n-th ray is drawn on the minimap
pub const RAY_OVERLAY_EVERY: usize = 20;

const CEILING: Rgb = Rgb::gray(77);
const FLOOR: Rgb = Rgb::gray(127);
const GRID: Rgb = Rgb::gray(38);
const PLAYER_RADIUS: f32 = 8.;
const PROBE_RADIUS: f32 = 3.;
const HEADING_LINE: f32 = 50.;

/// Axis aligned rectangle in screen pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// What the rasterizer is asked to draw, in order.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Rgb },
    Line { from: Vec2, to: Vec2, color: Rgb },
    Dot { center: Vec2, radius: f32, color: Rgb },
}

/// Optional layers on top of the 3D view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Overlay {
    pub minimap: bool,
    /// points each traced ray tested
    pub blobs: bool,
    /// highlight the line of sight
    pub pov: bool,
    pub tile_lines: bool,
    pub stats: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            minimap: true,
            blobs: false,
            pov: false,
            tile_lines: false,
            stats: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FrameStats {
    pub rays: usize,
    pub checks: usize,
    pub strategy: Strategy,
    /// `(locked, theoretical)` frames per second, once the front-end has measured some
    pub fps: Option<(u32, u32)>,
}

impl FrameStats {
    pub fn with_fps(self, times: &FrameTimes) -> Self {
        Self {
            fps: (!times.is_empty()).then(|| (times.locked_fps(), times.theoretical_fps())),
            ..self
        }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((locked, theoretical)) = self.fps {
            write!(f, "fps: {locked}, theoretical fps: {theoretical}, ")?;
        }
        write!(
            f,
            "rays: {}, checks per frame: {}, caster: {}",
            self.rays, self.checks, self.strategy
        )
    }
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub stats: FrameStats,
}

/// Cast and project one frame. Player and map are read only for the whole pass.
pub fn render_frame(map: &Map, player: &Player, config: &Config, overlay: &Overlay) -> Frame {
    let mut caster = Caster::from_config(config);
    if overlay.minimap && overlay.blobs {
        caster = caster.with_probes(RAY_OVERLAY_EVERY);
    }
    let cast = caster.cast_frame(map, player, config.fov, config.ray_count);

    let mut projector = Projector::from_config(config);
    projector.tile_lines = overlay.tile_lines;
    projector.pov_column = overlay.pov.then_some(config.ray_count / 2);

    let mut commands = Vec::with_capacity(cast.hits.len() + 8);

    // ceiling and floor
    let half = config.screen_height as f32 / 2.;
    let view_x = config.view_origin_x as f32;
    let view_w = config.viewable_width() as f32;
    commands.push(DrawCommand::FillRect {
        rect: Rect::new(view_x, 0., view_w, half),
        color: CEILING,
    });
    commands.push(DrawCommand::FillRect {
        rect: Rect::new(view_x, half, view_w, config.screen_height as f32 - half),
        color: FLOOR,
    });

    commands.extend(
        cast.hits
            .iter()
            .enumerate()
            .filter_map(|(column, hit)| projector.project(column, hit, player.pos))
            .map(|slab| DrawCommand::FillRect {
                rect: Rect::new(slab.x, slab.top, slab.width, slab.height),
                color: slab.color,
            }),
    );

    if overlay.minimap {
        draw_minimap(&mut commands, map);

        let pov_ray = config.ray_count / 2;
        for (ray_number, hit) in cast.hits.iter().enumerate() {
            if !hit.hit {
                continue;
            }
            let color = if overlay.pov && ray_number == pov_ray {
                Rgb::RED
            } else if ray_number % RAY_OVERLAY_EVERY == 0 {
                Rgb::YELLOW
            } else {
                continue;
            };
            commands.push(DrawCommand::Line {
                from: player.pos,
                to: hit.world_point(player.pos),
                color,
            });
        }

        commands.extend(cast.probes.iter().map(|&center| DrawCommand::Dot {
            center,
            radius: PROBE_RADIUS,
            color: Rgb::GREEN,
        }));

        commands.push(DrawCommand::Dot {
            center: player.pos,
            radius: PLAYER_RADIUS,
            color: Rgb::RED,
        });
        commands.push(DrawCommand::Line {
            from: player.pos,
            to: player.pos + player.facing() * HEADING_LINE,
            color: Rgb::RED,
        });
    }

    Frame {
        commands,
        stats: FrameStats {
            rays: cast.stats.rays,
            checks: cast.stats.checks,
            strategy: config.strategy,
            fps: None,
        },
    }
}

/// Top-down map drawn at one pixel per world unit from the screen origin.
fn draw_minimap(commands: &mut Vec<DrawCommand>, map: &Map) {
    let size = map.tile_size();
    for (col, row, code) in map.tiles() {
        let origin = map.tile_origin(col, row);
        commands.push(DrawCommand::FillRect {
            rect: Rect::new(origin.x, origin.y, size, size),
            color: GRID,
        });
        // leave a two pixel gap so the grid shows
        commands.push(DrawCommand::FillRect {
            rect: Rect::new(origin.x, origin.y, size - 2., size - 2.),
            color: palette(code),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::levels;
    use std::time::Duration;

    fn setup() -> (Map, Player, Config) {
        let map = Map::from_rows(&levels::COURTYARD, 64.).expect("map should build");
        let player = Player::spawn_at_tile(6, 6, 64., 4.);
        (map, player, Config::default())
    }

    fn count(frame: &Frame, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        frame.commands.iter().filter(|c| pred(*c)).count()
    }

    #[test]
    fn view_only_frame_has_background_and_one_slab_per_ray() {
        let (map, player, config) = setup();
        let overlay = Overlay {
            minimap: false,
            ..Overlay::default()
        };
        let frame = render_frame(&map, &player, &config, &overlay);

        assert_eq!(frame.commands.len(), 2 + config.ray_count);
        assert!(matches!(
            frame.commands[0],
            DrawCommand::FillRect { color, .. } if color == CEILING
        ));
        assert_eq!(frame.stats.rays, config.ray_count);
        assert!(frame.stats.checks >= config.ray_count);
    }

    #[test]
    fn minimap_draws_tiles_rays_and_player() {
        let (map, player, config) = setup();
        let frame = render_frame(&map, &player, &config, &Overlay::default());

        let fills = count(&frame, |c| matches!(c, DrawCommand::FillRect { .. }));
        assert_eq!(fills, 2 + config.ray_count + 2 * 81);

        // rays 0, 20, .., 100 plus the heading line
        let lines = count(&frame, |c| matches!(c, DrawCommand::Line { .. }));
        assert_eq!(lines, 6 + 1);

        let dots = count(&frame, |c| matches!(c, DrawCommand::Dot { .. }));
        assert_eq!(dots, 1);
    }

    #[test]
    fn blobs_add_probe_dots() {
        let (map, player, config) = setup();
        let overlay = Overlay {
            blobs: true,
            ..Overlay::default()
        };
        let frame = render_frame(&map, &player, &config, &overlay);
        let probes = count(
            &frame,
            |c| matches!(c, DrawCommand::Dot { color, .. } if *color == Rgb::GREEN),
        );
        assert!(probes >= 6);
    }

    #[test]
    fn pov_paints_center_column_red() {
        let (map, player, config) = setup();
        let overlay = Overlay {
            pov: true,
            minimap: false,
            ..Overlay::default()
        };
        let frame = render_frame(&map, &player, &config, &overlay);
        let red = count(
            &frame,
            |c| matches!(c, DrawCommand::FillRect { color, .. } if *color == Rgb::RED),
        );
        assert_eq!(red, 1);
    }

    #[test]
    fn stats_read_well() {
        let stats = FrameStats {
            rays: 120,
            checks: 800,
            strategy: Strategy::Dda,
            fps: None,
        };
        assert_eq!(
            stats.to_string(),
            "rays: 120, checks per frame: 800, caster: dda"
        );
    }

    #[test]
    fn stats_show_measured_fps() {
        let (map, player, config) = setup();
        let frame = render_frame(&map, &player, &config, &Overlay::default());
        assert_eq!(frame.stats.fps, None);

        let mut times = FrameTimes::default();
        times.record(Duration::from_millis(5), Duration::from_millis(20));
        let stats = frame.stats.with_fps(&times);

        assert_eq!(stats.fps, Some((50, 200)));
        assert!(stats
            .to_string()
            .starts_with("fps: 50, theoretical fps: 200, rays: 120"));
    }
}
