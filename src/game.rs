use crate::StringToAnyhow;
use raycaster::{
    render_frame, Config, DrawCommand, FrameTimes, Intent, Map, Overlay, Player, Rgb,
};
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum GameState {
    Playing,
    Paused,
    Exit,
}

pub(crate) struct Game {
    map: Map,
    player: Player,
    config: Config,
    overlay: Overlay,
    pub game_state: GameState,
    pub canvas: Canvas<Window>,
    pub update: bool,
    /// filled by the main loop, shown with the stats
    pub times: FrameTimes,
}

fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.r, rgb.g, rgb.b)
}

impl Game {
    /// initialize game
    pub fn new(canvas: Canvas<Window>, mut config: Config) -> anyhow::Result<Self> {
        let map = Map::from_rows(&raycaster::levels::COURTYARD, config.tile_size)?;
        config.fit_minimap(&map)?;
        let player = Player::spawn_at_tile(4, 4, config.tile_size, 0.);

        Ok(Self {
            map,
            player,
            config,
            overlay: Overlay::default(),
            game_state: GameState::Playing,
            canvas,
            update: true,
            times: FrameTimes::default(),
        })
    }

    pub fn shows_stats(&self) -> bool {
        self.overlay.stats
    }

    /// handle key presses for while in "playing" state
    pub fn playing_key_once(&mut self, key: Keycode) {
        match key {
            Keycode::D => {
                self.config.strategy = self.config.strategy.toggle();
                log::info!("caster: {}", self.config.strategy);
            }
            Keycode::G => self.config.shading = self.config.shading.toggle(),
            Keycode::R => {
                self.config.ray_count = self.config.next_ray_count();
                log::info!("rays: {}", self.config.ray_count);
            }
            Keycode::B => self.overlay.blobs = !self.overlay.blobs,
            Keycode::S => self.overlay.stats = !self.overlay.stats,
            Keycode::T => self.overlay.tile_lines = !self.overlay.tile_lines,
            Keycode::P => self.overlay.pov = !self.overlay.pov,
            Keycode::M => self.overlay.minimap = !self.overlay.minimap,
            Keycode::Escape => self.game_state = GameState::Paused,
            _ => {}
        }
    }

    /// escape again quits, anything else resumes
    pub fn paused_key_once(&mut self, key: Keycode) {
        self.game_state = match key {
            Keycode::Escape => GameState::Exit,
            _ => GameState::Playing,
        };
    }

    /// handle key repeating for while in "playing" state
    pub fn playing_key(&mut self, key: Keycode, strafe: bool) {
        let intent = match key {
            Keycode::Up => Intent::Forward,
            Keycode::Down => Intent::Backward,
            Keycode::Left if strafe => Intent::StrafeLeft,
            Keycode::Right if strafe => Intent::StrafeRight,
            Keycode::Left => Intent::TurnLeft,
            Keycode::Right => Intent::TurnRight,
            _ => return,
        };

        self.player.apply(intent, &self.map, &self.config);
    }

    // draw while in "playing" state
    pub fn playing_draw(&mut self) -> anyhow::Result<()> {
        let frame = render_frame(&self.map, &self.player, &self.config, &self.overlay);

        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();

        for command in frame.commands.iter() {
            match *command {
                DrawCommand::FillRect { rect, color: rgb } => {
                    self.canvas.set_draw_color(color(rgb));
                    self.canvas
                        .fill_rect(Rect::new(
                            rect.x as i32,
                            rect.y as i32,
                            rect.w.max(1.) as u32,
                            rect.h.max(1.) as u32,
                        ))
                        .ah()?;
                }
                DrawCommand::Line { from, to, color: rgb } => {
                    self.canvas.set_draw_color(color(rgb));
                    self.canvas
                        .draw_line(
                            Point::new(from.x as i32, from.y as i32),
                            Point::new(to.x as i32, to.y as i32),
                        )
                        .ah()?;
                }
                DrawCommand::Dot {
                    center,
                    radius,
                    color: rgb,
                } => {
                    self.canvas.set_draw_color(color(rgb));
                    self.canvas
                        .fill_rect(Rect::new(
                            (center.x - radius) as i32,
                            (center.y - radius) as i32,
                            (radius * 2.) as u32,
                            (radius * 2.) as u32,
                        ))
                        .ah()?;
                }
            }
        }

        let title = if self.overlay.stats {
            format!("raycaster - {}", frame.stats.with_fps(&self.times))
        } else {
            "raycaster - (S)tats, (D)DA, (B)lobs, (R)ays, (G)rayscale, (T)ile lines, (P)OV, (M)inimap"
                .to_string()
        };
        self.canvas.window_mut().set_title(&title)?;

        Ok(())
    }

    // draw pause screen
    pub fn pause_draw(&mut self) -> anyhow::Result<()> {
        self.canvas.set_blend_mode(BlendMode::Blend);
        self.canvas.set_draw_color(Color::RGBA(0, 0, 0, 0xDD));
        self.canvas.fill_rect(None).ah()?;
        self.canvas.set_blend_mode(BlendMode::None);
        self.canvas
            .window_mut()
            .set_title("raycaster - paused, escape quits, any other key resumes")?;

        Ok(())
    }
}
