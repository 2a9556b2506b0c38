use crate::config::Config;
use crate::map::Map;
use glam::Vec2;
use std::f32::consts::TAU;

/// wrap an angle into `[0, 2pi)`
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly 2pi
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}

/// What the input layer wants the player to do this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    StrafeLeft,
    StrafeRight,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Player {
    /// world units, not tile aligned
    pub pos: Vec2,
    /// radians in `[0, 2pi)`, 0 faces +X, pi/2 faces +Y (down the screen)
    pub heading: f32,
}

impl Player {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self {
            pos,
            heading: normalize_angle(heading),
        }
    }

    /// player standing in the middle of a tile
    pub fn spawn_at_tile(col: usize, row: usize, tile_size: f32, heading: f32) -> Self {
        Self::new(
            (Vec2::new(col as f32, row as f32) + 0.5) * tile_size,
            heading,
        )
    }

    /// unit vector along the heading
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = normalize_angle(self.heading + delta);
    }

    /// Move by `delta`, sliding along walls.
    ///
    /// The X and Y components are tried one after the other, so a wall
    /// blocking one axis leaves motion along the other intact. A fast enough
    /// step can still clip through a wall corner.
    pub fn try_move(&mut self, map: &Map, delta: Vec2, size: f32) {
        let moved_x = self.pos + Vec2::new(delta.x, 0.);
        if !collides(map, moved_x, size) {
            self.pos = moved_x;
        }

        let moved_y = self.pos + Vec2::new(0., delta.y);
        if !collides(map, moved_y, size) {
            self.pos = moved_y;
        }
    }

    pub fn apply(&mut self, intent: Intent, map: &Map, config: &Config) {
        let step = self.facing() * config.player_speed;
        match intent {
            Intent::TurnLeft => self.rotate(-config.rotation_speed),
            Intent::TurnRight => self.rotate(config.rotation_speed),
            Intent::Forward => self.try_move(map, step, config.player_size),
            Intent::Backward => self.try_move(map, -step, config.player_size),
            Intent::StrafeRight => self.try_move(map, step.perp(), config.player_size),
            Intent::StrafeLeft => self.try_move(map, -step.perp(), config.player_size),
        }
    }
}

/// whether a square box of side `size` centered on `pos` overlaps a wall
fn collides(map: &Map, pos: Vec2, size: f32) -> bool {
    let half = size / 2.;
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(-half, half),
        Vec2::new(half, half),
    ]
    .into_iter()
    .any(|corner| map.is_wall_at(pos + corner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::levels;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn bordered() -> Map {
        Map::from_rows(&levels::BORDERED_8, 64.).expect("map should build")
    }

    #[test]
    fn normalize_wraps_both_ways() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 3. * FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(normalize_angle(5. * PI), PI, epsilon = 1e-5);
        assert_eq!(normalize_angle(-1e-9), 0.);
        assert_eq!(normalize_angle(TAU), 0.);
    }

    #[test]
    fn rotation_stays_normalized() {
        let mut player = Player::new(Vec2::splat(288.), 0.);
        player.rotate(-0.1);
        assert!(player.heading > 6. && player.heading < TAU);
        for _ in 0..100 {
            player.rotate(0.37);
        }
        assert!((0. ..TAU).contains(&player.heading));
    }

    #[test]
    fn walks_freely_in_open_space() {
        let map = bordered();
        let mut player = Player::spawn_at_tile(4, 4, 64., 0.);
        player.try_move(&map, Vec2::new(10., -12.), 16.);
        assert_eq!(player.pos, Vec2::new(298., 276.));
    }

    #[test]
    fn blocked_by_facing_wall() {
        let map = bordered();
        let mut player = Player::spawn_at_tile(6, 4, 64., 0.);
        player.try_move(&map, Vec2::new(40., 0.), 16.);
        assert_eq!(player.pos, Vec2::new(416., 288.));
    }

    #[test]
    fn intents_move_and_turn() {
        let map = bordered();
        let config = Config::default();
        let mut player = Player::spawn_at_tile(4, 4, 64., 0.);

        player.apply(Intent::Forward, &map, &config);
        assert_abs_diff_eq!(player.pos.x, 293., epsilon = 1e-4);

        player.apply(Intent::StrafeRight, &map, &config);
        assert_abs_diff_eq!(player.pos.y, 293., epsilon = 1e-4);

        player.apply(Intent::TurnLeft, &map, &config);
        assert_abs_diff_eq!(player.heading, TAU - config.rotation_speed, epsilon = 1e-5);

        player.apply(Intent::TurnRight, &map, &config);
        player.apply(Intent::Backward, &map, &config);
        assert_abs_diff_eq!(player.pos.x, 288., epsilon = 1e-3);
    }
}
