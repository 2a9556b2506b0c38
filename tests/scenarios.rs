use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::{IVec2, Vec2};
use proptest::prelude::*;
use raycaster::{levels, Caster, Config, Map, Player, Side, Strategy};
use std::f32::consts::{PI, TAU};

const TILE: f32 = 64.;

fn bordered() -> Map {
    Map::from_rows(&levels::BORDERED_8, TILE).expect("map should build")
}

#[test]
fn facing_east_from_room_center() {
    let map = bordered();
    let player = Player::new(Vec2::new(4.5 * TILE, 4.5 * TILE), 0.);
    let cast = Caster::new(Strategy::Dda, 20.).cast_frame(&map, &player, 0.0001, 1);

    let hit = cast.hits[0];
    assert!(hit.hit);
    assert_eq!(hit.cell.x, 7);
    assert_eq!(hit.side, Side::X);
    assert_relative_eq!(hit.distance, 160., max_relative = 1e-4);

    let exact = Caster::new(Strategy::Dda, 20.).cast_ray(&map, player.pos, 0., 0.);
    assert_eq!(exact.cell, IVec2::new(7, 4));
    assert_relative_eq!(exact.distance, 2.5 * TILE, max_relative = 1e-6);
}

#[test]
fn perpendicular_hits_at_known_tile_distances() {
    let map = bordered();
    let caster = Caster::new(Strategy::Dda, 20.);
    // from the centre of tile (col, 4) facing east, the wall is (7 - col - 0.5) tiles away
    for col in 1..7 {
        let origin = Vec2::new((col as f32 + 0.5) * TILE, 4.5 * TILE);
        let hit = caster.cast_ray(&map, origin, 0., 0.);
        let expected = (7. - col as f32 - 0.5) * TILE;
        assert_relative_eq!(hit.distance, expected, max_relative = 1e-6);
    }
}

#[test]
fn open_space_misses_at_max_depth() {
    let rows = vec![vec![0u8; 40]; 40];
    let map = Map::from_rows(&rows, TILE).expect("map should build");
    let player = Player::new(Vec2::splat(20. * TILE), 0.7);
    let config = Config {
        max_depth: 6.,
        ..Config::default()
    };

    for strategy in [Strategy::Dda, Strategy::Naive] {
        let caster = Caster {
            strategy,
            ..Caster::from_config(&config)
        };
        let cast = caster.cast_frame(&map, &player, config.fov, 32);
        assert_eq!(cast.hits.len(), 32);
        for hit in cast.hits {
            assert!(!hit.hit);
            assert_eq!(hit.distance, config.max_depth_world());
        }
    }
}

#[test]
fn slides_along_wall_into_corner() {
    let rows: [[u8; 8]; 8] = [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 1, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ];
    let map = Map::from_rows(&rows, TILE).expect("map should build");
    let mut player = Player::spawn_at_tile(4, 4, TILE, 0.);

    // the X destination (tile 5, 4) is a wall, the Y destination (tile 4, 4) is not
    player.try_move(&map, Vec2::new(40., 20.), 16.);

    assert_eq!(player.pos.x, 4.5 * TILE);
    assert_eq!(player.pos.y, 4.5 * TILE + 20.);
}

#[test]
fn naive_matches_dda_across_the_room() {
    let map = bordered();
    let config = Config::default();
    let player = Player::new(Vec2::new(2.3 * TILE, 5.1 * TILE), 5.5);

    let dda = Caster::new(Strategy::Dda, 20.).cast_frame(&map, &player, config.fov, 90);
    let naive = Caster::new(Strategy::Naive, 20.).cast_frame(&map, &player, config.fov, 90);

    for (d, n) in dda.hits.iter().zip(naive.hits.iter()) {
        assert!(d.hit && n.hit);
        assert_abs_diff_eq!(d.distance, n.distance, epsilon = config.march_step / 2. + 1e-2);
    }
}

proptest! {
    #[test]
    fn heading_stays_normalized(turns in prop::collection::vec(-20f32..20f32, 1..50)) {
        let mut player = Player::new(Vec2::splat(4.5 * TILE), 0.);
        for turn in turns {
            player.rotate(turn);
            prop_assert!(player.heading >= 0. && player.heading < TAU);
        }
    }

    #[test]
    fn cast_always_returns_ray_count(
        rays in 1usize..400,
        heading in 0f32..TAU,
        fov in 0.1f32..3.0,
        naive in any::<bool>(),
    ) {
        let map = Map::from_rows(&levels::ARENA, 32.).expect("map should build");
        let player = Player::spawn_at_tile(1, 1, 32., heading);
        let strategy = if naive { Strategy::Naive } else { Strategy::Dda };
        let cast = Caster::new(strategy, 20.).cast_frame(&map, &player, fov, rays);

        prop_assert_eq!(cast.hits.len(), rays);
        prop_assert!(cast.hits.windows(2).all(|pair| pair[0].ray.angle < pair[1].ray.angle));
    }

    #[test]
    fn naive_and_dda_agree_in_a_bordered_room(
        x in 1.2f32..6.8,
        y in 1.2f32..6.8,
        heading in 0f32..TAU,
        offset in -PI / 6.0..PI / 6.0,
    ) {
        let map = bordered();
        let origin = Vec2::new(x, y) * TILE;
        let angle = heading + offset;

        let dda = Caster::new(Strategy::Dda, 20.).cast_ray(&map, origin, heading, angle);
        let naive = Caster::new(Strategy::Naive, 20.).cast_ray(&map, origin, heading, angle);

        prop_assert!(dda.hit && naive.hit);
        prop_assert!((dda.distance - naive.distance).abs() <= 0.5 + 1e-2);
    }
}
