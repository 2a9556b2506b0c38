use game::{Game, GameState};
use raycaster::Config;
use sdl2::event::Event;
use sdl2::keyboard::Mod;
use std::collections::HashSet;
use std::time::{Duration, Instant};

mod game;

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RAYCAST_LOG");

    log::info!("loading config");
    let config = Config::from_env()?;

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let mut window = video
        .window("raycaster", config.screen_width, config.screen_height)
        .position_centered()
        .build()?;
    window.set_resizable(false);

    log::info!("creating canvas");
    let canvas = window.into_canvas().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;
    let keyboard = sdl_ctx.keyboard();

    let mut keys = HashSet::new();

    // initialize game
    log::info!("initializing game state");
    let delta = Duration::from_millis(1_000 / config.target_fps.max(1));
    let mut game = Game::new(canvas, config)?;

    'main_loop: loop {
        let prev = Instant::now();

        // handle events
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat,
                    ..
                } => {
                    keys.insert(k);

                    if !repeat {
                        match game.game_state {
                            GameState::Playing => game.playing_key_once(k),
                            GameState::Paused => game.paused_key_once(k),
                            GameState::Exit => break 'main_loop,
                        }

                        game.update = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    keys.remove(&k);
                }
                _ => {}
            }
        }

        // player state only changes here, never while a frame is being cast
        let strafe = keyboard
            .mod_state()
            .intersects(Mod::LALTMOD | Mod::RALTMOD);
        for k in keys.iter() {
            match game.game_state {
                GameState::Playing => {
                    game.playing_key(*k, strafe);
                    game.update = true;
                }
                GameState::Paused => {}
                GameState::Exit => break 'main_loop,
            }
        }

        // keep the fps readout moving while stats are shown
        if game.game_state == GameState::Playing && game.shows_stats() {
            game.update = true;
        }

        // draw game
        if game.update {
            if let Err(err) = match game.game_state {
                GameState::Playing => game.playing_draw(),
                GameState::Paused => game.pause_draw(),
                GameState::Exit => break,
            } {
                log::error!("error while in game state {:?}: {err}", game.game_state);
                Err(err)?;
            }
            game.canvas.present();

            game.update = false;
        }

        let work = prev.elapsed();
        if work < delta {
            std::thread::sleep(delta - work);
        }
        game.times.record(work, prev.elapsed());
    }

    Ok(())
}
