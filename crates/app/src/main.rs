mod frame_input;
mod maze_render;
mod window_config;

use app::app_loop::AppState;
use app::config_file::{default_config_path, load_or_init};
use app::seed::{generate_runtime_seed, resolve_config_path_from_args, resolve_seed_from_args};
use frame_input::capture_frame_input;
use macroquad::prelude::*;
use macroquad::window::Conf;
use race_core::Session;
use race_core::sync::OfflineChannel;
use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn window_conf() -> Conf {
    window_config::build_window_conf()
}

fn start_session(args: &[String]) -> Result<Session<OfflineChannel>, String> {
    let explicit = resolve_config_path_from_args(args)?;
    let (config, source) =
        load_or_init(explicit.as_deref(), default_config_path()).map_err(|err| err.to_string())?;
    let seed = resolve_seed_from_args(args, config.seed, generate_runtime_seed())?;
    info!(?source, ?seed, "starting race");
    Session::new(&config, seed.value(), OfflineChannel).map_err(|err| err.to_string())
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut session = match start_session(&args) {
        Ok(session) => session,
        Err(err) => {
            error!(%err, "could not start race");
            return;
        }
    };
    let mut app_state = AppState::new();

    loop {
        let input = capture_frame_input();
        if input.quit {
            break;
        }
        let frame_time = Duration::from_secs_f32(get_frame_time().max(0.0));
        app_state.tick(&mut session, &input.keys_pressed, frame_time);

        clear_background(BLACK);
        maze_render::draw_frame(&session);
        next_frame().await
    }

    session.teardown();
}
