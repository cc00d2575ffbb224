mod app;

use engine::{run_loop, NullInputSource, StartupError, WorldMap};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use app::config::Settings;
use app::gameplay::GameSession;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(startup_error) = run() {
        error!(error = %startup_error, "startup_failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), StartupError> {
    let paths = engine::resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        base_content_dir = %paths.base_content_dir.display(),
        "startup"
    );

    let settings = Settings::load(&paths.base_content_dir.join("settings.json"));
    let map = WorldMap::load_from_file(&paths.base_content_dir.join("maps").join("overworld.map"));
    let mut session = GameSession::new(map, &settings, &paths.base_content_dir);

    let exit = run_loop(settings.loop_config(), &mut session, &mut NullInputSource);
    let player_id = session.player().id();
    info!(
        exit = ?exit,
        player_health = session.health_fraction(player_id).unwrap_or(0.0),
        enemies_left = session.enemies().len(),
        "game_ended"
    );
    Ok(())
}
