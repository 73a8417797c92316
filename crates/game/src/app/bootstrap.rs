use engine::{InputHandle, LoopConfig, SceneError, SceneScheduler, SceneSwitch};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::GameSettings;
use super::scenes;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scheduler: SceneScheduler,
    pub(crate) input: InputHandle,
}

pub(crate) fn build_app() -> Result<AppWiring, SceneError> {
    init_tracing();
    info!("=== Wildwood Startup ===");

    let settings = GameSettings::load();
    info!(
        start_scene = settings.start_scene.as_str(),
        fade_seconds = settings.fade_seconds,
        "settings_resolved"
    );

    let input = InputHandle::new();
    let scheduler = build_scheduler(&settings, &input)?;

    Ok(AppWiring {
        config: settings.loop_config(),
        scheduler,
        input,
    })
}

fn build_scheduler(
    settings: &GameSettings,
    input: &InputHandle,
) -> Result<SceneScheduler, SceneError> {
    let mut scheduler = SceneScheduler::with_fade_color(settings.fade_color);
    scenes::register_all(&mut scheduler, input, settings.fade_seconds);
    scheduler.change_scene(&settings.start_scene, SceneSwitch::Immediate)?;
    Ok(scheduler)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
