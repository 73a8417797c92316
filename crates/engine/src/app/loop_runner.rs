use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::{
    InputAction, InputHandle, InputSnapshot, MetricsHandle, Renderer, SceneError, SceneScheduler,
};

pub const SLOW_FRAME_ENV_VAR: &str = "SCENE_ENGINE_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Scene Engine".to_string(),
            window_width: 960,
            window_height: 540,
            max_frame_delta: Duration::from_millis(250),
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("no scene is active or pending; start one before running the loop")]
    NoInitialScene,
}

pub fn run_app(
    config: LoopConfig,
    scheduler: SceneScheduler,
    input: InputHandle,
) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, scheduler, input, metrics_handle)
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    mut scheduler: SceneScheduler,
    input: InputHandle,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    ensure_startable(&scheduler)?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut input_collector = InputCollector::default();

    info!(
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        scenes = scheduler.scene_names().count(),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_switch_count = scheduler.switch_count();
    let mut fatal_error: Option<SceneError> = None;

    event_loop
        .run(|event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::RedrawRequested => {
                    if slow_frame_delay > Duration::ZERO {
                        // Explicit debug perturbation only; this is not the FPS cap.
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    let frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);

                    input.publish(input_collector.snapshot_for_frame());
                    if let Err(scene_error) = scheduler.update(frame_dt.as_secs_f32()) {
                        error!(error = %scene_error, "scene_update_failed");
                        fatal_error = Some(scene_error);
                        window_target.exit();
                        return;
                    }

                    // Single authoritative FPS cap sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    if let Err(error) = renderer.render_scenes(&scheduler) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    metrics_accumulator.record_frame(raw_frame_dt, scheduler.is_transitioning());
                    let switch_count = scheduler.switch_count();
                    metrics_accumulator
                        .record_scene_switches(switch_count.saturating_sub(last_switch_count));
                    last_switch_count = switch_count;

                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            scene_switches = snapshot.scene_switches,
                            transition_frames = snapshot.transition_frames,
                            scene = scheduler.active_scene_name().unwrap_or("<none>"),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scheduler.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    match fatal_error {
        Some(scene_error) => Err(AppError::Scene(scene_error)),
        None => Ok(()),
    }
}

fn ensure_startable(scheduler: &SceneScheduler) -> Result<(), AppError> {
    if scheduler.active_scene_name().is_none() && scheduler.pending_scene_name().is_none() {
        return Err(AppError::NoInitialScene);
    }
    Ok(())
}

#[derive(Debug, Default)]
struct InputCollector {
    held: ActionStates,
    pressed: ActionStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        // Key repeat arrives as further presses while held; only the first one is an edge.
        if is_pressed && !self.held.is_down(action) {
            self.pressed.set(action, true);
        }
        self.held.set(action, is_pressed);
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.held, self.pressed);
        self.pressed = ActionStates::default();
        snapshot
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => Some(InputAction::Confirm),
        KeyCode::Escape | KeyCode::Backspace => Some(InputAction::Back),
        KeyCode::Tab => Some(InputAction::Cycle),
        _ => None,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => parse_slow_frame_ms(&value, config_slow_frame_ms),
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

fn parse_slow_frame_ms(value: &str, config_slow_frame_ms: u64) -> Duration {
    match value.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                value,
                "invalid slow-frame env var value; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{scene_ref, Scene, SceneSwitch};

    struct Idle;

    impl Scene for Idle {}

    fn press(input: &mut InputCollector, code: KeyCode) {
        input.update_action_state_from_physical_key(PhysicalKey::Code(code), true);
    }

    fn release(input: &mut InputCollector, code: KeyCode) {
        input.update_action_state_from_physical_key(PhysicalKey::Code(code), false);
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16), max_frame_delta),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn zero_durations_fall_back_to_defaults() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn confirm_press_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Enter);

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(first.was_pressed(InputAction::Confirm));
        assert!(!second.was_pressed(InputAction::Confirm));
        assert!(second.is_down(InputAction::Confirm));
    }

    #[test]
    fn held_key_repeat_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        press(&mut input, KeyCode::Tab);
        let first = input.snapshot_for_frame();

        press(&mut input, KeyCode::Tab);
        let second = input.snapshot_for_frame();

        release(&mut input, KeyCode::Tab);
        press(&mut input, KeyCode::Tab);
        let third = input.snapshot_for_frame();

        assert!(first.was_pressed(InputAction::Cycle));
        assert!(!second.was_pressed(InputAction::Cycle));
        assert!(third.was_pressed(InputAction::Cycle));
    }

    #[test]
    fn tap_within_one_frame_still_reports_press() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::Escape);
        release(&mut input, KeyCode::Escape);

        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.was_pressed(InputAction::Back));
        assert!(!snapshot.is_down(InputAction::Back));
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_actions() {
        let mut input = InputCollector::default();

        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ArrowLeft);

        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert!(!snapshot.is_down(InputAction::MoveDown));
    }

    #[test]
    fn key_release_clears_action_state() {
        let mut input = InputCollector::default();
        press(&mut input, KeyCode::KeyD);
        release(&mut input, KeyCode::KeyD);
        input.snapshot_for_frame();

        let snapshot = input.snapshot_for_frame();
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(action_for_key(PhysicalKey::Code(KeyCode::KeyQ)), None);
        assert_eq!(
            action_for_key(PhysicalKey::Code(KeyCode::Space)),
            Some(InputAction::Confirm)
        );
        assert_eq!(
            action_for_key(PhysicalKey::Code(KeyCode::Backspace)),
            Some(InputAction::Back)
        );
    }

    #[test]
    fn empty_scheduler_is_not_startable() {
        let scheduler = SceneScheduler::new();
        assert!(matches!(
            ensure_startable(&scheduler),
            Err(AppError::NoInitialScene)
        ));
    }

    #[test]
    fn registered_but_unstarted_scheduler_is_not_startable() {
        let mut scheduler = SceneScheduler::new();
        scheduler.register_scene("idle", scene_ref(Idle));
        assert!(matches!(
            ensure_startable(&scheduler),
            Err(AppError::NoInitialScene)
        ));
    }

    #[test]
    fn pending_initial_scene_is_startable() {
        let mut scheduler = SceneScheduler::new();
        scheduler.register_scene("idle", scene_ref(Idle));
        scheduler
            .change_scene("idle", SceneSwitch::Immediate)
            .expect("registered");

        assert!(ensure_startable(&scheduler).is_ok());
    }

    #[test]
    fn scene_error_converts_into_app_error() {
        let error: AppError = SceneError::NotFound {
            name: "missing".to_string(),
        }
        .into();

        assert_eq!(error.to_string(), "scene 'missing' not found");
    }

    #[test]
    fn slow_frame_value_parses_or_falls_back() {
        assert_eq!(parse_slow_frame_ms("40", 0), Duration::from_millis(40));
        assert_eq!(parse_slow_frame_ms(" 7 ", 0), Duration::from_millis(7));
        assert_eq!(parse_slow_frame_ms("fast", 3), Duration::from_millis(3));
    }

    #[test]
    fn target_frame_duration_none_when_cap_off() {
        assert_eq!(target_frame_duration(None), None);
    }

    #[test]
    fn target_frame_duration_for_60hz_is_expected() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn compute_cap_sleep_zero_when_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn compute_cap_sleep_positive_when_under_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(5), target_frame_duration(Some(60)));
        assert!(sleep > Duration::ZERO);
    }

    #[test]
    fn normalize_render_fps_cap_disables_zero() {
        assert_eq!(normalize_render_fps_cap(Some(0)), None);
        assert_eq!(normalize_render_fps_cap(Some(60)), Some(60));
        assert_eq!(format_render_cap(None), "off");
    }
}
