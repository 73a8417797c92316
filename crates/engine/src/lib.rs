pub mod app;

pub use app::{
    run_app, run_app_with_metrics, scene_ref, AppError, InputAction, InputHandle, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, Renderer, Scene, SceneCommand, SceneError,
    SceneRef, SceneScheduler, SceneSwitch, Surface, Transition, TransitionPhase, TransitionUpdate,
    Viewport, CLEAR_COLOR, DEFAULT_FADE_COLOR, DEFAULT_FADE_SECONDS, MIN_HALF_DURATION_SECONDS,
    SLOW_FRAME_ENV_VAR,
};
