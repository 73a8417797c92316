mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod scheduler;
mod transition;

pub use input::{InputAction, InputHandle, InputSnapshot};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{Renderer, Surface, Viewport, CLEAR_COLOR};
pub use scene::{scene_ref, Scene, SceneCommand, SceneRef, SceneSwitch, DEFAULT_FADE_SECONDS};
pub use scheduler::{SceneError, SceneScheduler, DEFAULT_FADE_COLOR};
pub use transition::{Transition, TransitionPhase, TransitionUpdate, MIN_HALF_DURATION_SECONDS};
