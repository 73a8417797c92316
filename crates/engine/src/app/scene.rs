use std::cell::RefCell;
use std::rc::Rc;

use super::rendering::Surface;

pub const DEFAULT_FADE_SECONDS: f32 = 0.25;

/// How a requested scene change should be carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SceneSwitch {
    /// Swap at the next frame boundary with no visual transition.
    #[default]
    Immediate,
    /// Fade the current scene out and the target in, each half taking `duration_seconds`.
    Fade { duration_seconds: f32 },
}

impl SceneSwitch {
    pub fn fade() -> Self {
        Self::fade_for(DEFAULT_FADE_SECONDS)
    }

    pub fn fade_for(duration_seconds: f32) -> Self {
        Self::Fade { duration_seconds }
    }

    pub fn is_fade(&self) -> bool {
        matches!(self, Self::Fade { .. })
    }
}

/// Returned from [`Scene::update`] to ask the scheduler for a scene change.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SceneCommand {
    #[default]
    None,
    ChangeScene { name: String, switch: SceneSwitch },
}

impl SceneCommand {
    pub fn switch_to(name: impl Into<String>) -> Self {
        Self::ChangeScene {
            name: name.into(),
            switch: SceneSwitch::Immediate,
        }
    }

    pub fn fade_to(name: impl Into<String>, duration_seconds: f32) -> Self {
        Self::ChangeScene {
            name: name.into(),
            switch: SceneSwitch::fade_for(duration_seconds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A self-contained screen driven by the [`SceneScheduler`](super::SceneScheduler).
///
/// Every hook has a no-op default so a scene only overrides what it needs.
/// `enter` and `exit` are each called exactly once per activation; `update` and
/// `draw` only run while the scene is the one on screen.
pub trait Scene {
    fn enter(&mut self) {}

    fn exit(&mut self) {}

    fn update(&mut self, _dt_seconds: f32) -> SceneCommand {
        SceneCommand::None
    }

    fn draw(&self, _surface: &mut Surface<'_>) {}
}

/// Shared handle to a registered scene. The registering code keeps its own clone;
/// the scheduler never drops a scene on its own.
pub type SceneRef = Rc<RefCell<dyn Scene>>;

pub fn scene_ref<S: Scene + 'static>(scene: S) -> SceneRef {
    Rc::new(RefCell::new(scene))
}
