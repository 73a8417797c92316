use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::rendering::Surface;
use super::scene::{SceneCommand, SceneRef, SceneSwitch};
use super::transition::Transition;

pub const DEFAULT_FADE_COLOR: [u8; 3] = [0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene '{name}' not found")]
    NotFound { name: String },
}

struct ActiveScene {
    name: String,
    scene: SceneRef,
}

/// Owns the scene registry, the active scene and at most one in-flight [`Transition`].
///
/// Switch requests are validated immediately but take effect inside [`update`], so a
/// request made mid-frame never tears the frame being drawn.
///
/// [`update`]: SceneScheduler::update
pub struct SceneScheduler {
    scenes: HashMap<String, SceneRef>,
    active: Option<ActiveScene>,
    pending: Option<String>,
    transition: Option<Transition>,
    fade_color: [u8; 3],
    switch_count: u64,
}

impl SceneScheduler {
    pub fn new() -> Self {
        Self::with_fade_color(DEFAULT_FADE_COLOR)
    }

    pub fn with_fade_color(fade_color: [u8; 3]) -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
            pending: None,
            transition: None,
            fade_color,
            switch_count: 0,
        }
    }

    /// Adds `scene` under `name`, replacing any scene already registered there.
    /// A replaced scene that is currently active or mid-transition keeps running until
    /// the next switch away from it.
    pub fn register_scene(&mut self, name: impl Into<String>, scene: SceneRef) {
        let name = name.into();
        if self.scenes.insert(name.clone(), scene).is_some() {
            warn!(scene = %name, "scene_replaced");
        } else {
            debug!(scene = %name, "scene_registered");
        }
    }

    pub fn change_scene(&mut self, name: &str, switch: SceneSwitch) -> Result<(), SceneError> {
        let Some(target) = self.scenes.get(name) else {
            return Err(SceneError::NotFound {
                name: name.to_string(),
            });
        };

        let Some(active) = &self.active else {
            // Nothing to fade from yet; apply on the next update regardless of `switch`.
            info!(scene = name, mode = "initial", "scene_change_requested");
            self.pending = Some(name.to_string());
            return Ok(());
        };

        if self.transition.is_some() {
            debug!(scene = name, "scene_change_ignored_during_transition");
            return Ok(());
        }

        match switch {
            SceneSwitch::Fade { duration_seconds } => {
                let transition = Transition::new(
                    Rc::clone(&active.scene),
                    Rc::clone(target),
                    name,
                    duration_seconds,
                    self.fade_color,
                );
                info!(
                    from = %active.name,
                    to = name,
                    half_seconds = transition.half_seconds(),
                    "transition_started"
                );
                self.transition = Some(transition);
            }
            SceneSwitch::Immediate => {
                info!(scene = name, mode = "immediate", "scene_change_requested");
                self.pending = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Advances one frame.
    ///
    /// Exactly one of these happens per call: a pending switch is applied, the
    /// in-flight transition advances, or the active scene updates. A finished
    /// transition is dropped first, so a switch left pending during the fade is
    /// applied in that same call.
    pub fn update(&mut self, dt_seconds: f32) -> Result<(), SceneError> {
        if self.transition.as_ref().is_some_and(Transition::done) {
            if let Some(finished) = self.transition.take() {
                info!(scene = finished.target_name(), "transition_finished");
            }
        }

        if self.transition.is_none() {
            if let Some(target) = self.pending.take() {
                let scene = self
                    .scenes
                    .get(&target)
                    .cloned()
                    .ok_or_else(|| SceneError::NotFound {
                        name: target.clone(),
                    })?;
                self.make_active(target, scene);
                return Ok(());
            }
        }

        if let Some(transition) = self.transition.as_mut() {
            let outcome = transition.update(dt_seconds);
            let swap_target = outcome.swapped.then(|| {
                (
                    transition.target_name().to_string(),
                    Rc::clone(transition.to_scene()),
                )
            });
            if let Some((name, scene)) = swap_target {
                info!(scene = %name, "transition_swapped");
                self.make_active(name, scene);
            }
            return self.apply_command(outcome.command);
        }

        let command = match &self.active {
            Some(active) => active.scene.borrow_mut().update(dt_seconds),
            None => SceneCommand::None,
        };
        self.apply_command(command)
    }

    pub fn draw(&self, surface: &mut Surface<'_>) {
        if let Some(transition) = &self.transition {
            transition.draw(surface);
        } else if let Some(active) = &self.active {
            active.scene.borrow().draw(surface);
        }
    }

    /// Exits the active scene and drops any transition. Used when the frame loop ends.
    pub fn shutdown(&mut self) {
        self.pending = None;
        self.transition = None;
        if let Some(active) = self.active.take() {
            active.scene.borrow_mut().exit();
            info!(scene = %active.name, "scene_exited");
        }
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    pub fn active_scene(&self) -> Option<&SceneRef> {
        self.active.as_ref().map(|active| &active.scene)
    }

    pub fn pending_scene_name(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn contains_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn scene(&self, name: &str) -> Option<&SceneRef> {
        self.scenes.get(name)
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// Number of times a scene has become active since construction.
    pub fn switch_count(&self) -> u64 {
        self.switch_count
    }

    fn make_active(&mut self, name: String, scene: SceneRef) {
        if let Some(previous) = self.active.take() {
            previous.scene.borrow_mut().exit();
        }
        self.active = Some(ActiveScene {
            name: name.clone(),
            scene: Rc::clone(&scene),
        });
        scene.borrow_mut().enter();
        self.switch_count = self.switch_count.saturating_add(1);
        info!(scene = %name, "scene_entered");
    }

    fn apply_command(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        match command {
            SceneCommand::None => Ok(()),
            SceneCommand::ChangeScene { name, switch } => self.change_scene(&name, switch),
        }
    }
}

impl Default for SceneScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.scene_names().collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("SceneScheduler")
            .field("scenes", &names)
            .field("active", &self.active_scene_name())
            .field("pending", &self.pending)
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}
