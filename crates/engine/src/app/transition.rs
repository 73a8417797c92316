use std::fmt;
use std::rc::Rc;

use super::rendering::Surface;
use super::scene::{SceneCommand, SceneRef};

/// Shortest allowed half of a fade. Keeps zero or negative requests from dividing by
/// zero or swapping without a rendered frame.
pub const MIN_HALF_DURATION_SECONDS: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    /// Showing the outgoing scene while the overlay closes.
    FadingOut { elapsed: f32 },
    /// Showing the incoming scene while the overlay opens.
    FadingIn { elapsed: f32 },
    Complete,
}

/// What happened during one [`Transition::update`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionUpdate {
    /// True only on the call where the fade-out finished and the target took over.
    pub swapped: bool,
    /// Command returned by whichever wrapped scene was updated.
    pub command: SceneCommand,
}

/// Timed fade-through-colour between two scenes.
///
/// The outgoing scene keeps running for the first half; at the midpoint the owner is
/// told to swap, and the incoming scene runs for the second half. Only one of the two
/// scenes is updated and drawn on any frame.
pub struct Transition {
    from: SceneRef,
    to: SceneRef,
    target_name: String,
    half_seconds: f32,
    phase: TransitionPhase,
    alpha: u8,
    fade_color: [u8; 3],
}

impl Transition {
    pub fn new(
        from: SceneRef,
        to: SceneRef,
        target_name: impl Into<String>,
        duration_seconds: f32,
        fade_color: [u8; 3],
    ) -> Self {
        Self {
            from,
            to,
            target_name: target_name.into(),
            half_seconds: clamp_half_duration(duration_seconds),
            phase: TransitionPhase::FadingOut { elapsed: 0.0 },
            alpha: 0,
            fade_color,
        }
    }

    pub fn update(&mut self, dt_seconds: f32) -> TransitionUpdate {
        let step = dt_seconds.max(0.0);
        match self.phase {
            TransitionPhase::FadingOut { elapsed } => {
                let command = self.from.borrow_mut().update(dt_seconds);
                let elapsed = elapsed + step;
                self.alpha = alpha_for_progress(elapsed / self.half_seconds);
                let swapped = elapsed >= self.half_seconds;
                self.phase = if swapped {
                    TransitionPhase::FadingIn { elapsed: 0.0 }
                } else {
                    TransitionPhase::FadingOut { elapsed }
                };
                TransitionUpdate { swapped, command }
            }
            TransitionPhase::FadingIn { elapsed } => {
                let command = self.to.borrow_mut().update(dt_seconds);
                let elapsed = elapsed + step;
                if elapsed >= self.half_seconds {
                    self.alpha = 0;
                    self.phase = TransitionPhase::Complete;
                } else {
                    self.alpha = alpha_for_progress(1.0 - elapsed / self.half_seconds);
                    self.phase = TransitionPhase::FadingIn { elapsed };
                }
                TransitionUpdate {
                    swapped: false,
                    command,
                }
            }
            TransitionPhase::Complete => TransitionUpdate::default(),
        }
    }

    pub fn draw(&self, surface: &mut Surface<'_>) {
        match self.phase {
            TransitionPhase::FadingOut { .. } => self.from.borrow().draw(surface),
            TransitionPhase::FadingIn { .. } | TransitionPhase::Complete => {
                self.to.borrow().draw(surface)
            }
        }
        surface.fade_overlay(self.fade_color, self.alpha);
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn half_seconds(&self) -> f32 {
        self.half_seconds
    }

    pub fn swapped(&self) -> bool {
        !matches!(self.phase, TransitionPhase::FadingOut { .. })
    }

    pub fn done(&self) -> bool {
        matches!(self.phase, TransitionPhase::Complete)
    }

    /// Time spent in the transition so far, across both halves.
    pub fn elapsed_seconds(&self) -> f32 {
        match self.phase {
            TransitionPhase::FadingOut { elapsed } => elapsed,
            TransitionPhase::FadingIn { elapsed } => self.half_seconds + elapsed,
            TransitionPhase::Complete => self.half_seconds * 2.0,
        }
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn to_scene(&self) -> &SceneRef {
        &self.to
    }

    pub fn wraps_same_scene(&self) -> bool {
        Rc::ptr_eq(&self.from, &self.to)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target_name", &self.target_name)
            .field("half_seconds", &self.half_seconds)
            .field("phase", &self.phase)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

fn clamp_half_duration(duration_seconds: f32) -> f32 {
    duration_seconds.max(MIN_HALF_DURATION_SECONDS)
}

fn alpha_for_progress(progress: f32) -> u8 {
    (255.0 * progress.clamp(0.0, 1.0)).round() as u8
}
