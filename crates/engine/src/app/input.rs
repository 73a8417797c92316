use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Back,
    Cycle,
}

const ACTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Confirm => 4,
            InputAction::Back => 5,
            InputAction::Cycle => 6,
        }
    }
}

/// Input for one frame: which actions are held, and which went down this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    held: ActionStates,
    pressed: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(held: ActionStates, pressed: ActionStates) -> Self {
        Self { held, pressed }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    /// Marks `action` as pressed this frame (and held).
    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.held.set(action, true);
        self.pressed.set(action, true);
        self
    }
}

/// Shared view of the latest [`InputSnapshot`].
///
/// The frame loop publishes a fresh snapshot before each scheduler update; scenes get a
/// clone of the handle at construction and read it from `update`.
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    current: Rc<RefCell<InputSnapshot>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> InputSnapshot {
        *self.current.borrow()
    }

    pub fn publish(&self, snapshot: InputSnapshot) {
        *self.current.borrow_mut() = snapshot;
    }
}
