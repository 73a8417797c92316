use engine::{InputAction, InputHandle, Scene, SceneCommand, Surface};

use super::{fill_layout_rect, FIELD, SETTINGS};

const BACKGROUND: [u8; 4] = [22, 38, 30, 255];
const ENTRY_IDLE: [u8; 4] = [60, 84, 70, 255];
const ENTRY_SELECTED: [u8; 4] = [226, 196, 92, 255];
const TITLE_PULSE_HZ: f32 = 0.5;
const TITLE_PULSE_PERIOD_SECONDS: f32 = 1.0 / TITLE_PULSE_HZ;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuEntry {
    Play,
    Settings,
}

const ENTRIES: [MenuEntry; 2] = [MenuEntry::Play, MenuEntry::Settings];

pub(crate) struct MenuScene {
    input: InputHandle,
    fade_seconds: f32,
    selected: usize,
    title_seconds: f32,
}

impl MenuScene {
    pub(crate) fn new(input: InputHandle, fade_seconds: f32) -> Self {
        Self {
            input,
            fade_seconds,
            selected: 0,
            title_seconds: 0.0,
        }
    }

    pub(crate) fn selected_entry(&self) -> MenuEntry {
        ENTRIES[self.selected]
    }

    fn title_brightness(&self) -> f32 {
        let phase = self.title_seconds * TITLE_PULSE_HZ * std::f32::consts::TAU;
        0.75 + 0.25 * phase.sin()
    }
}

impl Scene for MenuScene {
    fn enter(&mut self) {
        self.title_seconds = 0.0;
    }

    fn update(&mut self, dt_seconds: f32) -> SceneCommand {
        self.title_seconds =
            (self.title_seconds + dt_seconds.max(0.0)).rem_euclid(TITLE_PULSE_PERIOD_SECONDS);
        let input = self.input.snapshot();

        if input.was_pressed(InputAction::Cycle) {
            return SceneCommand::switch_to(SETTINGS);
        }
        if input.was_pressed(InputAction::MoveUp) {
            self.selected = (self.selected + ENTRIES.len() - 1) % ENTRIES.len();
        }
        if input.was_pressed(InputAction::MoveDown) {
            self.selected = (self.selected + 1) % ENTRIES.len();
        }
        if input.was_pressed(InputAction::Confirm) {
            return match self.selected_entry() {
                MenuEntry::Play => SceneCommand::fade_to(FIELD, self.fade_seconds),
                MenuEntry::Settings => SceneCommand::switch_to(SETTINGS),
            };
        }

        SceneCommand::None
    }

    fn draw(&self, surface: &mut Surface<'_>) {
        surface.clear(BACKGROUND);

        let brightness = self.title_brightness();
        let title = [
            (120.0 * brightness) as u8,
            (200.0 * brightness) as u8,
            (140.0 * brightness) as u8,
            255,
        ];
        fill_layout_rect(surface, 0.2, 0.15, 0.6, 0.15, title);

        for index in 0..ENTRIES.len() {
            let color = if index == self.selected {
                ENTRY_SELECTED
            } else {
                ENTRY_IDLE
            };
            let top = 0.45 + index as f32 * 0.18;
            fill_layout_rect(surface, 0.35, top, 0.3, 0.12, color);
        }
    }
}
