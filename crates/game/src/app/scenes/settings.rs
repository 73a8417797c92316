use engine::{InputAction, InputHandle, Scene, SceneCommand, Surface};
use tracing::info;

use super::{draw_gauge, MENU};

const MAX_VOLUME: u8 = 10;
const DEFAULT_VOLUME: u8 = 7;

const BACKGROUND: [u8; 4] = [34, 40, 58, 255];
const VOLUME_TRACK: [u8; 4] = [62, 70, 96, 255];
const VOLUME_FILL: [u8; 4] = [120, 190, 240, 255];

pub(crate) struct SettingsScene {
    input: InputHandle,
    volume: u8,
}

impl SettingsScene {
    pub(crate) fn new(input: InputHandle) -> Self {
        Self {
            input,
            volume: DEFAULT_VOLUME,
        }
    }

    pub(crate) fn volume(&self) -> u8 {
        self.volume
    }
}

impl Scene for SettingsScene {
    fn exit(&mut self) {
        info!(volume = self.volume(), "settings_applied");
    }

    fn update(&mut self, _dt_seconds: f32) -> SceneCommand {
        let input = self.input.snapshot();

        if input.was_pressed(InputAction::Back) {
            return SceneCommand::switch_to(MENU);
        }
        if input.was_pressed(InputAction::MoveLeft) {
            self.volume = self.volume.saturating_sub(1);
        }
        if input.was_pressed(InputAction::MoveRight) {
            self.volume = (self.volume + 1).min(MAX_VOLUME);
        }

        SceneCommand::None
    }

    fn draw(&self, surface: &mut Surface<'_>) {
        surface.clear(BACKGROUND);
        draw_gauge(
            surface,
            [0.2, 0.45, 0.6, 0.1],
            f32::from(self.volume) / f32::from(MAX_VOLUME),
            VOLUME_TRACK,
            VOLUME_FILL,
        );
    }
}
