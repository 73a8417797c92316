use engine::{InputAction, InputHandle, InputSnapshot, Scene, SceneCommand, Surface};
use tracing::debug;

use super::{BATTLE, ENCOUNTER_FADE_SECONDS, MENU};

/// Field extent in field units; drawing scales it to the surface.
const FIELD_WIDTH: f32 = 320.0;
const FIELD_HEIGHT: f32 = 180.0;
const TILE_SIZE: f32 = 20.0;
const MARKER_SIZE: f32 = 8.0;
const MARKER_SPEED_UNITS_PER_SECOND: f32 = 90.0;
const ENCOUNTER_DISTANCE_UNITS: f32 = 600.0;

const GRASS_LIGHT: [u8; 4] = [78, 140, 70, 255];
const GRASS_DARK: [u8; 4] = [66, 124, 60, 255];
const MARKER_COLOR: [u8; 4] = [232, 88, 64, 255];

pub(crate) struct FieldScene {
    input: InputHandle,
    fade_seconds: f32,
    marker: (f32, f32),
    distance_since_encounter: f32,
}

impl FieldScene {
    pub(crate) fn new(input: InputHandle, fade_seconds: f32) -> Self {
        Self {
            input,
            fade_seconds,
            marker: (FIELD_WIDTH * 0.5, FIELD_HEIGHT * 0.5),
            distance_since_encounter: 0.0,
        }
    }

    pub(crate) fn marker(&self) -> (f32, f32) {
        self.marker
    }

    fn walk(&mut self, input: &InputSnapshot, dt_seconds: f32) -> f32 {
        let dx = axis(input, InputAction::MoveLeft, InputAction::MoveRight);
        let dy = axis(input, InputAction::MoveUp, InputAction::MoveDown);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 || dt_seconds <= 0.0 {
            return 0.0;
        }

        let step = MARKER_SPEED_UNITS_PER_SECOND * dt_seconds / length;
        let (x, y) = self.marker;
        let next = (
            (x + dx * step).clamp(0.0, FIELD_WIDTH - MARKER_SIZE),
            (y + dy * step).clamp(0.0, FIELD_HEIGHT - MARKER_SIZE),
        );
        let moved = ((next.0 - x).powi(2) + (next.1 - y).powi(2)).sqrt();
        self.marker = next;
        moved
    }
}

fn axis(input: &InputSnapshot, negative: InputAction, positive: InputAction) -> f32 {
    match (input.is_down(negative), input.is_down(positive)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

impl Scene for FieldScene {
    fn enter(&mut self) {
        let (x, y) = self.marker();
        debug!(x, y, "field_entered");
    }

    fn update(&mut self, dt_seconds: f32) -> SceneCommand {
        let input = self.input.snapshot();

        if input.was_pressed(InputAction::Back) {
            return SceneCommand::fade_to(MENU, self.fade_seconds);
        }
        if input.was_pressed(InputAction::Cycle) {
            return SceneCommand::fade_to(BATTLE, ENCOUNTER_FADE_SECONDS);
        }

        self.distance_since_encounter += self.walk(&input, dt_seconds);
        if self.distance_since_encounter >= ENCOUNTER_DISTANCE_UNITS {
            self.distance_since_encounter = 0.0;
            debug!("field_encounter");
            return SceneCommand::fade_to(BATTLE, ENCOUNTER_FADE_SECONDS);
        }

        SceneCommand::None
    }

    fn draw(&self, surface: &mut Surface<'_>) {
        let (width, height) = surface.size();
        let scale_x = width as f32 / FIELD_WIDTH;
        let scale_y = height as f32 / FIELD_HEIGHT;

        let columns = (FIELD_WIDTH / TILE_SIZE) as i32;
        let rows = (FIELD_HEIGHT / TILE_SIZE).ceil() as i32;
        for row in 0..rows {
            for column in 0..columns {
                let color = if (row + column) % 2 == 0 {
                    GRASS_LIGHT
                } else {
                    GRASS_DARK
                };
                let left = (column as f32 * TILE_SIZE * scale_x).round() as i32;
                let top = (row as f32 * TILE_SIZE * scale_y).round() as i32;
                let right = ((column + 1) as f32 * TILE_SIZE * scale_x).round() as i32;
                let bottom = ((row + 1) as f32 * TILE_SIZE * scale_y).round() as i32;
                surface.fill_rect(left, top, right - left, bottom - top, color);
            }
        }

        let (x, y) = self.marker;
        surface.fill_rect(
            (x * scale_x).round() as i32,
            (y * scale_y).round() as i32,
            (MARKER_SIZE * scale_x).round().max(1.0) as i32,
            (MARKER_SIZE * scale_y).round().max(1.0) as i32,
            MARKER_COLOR,
        );
    }
}
