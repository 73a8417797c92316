mod battle;
mod field;
mod menu;
mod settings;

use engine::{scene_ref, InputHandle, SceneScheduler, Surface};

pub(crate) use battle::BattleScene;
pub(crate) use field::FieldScene;
pub(crate) use menu::MenuScene;
pub(crate) use settings::SettingsScene;

pub(crate) const MENU: &str = "menu";
pub(crate) const FIELD: &str = "field";
pub(crate) const SETTINGS: &str = "settings";
pub(crate) const BATTLE: &str = "battle";

/// Encounters always cut in quickly, whatever the configured fade length.
pub(crate) const ENCOUNTER_FADE_SECONDS: f32 = 0.25;

pub(crate) fn register_all(scheduler: &mut SceneScheduler, input: &InputHandle, fade_seconds: f32) {
    scheduler.register_scene(MENU, scene_ref(MenuScene::new(input.clone(), fade_seconds)));
    scheduler.register_scene(FIELD, scene_ref(FieldScene::new(input.clone(), fade_seconds)));
    scheduler.register_scene(SETTINGS, scene_ref(SettingsScene::new(input.clone())));
    scheduler.register_scene(BATTLE, scene_ref(BattleScene::new(input.clone())));
}

/// Maps a rectangle given in fractions of the surface to pixels.
fn layout_rect(surface: &Surface<'_>, x: f32, y: f32, width: f32, height: f32) -> [i32; 4] {
    let (surface_width, surface_height) = surface.size();
    let sw = surface_width as f32;
    let sh = surface_height as f32;
    [
        (x * sw).round() as i32,
        (y * sh).round() as i32,
        (width * sw).round() as i32,
        (height * sh).round() as i32,
    ]
}

fn fill_layout_rect(
    surface: &mut Surface<'_>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: [u8; 4],
) {
    let [px, py, pw, ph] = layout_rect(surface, x, y, width, height);
    surface.fill_rect(px, py, pw, ph, color);
}

/// Horizontal gauge: `track` across the full rect, `fill` over the leading `fraction`.
fn draw_gauge(
    surface: &mut Surface<'_>,
    rect: [f32; 4],
    fraction: f32,
    track: [u8; 4],
    fill: [u8; 4],
) {
    let [x, y, width, height] = rect;
    fill_layout_rect(surface, x, y, width, height, track);
    let filled = width * fraction.clamp(0.0, 1.0);
    if filled > 0.0 {
        fill_layout_rect(surface, x, y, filled, height, fill);
    }
}
