use engine::{InputAction, InputHandle, Scene, SceneCommand, Surface};
use tracing::info;

use super::{draw_gauge, fill_layout_rect, FIELD};

const ENEMY_MAX_HEALTH: u32 = 3;
/// Strikes are ignored until the enemy has slid in.
const INTRO_SECONDS: f32 = 0.4;

const BACKGROUND: [u8; 4] = [28, 24, 44, 255];
const ENEMY_COLOR: [u8; 4] = [180, 70, 160, 255];
const HEALTH_TRACK: [u8; 4] = [50, 44, 70, 255];
const HEALTH_FILL: [u8; 4] = [96, 220, 120, 255];

pub(crate) struct BattleScene {
    input: InputHandle,
    intro_seconds: f32,
    enemy_health: u32,
}

impl BattleScene {
    pub(crate) fn new(input: InputHandle) -> Self {
        Self {
            input,
            intro_seconds: 0.0,
            enemy_health: ENEMY_MAX_HEALTH,
        }
    }

    pub(crate) fn enemy_health(&self) -> u32 {
        self.enemy_health
    }

    fn intro_progress(&self) -> f32 {
        (self.intro_seconds / INTRO_SECONDS).clamp(0.0, 1.0)
    }
}

impl Scene for BattleScene {
    fn enter(&mut self) {
        self.intro_seconds = 0.0;
        self.enemy_health = ENEMY_MAX_HEALTH;
    }

    fn update(&mut self, dt_seconds: f32) -> SceneCommand {
        self.intro_seconds += dt_seconds.max(0.0);
        let input = self.input.snapshot();

        if input.was_pressed(InputAction::Back) {
            info!(enemy_health = self.enemy_health(), "battle_fled");
            return SceneCommand::switch_to(FIELD);
        }
        if input.was_pressed(InputAction::Confirm) && self.intro_progress() >= 1.0 {
            self.enemy_health = self.enemy_health.saturating_sub(1);
            if self.enemy_health == 0 {
                info!("battle_won");
                return SceneCommand::switch_to(FIELD);
            }
        }

        SceneCommand::None
    }

    fn draw(&self, surface: &mut Surface<'_>) {
        surface.clear(BACKGROUND);

        let slide = 1.0 - self.intro_progress();
        fill_layout_rect(surface, 0.6 + slide * 0.4, 0.2, 0.2, 0.3, ENEMY_COLOR);

        let health = self.enemy_health as f32 / ENEMY_MAX_HEALTH as f32;
        draw_gauge(
            surface,
            [0.55, 0.08, 0.3, 0.05],
            health,
            HEALTH_TRACK,
            HEALTH_FILL,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{pixel_at, press, release_all, render};
    use super::*;

    fn battle() -> (InputHandle, BattleScene) {
        let input = InputHandle::new();
        let mut scene = BattleScene::new(input.clone());
        scene.enter();
        (input, scene)
    }

    fn finish_intro(input: &InputHandle, scene: &mut BattleScene) {
        release_all(input);
        assert!(scene.update(INTRO_SECONDS).is_none());
    }

    #[test]
    fn back_flees_to_field() {
        let (input, mut scene) = battle();
        press(&input, InputAction::Back);

        assert_eq!(scene.update(0.016), SceneCommand::switch_to(FIELD));
    }

    #[test]
    fn strikes_are_ignored_during_intro() {
        let (input, mut scene) = battle();
        press(&input, InputAction::Confirm);

        assert!(scene.update(0.016).is_none());
        assert_eq!(scene.enemy_health(), ENEMY_MAX_HEALTH);
    }

    #[test]
    fn third_strike_wins_and_returns_to_field() {
        let (input, mut scene) = battle();
        finish_intro(&input, &mut scene);

        press(&input, InputAction::Confirm);
        assert!(scene.update(0.016).is_none());
        press(&input, InputAction::Confirm);
        assert!(scene.update(0.016).is_none());
        assert_eq!(scene.enemy_health(), 1);

        press(&input, InputAction::Confirm);
        assert_eq!(scene.update(0.016), SceneCommand::switch_to(FIELD));
        assert_eq!(scene.enemy_health(), 0);
    }

    #[test]
    fn enter_resets_the_encounter() {
        let (input, mut scene) = battle();
        finish_intro(&input, &mut scene);
        press(&input, InputAction::Confirm);
        scene.update(0.016);
        assert_eq!(scene.enemy_health(), ENEMY_MAX_HEALTH - 1);

        scene.exit();
        scene.enter();
        assert_eq!(scene.enemy_health(), ENEMY_MAX_HEALTH);

        press(&input, InputAction::Confirm);
        scene.update(0.016);
        assert_eq!(scene.enemy_health(), ENEMY_MAX_HEALTH);
    }

    #[test]
    fn enemy_slides_in_during_intro() {
        let (input, mut scene) = battle();
        let before = render(100, 100, |surface| scene.draw(surface));
        assert_eq!(pixel_at(&before, 100, 70, 30), BACKGROUND);

        finish_intro(&input, &mut scene);
        let after = render(100, 100, |surface| scene.draw(surface));
        assert_eq!(pixel_at(&after, 100, 70, 30), ENEMY_COLOR);
        assert_eq!(pixel_at(&after, 100, 60, 10), HEALTH_FILL);
    }
}
