//! In-game screen: drives the fixed-step simulation and the win overlay

use glam::Vec2;

use super::input::{InputEvent, Key};
use super::view::{Align, Element, SceneView, TextSize, View};
use super::{Ctx, Nav, screen_center};
use crate::app::AppEvent;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::SpawnError;
use crate::leaderboard::Leaderboard;
use crate::settings::Settings;
use crate::sim::{Color, GameEvent, GameState, TickInput, tick};

/// Dimming applied over the frozen win frame
const WIN_SHADE_ALPHA: f32 = 0.55;
/// Gap between the player's top edge and the name tag
const NAME_TAG_GAP: f32 = 6.0;

/// Frame captured the moment the last circle was eaten
#[derive(Debug, Clone, PartialEq)]
pub struct WinSnapshot {
    pub scene: SceneView,
    pub time_secs: f64,
    pub is_new_record: bool,
}

/// Arrow keys currently held
#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            _ => {}
        }
    }
}

pub struct GameScreen {
    state: GameState,
    keys: HeldKeys,
    accumulator: f32,
    autopilot: bool,
    win: Option<WinSnapshot>,
}

impl GameScreen {
    /// Start a session using the current difficulty
    pub fn new(seed: u64, settings: &Settings, autopilot: bool) -> Result<Self, SpawnError> {
        let state = GameState::new(seed, settings.difficulty.speed_multiplier())?;
        Ok(Self::from_state(state, autopilot))
    }

    /// Wrap an existing session (scripted setups)
    pub fn from_state(state: GameState, autopilot: bool) -> Self {
        Self {
            state,
            keys: HeldKeys::default(),
            accumulator: 0.0,
            autopilot,
            win: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn win(&self) -> Option<&WinSnapshot> {
        self.win.as_ref()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut Ctx) -> Option<Nav> {
        match *event {
            InputEvent::KeyDown(key) => {
                let leave = if self.win.is_some() {
                    matches!(key, Key::Escape | Key::Enter | Key::Space)
                } else {
                    key == Key::Escape
                };
                if leave {
                    ctx.click();
                    return Some(Nav::MainMenu);
                }
                if key.is_char('i') {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot {}", if self.autopilot { "on" } else { "off" });
                }
                self.keys.set(key, true);
            }
            InputEvent::KeyUp(key) => self.keys.set(key, false),
            _ => {}
        }
        None
    }

    fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.keys.up,
            down: self.keys.down,
            left: self.keys.left,
            right: self.keys.right,
            autopilot: self.autopilot,
        }
    }

    /// Advance by one frame of wall time
    pub fn update(&mut self, dt: f32, ctx: &mut Ctx) {
        if self.win.is_some() {
            return;
        }

        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.tick_input();
            for event in tick(&mut self.state, &input) {
                match event {
                    GameEvent::CircleEaten { .. } => ctx.sound(SoundEffect::CircleEaten),
                    GameEvent::Won { time_secs } => self.on_win(time_secs, ctx),
                }
            }
            self.accumulator -= SIM_DT;
            substeps += 1;

            if self.win.is_some() {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// Record the run and freeze the final frame
    fn on_win(&mut self, time_secs: f64, ctx: &mut Ctx) {
        let date = chrono::Local::now().format(DATE_FORMAT).to_string();
        let name = ctx.settings.last_name.clone();

        let is_new_record =
            match Leaderboard::record_run_persisted(ctx.storage, time_secs, &name, date) {
                Ok(outcome) => outcome.is_new_record,
                Err(e) => {
                    log::warn!("Failed to save run: {}", e);
                    Leaderboard::load(ctx.storage).is_new_record(time_secs)
                }
            };

        log::info!(
            "{} won in {:.2}s{}",
            name,
            time_secs,
            if is_new_record { " (new record)" } else { "" }
        );

        ctx.events.push(AppEvent::StopMusic);
        if is_new_record {
            ctx.sound(SoundEffect::NewRecord);
        }

        self.win = Some(WinSnapshot {
            scene: SceneView {
                blurred: true,
                ..self.scene()
            },
            time_secs,
            is_new_record,
        });
    }

    fn scene(&self) -> SceneView {
        SceneView {
            player: self.state.player.clone(),
            circles: self.state.circles.clone(),
            blurred: false,
        }
    }

    pub fn view(&self, name: &str) -> View {
        let mut view = View::new();

        if let Some(win) = &self.win {
            view.scene = Some(win.scene.clone());
            view.push(Element::Shade {
                alpha: WIN_SHADE_ALPHA,
            });

            let c = screen_center();
            view.colored_text(
                "Game Won!",
                c - Vec2::new(0.0, 60.0),
                TextSize::Big,
                Align::Center,
                Color::ACCENT,
            );
            view.colored_text(
                format!("Your time: {:.2} s", win.time_secs),
                c,
                TextSize::Normal,
                Align::Center,
                Color::WHITE,
            );
            if win.is_new_record {
                view.colored_text(
                    "New Record!",
                    c + Vec2::new(0.0, 60.0),
                    TextSize::Big,
                    Align::Center,
                    Color::RED,
                );
            }
            view.colored_text(
                "Press ENTER or ESC to return",
                c + Vec2::new(0.0, 120.0),
                TextSize::Normal,
                Align::Center,
                Color::WHITE,
            );
            return view;
        }

        view.scene = Some(self.scene());

        let player = &self.state.player;
        let tag_lift = player.radius + NAME_TAG_GAP + TextSize::Small.px() as f32 / 2.0;
        let tag_pos = player.pos - Vec2::new(0.0, tag_lift);
        view.colored_text(name, tag_pos, TextSize::Small, Align::Center, Color::DARK);

        view.text(
            format!("Points: {}", self.state.score),
            Vec2::new(10.0, 10.0),
            TextSize::Normal,
            Align::Left,
        );
        view.text(
            format!("Time: {:.2} s", self.state.elapsed_secs()),
            Vec2::new(10.0, 45.0),
            TextSize::Normal,
            Align::Left,
        );
        if self.autopilot {
            view.colored_text(
                "Autopilot (I)",
                Vec2::new(10.0, 80.0),
                TextSize::Small,
                Align::Left,
                Color::DARK,
            );
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::sim::Circle;

    struct Harness {
        storage: MemoryStorage,
        settings: Settings,
        events: Vec<AppEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                storage: MemoryStorage::new(),
                settings: Settings::default(),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> Ctx<'_> {
            Ctx {
                settings: &mut self.settings,
                storage: &self.storage,
                events: &mut self.events,
            }
        }
    }

    fn one_circle_game(x: f32) -> GameScreen {
        let mut state = GameState::empty(1, 1.0);
        state.circles.push(Circle {
            id: 1,
            pos: Vec2::new(x, 100.0),
            radius: 10.0,
            color: Color::BLACK,
            vel: Vec2::new(-5.0, 0.0),
        });
        GameScreen::from_state(state, false)
    }

    #[test]
    fn test_win_records_run_and_freezes() {
        let mut h = Harness::new();
        h.settings.last_name = "Ann".to_string();
        let mut game = one_circle_game(138.0);

        game.update(SIM_DT, &mut h.ctx());

        let win = game.win().expect("won");
        assert!(win.is_new_record);
        assert!((win.time_secs - 1.0 / 60.0).abs() < 1e-9);
        assert!(win.scene.blurred);
        assert!(h.events.contains(&AppEvent::Sound(SoundEffect::CircleEaten)));
        assert!(h.events.contains(&AppEvent::Sound(SoundEffect::NewRecord)));
        assert!(h.events.contains(&AppEvent::StopMusic));

        let board = Leaderboard::load(&h.storage);
        assert_eq!(board.runs.len(), 1);
        assert_eq!(board.runs[0].name, "Ann");
        assert_eq!(board.runs[0].date.len(), 19);

        let view = game.view("Ann");
        assert!(view.contains_text("Game Won!"));
        assert!(view.contains_text("Your time: 0.02 s"));
        assert!(view.contains_text("New Record!"));
    }

    #[test]
    fn test_slower_run_is_not_a_record() {
        let mut h = Harness::new();
        let mut board = Leaderboard::new();
        board.record_run(0.001, "Fast", "2025-01-01 00:00:00".to_string());
        board.save(&h.storage).unwrap();

        let mut game = one_circle_game(138.0);
        game.update(SIM_DT, &mut h.ctx());

        assert!(!game.win().unwrap().is_new_record);
        assert!(!h.events.contains(&AppEvent::Sound(SoundEffect::NewRecord)));
        assert!(!game.view("x").contains_text("New Record!"));
    }

    #[test]
    fn test_held_keys_move_player() {
        let mut h = Harness::new();
        let mut game = one_circle_game(900.0);

        game.handle_event(&InputEvent::KeyDown(Key::Right), &mut h.ctx());
        game.update(SIM_DT * 2.0, &mut h.ctx());
        assert_eq!(game.state().player.pos.x, 110.0);

        game.handle_event(&InputEvent::KeyUp(Key::Right), &mut h.ctx());
        game.update(SIM_DT, &mut h.ctx());
        assert_eq!(game.state().player.pos.x, 110.0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut h = Harness::new();
        let mut game = one_circle_game(900.0);
        game.update(5.0, &mut h.ctx());
        assert_eq!(game.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_escape_semantics() {
        let mut h = Harness::new();
        let mut game = one_circle_game(900.0);

        // Enter does nothing while playing
        assert_eq!(game.handle_event(&InputEvent::KeyDown(Key::Enter), &mut h.ctx()), None);
        assert_eq!(
            game.handle_event(&InputEvent::KeyDown(Key::Escape), &mut h.ctx()),
            Some(Nav::MainMenu)
        );

        let mut won = one_circle_game(138.0);
        won.update(SIM_DT, &mut h.ctx());
        assert_eq!(
            won.handle_event(&InputEvent::KeyDown(Key::Space), &mut h.ctx()),
            Some(Nav::MainMenu)
        );
    }

    #[test]
    fn test_hud_and_name_tag() {
        let game = one_circle_game(900.0);
        let view = game.view("Bob");
        assert!(view.contains_text("Points: 0"));
        assert!(view.contains_text("Time: 0.00 s"));
        assert!(view.contains_text("Bob"));
        assert!(!view.scene.unwrap().blurred);
    }

    #[test]
    fn test_autopilot_toggle() {
        let mut h = Harness::new();
        let mut game = one_circle_game(900.0);
        game.handle_event(&InputEvent::KeyDown(Key::Char('i')), &mut h.ctx());
        assert!(game.autopilot());
        assert!(game.view("x").contains_text("Autopilot"));
    }
}
