//! Scrollable leaderboard table

use glam::Vec2;

use super::input::{InputEvent, Key};
use super::view::{Align, Element, TextSize, View};
use super::widgets::{Button, Rect};
use super::{Ctx, Nav};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, LEADERBOARD_VISIBLE_ROWS};
use crate::leaderboard::{DEFAULT_RUN_NAME, Leaderboard, SortMode};
use crate::sim::Color;

const TITLE_Y: f32 = 40.0;
const SUMMARY_Y: f32 = 100.0;
const TABLE_Y: f32 = 160.0;
const ROW_START_Y: f32 = TABLE_Y + 36.0;
const ROW_H: f32 = 32.0;

const COL_RANK_X: f32 = 60.0;
const COL_NAME_X: f32 = 130.0;
const COL_TIME_X: f32 = 360.0;
const COL_DATE_X: f32 = 470.0;

const GUIDE_COLOR: Color = Color::rgb(200, 200, 200);
const HINT: &str =
    "Scroll: Mouse Wheel / Up-Down • Home/End • S to toggle sorting • Enter/Esc to go back";

pub struct LeaderboardScreen {
    board: Leaderboard,
    sort: SortMode,
    /// Index of the top visible row
    scroll: usize,
    back: Button,
    clear: Button,
}

impl LeaderboardScreen {
    pub fn new(board: Leaderboard) -> Self {
        Self {
            board,
            sort: SortMode::default(),
            scroll: 0,
            back: Button::new(
                "Back",
                Vec2::new(120.0, ARENA_HEIGHT - 50.0),
                Vec2::new(180.0, 50.0),
            ),
            clear: Button::new(
                "Clear All",
                Vec2::new(ARENA_WIDTH - 140.0, ARENA_HEIGHT - 50.0),
                Vec2::new(200.0, 50.0),
            ),
        }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    fn max_scroll(&self) -> usize {
        self.board.len().saturating_sub(LEADERBOARD_VISIBLE_ROWS)
    }

    fn scroll_by(&mut self, delta: i32) {
        let target = self.scroll as i64 + delta as i64;
        self.scroll = target.clamp(0, self.max_scroll() as i64) as usize;
    }

    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut Ctx) -> Option<Nav> {
        match *event {
            InputEvent::KeyDown(Key::Escape | Key::Enter) => {
                ctx.click();
                return Some(Nav::MainMenu);
            }
            InputEvent::KeyDown(Key::Up) => self.scroll_by(-1),
            InputEvent::KeyDown(Key::Down) => self.scroll_by(1),
            InputEvent::KeyDown(Key::Home) => self.scroll = 0,
            InputEvent::KeyDown(Key::End) => self.scroll = self.max_scroll(),
            InputEvent::KeyDown(k) if k.is_char('s') => {
                self.sort = self.sort.toggle();
                self.scroll = 0;
                ctx.click();
            }
            InputEvent::Wheel { notches } => self.scroll_by(notches),
            _ if self.back.clicked(event) => {
                ctx.click();
                return Some(Nav::MainMenu);
            }
            _ if self.clear.clicked(event) && !self.board.is_empty() => {
                ctx.click();
                self.board.clear();
                self.scroll = 0;
                match self.board.save(ctx.storage) {
                    Ok(()) => log::info!("Leaderboard cleared"),
                    Err(e) => log::warn!("Failed to clear leaderboard: {}", e),
                }
            }
            _ => {}
        }
        None
    }

    fn summary(&self) -> String {
        let best = match self.board.fastest_time() {
            Some(t) => format!("{:.2} s", t),
            None => "—".to_string(),
        };
        format!(
            "Best Time: {}   •   Total Plays: {}   • Sorting: {}",
            best,
            self.board.len(),
            self.sort.label()
        )
    }

    pub fn view(&self, mouse: Vec2) -> View {
        let mut view = View::new();
        let center_x = ARENA_WIDTH / 2.0;

        view.colored_text(
            "Leaderboard",
            Vec2::new(center_x, TITLE_Y + TextSize::Title.px() as f32 / 2.0),
            TextSize::Title,
            Align::Center,
            Color::ACCENT,
        );
        view.text(
            self.summary(),
            Vec2::new(center_x, SUMMARY_Y + TextSize::Normal.px() as f32 / 2.0),
            TextSize::Normal,
            Align::Center,
        );

        for (label, x) in [
            ("Rank", COL_RANK_X),
            ("Name", COL_NAME_X),
            ("Time (s)", COL_TIME_X),
            ("Date", COL_DATE_X),
        ] {
            view.colored_text(
                label,
                Vec2::new(x, TABLE_Y),
                TextSize::Small,
                Align::Left,
                Color::DARK,
            );
        }
        view.push(Element::Bar {
            rect: Rect::new(COL_RANK_X, TABLE_Y + 28.0, ARENA_WIDTH - 80.0 - COL_RANK_X, 2.0),
            color: GUIDE_COLOR,
        });

        let mut y = ROW_START_Y;
        let rows = self.board.sorted(self.sort);
        for (idx, run) in rows
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(LEADERBOARD_VISIBLE_ROWS)
        {
            let name = if run.name.is_empty() {
                DEFAULT_RUN_NAME
            } else {
                run.name.as_str()
            };
            let time = run.time.map_or_else(|| "—".to_string(), |t| format!("{:.2}", t));
            let cells = [
                ((idx + 1).to_string(), COL_RANK_X),
                (name.to_string(), COL_NAME_X),
                (time, COL_TIME_X),
                (run.date.clone(), COL_DATE_X),
            ];
            for (text, x) in cells {
                view.text(text, Vec2::new(x, y), TextSize::Mono, Align::Left);
            }
            y += ROW_H;
        }

        view.colored_text(
            HINT,
            Vec2::new(COL_RANK_X, y + 8.0),
            TextSize::Small,
            Align::Left,
            Color::DARK,
        );

        view.button(&self.back, mouse);
        view.button_with_state(&self.clear, mouse, self.board.is_empty());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::persistence::{MemoryStorage, Storage};
    use crate::settings::Settings;
    use crate::ui::input::MouseButton;

    fn board_with(n: usize) -> Leaderboard {
        let mut board = Leaderboard::new();
        for i in 0..n {
            board.record_run(
                10.0 + i as f64,
                "Ann",
                format!("2025-01-{:02} 12:00:00", i + 1),
            );
        }
        board
    }

    fn send(
        screen: &mut LeaderboardScreen,
        storage: &dyn Storage,
        event: InputEvent,
    ) -> Option<Nav> {
        let mut settings = Settings::default();
        let mut events: Vec<AppEvent> = Vec::new();
        let mut ctx = Ctx {
            settings: &mut settings,
            storage,
            events: &mut events,
        };
        screen.handle_event(&event, &mut ctx)
    }

    #[test]
    fn test_scroll_is_clamped() {
        let storage = MemoryStorage::new();
        let mut screen = LeaderboardScreen::new(board_with(12));

        send(&mut screen, &storage, InputEvent::KeyDown(Key::Up));
        assert_eq!(screen.scroll(), 0);

        for _ in 0..10 {
            send(&mut screen, &storage, InputEvent::KeyDown(Key::Down));
        }
        assert_eq!(screen.scroll(), 4);

        send(&mut screen, &storage, InputEvent::KeyDown(Key::Home));
        assert_eq!(screen.scroll(), 0);
        send(&mut screen, &storage, InputEvent::KeyDown(Key::End));
        assert_eq!(screen.scroll(), 4);
        send(&mut screen, &storage, InputEvent::Wheel { notches: -1 });
        assert_eq!(screen.scroll(), 3);
    }

    #[test]
    fn test_short_board_never_scrolls() {
        let storage = MemoryStorage::new();
        let mut screen = LeaderboardScreen::new(board_with(3));
        send(&mut screen, &storage, InputEvent::KeyDown(Key::End));
        send(&mut screen, &storage, InputEvent::Wheel { notches: 3 });
        assert_eq!(screen.scroll(), 0);
    }

    #[test]
    fn test_sort_toggle_resets_scroll() {
        let storage = MemoryStorage::new();
        let mut screen = LeaderboardScreen::new(board_with(12));
        send(&mut screen, &storage, InputEvent::KeyDown(Key::End));
        send(&mut screen, &storage, InputEvent::KeyDown(Key::Char('S')));
        assert_eq!(screen.sort(), SortMode::Best);
        assert_eq!(screen.scroll(), 0);
        assert!(screen.view(Vec2::ZERO).contains_text("Sorting: Best Times"));
    }

    #[test]
    fn test_clear_all_persists_empty_board() {
        let storage = MemoryStorage::new();
        board_with(2).save(&storage).unwrap();
        let mut screen = LeaderboardScreen::new(Leaderboard::load(&storage));

        let click = InputEvent::MouseDown {
            pos: Vec2::new(ARENA_WIDTH - 140.0, ARENA_HEIGHT - 50.0),
            button: MouseButton::Left,
        };
        assert_eq!(send(&mut screen, &storage, click), None);
        assert!(screen.board().is_empty());
        assert!(Leaderboard::load(&storage).is_empty());
    }

    #[test]
    fn test_summary_and_rows() {
        let screen = LeaderboardScreen::new(board_with(10));
        let view = screen.view(Vec2::ZERO);
        assert!(view.contains_text("Best Time: 10.00 s"));
        assert!(view.contains_text("Total Plays: 10"));
        // Recent first: the newest run (19.00) heads the table
        assert!(view.contains_text("19.00"));
        // Only eight rows are drawn
        assert!(!view.contains_text("2025-01-01 12:00:00"));
        assert!(!view.contains_text("2025-01-02 12:00:00"));
        assert!(view.contains_text("2025-01-03 12:00:00"));
    }

    #[test]
    fn test_empty_board_summary() {
        let view = LeaderboardScreen::new(Leaderboard::new()).view(Vec2::ZERO);
        assert!(view.contains_text("Best Time: —"));
        assert!(view.contains_text("Total Plays: 0"));
    }

    #[test]
    fn test_back_navigation() {
        let storage = MemoryStorage::new();
        let mut screen = LeaderboardScreen::new(Leaderboard::new());
        assert_eq!(
            send(&mut screen, &storage, InputEvent::KeyDown(Key::Enter)),
            Some(Nav::MainMenu)
        );
    }
}
