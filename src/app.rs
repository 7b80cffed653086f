//! App: terminal init, fixed-rate gravity loop, key handling.

use crate::GameConfig;
use crate::game::{GameState, TickOutcome};
use crate::input::{Action, key_to_action};
use crate::shapes::{SeededPicker, ShapePicker};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// How often the game-over screen wakes up when no key arrives.
const IDLE_POLL_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

/// Totals printed once the terminal is restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u32,
    pub lines: u32,
    pub pieces: u32,
}

pub struct App {
    theme: Theme,
    state: GameState,
    screen: Screen,
    last_tick: Instant,
    tick_interval: Duration,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let picker: Box<dyn ShapePicker> = match config.seed {
            Some(seed) => Box::new(SeededPicker::from_seed(seed)),
            None => Box::new(SeededPicker::from_entropy()),
        };
        let state = GameState::new(&config, picker);
        let screen = if state.is_game_over() {
            Screen::GameOver
        } else {
            Screen::Playing
        };
        Self {
            theme,
            state,
            screen,
            last_tick: Instant::now(),
            tick_interval: Duration::from_secs_f64(1.0 / config.tick_rate),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.state.score(),
            lines: self.state.lines_cleared(),
            pieces: self.state.pieces_spawned(),
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result.map(|()| self.summary())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_tick = Instant::now();
        loop {
            terminal.draw(|f| {
                let area = f.area();
                crate::ui::draw(f, self.screen, &self.state, &self.theme, area);
            })?;

            let timeout = match self.screen {
                Screen::Playing => self.tick_interval.saturating_sub(self.last_tick.elapsed()),
                Screen::GameOver => Duration::from_millis(IDLE_POLL_MS),
            };

            // Commands between ticks; quit is only seen here, never mid-tick.
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key_to_action(key) {
                        Action::Quit => return Ok(()),
                        Action::Move(command) if self.screen == Screen::Playing => {
                            self.state.apply(command);
                        }
                        Action::Move(_) | Action::None => {}
                    }
                }
            }

            if self.screen == Screen::Playing && self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                if let TickOutcome::GameOver { .. } | TickOutcome::Halted = self.state.tick() {
                    self.screen = Screen::GameOver;
                }
            }
        }
    }
}
