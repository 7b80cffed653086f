//! Blockfall: classic falling-block puzzle in the terminal.

mod app;
mod collision;
mod game;
mod grid;
mod input;
mod piece;
mod score;
mod shapes;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use score::ScorePolicy;

/// Options derived from CLI that affect the simulation (board size, gravity rate, shape seed, scoring).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub tick_rate: f64,
    pub seed: Option<u64>,
    pub score_policy: ScorePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            tick_rate: 10.0,
            seed: None,
            score_policy: ScorePolicy::PerLine,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let config = GameConfig {
        width: args.width,
        height: args.height,
        tick_rate: args.tick_rate,
        seed: args.seed,
        score_policy: args.scoring,
    };
    let mut app = App::new(config, theme);
    let summary = app.run()?;
    println!(
        "blockfall: score {}, lines {}, pieces {}",
        summary.score, summary.lines, summary.pieces
    );
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Classic falling-block puzzle in the terminal. Complete rows to clear them and score.",
    long_about = "Blockfall drops tetrominoes onto a fixed board one row per tick.\n\n\
        Steer and rotate the falling piece; when it can fall no further it locks in place. \
        Full rows are cleared and score points. The game ends when a new piece has no room to spawn.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move    Up or k  Rotate    Down or j  Soft drop    q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value_t = 10, value_name = "COLS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value_t = 20, value_name = "ROWS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub height: u16,

    /// Gravity ticks per second.
    #[arg(long, default_value_t = 10.0, value_name = "HZ", value_parser = parse_tick_rate)]
    pub tick_rate: f64,

    /// Seed for the shape sequence. Random when not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Scoring: per-line (10 per cleared row) or flat (10 per lock that clears anything).
    #[arg(long, value_enum, default_value_t = ScorePolicy::PerLine)]
    pub scoring: ScorePolicy,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,
}

fn parse_tick_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if rate.is_finite() && rate > 0.0 && rate <= 1000.0 {
        Ok(rate)
    } else {
        Err(format!("tick rate must be in (0, 1000], got {}", rate))
    }
}
