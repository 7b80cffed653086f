//! Layout and drawing: playfield, falling piece, sidebar, game over.

use crate::app::Screen;
use crate::game::GameState;
use crate::grid::Grid;
use crate::score::ScorePolicy;
use crate::shapes::Rgb;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Terminal columns per board cell; two columns make a cell look roughly square.
pub const CELL_WIDTH: u16 = 2;
/// Terminal rows per board cell.
pub const CELL_HEIGHT: u16 = 1;

const SIDEBAR_WIDTH: u16 = 24;

/// Playfield size in terminal cells (border + grid) for given grid dimensions.
fn playfield_size(grid: &Grid) -> (u16, u16) {
    (
        grid.width() as u16 * CELL_WIDTH + 2,
        grid.height() as u16 * CELL_HEIGHT + 2,
    )
}

#[inline]
fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
}

/// Centre playfield + sidebar in `area`. Returns (playfield outer rect, sidebar rect).
fn game_layout(area: Rect, grid: &Grid) -> (Rect, Rect) {
    let (pw, ph) = playfield_size(grid);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    (inner[0], inner[1])
}

/// Board area inside the playfield border.
fn board_rect(area: Rect, grid: &Grid) -> Rect {
    let (playfield, _) = game_layout(area, grid);
    Block::default().borders(Borders::ALL).inner(playfield)
}

pub fn draw(frame: &mut Frame, screen: Screen, state: &GameState, theme: &Theme, area: Rect) {
    draw_game(frame, state, theme, area);
    if screen == Screen::GameOver {
        draw_game_over(frame, state, theme, area);
    }
}

fn draw_game(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let (playfield_area, sidebar_area) = game_layout(area, state.grid());
    draw_playfield(frame, state, theme, playfield_area);
    draw_sidebar(frame, state, theme, sidebar_area);
}

/// Paint one board cell at grid `(x, y)`; cells outside `board` are clipped.
fn paint_cell(buf: &mut Buffer, board: Rect, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 {
        return;
    }
    let x0 = board.x + x as u16 * CELL_WIDTH;
    let y0 = board.y + y as u16 * CELL_HEIGHT;
    for ry in y0..(y0 + CELL_HEIGHT).min(board.bottom()) {
        for rx in x0..(x0 + CELL_WIDTH).min(board.right()) {
            buf[(rx, ry)]
                .set_symbol("█")
                .set_style(Style::default().fg(color).bg(color));
        }
    }
}

fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let block = bordered(theme).title(Span::styled(" Blockfall ", Style::default().fg(theme.title)));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    buf.set_style(board, Style::default().bg(theme.bg));

    for (y, row) in state.grid().rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if let Some(c) = cell.color() {
                paint_cell(buf, board, x as i32, y as i32, to_color(c));
            }
        }
    }

    if let Some(piece) = state.piece() {
        let color = to_color(piece.color);
        for (x, y) in piece.cells() {
            paint_cell(buf, board, x, y, color);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let hint_style = Style::default().fg(theme.inactive_fg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats (border + score, lines, pieces, scoring)
            Constraint::Length(1), // gap
            Constraint::Length(7), // Controls
        ])
        .split(area);

    let scoring = match state.score_policy() {
        ScorePolicy::PerLine => "per line",
        ScorePolicy::Flat => "flat",
    };
    let stat = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, title_style), Span::styled(value, fg_style)])
    };
    let stats = vec![
        stat("Score: ", state.score().to_string()),
        stat("Lines: ", state.lines_cleared().to_string()),
        stat("Pieces: ", state.pieces_spawned().to_string()),
        stat("Scoring: ", scoring.to_string()),
    ];
    Paragraph::new(Text::from(stats))
        .block(bordered(theme))
        .render(chunks[0], frame.buffer_mut());

    let controls = vec![
        Line::from(Span::styled("←/→ h/l  move", hint_style)),
        Line::from(Span::styled("↑ k      rotate", hint_style)),
        Line::from(Span::styled("↓ j      soft drop", hint_style)),
        Line::from(Span::styled("q Esc    quit", hint_style)),
    ];
    Paragraph::new(Text::from(controls))
        .block(bordered(theme).title(Span::styled(" Keys ", title_style)))
        .render(chunks[2], frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup_w = 26u16;
    let popup_h = 8u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", state.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Lines: {} ", state.lines_cleared()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(" q  Quit ", Style::default().fg(theme.inactive_fg))),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(bordered(theme))
        .render(popup, frame.buffer_mut());
}
