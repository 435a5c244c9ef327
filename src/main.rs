use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::Level;

use tetris_engine::config::{BOARD_HEIGHT, BOARD_WIDTH};
use tetris_engine::shapes::shape;
use tetris_engine::{Cell, Game, GameState, PieceKind};

/// tetris - falling-block puzzle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the piece randomizer (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const PREVIEW_SIZE: usize = 4;
const FRAME_MS: u64 = 16;

// ============================================================================
// Color Mapping
// ============================================================================

fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game) {
    let area = frame.size();

    render_game(frame, game, area);
    match game.state() {
        GameState::Playing => {}
        GameState::Paused => render_paused(frame, area),
        GameState::GameOver => render_game_over(frame, game, area),
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let grid_display_width = (BOARD_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = BOARD_HEIGHT as u16 + 2;
    let preview_width = 12;
    let info_width = 14;
    let total_width = grid_display_width + preview_width + info_width + 4;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // [Grid][Next][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(preview_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_next(frame, game, horizontal[1]);
    render_info(frame, game, horizontal[2]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↓/S: Drop | ↑/W/Space: Rotate | Z: Rotate back | P: Pause | Enter: New | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Empty => Span::raw(EMPTY_CHAR),
        Cell::Filled(kind) => Span::styled(BLOCK_CHAR, Style::default().fg(piece_color(kind))),
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .visible_cells()
        .iter()
        .map(|row| Line::from(row.iter().copied().map(cell_span).collect::<Vec<_>>()))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let kind = game.next_kind();
    let matrix = shape(kind, 0);
    let offset_x = (PREVIEW_SIZE - matrix.size()) / 2;
    let offset_y = (PREVIEW_SIZE - matrix.size()) / 2;

    let mut lines: Vec<Line> = Vec::with_capacity(PREVIEW_SIZE);
    for y in 0..PREVIEW_SIZE {
        let mut spans = vec![Span::raw(" ")];
        for x in 0..PREVIEW_SIZE {
            let filled = x >= offset_x
                && y >= offset_y
                && matrix.is_filled(x - offset_x, y - offset_y);
            spans.push(if filled {
                cell_span(Cell::Filled(kind))
            } else {
                cell_span(Cell::Empty)
            });
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(game.score().to_string()),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(game.lines_cleared().to_string()),
        Line::from(""),
        Line::from(Span::styled("Level", Style::default().fg(Color::Green))),
        Line::from(game.level().to_string()),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score())),
        Line::from(format!("Lines: {}", game.lines_cleared())),
        Line::from(format!("Level: {}", game.level())),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: new game",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled("Q: quit", Style::default().fg(Color::DarkGray))),
    ];

    render_popup(frame, text, " Game Over ", centered_rect(24, 13, area));
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "P: continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled("Q: quit", Style::default().fg(Color::DarkGray))),
    ];

    render_popup(frame, text, " Paused ", centered_rect(24, 9, area));
}

fn render_popup(frame: &mut Frame, text: Vec<Line>, title: &str, area: Rect) {
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

enum Flow {
    Continue,
    Quit,
}

fn handle_key(game: &mut Game, code: KeyCode) -> Flow {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Flow::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') => game.toggle_pause(),
        KeyCode::Enter => game.new_game(),
        // The game ignores these unless it is playing.
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            game.move_left();
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            game.move_right();
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            game.soft_drop();
        }
        KeyCode::Up | KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') => {
            game.rotate();
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => {
            game.rotate_counter_clockwise();
        }
        _ => {}
    }
    Flow::Continue
}

// ============================================================================
// Main Loop
// ============================================================================

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
) -> anyhow::Result<()> {
    let frame_time = Duration::from_millis(FRAME_MS);
    let mut last_tick = Instant::now();

    loop {
        terminal
            .draw(|frame| render(frame, game))
            .context("failed to draw frame")?;

        if event::poll(frame_time)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Flow::Quit = handle_key(game, key.code) {
                        return Ok(());
                    }
                }
            }
        }

        // Only whole milliseconds are consumed; the fraction stays in
        // `last_tick` for the next frame.
        let elapsed_ms = last_tick.elapsed().as_millis() as u64;
        last_tick += Duration::from_millis(elapsed_ms);
        game.advance(elapsed_ms);

        for event in game.take_events() {
            tracing::trace!(?event, "game event");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut game = match args.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    tracing::info!(seed = ?args.seed, "starting");

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut game);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
