use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use scout_terminal::dataset::{self, PlayerRow};
use scout_terminal::export;
use scout_terminal::persist;
use scout_terminal::rankings::{self, SlotRanking};
use scout_terminal::roles::Slot;
use scout_terminal::sample_data;
use scout_terminal::state::{AppState, Screen, MINUTES_STEP};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(dataset: Vec<PlayerRow>) -> Self {
        let mut state = AppState::new(dataset);
        if let Some(session) = persist::load_session() {
            state.restore_session(&session);
        }
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.screen = Screen::Board,
            KeyCode::Char('2') => self.state.screen = Screen::Pitch,
            KeyCode::Char(']') | KeyCode::Tab => self.state.select_next_slot(),
            KeyCode::Char('[') | KeyCode::BackTab => self.state.select_prev_slot(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll += 1,
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.scroll = self.state.scroll.saturating_sub(1)
            }
            KeyCode::Char('s') => self.state.cycle_season(),
            KeyCode::Char('c') => self.state.cycle_category(),
            KeyCode::Char('l') => self.state.cycle_league(),
            KeyCode::Char('r') => self.state.rebuild_pool(),
            KeyCode::Char('m') => self.state.adjust_minutes_floor(-MINUTES_STEP),
            KeyCode::Char('M') => self.state.adjust_minutes_floor(MINUTES_STEP),
            KeyCode::Char('u') => self.state.adjust_minutes_ceiling(-MINUTES_STEP),
            KeyCode::Char('U') => self.state.adjust_minutes_ceiling(MINUTES_STEP),
            KeyCode::Char('a') => self.state.adjust_age_ceiling(-1.0),
            KeyCode::Char('A') => self.state.adjust_age_ceiling(1.0),
            KeyCode::Char('v') => self.state.adjust_value_ceiling(-1_000_000.0),
            KeyCode::Char('V') => self.state.adjust_value_ceiling(1_000_000.0),
            KeyCode::Char('n') => self.state.cycle_nationality(),
            KeyCode::Char('t') => self.state.cycle_team(),
            KeyCode::Char('f') => self.state.cycle_contract_end(),
            KeyCode::Char('x') => self.state.reset_filters(),
            KeyCode::Char('e') => self.export_workbook(),
            KeyCode::Char('w') => self.save_session(),
            _ => {}
        }
    }

    fn export_workbook(&mut self) {
        let rankings = self.state.slot_rankings();
        let scope = format!(
            "{} | {}",
            self.state.pool_scope.season,
            self.state.pool_scope.league_label()
        );
        let path = export_path();
        match export::export_leaderboards(&path, &scope, &rankings, self.state.top_n) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} sheets / {} rows to {}",
                report.sheets,
                report.rows,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }

    fn save_session(&mut self) {
        match persist::save_session(&self.state.session()) {
            Ok(()) => self.state.push_log("[INFO] Session saved"),
            Err(err) => self
                .state
                .push_log(format!("[WARN] Session save failed: {err}")),
        }
    }
}

fn export_path() -> PathBuf {
    std::env::var("SCOUT_EXPORT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("scout_rankings.xlsx"))
}

fn load_dataset() -> Vec<PlayerRow> {
    let rows = dataset::default_db_path()
        .and_then(|path| dataset::open_db(&path).ok())
        .and_then(|conn| dataset::load_rows(&conn).ok())
        .unwrap_or_default();
    if rows.is_empty() {
        // No ingested store yet: run on a generated squad so the board is
        // usable out of the box.
        sample_data::generate(600)
    } else {
        rows
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let dataset = load_dataset();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(dataset);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let rankings = app.state.slot_rankings();
    match app.state.screen {
        Screen::Board => render_board(frame, chunks[1], &app.state, &rankings),
        Screen::Pitch => render_pitch(frame, chunks[1], &rankings),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let staged = state.staged_scope();
    let staged_note = if staged == state.pool_scope {
        String::new()
    } else {
        format!(" | staged: {} {} (r)", staged.season, staged.league_label())
    };
    let line1 = format!(
        "SCOUT BOARD | Pool: {} | {} | {} players{}",
        state.pool_scope.season,
        state.pool_scope.league_label(),
        state.pool.len(),
        staged_note
    );
    let line2 = format!(
        "Minutes {:.0}-{:.0}{}{}{}",
        state.filter.minutes.0,
        state.filter.minutes.1,
        state
            .filter
            .age
            .map(|(lo, hi)| format!(" | Age {lo:.0}-{hi:.0}"))
            .unwrap_or_default(),
        state
            .filter
            .market_value
            .map(|(lo, hi)| format!(" | Value {:.1}M-{:.1}M", lo / 1e6, hi / 1e6))
            .unwrap_or_default(),
        member_note(&state.filter.nationalities, "Nat")
            + &member_note(&state.filter.teams, "Team")
            + &member_note(&state.filter.contract_ends, "Contract"),
    );
    let line3 = state.last_log().unwrap_or("").to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn member_note(members: &[String], label: &str) -> String {
    members
        .first()
        .map(|m| format!(" | {label}: {m}"))
        .unwrap_or_default()
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Board => {
            "1 Board | 2 Pitch | [/]/Tab Slot | j/k Scroll | s/c/l Scope | r Rebuild | m/M u/U Minutes | a/A Age | v/V Value | n/t/f Sets | x Reset | e Export | w Save | ? Help | q Quit"
                .to_string()
        }
        Screen::Pitch => {
            "1 Board | 2 Pitch | s/c/l Scope | r Rebuild | x Reset | e Export | ? Help | q Quit"
                .to_string()
        }
    }
}

fn render_board(frame: &mut Frame, area: Rect, state: &AppState, rankings: &[SlotRanking]) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(1)])
        .split(area);

    render_slot_list(frame, panes[0], state, rankings);
    render_leaderboard(frame, panes[1], state, rankings);
}

fn render_slot_list(frame: &mut Frame, area: Rect, state: &AppState, rankings: &[SlotRanking]) {
    let block = Block::default().title("Positions").borders(Borders::RIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (i, ranking) in rankings.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let selected = i == state.slot_idx;
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let line = format!("{:<18} {:>4}", ranking.slot.label(), ranking.rows.len());
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState, rankings: &[SlotRanking]) {
    let Some(ranking) = rankings.get(state.slot_idx) else {
        return;
    };
    let columns = rankings::board_columns(ranking.slot);
    let board = rankings::top_n(&ranking.rows, ranking.rows.len(), &columns);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = board_widths();
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    frame.render_widget(Paragraph::new("#").style(header_style), header_cols[0]);
    for (i, name) in board.columns.iter().enumerate() {
        let Some(cell_area) = header_cols.get(i + 1) else {
            break;
        };
        frame.render_widget(
            Paragraph::new(name.as_str()).style(header_style),
            *cell_area,
        );
    }

    let list_area = sections[1];
    if board.rows.is_empty() {
        let empty = Paragraph::new("No players in this segment")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let max_start = board.rows.len().saturating_sub(visible);
    let start = state.scroll.min(max_start);
    let end = (start + visible).min(board.rows.len());

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        let row = &board.rows[idx];
        let rank = format!("{:>3}", idx + 1);
        frame.render_widget(Paragraph::new(rank), cols[0]);
        for (c, cell) in row.iter().enumerate() {
            let Some(cell_area) = cols.get(c + 1) else {
                break;
            };
            let style = if board.columns[c].starts_with("Percentile") {
                percentile_style(cell.parse::<u8>().ok())
            } else {
                Style::default()
            };
            frame.render_widget(Paragraph::new(cell.as_str()).style(style), *cell_area);
        }
    }
}

fn board_widths() -> [Constraint; 8] {
    [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(11),
    ]
}

/// Percentile badge colors: elite green, solid yellow, below-median red.
fn percentile_style(pct: Option<u8>) -> Style {
    match pct {
        Some(p) if p >= 80 => Style::default().fg(Color::Green),
        Some(p) if p >= 50 => Style::default().fg(Color::Yellow),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    }
}

// Formation anchors on a 120x80 pitch, goal on the left.
const PITCH_ANCHORS: [(Slot, u16, u16); 11] = [
    (Slot::Goalkeeper, 5, 40),
    (Slot::LeftBack, 25, 75),
    (Slot::CentreBackLeft, 25, 55),
    (Slot::CentreBackRight, 25, 25),
    (Slot::RightBack, 25, 2),
    (Slot::HoldingMid, 60, 20),
    (Slot::BoxToBoxMid, 60, 60),
    (Slot::AttackingMid, 75, 40),
    (Slot::LeftWinger, 100, 75),
    (Slot::RightWinger, 100, 5),
    (Slot::Striker, 110, 40),
];

fn render_pitch(frame: &mut Frame, area: Rect, rankings: &[SlotRanking]) {
    let block = Block::default().title("Best XI").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    const BOX_WIDTH: u16 = 22;
    const BOX_HEIGHT: u16 = 5;
    if inner.width < BOX_WIDTH || inner.height < BOX_HEIGHT {
        let note = Paragraph::new("Pitch view needs a larger terminal")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(note, inner);
        return;
    }

    for (slot, px, py) in PITCH_ANCHORS {
        let Some(ranking) = rankings.iter().find(|r| r.slot == slot) else {
            continue;
        };
        let x = inner.x + (px * (inner.width - BOX_WIDTH)) / 120;
        let y = inner.y + (py * (inner.height - BOX_HEIGHT)) / 80;
        let box_area = Rect {
            x,
            y,
            width: BOX_WIDTH,
            height: BOX_HEIGHT,
        };
        render_slot_box(frame, box_area, ranking);
    }
}

fn render_slot_box(frame: &mut Frame, area: Rect, ranking: &SlotRanking) {
    let block = Block::default()
        .title(ranking.slot.label())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let top = rankings::pitch_rows(ranking, inner.height as usize);
    if top.is_empty() {
        let empty = Paragraph::new("-").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    for (i, (player, _team, pct)) in top.iter().enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let badge = pct.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        let line = format!("{:<2}{:<14.14} {:>3}", i + 1, player, badge);
        frame.render_widget(
            Paragraph::new(line).style(percentile_style(*pct)),
            row_area,
        );
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Screens:",
        "  1            Board (per-position leaderboard)",
        "  2            Pitch (best XI)",
        "",
        "Scope (staged, applied with r):",
        "  s            Cycle season",
        "  c            Cycle league category",
        "  l            Cycle league",
        "  r            Rebuild percentile pool",
        "",
        "Segmentation (instant, never recomputes percentiles):",
        "  m/M  u/U     Minutes floor/ceiling -/+ 90",
        "  a/A          Age ceiling -/+ 1",
        "  v/V          Market value ceiling -/+ 1M",
        "  n / t / f    Cycle nationality / team / contract end",
        "  x            Reset filters to pool bounds",
        "",
        "Other:",
        "  [ ] / Tab    Select position slot",
        "  j/k or ↑/↓   Scroll leaderboard",
        "  e            Export leaderboards to xlsx",
        "  w            Save session",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
