use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};

use skinsales_terminal::sale_feed::SheetTab;
use skinsales_terminal::state::{
    AppState, CardArt, PageControl, ProviderCommand, SaleCard, SaleCategory, SaleRecord, Screen,
    apply_delta, pagination_controls, screen_label,
};
use skinsales_terminal::week;
use skinsales_terminal::{fake_feed, feed, state};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        if self.state.fullscreen {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.state.fullscreen = false
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_screen(Screen::Sales),
            KeyCode::Char('2') => self.switch_screen(Screen::Mythic),
            KeyCode::Char('3') => self.switch_screen(Screen::History),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.screen == Screen::History {
                    self.state.page_prev();
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.state.screen == Screen::History {
                    self.state.page_next();
                }
            }
            KeyCode::Char('/') => {
                if self.state.screen == Screen::History {
                    self.state.search_active = true;
                }
            }
            KeyCode::Char('w') => {
                if self.state.screen == Screen::History {
                    self.state.cycle_week();
                }
            }
            KeyCode::Char('r') => self.request_fetch(tab_for(self.state.screen), true),
            KeyCode::Enter => {
                if self.state.selected_card().is_some() {
                    self.state.fullscreen = true;
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.state.search_active = false;
                self.state.apply_filters();
            }
            KeyCode::Esc => {
                self.state.search_active = false;
                self.state.filter.query.clear();
                self.state.apply_filters();
            }
            KeyCode::Backspace => {
                self.state.filter.query.pop();
            }
            KeyCode::Char(c) => self.state.filter.query.push(c),
            _ => {}
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        let first_visit = match screen {
            Screen::Sales => false, // fetched on startup
            Screen::Mythic => self.state.mythic_cards.is_empty(),
            Screen::History => !self.state.history_loaded,
        };
        self.state.screen = screen;
        if first_visit {
            self.request_fetch(tab_for(screen), false);
        }
    }

    fn request_fetch(&mut self, tab: SheetTab, announce: bool) {
        if self.cmd_tx.send(ProviderCommand::FetchSales(tab)).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        } else if announce {
            self.state
                .push_log(format!("[INFO] Refreshing {}", tab.label()));
        }
    }
}

fn tab_for(screen: Screen) -> SheetTab {
    match screen {
        Screen::Sales => SheetTab::CurrentSales,
        Screen::Mythic => SheetTab::Mythic,
        Screen::History => SheetTab::PreviousSales,
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let source = std::env::var("SALES_SOURCE")
        .unwrap_or_else(|_| "live".to_string())
        .to_lowercase();
    if source == "fake" {
        fake_feed::spawn_fake_provider(tx, cmd_rx);
    } else {
        feed::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

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

    match app.state.screen {
        Screen::Sales => render_card_grid(frame, chunks[1], &app.state.sale_cards, app.state.sale_selected, app.state.loading),
        Screen::Mythic => render_mythic(frame, chunks[1], &app.state),
        Screen::History => render_history(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);

    if app.state.fullscreen {
        if let Some(card) = app.state.selected_card() {
            render_fullscreen_overlay(frame, frame.size(), card);
        }
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let mut title = format!("SKIN SALES | {}", screen_label(state.screen));
    match state.screen {
        Screen::Sales => {
            let (start, end) = week::current_week_range(Local::now().date_naive());
            title.push_str(&format!(" | {}", week::format_week_range(start, end)));
        }
        Screen::Mythic => {
            if let Some(patch) = &state.patch {
                title.push_str(&format!(" | Current Patch: {patch}"));
            }
        }
        Screen::History => {
            let total = state.history_filtered.len();
            title.push_str(&format!(
                " | {total} sales | Page {}/{}",
                state.page,
                state.total_pages().max(1)
            ));
        }
    }
    if state.loading {
        title.push_str(" | Loading...");
    }
    let last_log = state.logs.back().map(String::as_str).unwrap_or("");
    format!("{title}\n{last_log}")
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return format!("Search: {}_  (Enter apply | Esc clear)", state.filter.query);
    }
    match state.screen {
        Screen::Sales | Screen::Mythic => {
            "1 Sales | 2 Mythic | 3 History | j/k Move | Enter Splash | r Refresh | ? Help | q Quit"
                .to_string()
        }
        Screen::History => {
            "1 Sales | 2 Mythic | 3 History | / Search | w Week | h/l Page | r Refresh | ? Help | q Quit"
                .to_string()
        }
    }
}

const CARD_WIDTH: u16 = 38;
const CARD_HEIGHT: u16 = 7;

fn render_card_grid(
    frame: &mut Frame,
    area: Rect,
    cards: &[SaleCard],
    selected: usize,
    loading: bool,
) {
    if cards.is_empty() {
        let msg = if loading { "Loading sales..." } else { "No sales to show" };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
        let empty = Paragraph::new("Card view needs more room")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let total_rows = cards.len().div_ceil(columns);
    let selected_row = selected / columns;

    let (first_row, last_row) = visible_range(selected_row, total_rows, visible_rows);

    for (grid_row, row) in (first_row..last_row).enumerate() {
        for col in 0..columns {
            let idx = row * columns + col;
            let Some(card) = cards.get(idx) else { break };
            let card_area = Rect {
                x: area.x + (col as u16) * CARD_WIDTH,
                y: area.y + (grid_row as u16) * CARD_HEIGHT,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            };
            render_card(frame, card_area, card, idx == selected);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &SaleCard, selected: bool) {
    let record = &card.record;
    let border_style = match (&card.art, selected) {
        (_, true) => Style::default().fg(Color::Yellow),
        (CardArt::Unresolved { .. }, false) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    };

    let mut lines = vec![Line::from(format!("Champion: {}", record.champion))];
    let price = match record.discount {
        Some(discount) => format!("{} RP  ({discount}% OFF)", record.price),
        None => format!("{} RP", record.price),
    };
    lines.push(Line::styled(price, Style::default().fg(Color::Green)));
    match &card.art {
        CardArt::Splash { url, .. } => {
            lines.push(Line::styled(
                url.clone(),
                Style::default().fg(Color::Blue),
            ));
        }
        CardArt::Unresolved { reason } => {
            lines.push(Line::styled(
                format!("! {reason}"),
                Style::default().fg(Color::Red),
            ));
        }
    }
    if !record.spotlight.is_empty() {
        lines.push(Line::styled(
            format!("Spotlight: {}", record.spotlight),
            Style::default().fg(Color::Cyan),
        ));
    }

    let title = if record.skin.is_empty() {
        record.champion.clone()
    } else {
        record.skin.clone()
    };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_mythic(frame: &mut Frame, area: Rect, state: &AppState) {
    let featured: Vec<&SaleCard> = state
        .mythic_cards
        .iter()
        .filter(|card| card.record.category == Some(SaleCategory::Featured))
        .collect();
    let biweekly: Vec<&SaleCard> = state
        .mythic_cards
        .iter()
        .filter(|card| card.record.category == Some(SaleCategory::Biweekly))
        .collect();

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
        ])
        .split(area);

    let section_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(Paragraph::new("Featured").style(section_style), sections[0]);
    render_mythic_section(frame, sections[1], &featured, state, 0);
    frame.render_widget(Paragraph::new("Biweekly").style(section_style), sections[2]);
    render_mythic_section(frame, sections[3], &biweekly, state, featured.len());

    if state.mythic_cards.is_empty() {
        let msg = if state.loading { "Loading mythic shop..." } else { "No mythic skins to show" };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
    }
}

// `group_mythic_cards` has already ordered `mythic_cards` featured-first,
// so `mythic_selected` lines up with the section offsets used here.
fn render_mythic_section(
    frame: &mut Frame,
    area: Rect,
    cards: &[&SaleCard],
    state: &AppState,
    offset: usize,
) {
    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
        return;
    }
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    for (i, card) in cards.iter().enumerate() {
        let row = i / columns;
        let col = i % columns;
        let y = area.y + (row as u16) * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        let card_area = Rect {
            x: area.x + (col as u16) * CARD_WIDTH,
            y,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
        };
        render_card(frame, card_area, card, offset + i == state.mythic_selected);
    }
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let week_label = match state.filter.week {
        Some(week) => week::format_long_date(week),
        None => "All weeks".to_string(),
    };
    let filter_line = format!(
        "Search: {:<24} Week: {}",
        if state.filter.query.is_empty() && !state.search_active {
            "(press / to search)".to_string()
        } else {
            state.filter.query.clone()
        },
        week_label
    );
    frame.render_widget(
        Paragraph::new(filter_line).style(Style::default().fg(Color::Cyan)),
        sections[0],
    );

    if state.history_filtered.is_empty() {
        let msg = if state.loading {
            "Loading previous sales..."
        } else if state.history.is_empty() {
            "No previous sales loaded"
        } else {
            "No sales match the current filter"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
    } else {
        render_history_table(frame, sections[1], &state.page_records());
    }

    render_pagination(frame, sections[2], state);
}

fn render_history_table(frame: &mut Frame, area: Rect, records: &[&SaleRecord]) {
    let header = Row::new(["Week", "Champion", "Skin", "Price", "Discount", "Spotlight"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let week = record
                .week
                .map(week::format_long_date)
                .or_else(|| record.week_raw.clone())
                .unwrap_or_default();
            let discount = record
                .discount
                .map(|d| format!("{d}%"))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                week,
                record.champion.clone(),
                record.skin.clone(),
                format!("{} RP", record.price),
                discount,
                record.spotlight.clone(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(28),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(header);
    frame.render_widget(table, area);
}

fn render_pagination(frame: &mut Frame, area: Rect, state: &AppState) {
    let controls = pagination_controls(state.total_pages(), state.page);
    if controls.is_empty() {
        return;
    }
    let mut spans = Vec::with_capacity(controls.len() * 2);
    for control in controls {
        match control {
            PageControl::Ellipsis => spans.push(Span::styled(
                " ... ",
                Style::default().fg(Color::DarkGray),
            )),
            PageControl::Page(page) => {
                let style = if page == state.page {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(format!(" {page} "), style));
            }
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_fullscreen_overlay(frame: &mut Frame, area: Rect, card: &SaleCard) {
    let popup_area = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup_area);

    let record = &card.record;
    let mut lines = vec![
        Line::styled(
            record.skin.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("Champion: {}", record.champion)),
        Line::from(""),
    ];
    match &card.art {
        CardArt::Splash {
            champion_id,
            skin_num,
            url,
        } => {
            lines.push(Line::from(format!("Catalog id: {champion_id} (skin {skin_num})")));
            lines.push(Line::styled(
                format!("Splash: {url}"),
                Style::default().fg(Color::Blue),
            ));
        }
        CardArt::Unresolved { reason } => {
            lines.push(Line::styled(
                format!("Unresolved: {reason}"),
                Style::default().fg(Color::Red),
            ));
        }
    }
    lines.push(Line::from(""));
    let price = match record.discount {
        Some(discount) => format!("{} RP ({discount}% OFF)", record.price),
        None => format!("{} RP", record.price),
    };
    lines.push(Line::styled(price, Style::default().fg(Color::Green)));
    if !record.spotlight.is_empty() {
        lines.push(Line::styled(
            format!("Spotlight: {}", record.spotlight),
            Style::default().fg(Color::Cyan),
        ));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .title("Splash")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Skin Sales Terminal - Help",
        "",
        "Global:",
        "  1            Current sales",
        "  2            Mythic shop",
        "  3            Previous sales",
        "  r            Refresh current screen",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Cards:",
        "  j/k or ↑/↓   Move selection",
        "  Enter        Fullscreen splash",
        "",
        "History:",
        "  /            Search champion/skin",
        "  w            Cycle week filter",
        "  h/l or ←/→   Previous/next page",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
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
