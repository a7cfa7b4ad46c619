use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::sale_feed::SheetTab;

pub const PAGE_SIZE: usize = 30;
const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Sales,
    Mythic,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleCategory {
    Featured,
    Biweekly,
}

/// One spreadsheet row. Immutable once parsed; uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub champion: String,
    pub skin: String,
    pub price: u32,
    pub discount: Option<u32>,
    pub spotlight: String,
    pub week_raw: Option<String>,
    pub week: Option<NaiveDate>,
    pub category: Option<SaleCategory>,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardArt {
    Splash {
        champion_id: String,
        skin_num: u32,
        url: String,
    },
    /// Resolution failed for this record; the card still renders, with the
    /// reason, instead of vanishing with only a log line.
    Unresolved { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleCard {
    pub record: SaleRecord,
    pub art: CardArt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchSales(SheetTab),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    BatchStarted(Screen),
    UpsertCard { screen: Screen, card: SaleCard },
    BatchFinished(Screen),
    SetHistory(Vec<SaleRecord>),
    SetPatch(String),
    Log(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub week: Option<NaiveDate>,
}

pub struct AppState {
    pub screen: Screen,
    pub sale_cards: Vec<SaleCard>,
    pub sale_selected: usize,
    pub mythic_cards: Vec<SaleCard>,
    pub mythic_selected: usize,
    pub history: Vec<SaleRecord>,
    pub history_loaded: bool,
    /// Last filter result, as indices into `history`. Pagination re-slices
    /// this list; only a filter change rebuilds it.
    pub history_filtered: Vec<usize>,
    pub filter: FilterState,
    pub page: usize,
    pub week_options: Vec<NaiveDate>,
    pub patch: Option<String>,
    pub loading: bool,
    pub search_active: bool,
    pub fullscreen: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Sales,
            sale_cards: Vec::with_capacity(16),
            sale_selected: 0,
            mythic_cards: Vec::with_capacity(16),
            mythic_selected: 0,
            history: Vec::new(),
            history_loaded: false,
            history_filtered: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            week_options: Vec::new(),
            patch: None,
            loading: false,
            search_active: false,
            fullscreen: false,
            help_overlay: false,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    pub fn selected_card(&self) -> Option<&SaleCard> {
        match self.screen {
            Screen::Sales => self.sale_cards.get(self.sale_selected),
            Screen::Mythic => self.mythic_cards.get(self.mythic_selected),
            Screen::History => None,
        }
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Sales => {
                if self.sale_selected + 1 < self.sale_cards.len() {
                    self.sale_selected += 1;
                }
            }
            Screen::Mythic => {
                if self.mythic_selected + 1 < self.mythic_cards.len() {
                    self.mythic_selected += 1;
                }
            }
            Screen::History => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Sales => self.sale_selected = self.sale_selected.saturating_sub(1),
            Screen::Mythic => self.mythic_selected = self.mythic_selected.saturating_sub(1),
            Screen::History => {}
        }
    }

    /// Re-runs the filter over the full history and resets to page 1.
    pub fn apply_filters(&mut self) {
        self.history_filtered = filter_sales(&self.history, &self.filter.query, self.filter.week);
        self.page = 1;
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.history_filtered.len())
    }

    /// Current page's records, in stored filter order.
    pub fn page_records(&self) -> Vec<&SaleRecord> {
        let (start, end) = page_slice(self.history_filtered.len(), self.page);
        self.history_filtered[start..end]
            .iter()
            .filter_map(|&idx| self.history.get(idx))
            .collect()
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.history_filtered.len());
    }

    pub fn page_next(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn page_prev(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Cycles the week filter: all weeks, then each known week ascending.
    pub fn cycle_week(&mut self) {
        if self.week_options.is_empty() {
            return;
        }
        self.filter.week = match self.filter.week {
            None => self.week_options.first().copied(),
            Some(current) => {
                let pos = self.week_options.iter().position(|w| *w == current);
                match pos {
                    Some(idx) if idx + 1 < self.week_options.len() => {
                        Some(self.week_options[idx + 1])
                    }
                    _ => None,
                }
            }
        };
        self.apply_filters();
    }
}

/// Case-insensitive substring match on champion or skin name, plus exact
/// week equality by date value. Preserves input order; empty query and
/// unset week pass everything.
pub fn filter_sales(records: &[SaleRecord], query: &str, week: Option<NaiveDate>) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            let matches_search = needle.is_empty()
                || record.champion.to_lowercase().contains(&needle)
                || record.skin.to_lowercase().contains(&needle);
            let matches_week = week.is_none_or(|wanted| record.week == Some(wanted));
            matches_search && matches_week
        })
        .map(|(idx, _)| idx)
        .collect()
}

pub fn total_pages(total_items: usize) -> usize {
    total_items.div_ceil(PAGE_SIZE)
}

pub fn clamp_page(page: usize, total_items: usize) -> usize {
    page.clamp(1, total_pages(total_items).max(1))
}

/// `[start, end)` bounds of a 1-based page over `total_items`, with the
/// page clamped into range first.
pub fn page_slice(total_items: usize, page: usize) -> (usize, usize) {
    if total_items == 0 {
        return (0, 0);
    }
    let page = clamp_page(page, total_items);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total_items);
    (start, end)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Page(usize),
    Ellipsis,
}

/// Pagination strip: first page, a window of two pages around the current
/// one, the last page, with ellipses where the window detaches from either
/// end. Empty when a single page holds everything.
pub fn pagination_controls(total_pages: usize, current: usize) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let mut controls = vec![PageControl::Page(1)];

    if current > 4 {
        controls.push(PageControl::Ellipsis);
    }

    let window_start = current.saturating_sub(2).max(2);
    let window_end = (current + 2).min(total_pages - 1);
    for page in window_start..=window_end {
        controls.push(PageControl::Page(page));
    }

    if current + 3 < total_pages {
        controls.push(PageControl::Ellipsis);
    }

    controls.push(PageControl::Page(total_pages));
    controls
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::BatchStarted(screen) => {
            state.loading = true;
            match screen {
                Screen::Sales => {
                    state.sale_cards.clear();
                    state.sale_selected = 0;
                }
                Screen::Mythic => {
                    state.mythic_cards.clear();
                    state.mythic_selected = 0;
                }
                Screen::History => {}
            }
        }
        Delta::UpsertCard { screen, card } => match screen {
            Screen::Sales => state.sale_cards.push(card),
            Screen::Mythic => state.mythic_cards.push(card),
            Screen::History => {
                state.push_log(format!(
                    "[WARN] Dropping card for history screen: {}",
                    card.record.champion
                ));
            }
        },
        Delta::BatchFinished(screen) => {
            state.loading = false;
            if screen == Screen::Mythic {
                group_mythic_cards(&mut state.mythic_cards);
                state.mythic_selected = state
                    .mythic_selected
                    .min(state.mythic_cards.len().saturating_sub(1));
            }
        }
        Delta::SetHistory(records) => {
            let mut weeks: Vec<NaiveDate> = records.iter().filter_map(|r| r.week).collect();
            weeks.sort_unstable();
            weeks.dedup();
            state.week_options = weeks;
            state.history = records;
            state.history_loaded = true;
            state.filter.week = None;
            state.apply_filters();
        }
        Delta::SetPatch(patch) => state.patch = Some(patch),
        Delta::Log(msg) => state.push_log(msg),
    }
}

/// Fixes the mythic display order once the batch is complete: featured
/// cards first, then biweekly, records without a recognized category
/// dropped. Selection and rendering both walk this order, so the feed's
/// interleaving never leaks into the screen.
pub fn group_mythic_cards(cards: &mut Vec<SaleCard>) {
    cards.retain(|card| card.record.category.is_some());
    cards.sort_by_key(|card| match card.record.category {
        Some(SaleCategory::Featured) => 0,
        _ => 1,
    });
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Sales => "Sales",
        Screen::Mythic => "Mythic",
        Screen::History => "History",
    }
}
