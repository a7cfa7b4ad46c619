use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::http_client::fetch_body;

const DDRAGON_BASE: &str = "https://ddragon.leagueoflegends.com/cdn";
const DEFAULT_PATCH: &str = "15.20.1";

// Data Dragon splash filenames do not always match the champion id used
// everywhere else in the catalog.
const SPLASH_OVERRIDES: &[(&str, &str)] = &[("Fiddlesticks", "FiddleSticks")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionSkin {
    pub name: String,
    pub num: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChampionEntry {
    pub id: String,
    pub name: String,
    pub skins: Vec<ChampionSkin>,
}

/// The full champion catalog for one pinned patch, keyed by champion id.
/// Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct ChampionCatalog {
    entries: HashMap<String, ChampionEntry>,
}

impl ChampionCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = ChampionEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ChampionEntry> {
        self.entries.get(id)
    }

    /// Matches a spreadsheet display name against catalog display names,
    /// ignoring case, whitespace and apostrophes ("Kai'Sa" == "kaisa").
    /// Exact equality after normalization; no fuzzy matching.
    pub fn resolve_champion_id(&self, name: &str) -> Option<&str> {
        let wanted = normalize_name(name);
        self.entries
            .values()
            .find(|entry| normalize_name(&entry.name) == wanted)
            .map(|entry| entry.id.as_str())
    }

    /// Returns the catalog `num` of the named skin for a champion, or 0
    /// (the base skin) when the champion or the skin name has no match.
    /// A spreadsheet typo silently falls back to the default splash.
    pub fn find_skin_num(&self, champion_id: &str, skin_name: &str) -> u32 {
        let Some(entry) = self.entries.get(champion_id) else {
            return 0;
        };
        let wanted = skin_name.trim().to_lowercase();
        entry
            .skins
            .iter()
            .find(|skin| skin.name.trim().to_lowercase() == wanted)
            .map(|skin| skin.num)
            .unwrap_or(0)
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Pure; the produced URL is not verified and may 404 for bad input.
pub fn splash_url(champion_id: &str, skin_num: u32) -> String {
    let real_id = SPLASH_OVERRIDES
        .iter()
        .find(|(id, _)| *id == champion_id)
        .map(|(_, alias)| *alias)
        .unwrap_or(champion_id);
    format!("{DDRAGON_BASE}/img/champion/splash/{real_id}_{skin_num}.jpg")
}

/// Returns override keys that no longer name a champion in the catalog.
/// Run once after the catalog loads so stale entries get logged instead of
/// silently building dead URLs.
pub fn stale_splash_overrides(catalog: &ChampionCatalog) -> Vec<&'static str> {
    SPLASH_OVERRIDES
        .iter()
        .filter(|(id, _)| catalog.get(id).is_none())
        .map(|(id, _)| *id)
        .collect()
}

pub fn pinned_patch() -> String {
    env::var("DDRAGON_PATCH")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PATCH.to_string())
}

/// Lazily-loaded catalog handle owned by the composition root. The
/// `OnceCell` doubles as the in-flight guard: a second caller arriving
/// during the initial fetch waits for it instead of fetching again.
#[derive(Debug, Default)]
pub struct CatalogClient {
    patch: String,
    cell: OnceCell<ChampionCatalog>,
}

impl CatalogClient {
    pub fn new(patch: impl Into<String>) -> Self {
        Self {
            patch: patch.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(pinned_patch())
    }

    /// Preseeded client that never touches the network; used by the fake
    /// provider and tests.
    pub fn preloaded(patch: impl Into<String>, catalog: ChampionCatalog) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(catalog);
        Self {
            patch: patch.into(),
            cell,
        }
    }

    pub fn patch(&self) -> &str {
        &self.patch
    }

    /// Fetches the championFull catalog at most once per session.
    pub fn catalog(&self) -> Result<&ChampionCatalog> {
        self.cell.get_or_try_init(|| fetch_champion_full(&self.patch))
    }
}

#[derive(Debug, Deserialize)]
struct ChampionFullResponse {
    #[serde(default)]
    data: HashMap<String, RawChampion>,
}

#[derive(Debug, Deserialize)]
struct RawChampion {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    skins: Vec<RawSkin>,
}

#[derive(Debug, Deserialize)]
struct RawSkin {
    #[serde(default)]
    name: String,
    #[serde(default)]
    num: u32,
}

fn fetch_champion_full(patch: &str) -> Result<ChampionCatalog> {
    let url = format!("{DDRAGON_BASE}/{patch}/data/en_US/championFull.json");
    let body = fetch_body(&url).context("championFull request failed")?;
    parse_champion_full_json(&body)
}

pub fn parse_champion_full_json(raw: &str) -> Result<ChampionCatalog> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ChampionCatalog::default());
    }
    let response: ChampionFullResponse =
        serde_json::from_str(trimmed).context("invalid championFull json")?;

    let entries = response.data.into_iter().map(|(key, champ)| {
        let id = if champ.id.is_empty() { key } else { champ.id };
        ChampionEntry {
            id,
            name: champ.name,
            skins: champ
                .skins
                .into_iter()
                .map(|skin| ChampionSkin {
                    name: skin.name,
                    num: skin.num,
                })
                .collect(),
        }
    });
    Ok(ChampionCatalog::from_entries(entries))
}
