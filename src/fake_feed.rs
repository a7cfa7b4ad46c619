use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::Duration;
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::catalog::{CatalogClient, ChampionCatalog, ChampionEntry, ChampionSkin};
use crate::feed::deliver_cards_from_records;
use crate::sale_feed::SheetTab;
use crate::state::{Delta, ProviderCommand, SaleCategory, SaleRecord};
use crate::week;

/// Offline provider selected by `SALES_SOURCE=fake`: seeded records through
/// the real resolution pipeline, no network.
pub fn spawn_fake_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let catalog_client = CatalogClient::preloaded("0.0.0-fake", seed_catalog());

        deliver_fake(&catalog_client, &tx, SheetTab::CurrentSales, &mut rng);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchSales(tab) => {
                    deliver_fake(&catalog_client, &tx, tab, &mut rng)
                }
            }
        }
    });
}

fn deliver_fake(
    catalog_client: &CatalogClient,
    tx: &Sender<Delta>,
    tab: SheetTab,
    rng: &mut ThreadRng,
) {
    match tab {
        SheetTab::CurrentSales => {
            let records = seed_current_sales(rng);
            deliver_cards_from_records(catalog_client, tx, tab.screen(), records);
        }
        SheetTab::Mythic => {
            let records = seed_mythic_sales(rng);
            let _ = tx.send(Delta::SetPatch("15.24.1".to_string()));
            deliver_cards_from_records(catalog_client, tx, tab.screen(), records);
        }
        SheetTab::PreviousSales => {
            let records = seed_history(rng);
            let _ = tx.send(Delta::BatchStarted(tab.screen()));
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Loaded {} previous sales (fake)",
                records.len()
            )));
            let _ = tx.send(Delta::SetHistory(records));
            let _ = tx.send(Delta::BatchFinished(tab.screen()));
        }
    }
}

fn seed_catalog() -> ChampionCatalog {
    ChampionCatalog::from_entries([
        champion(
            "Ahri",
            "Ahri",
            &[("default", 0), ("Popstar Ahri", 4), ("Star Guardian Ahri", 7)],
        ),
        champion(
            "MissFortune",
            "Miss Fortune",
            &[("default", 0), ("Gun Goddess Miss Fortune", 16)],
        ),
        champion(
            "Fiddlesticks",
            "Fiddlesticks",
            &[("default", 0), ("Surprise Party Fiddlesticks", 5)],
        ),
        champion("KaiSa", "Kai'Sa", &[("default", 0), ("K/DA Kai'Sa", 1)]),
        champion("Akali", "Akali", &[("default", 0), ("K/DA Akali", 9)]),
    ])
}

fn champion(id: &str, name: &str, skins: &[(&str, u32)]) -> ChampionEntry {
    ChampionEntry {
        id: id.to_string(),
        name: name.to_string(),
        skins: skins
            .iter()
            .map(|(skin, num)| ChampionSkin {
                name: skin.to_string(),
                num: *num,
            })
            .collect(),
    }
}

const DISCOUNTS: &[u32] = &[20, 30, 40, 50, 60];

fn seed_current_sales(rng: &mut ThreadRng) -> Vec<SaleRecord> {
    let seeds = [
        ("Ahri", "Popstar Ahri", 1350),
        ("Miss Fortune", "Gun Goddess Miss Fortune", 1820),
        ("Fiddlesticks", "Surprise Party Fiddlesticks", 975),
        ("Kai'Sa", "K/DA Kai'Sa", 1350),
        // Deliberate typo: exercises the unresolved-card path.
        ("Jhinn", "High Noon Jhin", 1350),
    ];
    seeds
        .iter()
        .map(|(champ, skin, price)| SaleRecord {
            champion: champ.to_string(),
            skin: skin.to_string(),
            price: *price,
            discount: Some(DISCOUNTS[rng.gen_range(0..DISCOUNTS.len())]),
            spotlight: format!("https://example.invalid/spotlight/{}", skin.replace(' ', "-")),
            week_raw: None,
            week: None,
            category: None,
            patch: None,
        })
        .collect()
}

fn seed_mythic_sales(rng: &mut ThreadRng) -> Vec<SaleRecord> {
    let seeds = [
        ("Akali", "K/DA Akali", SaleCategory::Featured),
        ("Ahri", "Star Guardian Ahri", SaleCategory::Biweekly),
        ("Kai'Sa", "K/DA Kai'Sa", SaleCategory::Biweekly),
    ];
    seeds
        .iter()
        .map(|(champ, skin, category)| SaleRecord {
            champion: champ.to_string(),
            skin: skin.to_string(),
            price: rng.gen_range(10..=40) * 5,
            discount: None,
            spotlight: format!("https://example.invalid/spotlight/{}", skin.replace(' ', "-")),
            week_raw: None,
            week: None,
            category: Some(*category),
            patch: Some("15.24.1".to_string()),
        })
        .collect()
}

/// Enough weeks of rows to make pagination and the week filter do real work.
fn seed_history(rng: &mut ThreadRng) -> Vec<SaleRecord> {
    let champions = [
        ("Ahri", "Popstar Ahri"),
        ("Akali", "K/DA Akali"),
        ("Miss Fortune", "Gun Goddess Miss Fortune"),
        ("Fiddlesticks", "Surprise Party Fiddlesticks"),
        ("Kai'Sa", "K/DA Kai'Sa"),
    ];
    let mut records = Vec::new();
    for weeks_back in 0..14 {
        let week_start = week::WEEK_EPOCH - Duration::days(weeks_back * week::DAYS_PER_WEEK);
        for (champ, skin) in champions {
            records.push(SaleRecord {
                champion: champ.to_string(),
                skin: skin.to_string(),
                price: rng.gen_range(15..=36) * 52,
                discount: Some(DISCOUNTS[rng.gen_range(0..DISCOUNTS.len())]),
                spotlight: format!(
                    "https://example.invalid/spotlight/{}",
                    skin.replace(' ', "-")
                ),
                week_raw: Some(week_start.format("%Y-%m-%d").to_string()),
                week: Some(week_start),
                category: None,
                patch: None,
            });
        }
    }
    records
}
