use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::catalog::{self, CatalogClient};
use crate::sale_feed::{self, SheetTab};
use crate::state::{CardArt, Delta, ProviderCommand, SaleCard, SaleRecord, Screen};

pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let catalog_client = CatalogClient::from_env();
        run_provider(&catalog_client, &tx, &cmd_rx);
    });
}

fn run_provider(
    catalog_client: &CatalogClient,
    tx: &Sender<Delta>,
    cmd_rx: &Receiver<ProviderCommand>,
) {
    deliver_sales(catalog_client, tx, SheetTab::CurrentSales);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            ProviderCommand::FetchSales(tab) => deliver_sales(catalog_client, tx, tab),
        }
    }
}

/// One batch: fetch the sheet, then resolve and emit records strictly in
/// order. A failing record becomes an unresolved card and a log line; it
/// never aborts the rest of the batch. The loading flag wraps the whole
/// batch, not each record.
pub fn deliver_sales(catalog_client: &CatalogClient, tx: &Sender<Delta>, tab: SheetTab) {
    let screen = tab.screen();
    let _ = tx.send(Delta::BatchStarted(screen));

    let records = match sale_feed::fetch_sales(tab) {
        Ok(records) => records,
        Err(err) => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Fetching {} failed: {err:#}",
                tab.label()
            )));
            let _ = tx.send(Delta::BatchFinished(screen));
            return;
        }
    };

    if tab == SheetTab::Mythic {
        let patch = records
            .iter()
            .find_map(|record| record.patch.clone())
            .unwrap_or_else(|| catalog_client.patch().to_string());
        let _ = tx.send(Delta::SetPatch(patch));
    }

    if tab == SheetTab::PreviousSales {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Loaded {} previous sales",
            records.len()
        )));
        let _ = tx.send(Delta::SetHistory(records));
        let _ = tx.send(Delta::BatchFinished(screen));
        return;
    }

    check_overrides_once(catalog_client, tx);
    emit_cards(catalog_client, tx, screen, records);
    let _ = tx.send(Delta::BatchFinished(screen));
}

/// Full card batch for pre-fetched records, with the loading flag wrapped
/// around it. The fake provider feeds its seeded records through here.
pub fn deliver_cards_from_records(
    catalog_client: &CatalogClient,
    tx: &Sender<Delta>,
    screen: Screen,
    records: Vec<SaleRecord>,
) {
    let _ = tx.send(Delta::BatchStarted(screen));
    emit_cards(catalog_client, tx, screen, records);
    let _ = tx.send(Delta::BatchFinished(screen));
}

fn emit_cards(
    catalog_client: &CatalogClient,
    tx: &Sender<Delta>,
    screen: Screen,
    records: Vec<SaleRecord>,
) {
    for record in records {
        let card = resolve_card(catalog_client, record);
        if let CardArt::Unresolved { reason } = &card.art {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] {}: {reason}",
                card.record.champion
            )));
        }
        let _ = tx.send(Delta::UpsertCard { screen, card });
    }
}

/// Resolves one record against the catalog. Champion misses and catalog
/// fetch failures surface as unresolved cards; a skin-name miss is not an
/// error and falls back to the base splash.
pub fn resolve_card(catalog_client: &CatalogClient, record: SaleRecord) -> SaleCard {
    let art = match catalog_client.catalog() {
        Err(err) => CardArt::Unresolved {
            reason: format!("catalog unavailable: {err:#}"),
        },
        Ok(catalog) => match catalog.resolve_champion_id(&record.champion) {
            None => CardArt::Unresolved {
                reason: format!("champion not found: {}", record.champion),
            },
            Some(id) => {
                let champion_id = id.to_string();
                let skin_num = catalog.find_skin_num(&champion_id, &record.skin);
                let url = catalog::splash_url(&champion_id, skin_num);
                CardArt::Splash {
                    champion_id,
                    skin_num,
                    url,
                }
            }
        },
    };
    SaleCard { record, art }
}

fn check_overrides_once(catalog_client: &CatalogClient, tx: &Sender<Delta>) {
    use std::sync::Once;
    static CHECKED: Once = Once::new();

    let Ok(catalog) = catalog_client.catalog() else {
        return;
    };
    CHECKED.call_once(|| {
        for stale in catalog::stale_splash_overrides(catalog) {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Splash override for unknown champion: {stale}"
            )));
        }
    });
}
