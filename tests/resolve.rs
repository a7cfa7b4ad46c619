use std::fs;
use std::path::PathBuf;

use skinsales_terminal::catalog::{
    CatalogClient, ChampionCatalog, ChampionEntry, ChampionSkin, parse_champion_full_json,
    splash_url, stale_splash_overrides,
};
use skinsales_terminal::feed::resolve_card;
use skinsales_terminal::state::{CardArt, SaleRecord};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_catalog() -> ChampionCatalog {
    parse_champion_full_json(&read_fixture("champion_full.json")).expect("fixture should parse")
}

#[test]
fn resolves_ignoring_case_and_whitespace() {
    let catalog = fixture_catalog();
    let exact = catalog.resolve_champion_id("Miss Fortune");
    let sloppy = catalog.resolve_champion_id("miss fortune");
    let squashed = catalog.resolve_champion_id("MISSFORTUNE");

    assert_eq!(exact, Some("MissFortune"));
    assert_eq!(sloppy, exact);
    assert_eq!(squashed, exact);
}

#[test]
fn resolves_ignoring_apostrophes() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.resolve_champion_id("Kai'Sa"), Some("KaiSa"));
    assert_eq!(catalog.resolve_champion_id("kaisa"), Some("KaiSa"));
    assert_eq!(catalog.resolve_champion_id("KAI SA"), Some("KaiSa"));
}

#[test]
fn unknown_champion_is_none() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.resolve_champion_id("Jhinn"), None);
    assert_eq!(catalog.resolve_champion_id(""), None);
}

#[test]
fn skin_num_matches_case_insensitive_trimmed() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.find_skin_num("Ahri", "Popstar Ahri"), 4);
    assert_eq!(catalog.find_skin_num("Ahri", "  popstar ahri  "), 4);
    assert_eq!(catalog.find_skin_num("MissFortune", "gun goddess miss fortune"), 16);
}

#[test]
fn unmatched_skin_falls_back_to_base() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.find_skin_num("Ahri", "Popstar Ahir"), 0);
    assert_eq!(catalog.find_skin_num("Ahri", ""), 0);
    assert_eq!(catalog.find_skin_num("NoSuchChampion", "Popstar Ahri"), 0);
}

#[test]
fn splash_url_applies_override_table() {
    assert_eq!(
        splash_url("Fiddlesticks", 3),
        "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/FiddleSticks_3.jpg"
    );
    assert_eq!(
        splash_url("Ahri", 0),
        "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/Ahri_0.jpg"
    );
}

#[test]
fn override_table_is_valid_against_fixture_catalog() {
    let catalog = fixture_catalog();
    assert!(stale_splash_overrides(&catalog).is_empty());
}

fn sale(champion: &str, skin: &str) -> SaleRecord {
    SaleRecord {
        champion: champion.to_string(),
        skin: skin.to_string(),
        price: 675,
        discount: Some(40),
        spotlight: String::new(),
        week_raw: None,
        week: None,
        category: None,
        patch: None,
    }
}

#[test]
fn resolve_card_builds_splash_art() {
    let client = CatalogClient::preloaded("15.20.1", fixture_catalog());
    let card = resolve_card(&client, sale("Fiddlesticks", "Surprise Party Fiddlesticks"));
    assert_eq!(
        card.art,
        CardArt::Splash {
            champion_id: "Fiddlesticks".to_string(),
            skin_num: 5,
            url: "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/FiddleSticks_5.jpg"
                .to_string(),
        }
    );
}

#[test]
fn resolve_card_marks_unknown_champion_unresolved() {
    let client = CatalogClient::preloaded("15.20.1", fixture_catalog());
    let card = resolve_card(&client, sale("Jhinn", "High Noon Jhin"));
    match &card.art {
        CardArt::Unresolved { reason } => assert!(reason.contains("Jhinn")),
        other => panic!("expected unresolved art, got {other:?}"),
    }
    // The record survives for display even when resolution fails.
    assert_eq!(card.record.champion, "Jhinn");
}

#[test]
fn resolve_card_typo_skin_uses_base_splash() {
    let client = CatalogClient::preloaded("15.20.1", fixture_catalog());
    let card = resolve_card(&client, sale("Ahri", "Popstar Ahir"));
    assert_eq!(
        card.art,
        CardArt::Splash {
            champion_id: "Ahri".to_string(),
            skin_num: 0,
            url: "https://ddragon.leagueoflegends.com/cdn/img/champion/splash/Ahri_0.jpg"
                .to_string(),
        }
    );
}

#[test]
fn override_table_reports_stale_keys_against_small_catalog() {
    let catalog = ChampionCatalog::from_entries([ChampionEntry {
        id: "Ahri".to_string(),
        name: "Ahri".to_string(),
        skins: vec![ChampionSkin {
            name: "default".to_string(),
            num: 0,
        }],
    }]);
    assert_eq!(stale_splash_overrides(&catalog), vec!["Fiddlesticks"]);
}
