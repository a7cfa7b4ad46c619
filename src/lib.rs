pub mod catalog;
pub mod fake_feed;
pub mod feed;
pub mod http_client;
pub mod sale_feed;
pub mod state;
pub mod week;
