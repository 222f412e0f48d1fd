pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod ids;
pub mod messages;
pub mod metrics;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;
pub mod state;
pub mod validate;

pub use app::router;
pub use config::Config;
pub use dashboard::Dashboard;
pub use state::AppState;
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::CampaignStore;
