pub mod cli;
pub mod config;
pub mod journal;
pub mod logging;
pub mod migrate;
pub mod supabase;

pub use cli::{handle_command, JournalArgs, JournalCommands};
pub use config::ApiConfig;
pub use journal::Journal;
pub use supabase::{fetch_article, fetch_journal_posts, SupabaseClient};

pub mod prelude {
    pub use super::{ApiConfig, Journal, SupabaseClient};
    pub use bpj_core::{Article, Error, Result, ViewMode};
}
