use bpj_core::date::{format_date, DateStyle};
use bpj_core::view::ARTICLE_NOT_FOUND;
use bpj_core::{Error, JournalCard, Result, ViewMode};
use clap::{Args, Subcommand};

use crate::config::ApiConfig;
use crate::journal::Journal;
use crate::migrate::{self, DEFAULT_MIGRATION_LIMIT};
use crate::supabase::{SupabaseClient, DEFAULT_LIMIT};

const PREVIEW_CHARS: usize = 160;

#[derive(Args, Clone, Debug)]
pub struct JournalArgs {
    #[command(subcommand)]
    pub command: JournalCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum JournalCommands {
    /// List the latest journal posts
    List {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Show one article in a display mode (expert, lite or bp)
    Show {
        id: String,
        #[arg(long, default_value = "expert")]
        view: ViewMode,
    },
    /// Rewrite object-literal bodies of the latest posts as tagged text
    Migrate {
        #[arg(long, default_value_t = DEFAULT_MIGRATION_LIMIT)]
        limit: usize,
        /// Only report which posts would change
        #[arg(long)]
        dry_run: bool,
    },
}

/// `service` is required by `migrate` only.
pub async fn handle_command(args: JournalArgs, journal: &Journal, service: Option<ApiConfig>) -> Result<()> {
    match args.command {
        JournalCommands::List { limit } => {
            let articles = journal.list(limit).await;
            println!("Found {} articles", articles.len());
            for article in articles {
                println!("{}", format_card(&article.card()));
            }
        }
        JournalCommands::Show { id, view } => match journal.article(&id).await {
            Some(article) => {
                println!("{}", article.display_title());
                let date = format_date(article.published.as_deref(), DateStyle::Long);
                if !date.is_empty() {
                    println!("{}", date);
                }
                println!("🖼️ {}", article.hero_image());
                println!();
                println!("{}", article.render(view));
            }
            None => println!("{}", ARTICLE_NOT_FOUND),
        },
        JournalCommands::Migrate { limit, dry_run } => {
            let config = service.ok_or_else(|| {
                Error::Config("Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY.".to_string())
            })?;
            let client = SupabaseClient::new(config)?;
            let report = migrate::migrate(&client, limit, dry_run).await?;
            if report.fetched == 0 {
                println!("Нет записей для миграции.");
            }
            for id in &report.updated {
                if dry_run {
                    println!("Would update post {}", id);
                } else {
                    println!("Updated post {}", id);
                }
            }
        }
    }
    Ok(())
}

fn format_card(card: &JournalCard) -> String {
    let id = card.id.as_deref().unwrap_or("-");
    let mut line = format!("📰 {} [{}]", card.title, id);
    if !card.date.is_empty() {
        line.push_str(&format!(" · {}", card.date));
    }
    format!("{}\n   {}", line, preview(&card.excerpt, PREVIEW_CHARS))
}

/// First line of the text, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or_default().trim();
    if first.chars().count() <= max {
        return first.to_string();
    }
    let cut: String = first.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: JournalCommands,
    }

    #[test]
    fn test_parse_show_with_view() {
        let cli = TestCli::try_parse_from(["bpj", "show", "p1", "--view", "bp"]).unwrap();
        match cli.command {
            JournalCommands::Show { id, view } => {
                assert_eq!(id, "p1");
                assert_eq!(view, ViewMode::BpPlus);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(TestCli::try_parse_from(["bpj", "show", "p1", "--view", "full"]).is_err());
    }

    #[test]
    fn test_parse_defaults() {
        let cli = TestCli::try_parse_from(["bpj", "migrate", "--dry-run"]).unwrap();
        match cli.command {
            JournalCommands::Migrate { limit, dry_run } => {
                assert_eq!(limit, DEFAULT_MIGRATION_LIMIT);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short\nsecond line", 10), "short");
        assert_eq!(preview("абвгдеёжзи", 4), "абвг…");
    }

    #[tokio::test]
    async fn test_migrate_requires_config() {
        let journal = Journal::from_config(None).unwrap();
        let args = JournalArgs {
            command: JournalCommands::Migrate { limit: 1, dry_run: true },
        };
        let result = handle_command(args, &journal, None).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
