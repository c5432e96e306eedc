//! One-off rewrite of object-literal post bodies into tagged text.

use bpj_core::content::decode_alternate_format;
use bpj_core::Result;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::logging::Logger;
use crate::supabase::{SupabaseClient, TABLE};

pub const TEXT_COLUMNS: [&str; 3] = ["description", "summary", "content"];
pub const DEFAULT_TEXT_COLUMN: &str = "description";
pub const DEFAULT_MIGRATION_LIMIT: usize = 2;
const CONCURRENT_UPDATES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub column: String,
    pub fetched: usize,
    pub updated: Vec<String>,
}

/// First known text column the table has.
pub fn pick_text_column(columns: &[String]) -> &'static str {
    TEXT_COLUMNS
        .into_iter()
        .find(|candidate| columns.iter().any(|c| c == candidate))
        .unwrap_or(DEFAULT_TEXT_COLUMN)
}

/// The rewrite for one row, if its text changes.
pub fn plan_update(row: &Value, column: &str) -> Option<PlannedUpdate> {
    let id = match row.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let original = row.get(column).and_then(Value::as_str).unwrap_or_default().trim();
    let text = decode_alternate_format(original);
    if text.is_empty() || text == original {
        return None;
    }
    Some(PlannedUpdate { id, text })
}

pub async fn migrate(client: &SupabaseClient, limit: usize, dry_run: bool) -> Result<MigrationReport> {
    let logger = Logger::new().with_prefix("🔁").with_prefix("migrate");

    let columns = client.table_columns(TABLE).await?;
    let column = pick_text_column(&columns);
    logger.info(&format!("using column {} of {}", column, TABLE));

    let rows = client.fetch_text_rows(column, limit).await?;
    let plans: Vec<PlannedUpdate> = rows.iter().filter_map(|row| plan_update(row, column)).collect();
    logger.info(&format!("{} of {} rows need rewriting", plans.len(), rows.len()));

    let updated: Vec<String> = if dry_run {
        plans.into_iter().map(|plan| plan.id).collect()
    } else {
        let logger = &logger;
        stream::iter(plans)
            .map(|plan| async move {
                client.update_text(&plan.id, column, &plan.text).await?;
                logger.debug(&format!("updated {}", plan.id));
                Ok::<_, bpj_core::Error>(plan.id)
            })
            .buffered(CONCURRENT_UPDATES)
            .try_collect()
            .await?
    };

    Ok(MigrationReport {
        column: column.to_string(),
        fetched: rows.len(),
        updated,
    })
}
