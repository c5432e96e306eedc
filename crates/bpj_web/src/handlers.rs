use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use bpj_client::supabase::DEFAULT_LIMIT;
use bpj_core::{Article, JournalCard, RenderedView, ViewMode};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<JournalCard>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let articles = state.journal.list(limit).await;
    Json(articles.iter().map(Article::card).collect())
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    state.journal.article(&id).await.map(Json).ok_or(ApiError::NotFound)
}

pub async fn get_article_view(
    State(state): State<Arc<AppState>>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<RenderedView>, ApiError> {
    let mode: ViewMode = mode.parse().map_err(ApiError::BadRequest)?;
    let article = state.journal.article(&id).await.ok_or(ApiError::NotFound)?;
    Ok(Json(article.render(mode)))
}
