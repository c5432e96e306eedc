use std::collections::HashSet;
use std::sync::Arc;

use bpj_core::fallback::StaticSource;
use bpj_core::{Article, JournalPost, JournalSource, Result};

use crate::config::ApiConfig;
use crate::logging::Logger;
use crate::supabase::SupabaseClient;

/// Journal read path: the hosted posts when they can be fetched, merged with
/// or replaced by the bundled ones. Nothing here returns a fetch error.
pub struct Journal {
    remote: Option<Arc<dyn JournalSource>>,
    fallback: Arc<dyn JournalSource>,
    logger: Logger,
}

impl Journal {
    pub fn new(remote: Option<Arc<dyn JournalSource>>) -> Self {
        Self {
            remote,
            fallback: Arc::new(StaticSource::new()),
            logger: Logger::new().with_prefix("📰").with_prefix("journal"),
        }
    }

    /// `None` skips the remote fetch entirely.
    pub fn from_config(config: Option<ApiConfig>) -> Result<Self> {
        let remote = match config {
            Some(config) => Some(Arc::new(SupabaseClient::new(config)?) as Arc<dyn JournalSource>),
            None => None,
        };
        Ok(Self::new(remote))
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn JournalSource>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    async fn remote_posts(&self, limit: usize) -> Vec<JournalPost> {
        let Some(remote) = &self.remote else {
            self.logger.debug("no data API configured, skipping remote fetch");
            return Vec::new();
        };
        match remote.latest_posts(limit).await {
            Ok(posts) => {
                self.logger.info(&format!("fetched {} posts from {}", posts.len(), remote.name()));
                posts
            }
            Err(e) => {
                self.logger.warn(&format!("{} fetch failed: {}", remote.name(), e));
                Vec::new()
            }
        }
    }

    async fn fallback_posts(&self, limit: usize) -> Vec<JournalPost> {
        self.fallback.latest_posts(limit).await.unwrap_or_else(|e| {
            self.logger.error(&format!("{} posts unavailable: {}", self.fallback.name(), e));
            Vec::new()
        })
    }

    /// Bundled posts first, then the hosted ones. A post whose id was
    /// already listed is dropped.
    pub async fn list(&self, limit: usize) -> Vec<Article> {
        let mut posts = self.fallback_posts(limit).await;
        posts.extend(self.remote_posts(limit).await);

        let mut seen = HashSet::new();
        posts
            .into_iter()
            .filter(|post| match &post.id {
                Some(id) => seen.insert(id.clone()),
                None => true,
            })
            .map(Article::from)
            .collect()
    }

    /// The hosted article if it exists, else the bundled one with that id.
    pub async fn article(&self, id: &str) -> Option<Article> {
        if let Some(remote) = &self.remote {
            match remote.post_by_id(id).await {
                Ok(Some(post)) => return Some(Article::from(post)),
                Ok(None) => self.logger.debug(&format!("{} not found in {}", id, remote.name())),
                Err(e) => self.logger.warn(&format!("{} fetch failed for {}: {}", remote.name(), id, e)),
            }
        }
        match self.fallback.post_by_id(id).await {
            Ok(post) => post.map(Article::from),
            Err(e) => {
                self.logger.error(&format!("{} lookup failed for {}: {}", self.fallback.name(), id, e));
                None
            }
        }
    }
}
