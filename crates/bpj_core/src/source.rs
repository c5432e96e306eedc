use async_trait::async_trait;

use crate::types::JournalPost;
use crate::Result;

#[async_trait]
pub trait JournalSource: Send + Sync {
    /// Returns the name of the source, for logging
    fn name(&self) -> &str;

    /// Latest posts, newest first, at most `limit`
    async fn latest_posts(&self, limit: usize) -> Result<Vec<JournalPost>>;

    /// A single post, `None` if the source does not have it
    async fn post_by_id(&self, id: &str) -> Result<Option<JournalPost>>;
}
