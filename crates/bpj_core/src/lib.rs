pub mod content;
pub mod date;
pub mod error;
pub mod fallback;
pub mod source;
pub mod types;
pub mod view;

pub use content::ParsedContent;
pub use error::{Error, Result};
pub use source::JournalSource;
pub use types::{Article, ArticleBody, JournalPost};
pub use view::{JournalCard, RenderedView, ViewMode};
