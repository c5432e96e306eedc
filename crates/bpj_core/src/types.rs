use serde::{Deserialize, Deserializer, Serialize};

use crate::content::{self, ParsedContent};

/// A `journal_posts` row as the data API returns it. Every column is optional
/// and empty strings are as good as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalPost {
    #[serde(default, deserialize_with = "deserialize_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_lite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Ids are uuids in the hosted table but plain integers in older exports.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Article body, classified once when the post is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArticleBody {
    Empty,
    Plain { text: String },
    Structured { tagged: String, sections: ParsedContent },
}

impl ArticleBody {
    /// Decodes object-literal bodies into tagged text, then splits tagged
    /// text into sections.
    pub fn from_raw(raw: &str) -> Self {
        let decoded = content::decode_alternate_format(raw);
        if decoded.trim().is_empty() {
            ArticleBody::Empty
        } else if content::has_tags(&decoded) {
            ArticleBody::Structured {
                sections: content::extract(&decoded),
                tagged: decoded,
            }
        } else {
            ArticleBody::Plain { text: decoded }
        }
    }

    pub fn source_text(&self) -> &str {
        match self {
            ArticleBody::Empty => "",
            ArticleBody::Plain { text } => text,
            ArticleBody::Structured { tagged, .. } => tagged,
        }
    }

    pub fn sections(&self) -> Option<&ParsedContent> {
        match self {
            ArticleBody::Structured { sections, .. } => Some(sections),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: ArticleBody,
    pub summary: Option<String>,
    pub content_lite: Option<String>,
    pub image_url: Option<String>,
    pub published: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<JournalPost> for Article {
    fn from(post: JournalPost) -> Self {
        let description = present(post.description);
        let summary = present(post.summary);
        let body = description
            .as_deref()
            .or(summary.as_deref())
            .map(ArticleBody::from_raw)
            .unwrap_or(ArticleBody::Empty);

        Self {
            id: present(post.id),
            title: present(post.title),
            body,
            summary,
            content_lite: present(post.content_lite),
            image_url: present(post.image_url),
            published: present(post.date).or(present(post.created_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserializes_numeric_id_and_nulls() {
        let post: JournalPost = serde_json::from_str(
            r#"{"id": 42, "title": "T", "description": null, "created_at": "2024-05-01T10:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(post.id.as_deref(), Some("42"));
        assert_eq!(post.description, None);
        assert_eq!(post.summary, None);
    }

    #[test]
    fn test_body_classification() {
        assert_eq!(ArticleBody::from_raw("   "), ArticleBody::Empty);
        assert_eq!(
            ArticleBody::from_raw("just prose"),
            ArticleBody::Plain { text: "just prose".to_string() }
        );
        let body = ArticleBody::from_raw("{'introduction': 'x', 'essence': 'y'}");
        let sections = body.sections().unwrap();
        assert_eq!(sections.introduction, "x");
        assert_eq!(sections.essence, "y");
        assert_eq!(body.source_text(), "x\n\n[СУТЬ]\ny");
    }

    #[test]
    fn test_article_from_post_prefers_description_and_date() {
        let post = JournalPost {
            id: Some("a1".to_string()),
            title: Some(String::new()),
            description: Some(String::new()),
            summary: Some("Summary text".to_string()),
            created_at: Some("2024-01-01".to_string()),
            date: Some("2024-02-02".to_string()),
            ..Default::default()
        };
        let article = Article::from(post);
        assert_eq!(article.title, None);
        assert_eq!(article.body.source_text(), "Summary text");
        assert_eq!(article.published.as_deref(), Some("2024-02-02"));
    }

    #[test]
    fn test_body_serializes_with_kind_tag() {
        let json = serde_json::to_value(ArticleBody::from_raw("[СУТЬ]\nE")).unwrap();
        assert_eq!(json["kind"], "structured");
        assert_eq!(json["sections"]["essence"], "E");
    }
}
