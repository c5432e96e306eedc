use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::{clean_text, ParsedContent};
use crate::date::{format_date, DateStyle};
use crate::types::Article;

pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?auto=format&fit=crop&w=1600&q=80";
pub const UNTITLED: &str = "Без названия";
pub const NO_DESCRIPTION: &str = "Описание отсутствует.";
pub const ARTICLE_NOT_FOUND: &str = "Статья не найдена.";
pub const EXPERT_MISSING: &str = "Expert-версия не найдена.";
pub const LITE_MISSING: &str = "Lite-версия не найдена.";
pub const BP_PREPARING: &str = "Контент готовится...";
pub const BP_SIGNATURE: &str = "— Команда BioPeptidePlus";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Expert,
    Lite,
    #[serde(rename = "bp")]
    BpPlus,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expert" => Ok(ViewMode::Expert),
            "lite" => Ok(ViewMode::Lite),
            "bp" | "bp+" | "bpplus" => Ok(ViewMode::BpPlus),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Expert => "expert",
            ViewMode::Lite => "lite",
            ViewMode::BpPlus => "bp",
        };
        f.write_str(name)
    }
}

/// What a display mode shows for an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedView {
    Markdown { text: String },
    Sections { sections: ParsedContent },
    Placeholder { message: String },
}

impl RenderedView {
    fn placeholder(message: &str) -> Self {
        RenderedView::Placeholder {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedView::Markdown { text } => write!(f, "{}", text),
            RenderedView::Placeholder { message } => write!(f, "{}", message),
            RenderedView::Sections { sections } => {
                let mut blocks = Vec::new();
                if !sections.introduction.is_empty() {
                    blocks.push(sections.introduction.clone());
                }
                if !sections.quotes.is_empty() {
                    blocks.push(
                        sections
                            .quotes
                            .iter()
                            .map(|q| format!("> {}", q))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    );
                }
                if !sections.essence.is_empty() {
                    blocks.push(format!("🧪 Суть исследования\n{}", sections.essence));
                }
                if !sections.benefits.is_empty() {
                    let items = sections
                        .benefits
                        .iter()
                        .map(|b| format!("✅ {}", b))
                        .collect::<Vec<_>>()
                        .join("\n");
                    blocks.push(format!("Польза\n{}", items));
                }
                if !sections.recommendation.is_empty() {
                    blocks.push(format!(
                        "Рекомендация\n{}\n{}",
                        sections.recommendation, BP_SIGNATURE
                    ));
                }
                write!(f, "{}", blocks.join("\n\n"))
            }
        }
    }
}

/// Summary of an article for the journal list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalCard {
    pub id: Option<String>,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub image_url: String,
}

impl Article {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn hero_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Full text with section tags removed.
    pub fn expert_text(&self) -> String {
        clean_text(self.body.source_text())
    }

    pub fn lite_text(&self) -> Option<&str> {
        self.content_lite.as_deref().or(self.summary.as_deref())
    }

    pub fn render(&self, mode: ViewMode) -> RenderedView {
        match mode {
            ViewMode::Expert => {
                let text = self.expert_text();
                if text.is_empty() {
                    RenderedView::placeholder(EXPERT_MISSING)
                } else {
                    RenderedView::Markdown { text }
                }
            }
            ViewMode::Lite => match self.lite_text() {
                Some(text) => RenderedView::Markdown {
                    text: text.to_string(),
                },
                None => RenderedView::placeholder(LITE_MISSING),
            },
            ViewMode::BpPlus => match self.body.sections() {
                Some(sections) => RenderedView::Sections {
                    sections: sections.clone(),
                },
                None => RenderedView::placeholder(BP_PREPARING),
            },
        }
    }

    pub fn card(&self) -> JournalCard {
        let excerpt = self.expert_text();
        JournalCard {
            id: self.id.clone(),
            title: self.display_title().to_string(),
            date: format_date(self.published.as_deref(), DateStyle::Short),
            excerpt: if excerpt.is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                excerpt
            },
            image_url: self.hero_image().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JournalPost;

    fn article(description: Option<&str>, lite: Option<&str>, summary: Option<&str>) -> Article {
        Article::from(JournalPost {
            id: Some("p1".to_string()),
            description: description.map(str::to_string),
            content_lite: lite.map(str::to_string),
            summary: summary.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_view_mode_parsing() {
        assert_eq!("Expert".parse::<ViewMode>(), Ok(ViewMode::Expert));
        assert_eq!("bp+".parse::<ViewMode>(), Ok(ViewMode::BpPlus));
        assert_eq!(" lite ".parse::<ViewMode>(), Ok(ViewMode::Lite));
        assert!("full".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::BpPlus.to_string(), "bp");
    }

    #[test]
    fn test_expert_view_strips_tags() {
        let a = article(Some("Intro\n\n[СУТЬ]\nCore"), None, None);
        assert_eq!(
            a.render(ViewMode::Expert),
            RenderedView::Markdown { text: "Intro\n\nCore".to_string() }
        );
    }

    #[test]
    fn test_placeholders() {
        let a = article(None, None, None);
        assert_eq!(a.render(ViewMode::Expert), RenderedView::placeholder(EXPERT_MISSING));
        assert_eq!(a.render(ViewMode::Lite), RenderedView::placeholder(LITE_MISSING));
        assert_eq!(a.render(ViewMode::BpPlus), RenderedView::placeholder(BP_PREPARING));
    }

    #[test]
    fn test_lite_falls_back_to_summary() {
        let a = article(Some("body"), None, Some("short"));
        assert_eq!(a.render(ViewMode::Lite), RenderedView::Markdown { text: "short".to_string() });
        let a = article(Some("body"), Some("lite"), Some("short"));
        assert_eq!(a.render(ViewMode::Lite), RenderedView::Markdown { text: "lite".to_string() });
    }

    #[test]
    fn test_bp_view_for_object_literal_body() {
        let a = article(Some("{'introduction': 'x', 'essence': 'y', 'conclusion': 'z'}"), None, None);
        match a.render(ViewMode::BpPlus) {
            RenderedView::Sections { sections } => {
                assert_eq!(sections.introduction, "x");
                assert_eq!(sections.essence, "y");
                assert_eq!(sections.recommendation, "z");
            }
            other => panic!("expected sections, got {:?}", other),
        }
    }

    #[test]
    fn test_sections_display() {
        let view = RenderedView::Sections {
            sections: ParsedContent {
                introduction: "Intro".to_string(),
                quotes: vec!["Q".to_string()],
                essence: String::new(),
                benefits: vec!["A".to_string(), "B".to_string()],
                recommendation: "R".to_string(),
            },
        };
        assert_eq!(
            view.to_string(),
            format!("Intro\n\n> Q\n\nПольза\n✅ A\n✅ B\n\nРекомендация\nR\n{}", BP_SIGNATURE)
        );
    }

    #[test]
    fn test_card_defaults() {
        let card = article(None, None, None).card();
        assert_eq!(card.title, UNTITLED);
        assert_eq!(card.excerpt, NO_DESCRIPTION);
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(card.date, "");
    }
}
