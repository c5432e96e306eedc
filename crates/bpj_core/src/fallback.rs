//! Articles bundled with the application, shown next to the hosted posts and
//! used when the data API is unreachable or not configured.

use async_trait::async_trait;
use lazy_static::lazy_static;

use crate::source::JournalSource;
use crate::types::JournalPost;
use crate::Result;

fn post(id: &str, title: &str, description: &str, summary: &str, date: &str) -> JournalPost {
    JournalPost {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        summary: Some(summary.to_string()),
        date: Some(date.to_string()),
        ..Default::default()
    }
}

lazy_static! {
    static ref POSTS: Vec<JournalPost> = vec![
        post(
            "bpc-157-angiogenesis",
            "BPC-157: механизмы модуляции ангиогенеза",
            "BPC-157 — синтетический пентадекапептид, производный от защитного белка желудочного сока.\n\
             > Основной эффект связан со стимуляцией ангиогенеза через VEGF.\n\n\
             [СУТЬ]\n\
             В доклинических моделях пептид ускоряет заживление связок, сухожилий и слизистой ЖКТ.\n\n\
             [ПОЛЬЗА]\n\
             - Ускорение регенерации тканей\n\
             - Цитопротекция слизистой\n\n\
             [РЕКОМЕНДАЦИЯ]\n\
             Субстанция предназначена исключительно для лабораторных исследований.",
            "Обзор доклинических данных по BPC-157.",
            "2025-01-15",
        ),
        post(
            "tb-500-recovery",
            "TB-500 и восстановление после нагрузок",
            "{'introduction': 'TB-500 является синтетическим фрагментом тимозина бета-4.', \
             'essence': 'Фрагмент участвует в миграции клеток и организации актина.', \
             'conclusion': 'Данные пока ограничены исследованиями на животных.'}",
            "Коротко о TB-500.",
            "2025-02-03",
        ),
        post(
            "peptide-storage",
            "Хранение лиофилизированных пептидов",
            "Лиофилизированные пептиды хранят при температуре от -20 °C в защищённом от света месте. \
             После восстановления раствор используют в течение нескольких недель.",
            "Практические правила хранения.",
            "2025-03-10",
        ),
    ];
}

/// The bundled posts, in display order.
pub fn journal_posts() -> &'static [JournalPost] {
    &POSTS
}

#[derive(Debug, Clone, Default)]
pub struct StaticSource;

impl StaticSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JournalSource for StaticSource {
    fn name(&self) -> &str {
        "bundled"
    }

    async fn latest_posts(&self, limit: usize) -> Result<Vec<JournalPost>> {
        Ok(journal_posts().iter().take(limit).cloned().collect())
    }

    async fn post_by_id(&self, id: &str) -> Result<Option<JournalPost>> {
        Ok(journal_posts()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned())
    }
}
