use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const LABOR_CARE_JSON: &str = include_str!("../../data/knowledge/labor_care.json");
const LABOR_KNOWLEDGE_JSON: &str = include_str!("../../data/knowledge/labor_knowledge.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    /// Estimated read time in minutes; feeds the completion rule.
    pub read_time: u32,
    pub last_updated: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub metadata: ArticleMetadata,
    pub sections: Vec<Section>,
}

/// The static knowledge corpus. Section and subsection ids are the stable
/// identifiers the progress aggregator counts against.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    articles: Vec<Article>,
}

impl KnowledgeBase {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let labor_care: Article =
            serde_json::from_str(LABOR_CARE_JSON).context("failed to parse labor-care article")?;
        let labor_knowledge: Article = serde_json::from_str(LABOR_KNOWLEDGE_JSON)
            .context("failed to parse labor-knowledge article")?;

        Ok(Self::from_articles(vec![labor_care, labor_knowledge]))
    }

    pub fn from_articles(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn article(&self, article_id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == article_id)
    }

    /// Every section and subsection id across the corpus, in document order.
    pub fn section_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for article in &self.articles {
            for section in &article.sections {
                ids.push(section.id.clone());
                for subsection in &section.subsections {
                    ids.push(subsection.id.clone());
                }
            }
        }
        ids
    }

    pub fn total_sections(&self) -> usize {
        self.articles
            .iter()
            .flat_map(|a| &a.sections)
            .map(|s| 1 + s.subsections.len())
            .sum()
    }

    /// Title of the section or subsection with this id.
    pub fn section_title(&self, section_id: &str) -> Option<&str> {
        for article in &self.articles {
            for section in &article.sections {
                if section.id == section_id {
                    return Some(&section.title);
                }
                if let Some(subsection) =
                    section.subsections.iter().find(|s| s.id == section_id)
                {
                    return Some(&subsection.title);
                }
            }
        }
        None
    }

    /// Estimated read time of the article owning `section_id`.
    pub fn read_time_for_section(&self, section_id: &str) -> Option<u32> {
        for article in &self.articles {
            for section in &article.sections {
                if section.id == section_id
                    || section.subsections.iter().any(|s| s.id == section_id)
                {
                    return Some(article.metadata.read_time);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = KnowledgeBase::builtin().unwrap();
        assert_eq!(catalog.articles().len(), 2);
        assert!(catalog.article("labor-care").is_some());
        assert!(catalog.article("labor-knowledge").is_some());
    }

    #[test]
    fn section_ids_are_unique_and_match_total() {
        let catalog = KnowledgeBase::builtin().unwrap();
        let ids = catalog.section_ids();

        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), catalog.total_sections());
        assert!(ids.len() >= 12);
    }

    #[test]
    fn subsections_resolve_to_their_article_read_time() {
        let catalog = KnowledgeBase::builtin().unwrap();
        assert_eq!(catalog.read_time_for_section("labor-signs-water"), Some(8));
        assert_eq!(catalog.read_time_for_section("breathing"), Some(10));
        assert_eq!(catalog.read_time_for_section("nope"), None);
        assert_eq!(catalog.section_title("labor-stage-2").unwrap(), "第二產程：娩出胎兒");
    }
}
