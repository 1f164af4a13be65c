use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, Result};

/// The PDF the user picked. Kept around because feedback re-sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(AppError::InvalidUpload(
                "Only PDF files are supported".to_string(),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume.pdf".to_string());
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeState {
    pub text: String,
    pub extracted: bool,
}

impl ResumeState {
    pub fn set_text(&mut self, text: String) {
        self.extracted = !text.trim().is_empty();
        self.text = text;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.extracted = false;
    }

    pub fn is_present(&self) -> bool {
        self.extracted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub category: String,
    pub score: f64,
}

pub const MAX_SCORE: f64 = 10.0;

/// Category scores in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown(Vec<ScoreEntry>);

impl ScoreBreakdown {
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'de> Deserialize<'de> for ScoreBreakdown {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScoreVisitor;

        impl<'de> Visitor<'de> for ScoreVisitor {
            type Value = ScoreBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category to numeric score")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((category, score)) = map.next_entry::<String, f64>()? {
                    entries.push(ScoreEntry {
                        category,
                        score: score.clamp(0.0, MAX_SCORE),
                    });
                }
                Ok(ScoreBreakdown(entries))
            }
        }

        deserializer.deserialize_map(ScoreVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_keep_backend_order() {
        let scores: ScoreBreakdown = serde_json::from_str(
            r#"{"Formatting": 7, "Skills": 8.5, "Experience": 6, "Achievements": 4}"#,
        )
        .unwrap();
        let categories: Vec<_> = scores.entries().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(
            categories,
            ["Formatting", "Skills", "Experience", "Achievements"]
        );
        assert_eq!(scores.get("Skills"), Some(8.5));
    }

    #[test]
    fn scores_are_clamped_to_scale() {
        let scores: ScoreBreakdown =
            serde_json::from_str(r#"{"Clarity": 14, "Impact": -2}"#).unwrap();
        assert_eq!(scores.get("Clarity"), Some(10.0));
        assert_eq!(scores.get("Impact"), Some(0.0));
    }

    #[test]
    fn whitespace_only_text_is_not_extracted() {
        let mut resume = ResumeState::default();
        resume.set_text("  \n ".to_string());
        assert!(!resume.is_present());

        resume.set_text("Jane Doe, Rust engineer".to_string());
        assert!(resume.is_present());

        resume.clear();
        assert!(resume.text.is_empty());
        assert!(!resume.is_present());
    }

    #[tokio::test]
    async fn reading_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"not a pdf").unwrap();

        let err = ResumeFile::read(&path).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUpload(_)));
    }

    #[tokio::test]
    async fn reading_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jane_Doe.PDF");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = ResumeFile::read(&path).await.unwrap();
        assert_eq!(file.name, "Jane_Doe.PDF");
        assert_eq!(file.bytes, b"%PDF-1.7");
    }
}
