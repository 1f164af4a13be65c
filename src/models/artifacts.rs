use serde::Deserialize;

use super::ScoreBreakdown;

/// Pairs before this index are generated from the résumé, the rest from the
/// job description.
pub const RESUME_QUESTION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobSearch {
    #[serde(default, rename = "search_links")]
    pub links: Vec<JobLink>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl JobSearch {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Analysis {
    pub feedback: String,
    #[serde(default)]
    pub scores: Option<ScoreBreakdown>,
}

/// Body of `/upload-resume`: either an analysis or an error the backend
/// wants shown to the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisReply {
    Analysis(Analysis),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LetterReply {
    Letter { letter: String },
    Failed { error: String },
}

impl LetterReply {
    pub fn into_text(self) -> String {
        match self {
            LetterReply::Letter { letter } => letter,
            LetterReply::Failed { error } => error,
        }
    }
}

/// Generated interview pairs plus which answers are currently expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaSet {
    pairs: Vec<QaPair>,
    expanded: Vec<bool>,
}

impl QaSet {
    pub fn new(pairs: Vec<QaPair>) -> Self {
        let expanded = vec![false; pairs.len()];
        Self { pairs, expanded }
    }

    pub fn pairs(&self) -> &[QaPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.expanded.clear();
    }

    pub fn resume_based(&self) -> &[QaPair] {
        &self.pairs[..self.split_point()]
    }

    pub fn job_based(&self) -> &[QaPair] {
        &self.pairs[self.split_point()..]
    }

    fn split_point(&self) -> usize {
        self.pairs.len().min(RESUME_QUESTION_COUNT)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Flips one answer. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.expanded.get_mut(index) {
            *flag = !*flag;
        }
    }
}
