use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::models::{
    AnalysisReply, ArtifactKind, JobSearch, LetterReply, QaPair, QaSet, ResumeFile, ResumeState,
    ScoreBreakdown,
};

/// One in-flight request. Only the latest token per kind may touch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: ArtifactKind,
    seq: u64,
}

/// Outcome of a backend call; `Err` carries the logged failure text.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Extracted(Result<String, String>),
    Feedback(Result<AnalysisReply, String>),
    CoverLetter(Result<LetterReply, String>),
    Interview(Result<Vec<QaPair>, String>),
    JobLinks(Result<JobSearch, String>),
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub token: RequestToken,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub extracting: bool,
    pub feedback: bool,
    pub cover_letter: bool,
    pub interview: bool,
    pub job_links: bool,
}

impl LoadingFlags {
    pub fn get(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Extraction => self.extracting,
            ArtifactKind::Feedback => self.feedback,
            ArtifactKind::CoverLetter => self.cover_letter,
            ArtifactKind::Interview => self.interview,
            ArtifactKind::JobLinks => self.job_links,
        }
    }

    fn set(&mut self, kind: ArtifactKind, value: bool) {
        let flag = match kind {
            ArtifactKind::Extraction => &mut self.extracting,
            ArtifactKind::Feedback => &mut self.feedback,
            ArtifactKind::CoverLetter => &mut self.cover_letter,
            ArtifactKind::Interview => &mut self.interview,
            ArtifactKind::JobLinks => &mut self.job_links,
        };
        *flag = value;
    }

    pub fn any(&self) -> bool {
        ArtifactKind::ALL.iter().any(|kind| self.get(*kind))
    }
}

#[derive(Debug, Default)]
pub struct WorkflowState {
    pub file: Option<ResumeFile>,
    pub resume: ResumeState,
    pub job_description: String,

    pub feedback: String,
    pub scores: ScoreBreakdown,
    pub cover_letter: String,
    pub qa: QaSet,
    pub job_search: JobSearch,

    pub loading: LoadingFlags,
    completed_at: HashMap<ArtifactKind, DateTime<Local>>,

    next_seq: u64,
    current: HashMap<ArtifactKind, u64>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_job_description(&self) -> bool {
        !self.job_description.trim().is_empty()
    }

    pub fn completed_at(&self, kind: ArtifactKind) -> Option<DateTime<Local>> {
        self.completed_at.get(&kind).copied()
    }

    /// Starts a new upload: every résumé-derived artifact is dropped and all
    /// outstanding requests become stale.
    pub fn begin_upload(&mut self, file: ResumeFile) -> RequestToken {
        self.file = Some(file);
        self.resume.clear();
        self.feedback.clear();
        self.scores.clear();
        self.cover_letter.clear();
        self.qa.clear();
        self.job_search = JobSearch::default();
        self.completed_at.clear();
        self.loading = LoadingFlags::default();
        self.current.clear();
        self.begin(ArtifactKind::Extraction)
    }

    /// Clears the artifact for `kind`, raises its loading flag and issues a
    /// fresh token.
    pub fn begin(&mut self, kind: ArtifactKind) -> RequestToken {
        match kind {
            ArtifactKind::Extraction => self.resume.clear(),
            ArtifactKind::Feedback => {
                self.feedback.clear();
                self.scores.clear();
            }
            ArtifactKind::CoverLetter => self.cover_letter.clear(),
            ArtifactKind::Interview => self.qa.clear(),
            ArtifactKind::JobLinks => self.job_search = JobSearch::default(),
        }
        self.completed_at.remove(&kind);
        self.loading.set(kind, true);

        self.next_seq += 1;
        self.current.insert(kind, self.next_seq);
        RequestToken {
            kind,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.current.get(&token.kind) == Some(&token.seq)
    }

    /// Applies a finished request. Returns `false` when the result was stale
    /// and dropped.
    pub fn apply(&mut self, result: FetchResult) -> bool {
        let token = result.token;
        if !self.is_current(&token) {
            tracing::debug!("Dropping stale {:?} response", token.kind);
            return false;
        }
        self.current.remove(&token.kind);
        self.loading.set(token.kind, false);

        let succeeded = match result.outcome {
            FetchOutcome::Extracted(Ok(text)) => {
                self.resume.set_text(text);
                self.resume.is_present()
            }
            FetchOutcome::Feedback(Ok(AnalysisReply::Analysis(analysis))) => {
                match analysis.scores {
                    Some(scores) => self.scores = scores,
                    None => tracing::warn!("No scores found in feedback response"),
                }
                self.feedback = analysis.feedback;
                true
            }
            FetchOutcome::Feedback(Ok(AnalysisReply::Failed { error })) => {
                self.feedback = error;
                true
            }
            FetchOutcome::CoverLetter(Ok(reply)) => {
                self.cover_letter = reply.into_text();
                true
            }
            FetchOutcome::Interview(Ok(pairs)) => {
                self.qa = QaSet::new(pairs);
                true
            }
            FetchOutcome::JobLinks(Ok(search)) => {
                self.job_search = search;
                true
            }
            FetchOutcome::Extracted(Err(e))
            | FetchOutcome::Feedback(Err(e))
            | FetchOutcome::CoverLetter(Err(e))
            | FetchOutcome::Interview(Err(e))
            | FetchOutcome::JobLinks(Err(e)) => {
                tracing::error!("{:?} request failed: {}", token.kind, e);
                false
            }
        };

        if succeeded {
            self.completed_at.insert(token.kind, Local::now());
        }
        true
    }
}
