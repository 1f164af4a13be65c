//! Readiness checks for every section.
//!
//! Navigation, the per-section call-to-action and the renderer all ask the
//! same question through [`evaluate`], so a section can never be reachable
//! by one path and locked by another.

use std::time::{Duration, Instant};

use crate::models::Section;

use super::WorkflowState;

pub const RESUME_AND_JOB_REQUIRED: &str =
    "Please upload your resume and add a job description first";
pub const RESUME_REQUIRED: &str = "Please upload your resume first";
pub const JOB_REQUIRED: &str = "Please add a job description first";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Navigate,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirements {
    pub resume: bool,
    pub job: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    Closed(&'static str),
}

impl Gate {
    pub fn is_open(&self) -> bool {
        matches!(self, Gate::Open)
    }
}

pub fn requirements(section: Section, intent: Intent) -> Requirements {
    match (section, intent) {
        (Section::Home, _) => Requirements::default(),
        (Section::Feedback | Section::JobLinks, _) => Requirements {
            resume: true,
            job: false,
        },
        // The job description is typed in the cover letter section, so
        // reaching it only needs a résumé.
        (Section::CoverLetter, Intent::Navigate) => Requirements {
            resume: true,
            job: false,
        },
        (Section::CoverLetter, Intent::Trigger) | (Section::Interview, _) => Requirements {
            resume: true,
            job: true,
        },
    }
}

pub fn evaluate(section: Section, intent: Intent, state: &WorkflowState) -> Gate {
    let needs = requirements(section, intent);
    let has_resume = state.resume.is_present();
    let has_job = state.has_job_description();

    let missing_resume = needs.resume && !has_resume;
    let missing_job = needs.job && !has_job;

    match (missing_resume, missing_job) {
        (false, false) => {
            // Feedback re-sends the original file, not the extracted text.
            if section == Section::Feedback && intent == Intent::Trigger && state.file.is_none() {
                Gate::Closed(RESUME_REQUIRED)
            } else {
                Gate::Open
            }
        }
        (true, true) => Gate::Closed(RESUME_AND_JOB_REQUIRED),
        (true, false) => Gate::Closed(RESUME_REQUIRED),
        (false, true) => Gate::Closed(JOB_REQUIRED),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Advisory,
    Info,
}

/// A transient message that disappears on its own after `ttl`.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
    ttl: Duration,
}

impl Notification {
    pub fn advisory(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(message, NotificationKind::Advisory, ttl)
    }

    pub fn info(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(message, NotificationKind::Info, ttl)
    }

    fn new(message: impl Into<String>, kind: NotificationKind, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}
