mod artifacts;
mod resume;
mod section;

pub use artifacts::{AnalysisReply, JobLink, JobSearch, LetterReply, QaPair, QaSet};
pub use resume::{ResumeFile, ResumeState, ScoreBreakdown};
pub use section::{ArtifactKind, Section};
