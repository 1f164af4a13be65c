use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::QaPair;

pub const COVER_LETTER_FILE: &str = "cover_letter.txt";
pub const INTERVIEW_FILE: &str = "interview_answers.txt";

/// Numbered question/answer blocks separated by a blank line.
pub fn interview_transcript(pairs: &[QaPair]) -> String {
    pairs
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}\nAnswer: {}", i + 1, p.question, p.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes `content` to `dir/file_name` in one call, creating `dir` if needed.
pub fn save_text(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, content)?;
    tracing::info!("Saved {}", path.display());
    Ok(path)
}
