#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Home,
    Feedback,
    CoverLetter,
    Interview,
    JobLinks,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::Feedback,
        Section::CoverLetter,
        Section::Interview,
        Section::JobLinks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Feedback => "Resume Feedback",
            Section::CoverLetter => "Cover Letter",
            Section::Interview => "Interview Q&A Trainer",
            Section::JobLinks => "Job Listings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Section for a 1-based hotkey.
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The artifact this section's call-to-action produces.
    pub fn artifact(&self) -> ArtifactKind {
        match self {
            Section::Home => ArtifactKind::Extraction,
            Section::Feedback => ArtifactKind::Feedback,
            Section::CoverLetter => ArtifactKind::CoverLetter,
            Section::Interview => ArtifactKind::Interview,
            Section::JobLinks => ArtifactKind::JobLinks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Extraction,
    Feedback,
    CoverLetter,
    Interview,
    JobLinks,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Extraction,
        ArtifactKind::Feedback,
        ArtifactKind::CoverLetter,
        ArtifactKind::Interview,
        ArtifactKind::JobLinks,
    ];

    pub fn loading_label(&self) -> &'static str {
        match self {
            ArtifactKind::Extraction => "Extracting resume...",
            ArtifactKind::Feedback => "Preparing detailed feedback...",
            ArtifactKind::CoverLetter => "Crafting your personalized cover letter...",
            ArtifactKind::Interview => "Generating interview questions...",
            ArtifactKind::JobLinks => "Generating job search links...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotkeys_are_one_based() {
        assert_eq!(Section::from_number(1), Some(Section::Home));
        assert_eq!(Section::from_number(4), Some(Section::Interview));
        assert_eq!(Section::from_number(0), None);
        assert_eq!(Section::from_number(6), None);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Section::JobLinks.next(), Section::Home);
        assert_eq!(Section::Home.previous(), Section::JobLinks);
        assert_eq!(Section::Feedback.next(), Section::CoverLetter);
    }
}
