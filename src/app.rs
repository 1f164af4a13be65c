use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ArtifactKind, ResumeFile, Section};
use crate::services::export::{self, COVER_LETTER_FILE, INTERVIEW_FILE};
use crate::services::BackendClient;
use crate::tui::AppAction;
use crate::workflow::gate::{self, Gate, Intent};
use crate::workflow::{FetchOutcome, FetchResult, Notification, RequestToken, WorkflowState};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Connecting,
    Connected(String),
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    ResumePath,
    JobDescription,
}

pub struct App {
    // Data
    pub workflow: WorkflowState,
    pub backend_status: BackendStatus,

    // UI State
    pub section: Section,
    pub notification: Option<Notification>,
    pub input_mode: InputMode,
    pub input: String,
    pub show_help: bool,
    pub qa_cursor: usize,
    pub link_cursor: usize,
    pub scroll: u16,
    spinner_index: usize,

    // Async state
    results_rx: mpsc::Receiver<FetchResult>,
    results_tx: mpsc::Sender<FetchResult>,
    greeting_rx: Option<oneshot::Receiver<std::result::Result<String, String>>>,

    // Services
    backend: Arc<BackendClient>,
    download_dir: PathBuf,
    notification_ttl: Duration,
}

impl App {
    /// Must be called from inside a tokio runtime; the greeting request is
    /// spawned immediately.
    pub fn new(config: &Config) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(
            &config.api_base_url,
            config.request_timeout(),
        )?);

        let (results_tx, results_rx) = mpsc::channel(16);

        let (greeting_tx, greeting_rx) = oneshot::channel();
        let greeter = Arc::clone(&backend);
        tokio::spawn(async move {
            let result = greeter.greeting().await.map_err(|e| e.to_string());
            let _ = greeting_tx.send(result);
        });

        Ok(Self {
            workflow: WorkflowState::new(),
            backend_status: BackendStatus::Connecting,
            section: Section::Home,
            notification: None,
            input_mode: InputMode::Normal,
            input: String::new(),
            show_help: false,
            qa_cursor: 0,
            link_cursor: 0,
            scroll: 0,
            spinner_index: 0,
            results_rx,
            results_tx,
            greeting_rx: Some(greeting_rx),
            backend,
            download_dir: config.download_dir.clone(),
            notification_ttl: config.notification_ttl(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.workflow.loading.any() {
            self.spinner_index = self.spinner_index.wrapping_add(1);
        }
    }

    pub fn gate(&self, section: Section, intent: Intent) -> Gate {
        gate::evaluate(section, intent, &self.workflow)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::GoTo(section) => self.navigate(section),
            AppAction::NextSection => self.navigate(self.section.next()),
            AppAction::PreviousSection => self.navigate(self.section.previous()),

            AppAction::Activate => match self.section {
                Section::Home => self.start_input(InputMode::ResumePath),
                section => {
                    self.trigger(section);
                }
            },

            AppAction::UploadResume => self.start_input(InputMode::ResumePath),

            AppAction::EditJobDescription => {
                if self.workflow.resume.is_present() {
                    self.start_input(InputMode::JobDescription);
                } else {
                    self.notify_advisory(gate::RESUME_REQUIRED);
                }
            }

            AppAction::MoveUp => match self.section {
                Section::Interview => self.qa_cursor = self.qa_cursor.saturating_sub(1),
                Section::JobLinks => self.link_cursor = self.link_cursor.saturating_sub(1),
                _ => self.scroll = self.scroll.saturating_sub(1),
            },

            AppAction::MoveDown => match self.section {
                Section::Interview => {
                    if self.qa_cursor + 1 < self.workflow.qa.len() {
                        self.qa_cursor += 1;
                    }
                }
                Section::JobLinks => {
                    if self.link_cursor + 1 < self.workflow.job_search.links.len() {
                        self.link_cursor += 1;
                    }
                }
                _ => self.scroll = self.scroll.saturating_add(1),
            },

            AppAction::PageUp => self.scroll = self.scroll.saturating_sub(10),
            AppAction::PageDown => self.scroll = self.scroll.saturating_add(10),

            AppAction::ToggleAnswer => {
                if self.section == Section::Interview {
                    self.workflow.qa.toggle(self.qa_cursor);
                }
            }

            AppAction::OpenLink => {
                if self.section == Section::JobLinks {
                    self.open_selected_link();
                }
            }

            AppAction::Save => match self.section {
                Section::CoverLetter => self.save_cover_letter(),
                Section::Interview => self.save_interview(),
                _ => {}
            },

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::InputChar(c) => self.input.push(c),
            AppAction::InputPaste(text) => self.input.push_str(&text),
            AppAction::InputNewline => {
                if self.input_mode == InputMode::JobDescription {
                    self.input.push('\n');
                }
            }
            AppAction::InputBackspace => {
                self.input.pop();
            }
            AppAction::InputConfirm => self.confirm_input().await?,
            AppAction::InputCancel => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
        }

        Ok(false)
    }

    /// Switches sections when the gate allows it, otherwise shows why not.
    pub fn navigate(&mut self, target: Section) {
        match self.gate(target, Intent::Navigate) {
            Gate::Open => {
                if self.section != target {
                    self.section = target;
                    self.scroll = 0;
                }
            }
            Gate::Closed(message) => self.notify_advisory(message),
        }
    }

    fn start_input(&mut self, mode: InputMode) {
        self.input = match mode {
            InputMode::JobDescription => self.workflow.job_description.clone(),
            _ => String::new(),
        };
        self.input_mode = mode;
    }

    async fn confirm_input(&mut self) -> Result<()> {
        let mode = std::mem::take(&mut self.input_mode);
        let input = std::mem::take(&mut self.input);
        match mode {
            InputMode::Normal => {}
            InputMode::ResumePath => {
                let path = input.trim();
                if !path.is_empty() {
                    self.upload_resume(&expand_home(path)).await?;
                }
            }
            InputMode::JobDescription => {
                self.workflow.job_description = input;
            }
        }
        Ok(())
    }

    /// Reads the PDF and starts extraction. Returns `false` when the file
    /// can't be used; the reason is shown as an advisory and the workflow is
    /// left untouched.
    pub async fn upload_resume(&mut self, path: &Path) -> Result<bool> {
        let file = match ResumeFile::read(path).await {
            Ok(file) => file,
            Err(AppError::InvalidUpload(message)) => {
                self.notify_advisory(message);
                return Ok(false);
            }
            Err(AppError::Io(e)) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                self.notify_advisory(format!("Could not read {}", path.display()));
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        tracing::info!("Uploading resume {}", file.name);
        let token = self.workflow.begin_upload(file.clone());
        self.qa_cursor = 0;
        self.link_cursor = 0;

        let backend = Arc::clone(&self.backend);
        self.spawn_request(token, async move {
            FetchOutcome::Extracted(backend.extract_resume(&file).await.map_err(|e| e.to_string()))
        });
        Ok(true)
    }

    /// Fires the section's request. Returns `false` when the section's gate
    /// is closed, in which case nothing happens.
    pub fn trigger(&mut self, section: Section) -> bool {
        if !self.gate(section, Intent::Trigger).is_open() {
            return false;
        }

        let backend = Arc::clone(&self.backend);
        let resume = self.workflow.resume.text.clone();
        let job = self.workflow.job_description.clone();

        match section {
            Section::Home => return false,
            Section::Feedback => {
                let Some(file) = self.workflow.file.clone() else {
                    return false;
                };
                let token = self.workflow.begin(ArtifactKind::Feedback);
                self.spawn_request(token, async move {
                    FetchOutcome::Feedback(
                        backend.analyze_resume(&file).await.map_err(|e| e.to_string()),
                    )
                });
            }
            Section::CoverLetter => {
                let token = self.workflow.begin(ArtifactKind::CoverLetter);
                self.spawn_request(token, async move {
                    FetchOutcome::CoverLetter(
                        backend
                            .generate_cover_letter(&resume, &job)
                            .await
                            .map_err(|e| e.to_string()),
                    )
                });
            }
            Section::Interview => {
                let token = self.workflow.begin(ArtifactKind::Interview);
                self.qa_cursor = 0;
                self.spawn_request(token, async move {
                    FetchOutcome::Interview(
                        backend
                            .interview_questions(&resume, &job)
                            .await
                            .map_err(|e| e.to_string()),
                    )
                });
            }
            Section::JobLinks => {
                let token = self.workflow.begin(ArtifactKind::JobLinks);
                self.link_cursor = 0;
                self.spawn_request(token, async move {
                    FetchOutcome::JobLinks(backend.job_links(&resume).await.map_err(|e| e.to_string()))
                });
            }
        }
        true
    }

    fn spawn_request<F>(&self, token: RequestToken, request: F)
    where
        F: Future<Output = FetchOutcome> + Send + 'static,
    {
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let outcome = request.await;
            let _ = tx.send(FetchResult { token, outcome }).await;
        });
    }

    /// Applies finished requests and expires notifications (non-blocking).
    pub fn poll_results(&mut self) {
        while let Ok(result) = self.results_rx.try_recv() {
            self.workflow.apply(result);
        }
        self.clamp_cursors();

        if let Some(rx) = self.greeting_rx.as_mut() {
            match rx.try_recv() {
                Ok(Ok(message)) => {
                    self.backend_status = BackendStatus::Connected(message);
                    self.greeting_rx = None;
                }
                Ok(Err(e)) => {
                    tracing::error!("Failed to connect to backend: {}", e);
                    self.backend_status = BackendStatus::Unreachable;
                    self.greeting_rx = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.backend_status = BackendStatus::Unreachable;
                    self.greeting_rx = None;
                }
            }
        }

        let now = Instant::now();
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
    }

    /// Waits until no request is in flight.
    pub async fn wait_until_idle(&mut self) {
        while self.workflow.loading.any() {
            match self.results_rx.recv().await {
                Some(result) => {
                    self.workflow.apply(result);
                }
                None => break,
            }
        }
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        let qa_len = self.workflow.qa.len();
        if self.qa_cursor >= qa_len {
            self.qa_cursor = qa_len.saturating_sub(1);
        }
        let link_len = self.workflow.job_search.links.len();
        if self.link_cursor >= link_len {
            self.link_cursor = link_len.saturating_sub(1);
        }
    }

    /// Uploads the résumé, then fires every section whose gate is open and
    /// waits for all of them.
    pub async fn analyze(&mut self, resume: &Path, job: Option<String>) -> Result<()> {
        if let Some(job) = job {
            self.workflow.job_description = job;
        }

        if !self.upload_resume(resume).await? {
            let reason = self
                .notification
                .take()
                .map(|note| note.message)
                .unwrap_or_else(|| format!("Could not use {}", resume.display()));
            return Err(AppError::InvalidUpload(reason));
        }
        self.wait_until_idle().await;

        if !self.workflow.resume.is_present() {
            return Err(anyhow::anyhow!("Resume extraction failed; see the log for details").into());
        }

        for section in [
            Section::Feedback,
            Section::CoverLetter,
            Section::Interview,
            Section::JobLinks,
        ] {
            if !self.trigger(section) {
                tracing::info!("Skipping {}: gate closed", section.label());
            }
        }
        self.wait_until_idle().await;
        Ok(())
    }

    pub fn save_cover_letter(&mut self) {
        if self.workflow.cover_letter.is_empty() {
            return;
        }
        let content = self.workflow.cover_letter.clone();
        self.save(COVER_LETTER_FILE, &content);
    }

    pub fn save_interview(&mut self) {
        if self.workflow.qa.is_empty() {
            return;
        }
        let content = export::interview_transcript(self.workflow.qa.pairs());
        self.save(INTERVIEW_FILE, &content);
    }

    fn save(&mut self, file_name: &str, content: &str) {
        match export::save_text(&self.download_dir, file_name, content) {
            Ok(path) => self.notify_info(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", file_name, e);
                self.notify_advisory(format!("Could not save {file_name}"));
            }
        }
    }

    fn open_selected_link(&mut self) {
        let Some(link) = self.workflow.job_search.links.get(self.link_cursor) else {
            return;
        };
        let url = link.url.clone();
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open {}: {}", url, e);
            self.notify_advisory(format!("Could not open {url}"));
        }
    }

    fn notify_advisory(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::advisory(message, self.notification_ttl));
    }

    fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message, self.notification_ttl));
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
