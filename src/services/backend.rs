use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AnalysisReply, JobSearch, LetterReply, QaPair, ResumeFile};

#[derive(Debug, Serialize)]
struct ResumeJobRequest<'a> {
    resume: &'a str,
    job: &'a str,
}

#[derive(Debug, Serialize)]
struct ResumeRequest<'a> {
    resume: &'a str,
}

#[derive(Debug, Deserialize)]
struct GreetingResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct InterviewResponse {
    pairs: Vec<QaPair>,
}

/// FastAPI puts failures in `detail`; the coach endpoints sometimes use
/// `error` instead.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
}

pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder().user_agent("resume-coach/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    pub async fn greeting(&self) -> Result<String> {
        let response = self.client.get(self.base.clone()).send().await?;
        let greeting: GreetingResponse = read_json(response).await?;
        Ok(greeting.message)
    }

    pub async fn extract_resume(&self, file: &ResumeFile) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("extract-resume")?)
            .multipart(resume_form(file)?)
            .send()
            .await?;

        let extracted: ExtractResponse = read_json(response).await?;
        tracing::info!("Extracted {} characters from {}", extracted.text.len(), file.name);
        Ok(extracted.text)
    }

    pub async fn analyze_resume(&self, file: &ResumeFile) -> Result<AnalysisReply> {
        let response = self
            .client
            .post(self.endpoint("upload-resume")?)
            .multipart(resume_form(file)?)
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn generate_cover_letter(&self, resume: &str, job: &str) -> Result<LetterReply> {
        let response = self
            .client
            .post(self.endpoint("generate-cover-letter")?)
            .json(&ResumeJobRequest { resume, job })
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn interview_questions(&self, resume: &str, job: &str) -> Result<Vec<QaPair>> {
        let response = self
            .client
            .post(self.endpoint("interview-trainer")?)
            .json(&ResumeJobRequest { resume, job })
            .send()
            .await?;

        let interview: InterviewResponse = read_json(response).await?;
        Ok(interview.pairs)
    }

    pub async fn job_links(&self, resume: &str) -> Result<JobSearch> {
        let response = self
            .client
            .post(self.endpoint("generate-links")?)
            .json(&ResumeRequest { resume })
            .send()
            .await?;

        let search: JobSearch = read_json(response).await?;
        tracing::debug!("Received {} job search links", search.links.len());
        Ok(search)
    }
}

fn resume_form(file: &ResumeFile) -> Result<Form> {
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str("application/pdf")?;
    Ok(Form::new().part("file", part))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail.or(b.error))
            .unwrap_or(body);
        return Err(AppError::Backend {
            status: status.as_u16(),
            detail,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_backend::{MockBackend, Route};

    fn pdf() -> ResumeFile {
        ResumeFile::new("jane.pdf", b"%PDF-1.7 fake".to_vec())
    }

    #[tokio::test]
    async fn extract_sends_multipart_file() {
        let mock = MockBackend::start(vec![Route::json(
            "/extract-resume",
            r#"{"text": "Jane Doe", "score": []}"#,
        )])
        .await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        let text = client.extract_resume(&pdf()).await.unwrap();
        assert_eq!(text, "Jane Doe");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/extract-resume");
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"jane.pdf\""));
        assert!(body.contains("%PDF-1.7 fake"));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_fastapi_detail() {
        let mock = MockBackend::start(vec![Route::json(
            "/extract-resume",
            r#"{"detail": "Only PDF files are supported"}"#,
        )
        .with_status(400)])
        .await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        match client.extract_resume(&pdf()).await {
            Err(AppError::Backend { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Only PDF files are supported");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let mock =
            MockBackend::start(vec![Route::json("/interview-trainer", "<html>oops</html>")]).await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        let err = client.interview_questions("cv", "job").await.unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[tokio::test]
    async fn cover_letter_posts_resume_and_job() {
        let mock = MockBackend::start(vec![Route::json(
            "/generate-cover-letter",
            r#"{"letter": "Dear hiring manager,"}"#,
        )])
        .await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        let reply = client
            .generate_cover_letter("Jane Doe", "Rust engineer at Acme")
            .await
            .unwrap();
        assert_eq!(reply.into_text(), "Dear hiring manager,");

        let sent: serde_json::Value = serde_json::from_slice(&mock.requests()[0].body).unwrap();
        assert_eq!(sent["resume"], "Jane Doe");
        assert_eq!(sent["job"], "Rust engineer at Acme");
    }

    #[tokio::test]
    async fn cover_letter_error_reply_is_not_a_failure() {
        let mock = MockBackend::start(vec![Route::json(
            "/generate-cover-letter",
            r#"{"error": "Job description too short"}"#,
        )])
        .await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        let reply = client.generate_cover_letter("cv", "job").await.unwrap();
        assert_eq!(
            reply,
            LetterReply::Failed {
                error: "Job description too short".to_string()
            }
        );
    }

    #[tokio::test]
    async fn links_keep_extras() {
        let mock = MockBackend::start(vec![Route::json(
            "/generate-links",
            r#"{"job_title": "software engineer", "location": "remote",
                "search_links": [{"platform": "LinkedIn", "url": "https://www.linkedin.com/jobs/search/?keywords=software%20engineer"}]}"#,
        )])
        .await;
        let client = BackendClient::new(&mock.url(), None).unwrap();

        let search = client.job_links("cv").await.unwrap();
        assert_eq!(search.links.len(), 1);
        assert_eq!(search.links[0].platform, "LinkedIn");
        assert_eq!(search.location.as_deref(), Some("remote"));

        let sent: serde_json::Value = serde_json::from_slice(&mock.requests()[0].body).unwrap();
        assert_eq!(sent, serde_json::json!({ "resume": "cv" }));
    }

    #[tokio::test]
    async fn greeting_reads_message() {
        let mock = MockBackend::start(vec![Route::json("/", r#"{"message": "Welcome"}"#)]).await;
        let client = BackendClient::new(&mock.url(), None).unwrap();
        assert_eq!(client.greeting().await.unwrap(), "Welcome");
    }

    #[test]
    fn base_path_is_preserved_when_joining() {
        let client = BackendClient::new("http://coach.local:8000/api", None).unwrap();
        assert_eq!(
            client.endpoint("generate-links").unwrap().as_str(),
            "http://coach.local:8000/api/generate-links"
        );

        let client = BackendClient::new("http://localhost:8000", None).unwrap();
        assert_eq!(
            client.endpoint("extract-resume").unwrap().as_str(),
            "http://localhost:8000/extract-resume"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let mock = MockBackend::start(Vec::new()).await;
        let url = mock.url();
        drop(mock);
        // Nothing listens on the port any more.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let client = BackendClient::new(&url, Some(Duration::from_secs(2))).unwrap();
        let err = client.job_links("cv").await.unwrap_err();
        assert!(matches!(err, AppError::Http(_) | AppError::Backend { .. }));
    }
}
