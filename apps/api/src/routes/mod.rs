pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Vocabulary
        .route("/api/v1/skills", get(handlers::handle_list_skills))
        .route(
            "/api/v1/skills/extract",
            post(handlers::handle_extract_skills),
        )
        // Screening
        .route(
            "/api/v1/candidates/parse",
            post(handlers::handle_parse_candidate),
        )
        .route("/api/v1/screenings", post(handlers::handle_screen))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use docx_rs::{Docx, Paragraph, Run};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::parsing::name::{EntityLabel, EntityRecognizer, EntitySpan};
    use crate::parsing::skills::SkillVocabulary;

    const BOUNDARY: &str = "resume-ranker-test-boundary";

    /// Labels the first two words of the text as a PERSON.
    struct LeadingWordsRecognizer;

    #[async_trait]
    impl EntityRecognizer for LeadingWordsRecognizer {
        async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, AppError> {
            let words: Vec<&str> = text
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .take(2)
                .collect();
            Ok(vec![EntitySpan {
                text: words.join(" "),
                label: EntityLabel::Person,
            }])
        }

        fn name(&self) -> &str {
            "leading-words"
        }
    }

    fn test_state(max_upload_bytes: usize) -> AppState {
        AppState {
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                skill_vocabulary_path: None,
                ner_max_input_chars: 12_000,
                max_upload_bytes,
                port: 0,
                rust_log: "debug".to_string(),
            },
            vocabulary: Arc::new(SkillVocabulary::default_skills().unwrap()),
            recognizer: Arc::new(LeadingWordsRecognizer),
        }
    }

    fn app() -> Router {
        build_router(test_state(1024 * 1024))
    }

    fn docx_bytes(text: &str) -> Vec<u8> {
        let docx = Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)));
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, content) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&content);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, parts: Vec<Part<'_>>) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_recognizer() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["recognizer"], json!("leading-words"));
        assert_eq!(body["vocabulary_size"], json!(38));
    }

    #[tokio::test]
    async fn test_list_skills_in_configured_order() {
        let response = app()
            .oneshot(Request::get("/api/v1/skills").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["skills"][0], json!("python"));
        assert_eq!(body["skills"][1], json!("java"));
    }

    #[tokio::test]
    async fn test_extract_skills_endpoint() {
        let request = Request::post("/api/v1/skills/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"text": "Senior engineer: Python, Docker, Kubernetes"}).to_string(),
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["skills"], json!(["docker", "kubernetes", "python"]));
    }

    #[tokio::test]
    async fn test_extract_skills_rejects_blank_text() {
        let request = Request::post("/api/v1/skills/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"text": "  "}).to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_screening_ranks_candidates() {
        let request = multipart_request(
            "/api/v1/screenings",
            vec![
                Part::Text("job_description", "We need Python, SQL and Docker"),
                Part::File("resumes", "bob.docx", docx_bytes("Bob Stone. Python only.")),
                Part::File("resumes", "notes.txt", b"Python SQL Docker".to_vec()),
                Part::File(
                    "resumes",
                    "ann.docx",
                    docx_bytes("Ann Lee ann@example.com 555-123-4567 Python SQL Docker"),
                ),
            ],
        );

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        assert_eq!(body["job_skills"], json!(["docker", "python", "sql"]));
        let candidates = body["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 3);

        assert_eq!(candidates[0]["rank"], json!(1));
        assert_eq!(candidates[0]["filename"], json!("ann.docx"));
        assert_eq!(candidates[0]["name"], json!("Ann Lee"));
        assert_eq!(candidates[0]["email"], json!("ann@example.com"));
        assert_eq!(candidates[0]["phone"], json!("555-123-4567"));
        assert_eq!(candidates[0]["score"], json!(3));

        assert_eq!(candidates[1]["filename"], json!("bob.docx"));
        assert_eq!(candidates[1]["score"], json!(1));

        assert_eq!(candidates[2]["filename"], json!("notes.txt"));
        assert_eq!(candidates[2]["status"], json!("extraction_failed"));
        assert_eq!(candidates[2]["score"], json!(0));
    }

    #[tokio::test]
    async fn test_screening_without_job_description_is_rejected() {
        let request = multipart_request(
            "/api/v1/screenings",
            vec![Part::File("resumes", "ann.docx", docx_bytes("Ann Lee"))],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resume_field_must_be_a_file() {
        let request = multipart_request(
            "/api/v1/screenings",
            vec![
                Part::Text("job_description", "python"),
                Part::Text("resumes", "not a file"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_single_candidate() {
        let request = multipart_request(
            "/api/v1/candidates/parse",
            vec![Part::File(
                "resume",
                "ann.docx",
                docx_bytes("Ann Lee, React and Node.js developer"),
            )],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], json!("Ann Lee"));
        assert_eq!(body["skills"], json!(["node.js", "react"]));
        assert_eq!(body["score"], json!(0));
    }

    #[tokio::test]
    async fn test_parse_requires_exactly_one_file() {
        let request = multipart_request(
            "/api/v1/candidates/parse",
            vec![
                Part::File("resume", "a.docx", docx_bytes("A")),
                Part::File("resume", "b.docx", docx_bytes("B")),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let request = multipart_request(
            "/api/v1/screenings",
            vec![
                Part::Text("job_description", "python"),
                Part::File("resumes", "big.docx", vec![b'x'; 4096]),
            ],
        );
        let response = build_router(test_state(512)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
