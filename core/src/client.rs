//! Typed client for the lessons endpoints.
//!
//! # Design
//! `LessonClient` holds only a `base_url` and a transport and carries no
//! mutable state between calls, so a shared `&LessonClient` can be used from
//! several threads when the transport allows it. Each operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that decodes the body. `fetch_lessons` and `create_lesson` glue those to
//! the authorized fetch helpers; errors pass through untouched.

use url::Url;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, Transport, UreqTransport};
use crate::types::{CreateLesson, Lesson};

const LESSONS_PATH: &str = "/api/lessons";

/// Blocking client for the lessons API.
#[derive(Debug, Clone)]
pub struct LessonClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl LessonClient<UreqTransport> {
    /// A client using the default `ureq` transport and its 10 second timeout.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> LessonClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list_lessons(&self) -> ApiResult<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Get, self.lessons_url()?))
    }

    pub fn build_create_lesson(&self) -> ApiResult<HttpRequest> {
        Ok(HttpRequest::new(HttpMethod::Post, self.lessons_url()?))
    }

    /// Decode a JSON array of lessons. `[]` yields an empty `Vec`.
    pub fn parse_lessons(&self, body: &[u8]) -> ApiResult<Vec<Lesson>> {
        serde_json::from_slice(body).map_err(ApiError::Decode)
    }

    pub fn parse_lesson(&self, body: &[u8]) -> ApiResult<Lesson> {
        serde_json::from_slice(body).map_err(ApiError::Decode)
    }

    /// `GET {base_url}/api/lessons`.
    pub fn fetch_lessons(&self, token: &str) -> ApiResult<Vec<Lesson>> {
        let request = self.build_list_lessons()?;
        let body = auth::fetch(&self.transport, request, token)?;
        self.parse_lessons(&body)
    }

    /// `POST {base_url}/api/lessons` with `{"path", "title"}`.
    ///
    /// Neither argument is validated here; the server decides.
    pub fn create_lesson(&self, token: &str, path: &str, title: &str) -> ApiResult<Lesson> {
        let request = self.build_create_lesson()?;
        let payload = CreateLesson {
            path: path.to_string(),
            title: title.to_string(),
        };
        let body = auth::fetch_with_payload(&self.transport, request, token, &payload)?;
        self.parse_lesson(&body)
    }

    fn lessons_url(&self) -> ApiResult<String> {
        let raw = format!("{}{LESSONS_PATH}", self.base_url);
        let url = Url::parse(&raw).map_err(|e| ApiError::RequestBuild(format!("{raw}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url.into()),
            other => Err(ApiError::RequestBuild(format!(
                "{raw}: unsupported scheme {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::http::HttpResponse;

    const BASE_URL: &str = "http://localhost:3000";

    const LESSON: &str = r#"{"id":"1","userId":"u1","courseId":"c1","path":"intro-go","title":"Intro to Go","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#;

    /// Replays queued responses and records what was sent.
    #[derive(Default)]
    struct Script {
        responses: RefCell<VecDeque<(u16, Vec<u8>)>>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Script {
        fn reply(status: u16, body: &str) -> Self {
            let script = Self::default();
            script
                .responses
                .borrow_mut()
                .push_back((status, body.as_bytes().to_vec()));
            script
        }
    }

    impl Transport for Script {
        fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
            self.sent.borrow_mut().push(request);
            let (status, body) = self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("unexpected request");
            Ok(HttpResponse::from_bytes(status, body))
        }
    }

    fn client(script: Script) -> LessonClient<Script> {
        LessonClient::with_transport(BASE_URL, script)
    }

    #[test]
    fn build_list_lessons_produces_correct_request() {
        let req = client(Script::default()).build_list_lessons().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/lessons");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_lesson_produces_correct_request() {
        let req = client(Script::default()).build_create_lesson().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/lessons");
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = LessonClient::with_transport("http://localhost:3000/", Script::default());
        assert_eq!(client.base_url(), "http://localhost:3000");
        let req = client.build_list_lessons().unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/lessons");
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let client = LessonClient::with_transport("https://api.example.com/v1", Script::default());
        let req = client.build_list_lessons().unwrap();
        assert_eq!(req.url, "https://api.example.com/v1/api/lessons");
    }

    #[test]
    fn malformed_base_url_is_request_build_error() {
        for base in ["", "not a url", "ftp://files.example.com", "http://[::1"] {
            let client = LessonClient::with_transport(base, Script::default());
            let err = client.fetch_lessons("t").unwrap_err();
            assert!(matches!(err, ApiError::RequestBuild(_)), "{base:?}: {err:?}");
            let err = client.create_lesson("t", "p", "t").unwrap_err();
            assert!(matches!(err, ApiError::RequestBuild(_)), "{base:?}: {err:?}");
            assert!(client.transport().sent.borrow().is_empty());
        }
    }

    #[test]
    fn fetch_lessons_empty_array() {
        let client = client(Script::reply(200, "[]"));
        let lessons = client.fetch_lessons("token123").unwrap();
        assert!(lessons.is_empty());

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].header("Authorization"), Some("BootDev token123"));
        assert_eq!(sent[0].method, HttpMethod::Get);
    }

    #[test]
    fn fetch_lessons_maps_every_field() {
        let body = format!(
            "[{LESSON},{}]",
            LESSON
                .replace(r#""id":"1""#, r#""id":"2""#)
                .replace("intro-go", "loops")
        );
        let lessons = client(Script::reply(200, &body)).fetch_lessons("t").unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id(), "1");
        assert_eq!(lessons[0].user_id(), "u1");
        assert_eq!(lessons[0].course_id(), "c1");
        assert_eq!(lessons[0].path(), "intro-go");
        assert_eq!(lessons[0].title(), "Intro to Go");
        assert_eq!(
            lessons[0].created_at(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(lessons[1].id(), "2");
        assert_eq!(lessons[1].path(), "loops");
    }

    #[test]
    fn fetch_lessons_truncated_json_is_decode_error() {
        let body = &LESSON[..LESSON.len() / 2];
        let err = client(Script::reply(200, &format!("[{body}")))
            .fetch_lessons("t")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn fetch_lessons_rejects_single_object_and_null() {
        let err = client(Script::reply(200, LESSON)).fetch_lessons("t").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = client(Script::reply(200, "null")).fetch_lessons("t").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn fetch_lessons_status_error_passes_through() {
        let err = client(Script::reply(401, "unauthorized"))
            .fetch_lessons("t")
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 401 }));
    }

    #[test]
    fn create_lesson_sends_payload_and_decodes_response() {
        let client = client(Script::reply(201, LESSON));
        let lesson = client
            .create_lesson("token123", "intro-go", "Intro to Go")
            .unwrap();

        let sent = client.transport().sent.borrow();
        let req = &sent[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/lessons");
        assert_eq!(req.header("Authorization"), Some("BootDev token123"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Accept"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"path": "intro-go", "title": "Intro to Go"})
        );

        let expected: Lesson = serde_json::from_str(LESSON).unwrap();
        assert_eq!(lesson, expected);
        assert_eq!(lesson.updated_at(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn create_lesson_allows_empty_title() {
        let client = client(Script::reply(200, LESSON));
        client.create_lesson("t", "intro-go", "").unwrap();
        let sent = client.transport().sent.borrow();
        let body: serde_json::Value = serde_json::from_slice(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "");
    }

    #[test]
    fn create_lesson_malformed_response_is_decode_error() {
        let err = client(Script::reply(201, r#"{"id":"1"}"#))
            .create_lesson("t", "p", "t")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = client(Script::reply(201, "[]"))
            .create_lesson("t", "p", "t")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn create_lesson_status_error_passes_through() {
        let err = client(Script::reply(500, "boom"))
            .create_lesson("t", "p", "t")
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
