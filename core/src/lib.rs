//! Blocking client for the lessons API.
//!
//! # Overview
//! Lists lessons and creates a lesson, authorizing every call with a
//! `BootDev <token>` header. Each call is a single bounded request/response
//! round trip: no retries, no caching, no shared mutable state.
//!
//! # Design
//! - `auth::fetch` / `auth::fetch_with_payload` own header injection, the
//!   status policy (anything above 299 fails) and body collection.
//! - `LessonClient` builds requests against fixed paths and decodes bodies.
//! - `Transport` is the seam between the two; `UreqTransport` does real I/O
//!   with a 10 second timeout, tests substitute in-memory transports.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use auth::{fetch, fetch_with_payload, AUTH_SCHEME};
pub use client::LessonClient;
pub use error::{ApiError, ApiResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_TIMEOUT};
pub use types::{CreateLesson, Lesson};
