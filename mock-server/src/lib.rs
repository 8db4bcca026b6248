use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const AUTH_SCHEME: &str = "BootDev";
pub const COURSE_ID: &str = "course-1";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub path: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateLesson {
    pub path: String,
    pub title: String,
}

pub type Db = Arc<RwLock<Vec<Lesson>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/lessons", get(list_lessons).post(create_lesson))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Extract the token from `Authorization: BootDev <token>`.
fn authorize(headers: &HeaderMap) -> Result<String, StatusCode> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme == AUTH_SCHEME && !token.trim().is_empty() => {
            Ok(token.to_string())
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn list_lessons(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Lesson>>, StatusCode> {
    authorize(&headers)?;
    let lessons = db.read().await;
    info!(count = lessons.len(), "listing lessons");
    Ok(Json(lessons.clone()))
}

async fn create_lesson(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateLesson>,
) -> Result<(StatusCode, Json<Lesson>), StatusCode> {
    let token = authorize(&headers)?;
    if input.path.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let now = Utc::now().trunc_subsecs(0);
    let lesson = Lesson {
        id: Uuid::new_v4().to_string(),
        user_id: format!("user-{token}"),
        course_id: COURSE_ID.to_string(),
        path: input.path,
        title: input.title,
        created_at: now,
        updated_at: now,
    };
    info!(id = %lesson.id, path = %lesson.path, "created lesson");
    db.write().await.push(lesson.clone());
    Ok((StatusCode::CREATED, Json(lesson)))
}
