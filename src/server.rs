use crate::{
    error::AppError,
    features::PredictionForm,
    prediction::{evaluate, PredictionOutcome},
    region::INDIA,
    resources::AppContext,
    session::{Action, Page, SessionState},
    types::{NavigateBody, SessionResponse, ViewResponse},
    views::render,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

// ---------- Server state ----------

pub type AppState = Arc<AppContext>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/navigate", post(navigate))
        .route("/sessions/:id/show-map", post(show_map))
        .route("/sessions/:id/view", get(view))
        .route("/sessions/:id/form", post(evaluate_form))
        .route("/sessions/:id/predict", post(predict))
        .with_state(state)
}

fn session(state: &AppContext, id: &str) -> Result<SessionState, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}

fn apply(state: &AppContext, id: String, action: Action) -> Result<Json<SessionResponse>, AppError> {
    let new_state = state
        .sessions
        .apply(&id, action)
        .ok_or_else(|| AppError::SessionNotFound(id.clone()))?;
    tracing::debug!("session {} {:?} -> {:?}", id, action, new_state);
    Ok(Json(SessionResponse { id, state: new_state }))
}

// ---------- Handlers ----------

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let (id, session_state) = state.sessions.create();
    tracing::info!("session {} created ({} active)", id, state.sessions.len());
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            id,
            state: session_state,
        }),
    )
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_state = session(&state, &id)?;
    Ok(Json(SessionResponse {
        id,
        state: session_state,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| AppError::SessionNotFound(id.clone()))?;
    tracing::info!("session {} ended", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NavigateBody>,
) -> Result<Json<SessionResponse>, AppError> {
    apply(&state, id, Action::Navigate { page: body.page })
}

pub async fn show_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    apply(&state, id, Action::ShowMap)
}

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewResponse>, AppError> {
    let session_state = session(&state, &id)?;
    let view = render(&session_state, &state).await?;
    Ok(Json(ViewResponse {
        id,
        state: session_state,
        view,
    }))
}

async fn run_form(
    state: &AppContext,
    id: &str,
    form: &PredictionForm,
    predict: bool,
) -> Result<PredictionOutcome, AppError> {
    let session_state = session(state, id)?;
    if session_state.page != Page::PredictionModel {
        return Err(AppError::WrongPage(session_state.page.as_str()));
    }
    let model = state.model().await?;
    Ok(evaluate(form, &model, &INDIA, session_state.show_map, predict)?)
}

pub async fn evaluate_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PredictionForm>,
) -> Result<Json<PredictionOutcome>, AppError> {
    run_form(&state, &id, &form, false).await.map(Json)
}

pub async fn predict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PredictionForm>,
) -> Result<Json<PredictionOutcome>, AppError> {
    run_form(&state, &id, &form, true).await.map(Json)
}
