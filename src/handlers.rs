use crate::dashboard::Dashboard;
use crate::errors::AppError;
use crate::models::{
    CampaignCreatedResponse, CampaignDeletedResponse, CampaignForm, CampaignRecord, ChartResponse,
    Message, SummaryResponse,
};
use crate::state::AppState;
use crate::stats::{build_chart, build_summary};
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use std::sync::Arc;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut dashboard = state.dashboard.lock().await;
    let timeout = dashboard.messages().timeout();
    let message = dashboard.messages_mut().take();
    Html(render_index(dashboard.records(), message.as_ref(), timeout))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<CampaignForm>,
) -> Result<Redirect, AppError> {
    let input = form.to_input();
    // Both outcomes leave a banner message for the redirected page.
    let _ = with_storage(&state, move |dashboard| dashboard.submit(&input)).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    with_storage(&state, move |dashboard| dashboard.delete(id)).await?;
    Ok(Redirect::to("/"))
}

pub async fn list_campaigns(State(state): State<AppState>) -> Json<Vec<CampaignRecord>> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.records().to_vec())
}

pub async fn create_campaign(
    State(state): State<AppState>,
    Json(form): Json<CampaignForm>,
) -> Result<(StatusCode, Json<CampaignCreatedResponse>), AppError> {
    let input = form.to_input();
    let submission = with_storage(&state, move |dashboard| dashboard.submit(&input)).await??;
    let response = CampaignCreatedResponse {
        persisted: submission.saved.is_ok(),
        campaign: submission.record,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CampaignDeletedResponse>, AppError> {
    let deletion = with_storage(&state, move |dashboard| dashboard.delete(id)).await?;
    let response = match deletion {
        Some(deletion) => CampaignDeletedResponse {
            deleted: true,
            persisted: deletion.saved.is_ok(),
        },
        None => CampaignDeletedResponse {
            deleted: false,
            persisted: true,
        },
    };
    Ok(Json(response))
}

pub async fn get_chart(State(state): State<AppState>) -> Json<ChartResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(build_chart(dashboard.records()))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(build_summary(dashboard.records()))
}

pub async fn get_message(State(state): State<AppState>) -> Json<Option<Message>> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.messages().current().cloned())
}

/// Run a mutation that writes to storage on the blocking pool. The lock is
/// held for the whole call so mutations stay strictly ordered.
async fn with_storage<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Dashboard) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut dashboard = Arc::clone(&state.dashboard).lock_owned().await;
    tokio::task::spawn_blocking(move || work(&mut dashboard))
        .await
        .map_err(AppError::internal)
}
