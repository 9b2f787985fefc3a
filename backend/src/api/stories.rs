//! Story API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::models::{Story, SubmitStoryRequest, SubmitStoryResponse};
use crate::AppState;

/// GET /api/stories - List all stories, newest first.
pub async fn list_stories(State(state): State<AppState>) -> ApiResult<Vec<Story>> {
    Ok(Json(state.stories.list_stories().await?))
}

/// GET /api/stories/:id - Get a single story.
pub async fn get_story(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Story> {
    Ok(Json(state.stories.get_story(id).await?))
}

/// POST /api/submit-story - Submit a new story.
pub async fn submit_story(
    State(state): State<AppState>,
    Json(request): Json<SubmitStoryRequest>,
) -> ApiResult<SubmitStoryResponse> {
    let story = state.stories.submit_story(&request).await?;

    Ok(Json(SubmitStoryResponse {
        success: true,
        message: "Story submitted!".to_string(),
        story,
    }))
}
