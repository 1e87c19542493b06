//! Handlers for `/user/preferences`.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use vidgen_core::error::CoreError;
use vidgen_core::types::DbId;
use vidgen_db::models::user_preference::{UpdateUserPreference, UserPreference};
use vidgen_db::repositories::UserPreferenceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of `preferred_style`.
const MAX_STYLE_LEN: usize = 200;

/// Preferences as returned to the client; users without a row get defaults.
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub user_id: DbId,
    pub preferred_style: Option<String>,
    pub analysis_summary: Option<String>,
    pub total_videos: i32,
}

impl PreferencesResponse {
    fn empty(user_id: DbId) -> Self {
        Self {
            user_id,
            preferred_style: None,
            analysis_summary: None,
            total_videos: 0,
        }
    }
}

impl From<UserPreference> for PreferencesResponse {
    fn from(p: UserPreference) -> Self {
        Self {
            user_id: p.user_id,
            preferred_style: p.preferred_style,
            analysis_summary: p.analysis_summary,
            total_videos: p.total_videos,
        }
    }
}

/// GET /api/v1/user/preferences
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PreferencesResponse>>> {
    let data = UserPreferenceRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .map_or_else(|| PreferencesResponse::empty(auth.user_id), Into::into);
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/user/preferences
///
/// Omitted fields keep their stored value.
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<UpdateUserPreference>,
) -> AppResult<Json<DataResponse<PreferencesResponse>>> {
    if let Some(style) = input.preferred_style.as_mut() {
        *style = style.trim().to_string();
        if style.chars().count() > MAX_STYLE_LEN {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Preferred style must be at most {MAX_STYLE_LEN} characters"
            ))));
        }
    }

    let pref = UserPreferenceRepo::upsert(&state.pool, auth.user_id, &input).await?;
    tracing::info!(user_id = auth.user_id, "User preferences updated");

    Ok(Json(DataResponse { data: pref.into() }))
}
