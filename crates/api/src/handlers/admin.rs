//! Admin-only diagnostics.

use axum::extract::State;
use axum::Json;
use vidgen_veo::GeneratorInfo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/generator
///
/// Generator endpoint, model and timeouts. The API key is only ever shown
/// masked.
pub async fn get_generator_info(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<GeneratorInfo>>> {
    Ok(Json(DataResponse {
        data: GeneratorInfo::clone(&state.generator_info),
    }))
}
