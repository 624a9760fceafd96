use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::common::ApiResponse;
use crate::InnerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub app_name: String,
}

pub async fn home(State(inner): State<InnerState>) -> Json<ApiResponse<HomePage>> {
    Json(ApiResponse::success(HomePage {
        app_name: inner.app_name.clone(),
    }))
}
