use axum::routing::get;
use axum::Router;

use crate::api::v1::home::home;
use crate::api::v1::videos::{add_video, new_video_form, video_detail, video_list, VIDEO_LIST_PATH};
use crate::InnerState;

#[tracing::instrument(name = "create_v1_routes", skip(state))]
pub fn create_v1_routes(state: InnerState) -> Router {
    tracing::info!("Setting up catalog routes");

    Router::new()
        .route("/", get(home))
        .route("/add", get(new_video_form).post(add_video))
        .route(VIDEO_LIST_PATH, get(video_list))
        .route("/video_detail/:video_pk", get(video_detail))
        .with_state(state)
}
