use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::common::messages::{DUPLICATE_VIDEO, INVALID_ENTRY, INVALID_URL};
use crate::api::common::{ApiResponse, FlashMessage};
use crate::errors::AppError;
use crate::videos::search::normalize_search_term;
use crate::videos::{list_summary, NewVideo, SubmissionError, VideoEntry, VideoForm};
use crate::InnerState;

pub const VIDEO_LIST_PATH: &str = "/video_list";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search_term: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListPage {
    pub videos: Vec<VideoEntry>,
    pub count: usize,
    pub summary: String,
    pub search_term: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailPage {
    pub video: VideoEntry,
    pub notes: String,
    pub summary: String,
}

pub async fn new_video_form() -> Json<ApiResponse<VideoForm>> {
    Json(ApiResponse::success(VideoForm::default()))
}

#[tracing::instrument(name = "Add video", skip(inner, form))]
pub async fn add_video(
    State(inner): State<InnerState>,
    form: Result<Form<VideoForm>, FormRejection>,
) -> Result<Response, AppError> {
    let InnerState { videos, .. } = inner;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!("Rejected unreadable submission: {}", rejection.body_text());
            return Ok(redisplay_form(
                StatusCode::BAD_REQUEST,
                VideoForm::default(),
                &[],
                None,
            ));
        }
    };
    tracing::debug!("Validating submission {:?}", form.name);

    let video = match NewVideo::validate(&form) {
        Ok(video) => video,
        Err(SubmissionError::Malformed(errors)) => {
            tracing::warn!("Rejected malformed submission: {:?}", errors);
            return Ok(redisplay_form(StatusCode::BAD_REQUEST, form, &[], Some(errors)));
        }
        Err(SubmissionError::InvalidUrl(err)) => {
            tracing::warn!("Rejected submission: {}", err);
            return Ok(redisplay_form(
                StatusCode::BAD_REQUEST,
                form,
                &[INVALID_URL],
                None,
            ));
        }
    };

    match videos.insert(&video).await {
        Ok(entry) => {
            tracing::info!("Added video {} ({})", entry.id, entry.video_id);
            Ok(Redirect::to(VIDEO_LIST_PATH).into_response())
        }
        Err(AppError::Conflict(_)) => Ok(redisplay_form(
            StatusCode::CONFLICT,
            form,
            &[DUPLICATE_VIDEO],
            None,
        )),
        Err(e) => Err(e),
    }
}

/// Sends the submitted values back with the specific messages followed by the
/// generic invalid-entry message.
fn redisplay_form(
    status: StatusCode,
    form: VideoForm,
    specific: &[&str],
    errors: Option<HashMap<String, Vec<String>>>,
) -> Response {
    let messages = specific
        .iter()
        .chain(std::iter::once(&INVALID_ENTRY))
        .map(|text| FlashMessage::warning(*text))
        .collect();

    let mut body = ApiResponse::rejected(form, messages);
    if let Some(errors) = errors {
        body = body.with_errors(errors);
    }
    (status, Json(body)).into_response()
}

#[tracing::instrument(name = "List videos", skip(inner, query))]
pub async fn video_list(
    State(inner): State<InnerState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<VideoListPage>>, AppError> {
    let InnerState { videos, .. } = inner;

    let params = query.map(|Query(params)| params).unwrap_or_else(|rejection| {
        tracing::debug!("Ignoring unreadable search: {}", rejection.body_text());
        SearchParams::default()
    });

    let search_term = normalize_search_term(params.search_term.as_deref());
    let videos = videos.search(search_term.as_deref()).await?;

    tracing::debug!("Listing {} videos", videos.len());

    Ok(Json(ApiResponse::success(VideoListPage {
        count: videos.len(),
        summary: list_summary(videos.len()),
        videos,
        search_term,
    })))
}

#[tracing::instrument(name = "Video detail", skip(inner))]
pub async fn video_detail(
    State(inner): State<InnerState>,
    Path(video_pk): Path<String>,
) -> Result<Json<ApiResponse<VideoDetailPage>>, AppError> {
    let InnerState { videos, .. } = inner;

    let not_found = || AppError::NotFound(format!("Video '{}' not found", video_pk));

    let id: i64 = video_pk.parse().map_err(|_| not_found())?;
    let video = videos.get(id).await?.ok_or_else(not_found)?;

    Ok(Json(ApiResponse::success(VideoDetailPage {
        notes: video.notes_display().to_string(),
        summary: video.to_string(),
        video,
    })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::api::create_api_router;
    use crate::config::DEFAULT_APP_NAME;
    use crate::db::memory_pool;
    use crate::videos::store::VideoStore;
    use crate::videos::{NewVideo, VideoForm, NO_NOTES_MESSAGE, NO_VIDEOS_MESSAGE};
    use crate::InnerState;

    const GENERIC: &str = "Invalid entry: Please double check information entered in the form.";

    async fn setup() -> (Router, VideoStore) {
        let videos = VideoStore::new(memory_pool().await);
        let state = InnerState {
            videos: videos.clone(),
            app_name: DEFAULT_APP_NAME.to_string(),
        };
        (create_api_router(state), videos)
    }

    async fn seed(videos: &VideoStore, name: &str, video_id: &str, notes: Option<&str>) {
        let video = NewVideo::validate(&VideoForm {
            name: name.to_string(),
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            notes: notes.map(str::to_string),
        })
        .unwrap();
        videos.insert(&video).await.unwrap();
    }

    async fn seed_four(videos: &VideoStore) {
        seed(videos, "abc", "Kn_lCyiGEbQ", Some("example")).await;
        seed(videos, "AAA", "xy4e-R8FiR4", Some("example")).await;
        seed(videos, "ZZZ", "NvUYUYNcaTE", Some("example")).await;
        seed(videos, "lmn", "od7F_hTlC1g", Some("example")).await;
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_form(app: Router, body: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/add")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn message_texts(body: &Value) -> Vec<String> {
        body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["text"].as_str().unwrap().to_string())
            .collect()
    }

    fn video_names(body: &Value) -> Vec<String> {
        body["data"]["videos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn home_page_shows_app_name() {
        let (app, _) = setup().await;
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["appName"], "Pet Grooming Videos");
    }

    #[tokio::test]
    async fn add_form_starts_empty() {
        let (app, _) = setup().await;
        let (status, body) = get(app, "/add").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "");
        assert_eq!(body["data"]["url"], "");
    }

    #[tokio::test]
    async fn add_video_stores_entry_and_redirects_to_list() {
        let (app, videos) = setup().await;
        let response = post_form(
            app.clone(),
            "name=Dog+changes+color&url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DKn_lCyiGEbQ&notes=this+dog+changes+color+after+a+haircut",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/video_list");

        assert_eq!(videos.count().await.unwrap(), 1);
        let stored = videos.all().await.unwrap().remove(0);
        assert_eq!(stored.name, "Dog changes color");
        assert_eq!(stored.url, "https://www.youtube.com/watch?v=Kn_lCyiGEbQ");
        assert_eq!(
            stored.notes.as_deref(),
            Some("this dog changes color after a haircut")
        );
        assert_eq!(stored.video_id, "Kn_lCyiGEbQ");

        let (_, body) = get(app, "/video_list").await;
        assert_eq!(video_names(&body), vec!["Dog changes color"]);
        assert_eq!(
            body["data"]["videos"][0]["url"],
            "https://www.youtube.com/watch?v=Kn_lCyiGEbQ"
        );
    }

    #[tokio::test]
    async fn invalid_urls_are_not_added() {
        let invalid_urls = [
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?",
            "https://www.youtube.com/watch?abcdef=Kn_lCyiGEbQ",
            "https://www.youtube.com/watch?v=",
            "https://minneapolis.edu",
            "https://minneapolis.edu?v=Kn_lCyiGEbQ",
        ];

        let (app, videos) = setup().await;
        for invalid_url in invalid_urls {
            let body = format!(
                "name=Name&url={}&notes=Example+notes",
                urlencoding::encode(invalid_url)
            );
            let response = post_form(app.clone(), &body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{invalid_url}");

            let body = json_body(response).await;
            assert_eq!(
                message_texts(&body),
                vec!["Invalid YouTube URL".to_string(), GENERIC.to_string()]
            );
            assert_eq!(body["success"], false);
            assert_eq!(body["data"]["url"], invalid_url);
            assert_eq!(body["data"]["name"], "Name");
            assert_eq!(body["data"]["notes"], "Example notes");
        }

        assert_eq!(videos.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_video_is_rejected() {
        let (app, videos) = setup().await;
        seed(&videos, "Original", "Kn_lCyiGEbQ", None).await;

        let response = post_form(
            app,
            "name=Copy&url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DKn_lCyiGEbQ",
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = json_body(response).await;
        assert_eq!(
            message_texts(&body),
            vec!["You already added that video.".to_string(), GENERIC.to_string()]
        );
        assert_eq!(body["data"]["name"], "Copy");
        assert_eq!(videos.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn malformed_form_gets_only_generic_message() {
        let (app, videos) = setup().await;
        let response = post_form(app, "name=&url=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(message_texts(&body), vec![GENERIC.to_string()]);
        assert!(body["errors"]["name"].is_array());
        assert!(body["errors"]["url"].is_array());
        assert_eq!(videos.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unreadable_form_body_gets_generic_message() {
        let (app, videos) = setup().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/add")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("name=Name"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(message_texts(&body), vec![GENERIC.to_string()]);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["name"], "");

        let response = post_form(app, "name=a&name=b&url=x").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(message_texts(&body), vec![GENERIC.to_string()]);

        assert_eq!(videos.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn all_videos_listed_in_case_insensitive_order() {
        let (app, videos) = setup().await;
        seed_four(&videos).await;

        let (status, body) = get(app, "/video_list").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(video_names(&body), vec!["AAA", "abc", "lmn", "ZZZ"]);
        assert_eq!(body["data"]["summary"], "4 videos:");
        assert_eq!(body["data"]["count"], 4);
    }

    #[tokio::test]
    async fn empty_catalog_reports_no_videos() {
        let (app, _) = setup().await;
        let (_, body) = get(app, "/video_list").await;
        assert_eq!(body["data"]["summary"], NO_VIDEOS_MESSAGE);
        assert_eq!(body["data"]["count"], 0);
        assert!(video_names(&body).is_empty());
    }

    #[tokio::test]
    async fn single_video_uses_singular_label() {
        let (app, videos) = setup().await;
        seed(&videos, "abc", "Kn_lCyiGEbQ", Some("example")).await;

        let (_, body) = get(app, "/video_list").await;
        assert_eq!(body["data"]["summary"], "1 video:");
        assert_eq!(video_names(&body).len(), 1);
    }

    #[tokio::test]
    async fn search_filters_and_orders_matches() {
        let (app, videos) = setup().await;
        seed(&videos, "Another zany video name", "Kn_lCyiGEbQ", None).await;
        seed(&videos, "another short video name", "xy4e-R8FiR4", None).await;
        seed(&videos, "youtube!!!!!", "od7F_hTlC1g", None).await;
        seed(&videos, "This one is different", "NvUYUYNcaTE", None).await;

        let (_, body) = get(app.clone(), "/video_list?search_term=another").await;
        assert_eq!(
            video_names(&body),
            vec!["another short video name", "Another zany video name"]
        );
        assert_eq!(body["data"]["searchTerm"], "another");

        let (_, body) = get(app.clone(), "/video_list?search_term=zzzzzzzzzzzzzzzzz").await;
        assert!(video_names(&body).is_empty());
        assert_eq!(body["data"]["summary"], NO_VIDEOS_MESSAGE);

        let (_, body) = get(app, "/video_list?search_term=").await;
        assert_eq!(video_names(&body).len(), 4);
        assert!(body["data"]["searchTerm"].is_null());
    }

    #[tokio::test]
    async fn repeated_search_term_lists_everything() {
        let (app, videos) = setup().await;
        seed_four(&videos).await;

        let (status, body) = get(app, "/video_list?search_term=a&search_term=b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(video_names(&body), vec!["AAA", "abc", "lmn", "ZZZ"]);
        assert!(body["data"]["searchTerm"].is_null());
    }

    #[tokio::test]
    async fn detail_shows_video_information() {
        let (app, videos) = setup().await;
        seed_four(&videos).await;

        let (status, body) = get(app, "/video_detail/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["video"]["id"], 1);
        assert_eq!(body["data"]["video"]["videoId"], "Kn_lCyiGEbQ");
        assert_eq!(body["data"]["notes"], "example");

        let summary = body["data"]["summary"].as_str().unwrap();
        for expected in [
            "ID: 1",
            "Name: abc",
            "URL: https://www.youtube.com/watch?v=Kn_lCyiGEbQ",
            "Video ID: Kn_lCyiGEbQ",
            "Notes: example",
        ] {
            assert!(summary.contains(expected), "{summary} missing {expected}");
        }
    }

    #[tokio::test]
    async fn detail_without_notes_says_so() {
        let (app, videos) = setup().await;
        seed(&videos, "abc", "Kn_lCyiGEbQ", Some("")).await;

        let (_, body) = get(app, "/video_detail/1").await;
        assert_eq!(body["data"]["notes"], NO_NOTES_MESSAGE);
        assert!(body["data"]["video"]["notes"].is_null());
    }

    #[tokio::test]
    async fn detail_for_unknown_video_is_not_found() {
        let (app, videos) = setup().await;
        seed_four(&videos).await;

        let (status, _) = get(app.clone(), "/video_detail/12").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(app, "/video_detail/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let (app, _) = setup().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
