use sqlx::SqlitePool;

use super::search::list_videos;
use super::{NewVideo, VideoEntry};
use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct VideoStore {
    db: SqlitePool,
}

impl VideoStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts a validated video. A repeated `video_id` fails with
    /// `AppError::Conflict` and leaves the table untouched.
    #[tracing::instrument(name = "Insert video", skip(self, video), fields(video_id = %video.video_id()))]
    pub async fn insert(&self, video: &NewVideo) -> Result<VideoEntry, AppError> {
        let entry = sqlx::query_as::<_, VideoEntry>(
            r#"INSERT INTO videos (name, url, notes, video_id)
               VALUES (?, ?, ?, ?)
               RETURNING id, name, url, notes, video_id"#,
        )
        .bind(video.name())
        .bind(video.url())
        .bind(video.notes())
        .bind(video.video_id())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            match &err {
                AppError::Conflict(_) => {
                    tracing::warn!("Video {} already in catalog", video.video_id())
                }
                _ => tracing::error!("Failed to insert video: {:?}", err),
            }
            err
        })?;

        tracing::info!("Stored video {} as id {}", entry.video_id, entry.id);
        Ok(entry)
    }

    pub async fn all(&self) -> Result<Vec<VideoEntry>, AppError> {
        let videos = sqlx::query_as::<_, VideoEntry>(
            r#"SELECT id, name, url, notes, video_id FROM videos ORDER BY id"#,
        )
        .fetch_all(&self.db)
        .await?;

        tracing::debug!("Fetched {} videos", videos.len());
        Ok(videos)
    }

    pub async fn search(&self, search_term: Option<&str>) -> Result<Vec<VideoEntry>, AppError> {
        Ok(list_videos(self.all().await?, search_term))
    }

    pub async fn get(&self, id: i64) -> Result<Option<VideoEntry>, AppError> {
        let video = sqlx::query_as::<_, VideoEntry>(
            r#"SELECT id, name, url, notes, video_id FROM videos WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(video)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
