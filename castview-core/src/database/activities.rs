use async_trait::async_trait;
use castview_model::{
    ActivityKind, ActivityLink, CourseId, InstanceId, ModuleId, VideoId,
};
use sqlx::PgPool;
use url::Url;

use crate::error::Result;
use crate::links::activity_view_url;
use crate::ports::{
    ActivityLinkStore, ActivityResolver, ActivityTarget, SeriesMappingStore,
};

/// Reads the LMS activity tables: embedded episodes, their course modules,
/// and series shortcuts.
#[derive(Debug, Clone)]
pub struct PostgresActivityStore {
    pool: PgPool,
    lms_base_url: Url,
}

impl PostgresActivityStore {
    pub fn new(pool: PgPool, lms_base_url: Url) -> Self {
        Self { pool, lms_base_url }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleRow {
    module_id: i64,
    course_name: String,
}

#[async_trait]
impl ActivityLinkStore for PostgresActivityStore {
    async fn links_for(
        &self,
        video: &VideoId,
        instance: InstanceId,
    ) -> Result<Vec<ActivityLink>> {
        let courses = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT course_id
            FROM opencast_activities
            WHERE instance_id = $1
              AND opencast_id = $2
              AND kind = $3
            ORDER BY id
            "#,
        )
        .bind(instance.as_i64())
        .bind(video.as_str())
        .bind(ActivityKind::Episode.as_str())
        .fetch_all(self.pool())
        .await?;

        Ok(courses
            .into_iter()
            .map(|course| ActivityLink {
                course_id: CourseId(course),
                video_id: video.clone(),
                instance_id: instance,
            })
            .collect())
    }
}

#[async_trait]
impl ActivityResolver for PostgresActivityStore {
    async fn resolve(&self, link: &ActivityLink) -> Result<Option<ActivityTarget>> {
        let row = sqlx::query_as::<_, ModuleRow>(
            r#"
            SELECT cm.id AS module_id, c.fullname AS course_name
            FROM opencast_activities a
            JOIN course_modules cm ON cm.activity_id = a.id
            JOIN courses c ON c.id = a.course_id
            WHERE a.course_id = $1
              AND a.opencast_id = $2
              AND a.instance_id = $3
              AND a.kind = $4
            ORDER BY cm.id
            LIMIT 1
            "#,
        )
        .bind(link.course_id.as_i64())
        .bind(link.video_id.as_str())
        .bind(link.instance_id.as_i64())
        .bind(ActivityKind::Episode.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| {
            let module_id = ModuleId(row.module_id);
            ActivityTarget {
                module_id,
                course_name: row.course_name,
                display_url: activity_view_url(&self.lms_base_url, module_id),
            }
        }))
    }
}

#[async_trait]
impl SeriesMappingStore for PostgresActivityStore {
    async fn has_mapping(
        &self,
        instance: InstanceId,
        series: &str,
        course: CourseId,
    ) -> Result<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM series_mappings
                WHERE instance_id = $1
                  AND series = $2
                  AND course_id = $3
            )
            "#,
        )
        .bind(instance.as_i64())
        .bind(series)
        .bind(course.as_i64())
        .fetch_one(self.pool())
        .await?;

        Ok(found)
    }
}
