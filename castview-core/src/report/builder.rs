use std::{fmt, sync::Arc};

use castview_model::{
    ActivityLink, InstanceId, ReportRow, ResolvedActivity, SeriesId, Video,
};
use tracing::{debug, warn};

use crate::ports::{ActivityLinkStore, ActivityResolver, SeriesMappingStore};

/// Joins the videos of a series with the course activities embedding them.
///
/// Every video yields exactly one row, in input order. Each link that still
/// resolves lands in one of the two buckets of its row depending on whether
/// the video's series has a shortcut into the link's course. Lookups run one
/// after another; nothing here fails the report.
#[derive(Clone)]
pub struct ReportBuilder {
    instance: InstanceId,
    /// `None` when the activity plugin is not installed.
    links: Option<Arc<dyn ActivityLinkStore>>,
    resolver: Arc<dyn ActivityResolver>,
    mappings: Arc<dyn SeriesMappingStore>,
}

impl fmt::Debug for ReportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("instance", &self.instance)
            .field("activities_enabled", &self.links.is_some())
            .finish_non_exhaustive()
    }
}

impl ReportBuilder {
    pub fn new(
        instance: InstanceId,
        links: Option<Arc<dyn ActivityLinkStore>>,
        resolver: Arc<dyn ActivityResolver>,
        mappings: Arc<dyn SeriesMappingStore>,
    ) -> Self {
        Self {
            instance,
            links,
            resolver,
            mappings,
        }
    }

    pub async fn build(&self, series: &SeriesId, videos: &[Video]) -> Vec<ReportRow> {
        let mut rows = Vec::with_capacity(videos.len());
        for video in videos {
            rows.push(self.build_row(video).await);
        }

        debug!(
            instance = %self.instance,
            series = %series,
            videos = videos.len(),
            activities = rows.iter().map(ReportRow::activity_count).sum::<usize>(),
            "series report assembled"
        );
        rows
    }

    async fn build_row(&self, video: &Video) -> ReportRow {
        let mut row = ReportRow::new(video.title.clone());

        for link in self.activity_links(video).await {
            if let Some(activity) = self.resolve_link(video, &link).await {
                row.push(activity);
            }
        }

        row
    }

    async fn activity_links(&self, video: &Video) -> Vec<ActivityLink> {
        let Some(store) = &self.links else {
            return Vec::new();
        };

        match store.links_for(&video.identifier, self.instance).await {
            Ok(links) => links,
            Err(err) => {
                warn!(
                    instance = %self.instance,
                    video = %video.identifier,
                    error = %err,
                    "activity link lookup failed; showing video without activities"
                );
                Vec::new()
            }
        }
    }

    async fn resolve_link(
        &self,
        video: &Video,
        link: &ActivityLink,
    ) -> Option<ResolvedActivity> {
        let target = match self.resolver.resolve(link).await {
            Ok(Some(target)) => target,
            Ok(None) => {
                debug!(
                    video = %video.identifier,
                    course = %link.course_id,
                    "activity no longer exists; skipping link"
                );
                return None;
            }
            Err(err) => {
                warn!(
                    video = %video.identifier,
                    course = %link.course_id,
                    error = %err,
                    "activity resolution failed; skipping link"
                );
                return None;
            }
        };

        let has_block_shortcut = match self
            .mappings
            .has_mapping(self.instance, &video.series_identifier, link.course_id)
            .await
        {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    series = %video.series_identifier,
                    course = %link.course_id,
                    error = %err,
                    "series mapping lookup failed; listing activity as unlinked"
                );
                false
            }
        };

        Some(ResolvedActivity {
            display_url: target.display_url,
            course_name: target.course_name,
            has_block_shortcut,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::ports::{
        ActivityTarget, MockActivityLinkStore, MockActivityResolver,
        MockSeriesMappingStore,
    };
    use castview_model::{CourseId, ModuleId, VideoId};

    const INSTANCE: InstanceId = InstanceId(1);
    const SERIES: &str = "series-1";

    fn video(id: &str, title: &str) -> Video {
        Video::new(VideoId::new(id).unwrap(), title, SERIES)
    }

    fn link(video: &str, course: i64) -> ActivityLink {
        ActivityLink {
            course_id: CourseId(course),
            video_id: VideoId::new(video).unwrap(),
            instance_id: INSTANCE,
        }
    }

    fn target(course: i64) -> ActivityTarget {
        ActivityTarget {
            module_id: ModuleId(course * 10),
            course_name: format!("Course {course}"),
            display_url: format!("https://lms.example/mod/opencast/view.php?id={}", course * 10),
        }
    }

    fn names(activities: &[ResolvedActivity]) -> Vec<&str> {
        activities.iter().map(|a| a.course_name.as_str()).collect()
    }

    /// Links: v1 → courses 1 (mapped) and 2 (unmapped); v2 → none;
    /// v3 → course 3 (deleted) and course 4 (mapped).
    fn fixture_links() -> MockActivityLinkStore {
        let mut links = MockActivityLinkStore::new();
        links.expect_links_for().returning(|video, instance| {
            assert_eq!(instance, INSTANCE);
            Ok(match video.as_str() {
                "v1" => vec![link("v1", 1), link("v1", 2)],
                "v3" => vec![link("v3", 3), link("v3", 4)],
                _ => Vec::new(),
            })
        });
        links
    }

    fn fixture_resolver() -> MockActivityResolver {
        let mut resolver = MockActivityResolver::new();
        resolver.expect_resolve().returning(|link| {
            Ok(match link.course_id.as_i64() {
                3 => None,
                course => Some(target(course)),
            })
        });
        resolver
    }

    fn fixture_mappings() -> MockSeriesMappingStore {
        let mut mappings = MockSeriesMappingStore::new();
        mappings.expect_has_mapping().returning(|instance, series, course| {
            assert_eq!(instance, INSTANCE);
            assert_eq!(series, SERIES);
            Ok(matches!(course.as_i64(), 1 | 4))
        });
        mappings
    }

    fn builder(
        links: Option<MockActivityLinkStore>,
        resolver: MockActivityResolver,
        mappings: MockSeriesMappingStore,
    ) -> ReportBuilder {
        ReportBuilder::new(
            INSTANCE,
            links.map(|store| Arc::new(store) as Arc<dyn ActivityLinkStore>),
            Arc::new(resolver),
            Arc::new(mappings),
        )
    }

    fn series() -> SeriesId {
        SeriesId::parse(SERIES).unwrap()
    }

    #[tokio::test]
    async fn rows_follow_input_order_and_partition_links() {
        let builder =
            builder(Some(fixture_links()), fixture_resolver(), fixture_mappings());
        let videos = vec![video("v1", "First"), video("v2", "Second"), video("v3", "Third")];

        let rows = builder.build(&series(), &videos).await;

        let titles: Vec<_> = rows.iter().map(|r| r.video_title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Third"]);

        assert_eq!(names(&rows[0].linked_activities), ["Course 1"]);
        assert_eq!(names(&rows[0].unlinked_activities), ["Course 2"]);
        assert!(rows[0].linked_activities[0].has_block_shortcut);
        assert!(!rows[0].unlinked_activities[0].has_block_shortcut);

        assert!(rows[1].linked_activities.is_empty());
        assert!(rows[1].unlinked_activities.is_empty());

        // Course 3 was deleted: skipped without disturbing course 4.
        assert_eq!(names(&rows[2].linked_activities), ["Course 4"]);
        assert!(rows[2].unlinked_activities.is_empty());
    }

    #[tokio::test]
    async fn missing_activity_plugin_yields_empty_rows() {
        let mut resolver = MockActivityResolver::new();
        resolver.expect_resolve().never();
        let mut mappings = MockSeriesMappingStore::new();
        mappings.expect_has_mapping().never();

        let builder = builder(None, resolver, mappings);
        let videos = vec![video("v1", "First"), video("v3", "Third")];

        let rows = builder.build(&series(), &videos).await;

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.activity_count() == 0));
    }

    #[tokio::test]
    async fn empty_series_yields_no_rows() {
        let builder =
            builder(Some(fixture_links()), fixture_resolver(), fixture_mappings());
        assert!(builder.build(&series(), &[]).await.is_empty());
    }

    #[tokio::test]
    async fn bucket_order_matches_encounter_order() {
        let mut links = MockActivityLinkStore::new();
        links.expect_links_for().returning(|_, _| {
            Ok((1..=6).map(|course| link("v1", course)).collect())
        });
        let mut mappings = MockSeriesMappingStore::new();
        mappings
            .expect_has_mapping()
            .returning(|_, _, course| Ok(course.as_i64() % 2 == 0));

        let builder = builder(Some(links), fixture_resolver(), mappings);
        let rows = builder.build(&series(), &[video("v1", "Only")]).await;

        // Course 3 is deleted in the resolver fixture.
        assert_eq!(
            names(&rows[0].linked_activities),
            ["Course 2", "Course 4", "Course 6"]
        );
        assert_eq!(names(&rows[0].unlinked_activities), ["Course 1", "Course 5"]);
    }

    #[tokio::test]
    async fn storage_failures_degrade_instead_of_aborting() {
        let mut links = MockActivityLinkStore::new();
        links.expect_links_for().returning(|video, _| match video.as_str() {
            "broken" => Err(CoreError::Internal("connection reset".into())),
            _ => Ok(vec![link("v1", 1), link("v1", 2), link("v1", 5)]),
        });
        let mut resolver = MockActivityResolver::new();
        resolver.expect_resolve().returning(|link| match link.course_id.as_i64() {
            2 => Err(CoreError::Internal("timeout".into())),
            course => Ok(Some(target(course))),
        });
        let mut mappings = MockSeriesMappingStore::new();
        mappings.expect_has_mapping().returning(|_, _, course| match course.as_i64() {
            5 => Err(CoreError::Internal("timeout".into())),
            _ => Ok(true),
        });

        let builder = builder(Some(links), resolver, mappings);
        let videos = vec![video("broken", "Broken"), video("v1", "Fine")];
        let rows = builder.build(&series(), &videos).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].video_title, "Broken");
        assert_eq!(rows[0].activity_count(), 0);
        assert_eq!(names(&rows[1].linked_activities), ["Course 1"]);
        assert_eq!(names(&rows[1].unlinked_activities), ["Course 5"]);
    }

    #[tokio::test]
    async fn shortcut_lookup_uses_series_of_the_video() {
        let mut links = MockActivityLinkStore::new();
        links
            .expect_links_for()
            .returning(|video, _| Ok(vec![link(video.as_str(), 1)]));
        let mut mappings = MockSeriesMappingStore::new();
        mappings
            .expect_has_mapping()
            .times(1)
            .returning(|_, series, _| Ok(series == "other-series"));

        let builder = builder(Some(links), fixture_resolver(), mappings);
        let moved = Video::new(VideoId::new("v9").unwrap(), "Moved", "other-series");
        let rows = builder.build(&series(), &[moved]).await;

        assert_eq!(names(&rows[0].linked_activities), ["Course 1"]);
    }
}
