use std::{fmt, sync::Arc};

use castview_model::{InstanceDescriptor, SeriesId, SeriesOverview};
use tracing::{info, warn};

use crate::ports::SeriesClient;
use crate::report::ReportBuilder;

/// Loads everything the overview page shows for one series on one instance.
///
/// Opencast failures never fail the page: the heading falls back to the raw
/// series id and the failure is carried as a notice. After the first Opencast
/// error no further Opencast requests are made for the page.
#[derive(Clone)]
pub struct OverviewService {
    instance: InstanceDescriptor,
    client: Arc<dyn SeriesClient>,
    builder: ReportBuilder,
}

impl fmt::Debug for OverviewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverviewService")
            .field("instance", &self.instance)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl OverviewService {
    pub fn new(
        instance: InstanceDescriptor,
        client: Arc<dyn SeriesClient>,
        builder: ReportBuilder,
    ) -> Self {
        Self {
            instance,
            client,
            builder,
        }
    }

    pub async fn load(&self, series: &SeriesId) -> SeriesOverview {
        let mut overview = SeriesOverview {
            instance: self.instance.clone(),
            series: series.clone(),
            heading: series.to_string(),
            rows: Vec::new(),
            notices: Vec::new(),
        };

        match self.client.series(series).await {
            Ok(Some(metadata)) if !metadata.title.trim().is_empty() => {
                overview.heading = metadata.title;
            }
            Ok(_) => {
                info!(
                    instance = %self.instance.id,
                    series = %series,
                    "series title unavailable; using identifier"
                );
            }
            Err(err) => {
                warn!(
                    instance = %self.instance.id,
                    series = %series,
                    error = %err,
                    "failed to load series metadata"
                );
                overview.notices.push(format!(
                    "Could not load series {series} from {}: {err}",
                    self.instance.name
                ));
                return overview;
            }
        }

        let videos = match self.client.series_videos(series).await {
            Ok(videos) => videos,
            Err(err) => {
                warn!(
                    instance = %self.instance.id,
                    series = %series,
                    error = %err,
                    "failed to load series videos"
                );
                overview.notices.push(format!(
                    "Could not load the videos of series {series} from {}: {err}",
                    self.instance.name
                ));
                return overview;
            }
        };

        overview.rows = self.builder.build(series, &videos).await;
        overview
    }
}
