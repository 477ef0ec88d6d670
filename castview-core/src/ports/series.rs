use async_trait::async_trait;
use castview_model::{Series, SeriesId, Video};

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesClient: Send + Sync {
    /// Series metadata, `None` when the media service does not know the id.
    async fn series(&self, id: &SeriesId) -> Result<Option<Series>>;

    /// Videos of the series in the order the media service reports them.
    async fn series_videos(&self, id: &SeriesId) -> Result<Vec<Video>>;
}
