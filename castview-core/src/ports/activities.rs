use async_trait::async_trait;
use castview_model::{ActivityLink, CourseId, InstanceId, ModuleId, VideoId};

use crate::error::Result;

/// Where a resolved activity lives in the LMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTarget {
    pub module_id: ModuleId,
    pub course_name: String,
    pub display_url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLinkStore: Send + Sync {
    /// Episode activities embedding `video` on `instance`, in storage order.
    async fn links_for(
        &self,
        video: &VideoId,
        instance: InstanceId,
    ) -> Result<Vec<ActivityLink>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityResolver: Send + Sync {
    /// Resolve a link to its course module. `Ok(None)` means the activity or
    /// its course no longer exists.
    async fn resolve(&self, link: &ActivityLink) -> Result<Option<ActivityTarget>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesMappingStore: Send + Sync {
    /// Whether `series` has a dashboard shortcut into `course` on `instance`.
    async fn has_mapping(
        &self,
        instance: InstanceId,
        series: &str,
        course: CourseId,
    ) -> Result<bool>;
}
