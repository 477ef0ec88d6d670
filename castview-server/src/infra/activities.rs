use std::{fmt, sync::Arc};

use async_trait::async_trait;
use castview_core::{
    Result,
    database::PostgresActivityStore,
    ports::{
        ActivityLinkStore, ActivityResolver, ActivityTarget, SeriesMappingStore,
    },
};
use castview_model::{ActivityLink, CourseId, InstanceId};

/// The activity collaborators handed to every report.
///
/// `links` is `None` when the activity plugin is not installed, in which case
/// the report shows videos only.
#[derive(Clone)]
pub struct ActivityPorts {
    pub links: Option<Arc<dyn ActivityLinkStore>>,
    pub resolver: Arc<dyn ActivityResolver>,
    pub mappings: Arc<dyn SeriesMappingStore>,
}

impl fmt::Debug for ActivityPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityPorts")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl ActivityPorts {
    pub fn postgres(store: Arc<PostgresActivityStore>, enabled: bool) -> Self {
        Self {
            links: enabled.then(|| store.clone() as Arc<dyn ActivityLinkStore>),
            resolver: store.clone(),
            mappings: store,
        }
    }

    /// No activity tables available at all.
    pub fn disabled() -> Self {
        let none = Arc::new(NoActivities);
        Self {
            links: None,
            resolver: none.clone(),
            mappings: none,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.links.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct NoActivities;

#[async_trait]
impl ActivityResolver for NoActivities {
    async fn resolve(&self, _link: &ActivityLink) -> Result<Option<ActivityTarget>> {
        Ok(None)
    }
}

#[async_trait]
impl SeriesMappingStore for NoActivities {
    async fn has_mapping(
        &self,
        _instance: InstanceId,
        _series: &str,
        _course: CourseId,
    ) -> Result<bool> {
        Ok(false)
    }
}
