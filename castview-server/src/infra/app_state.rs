use std::{fmt, sync::Arc};

use castview_core::{CoreError, OverviewService, ReportBuilder};
use castview_model::InstanceId;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::infra::activities::ActivityPorts;
use crate::infra::instances::InstanceRegistry;

#[derive(Clone)]
pub struct AppState {
    pub instances: Arc<InstanceRegistry>,
    pub activities: ActivityPorts,
    /// `None` when no database is configured.
    pub postgres: Option<PgPool>,
    pub started_at: DateTime<Utc>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("instances", &self.instances.len())
            .field("activities", &self.activities)
            .field("database", &self.postgres.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        instances: InstanceRegistry,
        activities: ActivityPorts,
        postgres: Option<PgPool>,
    ) -> Self {
        Self {
            instances: Arc::new(instances),
            activities,
            postgres,
            started_at: Utc::now(),
        }
    }

    /// Wire an overview for the requested instance, or the default one when
    /// no id was given.
    pub fn overview_service(
        &self,
        requested: Option<InstanceId>,
    ) -> castview_core::Result<OverviewService> {
        let descriptor = self.instances.select(requested).cloned().ok_or_else(|| {
            CoreError::NotFound(format!(
                "Unknown Opencast instance: {}",
                requested.map_or_else(|| "default".to_string(), |id| id.to_string())
            ))
        })?;
        let id = descriptor.id;
        let client = self
            .instances
            .client(id)
            .ok_or_else(|| CoreError::NotFound(format!("Unknown Opencast instance: {id}")))?;
        let builder = ReportBuilder::new(
            id,
            self.activities.links.clone(),
            Arc::clone(&self.activities.resolver),
            Arc::clone(&self.activities.mappings),
        );
        Ok(OverviewService::new(descriptor, client, builder))
    }

    /// Whether page headings should name the instance.
    pub fn has_multiple_instances(&self) -> bool {
        self.instances.len() > 1
    }
}
