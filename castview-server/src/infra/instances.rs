use std::{fmt, sync::Arc};

use castview_config::OpencastConfig;
use castview_core::{
    CoreError,
    ports::SeriesClient,
    providers::{OpencastApiProvider, OpencastCredentials},
};
use castview_model::{InstanceDescriptor, InstanceId};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no Opencast instances configured")]
    Empty,

    #[error("failed to build client for Opencast instance {id}: {source}")]
    Client {
        id: InstanceId,
        #[source]
        source: CoreError,
    },
}

#[derive(Clone)]
struct RegisteredInstance {
    descriptor: InstanceDescriptor,
    client: Arc<dyn SeriesClient>,
}

/// The configured Opencast instances and one client per instance.
///
/// Exactly one instance is the default: the one flagged as such, otherwise the
/// first registered.
#[derive(Clone)]
pub struct InstanceRegistry {
    instances: Vec<RegisteredInstance>,
    default_index: usize,
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field(
                "instances",
                &self.instances.iter().map(|i| &i.descriptor).collect::<Vec<_>>(),
            )
            .field("default", &self.default_instance().id)
            .finish()
    }
}

impl InstanceRegistry {
    pub fn from_config(config: &OpencastConfig) -> Result<Self, RegistryError> {
        let mut parts = Vec::with_capacity(config.instances.len());
        for instance in &config.instances {
            let provider = OpencastApiProvider::new(
                instance.base_url.clone(),
                OpencastCredentials {
                    username: instance.username.clone(),
                    password: instance.password.clone(),
                },
                instance.timeout,
            )
            .map_err(|source| RegistryError::Client {
                id: instance.id,
                source,
            })?;

            info!(
                instance = %instance.id,
                name = %instance.name,
                url = %instance.base_url,
                default = instance.is_default,
                "registered Opencast instance"
            );
            parts.push((
                instance.descriptor(),
                Arc::new(provider) as Arc<dyn SeriesClient>,
            ));
        }

        Self::from_parts(parts)
    }

    pub fn from_parts(
        parts: Vec<(InstanceDescriptor, Arc<dyn SeriesClient>)>,
    ) -> Result<Self, RegistryError> {
        if parts.is_empty() {
            return Err(RegistryError::Empty);
        }

        let default_index = parts
            .iter()
            .position(|(descriptor, _)| descriptor.is_default)
            .unwrap_or(0);

        let instances = parts
            .into_iter()
            .enumerate()
            .map(|(index, (mut descriptor, client))| {
                descriptor.is_default = index == default_index;
                RegisteredInstance { descriptor, client }
            })
            .collect();

        Ok(Self {
            instances,
            default_index,
        })
    }

    pub fn default_instance(&self) -> &InstanceDescriptor {
        &self.instances[self.default_index].descriptor
    }

    pub fn get(&self, id: InstanceId) -> Option<&InstanceDescriptor> {
        self.entry(id).map(|entry| &entry.descriptor)
    }

    /// The requested instance, or the default one when no id was given.
    pub fn select(&self, id: Option<InstanceId>) -> Option<&InstanceDescriptor> {
        match id {
            Some(id) => self.get(id),
            None => Some(self.default_instance()),
        }
    }

    pub fn client(&self, id: InstanceId) -> Option<Arc<dyn SeriesClient>> {
        self.entry(id).map(|entry| Arc::clone(&entry.client))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &InstanceDescriptor> {
        self.instances.iter().map(|entry| &entry.descriptor)
    }

    fn entry(&self, id: InstanceId) -> Option<&RegisteredInstance> {
        self.instances.iter().find(|entry| entry.descriptor.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use castview_core::Result;
    use castview_model::{Series, SeriesId, Video};

    struct Silent;

    #[async_trait]
    impl SeriesClient for Silent {
        async fn series(&self, _id: &SeriesId) -> Result<Option<Series>> {
            Ok(None)
        }

        async fn series_videos(&self, _id: &SeriesId) -> Result<Vec<Video>> {
            Ok(Vec::new())
        }
    }

    fn descriptor(id: i64, name: &str, is_default: bool) -> InstanceDescriptor {
        InstanceDescriptor {
            id: InstanceId(id),
            name: name.to_string(),
            is_default,
        }
    }

    fn part(
        id: i64,
        name: &str,
        is_default: bool,
    ) -> (InstanceDescriptor, Arc<dyn SeriesClient>) {
        (descriptor(id, name, is_default), Arc::new(Silent))
    }

    #[test]
    fn flagged_instance_is_default() {
        let registry =
            InstanceRegistry::from_parts(vec![part(1, "A", false), part(7, "B", true)])
                .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_instance().id, InstanceId(7));
        assert_eq!(registry.select(None).unwrap().name, "B");
        assert_eq!(registry.select(Some(InstanceId(1))).unwrap().name, "A");
        assert!(registry.select(Some(InstanceId(3))).is_none());
        assert!(registry.client(InstanceId(7)).is_some());
        assert!(registry.client(InstanceId(3)).is_none());
    }

    #[test]
    fn first_instance_is_default_when_none_flagged() {
        let registry =
            InstanceRegistry::from_parts(vec![part(4, "A", false), part(5, "B", false)])
                .unwrap();

        assert_eq!(registry.default_instance().id, InstanceId(4));
        let defaults = registry.descriptors().filter(|d| d.is_default).count();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(
            InstanceRegistry::from_parts(Vec::new()),
            Err(RegistryError::Empty)
        ));
    }
}
