use thiserror::Error;

/// A non-fatal finding surfaced to the operator at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Configuration that cannot be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error(
        "no Opencast instance configured; add [[opencast.instances]] or set OPENCAST_URL"
    )]
    NoOpencastInstances,
    #[error("Opencast instance id {id} is declared more than once")]
    DuplicateInstance { id: i64 },
    #[error("more than one Opencast instance is marked as default: {ids:?}")]
    MultipleDefaults { ids: Vec<i64> },
    #[error("Opencast instance {id} has an invalid url '{url}'")]
    InvalidInstanceUrl { id: i64, url: String },
    #[error("LMS base url '{url}' is invalid")]
    InvalidLmsUrl { url: String },
}
