use crate::ids::{SeriesId, VideoId};

/// Series metadata as reported by Opencast.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    pub identifier: SeriesId,
    pub title: String,
}

/// A single recording belonging to a series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Video {
    pub identifier: VideoId,
    pub title: String,
    /// Series the event claims to be part of (`is_part_of`). Series-mapping
    /// lookups key on this value rather than on the requested series.
    pub series_identifier: String,
}

impl Video {
    pub fn new(
        identifier: VideoId,
        title: impl Into<String>,
        series_identifier: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            title: title.into(),
            series_identifier: series_identifier.into(),
        }
    }
}
