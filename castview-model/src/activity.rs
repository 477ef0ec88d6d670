use std::fmt;

use crate::ids::{CourseId, InstanceId, VideoId};

/// What an embedded Opencast activity points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivityKind {
    Series,
    Episode,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Series => "series",
            ActivityKind::Episode => "episode",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An existing embedding of a video in a course activity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityLink {
    pub course_id: CourseId,
    pub video_id: VideoId,
    pub instance_id: InstanceId,
}

/// A course activity resolved to something a user can click on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedActivity {
    pub display_url: String,
    pub course_name: String,
    pub has_block_shortcut: bool,
}
