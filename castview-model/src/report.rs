use crate::activity::ResolvedActivity;
use crate::ids::SeriesId;
use crate::instance::InstanceDescriptor;

/// One table row: a video and the activities embedding it, split by whether
/// the course also carries a series shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportRow {
    pub video_title: String,
    pub linked_activities: Vec<ResolvedActivity>,
    pub unlinked_activities: Vec<ResolvedActivity>,
}

impl ReportRow {
    pub fn new(video_title: impl Into<String>) -> Self {
        Self {
            video_title: video_title.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, activity: ResolvedActivity) {
        if activity.has_block_shortcut {
            self.linked_activities.push(activity);
        } else {
            self.unlinked_activities.push(activity);
        }
    }

    pub fn activity_count(&self) -> usize {
        self.linked_activities.len() + self.unlinked_activities.len()
    }
}

/// Everything the overview page needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesOverview {
    pub instance: InstanceDescriptor,
    pub series: SeriesId,
    /// Series title, or the raw identifier when Opencast could not provide one.
    pub heading: String,
    pub rows: Vec<ReportRow>,
    /// Problems surfaced after the table instead of failing the page.
    pub notices: Vec<String>,
}
