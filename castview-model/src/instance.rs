use crate::ids::InstanceId;

/// Public face of a configured Opencast instance. Credentials stay in the
/// configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceDescriptor {
    pub id: InstanceId,
    pub name: String,
    pub is_default: bool,
}
