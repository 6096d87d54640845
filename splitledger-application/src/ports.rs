use crate::{error::LedgerSourceError, model::{GroupId, GroupSnapshot}};

/// Data-access collaborator supplying one group's members and records.
pub trait LedgerSource: Send + Sync {
    fn load_group(&self, group: &GroupId) -> Result<GroupSnapshot, LedgerSourceError>;
}
