use fxhash::FxHashMap;
use splitledger_application::{GroupId, GroupSnapshot, LedgerSource, LedgerSourceError};

/// Groups held entirely in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryLedger {
    groups: FxHashMap<GroupId, GroupSnapshot>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: impl Into<GroupId>, snapshot: GroupSnapshot) -> Self {
        self.insert(group, snapshot);
        self
    }

    /// Replaces any snapshot previously stored for `group`.
    pub fn insert(&mut self, group: impl Into<GroupId>, snapshot: GroupSnapshot) {
        self.groups.insert(group.into(), snapshot);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl LedgerSource for InMemoryLedger {
    fn load_group(&self, group: &GroupId) -> Result<GroupSnapshot, LedgerSourceError> {
        self.groups
            .get(group)
            .cloned()
            .ok_or_else(|| LedgerSourceError::GroupNotFound(group.clone()))
    }
}
