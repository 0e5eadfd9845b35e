use std::collections::HashSet;

use crate::config::Config;

/// Who may use the bot, and where.
#[derive(Debug, Clone, Default)]
pub struct Permission {
    /// Empty means every group is allowed.
    allowed_groups: HashSet<i64>,
    blocked_users: HashSet<u64>,
}

impl Permission {
    pub fn new(allowed_groups: HashSet<i64>, blocked_users: HashSet<u64>) -> Self {
        Self { allowed_groups, blocked_users }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allowed_groups.clone(), config.blocked_users.clone())
    }

    pub fn check(&self, sender: u64, group_id: i64) -> bool {
        if self.blocked_users.contains(&sender) {
            return false;
        }
        self.allowed_groups.is_empty() || self.allowed_groups.contains(&group_id)
    }
}
