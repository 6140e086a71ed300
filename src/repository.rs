use log::{debug, info};

use crate::models::group::{Group, Tab};
use crate::models::theme::Theme;
use crate::store::SessionStore;

pub const FALLBACK_GROUP_NAME: &str = "Unnamed Session";

/// Owns the only handle to the store. Every mutation is a full
/// read-record, modify, write-record cycle; callers serialize access
/// through the global instance mutex, so one mutation is fully persisted
/// before the next begins.
pub struct GroupRepository {
    store: SessionStore,
}

impl GroupRepository {
    pub fn new(store: SessionStore) -> Self {
        GroupRepository { store }
    }

    pub fn add(&self, group: Group) -> Result<(), std::io::Error> {
        let mut record = self.store.read()?;
        record.groups.push(group);
        self.store.write(&record)
    }

    // used by import; appended after existing groups, input order kept
    pub fn add_many(&self, groups: Vec<Group>) -> Result<(), std::io::Error> {
        if groups.is_empty() {
            return Ok(());
        }
        let mut record = self.store.read()?;
        record.groups.extend(groups);
        self.store.write(&record)
    }

    /// Groups sorted most-recently-created first. A non-empty filter
    /// narrows the returned tabs to those whose title or url contains it,
    /// case-insensitively; stored tabs are never touched.
    pub fn list(&self, filter: &str) -> Result<Vec<Group>, std::io::Error> {
        let mut groups = self.store.read()?.groups;
        groups.sort_by(|a, b| b.id.cmp(&a.id));
        if filter.is_empty() {
            return Ok(groups);
        }
        let filter = filter.to_lowercase();
        for group in &mut groups {
            group.tabs.retain(|tab| tab.matches(&filter));
        }
        Ok(groups)
    }

    // stored order, for the export and share codecs
    pub fn all_groups(&self) -> Result<Vec<Group>, std::io::Error> {
        Ok(self.store.read()?.groups)
    }

    pub fn rename(&self, group_id: i64, new_name: &str) -> Result<(), std::io::Error> {
        let trimmed = new_name.trim();
        let name = if trimmed.is_empty() {
            FALLBACK_GROUP_NAME
        } else {
            trimmed
        };
        self.update_group(group_id, |group| group.name = name.to_string())
    }

    pub fn toggle_lock(&self, group_id: i64) -> Result<(), std::io::Error> {
        self.update_group(group_id, |group| group.locked = !group.locked)
    }

    pub fn toggle_star(&self, group_id: i64) -> Result<(), std::io::Error> {
        self.update_group(group_id, |group| group.starred = !group.starred)
    }

    pub fn delete_group(&self, group_id: i64) -> Result<(), std::io::Error> {
        let mut record = self.store.read()?;
        let before = record.groups.len();
        record.groups.retain(|group| group.id != group_id);
        if record.groups.len() == before {
            debug!("delete_group: no group with id {}", group_id);
            return Ok(());
        }
        info!("Deleted group {}", group_id);
        self.store.write(&record)
    }

    pub fn delete_tab(&self, group_id: i64, tab_index: usize) -> Result<(), std::io::Error> {
        let mut record = self.store.read()?;
        match record.groups.iter_mut().find(|group| group.id == group_id) {
            Some(group) => {
                if tab_index >= group.tabs.len() {
                    debug!(
                        "delete_tab: index {} out of range for group {}",
                        tab_index, group_id
                    );
                    return Ok(());
                }
                group.tabs.remove(tab_index);
                self.store.write(&record)
            }
            None => {
                debug!("delete_tab: no group with id {}", group_id);
                Ok(())
            }
        }
    }

    /// Replaces the group's tab sequence wholesale. Reordering a locked
    /// group is rejected as a no-op.
    pub fn reorder_tabs(&self, group_id: i64, new_order: Vec<Tab>) -> Result<(), std::io::Error> {
        let mut record = self.store.read()?;
        match record.groups.iter_mut().find(|group| group.id == group_id) {
            Some(group) => {
                if group.locked {
                    info!("reorder_tabs: group {} is locked, keeping order", group_id);
                    return Ok(());
                }
                group.tabs = new_order;
                self.store.write(&record)
            }
            None => {
                debug!("reorder_tabs: no group with id {}", group_id);
                Ok(())
            }
        }
    }

    pub fn theme(&self) -> Result<Theme, std::io::Error> {
        Ok(self.store.read()?.theme)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), std::io::Error> {
        let mut record = self.store.read()?;
        record.theme = theme;
        self.store.write(&record)
    }

    // a missing group is a silent no-op: the collection may have changed
    // between the client's snapshot and the action
    fn update_group<F>(&self, group_id: i64, apply: F) -> Result<(), std::io::Error>
    where
        F: FnOnce(&mut Group),
    {
        let mut record = self.store.read()?;
        match record.groups.iter_mut().find(|group| group.id == group_id) {
            Some(group) => {
                apply(group);
                self.store.write(&record)
            }
            None => {
                debug!("update_group: no group with id {}", group_id);
                Ok(())
            }
        }
    }
}
