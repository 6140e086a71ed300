use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tab {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl Tab {
    // `filter` must already be lowercased by the caller
    pub fn matches(&self, filter: &str) -> bool {
        self.title.to_lowercase().contains(filter) || self.url.to_lowercase().contains(filter)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub tabs: Vec<Tab>,
    pub locked: bool,
    pub starred: bool,
}
