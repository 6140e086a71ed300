use std::sync::Mutex;

use chrono::Local;
use log::info;

use crate::models::group::{Group, Tab};

// browser-internal pages are never stored and never closed
pub const RESERVED_SCHEMES: [&str; 2] = ["chrome://", "chrome-extension://"];

lazy_static! {
    static ref LAST_GROUP_ID: Mutex<i64> = Mutex::new(0);
}

/// Wall-clock milliseconds, bumped past the previous value when the clock
/// has not advanced, so ids stay strictly monotonic within one process.
pub fn next_group_id() -> i64 {
    let mut last = LAST_GROUP_ID.lock().unwrap();
    let now = chrono::Utc::now().timestamp_millis();
    *last = if now > *last { now } else { *last + 1 };
    *last
}

pub fn is_capturable(url: &str) -> bool {
    !url.is_empty() && !RESERVED_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Builds one new group from a live (title, url) snapshot, or nothing if
/// no tab survives the reserved-scheme filter.
pub fn capture_group(tabs: &[Tab]) -> Option<Group> {
    let captured: Vec<Tab> = tabs
        .iter()
        .filter(|tab| is_capturable(&tab.url))
        .cloned()
        .collect();
    if captured.is_empty() {
        return None;
    }

    let count = captured.len();
    let name = format!(
        "{} • {} tab{}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        count,
        if count == 1 { "" } else { "s" }
    );
    info!("Capturing {} of {} submitted tabs", count, tabs.len());

    Some(Group {
        id: next_group_id(),
        name,
        tabs: captured,
        locked: false,
        starred: false,
    })
}

// test module
#[cfg(test)]
mod tests {
    use super::*;

    fn tab(title: &str, url: &str) -> Tab {
        Tab {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_next_group_id_is_strictly_monotonic() {
        let mut previous = next_group_id();
        for _ in 0..1000 {
            let id = next_group_id();
            assert!(id > previous);
            previous = id;
        }
    }

    #[test]
    fn test_capture_two_tabs() {
        let group = capture_group(&[
            tab("A", "https://a.com"),
            tab("B", "https://b.com"),
        ])
        .unwrap();
        assert_eq!(group.tabs.len(), 2);
        assert!(!group.locked);
        assert!(!group.starred);
        assert!(group.name.ends_with("• 2 tabs"));
        assert_eq!(group.tabs[0].url, "https://a.com");
        assert_eq!(group.tabs[1].url, "https://b.com");
    }

    #[test]
    fn test_capture_single_tab_singular_name() {
        let group = capture_group(&[tab("A", "https://a.com")]).unwrap();
        assert!(group.name.ends_with("• 1 tab"));
    }

    #[test]
    fn test_capture_skips_reserved_schemes_and_empty_urls() {
        assert!(capture_group(&[
            tab("Settings", "chrome://settings"),
            tab("Extension", "chrome-extension://abcdef/page.html"),
            tab("No url", ""),
        ])
        .is_none());

        let group = capture_group(&[
            tab("Settings", "chrome://settings"),
            tab("Kept", "https://kept.example"),
        ])
        .unwrap();
        assert_eq!(group.tabs.len(), 1);
        assert_eq!(group.tabs[0].url, "https://kept.example");
    }
}
