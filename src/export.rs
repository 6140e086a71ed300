use crate::capture::next_group_id;
use crate::models::group::{Group, Tab};

pub const EXPORT_FILENAME: &str = "minitab-export.txt";

/// One name line per group followed by one url line per tab, groups
/// separated by a blank line, in stored order. Titles and flags are
/// dropped; the round trip through `import_text` is intentionally lossy.
pub fn export_text(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|group| {
            let urls: Vec<&str> = group.tabs.iter().map(|tab| tab.url.as_str()).collect();
            if urls.is_empty() {
                group.name.clone()
            } else {
                format!("{}\n{}", group.name, urls.join("\n"))
            }
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}

/// Splits on blank-line boundaries; each section's first line is the new
/// group's name, every later non-blank line becomes a tab whose title
/// equals its url. A wholly blank input yields nothing.
pub fn import_text(text: &str) -> Vec<Group> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split("\n\n")
        .enumerate()
        .map(|(index, section)| {
            let mut lines = section.split('\n');
            let name = match lines.next() {
                Some(first) if !first.is_empty() => first.to_string(),
                _ => format!("Imported Session {}", index + 1),
            };
            let tabs: Vec<Tab> = lines
                .filter(|line| !line.trim().is_empty())
                .map(|line| Tab {
                    title: line.to_string(),
                    url: line.to_string(),
                })
                .collect();
            Group {
                id: next_group_id(),
                name,
                tabs,
                locked: false,
                starred: false,
            }
        })
        .collect()
}

// test module
#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: i64, name: &str, urls: &[&str]) -> Group {
        Group {
            id,
            name: name.to_string(),
            tabs: urls
                .iter()
                .map(|url| Tab {
                    title: format!("Title of {}", url),
                    url: url.to_string(),
                })
                .collect(),
            locked: true,
            starred: true,
        }
    }

    #[test]
    fn test_export_format() {
        let text = export_text(&[
            group(1, "Morning", &["https://a.com", "https://b.com"]),
            group(2, "Evening", &["https://c.com"]),
        ]);
        assert_eq!(
            text,
            "Morning\nhttps://a.com\nhttps://b.com\n\nEvening\nhttps://c.com"
        );
    }

    #[test]
    fn test_export_keeps_stored_order() {
        // not re-sorted by id
        let text = export_text(&[group(1, "first", &[]), group(9, "second", &[])]);
        assert_eq!(text, "first\n\nsecond");
    }

    #[test]
    fn test_round_trip_preserves_groups_and_url_order() {
        let original = vec![
            group(1, "Morning", &["https://a.com", "https://b.com"]),
            group(2, "Evening", &["https://c.com"]),
        ];
        let imported = import_text(&export_text(&original));

        assert_eq!(imported.len(), original.len());
        for (imported_group, original_group) in imported.iter().zip(&original) {
            assert_eq!(imported_group.name, original_group.name);
            let urls: Vec<&str> = imported_group
                .tabs
                .iter()
                .map(|tab| tab.url.as_str())
                .collect();
            let original_urls: Vec<&str> = original_group
                .tabs
                .iter()
                .map(|tab| tab.url.as_str())
                .collect();
            assert_eq!(urls, original_urls);
            // titles collapse to urls, flags reset
            for tab in &imported_group.tabs {
                assert_eq!(tab.title, tab.url);
            }
            assert!(!imported_group.locked);
            assert!(!imported_group.starred);
        }
    }

    #[test]
    fn test_import_blank_first_line_generates_name() {
        let imported = import_text("\nhttps://a.com\n\n\nhttps://b.com");
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Imported Session 1");
        assert_eq!(imported[1].name, "Imported Session 2");
        assert_eq!(imported[0].tabs[0].url, "https://a.com");
    }

    #[test]
    fn test_import_blank_file_yields_nothing() {
        assert!(import_text("").is_empty());
        assert!(import_text("   \n  \n").is_empty());
    }

    #[test]
    fn test_import_section_without_urls_yields_empty_group() {
        let imported = import_text("Just a name");
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].name, "Just a name");
        assert!(imported[0].tabs.is_empty());
    }

    #[test]
    fn test_import_assigns_unique_increasing_ids() {
        let imported = import_text("a\nhttps://a.com\n\nb\nhttps://b.com\n\nc");
        assert!(imported[0].id < imported[1].id);
        assert!(imported[1].id < imported[2].id);
    }
}
