use url::Url;

use crate::models::group::Group;

const STYLE: &str = "\
body{font-family:Inter,system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif;margin:24px;line-height:1.5}\
h1{margin:0 0 16px 0;font-size:22px}\
h2{margin:20px 0 8px 0;font-size:18px}\
.meta{color:#666;font-size:13px;margin-bottom:16px}\
ul{list-style:none;padding:0;margin:0 0 20px 0}\
li{display:flex;align-items:center;padding:8px 0;border-bottom:1px solid #eee}\
li:last-child{border-bottom:none}\
a{color:#0a5;text-decoration:none}\
a:hover{text-decoration:underline}\
.fav{width:16px;height:16px;border-radius:2px;margin-right:8px}\
@media (prefers-color-scheme: dark){body{background:#121212;color:#fff}.meta{color:#aaa}li{border-bottom:1px solid #333}}";

/// Best-effort hostname extraction; anything unparseable is `None`,
/// never an error.
pub fn hostname_of(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
}

// the five HTML-significant characters; everything user-provided passes
// through here before being embedded
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn favicon_url(url: &str) -> String {
    match hostname_of(url) {
        Some(host) => format!("https://www.google.com/s2/favicons?domain={}&sz=64", host),
        // fall back to the raw url as the lookup key
        None => format!(
            "https://www.google.com/s2/favicons?domain={}&sz=64",
            escape_html(url)
        ),
    }
}

/// Renders the whole collection as one self-contained HTML page of
/// clickable links, in stored order.
pub fn build_share_html(groups: &[Group]) -> String {
    let total_links: usize = groups.iter().map(|group| group.tabs.len()).sum();

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
         <title>MiniTab Share ({} link{})</title><style>{}</style></head><body>",
        total_links,
        plural(total_links),
        STYLE
    ));
    html.push_str(&format!(
        "<h1>MiniTab Share</h1><div class=\"meta\">{} session{} • {} link{}</div>",
        groups.len(),
        plural(groups.len()),
        total_links,
        plural(total_links)
    ));

    for group in groups {
        let safe_name = if group.name.is_empty() {
            "Session".to_string()
        } else {
            escape_html(&group.name)
        };
        html.push_str(&format!("<section><h2>{}</h2><ul>", safe_name));
        for tab in &group.tabs {
            let safe_url = escape_html(&tab.url);
            let safe_title = if tab.title.is_empty() {
                safe_url.clone()
            } else {
                escape_html(&tab.title)
            };
            html.push_str(&format!(
                "<li><img class=\"fav\" src=\"{}\" alt=\"\">\
                 <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"{}\">{}</a></li>",
                favicon_url(&tab.url),
                safe_url,
                safe_url,
                safe_title
            ));
        }
        html.push_str("</ul></section>");
    }

    html.push_str("</body></html>");
    html
}

// test module
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::group::Tab;

    fn group(name: &str, tabs: &[(&str, &str)]) -> Group {
        Group {
            id: 1,
            name: name.to_string(),
            tabs: tabs
                .iter()
                .map(|(title, url)| Tab {
                    title: title.to_string(),
                    url: url.to_string(),
                })
                .collect(),
            locked: false,
            starred: false,
        }
    }

    #[test]
    fn test_hostname_of() {
        assert_eq!(
            hostname_of("https://www.rust-lang.org/learn"),
            Some("www.rust-lang.org".to_string())
        );
        assert_eq!(hostname_of("not a url"), None);
        assert_eq!(hostname_of(""), None);
    }

    #[test]
    fn test_escape_html_covers_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_markup_in_group_name_is_escaped() {
        let html = build_share_html(&[group("<script>alert(1)</script>", &[])]);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_counts_pluralized_independently() {
        let html = build_share_html(&[group("one", &[("A", "https://a.com")])]);
        assert!(html.contains("1 session • 1 link<"));
        assert!(html.contains("MiniTab Share (1 link)"));

        let html = build_share_html(&[
            group("one", &[("A", "https://a.com"), ("B", "https://b.com")]),
            group("two", &[("C", "https://c.com")]),
        ]);
        assert!(html.contains("2 sessions • 3 links"));
        assert!(html.contains("MiniTab Share (3 links)"));
    }

    #[test]
    fn test_favicon_uses_hostname() {
        let html = build_share_html(&[group("g", &[("A", "https://a.com/deep/page")])]);
        assert!(html.contains("https://www.google.com/s2/favicons?domain=a.com&sz=64"));
    }

    #[test]
    fn test_favicon_falls_back_to_raw_url() {
        let html = build_share_html(&[group("g", &[("A", "not a url")])]);
        assert!(html.contains("favicons?domain=not a url&sz=64"));
    }

    #[test]
    fn test_empty_title_falls_back_to_url() {
        let html = build_share_html(&[group("g", &[("", "https://a.com")])]);
        assert!(html.contains(">https://a.com</a>"));
    }

    #[test]
    fn test_empty_group_name_falls_back_to_session() {
        let html = build_share_html(&[group("", &[])]);
        assert!(html.contains("<h2>Session</h2>"));
    }
}
