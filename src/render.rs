//! Server-side HTML page for the current snapshot.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::cache::Snapshot;
use crate::ingest::types::{Category, ListingItem};

const PAGE_BRAND: &str = "SmartRZ";

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Poppins', sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; padding: 20px; }
.container { max-width: 1400px; margin: 0 auto; }
.header, .section { background: linear-gradient(135deg, #ffffff 0%, #f8f9ff 100%); border-radius: 20px; margin-bottom: 30px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); }
.header { padding: 40px; text-align: center; }
.header h1 { color: #667eea; font-size: 3em; margin-bottom: 10px; font-weight: 700; }
.header .tagline { color: #666; font-size: 1.1em; font-weight: 300; }
.update-time { color: #999; font-size: 0.85em; margin-top: 15px; }
.section { padding: 30px; }
.section-title { display: flex; align-items: center; margin-bottom: 25px; padding-bottom: 15px; border-bottom: 3px solid #667eea; }
.section-title h2 { color: #333; font-size: 2em; font-weight: 600; }
.status-badge { padding: 8px 20px; border-radius: 25px; font-size: 0.7em; font-weight: 600; margin-left: 15px; text-transform: uppercase; letter-spacing: 1px; color: white; }
.status-live { background: linear-gradient(135deg, #ff416c 0%, #ff4b2b 100%); }
.status-upcoming { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
.status-completed { background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%); }
.class-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(350px, 1fr)); gap: 25px; }
.class-card { background: white; border-radius: 15px; overflow: hidden; box-shadow: 0 5px 15px rgba(0,0,0,0.1); }
.card-header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 20px; color: white; }
.card-body { padding: 20px; }
.description { color: #666; line-height: 1.6; margin-bottom: 15px; padding: 12px; background: #f8f9ff; border-radius: 8px; border-left: 4px solid #667eea; }
.info-item { color: #555; margin: 10px 0; }
.info-item .label { font-weight: 600; margin-right: 6px; text-transform: capitalize; }
.watch-btn { display: block; margin-top: 15px; padding: 12px 25px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; text-decoration: none; border-radius: 8px; font-weight: 600; text-align: center; }
.empty-state { text-align: center; padding: 60px 20px; color: #999; font-size: 1.2em; }
@media (max-width: 768px) { .header h1 { font-size: 2em; } .class-grid { grid-template-columns: 1fr; } }
"#;

struct SectionMeta {
    heading: &'static str,
    badge: &'static str,
    badge_class: &'static str,
}

fn section_meta(category: Category) -> SectionMeta {
    match category {
        Category::Live => SectionMeta {
            heading: "Live Classes",
            badge: "Live",
            badge_class: "status-live",
        },
        Category::Upcoming => SectionMeta {
            heading: "Upcoming Classes",
            badge: "Upcoming",
            badge_class: "status-upcoming",
        },
        Category::Completed => SectionMeta {
            heading: "Recorded Classes",
            badge: "Available",
            badge_class: "status-completed",
        },
    }
}

/// Render the full page. Reloads itself every 60 seconds.
pub fn render_page(snapshot: &Snapshot) -> String {
    let mut html = String::with_capacity(16 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <meta http-equiv=\"refresh\" content=\"60\">\n\
         <title>{brand} - Online Classes</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<div class=\"header\">\n<h1>{brand}</h1>\n\
         <p class=\"tagline\">Your Learning Journey Starts Here</p>\n",
        brand = PAGE_BRAND,
    );
    if let Some(ts) = snapshot.last_updated {
        let _ = writeln!(
            html,
            "<div class=\"update-time\">Updated {}</div>",
            ts.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    html.push_str("</div>\n");

    for category in Category::ALL {
        render_section(&mut html, category, snapshot.category(category));
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_section(html: &mut String, category: Category, items: &[ListingItem]) {
    let meta = section_meta(category);
    let _ = write!(
        html,
        "<div class=\"section\">\n<div class=\"section-title\">\n<h2>{}</h2>\n\
         <span class=\"status-badge {}\">{}</span>\n</div>\n<div class=\"class-grid\">\n",
        meta.heading, meta.badge_class, meta.badge
    );
    if items.is_empty() {
        html.push_str("<div class=\"empty-state\">No classes found</div>\n");
    } else {
        for item in items {
            render_card(html, item);
        }
    }
    html.push_str("</div>\n</div>\n");
}

fn render_card(html: &mut String, item: &ListingItem) {
    let _ = write!(
        html,
        "<div class=\"class-card\">\n<div class=\"card-header\"><h3>{}</h3></div>\n<div class=\"card-body\">\n",
        encode_text(&item.display_title())
    );
    if let Some(desc) = item.description() {
        let _ = writeln!(html, "<p class=\"description\">{}</p>", encode_text(&desc));
    }
    html.push_str("<div class=\"class-info\">\n");
    for (label, value) in item.details() {
        let _ = writeln!(
            html,
            "<div class=\"info-item\"><span class=\"label\">{label}</span>{}</div>",
            encode_text(&value)
        );
    }
    html.push_str("</div>\n");
    if let Some(link) = item.link().filter(|l| is_web_link(l)) {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"watch-btn\" target=\"_blank\" rel=\"noopener\">Watch Now</a>",
            encode_double_quoted_attribute(&link)
        );
    }
    html.push_str("</div>\n</div>\n");
}

fn is_web_link(link: &str) -> bool {
    let l = link.trim_start().to_ascii_lowercase();
    l.starts_with("https://") || l.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn item(fields: Value) -> ListingItem {
        serde_json::from_value(fields).unwrap()
    }

    #[test]
    fn empty_snapshot_renders_three_empty_sections() {
        let html = render_page(&Snapshot::default());
        assert_eq!(html.matches("No classes found").count(), 3);
        assert!(html.contains("Live Classes"));
        assert!(html.contains("Upcoming Classes"));
        assert!(html.contains("Recorded Classes"));
        assert!(!html.contains("update-time\">"));
    }

    #[test]
    fn optional_fields_render_only_when_present() {
        let full = item(json!({
            "title": "Physics",
            "teacher": "N. Verma",
            "duration": 90,
            "description": null,
            "link": "https://cdn.example/x.m3u8"
        }));
        let snap = Snapshot {
            live: vec![full, item(json!({"title": "Bare"}))],
            last_updated: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
            ..Default::default()
        };
        let html = render_page(&snap);
        assert!(html.contains("<h3>Physics</h3>"));
        assert!(html.contains("N. Verma"));
        assert!(html.contains("</span>90</div>"));
        assert!(html.contains("href=\"https://cdn.example/x.m3u8\""));
        assert_eq!(html.matches("Watch Now").count(), 1);
        assert!(!html.contains("class=\"description\""));
        assert!(html.contains("Updated 2024-05-01 10:00:00 UTC"));
        assert_eq!(html.matches("No classes found").count(), 2);
    }

    #[test]
    fn item_text_is_escaped_and_script_links_dropped() {
        let evil = item(json!({
            "title": "<script>alert(1)</script>",
            "link": "javascript:alert(1)"
        }));
        let html = render_page(&Snapshot {
            upcoming: vec![evil],
            ..Default::default()
        });
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("javascript:"));
    }
}
