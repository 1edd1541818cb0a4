use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::config::SiteConfig;
use crate::db::blog::models::BlogIndexEntry;

const DEFAULT_ENCLOSURE_TYPE: &str = "image/png";

/// Characters XML 1.0 cannot carry, even as references.
fn is_forbidden_in_xml(ch: char) -> bool {
    matches!(
        ch,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Escapes the five XML special characters and drops characters XML forbids.
pub fn escape_xml(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for ch in unsafe_text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            forbidden if is_forbidden_in_xml(forbidden) => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Parses RFC 3339, `YYYY-MM-DDTHH:MM:SS` (as UTC) or a bare `YYYY-MM-DD`.
pub fn parse_published_at(published_at: &str) -> Option<DateTime<Utc>> {
    let value = published_at.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// RFC-822 date as used by `<pubDate>`, e.g. `Wed, 01 May 2024 00:00:00 GMT`.
pub fn rfc822_date(published_at: &str) -> Option<String> {
    parse_published_at(published_at)
        .map(|datetime| datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

fn enclosure_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_ENCLOSURE_TYPE)
}

fn render_item(site: &SiteConfig, post: &BlogIndexEntry) -> String {
    let permalink = escape_xml(&format!("{}/blog/{}", site.url, post.slug));
    let pub_date = rfc822_date(&post.published_at).unwrap_or_else(|| escape_xml(&post.published_at));

    let mut item = String::from("    <item>\n");
    item.push_str(&format!("      <title>{}</title>\n", escape_xml(&post.title)));
    item.push_str(&format!("      <link>{permalink}</link>\n"));
    item.push_str(&format!("      <guid isPermaLink=\"true\">{permalink}</guid>\n"));
    item.push_str(&format!(
        "      <description>{}</description>\n",
        escape_xml(&post.excerpt)
    ));
    item.push_str(&format!("      <pubDate>{pub_date}</pubDate>\n"));
    item.push_str(&format!("      <author>{}</author>\n", escape_xml(&post.author)));
    item.push_str(&format!(
        "      <category>{}</category>\n",
        escape_xml(&post.category)
    ));
    if !post.cover_image.trim().is_empty() {
        let cover = escape_xml(&post.cover_image);
        item.push_str(&format!(
            "      <enclosure url=\"{cover}\" length=\"0\" type=\"{}\"/>\n",
            enclosure_type(&post.cover_image)
        ));
        item.push_str(&format!(
            "      <media:content url=\"{cover}\" medium=\"image\"/>\n"
        ));
    }
    item.push_str("    </item>\n");
    item
}

/// Renders the whole index as an RSS 2.0 document, one item per post in index order.
pub fn render_feed(site: &SiteConfig, posts: &[BlogIndexEntry]) -> String {
    let items: String = posts.iter().map(|post| render_item(site, post)).collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>{title}</title>
    <link>{link}</link>
    <description>{description}</description>
    <language>en</language>
    <atom:link href="{feed}" rel="self" type="application/rss+xml"/>
{items}  </channel>
</rss>
"#,
        title = escape_xml(&format!("{}'s Blog", site.owner_name)),
        link = escape_xml(&format!("{}/blog", site.url)),
        description = escape_xml(&site.owner_bio),
        feed = escape_xml(&format!("{}/feed.xml", site.url)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            owner_name: "Ada".to_string(),
            owner_bio: "Writes about <systems> & such".to_string(),
        }
    }

    fn entry(slug: &str, title: &str) -> BlogIndexEntry {
        BlogIndexEntry {
            id: "1".to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: "An excerpt".to_string(),
            cover_image: "https://cdn.example.com/covers/one.jpg?w=800".to_string(),
            published_at: "2024-05-01".to_string(),
            read_time: "3 min read".to_string(),
            category: "Engineering".to_string(),
            tags: vec!["rust".to_string()],
            author: "Ada".to_string(),
            featured: false,
        }
    }

    /// Walks the whole document, collecting unescaped text of every `<title>`.
    fn parse_titles(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut titles = Vec::new();
        let mut in_title = false;
        loop {
            match reader.read_event().expect("feed must be well-formed XML") {
                Event::Start(tag) if tag.name().as_ref() == b"title" => in_title = true,
                Event::End(tag) if tag.name().as_ref() == b"title" => in_title = false,
                Event::Text(text) if in_title => {
                    titles.push(text.unescape().unwrap().into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        titles
    }

    #[test]
    fn escapes_all_five_characters() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry's <"best">"#),
            "Tom &amp; Jerry&apos;s &lt;&quot;best&quot;&gt;"
        );
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(escape_xml("a\u{0}b\u{8}c\u{B}\u{1F}d\u{FFFE}"), "abcd");
        assert_eq!(escape_xml("tab\tline\nreturn\r"), "tab\tline\nreturn\r");

        let xml = render_feed(&site(), &[entry("bell", "Ring\u{7} the bell")]);
        assert_eq!(parse_titles(&xml), ["Ada's Blog", "Ring the bell"]);
    }

    #[test]
    fn hostile_titles_stay_well_formed() {
        let title = r#"Fish & Chips <b>"quoted"</b> it's"#;
        let xml = render_feed(&site(), &[entry("fish", title)]);

        assert!(xml.contains(
            "<title>Fish &amp; Chips &lt;b&gt;&quot;quoted&quot;&lt;/b&gt; it&apos;s</title>"
        ));
        assert_eq!(parse_titles(&xml), ["Ada's Blog", title]);
    }

    #[test]
    fn items_carry_links_dates_and_enclosures() {
        let xml = render_feed(&site(), &[entry("one", "One")]);
        assert!(xml.contains("<link>https://example.com/blog/one</link>"));
        assert!(xml.contains("<guid isPermaLink=\"true\">https://example.com/blog/one</guid>"));
        assert!(xml.contains("<pubDate>Wed, 01 May 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("<category>Engineering</category>"));
        assert!(xml.contains(
            "<enclosure url=\"https://cdn.example.com/covers/one.jpg?w=800\" length=\"0\" type=\"image/jpeg\"/>"
        ));
        assert!(xml.contains("<atom:link href=\"https://example.com/feed.xml\""));
        assert!(xml.contains("<description>Writes about &lt;systems&gt; &amp; such</description>"));
    }

    #[test]
    fn output_is_deterministic_and_ordered() {
        let posts = [entry("b", "Second"), entry("a", "First")];
        let first = render_feed(&site(), &posts);
        assert_eq!(first, render_feed(&site(), &posts));
        assert_eq!(parse_titles(&first), ["Ada's Blog", "Second", "First"]);
    }

    #[test]
    fn empty_index_is_an_empty_channel() {
        let xml = render_feed(&site(), &[]);
        assert!(!xml.contains("<item>"));
        assert_eq!(parse_titles(&xml), ["Ada's Blog"]);
    }

    #[test]
    fn dates_and_enclosure_fallbacks() {
        assert_eq!(
            rfc822_date("2024-02-29T23:15:00+02:00").as_deref(),
            Some("Thu, 29 Feb 2024 21:15:00 GMT")
        );
        assert_eq!(
            rfc822_date("2024-02-29T08:00:00").as_deref(),
            Some("Thu, 29 Feb 2024 08:00:00 GMT")
        );
        assert_eq!(rfc822_date("sometime soon"), None);

        let mut odd = entry("odd", "Odd");
        odd.published_at = "sometime <soon>".to_string();
        odd.cover_image = "https://cdn.example.com/cover".to_string();
        let xml = render_feed(&site(), &[odd]);
        assert!(xml.contains("<pubDate>sometime &lt;soon&gt;</pubDate>"));
        assert!(xml.contains("type=\"image/png\""));
    }
}
