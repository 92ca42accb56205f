//! Page metadata extraction
//!
//! Accumulates a structural summary of one fetched page: HTML version
//! marker, title, heading counts, and login-form presence. The extractor is
//! driven from a single pass over the parsed document on one thread, so it
//! needs no internal synchronization. Raw hrefs are collected alongside for
//! the link classifier; deduplication is the classifier's job.

use scraper::{Html, Selector};

/// Marker recorded when the root html tag carries no version attribute
pub const UNKNOWN_HTML_VERSION: &str = "HTML5 or unknown";

/// Structural metadata accumulated from one parsed page
#[derive(Debug, Clone, Default)]
pub struct PageReport {
    pub html_version: String,
    pub title: String,
    pub h1_count: u32,
    pub h2_count: u32,
    pub h3_count: u32,
    pub has_login_form: bool,

    /// Raw href attributes in document order, unresolved and undeduplicated
    pub raw_hrefs: Vec<String>,
}

/// Event-style accumulator for page metadata
///
/// Handlers mirror the markup events of interest: the root html tag, the
/// title, headings, and form inputs. Each handler encodes its own
/// occurrence rule (first wins, last wins, count, monotonic flag).
#[derive(Debug, Default)]
pub struct PageExtractor {
    report: PageReport,
    version_recorded: bool,
}

impl PageExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the HTML version marker; first occurrence wins
    pub fn on_root_html(&mut self, version_attr: Option<&str>) {
        if self.version_recorded {
            return;
        }
        self.version_recorded = true;
        self.report.html_version = match version_attr {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => UNKNOWN_HTML_VERSION.to_string(),
        };
    }

    /// Records the page title; last occurrence wins
    pub fn on_title(&mut self, text: &str) {
        self.report.title = text.trim().to_string();
    }

    /// Counts an h1/h2/h3 heading; other levels are ignored
    pub fn on_heading(&mut self, level: u8) {
        match level {
            1 => self.report.h1_count += 1,
            2 => self.report.h2_count += 1,
            3 => self.report.h3_count += 1,
            _ => {}
        }
    }

    /// Scans a form's input types for a password field; the flag is monotonic
    pub fn on_form_inputs<'a>(&mut self, input_types: impl Iterator<Item = &'a str>) {
        for input_type in input_types {
            if input_type.eq_ignore_ascii_case("password") {
                self.report.has_login_form = true;
            }
        }
    }

    /// Records a raw href for later classification
    pub fn on_href(&mut self, href: &str) {
        self.report.raw_hrefs.push(href.to_string());
    }

    /// Consumes the extractor, yielding the accumulated report
    pub fn into_report(mut self) -> PageReport {
        if !self.version_recorded {
            self.report.html_version = UNKNOWN_HTML_VERSION.to_string();
        }
        self.report
    }
}

/// Parses HTML and drives the extractor over the document
///
/// # Arguments
///
/// * `html` - The HTML content of the base page
///
/// # Returns
///
/// The accumulated page report, including raw hrefs for classification
pub fn extract_page(html: &str) -> PageReport {
    let document = Html::parse_document(html);
    let mut extractor = PageExtractor::new();

    if let Ok(html_selector) = Selector::parse("html") {
        for element in document.select(&html_selector) {
            extractor.on_root_html(element.value().attr("version"));
        }
    }

    if let Ok(title_selector) = Selector::parse("title") {
        for element in document.select(&title_selector) {
            extractor.on_title(&element.text().collect::<String>());
        }
    }

    for (selector_str, level) in [("h1", 1u8), ("h2", 2u8), ("h3", 3u8)] {
        if let Ok(selector) = Selector::parse(selector_str) {
            for _ in document.select(&selector) {
                extractor.on_heading(level);
            }
        }
    }

    if let (Ok(form_selector), Ok(input_selector)) =
        (Selector::parse("form"), Selector::parse("input"))
    {
        for form in document.select(&form_selector) {
            let types = form
                .select(&input_selector)
                .filter_map(|input| input.value().attr("type"));
            extractor.on_form_inputs(types);
        }
    }

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                extractor.on_href(href);
            }
        }
    }

    extractor.into_report()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_extracted() {
        let report = extract_page("<html><head><title> Home </title></head><body></body></html>");
        assert_eq!(report.title, "Home");
    }

    #[test]
    fn test_last_title_wins() {
        let report =
            extract_page("<html><head><title>First</title><title>Second</title></head></html>");
        assert_eq!(report.title, "Second");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let report = extract_page("<html><body></body></html>");
        assert_eq!(report.title, "");
    }

    #[test]
    fn test_heading_counts() {
        let html = "<html><body><h1>a</h1><h2>b</h2><h2>c</h2><h3>d</h3><h3>e</h3><h3>f</h3><h4>ignored</h4></body></html>";
        let report = extract_page(html);
        assert_eq!(report.h1_count, 1);
        assert_eq!(report.h2_count, 2);
        assert_eq!(report.h3_count, 3);
    }

    #[test]
    fn test_html_version_attribute() {
        let report = extract_page(r#"<html version="-//W3C//DTD HTML 4.01//EN"><body></body></html>"#);
        assert_eq!(report.html_version, "-//W3C//DTD HTML 4.01//EN");
    }

    #[test]
    fn test_html_version_defaults_when_absent() {
        let report = extract_page("<html><body></body></html>");
        assert_eq!(report.html_version, UNKNOWN_HTML_VERSION);
    }

    #[test]
    fn test_password_input_marks_login_form() {
        let html = r#"<html><body><form><input type="text"><input type="PassWord"></form></body></html>"#;
        let report = extract_page(html);
        assert!(report.has_login_form);
    }

    #[test]
    fn test_form_without_password_not_login() {
        let html = r#"<html><body><form><input type="text"><input type="submit"></form></body></html>"#;
        let report = extract_page(html);
        assert!(!report.has_login_form);
    }

    #[test]
    fn test_login_flag_is_monotonic() {
        let mut extractor = PageExtractor::new();
        extractor.on_form_inputs(["password"].into_iter());
        extractor.on_form_inputs(["text"].into_iter());
        assert!(extractor.into_report().has_login_form);
    }

    #[test]
    fn test_hrefs_collected_in_order_with_duplicates() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <a href="https://evil.test/b">B</a>
            <a href="/a">A again</a>
        </body></html>"#;
        let report = extract_page(html);
        assert_eq!(report.raw_hrefs, vec!["/a", "https://evil.test/b", "/a"]);
    }

    #[test]
    fn test_scenario_page() {
        let html = r#"<html>
            <head><title>Example</title></head>
            <body>
                <h1>Welcome</h1>
                <form><input type="password"></form>
                <a href="https://example.com/a">internal</a>
                <a href="https://evil.test/b">external</a>
            </body>
        </html>"#;
        let report = extract_page(html);
        assert_eq!(report.h1_count, 1);
        assert!(report.has_login_form);
        assert_eq!(report.raw_hrefs.len(), 2);
        assert_eq!(report.html_version, UNKNOWN_HTML_VERSION);
    }
}
