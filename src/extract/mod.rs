//! Company name and contact URL extraction.
//!
//! Heuristic extraction over fetched policy pages. Everything here is
//! approximate by design: each heuristic yields an `Option`, the first
//! non-empty validated match per field wins, and malformed HTML degrades to
//! "nothing found" rather than an error.
//!
//! Company name heuristics, in priority order:
//! 1. Copyright notices (`© 2024 Acme Corp.`).
//! 2. `<title>` text with policy-page suffixes stripped.
//! 3. A capitalized phrase carrying a corporate suffix (`Inc.`, `GmbH`, ...).
//!
//! The contact URL is the first anchor whose href or text mentions
//! "contact", resolved against the page URL.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Result of running the extraction heuristics over one page.
///
/// Both fields are independently present or absent; callers decide what a
/// partially filled result means.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub company_name: Option<String>,
    pub contact_url: Option<String>,
}

impl Extraction {
    /// True when no heuristic matched at all.
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none() && self.contact_url.is_none()
    }
}

// Corporate suffixes shared by the copyright cleanup and the standalone
// suffix heuristic. Longer alternatives first so "Corporation" is not
// clipped to "Corp".
const CORPORATE_SUFFIXES: &str =
    r"Corporation|Corp\.?|Incorporated|Inc\.?|Limited|Ltd\.?|LLC|GmbH|B\.V\.|Pty\.?\s+Ltd\.?|S\.A\.";

static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // `© <year(s)> <name>`, also `Copyright 2024 ...` and `(c) 2024 ...`,
    // with optional year ranges. The capture is cleaned up afterwards.
    Regex::new(
        r"(?i)(?:©|\(c\)|copyright)\s*(?:©|\(c\))?\s*(?:19|20)\d{2}(?:\s*[-–—]\s*(?:19|20)\d{2})?[.,]?\s+([A-Za-z][A-Za-z0-9&'’.,\- ]{2,79})",
    )
    .expect("copyright pattern is valid")
});

static CORPORATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Capitalized phrase of up to six words ending in a corporate suffix.
    // Case-sensitive on purpose, and every interior word must be capitalized
    // too, so prose like "operated by" never leaks into the name.
    Regex::new(&format!(
        r"([A-Z][A-Za-z0-9&'’.\-]*(?:\s+[A-Z0-9&][A-Za-z0-9&'’.\-]*){{0,5}}\s+(?:{CORPORATE_SUFFIXES}))(?:[^A-Za-z]|$)"
    ))
    .expect("corporate suffix pattern is valid")
});

static SUFFIX_CUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // The trailing guard keeps "Inc" from matching inside "Increase".
    Regex::new(&format!(r"\b((?:{CORPORATE_SUFFIXES}))(?:[^A-Za-z]|$)"))
        .expect("suffix cut pattern is valid")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
    )
    .expect("script strip pattern is valid")
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    // Only called with literal, known-good CSS.
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector '{css}': {e}"))
}

/// Phrases that show up next to copyright notices but are never part of a
/// company name. A captured candidate is cut at the first occurrence.
const BOILERPLATE: &[&str] = &[
    "all rights reserved",
    "privacy policy",
    "privacy notice",
    "terms of",
    "terms and conditions",
    "cookie policy",
    "legal notice",
    "sitemap",
    "contact us",
    "about us",
];

/// Keywords that mark a `<title>` segment as page boilerplate rather than a
/// site or company name.
const TITLE_KEYWORDS: &[&str] = &[
    "privacy", "terms", "policy", "legal", "cookie", "impressum", "datenschutz",
];

/// Runs all heuristics over a fetched page.
///
/// `page_url` anchors relative contact links. Never fails: html5ever parses
/// anything, and a page where nothing matches yields an empty result.
pub fn extract(html: &str, page_url: &Url) -> Extraction {
    let document = Html::parse_document(html);
    let text = visible_text(html);

    let company_name = company_from_copyright(&text)
        .or_else(|| company_from_title(&document))
        .or_else(|| company_from_corporate_suffix(&text));

    let contact_url = contact_url(&document, page_url);

    Extraction {
        company_name,
        contact_url,
    }
}

/// Collapses a page to its visible text: script/style/noscript stripped,
/// whitespace normalized to single spaces.
fn visible_text(html: &str) -> String {
    let stripped = SCRIPT_RE.replace_all(html, " ");
    let document = Html::parse_document(&stripped);
    let joined: Vec<&str> = document.root_element().text().collect();
    joined
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Priority 1: copyright notices. First validated capture wins.
fn company_from_copyright(text: &str) -> Option<String> {
    COPYRIGHT_RE
        .captures_iter(text)
        .filter_map(|caps| clean_candidate(caps.get(1)?.as_str(), true))
        .next()
}

/// Priority 2: `<title>` text with policy suffixes stripped.
fn company_from_title(document: &Html) -> Option<String> {
    let title_text: String = document
        .select(&TITLE_SELECTOR)
        .next()?
        .text()
        .collect::<String>();
    let title_text = title_text.trim();
    if title_text.is_empty() {
        return None;
    }

    // Titles like "Privacy Policy - Acme Corp" or "Acme | Terms" carry the
    // name in one segment and boilerplate in the others.
    for separator in [" - ", " – ", " — ", " | ", " · ", " :: "] {
        if title_text.contains(separator) {
            return title_text
                .split(separator)
                .map(str::trim)
                .filter(|segment| {
                    let lowered = segment.to_lowercase();
                    !TITLE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
                })
                .find_map(|segment| clean_candidate(segment, false));
        }
    }

    let lowered = title_text.to_lowercase();
    if TITLE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return None;
    }
    clean_candidate(title_text, false)
}

/// Priority 3: capitalized phrase with a corporate suffix.
fn company_from_corporate_suffix(text: &str) -> Option<String> {
    CORPORATE_RE
        .captures_iter(text)
        .filter_map(|caps| clean_candidate(caps.get(1)?.as_str(), false))
        .next()
}

/// First anchor mentioning "contact" in its href or link text, resolved
/// against the page URL.
fn contact_url(document: &Html, page_url: &Url) -> Option<String> {
    links_matching(document, page_url, &["contact"]).into_iter().next()
}

/// Anchors whose href or link text contains any keyword (case-insensitive),
/// resolved against `page_url`. Document order, deduplicated, http(s) only.
/// Also drives the locator's homepage link discovery.
pub(crate) fn keyword_links(html: &str, page_url: &Url, keywords: &[&str]) -> Vec<String> {
    links_matching(&Html::parse_document(html), page_url, keywords)
}

fn links_matching(document: &Html, page_url: &Url, keywords: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let link_text: String = anchor.text().collect();
        let href_lowered = href.to_lowercase();
        let text_lowered = link_text.to_lowercase();
        if !keywords
            .iter()
            .any(|kw| href_lowered.contains(kw) || text_lowered.contains(kw))
        {
            continue;
        }
        let Ok(resolved) = page_url.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }
    links
}

/// Trims and validates a raw candidate; `None` means "count as absent".
///
/// `cut_at_suffix` truncates a greedy capture right after the first corporate
/// suffix, so "Acme Corp. Built with love in Berlin" becomes "Acme Corp.".
fn clean_candidate(raw: &str, cut_at_suffix: bool) -> Option<String> {
    let mut candidate = raw.to_string();

    let lowered = candidate.to_lowercase();
    if let Some(idx) = BOILERPLATE
        .iter()
        .filter_map(|phrase| lowered.find(phrase))
        .min()
    {
        candidate.truncate(idx);
    }

    if cut_at_suffix {
        if let Some(m) = SUFFIX_CUT_RE.captures(&candidate).and_then(|c| c.get(1)) {
            candidate.truncate(m.end());
        }
    }

    // Trailing periods stay: they are part of suffixes like "Inc.".
    let candidate = candidate
        .trim()
        .trim_end_matches([',', ';', ':', '|', '-', '&'])
        .trim()
        .to_string();

    if candidate.len() < 3 || !candidate.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    Some(candidate)
}
