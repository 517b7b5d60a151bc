//! Policy page location.
//!
//! Given a bare domain, finds a privacy/terms page in two sequential phases:
//! fetch the homepage and follow any links that look like policy pages, then
//! fall back to an ordered list of guessed well-known paths. Sequential
//! probing is deliberate: it bounds outbound request volume per domain.

use std::collections::HashSet;

use log::debug;
use url::Url;

use crate::config::MAX_DISCOVERED_LINKS;
use crate::error_handling::FetchError;
use crate::extract::keyword_links;
use crate::fetch::fetch_html;

/// Guessed policy paths, most common first. Order matters: the earlier a path
/// hits, the fewer requests the average domain costs. The German paths carry
/// their weight on `.de` commerce sites, which legally must have an Impressum.
pub const POLICY_PATHS: &[&str] = &[
    "/privacy",
    "/privacy-policy",
    "/privacy-notice",
    "/legal/privacy",
    "/terms",
    "/terms-of-service",
    "/terms-and-conditions",
    "/legal",
    "/impressum",
    "/datenschutz",
];

/// Keywords that mark a homepage link as a likely policy page.
const POLICY_LINK_KEYWORDS: &[&str] = &[
    "privacy",
    "terms",
    "legal",
    "imprint",
    "impressum",
    "datenschutz",
];

/// Outcome of a candidate search for one domain.
#[derive(Debug)]
pub enum Located {
    /// The first candidate that answered with 2xx HTML.
    Found { url: Url, html: String },
    /// At least one candidate got a definitive HTTP answer, but none
    /// resolved. A normal outcome: many domains lack pages at guessed paths.
    NotFound,
    /// Every candidate failed transiently (timeout, DNS, connection). The
    /// domain itself may be down; worth a faster retry than `NotFound`.
    Unreachable,
}

/// Finds policy pages for bare domains.
///
/// Carries the scheme candidates are built with. Production uses `https`;
/// deployments that terminate TLS elsewhere can probe over plain HTTP.
#[derive(Debug, Clone)]
pub struct Locator {
    scheme: &'static str,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Locator { scheme: "https" }
    }

    /// A locator probing over a different scheme.
    pub fn with_scheme(scheme: &'static str) -> Self {
        Locator { scheme }
    }

    /// Host bases for a domain: the bare host plus a `www.` variant. The
    /// variant is skipped when the domain already carries `www.`, is an IP
    /// literal, or pins a port.
    fn host_bases(&self, domain: &str) -> Vec<String> {
        let mut bases = vec![format!("{}://{domain}", self.scheme)];
        let wwwable = !domain.starts_with("www.")
            && !domain.contains(':')
            && domain.parse::<std::net::IpAddr>().is_err();
        if wwwable {
            bases.push(format!("{}://www.{domain}", self.scheme));
        }
        bases
    }

    /// The ordered guessed-candidate list for a domain.
    ///
    /// Path-major: the most common path is exhausted across both hosts before
    /// the next one is tried.
    pub fn candidate_urls(&self, domain: &str) -> Vec<String> {
        let bases = self.host_bases(domain);
        let mut candidates = Vec::with_capacity(POLICY_PATHS.len() * bases.len());
        for path in POLICY_PATHS {
            for base in &bases {
                candidates.push(format!("{base}{path}"));
            }
        }
        candidates
    }

    /// Probes candidates in order; the first 2xx HTML response short-circuits.
    ///
    /// Phase one fetches the homepage and follows up to
    /// [`MAX_DISCOVERED_LINKS`] links whose href or text look like a policy
    /// page. Sites rarely place these pages at guessable paths but almost
    /// always link them from the footer, so discovery goes first. Phase two
    /// walks the guessed paths, skipping URLs already tried.
    pub async fn locate(&self, client: &reqwest::Client, domain: &str) -> Located {
        let mut saw_definitive = false;
        let mut tried: HashSet<String> = HashSet::new();

        for base in self.host_bases(domain) {
            let homepage = format!("{base}/");
            match fetch_html(client, &homepage).await {
                Ok(page) => {
                    // A live homepage settles NotFound vs Unreachable.
                    saw_definitive = true;
                    let links = keyword_links(&page.body, &page.final_url, POLICY_LINK_KEYWORDS);
                    for link in links.into_iter().take(MAX_DISCOVERED_LINKS) {
                        if !tried.insert(link.clone()) {
                            continue;
                        }
                        match fetch_html(client, &link).await {
                            Ok(page) => {
                                debug!("Located policy page for {domain} at {}", page.final_url);
                                return Located::Found {
                                    url: page.final_url,
                                    html: page.body,
                                };
                            }
                            Err(e) => {
                                debug!("Discovered link {link} failed: {e}");
                                note_outcome(&e, &mut saw_definitive);
                            }
                        }
                    }
                    break;
                }
                Err(e) => {
                    debug!("Homepage {homepage} failed: {e}");
                    note_outcome(&e, &mut saw_definitive);
                }
            }
        }

        for candidate in self.candidate_urls(domain) {
            if !tried.insert(candidate.clone()) {
                continue;
            }
            match fetch_html(client, &candidate).await {
                Ok(page) => {
                    debug!("Located policy page for {domain} at {}", page.final_url);
                    return Located::Found {
                        url: page.final_url,
                        html: page.body,
                    };
                }
                Err(e) => {
                    debug!("Candidate {candidate} failed: {e}");
                    note_outcome(&e, &mut saw_definitive);
                }
            }
        }

        if saw_definitive {
            Located::NotFound
        } else {
            Located::Unreachable
        }
    }
}

fn note_outcome(error: &FetchError, saw_definitive: &mut bool) {
    if !error.is_transient() {
        *saw_definitive = true;
    }
}
