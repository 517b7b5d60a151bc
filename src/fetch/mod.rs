//! HTTP fetching.
//!
//! One GET per call, bounded by the client's timeout and redirect limit.
//! Every failure mode maps to a [`FetchError`] variant; retry policy lives
//! with the Domain Processor and Scheduler, never here.

use log::debug;
use reqwest::Url;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::FetchError;

/// A successfully fetched HTML page.
#[derive(Debug, Clone)]
pub struct RawHtml {
    /// The URL the response actually came from, after redirects.
    pub final_url: Url,
    pub body: String,
}

/// Fetches a URL and returns its HTML body.
///
/// Requirements for success: a 2xx status and an HTML content type (a missing
/// `Content-Type` header is given the benefit of the doubt). Bodies larger
/// than [`MAX_RESPONSE_BODY_SIZE`] are truncated, not rejected; the
/// extraction heuristics only need the head and footer regions anyway.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<RawHtml, FetchError> {
    debug!("Fetching {url}");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(FetchError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::BadStatus(status.as_u16()));
    }

    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        let lowered = content_type.to_lowercase();
        if !lowered.contains("html") && !lowered.contains("xhtml") {
            return Err(FetchError::NotHtml(content_type.to_string()));
        }
    }

    let final_url = response.url().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest)?;

    let slice = if bytes.len() > MAX_RESPONSE_BODY_SIZE {
        debug!(
            "Truncating {} byte response from {} to {} bytes",
            bytes.len(),
            final_url,
            MAX_RESPONSE_BODY_SIZE
        );
        &bytes[..MAX_RESPONSE_BODY_SIZE]
    } else {
        &bytes[..]
    };
    let body = String::from_utf8_lossy(slice).into_owned();

    Ok(RawHtml { final_url, body })
}
