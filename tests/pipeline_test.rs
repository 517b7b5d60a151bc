//! End-to-end fetch + extract tests against a mock HTTP server.
//!
//! These cover the path a worker takes once a candidate URL answers:
//! fetch the page, follow redirects, and pull the company name and contact
//! URL out of the HTML.

use policyscout::{extract, fetch_html, init_client, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> reqwest::Client {
    init_client(&Config {
        timeout_seconds: 5,
        user_agent: "policyscout-test/0.1".into(),
        ..Default::default()
    })
    .expect("client should build")
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_copyright_footer_yields_company_and_contact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(html_response(
            r#"<html><head><title>Privacy Policy</title></head><body>
            <main><p>We take your privacy seriously.</p></main>
            <nav><a href="/contact-us">Contact</a></nav>
            <footer>&copy; 2024 Acme Corp. All rights reserved.</footer>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let page = fetch_html(&test_client(), &format!("{}/privacy", server.uri()))
        .await
        .unwrap();
    let extraction = extract(&page.body, &page.final_url);

    assert_eq!(extraction.company_name.as_deref(), Some("Acme Corp."));
    assert_eq!(
        extraction.contact_url.as_deref(),
        Some(format!("{}/contact-us", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_redirected_page_resolves_contact_against_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/legal/privacy-notice"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legal/privacy-notice"))
        .respond_with(html_response(
            r#"<html><body>
            <a href="contact">Get in touch</a>
            <p>Copyright 2023 Initech Industries Inc.</p>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let page = fetch_html(&test_client(), &format!("{}/privacy", server.uri()))
        .await
        .unwrap();
    assert!(page.final_url.path().ends_with("/legal/privacy-notice"));

    let extraction = extract(&page.body, &page.final_url);
    assert_eq!(
        extraction.company_name.as_deref(),
        Some("Initech Industries Inc.")
    );
    // Relative href resolves against the post-redirect URL.
    assert_eq!(
        extraction.contact_url.as_deref(),
        Some(format!("{}/legal/contact", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_page_without_signals_extracts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/terms"))
        .respond_with(html_response(
            "<html><body><p>lorem ipsum dolor sit amet</p></body></html>",
        ))
        .mount(&server)
        .await;

    let page = fetch_html(&test_client(), &format!("{}/terms", server.uri()))
        .await
        .unwrap();
    let extraction = extract(&page.body, &page.final_url);

    assert!(extraction.is_empty());
}

#[tokio::test]
async fn test_title_fallback_when_footer_has_no_copyright() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(html_response(
            r#"<html><head><title>Privacy Policy | Globex</title></head>
            <body><p>How Globex handles your data.</p></body></html>"#,
        ))
        .mount(&server)
        .await;

    let page = fetch_html(&test_client(), &format!("{}/privacy", server.uri()))
        .await
        .unwrap();
    let extraction = extract(&page.body, &page.final_url);

    assert_eq!(extraction.company_name.as_deref(), Some("Globex"));
}
