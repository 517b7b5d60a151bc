//! End-to-end tests through the processor: select, locate, extract, save.
//!
//! The mock server's `host:port` is registered as the tracked domain and the
//! context's locator probes it over plain HTTP, so the production locate and
//! status-transition code runs unmodified against controlled pages.

mod helpers;

use std::sync::Arc;

use chrono::{Duration, Utc};
use policyscout::{
    init_client, run_batch, Config, DomainStatus, DomainStore, Locator, OutcomeKind,
    ProcessingContext,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{create_test_store, seed_domain, short_policy};

fn http_context(store: DomainStore) -> Arc<ProcessingContext> {
    let client = init_client(&Config {
        timeout_seconds: 5,
        user_agent: "policyscout-test/0.1".into(),
        ..Default::default()
    })
    .expect("client should build");
    let mut ctx = ProcessingContext::new(client, store, short_policy());
    ctx.locator = Locator::with_scheme("http");
    Arc::new(ctx)
}

fn host_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

#[tokio::test]
async fn test_policy_page_resolves_to_success() {
    let server = MockServer::start().await;
    // The homepage and the other guessed paths fall through to 404.
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(html_response(
            r#"<html><body>
            <a href="/contact">Contact Us</a>
            <footer>© 2024 Acme Corp. All rights reserved.</footer>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let store = create_test_store().await;
    let domain = host_of(&server);
    store.add(&domain, Utc::now()).await.unwrap();
    let ctx = http_context(store.clone());

    let report = run_batch(Arc::clone(&ctx), 2).await.unwrap();
    assert_eq!(report.selected, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(ctx.stats.count(OutcomeKind::Success), 1);

    let record = store.get(&domain).await.unwrap().unwrap();
    assert_eq!(record.status, DomainStatus::Success);
    assert_eq!(record.company_name.as_deref(), Some("Acme Corp."));
    assert_eq!(
        record.contact_url.as_deref(),
        Some(format!("{}/contact", server.uri()).as_str())
    );
    assert_eq!(
        record.source_url.as_deref(),
        Some(format!("{}/privacy", server.uri()).as_str())
    );
    assert_eq!(record.attempt_count, 1);
    assert!(record.last_checked_at.is_some());
}

#[tokio::test]
async fn test_not_found_preserves_previous_result() {
    let server = MockServer::start().await;
    // Live homepage without policy links; every other path 404s.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response("<html><body>welcome</body></html>"))
        .mount(&server)
        .await;

    let store = create_test_store().await;
    let domain = host_of(&server);
    seed_domain(
        &store,
        &domain,
        DomainStatus::Success,
        1,
        Some(Utc::now() - Duration::days(2)),
    )
    .await;
    let mut record = store.get(&domain).await.unwrap().unwrap();
    record.company_name = Some("Acme Corp.".into());
    record.contact_url = Some("https://acme.example/contact".into());
    record.source_url = Some("https://acme.example/privacy".into());
    store.save(&record).await.unwrap();

    // Past the one-day re-verify window: selected, then nothing resolves.
    let ctx = http_context(store.clone());
    let report = run_batch(ctx, 2).await.unwrap();
    assert_eq!(report.selected, 1);
    assert_eq!(report.not_found, 1);

    let after = store.get(&domain).await.unwrap().unwrap();
    assert_eq!(after.status, DomainStatus::NotFound);
    assert_eq!(after.attempt_count, 2);
    assert_eq!(after.company_name.as_deref(), Some("Acme Corp."));
    assert_eq!(
        after.contact_url.as_deref(),
        Some("https://acme.example/contact")
    );
    assert_eq!(
        after.source_url.as_deref(),
        Some("https://acme.example/privacy")
    );
}

#[tokio::test]
async fn test_empty_extraction_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(html_response(
            "<html><body><p>lorem ipsum dolor sit amet</p></body></html>",
        ))
        .mount(&server)
        .await;

    let store = create_test_store().await;
    let domain = host_of(&server);
    store.add(&domain, Utc::now()).await.unwrap();
    let ctx = http_context(store.clone());

    let report = run_batch(Arc::clone(&ctx), 2).await.unwrap();
    assert_eq!(report.not_found, 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(ctx.stats.count(OutcomeKind::ExtractionEmpty), 1);

    let record = store.get(&domain).await.unwrap().unwrap();
    assert_eq!(record.status, DomainStatus::NotFound);
    assert!(record.company_name.is_none());
}

#[tokio::test]
async fn test_contact_only_reverification_keeps_name_provenance() {
    let server = MockServer::start().await;
    // The re-verified page yields a contact link but no company name.
    Mock::given(method("GET"))
        .and(path("/privacy"))
        .respond_with(html_response(
            r#"<html><body><a href="/contact-form">Contact</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let store = create_test_store().await;
    let domain = host_of(&server);
    seed_domain(
        &store,
        &domain,
        DomainStatus::Success,
        1,
        Some(Utc::now() - Duration::days(2)),
    )
    .await;
    let mut record = store.get(&domain).await.unwrap().unwrap();
    record.company_name = Some("Acme Corp.".into());
    record.source_url = Some("https://acme.example/privacy".into());
    store.save(&record).await.unwrap();

    let ctx = http_context(store.clone());
    let report = run_batch(ctx, 2).await.unwrap();
    assert_eq!(report.succeeded, 1);

    let after = store.get(&domain).await.unwrap().unwrap();
    assert_eq!(after.status, DomainStatus::Success);
    // The kept name still points at the page that yielded it; only the
    // contact URL moved to the new page.
    assert_eq!(after.company_name.as_deref(), Some("Acme Corp."));
    assert_eq!(
        after.source_url.as_deref(),
        Some("https://acme.example/privacy")
    );
    assert_eq!(
        after.contact_url.as_deref(),
        Some(format!("{}/contact-form", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_footer_linked_policy_page_resolves_through_processor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><footer>
            <a href="/about/privacy-statement">Privacy Statement</a>
            </footer></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about/privacy-statement"))
        .respond_with(html_response(
            "<html><body>© 2023 Initech Industries Inc.</body></html>",
        ))
        .mount(&server)
        .await;

    let store = create_test_store().await;
    let domain = host_of(&server);
    store.add(&domain, Utc::now()).await.unwrap();
    let ctx = http_context(store.clone());

    let report = run_batch(ctx, 2).await.unwrap();
    assert_eq!(report.succeeded, 1);

    let record = store.get(&domain).await.unwrap().unwrap();
    assert_eq!(
        record.company_name.as_deref(),
        Some("Initech Industries Inc.")
    );
    assert_eq!(
        record.source_url.as_deref(),
        Some(format!("{}/about/privacy-statement", server.uri()).as_str())
    );
}
