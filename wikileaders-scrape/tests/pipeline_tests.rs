//! End-to-end pipeline tests over the mock transport.

use std::sync::Arc;
use std::time::Duration;

use wikileaders_core::{Country, Dataset, FetchedDocument, RecordStatus, Slot};
use wikileaders_fetch::{
    Backoff, FetchSettings, MockReply, MockTransport, RetryPolicy, SessionContext,
};
use wikileaders_scrape::{ScrapeError, ScrapePipeline};

const API: &str = "https://api.test";
const WIKI: &str = "https://en.wikipedia.test/wiki";

fn pipeline(transport: &Arc<MockTransport>, concurrency: usize) -> ScrapePipeline {
    let ctx = SessionContext::builder()
        .transport(transport.clone())
        .retry(RetryPolicy::Attempts(
            Backoff::new(2).with_base_delay(Duration::ZERO),
        ))
        .settings(
            FetchSettings::default()
                .with_api_base_url(API)
                .with_concurrency(concurrency),
        )
        .build()
        .unwrap();
    ScrapePipeline::new(&ctx).unwrap()
}

fn page_url(name: &str) -> String {
    format!("{WIKI}/{name}")
}

fn leaders_body(names: &[&str]) -> String {
    let entries: Vec<String> = names
        .iter()
        .map(|n| {
            format!(
                r#"{{"first_name": "{n}", "last_name": "Doe", "wikipedia_url": "{}"}}"#,
                page_url(n)
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

fn article(name: &str) -> String {
    format!(
        r#"<html><body><div class="mw-content-ltr mw-parser-output">
             <div class="infobox"><p><b>{name}</b> infobox</p></div>
             <p><b>{name} Doe</b>[1] (/dəʊ/; born 1950) is a politician, , and writer.<sup>[2]</sup></p>
           </div></body></html>"#
    )
}

fn script_api(transport: &MockTransport, countries: &[(&str, &[&str])]) {
    transport
        .on(&format!("{API}/cookie"), MockReply::cookie("user_cookie", "c1"))
        .on(&format!("{API}/check"), MockReply::ok(""));

    let codes: Vec<String> = countries.iter().map(|(c, _)| format!("\"{c}\"")).collect();
    transport.on(
        &format!("{API}/countries"),
        MockReply::ok(format!("[{}]", codes.join(","))),
    );

    for (code, names) in countries {
        transport.on(
            &format!("{API}/leaders?country={code}"),
            MockReply::ok(leaders_body(names)),
        );
    }
}

fn country(code: &str) -> Country {
    Country::new(code).unwrap()
}

#[tokio::test]
async fn test_full_run_with_partial_failures() {
    let transport = Arc::new(MockTransport::new());
    script_api(
        &transport,
        &[("us", &["Ann", "Bob"][..]), ("fr", &["Cy", "Dee"][..])],
    );
    transport
        .on(&format!("{API}/leaders?country=be"), MockReply::status(500))
        .on(&page_url("Ann"), MockReply::ok(article("Ann")))
        .on(&page_url("Bob"), MockReply::ok("<p>No bold anywhere.</p>"))
        .on(&page_url("Cy"), MockReply::status(404))
        .on(&page_url("Dee"), MockReply::ok(article("Dee")));

    let pipeline = pipeline(&transport, 3);
    let session = pipeline.open_session().await.unwrap();
    assert_eq!(session.countries, [country("us"), country("fr")]);

    let selection = [country("us"), country("be"), country("fr")];
    let (dataset, report) = pipeline.run(&selection, &session.handle).await.unwrap();

    assert!(!dataset.contains(&country("be")));
    assert_eq!(dataset.len(), 2);

    let us = dataset.leaders(&country("us")).unwrap();
    assert_eq!(
        us[0].paragraph.as_deref(),
        Some("Ann Doe is a politician, and writer.")
    );
    assert_eq!(us[1].status, RecordStatus::NotFound);
    assert!(us[1].paragraph.is_none());

    let fr = dataset.leaders(&country("fr")).unwrap();
    assert!(matches!(fr[0].status, RecordStatus::FetchFailed(_)));
    assert_eq!(
        fr[1].paragraph.as_deref(),
        Some("Dee Doe is a politician, and writer.")
    );

    assert_eq!(report.requested, 4);
    assert_eq!(report.summary.extracted, 2);
    assert_eq!(report.summary.not_found, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.pending, 0);
    assert_eq!(report.layouts.forward, 2);
    assert_eq!(report.layouts.whole_document, 1);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_concurrent_enrichment_matches_sequential() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let transport = Arc::new(MockTransport::new());
    script_api(&transport, &[("us", &names[..4]), ("ma", &names[4..])]);
    for (i, name) in names.iter().enumerate() {
        transport
            .on(&page_url(name), MockReply::ok(article(name)))
            .delay(&page_url(name), Duration::from_millis(((8 - i) * 5) as u64));
    }

    let pipeline = pipeline(&transport, 4);
    let session = pipeline.open_session().await.unwrap();
    let countries = session.countries.clone();

    let mut concurrent = pipeline.populate(&countries, &session.handle).await.unwrap();
    let mut sequential: Dataset = concurrent.clone();

    pipeline.enrich(&mut concurrent).await.unwrap();

    for (slot, url) in sequential.pending_documents() {
        let name = url.rsplit('/').next().unwrap().to_string();
        let document = FetchedDocument::new(slot.clone(), url, article(&name));
        let paragraph = pipeline.process(&document).extraction.into_paragraph();
        sequential.set_paragraph(&slot, paragraph).unwrap();
    }

    assert_eq!(concurrent, sequential);
    assert_eq!(
        concurrent.record(&Slot::new(country("ma"), 3)).unwrap().paragraph.as_deref(),
        Some("H Doe is a politician, and writer.")
    );
}

#[tokio::test]
async fn test_stale_credential_refreshed_once_without_duplicates() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(&format!("{API}/cookie"), MockReply::cookie("user_cookie", "c1"))
        .on(&format!("{API}/cookie"), MockReply::cookie("user_cookie", "c2"))
        .on(&format!("{API}/countries"), MockReply::ok(r#"["us","fr"]"#))
        .on(&format!("{API}/check"), MockReply::ok(""))
        .on(&format!("{API}/check"), MockReply::status(422))
        .on(&format!("{API}/check"), MockReply::ok(""))
        .on(&format!("{API}/leaders?country=us"), MockReply::ok(leaders_body(&["Ann"])))
        .on(&format!("{API}/leaders?country=fr"), MockReply::ok(leaders_body(&["Cy"])));

    let pipeline = pipeline(&transport, 2);
    let session = pipeline.open_session().await.unwrap();
    let dataset = pipeline
        .populate(&session.countries, &session.handle)
        .await
        .unwrap();

    assert_eq!(transport.calls_to(&format!("{API}/cookie")), 2);
    assert_eq!(session.handle.refreshes().await, 1);
    assert_eq!(transport.calls_to(&format!("{API}/leaders?country=fr")), 1);
    assert_eq!(dataset.leaders(&country("fr")).unwrap().len(), 1);
}

#[tokio::test]
async fn test_forbidden_ends_the_run() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(&format!("{API}/cookie"), MockReply::cookie("user_cookie", "c1"))
        .on(&format!("{API}/countries"), MockReply::ok(r#"["us"]"#))
        .on(&format!("{API}/check"), MockReply::status(403));

    let pipeline = pipeline(&transport, 2);
    let session = pipeline.open_session().await.unwrap();
    let err = pipeline
        .populate(&session.countries, &session.handle)
        .await
        .unwrap_err();

    assert!(err.is_forbidden());
    assert!(matches!(err, ScrapeError::Fetch(_)));
    assert_eq!(transport.calls_to(&format!("{API}/leaders?country=us")), 0);
}

#[tokio::test]
async fn test_declined_credential_retry_aborts() {
    let transport = Arc::new(MockTransport::new());
    transport.on(&format!("{API}/cookie"), MockReply::status(503));

    let err = pipeline(&transport, 2).open_session().await.unwrap_err();

    assert!(err.is_aborted());
    assert_eq!(transport.calls_to(&format!("{API}/cookie")), 2);
}
