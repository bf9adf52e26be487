//! Integration tests for the dataset.

use wikileaders_core::{Country, Dataset, LeaderSkeleton, RecordStatus, Slot};

fn populated() -> Dataset {
    let mut dataset = Dataset::new();
    for code in ["us", "fr"] {
        let country = Country::new(code).unwrap();
        let leaders = (0..3)
            .map(|i| LeaderSkeleton::new(format!("L{i}"), code, format!("https://w/{code}/{i}")))
            .collect();
        dataset.insert_country(country, leaders).unwrap();
    }
    dataset
}

#[test]
fn test_enrichment_order_does_not_matter() {
    let slots = populated().pending_documents();

    let mut forward = populated();
    for (slot, url) in &slots {
        forward.set_paragraph(slot, Some(format!("text of {url}"))).unwrap();
    }

    let mut backward = populated();
    for (slot, url) in slots.iter().rev() {
        backward.set_paragraph(slot, Some(format!("text of {url}"))).unwrap();
    }

    assert_eq!(forward, backward);
    assert!(forward.pending_documents().is_empty());
}

#[test]
fn test_failure_is_isolated_to_its_slot() {
    let mut dataset = populated();
    let us = Country::new("us").unwrap();

    dataset.set_paragraph(&Slot::new(us.clone(), 0), Some("A".into())).unwrap();
    dataset.mark_failed(&Slot::new(us.clone(), 1), "HTTP 500").unwrap();
    dataset.set_paragraph(&Slot::new(us.clone(), 2), Some("C".into())).unwrap();

    let records = dataset.leaders(&us).unwrap();
    assert_eq!(records[0].paragraph.as_deref(), Some("A"));
    assert_eq!(records[1].status, RecordStatus::FetchFailed("HTTP 500".into()));
    assert_eq!(records[2].paragraph.as_deref(), Some("C"));
}

#[test]
fn test_every_pending_slot_resolves_to_a_record() {
    let dataset = populated();
    let pending = dataset.pending_documents();
    assert_eq!(pending.len(), 6);

    for (slot, url) in pending {
        let record = dataset.record(&slot).unwrap();
        assert_eq!(record.document_url(), url);
    }
}
