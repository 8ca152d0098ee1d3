use std::time::Duration;

use explore_charts::data::{
    LoadStatus, VariableData, VariableDataBinder, VariableDataPayload, VariableId,
};

fn variable(id: VariableId) -> VariableData {
    VariableData {
        id,
        name: Some(format!("variable {id}")),
        years: vec![2000, 2001, 2002],
        entities: vec!["USA".to_owned(), "USA".to_owned(), "USA".to_owned()],
        values: vec![Some(1.0), Some(2.0), Some(3.0)],
    }
}

#[test]
fn concurrent_requests_for_the_same_id_fetch_once() {
    let mut binder = VariableDataBinder::new();

    let first = binder.ensure_loaded(&[5]);
    let second = binder.ensure_loaded(&[5]);

    // Exactly one underlying fetch regardless of how many requests raced.
    assert_eq!(binder.take_pending_fetches(), vec![5]);
    assert!(binder.take_pending_fetches().is_empty());

    binder.resolve_fetch(5, Ok(variable(5)));
    assert_eq!(binder.poll(second), LoadStatus::Ready);
    assert_eq!(binder.poll(first), LoadStatus::Superseded);
}

#[test]
fn stale_resolution_never_becomes_the_active_dataset() {
    let mut binder = VariableDataBinder::new();

    let first = binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();

    // Selection moves on before the first fetch lands.
    let second = binder.ensure_loaded(&[7]);
    binder.take_pending_fetches();

    binder.resolve_fetch(5, Ok(variable(5)));
    assert_eq!(binder.poll(first), LoadStatus::Superseded);
    // 7 is still outstanding, so the newest request must not be ready and
    // the stale data for 5 must not surface as the active bundle.
    assert_eq!(binder.poll(second), LoadStatus::Pending);
    if let Some(bundle) = binder.active_bundle() {
        assert!(!bundle.variable_ids().contains(&5));
    }

    binder.resolve_fetch(7, Ok(variable(7)));
    assert_eq!(binder.poll(second), LoadStatus::Ready);
    let bundle = binder.active_bundle().expect("bundle after settle");
    assert_eq!(bundle.variable_ids(), vec![7]);
}

#[test]
fn cached_ids_are_not_refetched() {
    let mut binder = VariableDataBinder::new();

    binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Ok(variable(5)));

    let ticket = binder.ensure_loaded(&[5, 7]);
    assert_eq!(binder.take_pending_fetches(), vec![7]);
    assert_eq!(binder.poll(ticket), LoadStatus::Pending);
}

#[test]
fn partial_failure_keeps_the_succeeded_subset_usable() {
    let mut binder = VariableDataBinder::new();

    let ticket = binder.ensure_loaded(&[5, 7]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Ok(variable(5)));
    binder.resolve_fetch(7, Err("gateway timeout".to_owned()));

    match binder.poll(ticket) {
        LoadStatus::Failed { failed_ids } => assert_eq!(failed_ids, vec![7]),
        status => panic!("expected partial failure, got {status:?}"),
    }

    let bundle = binder.active_bundle().expect("succeeded subset usable");
    assert_eq!(bundle.variable_ids(), vec![5]);
    assert!(binder.failure_reason(7).expect("reason").contains("timeout"));
    let err = binder.fetch_error(7).expect("typed error");
    assert!(err.to_string().contains("variable 7"));
}

#[test]
fn failed_ids_are_retried_on_the_next_request() {
    let mut binder = VariableDataBinder::new();

    binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Err("connection reset".to_owned()));

    let retry = binder.ensure_loaded(&[5]);
    assert_eq!(binder.take_pending_fetches(), vec![5]);
    binder.resolve_fetch(5, Ok(variable(5)));
    assert_eq!(binder.poll(retry), LoadStatus::Ready);
}

#[test]
fn receive_data_reshapes_rows_with_explicit_gaps() {
    let mut binder = VariableDataBinder::new();
    let payload = VariableDataPayload::single(VariableData {
        id: 104_402,
        name: Some("Life expectancy".to_owned()),
        years: vec![2000, 2001, 2003],
        entities: vec!["USA".to_owned(), "USA".to_owned(), "USA".to_owned()],
        values: vec![Some(10.0), Some(20.0), None],
    });

    binder.receive_data(payload).expect("ingest");

    let bundle = binder.active_bundle().expect("bundle");
    let series = bundle.series("USA", 104_402).expect("series");
    // Year 2002 is absent from the rows, so it is absent here too, not
    // inserted as a gap entry.
    assert_eq!(series, [(2000, Some(10.0)), (2001, Some(20.0)), (2003, None)]);
}

#[test]
fn receive_data_rejects_inconsistent_parallel_arrays() {
    let mut binder = VariableDataBinder::new();
    let payload = VariableDataPayload::single(VariableData {
        id: 9,
        name: None,
        years: vec![2000, 2001],
        entities: vec!["USA".to_owned()],
        values: vec![Some(1.0), Some(2.0)],
    });

    assert!(binder.receive_data(payload).is_err());
    assert!(binder.active_bundle().is_none());
}

#[test]
fn unsolicited_resolutions_are_ignored() {
    let mut binder = VariableDataBinder::new();
    binder.resolve_fetch(5, Ok(variable(5)));
    assert!(!binder.is_resident(5));
}

#[test]
fn idle_entries_are_evicted_and_refetchable() {
    let mut binder = VariableDataBinder::new();

    binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Ok(variable(5)));
    assert!(binder.is_resident(5));

    // 5 drops out of the live selection, then idles past the bound.
    binder.ensure_loaded(&[7]);
    binder.evict_idle(Duration::ZERO);
    assert!(!binder.is_resident(5));

    // Re-fetch is possible after eviction.
    binder.ensure_loaded(&[5]);
    assert!(binder.take_pending_fetches().contains(&5));
}

#[test]
fn entries_in_the_live_selection_survive_eviction() {
    let mut binder = VariableDataBinder::new();

    binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Ok(variable(5)));

    binder.evict_idle(Duration::ZERO);
    assert!(binder.is_resident(5));
}

#[test]
fn mismatched_payload_id_is_a_per_id_failure() {
    let mut binder = VariableDataBinder::new();

    let ticket = binder.ensure_loaded(&[5]);
    binder.take_pending_fetches();
    binder.resolve_fetch(5, Ok(variable(6)));

    match binder.poll(ticket) {
        LoadStatus::Failed { failed_ids } => assert_eq!(failed_ids, vec![5]),
        status => panic!("expected failure, got {status:?}"),
    }
}
