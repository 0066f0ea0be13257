// Controller flows against the in-memory backend: cascade loading, form
// submission, list paging/filtering and soft delete/restore round trips.

use clusterdesk_core::{
    Applied, CacheKey, CachedGateway, ClusterForm, ClusterGateway, ClusterList, FormError,
    FormField, GatewayError, ListError, LocationCascade, Slot, SubmitOutcome,
};
use clusterdesk_proto::prelude::*;

use test_helpers::{MockGateway, DELETED_AT};

// ========== Location cascade ==========

#[tokio::test]
async fn test_cascade_loads_each_level_once_parent_selected() {
    let gw = MockGateway::new();
    let mut cascade = LocationCascade::new();

    assert_eq!(cascade.load_countries(&gw).await, Applied::Applied);
    assert_eq!(cascade.countries().items.len(), 2);

    // Nothing selected yet: no state or city request goes out.
    assert!(cascade.load_states(&gw).await.is_none());
    assert!(cascade.load_cities(&gw).await.is_none());
    assert_eq!(gw.calls(), vec!["countries".to_string()]);

    cascade.select_country(1);
    cascade.load_states(&gw).await;
    assert_eq!(cascade.states().items.len(), 2);

    cascade.select_state(11).unwrap();
    cascade.load_cities(&gw).await;
    assert_eq!(cascade.cities().items[0].name, "Kochi");
    cascade.select_city(110).unwrap();

    assert_eq!(cascade.country_name(), Some("India"));
    assert_eq!(cascade.state_name(), Some("Kerala"));
    assert_eq!(cascade.city_name(), Some("Kochi"));
}

#[tokio::test]
async fn test_switching_country_leaves_descendants_unselected() {
    let gw = MockGateway::new();
    let mut cascade = LocationCascade::new();
    cascade.select_country(1);
    cascade.load_states(&gw).await;
    cascade.select_state(10).unwrap();
    cascade.load_cities(&gw).await;
    cascade.select_city(100).unwrap();

    cascade.select_country(2);
    cascade.load_states(&gw).await;

    assert_eq!(cascade.state(), Slot::Unselected);
    assert_eq!(cascade.city(), Slot::Unselected);
    assert!(cascade.cities().items.is_empty());
    assert_eq!(cascade.states().items, vec![LocationNode::new(20, "Bagmati")]);
}

#[tokio::test]
async fn test_late_states_response_for_old_country_is_dropped() {
    let gw = MockGateway::new();
    let mut cascade = LocationCascade::new();

    cascade.select_country(1);
    let ticket_a = cascade.request_states().unwrap();
    cascade.select_country(2);
    let ticket_b = cascade.request_states().unwrap();

    let (resp_a, resp_b) = tokio::join!(gw.list_states(1), gw.list_states(2));

    // B resolves first, then A arrives late.
    assert_eq!(cascade.complete(ticket_b, resp_b), Applied::Applied);
    assert_eq!(cascade.complete(ticket_a, resp_a), Applied::Discarded);
    assert_eq!(cascade.states().items, vec![LocationNode::new(20, "Bagmati")]);
}

#[tokio::test]
async fn test_gateway_fails_fast_without_parent() {
    let gw = MockGateway::new();
    let err = gw.list_states_for(None).await.unwrap_err();
    assert_eq!(err, GatewayError::MissingParent("country"));
    let err = gw.list_cities_for(None).await.unwrap_err();
    assert_eq!(err, GatewayError::MissingParent("state"));
    assert!(gw.calls().is_empty());
}

// ========== Request cache ==========

#[tokio::test]
async fn test_cache_serves_repeat_location_requests() {
    let cached = CachedGateway::new(MockGateway::new());

    cached.list_countries().await.unwrap();
    cached.list_countries().await.unwrap();
    cached.list_states(1).await.unwrap();
    cached.list_states(1).await.unwrap();
    cached.list_states(2).await.unwrap();

    assert_eq!(cached.inner().call_count("countries"), 1);
    assert_eq!(cached.inner().call_count("states:1"), 1);
    assert_eq!(cached.inner().call_count("states:2"), 1);
    assert!(cached.is_cached(&CacheKey::States(1)));
    assert_eq!(cached.len(), 3);

    assert!(cached.invalidate(&CacheKey::States(1)));
    cached.list_states(1).await.unwrap();
    assert_eq!(cached.inner().call_count("states:1"), 2);

    cached.clear();
    assert!(cached.is_empty());
}

#[tokio::test]
async fn test_cache_skips_failures_and_cluster_pages() {
    let cached = CachedGateway::new(MockGateway::new().with_clusters(3));

    cached
        .inner()
        .fail_next(GatewayError::Network("flaky".to_string()));
    assert!(cached.list_countries().await.is_err());
    assert!(!cached.is_cached(&CacheKey::Countries));
    assert!(cached.list_countries().await.is_ok());

    let filters = FilterCriteria::default();
    cached.list_clusters(1, &filters).await.unwrap();
    cached.list_clusters(1, &filters).await.unwrap();
    assert_eq!(cached.inner().call_count("list:"), 2);
}

#[tokio::test]
async fn test_clones_share_one_cache() {
    let a = CachedGateway::new(MockGateway::new());
    let b = a.clone();
    a.list_cities(10).await.unwrap();
    assert!(b.is_cached(&CacheKey::Cities(10)));
}

#[tokio::test]
async fn test_deselected_parents_are_evicted_from_cache() {
    let cached = CachedGateway::new(MockGateway::new());
    let mut cascade = LocationCascade::new();

    cascade.select_country(1);
    cascade.load_states(&cached).await;
    cascade.select_state(10).unwrap();
    cascade.load_cities(&cached).await;
    assert!(cached.is_cached(&CacheKey::Cities(10)));

    cascade.select_country(2);
    cascade.load_states(&cached).await;
    assert!(!cached.is_cached(&CacheKey::States(1)));
    assert!(!cached.is_cached(&CacheKey::Cities(10)));

    cascade.select_country(1);
    cascade.load_states(&cached).await;
    assert_eq!(cached.inner().call_count("states:1"), 2);
    assert_eq!(cascade.states().items.len(), 2);
    assert!(cached.is_cached(&CacheKey::States(1)));
    assert!(!cached.is_cached(&CacheKey::States(2)));
    assert_eq!(cached.len(), 1);
}

// ========== Create form ==========

async fn filled_form(gw: &MockGateway) -> ClusterForm {
    let mut form = ClusterForm::new();
    form.cascade_mut().load_countries(gw).await;
    form.set_name("Harbour");
    form.set_email("harbour@example.com");
    form.set_location("Pier 9");
    form.select_country(1);
    form.cascade_mut().load_states(gw).await;
    form.select_state(10).unwrap();
    form.cascade_mut().load_cities(gw).await;
    form.select_city(100).unwrap();
    form
}

#[tokio::test]
async fn test_empty_name_never_reaches_network() {
    let gw = MockGateway::new();
    let mut form = ClusterForm::new();
    form.set_email("a@example.com");
    let err = form.submit(&gw).await.unwrap_err();
    assert!(matches!(err, FormError::Required(ref fields) if fields.contains(&FormField::Name)));
    assert!(form.error_for(FormField::Name).is_some());
    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn test_successful_create_resets_form() {
    let gw = MockGateway::new();
    let mut form = filled_form(&gw).await;

    let outcome = form.submit(&gw).await.unwrap();
    let SubmitOutcome::Created(created) = outcome else {
        panic!("expected a created cluster, got {outcome:?}");
    };
    assert_eq!(created.city_name, "Panaji");
    assert_eq!(created.latitude, "0");

    assert_eq!(form.name(), "");
    assert_eq!(form.email(), "");
    assert_eq!(form.location(), "");
    assert_eq!((form.latitude(), form.longitude()), ("0", "0"));
    assert!(form.errors().is_empty());
    assert_eq!(gw.call_count("create"), 1);
}

#[tokio::test]
async fn test_duplicate_email_maps_to_field_error() {
    let gw = MockGateway::new().with_clusters(1);
    let mut form = filled_form(&gw).await;
    form.set_email("c0@example.com");

    let outcome = form.submit(&gw).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::FieldErrors);
    assert_eq!(
        form.error_for(FormField::Email),
        Some("The email has already been taken.")
    );
    assert_eq!(form.email(), "c0@example.com");

    // Fix the field and resubmit.
    form.set_email("fresh@example.com");
    let outcome = form.submit(&gw).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Created(_)));
    assert!(form.errors().is_empty());
}

// ========== Cluster list ==========

#[tokio::test]
async fn test_paging_uses_server_total() {
    let gw = MockGateway::new().with_clusters(95);
    let mut list = ClusterList::new();

    let req = list.apply_filters();
    list.load(&gw, req).await;
    assert_eq!(list.total(), 95);
    assert_eq!(list.total_pages(), 10);
    assert_eq!(list.rows().len(), 10);

    let req = list.set_page(10);
    list.load(&gw, req).await;
    assert_eq!(list.rows().len(), 5);
    assert_eq!(list.numbered_rows().next().map(|(n, _)| n), Some(91));
}

#[tokio::test]
async fn test_apply_filters_returns_to_first_page() {
    let gw = MockGateway::new().with_clusters(40);
    let mut list = ClusterList::new();
    let req = list.set_page(3);
    list.load(&gw, req).await;

    list.set_filter(FilterPatch::default().country_name("Nepal"));
    assert_eq!(list.page(), 3);
    let req = list.apply_filters();
    assert_eq!(req.page, 1);
    list.load(&gw, req).await;
    assert_eq!(list.total(), 20);
    assert!(list.rows().iter().all(|c| c.country_name == "Nepal"));
}

#[tokio::test]
async fn test_client_filter_covers_noncompliant_server() {
    let gw = MockGateway::new().with_clusters(6);
    gw.ignore_filters.set(true);
    let mut list = ClusterList::new();

    list.set_filter(FilterPatch::default().country_name("India"));
    let req = list.apply_filters();
    list.load(&gw, req).await;

    assert_eq!(list.server_rows().len(), 6);
    assert_eq!(list.rows().len(), 3);
    // Page math still follows the server.
    assert_eq!(list.total(), 6);
}

#[tokio::test]
async fn test_soft_delete_then_restore_round_trip() {
    let gw = MockGateway::new().with_clusters(3);
    let mut list = ClusterList::new();
    let req = list.refetch();
    list.load(&gw, req).await;

    let target = list.rows()[1].clone();
    list.delete_selected(&gw, &target).await.unwrap();
    let row = list.rows().iter().find(|c| c.id == target.id).unwrap();
    assert_eq!(row.deleted_at.as_deref(), Some(DELETED_AT));
    assert_eq!(row.status_label(), DELETED_AT);
    // Soft-deleted rows stay listed.
    assert_eq!(list.total(), 3);

    list.restore_selected(&gw, &target).await.unwrap();
    let row = list.rows().iter().find(|c| c.id == target.id).unwrap();
    assert!(row.deleted_at.is_none());
    assert_eq!(row.status_label(), "active");

    let expected: Vec<String> = vec![
        "list:1".into(),
        format!("delete:{}", target.id),
        "list:1".into(),
        format!("restore:{}", target.id),
        "list:1".into(),
    ];
    assert_eq!(gw.calls(), expected);
}

#[tokio::test]
async fn test_failed_delete_keeps_rows_and_reports() {
    let gw = MockGateway::new().with_clusters(2);
    let mut list = ClusterList::new();
    let req = list.refetch();
    list.load(&gw, req).await;
    let before = list.rows().to_vec();

    gw.fail_next(GatewayError::from_response(500, r#"{"message": "db offline"}"#));
    let err = list.delete_selected(&gw, &before[0]).await.unwrap_err();
    assert!(matches!(err, ListError::Gateway(_)));
    assert_eq!(list.rows(), &before[..]);
    assert_eq!(list.notice(), Some("db offline"));
    assert_eq!(gw.call_count("list:"), 1);
    assert!(!list.is_busy());
}

#[tokio::test]
async fn test_mutation_rejected_while_another_pending() {
    let gw = MockGateway::new().with_clusters(2);
    let mut list = ClusterList::new();
    let req = list.refetch();
    list.load(&gw, req).await;
    let row = list.rows()[0].clone();

    let _ticket = list
        .begin_mutation(clusterdesk_core::Mutation::SoftDelete(row.id))
        .unwrap();
    let err = list.restore_selected(&gw, &row).await.unwrap_err();
    assert_eq!(err, ListError::Busy);
    assert_eq!(gw.call_count("restore"), 0);
}

#[tokio::test]
async fn test_edit_flow_loads_by_id_and_refetches() {
    let gw = MockGateway::new().with_clusters(2);
    let mut list = ClusterList::new();
    let req = list.refetch();
    list.load(&gw, req).await;

    list.open_edit_by_id(&gw, 2).await.unwrap();
    if let Some(session) = list.editing_mut() {
        session.patch.name = Some("Renamed".to_string());
    }
    list.submit_edit(&gw).await.unwrap();

    assert!(list.editing().is_none());
    assert_eq!(gw.cluster(2).unwrap().name, "Renamed");
    assert!(list.rows().iter().any(|c| c.id == 2 && c.name == "Renamed"));
    assert_eq!(gw.call_count("show:2"), 1);
    assert_eq!(gw.call_count("update:2"), 1);
}

#[tokio::test]
async fn test_edit_moves_cluster_through_location_dropdowns() {
    let gw = MockGateway::new().with_clusters(2);
    let mut list = ClusterList::new();
    list.open_edit_by_id(&gw, 1).await.unwrap();
    list.load_edit_locations(&gw).await;

    let session = list.editing_mut().unwrap();
    assert_eq!(session.cascade.city(), Slot::Selected(100));
    assert_eq!(session.cascade.cities().items.len(), 1);
    session.select_country(2);
    session.cascade.load_states(&gw).await;
    session.select_state(20).unwrap();

    let err = list.submit_edit(&gw).await.unwrap_err();
    assert_eq!(err, ListError::Incomplete(FormError::Required(vec![FormField::City])));
    assert_eq!(gw.call_count("update"), 0);

    let session = list.editing_mut().unwrap();
    session.cascade.load_cities(&gw).await;
    session.select_city(200).unwrap();
    list.submit_edit(&gw).await.unwrap();

    let moved = gw.cluster(1).unwrap();
    assert_eq!((moved.country_id, moved.country_name.as_str()), (Some(2), "Nepal"));
    assert_eq!((moved.state_id, moved.state_name.as_str()), (Some(20), "Bagmati"));
    assert_eq!((moved.city_id, moved.city_name.as_str()), (Some(200), "Kathmandu"));
    assert!(list.editing().is_none());
}

#[tokio::test]
async fn test_open_edit_by_unknown_id_fails() {
    let gw = MockGateway::new();
    let mut list = ClusterList::new();
    let err = list.open_edit_by_id(&gw, 99).await.unwrap_err();
    match err {
        ListError::Gateway(e) => assert_eq!(e.status(), Some(404)),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(list.editing().is_none());
}
