mod common;

use common::{params, pies, Grandma, MockApplePie, ALICE, BOB};
use http::StatusCode;
use resource_pipeline::mock::MockCollection;
use resource_pipeline::render::RenderContext;
use resource_pipeline::rescue::ErrorTranslator;
use resource_pipeline::{
    Action, ActionDispatcher, ActionRequest, Body, FixedLocator, Flash, ParamsFilter,
    ResponseOutcome, StoreError,
};
use serde_json::json;
use std::sync::Arc;

fn pie(id: u64, grandma_id: u64) -> MockApplePie {
    MockApplePie {
        id: Some(id),
        grandma_id,
        ingredients: "apples".into(),
        ..MockApplePie::default()
    }
}

fn deny_all(_: &Grandma, _: Action, _: Option<&MockApplePie>) -> bool {
    false
}

fn dispatcher_over(
    mock: &MockCollection<MockApplePie>,
    gate: impl Fn(&Grandma, Action, Option<&MockApplePie>) -> bool + Send + Sync + 'static,
) -> ActionDispatcher<MockApplePie, Grandma> {
    ActionDispatcher::builder(pies())
        .locator(FixedLocator::new(Arc::new(mock.clone())))
        .authorization(gate)
        .permitted_params(ParamsFilter::new().create(["ingredients"]).update(["ingredients"]))
        .build()
        .expect("Failed to build dispatcher")
}

/// Pattern: pipeline + mocked store.
/// No store expectation is registered for the mutation, so reaching the
/// store after a denial would panic the mock.
#[tokio::test]
async fn test_denied_create_never_reaches_the_store() {
    let mock = MockCollection::<MockApplePie>::new();
    let dispatcher = dispatcher_over(&mock, deny_all);

    let outcome = dispatcher
        .dispatch(&ALICE, ActionRequest::create(params(json!({ "ingredients": "apples" }))).json())
        .await
        .unwrap();

    assert_eq!(outcome.status, StatusCode::FORBIDDEN);
    assert_eq!(outcome.body, Body::Empty);
    assert_eq!(mock.received().mutations(), 0);
    mock.verify();
}

#[tokio::test]
async fn test_denied_update_and_destroy_locate_but_never_mutate() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_find(1).return_ok(Some(pie(1, 1)));
    mock.expect_find(1).return_ok(Some(pie(1, 1)));
    let dispatcher = dispatcher_over(&mock, deny_all);

    // Both actions find the pie, then stop at the gate
    let update = dispatcher
        .dispatch(&ALICE, ActionRequest::update("1", params(json!({ "ingredients": "pears" }))).json())
        .await
        .unwrap();
    assert_eq!(update.status, StatusCode::FORBIDDEN);

    let destroy = dispatcher.dispatch(&ALICE, ActionRequest::destroy("1")).await.unwrap();
    assert_eq!(destroy.status, StatusCode::FORBIDDEN);
    assert_eq!(destroy.body, Body::Text("Forbidden".into()));

    assert_eq!(mock.received().mutations(), 0);
    mock.verify();
}

#[tokio::test]
async fn test_denied_list_never_reads_the_store() {
    let mock = MockCollection::<MockApplePie>::new();
    let dispatcher = dispatcher_over(&mock, deny_all);

    let outcome = dispatcher.dispatch(&ALICE, ActionRequest::list().json()).await.unwrap();
    assert_eq!(outcome.status, StatusCode::FORBIDDEN);
    assert!(mock.received().queries.is_empty());
}

#[tokio::test]
async fn test_unknown_identifier_wins_over_denial() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_find(555).return_ok(None);
    let dispatcher = dispatcher_over(&mock, deny_all);

    let outcome = dispatcher.dispatch(&ALICE, ActionRequest::show("555").json()).await.unwrap();
    assert_eq!(outcome.status, StatusCode::NOT_FOUND);
    mock.verify();
}

#[tokio::test]
async fn test_gate_sees_the_located_record() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_find(1).return_ok(Some(pie(1, BOB.id)));
    mock.expect_find(1).return_ok(Some(pie(1, BOB.id)));
    let owner_only = |grandma: &Grandma, _: Action, pie: Option<&MockApplePie>| {
        pie.map_or(true, |p| p.grandma_id == grandma.id)
    };
    let dispatcher = dispatcher_over(&mock, owner_only);

    // Alice is not the owner
    let stranger = dispatcher.dispatch(&ALICE, ActionRequest::show("1").json()).await.unwrap();
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    // Bob is
    let owner = dispatcher.dispatch(&BOB, ActionRequest::show("1").json()).await.unwrap();
    assert_eq!(owner.status, StatusCode::OK);
    mock.verify();
}

#[tokio::test]
async fn test_gate_decides_per_action() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_find(1).return_ok(Some(pie(1, 1)));
    mock.expect_find(1).return_ok(Some(pie(1, 1)));
    let read_only = |_: &Grandma, action: Action, _: Option<&MockApplePie>| !action.is_mutating();
    let dispatcher = dispatcher_over(&mock, read_only);

    let show = dispatcher.dispatch(&ALICE, ActionRequest::show("1").json()).await.unwrap();
    assert_eq!(show.status, StatusCode::OK);

    let destroy = dispatcher.dispatch(&ALICE, ActionRequest::destroy("1").json()).await.unwrap();
    assert_eq!(destroy.status, StatusCode::FORBIDDEN);

    let new = dispatcher.dispatch(&ALICE, ActionRequest::new_form().json()).await.unwrap();
    assert_eq!(new.status, StatusCode::OK);

    assert_eq!(mock.received().deletes, 0);
    mock.verify();
}

#[tokio::test]
async fn test_store_receives_only_permitted_params() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_create().return_ok(pie(1, 1));
    let dispatcher = dispatcher_over(&mock, |_: &Grandma, _: Action, _: Option<&MockApplePie>| true);

    let outcome = dispatcher
        .dispatch(
            &ALICE,
            ActionRequest::create(params(json!({ "ingredients": "apples", "secret": "lard" }))).json(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.status, StatusCode::CREATED);

    let received = mock.received();
    assert_eq!(received.create_params, vec![params(json!({ "ingredients": "apples" }))]);
    mock.verify();
}

#[tokio::test]
async fn test_unavailable_store_is_an_internal_error() {
    let mock = MockCollection::<MockApplePie>::new();
    mock.expect_all().return_err(StoreError::Closed);
    let dispatcher = dispatcher_over(&mock, |_: &Grandma, _: Action, _: Option<&MockApplePie>| true);

    let outcome = dispatcher.dispatch(&ALICE, ActionRequest::list()).await.unwrap();
    assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(outcome.body, Body::Text("Internal Server Error".into()));
}

/// Sends denied browsers home instead of showing a bare 403.
struct RedirectHome;

impl ErrorTranslator for RedirectHome {
    fn forbidden(&self, _cx: &RenderContext<'_>) -> ResponseOutcome {
        ResponseOutcome::redirect("/").with_flash(Flash::Error("You are not allowed to do that".into()))
    }
}

#[tokio::test]
async fn test_custom_forbidden_response() {
    let mock = MockCollection::<MockApplePie>::new();
    let dispatcher = ActionDispatcher::<MockApplePie, Grandma>::builder(pies())
        .locator(FixedLocator::new(Arc::new(mock.clone())))
        .authorization(deny_all)
        .errors(RedirectHome)
        .build()
        .unwrap();

    let outcome = dispatcher.dispatch(&ALICE, ActionRequest::new_form()).await.unwrap();
    assert_eq!(outcome.status, StatusCode::FOUND);
    assert_eq!(outcome.location.as_deref(), Some("/"));
    assert_eq!(
        outcome.flash,
        Some(Flash::Error("You are not allowed to do that".into()))
    );
    mock.verify();
}
