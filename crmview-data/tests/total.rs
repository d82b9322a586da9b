use crmview_core::ApiResponse;
use crmview_data::{alter_query_args, resolve_total, FilterValue, QueryArgs, RequestContext, ViewSettings};
use crmview_test::MockApi;
use serde_json::json;

/// Count the list of `ctx` with the arguments the listing would run with.
async fn total(api: &MockApi, ctx: &mut RequestContext, default: u64) -> u64 {
    let args = QueryArgs::for_request(ctx);
    let args = alter_query_args(api, ctx, args).await;
    resolve_total(api, ctx, &args, default).await
}

#[tokio::test]
async fn other_content_types_keep_default() {
    let api = MockApi::new();
    let mut ctx = RequestContext::new(ViewSettings::default());

    assert_eq!(total(&api, &mut ctx, 12).await, 12);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn count_action_result_is_the_total() {
    let api = MockApi::new()
        .with_processor("5", "Contact", "get")
        .respond("Contact", "getcount", ApiResponse::scalar(42));
    let mut ctx = RequestContext::new(ViewSettings::external("5"));

    assert_eq!(total(&api, &mut ctx, 3).await, 42);
}

#[tokio::test]
async fn count_uses_the_listing_filters() {
    let api = MockApi::new()
        .with_processor("5", "Contact", "get")
        .respond("Contact", "getcount", ApiResponse::scalar("7"));
    let mut ctx = RequestContext::new(ViewSettings::external("5").paginate("10"))
        .with_posted_query("city=Paris&page=2")
        .with_offset(10);

    assert_eq!(total(&api, &mut ctx, 0).await, 7);

    let counts = api.calls_to("Contact", "getcount");
    assert_eq!(counts.len(), 1);
    assert_eq!(
        counts[0].params,
        json!({"options": {"limit": 10, "offset": 10}, "city": "Paris"})
    );
}

#[tokio::test]
async fn failed_count_is_zero() {
    let api = MockApi::new()
        .with_processor("5", "Contact", "get")
        .fail("Contact", "getcount", "DB Error");
    let mut ctx = RequestContext::new(ViewSettings::external("5"));

    assert_eq!(total(&api, &mut ctx, 12).await, 0);
}

#[tokio::test]
async fn transport_failure_is_zero() {
    let api = MockApi::new()
        .with_processor("5", "Contact", "get")
        .fail_transport("Contact", "getcount", "connection reset");
    let mut ctx = RequestContext::new(ViewSettings::external("5"));

    assert_eq!(total(&api, &mut ctx, 12).await, 0);
}

#[tokio::test]
async fn missing_or_unknown_processor_is_zero() {
    let api = MockApi::new().respond_values("DataProcessorOutput", "get", vec![]);

    let mut ctx = RequestContext::new(ViewSettings::external(""));
    assert_eq!(total(&api, &mut ctx, 12).await, 0);
    assert_eq!(api.call_count(), 0);

    let mut ctx = RequestContext::new(ViewSettings::external("42"));
    assert_eq!(total(&api, &mut ctx, 12).await, 0);
}

#[tokio::test]
async fn count_sees_filters_added_after_translation() {
    let api = MockApi::new()
        .with_processor("5", "Contact", "get")
        .respond("Contact", "getcount", ApiResponse::scalar(3));
    let mut ctx = RequestContext::new(ViewSettings::external("5"));
    let args = QueryArgs::for_request(&ctx);
    let mut args = alter_query_args(&api, &mut ctx, args).await;
    args.api_params = args
        .api_params
        .map(|params| params.filter("is_deleted", FilterValue::Literal("0".into())));

    assert_eq!(resolve_total(&api, &mut ctx, &args, 0).await, 3);
    assert_eq!(
        api.calls_to("Contact", "getcount")[0].params,
        json!({"options": {}, "is_deleted": "0"})
    );
}
