use std::future::Future;
use std::sync::Arc;

use crmview::crmview_data::{ContentType, FilterValue, QueryArgs, RequestContext, ViewSettings};
use crmview::prelude::*;
use crmview_test::MockApi;
use serde_json::json;

fn contact_api() -> Arc<MockApi> {
    Arc::new(
        MockApi::new()
            .with_processor("5", "Contact", "get")
            .with_fields("Contact", &[("first_name", "First Name"), ("last_name", "Last Name")])
            .respond_values(
                "Contact",
                "get",
                vec![
                    json!({"id": "3", "title": "Jane Doe", "first_name": "Jane", "last_name": "Doe", "hash": "x1"}),
                    json!({"id": "7", "title": "John Roe", "first_name": "John", "last_name": "Roe", "hash": "x2"}),
                ],
            )
            .respond("Contact", "getcount", ApiResponse::scalar(12)),
    )
}

struct Posts {
    items: Vec<Item>,
}

impl LocalStore for Posts {
    fn query(&self, _args: &QueryArgs) -> impl Future<Output = Vec<Item>> + Send {
        std::future::ready(self.items.clone())
    }

    fn count(&self, _args: &QueryArgs) -> impl Future<Output = u64> + Send {
        std::future::ready(self.items.len() as u64 + 40)
    }
}

#[tokio::test]
async fn external_list_renders_remote_records() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let mut ctx = RequestContext::new(ViewSettings::external("5").sort("sort_name ASC"));

    let page = hooks.load_page(&mut ctx, &NoStore).await;

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 12);

    let jane = &page.content[0];
    assert!(jane.is_external());
    assert!(jane.field("hash").is_none());

    let fields = hooks.render_fields(&mut ctx, jane, &["first_name", "last_name", "content"]).await;
    assert_eq!(fields.len(), 2);
    assert!(fields[0].html.contains("<strong>First Name</strong>: Jane"));
    assert!(fields[1].html.contains("<strong>Last Name</strong>: Doe"));

    let listing = api.calls_to("Contact", "get");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].params, json!({"options": {"sort": "sort_name ASC"}}));
    assert_eq!(api.calls_to("DataProcessorOutput", "get").len(), 1);
    assert_eq!(api.calls_to("Contact", "getfields").len(), 1);
}

#[tokio::test]
async fn posted_page_drives_offset_and_page_metadata() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let mut ctx = RequestContext::new(ViewSettings::external("5").limit("100").paginate("2"))
        .with_posted_query("page=3&city=Paris");

    let page = hooks.load_page(&mut ctx, &NoStore).await;

    assert_eq!(page.page, 3);
    assert_eq!(page.size, 2);
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages, 6);

    let expected = json!({"options": {"limit": 2, "offset": 4}, "city": "Paris"});
    assert_eq!(api.calls_to("Contact", "get")[0].params, expected);
    assert_eq!(api.calls_to("Contact", "getcount")[0].params, expected);
}

#[tokio::test]
async fn count_runs_with_site_query_stages() {
    let api = contact_api();
    let mut hooks = Hooks::new().install(Arc::clone(&api));
    hooks.query_parameters.add(
        20,
        stage_fn("site::active_only", |mut args: QueryArgs, _: &(), _: &mut RequestContext| {
            args.api_params = args
                .api_params
                .map(|params| params.filter("is_deleted", FilterValue::Literal("0".into())));
            args
        }),
    );
    let mut ctx = RequestContext::new(ViewSettings::external("5"));

    hooks.load_page(&mut ctx, &NoStore).await;

    let expected = json!({"options": {}, "is_deleted": "0"});
    assert_eq!(api.calls_to("Contact", "get")[0].params, expected);
    assert_eq!(api.calls_to("Contact", "getcount")[0].params, expected);
}

#[tokio::test]
async fn huge_posted_page_does_not_break_the_request() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let mut ctx = RequestContext::new(ViewSettings::external("5").paginate("10"))
        .with_posted_query("page=18446744073709551615");

    let page = hooks.load_page(&mut ctx, &NoStore).await;

    assert_eq!(page.page, u64::MAX);
    assert_eq!(
        api.calls_to("Contact", "get")[0].params["options"]["offset"],
        json!(u64::MAX)
    );
}

#[tokio::test]
async fn other_content_types_use_local_store() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let store = Posts {
        items: vec![Item::new(json!(1), "Hello world", "post")],
    };
    let mut ctx = RequestContext::new(ViewSettings::default());

    let page = hooks.load_page(&mut ctx, &store).await;

    assert_eq!(page.content, store.items);
    assert_eq!(page.total_elements, 41);
    assert_eq!(api.call_count(), 0);

    let post = &page.content[0];
    let href = hooks.href(&mut ctx, post, "https://site.example.org/?p=1".into()).await;
    assert_eq!(href, "https://site.example.org/?p=1");
}

#[tokio::test]
async fn external_list_without_processor_is_empty() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let store = Posts {
        items: vec![Item::new(json!(1), "Hello world", "post")],
    };
    let mut ctx = RequestContext::new(ViewSettings::external(""));

    let page = hooks.load_page(&mut ctx, &store).await;

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn detail_links_follow_base_url() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let mut ctx = RequestContext::new(ViewSettings::external("5").link_url("https://crm.example.org/contact"));

    let page = hooks.load_page(&mut ctx, &NoStore).await;
    let href = hooks.href(&mut ctx, &page.content[1], "https://site.example.org/?p=7".into()).await;

    assert_eq!(href, "https://crm.example.org/contact?id=7");
}

#[tokio::test]
async fn settings_form_hooks() {
    let api = contact_api();
    let hooks = Hooks::new().install(Arc::clone(&api));
    let mut ctx = RequestContext::new(ViewSettings::external("5"));

    let types = hooks
        .content_type_options(&mut ctx, vec![ContentType::new("post", "Post"), ContentType::new("page", "Page")])
        .await;
    assert_eq!(types.last(), Some(&ContentType::new("civicrm", "CiviCRM")));

    let settings = DisplaySettings::for_request(&ctx, Vec::new());
    let settings = hooks.display_settings.run(settings, &(), &mut ctx).await;
    let names: Vec<_> = settings.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["first_name", "last_name"]);
}

#[test]
fn stages_register_in_priority_order() {
    let mut hooks = Hooks::new().install(contact_api());
    hooks
        .field_item_html
        .add(10, stage_fn("theme::wrap", |mut field: FieldHtml, _: &Item, _: &mut RequestContext| {
            field.html = format!("<li>{}</li>", field.html);
            field
        }));

    assert_eq!(hooks.field_item_html.names(), vec!["crmview::field_item_html", "theme::wrap"]);
    assert_eq!(hooks.pre_query.names(), vec!["crmview::pre_query"]);
}
