mod support;

use frontrunner::api::ApiError;
use frontrunner::encoding::{to_data_url, PartValue, Payload};
use frontrunner::forms::registration::Registration;
use frontrunner::forms::{DeleteOutcome, EntityForm, LoginForm, RegistrationForm, SubmitError};
use frontrunner::model::{ImageSource, StoreType};
use frontrunner::nav;
use frontrunner::shell::Route;
use frontrunner::views::{ProductsView, StorefrontsView};
use reqwest::{Method, StatusCode};
use support::{ok, status, RecordingApi, RecordingNavigator, ScriptedDialogs};
use support::{PRODUCTS_JSON, STOREFRONTS_JSON};
use tokio_util::sync::CancellationToken;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[tokio::test]
async fn adding_a_product_posts_multipart_and_reloads_the_list() {
    let api = RecordingApi::with_responses(vec![ok("[]"), status(302, ""), ok(PRODUCTS_JSON)]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    assert!(view.empty_state().is_some());

    let form = view.open_add();
    assert_eq!(form.title(), "Add Product");
    form.draft.name = "Test Product".into();
    form.draft.description = "desc".into();
    form.draft.price = "$19.99".into();
    form.draft.count = "10".into();
    form.draft.image = ImageSource::DataUrl(to_data_url("image/png", "test.png", PNG));

    view.submit_modal(&api, &dialogs, &cancel).await.unwrap();
    assert!(view.modal().is_none());
    assert_eq!(view.items().len(), 4);

    let requests = api.requests().await;
    assert_eq!(requests.len(), 3);
    let post = &requests[1];
    assert_eq!(post.method, Method::POST);
    assert_eq!(post.target(), "/api/add_product");
    assert_eq!(post.body.text_field("productName"), Some("Test Product"));
    assert_eq!(post.body.text_field("description"), Some("desc"));
    assert_eq!(post.body.text_field("price"), Some("19.99"));
    assert_eq!(post.body.text_field("count"), Some("10"));
    match post.body.file_part("image") {
        Some(PartValue::File {
            file_name,
            mime,
            bytes,
        }) => {
            assert_eq!(file_name, "test.png");
            assert_eq!(mime, "image/png");
            assert_eq!(bytes.as_slice(), PNG);
        }
        other => panic!("expected image part, got {other:?}"),
    }
    assert!(dialogs.alerts().is_empty());
}

#[tokio::test]
async fn editing_a_product_puts_to_its_id_without_reuploading_the_image() {
    let api = RecordingApi::with_responses(vec![ok(PRODUCTS_JSON), ok("Product updated")]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    let form = view.open_edit(1).expect("product 1 is listed");
    assert_eq!(form.title(), "Edit Product");
    assert_eq!(form.draft.price, "$19.99");
    assert_eq!(form.draft.image, ImageSource::Existing("uploads/lamp.png".into()));
    form.draft.description = "New desc".into();
    form.draft.price = "$25.00".into();
    form.draft.count = "5".into();

    view.submit_modal(&api, &dialogs, &cancel).await.unwrap();

    let requests = api.requests().await;
    let put = &requests[1];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.target(), "/api/update_product?id=1");
    assert_eq!(put.body.text_field("productName"), Some("Lamp"));
    assert_eq!(put.body.text_field("count"), Some("5"));
    assert_eq!(put.body.text_field("product_description"), Some("New desc"));
    assert_eq!(put.body.text_field("item_price"), Some("25.00"));
    assert_eq!(put.body.text_field("stock_amount"), Some("5"));
    assert!(put.body.file_part("image").is_none());
}

#[tokio::test]
async fn invalid_product_never_reaches_the_backend() {
    let api = RecordingApi::with_responses(vec![ok("[]")]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    let form = view.open_add();
    form.draft.name = "Lamp".into();
    form.draft.price = "12.5".into();
    form.draft.tags = "sale".into();

    let err = view.submit_modal(&api, &dialogs, &cancel).await.unwrap_err();
    let SubmitError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.get("description").is_some());
    assert!(errors.get("price").is_some());
    assert!(errors.get("tags").is_some());
    assert!(errors.get("image").is_some());

    let form = view.modal().expect("modal stays open");
    assert_eq!(form.field_errors(), &errors);
    assert_eq!(api.requests().await.len(), 1);
    assert!(dialogs.alerts().is_empty());
}

#[tokio::test]
async fn server_rejection_is_alerted_and_keeps_the_modal_open() {
    let api = RecordingApi::with_responses(vec![
        ok("[]"),
        status(400, "Error uploading image"),
    ]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    let form = view.open_add();
    form.draft.name = "Lamp".into();
    form.draft.description = "Bright".into();
    form.draft.price = "$5".into();
    form.draft.image = ImageSource::DataUrl(to_data_url("image/png", "lamp.png", PNG));

    let err = view.submit_modal(&api, &dialogs, &cancel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Rejected { .. }));
    assert_eq!(
        dialogs.alerts(),
        vec!["Error saving product: Error uploading image".to_string()]
    );
    assert_eq!(
        view.modal().and_then(|f| f.error()),
        Some("Error uploading image")
    );
}

#[tokio::test]
async fn linking_a_storefront_sends_json_with_credentials() {
    let api = RecordingApi::with_responses(vec![ok("[]"), ok("{}")]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    let form = view.open_add();
    assert_eq!(form.title(), "Link New Storefront");
    form.draft.store_type = StoreType::Pinterest;
    form.draft.api_key = "key".into();
    form.draft.api_secret = "secret".into();

    view.submit_modal(&api, &dialogs, &cancel).await.unwrap();

    let requests = api.requests().await;
    let post = &requests[1];
    assert_eq!(post.target(), "/api/add_storefront");
    let Payload::Json(body) = &post.body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["storeType"], "pinterest");
    assert_eq!(body["storeName"], "pinterest Link");
    assert_eq!(body["apiKey"], "key");
    assert_eq!(body["apiSecret"], "secret");
}

#[tokio::test]
async fn storefront_without_credentials_is_rejected_locally() {
    let api = RecordingApi::with_responses(vec![ok("[]")]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    view.open_add();
    let err = view.submit_modal(&api, &dialogs, &cancel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(ref e) if e.get("apiKey").is_some()));
    assert_eq!(api.requests().await.len(), 1);
}

#[tokio::test]
async fn confirmed_unlink_deletes_and_closes_the_modal() {
    let api = RecordingApi::with_responses(vec![]).fixed(&[("/api/get_storefronts", STOREFRONTS_JSON)]);
    let dialogs = ScriptedDialogs::answering(&[true]);
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    view.open_edit(7).expect("storefront 7 is listed");
    let outcome = view.delete_in_modal(&api, &dialogs, &cancel).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(view.modal().is_none());
    assert_eq!(
        dialogs.prompts(),
        vec!["Are you sure you want to unlink \"Main Shop\"?".to_string()]
    );
    let requests = api.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].target(), "/api/delete_storefront?id=7");
}

#[tokio::test]
async fn declined_unlink_sends_nothing() {
    let api = RecordingApi::with_responses(vec![]).fixed(&[("/api/get_storefronts", STOREFRONTS_JSON)]);
    let dialogs = ScriptedDialogs::answering(&[false]);
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    view.open_edit(8).expect("storefront 8 is listed");
    let outcome = view.delete_in_modal(&api, &dialogs, &cancel).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Kept);
    assert!(view.modal().is_some());
    assert_eq!(
        dialogs.prompts(),
        vec!["Are you sure you want to unlink \"amazon Link\"?".to_string()]
    );
    assert_eq!(api.requests().await.len(), 1);
}

#[tokio::test]
async fn editing_a_storefront_omits_type_and_credentials() {
    let api = RecordingApi::with_responses(vec![ok("{}")]).fixed(&[("/api/get_storefronts", STOREFRONTS_JSON)]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    let form = view.open_edit(7).expect("storefront 7 is listed");
    assert_eq!(form.draft.store_type, StoreType::Etsy);
    assert!(form.draft.api_key.is_empty());
    form.draft.store_name = "Renamed".into();

    view.submit_modal(&api, &dialogs, &cancel).await.unwrap();

    let requests = api.requests().await;
    let put = &requests[1];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.target(), "/api/update_storefront?id=7");
    let Payload::Json(body) = &put.body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["storeName"], "Renamed");
    assert!(body.get("storeType").is_none());
    assert!(body.get("apiKey").is_none());
}

#[tokio::test]
async fn login_follows_the_redirect_home() {
    let api = RecordingApi::with_responses(vec![status(303, "")]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = LoginForm::new("test@frontrunner.com", "frontrunner");
    form.submit(&api, &navigator, &dialogs, &cancel).await.unwrap();

    assert_eq!(navigator.last().map(|r| r.path()), Some("/"));
    let requests = api.requests().await;
    assert_eq!(requests[0].target(), "/api/login");
    assert_eq!(
        requests[0].body.url_encoded_body().as_deref(),
        Some("email=test%40frontrunner.com&password=frontrunner")
    );
}

#[tokio::test]
async fn failed_login_stays_put_and_shows_the_server_message() {
    let api = RecordingApi::with_responses(vec![status(401, "Invalid credentials")]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = LoginForm::new("test@frontrunner.com", "wrong");
    assert!(form.submit(&api, &navigator, &dialogs, &cancel).await.is_err());
    assert_eq!(form.error(), Some("Invalid credentials"));
    assert!(navigator.routes().is_empty());
    assert_eq!(
        dialogs.alerts(),
        vec!["Error logging in: Invalid credentials".to_string()]
    );
}

#[tokio::test]
async fn registration_logs_straight_in() {
    let api = RecordingApi::with_responses(vec![status(303, ""), status(303, "")]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = RegistrationForm::new(Registration {
        email: "owner@shop.com".into(),
        password: "secret1".into(),
        business_name: "Shop".into(),
    });
    form.submit(&api, &navigator, &dialogs, &cancel).await.unwrap();

    let targets: Vec<String> = api.requests().await.iter().map(|r| r.target()).collect();
    assert_eq!(targets, vec!["/api/register", "/api/login"]);
    assert_eq!(navigator.last(), Some(Route::Home));
}

#[tokio::test]
async fn registration_falls_back_to_the_login_page() {
    let api = RecordingApi::with_responses(vec![status(303, ""), status(500, "")]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = RegistrationForm::new(Registration {
        email: "owner@shop.com".into(),
        password: "secret1".into(),
        business_name: String::new(),
    });
    assert!(form.submit(&api, &navigator, &dialogs, &cancel).await.is_err());
    assert_eq!(navigator.last(), Some(Route::Login));
    assert_eq!(form.error(), Some("Request failed with status 500"));
    assert_eq!(
        dialogs.alerts(),
        vec!["Error logging in: Request failed with status 500".to_string()]
    );
}

#[tokio::test]
async fn logout_always_lands_on_login() {
    let cancel = CancellationToken::new();
    for response in [
        status(302, ""),
        status(500, "boom"),
        Err(ApiError::Cancelled),
    ] {
        let api = RecordingApi::with_responses(vec![response]);
        let navigator = RecordingNavigator::default();
        nav::logout(&api, &navigator, &cancel).await;
        assert_eq!(navigator.routes(), vec![Route::Login]);
        let requests = api.requests().await;
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].target(), "/api/logout");
    }
}

#[tokio::test]
async fn cancelled_submit_reports_cancellation() {
    let api = RecordingApi::default();
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut form = LoginForm::new("test@frontrunner.com", "frontrunner");
    let err = form.submit(&api, &navigator, &dialogs, &cancel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(ApiError::Cancelled)));
    assert!(navigator.routes().is_empty());
    assert_eq!(
        dialogs.alerts(),
        vec!["Error logging in: request cancelled".to_string()]
    );
}

#[tokio::test]
async fn unreachable_backend_gets_a_generic_login_alert() {
    let api = RecordingApi::with_responses(vec![Err(ApiError::Status {
        status: StatusCode::BAD_GATEWAY,
        body: "upstream closed".into(),
    })]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = LoginForm::new("test@frontrunner.com", "frontrunner");
    let err = form.submit(&api, &navigator, &dialogs, &cancel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
    assert_eq!(
        dialogs.alerts(),
        vec!["Error logging in: could not reach the server".to_string()]
    );
    assert!(navigator.routes().is_empty());
}

#[tokio::test]
async fn confirmed_product_delete_removes_it_and_reloads() {
    let api = RecordingApi::with_responses(vec![ok(PRODUCTS_JSON), status(302, ""), ok("[]")]);
    let dialogs = ScriptedDialogs::answering(&[true]);
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    view.open_edit(2).expect("product 2 is listed");
    let outcome = view.delete_in_modal(&api, &dialogs, &cancel).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(view.modal().is_none());
    assert!(view.empty_state().is_some());
    assert_eq!(
        dialogs.prompts(),
        vec!["Are you sure you want to delete this product?".to_string()]
    );
    let requests = api.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].target(), "/api/delete_product?id=2");
    assert_eq!(requests[2].target(), "/api/get_products");
}

#[tokio::test]
async fn declined_product_delete_sends_nothing() {
    let api = RecordingApi::with_responses(vec![ok(PRODUCTS_JSON)]);
    let dialogs = ScriptedDialogs::answering(&[false]);
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    view.open_edit(2).expect("product 2 is listed");
    let outcome = view.delete_in_modal(&api, &dialogs, &cancel).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Kept);
    assert!(view.modal().is_some());
    assert_eq!(view.items().len(), 4);
    assert_eq!(api.requests().await.len(), 1);
}

#[tokio::test]
async fn transport_failure_on_save_is_alerted() {
    let api = RecordingApi::with_responses(vec![]).fixed(&[("/api/get_storefronts", STOREFRONTS_JSON)]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    view.open_edit(7).expect("storefront 7 is listed");
    cancel.cancel();

    let err = view.submit_modal(&api, &dialogs, &cancel).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(ApiError::Cancelled)));
    assert_eq!(
        dialogs.alerts(),
        vec!["Error saving storefront: request cancelled".to_string()]
    );
    assert!(view.modal().is_some());
}

#[tokio::test]
async fn unreachable_backend_on_product_save_gets_a_generic_alert() {
    let api = RecordingApi::with_responses(vec![
        ok(PRODUCTS_JSON),
        Err(ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        }),
    ]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = ProductsView::mount(&api, &cancel).await;
    view.open_edit(1).expect("product 1 is listed");
    let err = view.submit_modal(&api, &dialogs, &cancel).await.unwrap_err();

    assert!(matches!(err, SubmitError::Transport(_)));
    assert_eq!(
        dialogs.alerts(),
        vec!["Error saving product: could not reach the server".to_string()]
    );
    assert!(view.modal().and_then(|f| f.error()).is_some());
}

#[tokio::test]
async fn cleared_nickname_on_an_unknown_platform_keeps_its_type() {
    let listing = r#"[{"id": 9, "storeType": "ebay", "storeName": "Old", "storeId": "", "storeUrl": ""}]"#;
    let api = RecordingApi::with_responses(vec![ok(listing), ok("{}")]);
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut view = StorefrontsView::mount(&api, &cancel).await;
    let form = view.open_edit(9).expect("storefront 9 is listed");
    form.draft.store_name.clear();
    view.submit_modal(&api, &dialogs, &cancel).await.unwrap();

    let requests = api.requests().await;
    let Payload::Json(body) = &requests[1].body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["storeName"], "ebay Link");
}

#[tokio::test]
async fn rejected_registration_is_alerted_and_skips_login() {
    let api = RecordingApi::with_responses(vec![status(409, "Email already registered")]);
    let navigator = RecordingNavigator::default();
    let dialogs = ScriptedDialogs::default();
    let cancel = CancellationToken::new();

    let mut form = RegistrationForm::new(Registration {
        email: "owner@shop.com".into(),
        password: "secret1".into(),
        business_name: String::new(),
    });
    assert!(form.submit(&api, &navigator, &dialogs, &cancel).await.is_err());
    assert_eq!(
        dialogs.alerts(),
        vec!["Error registering: Email already registered".to_string()]
    );
    assert_eq!(api.requests().await.len(), 1);
    assert!(navigator.routes().is_empty());
}
