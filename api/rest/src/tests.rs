use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    middleware::ErrorHandlers,
    test, web, App, Error,
};
use mockito::{Matcher, Server, ServerGuard};
use rp_backend::BackendClient;
use rp_descriptor::DescriptorStore;
use rp_mirror::{DocumentForwarder, SchemaMirror};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::{
    configure::configure, context::ApiRestCtx, error_handler::default_error_handler,
    middleware::method_override::MethodOverride,
};

struct Harness {
    dir: TempDir,
    backend: ServerGuard,
}

impl Harness {
    async fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            backend: Server::new_async().await,
        }
    }

    fn ctx(&self) -> web::Data<ApiRestCtx> {
        let client =
            BackendClient::new(&self.backend.url(), "admin-secret", &None).expect("client");
        web::Data::new(ApiRestCtx::new(
            SchemaMirror::new(DescriptorStore::new(self.dir.path()), client.clone()),
            DocumentForwarder::new(client),
        ))
    }

    fn descriptor(&self, collection_id: &str) -> Value {
        let raw = std::fs::read_to_string(self.dir.path().join(collection_id).join("config.json"))
            .expect("descriptor file");
        serde_json::from_str(&raw).expect("descriptor json")
    }
}

async fn app(
    ctx: web::Data<ApiRestCtx>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(ErrorHandlers::new().default_handler(default_error_handler))
            .wrap(MethodOverride)
            .app_data(ctx)
            .configure(configure),
    )
    .await
}

async fn create_companies<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/resources")
        .set_json(json!({
            "type": "Collection",
            "id": "companies",
            "properties": {
                "name": {"name": "name", "type": "string", "typeLabel": "string", "required": false, "id": "name"},
                "foundation_year": {"name": "foundation_year", "type": "number", "typeLabel": "number", "required": false, "id": "foundation_year"}
            }
        }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "Ok");
    body["collectionId"]
        .as_str()
        .expect("collection id")
        .to_owned()
}

#[actix_web::test]
async fn create_collection_assigns_orders() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;

    let collection_id = create_companies(&app).await;
    assert!(collection_id.starts_with("companies_"));

    let descriptor = harness.descriptor(&collection_id);
    assert_eq!(descriptor["type"], "Collection");
    assert_eq!(descriptor["properties"]["name"]["order"], 0);
    assert_eq!(descriptor["properties"]["foundation_year"]["order"], 1);
}

#[actix_web::test]
async fn create_collection_requires_id() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;

    let req = test::TestRequest::post()
        .uri("/resources")
        .set_json(json!({"type": "Collection", "properties": {}}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn add_property_then_read_back() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    let req = test::TestRequest::put()
        .uri(&format!("/resources/{collection_id}"))
        .set_json(json!({
            "city": {"name": "city", "type": "string", "typeLabel": "string", "required": false, "id": "city"}
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"status": "Ok"}));

    let req = test::TestRequest::get()
        .uri(&format!("/resources/{collection_id}"))
        .to_request();
    let descriptor: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(descriptor["properties"]["city"]["order"], 2);
    assert_eq!(descriptor["properties"]["city"]["id"], "city");
}

#[actix_web::test]
async fn post_with_method_parameter_reaches_put_route() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/resources/{collection_id}?_method=PUT"))
        .set_json(json!({"city": {"type": "string"}}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(harness.descriptor(&collection_id)["properties"]["city"]["order"], 2);
}

#[actix_web::test]
async fn add_property_to_unknown_collection_is_404() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;

    let req = test::TestRequest::put()
        .uri("/resources/ghost_1")
        .set_json(json!({"city": {"type": "string"}}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(harness.dir.path()).unwrap().count(), 0);
}

#[actix_web::test]
async fn rename_property_mirrors_backend() {
    let mut harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    let req = test::TestRequest::put()
        .uri(&format!("/resources/{collection_id}"))
        .set_json(json!({"city": {"type": "string", "typeLabel": "string"}}))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let mock = harness
        .backend
        .mock("POST", format!("/{collection_id}/rename").as_str())
        .match_body(Matcher::Json(json!({"properties": {"city": "town"}})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let req = test::TestRequest::put()
        .uri(&format!("/{collection_id}/rename"))
        .set_json(json!({"properties": {"city": "town"}}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    mock.assert_async().await;

    let descriptor = harness.descriptor(&collection_id);
    assert!(descriptor["properties"].get("city").is_none());
    assert_eq!(descriptor["properties"]["town"]["order"], 2);
    assert_eq!(descriptor["properties"]["town"]["type"], "string");
    assert_eq!(descriptor["properties"]["town"]["name"], "town");
}

#[actix_web::test]
async fn rename_property_reports_local_drift() {
    let mut harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    let folder = harness.dir.path().join(&collection_id);
    let mock = harness
        .backend
        .mock("POST", format!("/{collection_id}/rename").as_str())
        .with_status(200)
        .with_body_from_request(move |_| {
            std::fs::remove_dir_all(&folder).expect("remove collection folder");
            b"{}".to_vec()
        })
        .create_async()
        .await;

    let req = test::TestRequest::put()
        .uri(&format!("/{collection_id}/rename"))
        .set_json(json!({"properties": {"name": "title"}}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    mock.assert_async().await;

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["localApplied"], false);
    assert_eq!(body["remoteApplied"], true);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn rename_collection_returns_aggregate() {
    let mut harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    let mock = harness
        .backend
        .mock("PUT", format!("/__resources/{collection_id}").as_str())
        .match_header("dpd-ssh-key", "admin-secret")
        .match_body(Matcher::PartialJson(json!({"id": "enterprises"})))
        .with_status(200)
        .with_body(r#"{"id": "enterprises"}"#)
        .create_async()
        .await;

    let req = test::TestRequest::put()
        .uri("/resources")
        .set_json(json!({"collections": { collection_id.clone(): "enterprises" }}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body["collections"][&collection_id],
        json!({"localApplied": true, "remoteApplied": true, "response": {"id": "enterprises"}})
    );
    mock.assert_async().await;

    assert_eq!(harness.descriptor(&collection_id)["id"], "enterprises");
}

#[actix_web::test]
async fn rename_collection_failure_reports_drift() {
    let mut harness = Harness::new().await;
    let app = app(harness.ctx()).await;
    let collection_id = create_companies(&app).await;

    harness
        .backend
        .mock("PUT", format!("/__resources/{collection_id}").as_str())
        .with_status(500)
        .with_body(r#"{"message": "boom"}"#)
        .create_async()
        .await;

    let req = test::TestRequest::put()
        .uri("/resources")
        .set_json(json!({"collections": { collection_id.clone(): "enterprises" }}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    let outcome = &body["collections"][&collection_id];
    assert_eq!(outcome["localApplied"], true);
    assert_eq!(outcome["remoteApplied"], false);
    assert_eq!(outcome["response"], json!({"message": "boom"}));
}

#[actix_web::test]
async fn documents_are_relayed() {
    let mut harness = Harness::new().await;
    let app = app(harness.ctx()).await;

    harness
        .backend
        .mock("POST", "/companies")
        .match_body(Matcher::Json(json!({"name": "Initech"})))
        .with_status(201)
        .with_body(r#"{"id": "9f2c", "name": "Initech"}"#)
        .create_async()
        .await;
    harness
        .backend
        .mock("PUT", "/companies/9f2c")
        .with_status(400)
        .with_body(r#"{"errors": {"city": "invalid"}}"#)
        .create_async()
        .await;

    let req = test::TestRequest::post()
        .uri("/companies")
        .set_json(json!({"name": "Initech"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"id": "9f2c", "name": "Initech"}));

    let req = test::TestRequest::put()
        .uri("/companies/9f2c")
        .set_json(json!({"city": 42}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"errors": {"city": "invalid"}}));
}

#[actix_web::test]
async fn unknown_routes_get_json_errors() {
    let harness = Harness::new().await;
    let app = app(harness.ctx()).await;

    let req = test::TestRequest::delete().uri("/companies/9f2c").to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_client_error());
    let body: Value = test::read_body_json(res).await;
    assert!(body["error"].is_string());
}
