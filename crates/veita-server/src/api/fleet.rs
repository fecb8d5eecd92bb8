//! Fleet API handlers
//!
//! - `POST /veita/v1/fleet/nodes` - register a node (admin)
//! - `POST /veita/v1/fleet/nodes/{name}/keys` - issue an API key (admin)
//! - `POST /veita/v1/fleet/keys/revoke` - revoke an API key (admin)
//! - `PUT /veita/v1/fleet/nodes/{name}/report` - authenticated telemetry report
//! - `GET /veita/v1/fleet/nodes` - list every node
//! - `GET /veita/v1/fleet/nodes/{name}` - one node
//! - `GET /veita/v1/fleet/alive` / `down` - liveness partitions
//! - `GET /veita/v1/fleet/best?count=n` - best-n selection

use actix_web::{HttpRequest, HttpResponse, Responder, Scope, get, http::header, post, put, web};

use veita_common::{API_KEY_HEADER, error, now_unix};
use veita_fleet::NodeView;

use crate::model::response::{Result, authenticated_error_response, error_response};
use crate::model::{AppState, BestQuery, IssuedKey, RegisterForm, RevokeForm};

pub fn routes() -> Scope {
    web::scope("/veita/v1/fleet")
        .service(register_node)
        .service(issue_node_key)
        .service(revoke_key)
        .service(report_telemetry)
        .service(list_nodes)
        .service(alive_nodes)
        .service(down_nodes)
        .service(best_nodes)
        .service(get_node)
}

/// Check the admin bearer token; admin endpoints refuse every request when
/// no token is configured.
fn admin_authorized(req: &HttpRequest, data: &AppState) -> bool {
    let Some(expected) = data.configuration.admin_token() else {
        return false;
    };

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

fn admin_rejected(req: &HttpRequest) -> HttpResponse {
    tracing::warn!(path = %req.path(), "Rejected admin request");
    Result::<String>::http_response(
        401,
        error::ACCESS_DENIED.code,
        "admin authorization required".to_string(),
        String::new(),
    )
}

/// Register a new node
///
/// POST /veita/v1/fleet/nodes
#[post("/nodes")]
pub async fn register_node(
    req: HttpRequest,
    data: web::Data<AppState>,
    form: web::Json<RegisterForm>,
) -> impl Responder {
    if !admin_authorized(&req, &data) {
        return admin_rejected(&req);
    }

    match data.fleet.register(&form.name, &form.ip).await {
        Ok(node) => Result::<NodeView>::http_success(node.to_view(now_unix())),
        Err(err) => error_response(&err),
    }
}

/// Issue a fresh API key for a node
///
/// POST /veita/v1/fleet/nodes/{name}/keys
#[post("/nodes/{name}/keys")]
pub async fn issue_node_key(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    if !admin_authorized(&req, &data) {
        return admin_rejected(&req);
    }

    let name = path.into_inner();
    match data.fleet.issue_key(&name).await {
        Ok(key) => Result::<IssuedKey>::http_success(IssuedKey { node: name, key }),
        Err(err) => error_response(&err),
    }
}

/// Revoke an API key
///
/// POST /veita/v1/fleet/keys/revoke
#[post("/keys/revoke")]
pub async fn revoke_key(
    req: HttpRequest,
    data: web::Data<AppState>,
    form: web::Json<RevokeForm>,
) -> impl Responder {
    if !admin_authorized(&req, &data) {
        return admin_rejected(&req);
    }

    match data.fleet.revoke_key(&form.key).await {
        Ok(()) => Result::<String>::http_success("ok".to_string()),
        Err(err) => error_response(&err),
    }
}

/// Apply one telemetry report, authenticated by API key
///
/// PUT /veita/v1/fleet/nodes/{name}/report
///
/// The heartbeat is stamped from the server clock at write time; the
/// reporter cannot supply one.
#[put("/nodes/{name}/report")]
pub async fn report_telemetry(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<veita_fleet::TelemetryReport>,
) -> impl Responder {
    let Some(key) = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return Result::<String>::http_response(
            401,
            error::ACCESS_DENIED.code,
            "authentication failed".to_string(),
            String::new(),
        );
    };

    let name = path.into_inner();
    match data.fleet.report(&name, key, &form).await {
        Ok(node) => Result::<NodeView>::http_success(node.to_view(now_unix())),
        Err(err) => authenticated_error_response(&err),
    }
}

/// List every node with derived fields
///
/// GET /veita/v1/fleet/nodes
#[get("/nodes")]
pub async fn list_nodes(data: web::Data<AppState>) -> impl Responder {
    match data.fleet.fleet().await {
        Ok(fleet) => Result::<Vec<NodeView>>::http_success(fleet.views()),
        Err(err) => error_response(&err),
    }
}

/// Fetch one node by name
///
/// GET /veita/v1/fleet/nodes/{name}
#[get("/nodes/{name}")]
pub async fn get_node(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match data.fleet.load(&path.into_inner()).await {
        Ok(node) => Result::<NodeView>::http_success(node.to_view(now_unix())),
        Err(err) => error_response(&err),
    }
}

/// Nodes currently accepting traffic
///
/// GET /veita/v1/fleet/alive
#[get("/alive")]
pub async fn alive_nodes(data: web::Data<AppState>) -> impl Responder {
    match data.fleet.fleet().await {
        Ok(fleet) => {
            let now = fleet.snapshot_time();
            let views: Vec<NodeView> = fleet.alive().iter().map(|n| n.to_view(now)).collect();
            Result::<Vec<NodeView>>::http_success(views)
        }
        Err(err) => error_response(&err),
    }
}

/// Nodes out of rotation
///
/// GET /veita/v1/fleet/down
#[get("/down")]
pub async fn down_nodes(data: web::Data<AppState>) -> impl Responder {
    match data.fleet.fleet().await {
        Ok(fleet) => {
            let now = fleet.snapshot_time();
            let views: Vec<NodeView> = fleet.down().iter().map(|n| n.to_view(now)).collect();
            Result::<Vec<NodeView>>::http_success(views)
        }
        Err(err) => error_response(&err),
    }
}

/// Best-n selection over the alive set, in random order
///
/// GET /veita/v1/fleet/best?count=n
#[get("/best")]
pub async fn best_nodes(data: web::Data<AppState>, query: web::Query<BestQuery>) -> impl Responder {
    let count = query.count.unwrap_or(veita_common::DEFAULT_BEST_COUNT);
    match data.fleet.best(count).await {
        Ok(nodes) => {
            let now = now_unix();
            let views: Vec<NodeView> = nodes.iter().map(|n| n.to_view(now)).collect();
            Result::<Vec<NodeView>>::http_success(views)
        }
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::{Value, json};

    use veita_fleet::FleetService;
    use veita_persistence::InMemoryPersistService;

    use super::*;
    use crate::model::config::Configuration;

    const ADMIN_TOKEN: &str = "test-admin-token";

    fn app_state() -> web::Data<AppState> {
        let store = Arc::new(InMemoryPersistService::new());
        let config = config::Config::builder()
            .set_override("veita.admin.token", ADMIN_TOKEN)
            .unwrap()
            .build()
            .unwrap();
        web::Data::new(AppState {
            configuration: Configuration::from_config(config),
            fleet: FleetService::new(store.clone(), store),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).service(routes())).await
        };
    }

    fn bearer() -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", ADMIN_TOKEN))
    }

    macro_rules! register {
        ($app:expr, $name:expr, $ip:expr) => {{
            let req = test::TestRequest::post()
                .uri("/veita/v1/fleet/nodes")
                .insert_header(bearer())
                .set_json(json!({ "name": $name, "ip": $ip }))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status().as_u16(), 200);
        }};
    }

    #[actix_rt::test]
    async fn test_register_requires_admin_token() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/nodes")
            .set_json(json!({ "name": "vpn1", "ip": "10.0.0.1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_rt::test]
    async fn test_register_then_get() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/nodes/vpn1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["name"], "vpn1");
        assert_eq!(body["data"]["ip"], "10.0.0.1");
        assert_eq!(body["data"]["alive"], false);
    }

    #[actix_rt::test]
    async fn test_register_duplicate_conflicts() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/nodes")
            .insert_header(bearer())
            .set_json(json!({ "name": "vpn1", "ip": "10.0.0.2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 409);
    }

    #[actix_rt::test]
    async fn test_register_bad_address() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/nodes")
            .insert_header(bearer())
            .set_json(json!({ "name": "vpn1", "ip": "err" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_rt::test]
    async fn test_get_missing_node() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/nodes/ghost")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[actix_rt::test]
    async fn test_report_flow() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/nodes/vpn1/keys")
            .insert_header(bearer())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let key = body["data"]["key"].as_str().unwrap().to_string();
        assert_eq!(key.len(), 64);

        let req = test::TestRequest::put()
            .uri("/veita/v1/fleet/nodes/vpn1/report")
            .insert_header((API_KEY_HEADER, key.as_str()))
            .set_json(json!({
                "usercount": 5,
                "cpu": 50.0,
                "uptime": "3d 4h",
                "throughput": 1024,
                "totalThroughput": 1_000_000,
                "selfcheck": true
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["score"], 10);
        assert_eq!(body["data"]["alive"], true);

        // The node now appears in the alive partition and best selection
        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/alive")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/best?count=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["name"], "vpn1");
    }

    #[actix_rt::test]
    async fn test_report_without_key_unauthorized() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let req = test::TestRequest::put()
            .uri("/veita/v1/fleet/nodes/vpn1/report")
            .set_json(json!({ "uptime": "0d 0h" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_rt::test]
    async fn test_report_unknown_node_indistinguishable_from_bad_key() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let bad_key = test::TestRequest::put()
            .uri("/veita/v1/fleet/nodes/vpn1/report")
            .insert_header((API_KEY_HEADER, "bogus"))
            .set_json(json!({ "uptime": "0d 0h" }))
            .to_request();
        let bad_key: Value = test::call_and_read_body_json(&app, bad_key).await;

        let ghost = test::TestRequest::put()
            .uri("/veita/v1/fleet/nodes/ghost/report")
            .insert_header((API_KEY_HEADER, "bogus"))
            .set_json(json!({ "uptime": "0d 0h" }))
            .to_request();
        let ghost: Value = test::call_and_read_body_json(&app, ghost).await;

        assert_eq!(bad_key, ghost);
    }

    #[actix_rt::test]
    async fn test_revoked_key_stops_reporting() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/nodes/vpn1/keys")
            .insert_header(bearer())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let key = body["data"]["key"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/veita/v1/fleet/keys/revoke")
            .insert_header(bearer())
            .set_json(json!({ "key": key }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);

        let req = test::TestRequest::put()
            .uri("/veita/v1/fleet/nodes/vpn1/report")
            .insert_header((API_KEY_HEADER, key.as_str()))
            .set_json(json!({ "uptime": "0d 0h" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);
    }

    #[actix_rt::test]
    async fn test_list_and_down_partitions() {
        let state = app_state();
        let app = app!(state);
        register!(app, "vpn1", "10.0.0.1");
        register!(app, "vpn2", "10.0.0.2");

        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/nodes")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        // Fresh registrations have never reported, so both are down
        let req = test::TestRequest::get()
            .uri("/veita/v1/fleet/down")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }
}
