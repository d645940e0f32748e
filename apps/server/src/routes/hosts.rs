use actix_web::{HttpResponse, Responder, delete, get, post, web};
use reachup::{
    DEFAULT_CHECK_INTERVAL_MS, DEFAULT_FAILURE_THRESHOLD, HostConfig, HostMonitor, HostStatus,
    Protocol,
};
use serde::Deserialize;

use crate::error::ApiError;

macros_utils::routes! {
    route list_hosts,
    route get_host,
    route add_host,
    route remove_host,
}

/// Payload for registering a host. Omitted fields fall back to TCP checks
/// every 30 seconds with a failure threshold of 3.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddHostRequest {
    id: String,
    host: String,
    port: u16,
    #[serde(default)]
    protocol: Protocol,
    #[serde(default = "default_check_interval", rename = "checkInterval")]
    check_interval_ms: u64,
    #[serde(default = "default_failure_threshold")]
    failure_threshold: u32,
}

fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL_MS
}

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

impl From<AddHostRequest> for HostConfig {
    fn from(req: AddHostRequest) -> Self {
        HostConfig {
            id: req.id,
            host: req.host,
            port: req.port,
            protocol: req.protocol,
            check_interval_ms: req.check_interval_ms,
            failure_threshold: req.failure_threshold,
        }
    }
}

/// All registered hosts with their current status, ordered by id.
#[get("/hosts")]
pub async fn list_hosts(monitor: web::Data<HostMonitor>) -> impl Responder {
    let mut hosts = monitor.list().await;
    hosts.sort_by(|a, b| a.config.id.cmp(&b.config.id));
    HttpResponse::Ok().json(hosts)
}

#[get("/hosts/{id}")]
pub async fn get_host(
    monitor: web::Data<HostMonitor>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    match monitor.get(&id).await {
        Some(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        None => Err(ApiError::NotFound(id.into_inner())),
    }
}

/// Register a host and start checking it. Responds with the entry as
/// created: down, never checked.
#[post("/hosts")]
pub async fn add_host(
    monitor: web::Data<HostMonitor>,
    payload: web::Json<AddHostRequest>,
) -> Result<HttpResponse, ApiError> {
    let config: HostConfig = payload.into_inner().into();
    let created = HostStatus::new(config.clone());
    monitor.register(config).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Remove a host. Unknown ids get the same 204 as known ones.
#[delete("/hosts/{id}")]
pub async fn remove_host(monitor: web::Data<HostMonitor>, id: web::Path<String>) -> impl Responder {
    monitor.deregister(&id).await;
    HttpResponse::NoContent()
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use reachup::HostMonitor;
    use serde_json::{Value, json};

    async fn request(
        monitor: HostMonitor,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new().app_data(web::Data::new(monitor)).configure(crate::routes::routes),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    fn add_host_body(id: &str) -> Value {
        json!({ "id": id, "host": "example.com", "port": 443 })
    }

    #[actix_web::test]
    async fn test_add_host_applies_defaults() {
        let resp = request(
            HostMonitor::new(),
            test::TestRequest::post().uri("/hosts").set_json(add_host_body("web")),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "web");
        assert_eq!(body["protocol"], "tcp");
        assert_eq!(body["checkInterval"], 30_000);
        assert_eq!(body["failureThreshold"], 3);
        assert_eq!(body["status"], "down");
        assert_eq!(body["consecutiveFailures"], 0);
    }

    #[actix_web::test]
    async fn test_add_host_rejects_missing_fields() {
        let resp = request(
            HostMonitor::new(),
            test::TestRequest::post().uri("/hosts").set_json(json!({ "id": "web" })),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_add_host_rejects_invalid_port() {
        let resp = request(
            HostMonitor::new(),
            test::TestRequest::post()
                .uri("/hosts")
                .set_json(json!({ "id": "web", "host": "example.com", "port": 0 })),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("port"));
    }

    #[actix_web::test]
    async fn test_add_host_rejects_duplicate_id() {
        let monitor = HostMonitor::new();
        monitor.register(add_host_config("web")).await.unwrap();

        let resp = request(
            monitor,
            test::TestRequest::post().uri("/hosts").set_json(add_host_body("web")),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_list_hosts_is_sorted_by_id() {
        let monitor = HostMonitor::new();
        monitor.register(add_host_config("b")).await.unwrap();
        monitor.register(add_host_config("a")).await.unwrap();

        let resp = request(monitor, test::TestRequest::get().uri("/hosts")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body[0]["id"], "a");
        assert_eq!(body[1]["id"], "b");
    }

    #[actix_web::test]
    async fn test_get_host_returns_the_snapshot() {
        let monitor = HostMonitor::new();
        monitor.register(add_host_config("web")).await.unwrap();

        let resp = request(monitor, test::TestRequest::get().uri("/hosts/web")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "web");
        assert_eq!(body["host"], "example.com");
        assert_eq!(body["status"], "down");
    }

    #[actix_web::test]
    async fn test_get_host_returns_404_for_unknown_id() {
        let resp = request(HostMonitor::new(), test::TestRequest::get().uri("/hosts/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_remove_host_returns_204_and_forgets_the_host() {
        let monitor = HostMonitor::new();
        monitor.register(add_host_config("web")).await.unwrap();

        let resp =
            request(monitor.clone(), test::TestRequest::delete().uri("/hosts/web")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(monitor.get("web").await.is_none());

        // Deleting again is still a 204.
        let resp = request(monitor, test::TestRequest::delete().uri("/hosts/web")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn test_health_responds_ok() {
        let resp = request(HostMonitor::new(), test::TestRequest::get().uri("/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    fn add_host_config(id: &str) -> reachup::HostConfig {
        reachup::HostConfig {
            id: id.to_string(),
            host: "example.com".to_string(),
            port: 443,
            protocol: reachup::Protocol::Tcp,
            check_interval_ms: 30_000,
            failure_threshold: 3,
        }
    }
}
