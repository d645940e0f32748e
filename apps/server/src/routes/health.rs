use actix_web::{HttpResponse, get};

macros_utils::routes! {
    route health,
}

/// Liveness check. The status code carries the answer; there is no body.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().finish()
}
