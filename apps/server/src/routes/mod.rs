use actix_web::web::ServiceConfig;

mod health;
mod hosts;

pub fn routes(cfg: &mut ServiceConfig) {
    health::routes(cfg);
    hosts::routes(cfg);
}
