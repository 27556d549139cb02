use actix_web::web;

pub mod draft;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes)
        .configure(draft::configure_routes);
}
