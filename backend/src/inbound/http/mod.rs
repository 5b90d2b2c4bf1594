//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod feedback;
pub mod health;
pub mod identity;
pub mod insights;
pub mod reviews;
pub mod roadmap;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register the feedback API routes, the JSON body error handler, and the
/// JSON 404 fallback.
///
/// State must be registered separately as `web::Data<HttpState>`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure_api;
/// use backend::inbound::http::state::{HttpState, HttpStatePorts};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::new(HttpStatePorts::default())))
///     .configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(feedback::submit_feedback)
        .service(insights::get_insights)
        .service(reviews::list_my_reviews)
        .service(roadmap::get_my_roadmap)
        .default_service(web::to(error::not_found));
}
