//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::build_adapters;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::configure_api;
use backend::inbound::http::health::{HealthState, live, ready};
use state_builders::build_http_state;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        cors,
        allow_body_identity,
        adapters,
    } = config;
    let http_state = web::Data::new(build_http_state(&adapters, allow_body_identity));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(cors.clone())
            .wrap(Trace)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app.configure(configure_api)
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Adapter selection from settings.

    use backend::settings::AppSettings;
    use rstest::{fixture, rstest};

    use super::build_adapters;

    #[fixture]
    fn settings() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            store_page_size: None,
            llm_endpoint: None,
            llm_api_key: None,
            llm_model: None,
            llm_timeout_secs: None,
            archive_dir: None,
            cors_allow_origin: None,
            allow_body_identity: false,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn bare_settings_build_in_memory_adapters_without_archive(settings: AppSettings) {
        let adapters = build_adapters(&settings)
            .await
            .expect("in-memory adapters build");
        assert!(adapters.archive.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn archive_dir_enables_the_archive(mut settings: AppSettings) {
        let dir = tempfile::tempdir().expect("temp dir");
        settings.archive_dir = Some(dir.path().to_path_buf());
        let adapters = build_adapters(&settings).await.expect("adapters build");
        assert!(adapters.archive.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_model_endpoint_is_reported(mut settings: AppSettings) {
        settings.llm_api_key = Some("key".to_owned());
        settings.llm_endpoint = Some("not a url".to_owned());
        let err = build_adapters(&settings)
            .await
            .err()
            .expect("invalid endpoint fails");
        assert!(err.to_string().contains("invalid model endpoint"));
    }
}
