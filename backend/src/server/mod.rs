//! Server construction and middleware wiring.

mod config;
mod session;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
pub use session::{BuildMode, load_session_key};

use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use account_backend::Trace;
#[cfg(debug_assertions)]
use account_backend::doc::ApiDoc;
use account_backend::inbound::http::accounts::{
    create_account, delete_account, list_accounts, login, update_account,
};
use account_backend::inbound::http::health::{HealthState, live, ready};
use account_backend::inbound::http::state::HttpState;
use account_backend::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use session::session_middleware;
use state_builders::{build_http_state, build_repository};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(key, cookie_secure))
        .service(list_accounts)
        .service(create_account)
        .service(login)
        .service(update_account)
        .service(delete_account);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness flips once the account store is reachable and the listener is
/// bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the account store cannot be prepared or
/// binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let repository = build_repository(&config).await?;
    let http_state = web::Data::new(build_http_state(&config, repository));
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
