use crate::{
    api::{attendance, dashboard, employee, error},
    config::Config,
    docs::ApiDoc,
    utils::employee_filter::EmployeeIdFilter,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, middleware::Condition, web};
use sqlx::SqlitePool;
use utoipa::OpenApi;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub employee_filter: web::Data<EmployeeIdFilter>,
}

impl AppState {
    pub fn new(pool: SqlitePool, employee_filter: EmployeeIdFilter) -> Self {
        Self {
            pool,
            employee_filter: web::Data::new(employee_filter),
        }
    }
}

// Per peer IP; at least one request per minute so the builder always succeeds
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState, config: &Config) {
    let limiter = build_limiter(config.rate_api_per_min);

    cfg.app_data(web::Data::new(state.pool.clone()))
        .app_data(state.employee_filter.clone())
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .route("/api-doc/openapi.json", web::get().to(openapi_json));

    cfg.service(
        web::scope("")
            .wrap(Condition::new(config.rate_api_per_min > 0, limiter))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance?date=
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::mark_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .route(web::get().to(attendance::list_employee_attendance)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("/summary").route(web::get().to(dashboard::summary))),
            ),
    );
}
