use crate::{
    api::error::ApiError,
    model::{attendance::AttendanceStatus, dashboard::DashboardSummary},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

/// Dashboard summary
#[utoipa::path(
    get,
    path = "/dashboard/summary",
    responses(
        (status = 200, description = "Head count and today's presence", body = DashboardSummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn summary(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let summary = summary_for(pool.get_ref(), Local::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub(crate) async fn summary_for(pool: &SqlitePool, day: NaiveDate) -> Result<DashboardSummary, sqlx::Error> {
    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    let present_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status = ?",
    )
    .bind(day)
    .bind(AttendanceStatus::Present.as_ref())
    .fetch_one(pool)
    .await?;

    Ok(DashboardSummary {
        total_employees,
        present_today,
    })
}
