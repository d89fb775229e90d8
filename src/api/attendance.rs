use crate::{
    api::{employee::employee_exists, error::ApiError},
    model::attendance::{AttendanceRecord, AttendanceRow},
    utils::employee_filter::EmployeeIdFilter,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};
use sqlx::SqlitePool;
use tracing::{error, info};
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Only records of this day
    #[param(example = "2024-01-02", value_type = Option<String>)]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date: Option<NaiveDate>,
}

/// `?date=` with no value means no filter.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(day) => day.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/attendance/",
    request_body = AttendanceRecord,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceRecord),
        (status = 400, description = "Already marked for this date", body = Object, example = json!({
            "detail": "Attendance already marked for this date"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        })),
        (status = 422, description = "Missing or malformed field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    filter: web::Data<EmployeeIdFilter>,
    payload: web::Json<AttendanceRecord>,
) -> Result<impl Responder, ApiError> {
    let record = payload.into_inner();

    if record.employee_id.trim().is_empty() {
        return Err(ApiError::unprocessable("Employee ID is required"));
    }

    if !filter.might_exist(&record.employee_id)
        || !employee_exists(pool.get_ref(), &record.employee_id).await?
    {
        return Err(ApiError::not_found("Employee not found"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&record.employee_id)
    .bind(record.date)
    .bind(record.status.as_ref())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            info!(employee_id = %record.employee_id, date = %record.date, status = %record.status, "Attendance marked");
            Ok(HttpResponse::Created().json(record))
        }
        // UNIQUE (employee_id, date)
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(ApiError::bad_request("Attendance already marked for this date"))
        }
        Err(e) => Err(e.into()),
    }
}

/// List attendance, optionally for a single date
#[utoipa::path(
    get,
    path = "/attendance/",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records in insertion order", body = [AttendanceRecord])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceFilter>,
) -> Result<impl Responder, ApiError> {
    let rows = match query.date {
        Some(date) => {
            sqlx::query_as::<_, AttendanceRow>(
                "SELECT employee_id, date, status FROM attendance WHERE date = ? ORDER BY id",
            )
            .bind(date)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, AttendanceRow>(
                "SELECT employee_id, date, status FROM attendance ORDER BY id",
            )
            .fetch_all(pool.get_ref())
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(into_records(rows)?))
}

/// List one employee's attendance
#[utoipa::path(
    get,
    path = "/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "The employee's records, empty when unknown", body = [AttendanceRecord])
    ),
    tag = "Attendance"
)]
pub async fn list_employee_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    let rows = sqlx::query_as::<_, AttendanceRow>(
        "SELECT employee_id, date, status FROM attendance WHERE employee_id = ? ORDER BY id",
    )
    .bind(&employee_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(into_records(rows)?))
}

fn into_records(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, ApiError> {
    rows.into_iter()
        .map(|row| {
            AttendanceRecord::try_from(row).map_err(|e| {
                error!(error = %e, "Unreadable attendance status");
                ApiError::internal()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(query: &str) -> Result<Option<NaiveDate>, actix_web::error::QueryPayloadError> {
        web::Query::<AttendanceFilter>::from_query(query).map(|q| q.into_inner().date)
    }

    #[test]
    fn blank_or_missing_date_means_all_days() {
        assert_eq!(filter("").unwrap(), None);
        assert_eq!(filter("date=").unwrap(), None);
        assert_eq!(filter("date=2024-01-02").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(filter("date=yesterday").is_err());
    }
}
