use crate::{
    api::error::ApiError,
    model::employee::{Employee, NewEmployee, is_addressable_id, is_plausible_email},
    utils::employee_filter::EmployeeIdFilter,
};
use actix_web::{HttpResponse, Responder, web};
use sqlx::SqlitePool;
use sqlx::error::DatabaseError;
use tracing::{debug, info};

const SELECT_EMPLOYEES: &str = r#"
    SELECT
        e.employee_id,
        e.full_name,
        e.email,
        e.department,
        COUNT(a.id) AS total_present
    FROM employees e
    LEFT JOIN attendance a
        ON a.employee_id = e.employee_id AND a.status = 'Present'
"#;

/// Create Employee
#[utoipa::path(
    post,
    path = "/employees/",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Duplicate email or employee id", body = Object, example = json!({
            "detail": "Employee ID already exists"
        })),
        (status = 422, description = "Missing or malformed field", body = Object, example = json!({
            "detail": "Invalid email address"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    filter: web::Data<EmployeeIdFilter>,
    payload: web::Json<NewEmployee>,
) -> Result<impl Responder, ApiError> {
    let candidate = payload.into_inner();

    if let Some(field) = candidate.first_missing_field() {
        return Err(ApiError::unprocessable(format!("{field} is required")));
    }
    if !is_addressable_id(&candidate.employee_id) {
        return Err(ApiError::unprocessable("Invalid employee ID"));
    }
    if !is_plausible_email(&candidate.email) {
        return Err(ApiError::unprocessable("Invalid email address"));
    }

    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)",
    )
    .bind(&candidate.email)
    .fetch_one(pool.get_ref())
    .await?;
    if email_taken {
        return Err(ApiError::bad_request("Email already registered"));
    }

    // Cuckoo filter: a miss means the id is free without touching the table
    if filter.might_exist(&candidate.employee_id)
        && employee_exists(pool.get_ref(), &candidate.employee_id).await?
    {
        return Err(ApiError::bad_request("Employee ID already exists"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&candidate.employee_id)
    .bind(&candidate.full_name)
    .bind(&candidate.email)
    .bind(&candidate.department)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            filter.insert(&candidate.employee_id);
            info!(employee_id = %candidate.employee_id, "Employee created");
            Ok(HttpResponse::Created().json(candidate.into_employee()))
        }
        // lost a race with a concurrent insert of the same id or email
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(ApiError::bad_request(duplicate_detail(&*db_err)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Which unique column a failed insert collided with.
fn duplicate_detail(db_err: &dyn DatabaseError) -> &'static str {
    if db_err.message().contains("employees.email") {
        "Email already registered"
    } else {
        "Employee ID already exists"
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/employees/",
    responses(
        (status = 200, description = "All employees, oldest first", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let sql = format!("{SELECT_EMPLOYEES} GROUP BY e.employee_id ORDER BY e.rowid");
    debug!(sql = %sql, "Fetching employees");

    let employees = sqlx::query_as::<_, Employee>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    let sql = format!("{SELECT_EMPLOYEES} WHERE e.employee_id = ? GROUP BY e.employee_id");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(&employee_id)
        .fetch_optional(pool.get_ref())
        .await?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Err(ApiError::not_found("Employee not found")),
    }
}

/// Delete Employee together with its attendance records
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Successfully deleted"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    filter: web::Data<EmployeeIdFilter>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let employee_id = path.into_inner();

    if !filter.might_exist(&employee_id) {
        return Err(ApiError::not_found("Employee not found"));
    }

    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(&employee_id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    let cascaded = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(&employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    filter.remove(&employee_id);

    info!(
        employee_id = %employee_id,
        attendance_removed = cascaded.rows_affected(),
        "Employee deleted"
    );
    Ok(HttpResponse::NoContent().finish())
}

pub(crate) async fn employee_exists(pool: &SqlitePool, employee_id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ? LIMIT 1)",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await
}
