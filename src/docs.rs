use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::dashboard::DashboardSummary;
use crate::model::employee::{Employee, NewEmployee};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "0.1.0",
        description = r#"
## HRMS Lite

A small record store for the two core HR objects of a team.

### Key Features
- **Employees**: add, list, inspect and remove employees; each listing carries the
  number of days the employee was marked present
- **Attendance**: mark one record per employee and day, list all records or a
  single day, list one employee's history
- **Dashboard**: head count and the number of employees present today

### Response Format
- JSON bodies with named fields, dates as `YYYY-MM-DD`
- Every failure carries a human readable `detail` message
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_employee_attendance,

        crate::api::dashboard::summary
    ),
    components(
        schemas(
            Employee,
            NewEmployee,
            AttendanceRecord,
            AttendanceStatus,
            DashboardSummary
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Aggregate counts"),
    )
)]
pub struct ApiDoc;
