use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
    ToSchema,
)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "date": "2024-01-02",
        "status": "Present"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-02", format = "date", value_type = String)]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}

/// Raw attendance row; `status` is kept as text in the table.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = strum::ParseError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.employee_id,
            date: row.date,
            status: row.status.parse()?,
        })
    }
}

/// Stable sort, most recent date first. Records sharing a date keep their
/// relative order from `records`.
pub fn sort_by_date_desc<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Vec<&'a AttendanceRecord> {
    let mut sorted: Vec<_> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
