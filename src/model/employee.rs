use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "total_present": 12
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    /// Number of `Present` attendance records, computed by the store.
    #[serde(default)]
    #[schema(example = 12)]
    pub total_present: i64,
}

/// An employee as submitted for creation: everything but the computed counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "john@email.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

impl NewEmployee {
    /// Name of the first blank required field, in form order.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("Employee ID", &self.employee_id),
            ("Full name", &self.full_name),
            ("Email", &self.email),
            ("Department", &self.department),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
    }

    pub fn into_employee(self) -> Employee {
        Employee {
            employee_id: self.employee_id,
            full_name: self.full_name,
            email: self.email,
            department: self.department,
            total_present: 0,
        }
    }
}

/// Ids become a single URL path segment (`/employees/{id}`). Dot segments
/// are collapsed by URL normalisation and could never be addressed again.
pub fn is_addressable_id(employee_id: &str) -> bool {
    !matches!(employee_id.trim(), "." | "..")
}

/// Loose `local@domain.tld` shape check.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
