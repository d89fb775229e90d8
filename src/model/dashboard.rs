use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 37)]
    pub present_today: i64,
}
