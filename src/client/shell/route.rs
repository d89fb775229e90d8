use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum Route {
    Dashboard,
    Employees,
    Attendance,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Employees => "/employees",
            Self::Attendance => "/attendance",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Employees => "Employee Management",
            Self::Attendance => "Attendance Management",
        }
    }

    /// Accepts the path (`/employees`) or the bare name (`employees`).
    pub fn resolve(input: &str) -> Option<Self> {
        let input = input.trim();
        if input == "/" {
            return Some(Self::Dashboard);
        }

        let name = input.trim_start_matches('/');
        if name.is_empty() {
            return None;
        }
        Self::iter().find(|route| {
            route.path().trim_start_matches('/') == name || route.to_string().eq_ignore_ascii_case(name)
        })
    }
}
