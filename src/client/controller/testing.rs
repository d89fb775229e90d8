use crate::client::error::ClientError;
use crate::client::prompt::UserPrompt;
use crate::client::store::RemoteStore;
use crate::model::attendance::AttendanceRecord;
use crate::model::dashboard::DashboardSummary;
use crate::model::employee::{Employee, NewEmployee};
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory store with per-operation call counters and switchable failures.
#[derive(Clone, Default)]
pub struct FakeStore {
    pub state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
pub struct FakeState {
    pub employees: Vec<Employee>,
    pub attendance: Vec<AttendanceRecord>,
    pub calls: HashMap<&'static str, usize>,
    /// Operations that fail with a 500 and no detail.
    pub broken: Vec<&'static str>,
    /// Yield once inside every call so concurrent callers interleave.
    pub yield_inside: bool,
}

impl FakeStore {
    pub fn with_employees(ids: &[&str]) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().employees = ids.iter().map(|id| employee(id)).collect();
        store
    }

    pub fn calls(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub fn break_op(&self, op: &'static str) {
        self.state.lock().unwrap().broken.push(op);
    }

    pub fn add_attendance(&self, employee_id: &str, date: &str, status: crate::model::attendance::AttendanceStatus) {
        self.state.lock().unwrap().attendance.push(record(employee_id, date, status));
    }

    async fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        let yield_inside = {
            let mut state = self.state.lock().unwrap();
            *state.calls.entry(op).or_default() += 1;
            if state.broken.contains(&op) {
                return Err(ClientError::Server {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            state.yield_inside
        };
        if yield_inside {
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

pub fn employee(id: &str) -> Employee {
    Employee {
        employee_id: id.to_string(),
        full_name: format!("Name of {id}"),
        email: format!("{}@example.com", id.to_lowercase()),
        department: "Engineering".to_string(),
        total_present: 0,
    }
}

pub fn record(employee_id: &str, date: &str, status: crate::model::attendance::AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: employee_id.to_string(),
        date: date.parse().unwrap(),
        status,
    }
}

fn rejected(detail: &str) -> ClientError {
    ClientError::Validation {
        status: StatusCode::BAD_REQUEST,
        detail: detail.to_string(),
    }
}

impl RemoteStore for FakeStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
        self.enter("list_employees").await?;
        Ok(self.state.lock().unwrap().employees.clone())
    }

    async fn create_employee(&self, candidate: &NewEmployee) -> Result<Employee, ClientError> {
        self.enter("create_employee").await?;
        let mut state = self.state.lock().unwrap();
        if state.employees.iter().any(|e| e.employee_id == candidate.employee_id) {
            return Err(rejected("Employee ID already exists"));
        }
        let created = candidate.clone().into_employee();
        state.employees.push(created.clone());
        Ok(created)
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<(), ClientError> {
        self.enter("delete_employee").await?;
        let mut state = self.state.lock().unwrap();
        let before = state.employees.len();
        state.employees.retain(|e| e.employee_id != employee_id);
        if state.employees.len() == before {
            return Err(ClientError::NotFound {
                detail: Some("Employee not found".into()),
            });
        }
        Ok(())
    }

    async fn get_employee(&self, employee_id: &str) -> Result<Employee, ClientError> {
        self.enter("get_employee").await?;
        self.state
            .lock()
            .unwrap()
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned()
            .ok_or(ClientError::NotFound { detail: None })
    }

    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<AttendanceRecord>, ClientError> {
        self.enter("list_attendance").await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .attendance
            .iter()
            .filter(|r| date.is_none_or(|d| r.date == d))
            .cloned()
            .collect())
    }

    async fn list_employee_attendance(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, ClientError> {
        self.enter("list_employee_attendance").await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn mark_attendance(&self, candidate: &AttendanceRecord) -> Result<AttendanceRecord, ClientError> {
        self.enter("mark_attendance").await?;
        let mut state = self.state.lock().unwrap();
        if !state.employees.iter().any(|e| e.employee_id == candidate.employee_id) {
            return Err(rejected("Employee not found"));
        }
        state.attendance.push(candidate.clone());
        Ok(candidate.clone())
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ClientError> {
        self.enter("dashboard_summary").await?;
        let state = self.state.lock().unwrap();
        Ok(DashboardSummary {
            total_employees: state.employees.len() as i64,
            present_today: 0,
        })
    }
}

/// Records alerts, answers confirmations with a fixed reply.
#[derive(Clone)]
pub struct ScriptedPrompt {
    pub alerts: Arc<Mutex<Vec<String>>>,
    pub confirms: Arc<Mutex<Vec<String>>>,
    pub answer: bool,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            alerts: Arc::default(),
            confirms: Arc::default(),
            answer,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.confirms.lock().unwrap().push(question.to_string());
        self.answer
    }
}
