use super::{Deletion, Submission, ViewState};
use crate::client::in_flight::InFlight;
use crate::client::prompt::UserPrompt;
use crate::client::store::RemoteStore;
use crate::model::employee::{Employee, NewEmployee};
use std::sync::Mutex;
use tracing::{info, warn};

pub const DELETE_QUESTION: &str = "Are you sure you want to delete this employee?";

/// Employee roster page: list, add, delete.
pub struct EmployeeListController<S, P> {
    store: S,
    prompt: P,
    view: Mutex<EmployeeView>,
    creating: InFlight,
    deleting: InFlight,
}

struct EmployeeView {
    state: ViewState,
    employees: Vec<Employee>,
}

impl<S: RemoteStore, P: UserPrompt> EmployeeListController<S, P> {
    pub fn new(store: S, prompt: P) -> Self {
        Self {
            store,
            prompt,
            view: Mutex::new(EmployeeView {
                state: ViewState::Loading,
                employees: Vec::new(),
            }),
            creating: InFlight::default(),
            deleting: InFlight::default(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.view.lock().expect("employee view poisoned").state.clone()
    }

    /// Local copy, in the order the store listed them followed by local additions.
    pub fn employees(&self) -> Vec<Employee> {
        self.view.lock().expect("employee view poisoned").employees.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.creating.is_busy()
    }

    /// Fetch the roster; on failure the previous copy is kept.
    pub async fn load(&self) -> ViewState {
        self.view.lock().expect("employee view poisoned").state = ViewState::Loading;

        let result = self.store.list_employees().await;

        let mut view = self.view.lock().expect("employee view poisoned");
        match result {
            Ok(employees) => {
                info!(count = employees.len(), "Employee roster loaded");
                view.employees = employees;
                view.state = ViewState::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch employees");
                view.state = ViewState::Failed("Failed to fetch employees".to_string());
            }
        }
        view.state.clone()
    }

    /// Validate locally, create remotely, append the stored employee.
    pub async fn submit(&self, form: &NewEmployee) -> Submission<Employee> {
        if let Some(field) = form.first_missing_field() {
            let message = format!("{field} is required");
            self.prompt.alert(&message);
            return Submission::Invalid(message);
        }

        let Some(_guard) = self.creating.try_begin() else {
            return Submission::Busy;
        };

        match self.store.create_employee(form).await {
            Ok(created) => {
                info!(employee_id = %created.employee_id, "Employee added");
                self.view
                    .lock()
                    .expect("employee view poisoned")
                    .employees
                    .push(created.clone());
                Submission::Done(created)
            }
            Err(e) => {
                warn!(error = %e, "Failed to add employee");
                let message = e.user_message("Failed to add employee");
                self.prompt.alert(&message);
                Submission::Failed(message)
            }
        }
    }

    /// Ask for confirmation, delete remotely, drop the matching local entry.
    pub async fn delete(&self, employee_id: &str) -> Deletion {
        if !self.prompt.confirm(DELETE_QUESTION) {
            return Deletion::Cancelled;
        }

        let Some(_guard) = self.deleting.try_begin() else {
            return Deletion::Busy;
        };

        match self.store.delete_employee(employee_id).await {
            Ok(()) => {
                info!(employee_id, "Employee deleted");
                self.view
                    .lock()
                    .expect("employee view poisoned")
                    .employees
                    .retain(|e| e.employee_id != employee_id);
                Deletion::Removed
            }
            Err(e) => {
                warn!(error = %e, employee_id, "Failed to delete employee");
                let message = "Failed to delete employee".to_string();
                self.prompt.alert(&message);
                Deletion::Failed(message)
            }
        }
    }
}
