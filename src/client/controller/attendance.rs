use super::{Submission, ViewState};
use crate::client::error::ClientError;
use crate::client::in_flight::InFlight;
use crate::client::prompt::UserPrompt;
use crate::client::roster::{RosterCache, RosterPolicy};
use crate::client::store::RemoteStore;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, sort_by_date_desc};
use crate::model::employee::Employee;
use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// The mark-attendance form. No employee selected is `None` (or blank).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceForm {
    pub employee_id: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl Default for AttendanceForm {
    fn default() -> Self {
        Self {
            employee_id: None,
            date: Local::now().date_naive(),
            status: AttendanceStatus::Present,
        }
    }
}

impl AttendanceForm {
    fn selected_employee(&self) -> Option<&str> {
        self.employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// One displayed row: the record with its employee id resolved to a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceLine {
    pub date: NaiveDate,
    pub employee_name: String,
    pub status: AttendanceStatus,
}

/// Attendance page: date-filtered log plus the mark-attendance form.
pub struct AttendanceController<S, P> {
    store: S,
    prompt: P,
    roster: RosterCache,
    view: Mutex<AttendanceView>,
    marking: InFlight,
    // bumped by every load; only the latest load may publish its result
    generation: AtomicU64,
}

struct AttendanceView {
    state: ViewState,
    filter: Option<NaiveDate>,
    records: Vec<AttendanceRecord>,
    employees: Arc<Vec<Employee>>,
}

impl<S: RemoteStore, P: UserPrompt> AttendanceController<S, P> {
    pub fn new(store: S, prompt: P, roster_policy: RosterPolicy) -> Self {
        Self {
            store,
            prompt,
            roster: RosterCache::new(roster_policy),
            view: Mutex::new(AttendanceView {
                state: ViewState::Loading,
                filter: None,
                records: Vec::new(),
                employees: Arc::default(),
            }),
            marking: InFlight::default(),
            generation: AtomicU64::new(0),
        }
    }

    fn view(&self) -> std::sync::MutexGuard<'_, AttendanceView> {
        self.view.lock().expect("attendance view poisoned")
    }

    pub fn state(&self) -> ViewState {
        self.view().state.clone()
    }

    pub fn filter(&self) -> Option<NaiveDate> {
        self.view().filter
    }

    /// Records in the order they were fetched or added.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.view().records.clone()
    }

    pub fn employees(&self) -> Arc<Vec<Employee>> {
        Arc::clone(&self.view().employees)
    }

    pub fn is_submitting(&self) -> bool {
        self.marking.is_busy()
    }

    /// Name of a cached employee, or the id itself when it is not cached.
    pub fn employee_name(&self, employee_id: &str) -> String {
        resolve_name(&self.view().employees, employee_id).to_string()
    }

    /// Most recent first, names resolved; ties keep their fetched order.
    pub fn lines(&self) -> Vec<AttendanceLine> {
        let view = self.view();
        sort_by_date_desc(&view.records)
            .into_iter()
            .map(|record| AttendanceLine {
                date: record.date,
                employee_name: resolve_name(&view.employees, &record.employee_id).to_string(),
                status: record.status,
            })
            .collect()
    }

    /// Change the date filter and refetch the log.
    pub async fn set_filter(&self, date: Option<NaiveDate>) -> ViewState {
        self.view().filter = date;
        self.load().await
    }

    /// Fetch the log for the current filter, and the roster when the cache
    /// has none that is fresh enough.
    pub async fn load(&self) -> ViewState {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let filter = {
            let mut view = self.view();
            view.state = ViewState::Loading;
            view.filter
        };

        let result = self.fetch(filter).await;

        let mut view = self.view();
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(generation, "Discarding superseded attendance load");
            return view.state.clone();
        }

        match result {
            Ok((records, employees)) => {
                info!(count = records.len(), filter = ?filter, "Attendance loaded");
                view.records = records;
                view.employees = employees;
                view.state = ViewState::Ready;
            }
            Err(e) => {
                warn!(error = %e, filter = ?filter, "Failed to fetch attendance");
                let message = "Failed to fetch data".to_string();
                self.prompt.alert(&message);
                view.state = ViewState::Failed(message);
            }
        }
        view.state.clone()
    }

    async fn fetch(
        &self,
        filter: Option<NaiveDate>,
    ) -> Result<(Vec<AttendanceRecord>, Arc<Vec<Employee>>), ClientError> {
        let records = self.store.list_attendance(filter).await?;

        let employees = match self.roster.fresh().await {
            Some(roster) => roster,
            None => {
                let roster = self.store.list_employees().await?;
                self.roster.store(roster).await
            }
        };

        Ok((records, employees))
    }

    /// Validate locally, mark remotely, append the stored record.
    pub async fn submit(&self, form: &AttendanceForm) -> Submission<AttendanceRecord> {
        let Some(employee_id) = form.selected_employee() else {
            let message = "Please select an employee".to_string();
            self.prompt.alert(&message);
            return Submission::Invalid(message);
        };

        let Some(_guard) = self.marking.try_begin() else {
            return Submission::Busy;
        };

        let candidate = AttendanceRecord {
            employee_id: employee_id.to_string(),
            date: form.date,
            status: form.status,
        };

        match self.store.mark_attendance(&candidate).await {
            Ok(marked) => {
                info!(employee_id = %marked.employee_id, date = %marked.date, "Attendance marked");
                self.view().records.push(marked.clone());
                self.prompt.alert("Attendance marked successfully");
                Submission::Done(marked)
            }
            Err(e) => {
                warn!(error = %e, "Failed to mark attendance");
                let message = e.user_message("Failed to mark attendance");
                self.prompt.alert(&message);
                Submission::Failed(message)
            }
        }
    }
}

fn resolve_name<'a>(employees: &'a [Employee], employee_id: &'a str) -> &'a str {
    employees
        .iter()
        .find(|e| e.employee_id == employee_id)
        .map_or(employee_id, |e| e.full_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::controller::testing::{FakeStore, ScriptedPrompt};
    use AttendanceStatus::{Absent, Present};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn form(employee_id: Option<&str>, day: &str) -> AttendanceForm {
        AttendanceForm {
            employee_id: employee_id.map(str::to_string),
            date: date(day),
            status: Present,
        }
    }

    fn seeded() -> FakeStore {
        let store = FakeStore::with_employees(&["empA", "empB"]);
        store.add_attendance("empA", "2024-01-01", Present);
        store.add_attendance("empB", "2024-01-02", Absent);
        store
    }

    #[tokio::test]
    async fn lines_are_sorted_most_recent_first_with_names() {
        let ctl = AttendanceController::new(seeded(), ScriptedPrompt::answering(true), RosterPolicy::OncePerMount);
        assert_eq!(ctl.load().await, ViewState::Ready);

        let lines = ctl.lines();
        assert_eq!(
            lines,
            [
                AttendanceLine {
                    date: date("2024-01-02"),
                    employee_name: "Name of empB".into(),
                    status: Absent
                },
                AttendanceLine {
                    date: date("2024-01-01"),
                    employee_name: "Name of empA".into(),
                    status: Present
                },
            ]
        );
        // underlying order untouched
        assert_eq!(ctl.records()[0].employee_id, "empA");
    }

    #[tokio::test]
    async fn unknown_employee_is_shown_by_id() {
        let store = seeded();
        store.add_attendance("ghost", "2024-01-03", Present);
        let ctl = AttendanceController::new(store, ScriptedPrompt::answering(true), RosterPolicy::OncePerMount);
        ctl.load().await;

        assert_eq!(ctl.lines()[0].employee_name, "ghost");
        assert_eq!(ctl.employee_name("empA"), "Name of empA");
    }

    #[tokio::test]
    async fn filter_change_refetches_attendance_but_not_the_roster() {
        let store = seeded();
        let ctl = AttendanceController::new(store.clone(), ScriptedPrompt::answering(true), RosterPolicy::OncePerMount);
        ctl.load().await;

        assert_eq!(ctl.set_filter(Some(date("2024-01-02"))).await, ViewState::Ready);
        let records = ctl.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "empB");

        assert_eq!(ctl.set_filter(None).await, ViewState::Ready);
        assert_eq!(ctl.records().len(), 2);

        assert_eq!(store.calls("list_attendance"), 3);
        assert_eq!(store.calls("list_employees"), 1);
    }

    #[tokio::test]
    async fn always_policy_refetches_the_roster_on_every_load() {
        let store = seeded();
        let ctl = AttendanceController::new(store.clone(), ScriptedPrompt::answering(true), RosterPolicy::Always);
        ctl.load().await;
        ctl.set_filter(Some(date("2024-01-01"))).await;

        assert_eq!(store.calls("list_employees"), 2);
    }

    #[tokio::test]
    async fn no_selection_blocks_the_remote_call() {
        let store = seeded();
        let prompt = ScriptedPrompt::answering(true);
        let ctl = AttendanceController::new(store.clone(), prompt.clone(), RosterPolicy::OncePerMount);
        ctl.load().await;

        for empty in [None, Some("  ")] {
            assert_eq!(
                ctl.submit(&form(empty, "2024-01-05")).await,
                Submission::Invalid("Please select an employee".into())
            );
        }
        assert_eq!(store.calls("mark_attendance"), 0);
        assert_eq!(prompt.alerts(), ["Please select an employee", "Please select an employee"]);
    }

    #[tokio::test]
    async fn marked_record_is_appended_without_refetch() {
        let store = seeded();
        let prompt = ScriptedPrompt::answering(true);
        let ctl = AttendanceController::new(store.clone(), prompt.clone(), RosterPolicy::OncePerMount);
        ctl.load().await;

        let outcome = ctl.submit(&form(Some("empB"), "2024-01-05")).await;
        assert!(matches!(outcome, Submission::Done(ref r) if r.employee_id == "empB"));
        assert_eq!(ctl.records().len(), 3);
        assert_eq!(ctl.lines()[0].date, date("2024-01-05"));
        assert_eq!(store.calls("list_attendance"), 1);
        assert_eq!(prompt.alerts(), ["Attendance marked successfully"]);
    }

    #[tokio::test]
    async fn rejected_mark_shows_server_detail() {
        let store = seeded();
        let prompt = ScriptedPrompt::answering(true);
        let ctl = AttendanceController::new(store, prompt.clone(), RosterPolicy::OncePerMount);
        ctl.load().await;

        assert_eq!(
            ctl.submit(&form(Some("nobody"), "2024-01-05")).await,
            Submission::Failed("Employee not found".into())
        );
        assert_eq!(ctl.records().len(), 2);
    }

    #[tokio::test]
    async fn load_failure_alerts_and_fails_the_view() {
        let store = seeded();
        store.break_op("list_attendance");
        let prompt = ScriptedPrompt::answering(true);
        let ctl = AttendanceController::new(store, prompt.clone(), RosterPolicy::OncePerMount);

        assert_eq!(ctl.load().await, ViewState::Failed("Failed to fetch data".into()));
        assert_eq!(prompt.alerts(), ["Failed to fetch data"]);
    }

    #[tokio::test]
    async fn superseded_load_does_not_overwrite_newer_result() {
        let store = seeded();
        store.state.lock().unwrap().yield_inside = true;
        let ctl = AttendanceController::new(store, ScriptedPrompt::answering(true), RosterPolicy::OncePerMount);

        // the first load starts unfiltered, the filter change overtakes it
        let (_, second) = futures::join!(ctl.load(), ctl.set_filter(Some(date("2024-01-02"))));
        assert_eq!(second, ViewState::Ready);
        assert_eq!(ctl.state(), ViewState::Ready);

        let records = ctl.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, "empB");
    }

    #[tokio::test]
    async fn concurrent_marks_are_serialised_by_the_busy_flag() {
        let store = seeded();
        store.state.lock().unwrap().yield_inside = true;
        let ctl = AttendanceController::new(store.clone(), ScriptedPrompt::answering(true), RosterPolicy::OncePerMount);
        ctl.load().await;

        let (for_a, for_b) = (form(Some("empA"), "2024-02-01"), form(Some("empB"), "2024-02-01"));
        let (first, second) = futures::join!(ctl.submit(&for_a), ctl.submit(&for_b));
        assert!(matches!(first, Submission::Done(_)));
        assert_eq!(second, Submission::Busy);
        assert_eq!(store.calls("mark_attendance"), 1);
    }

    #[test]
    fn form_defaults_to_today_and_present() {
        let form = AttendanceForm::default();
        assert_eq!(form.employee_id, None);
        assert_eq!(form.date, Local::now().date_naive());
        assert_eq!(form.status, Present);
    }
}
