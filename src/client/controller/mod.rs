//! Per-page state holders. Each controller owns a local copy of the records it
//! shows, keeps it in step with the remote store after its own mutations, and
//! reports every failure to the user through a [`UserPrompt`].
//!
//! [`UserPrompt`]: crate::client::prompt::UserPrompt

pub mod attendance;
pub mod dashboard;
pub mod employees;

#[cfg(test)]
pub(crate) mod testing;

pub use attendance::{AttendanceController, AttendanceForm, AttendanceLine};
pub use dashboard::DashboardController;
pub use employees::EmployeeListController;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Failed(String),
}

/// Result of a form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission<T> {
    /// Accepted by the store and merged into the local copy.
    Done(T),
    /// Blocked locally, nothing was sent.
    Invalid(String),
    /// Rejected by the store or never answered.
    Failed(String),
    /// The same action is still in flight.
    Busy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deletion {
    Removed,
    Cancelled,
    Failed(String),
    Busy,
}
