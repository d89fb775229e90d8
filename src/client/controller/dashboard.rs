use super::ViewState;
use crate::client::store::RemoteStore;
use crate::model::dashboard::DashboardSummary;
use std::sync::Mutex;
use tracing::warn;

/// Landing page: the store's head count and today's presence.
///
/// The summary is never cached past the current mount.
pub struct DashboardController<S> {
    store: S,
    view: Mutex<(ViewState, Option<DashboardSummary>)>,
}

impl<S: RemoteStore> DashboardController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: Mutex::new((ViewState::Loading, None)),
        }
    }

    pub fn state(&self) -> ViewState {
        self.view.lock().expect("dashboard view poisoned").0.clone()
    }

    pub fn summary(&self) -> Option<DashboardSummary> {
        self.view.lock().expect("dashboard view poisoned").1
    }

    pub async fn load(&self) -> ViewState {
        self.view.lock().expect("dashboard view poisoned").0 = ViewState::Loading;

        let result = self.store.dashboard_summary().await;

        let mut view = self.view.lock().expect("dashboard view poisoned");
        *view = match result {
            Ok(summary) => (ViewState::Ready, Some(summary)),
            Err(e) => {
                warn!(error = %e, "Failed to fetch dashboard summary");
                (ViewState::Failed("Failed to fetch dashboard summary".to_string()), None)
            }
        };
        view.0.clone()
    }
}
