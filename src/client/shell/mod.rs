//! Console stand-in for the browser shell: a navigation bar, one mounted page
//! at a time, and a footer.

pub mod command;
pub mod render;
pub mod route;

use crate::client::controller::{
    AttendanceController, DashboardController, EmployeeListController, Submission,
};
use crate::client::prompt::UserPrompt;
use crate::client::roster::RosterPolicy;
use crate::client::store::RemoteStore;
use command::Command;
use route::Route;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Page<S, P> {
    Dashboard(DashboardController<S>),
    Employees(EmployeeListController<S, P>),
    Attendance(AttendanceController<S, P>),
}

pub struct Shell<S, P> {
    store: S,
    prompt: P,
    roster_policy: RosterPolicy,
    route: Route,
    page: Page<S, P>,
}

impl<S: RemoteStore + Clone, P: UserPrompt + Clone> Shell<S, P> {
    /// Mount `route` and load it.
    pub async fn open(store: S, prompt: P, roster_policy: RosterPolicy, route: Route) -> Self {
        let page = Self::mount(&store, &prompt, roster_policy, route).await;
        Self {
            store,
            prompt,
            roster_policy,
            route,
            page,
        }
    }

    async fn mount(store: &S, prompt: &P, roster_policy: RosterPolicy, route: Route) -> Page<S, P> {
        info!(path = route.path(), "Mounting page");
        match route {
            Route::Dashboard => {
                let page = DashboardController::new(store.clone());
                page.load().await;
                Page::Dashboard(page)
            }
            Route::Employees => {
                let page = EmployeeListController::new(store.clone(), prompt.clone());
                page.load().await;
                Page::Employees(page)
            }
            Route::Attendance => {
                let page = AttendanceController::new(store.clone(), prompt.clone(), roster_policy);
                page.load().await;
                Page::Attendance(page)
            }
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Unmount the current page and mount `route`, even when it is the same
    /// one: every visit starts from fresh data.
    pub async fn navigate(&mut self, route: Route) {
        self.page = Self::mount(&self.store, &self.prompt, self.roster_policy, route).await;
        self.route = route;
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        let command = match command {
            Command::Quit => return Flow::Quit,
            Command::Go(route) => {
                self.navigate(route).await;
                return Flow::Continue;
            }
            other => other,
        };

        match (command, &self.page) {
            (Command::Quit | Command::Go(_), _) => {}
            (Command::Refresh, Page::Dashboard(page)) => {
                page.load().await;
            }
            (Command::Refresh, Page::Employees(page)) => {
                page.load().await;
            }
            (Command::Refresh, Page::Attendance(page)) => {
                page.load().await;
            }
            (Command::Add(form), Page::Employees(page)) => {
                if let Submission::Busy = page.submit(&form).await {
                    self.prompt.alert("Still saving the previous employee");
                }
            }
            (Command::Delete(employee_id), Page::Employees(page)) => {
                page.delete(&employee_id).await;
            }
            (Command::Mark(form), Page::Attendance(page)) => {
                if let Submission::Busy = page.submit(&form).await {
                    self.prompt.alert("Still saving the previous attendance");
                }
            }
            (Command::Filter(date), Page::Attendance(page)) => {
                page.set_filter(date).await;
            }
            (Command::Add(_) | Command::Delete(_), _) => {
                self.prompt.alert("Open the Employees page first: go employees");
            }
            (Command::Mark(_) | Command::Filter(_), _) => {
                self.prompt.alert("Open the Attendance page first: go attendance");
            }
        }
        Flow::Continue
    }

    pub fn render(&self) -> String {
        let body = match &self.page {
            Page::Dashboard(page) => render::dashboard(&page.state(), page.summary()),
            Page::Employees(page) => render::employees(&page.state(), &page.employees()),
            Page::Attendance(page) => render::attendance(
                &page.state(),
                page.filter(),
                &page.employees(),
                &page.lines(),
            ),
        };
        format!(
            "{}\n\n{}\n\n{}",
            render::navbar(self.route),
            body,
            render::footer()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::controller::testing::{FakeStore, ScriptedPrompt};
    use crate::model::attendance::AttendanceStatus;

    async fn shell(store: &FakeStore, prompt: &ScriptedPrompt, route: Route) -> Shell<FakeStore, ScriptedPrompt> {
        Shell::open(store.clone(), prompt.clone(), RosterPolicy::OncePerMount, route).await
    }

    #[tokio::test]
    async fn opens_on_the_dashboard() {
        let store = FakeStore::with_employees(&["E1", "E2"]);
        let prompt = ScriptedPrompt::answering(true);
        let shell = shell(&store, &prompt, Route::Dashboard).await;

        let screen = shell.render();
        assert!(screen.starts_with("HRMS Lite  [Dashboard]"));
        assert!(screen.contains("Total Employees: 2"));
        assert!(screen.ends_with("HRMS Lite"));
    }

    #[tokio::test]
    async fn navigating_back_remounts_and_refetches() {
        let store = FakeStore::with_employees(&["E1"]);
        let prompt = ScriptedPrompt::answering(true);
        let mut shell = shell(&store, &prompt, Route::Attendance).await;
        assert_eq!(store.calls("list_employees"), 1);

        shell.execute(Command::Go(Route::Employees)).await;
        shell.execute(Command::Go(Route::Attendance)).await;

        assert_eq!(shell.route(), Route::Attendance);
        assert_eq!(store.calls("list_attendance"), 2);
        // roster: first attendance mount, employees page, second attendance mount
        assert_eq!(store.calls("list_employees"), 3);
    }

    #[tokio::test]
    async fn employee_commands_drive_the_page() {
        let store = FakeStore::with_employees(&["E1"]);
        let prompt = ScriptedPrompt::answering(true);
        let mut shell = shell(&store, &prompt, Route::Employees).await;

        let add = command::parse(r#"add E2 "Grace Hopper" grace@navy.mil Research"#)
            .unwrap()
            .unwrap();
        shell.execute(add).await;
        assert!(shell.render().contains("Grace Hopper"));

        shell.execute(Command::Delete("E1".into())).await;
        let screen = shell.render();
        assert!(!screen.contains("Name of E1"));
        assert!(prompt.alerts().is_empty());
    }

    #[tokio::test]
    async fn page_specific_commands_elsewhere_are_refused() {
        let store = FakeStore::with_employees(&["E1"]);
        let prompt = ScriptedPrompt::answering(true);
        let mut shell = shell(&store, &prompt, Route::Dashboard).await;

        shell.execute(Command::Delete("E1".into())).await;
        shell.execute(Command::Filter(None)).await;

        assert_eq!(store.calls("delete_employee"), 0);
        assert_eq!(
            prompt.alerts(),
            [
                "Open the Employees page first: go employees",
                "Open the Attendance page first: go attendance"
            ]
        );
    }

    #[tokio::test]
    async fn attendance_page_lists_most_recent_first() {
        let store = FakeStore::with_employees(&["empA", "empB"]);
        store.add_attendance("empA", "2024-01-01", AttendanceStatus::Present);
        store.add_attendance("empB", "2024-01-02", AttendanceStatus::Absent);
        let prompt = ScriptedPrompt::answering(true);
        let shell = shell(&store, &prompt, Route::Attendance).await;

        let screen = shell.render();
        let log = &screen[screen.find("Attendance Records").unwrap()..];
        let b = log.find("Name of empB").unwrap();
        let a = log.find("Name of empA").unwrap();
        assert!(b < a);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let store = FakeStore::default();
        let prompt = ScriptedPrompt::answering(true);
        let mut shell = shell(&store, &prompt, Route::Dashboard).await;
        assert_eq!(shell.execute(Command::Quit).await, Flow::Quit);
    }
}
