use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::model::attendance::AttendanceRecord;
use crate::model::dashboard::DashboardSummary;
use crate::model::employee::{Employee, NewEmployee};
use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// The business operations of the remote record store.
///
/// Implementations do no caching and no retries; callers own both.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, ClientError>;

    async fn create_employee(&self, candidate: &NewEmployee) -> Result<Employee, ClientError>;

    async fn delete_employee(&self, employee_id: &str) -> Result<(), ClientError>;

    async fn get_employee(&self, employee_id: &str) -> Result<Employee, ClientError>;

    /// All records, or only those dated `date` when given.
    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<AttendanceRecord>, ClientError>;

    async fn list_employee_attendance(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, ClientError>;

    /// A reference to an unknown employee comes back as `ClientError::Validation`.
    async fn mark_attendance(&self, candidate: &AttendanceRecord) -> Result<AttendanceRecord, ClientError>;

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ClientError>;
}

/// `RemoteStore` over the HRMS Lite HTTP API.
#[derive(Clone, Debug)]
pub struct HttpStore {
    http: Client,
    base: Url,
}

impl HttpStore {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL {:?}", config.base_url))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("API base URL {:?} cannot carry a path", config.base_url));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// Base URL plus encoded path segments; an empty last segment keeps the
    /// trailing slash of collection endpoints.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "Remote store request");
        self.http.request(method, url)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let resp = ensure_success(resp).await?;
    Ok(resp.json::<T>().await?)
}

async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().clone();
    let body = resp.bytes().await?;
    let err = ClientError::from_response(status, &body);
    warn!(%url, %status, error = %err, "Remote store rejected request");
    Err(err)
}

impl RemoteStore for HttpStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
        let resp = self.request(Method::GET, &["employees", ""]).send().await?;
        decode(resp).await
    }

    async fn create_employee(&self, candidate: &NewEmployee) -> Result<Employee, ClientError> {
        let resp = self
            .request(Method::POST, &["employees", ""])
            .json(candidate)
            .send()
            .await?;
        decode(resp).await
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<(), ClientError> {
        let resp = self
            .request(Method::DELETE, &["employees", employee_id])
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn get_employee(&self, employee_id: &str) -> Result<Employee, ClientError> {
        let resp = self
            .request(Method::GET, &["employees", employee_id])
            .send()
            .await?;
        decode(resp).await
    }

    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<AttendanceRecord>, ClientError> {
        let mut request = self.request(Method::GET, &["attendance", ""]);
        if let Some(date) = date {
            request = request.query(&[("date", date.to_string())]);
        }
        decode(request.send().await?).await
    }

    async fn list_employee_attendance(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, ClientError> {
        let resp = self
            .request(Method::GET, &["attendance", employee_id])
            .send()
            .await?;
        decode(resp).await
    }

    async fn mark_attendance(&self, candidate: &AttendanceRecord) -> Result<AttendanceRecord, ClientError> {
        let resp = self
            .request(Method::POST, &["attendance", ""])
            .json(candidate)
            .send()
            .await?;
        decode(resp).await.map_err(ClientError::not_found_as_validation)
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, ClientError> {
        let resp = self
            .request(Method::GET, &["dashboard", "summary"])
            .send()
            .await?;
        decode(resp).await
    }
}
