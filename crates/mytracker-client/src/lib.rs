//! HTTP access to the tracker backend
//!
//! [`HttpDashboardApi`] implements the dashboard's backend calls with
//! reqwest: two JSON reads and the multipart quick-add post.

pub mod error;

use async_trait::async_trait;
use mytracker_config::Config;
use mytracker_core::{ChartData, CoreResult, DashboardApi, FormData, SubmitOutcome, SummaryFigures};
use reqwest::Url;
use serde::de::DeserializeOwned;

pub use error::ClientError;

/// reqwest-backed [`DashboardApi`]
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: reqwest::Client,
    submit_client: reqwest::Client,
    add_url: Url,
    summary_url: Url,
    chart_data_url: Url,
}

fn endpoint(config: &Config, path: &str) -> Result<Url, ClientError> {
    let url = config.endpoint_url(path);
    Url::parse(&url).map_err(|e| ClientError::InvalidUrl { url, message: e.to_string() })
}

impl HttpDashboardApi {
    /// Build a client for the configured backend.
    ///
    /// Every request carries the `http.timeout_secs` timeout. The quick-add
    /// post does not follow redirects so that any 3xx answer is reported,
    /// including one that points back at the add endpoint.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let submit_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            submit_client,
            add_url: endpoint(config, &config.endpoints.add)?,
            summary_url: endpoint(config, &config.endpoints.summary)?,
            chart_data_url: endpoint(config, &config.endpoints.chart_data)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ClientError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ClientError::from_reqwest(url.as_str(), e))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::from_reqwest(url.as_str(), e))
    }

    async fn post_form(&self, form: &FormData) -> Result<SubmitOutcome, ClientError> {
        let mut body = reqwest::multipart::Form::new();
        for (name, value) in form.iter() {
            body = body.text(name.to_string(), value.to_string());
        }

        log::debug!("POST {} ({} fields)", self.add_url, form.len());
        let response = self
            .submit_client
            .post(self.add_url.clone())
            .multipart(body)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(self.add_url.as_str(), e))?;

        let status = response.status();
        if status.is_redirection() {
            if let Some(url) = self.redirect_target(&response)? {
                return Ok(SubmitOutcome::Redirected { url: url.to_string() });
            }
        }
        Ok(SubmitOutcome::Stayed { status: status.as_u16() })
    }

    /// `Location` of a redirect answer, resolved against the add endpoint
    fn redirect_target(&self, response: &reqwest::Response) -> Result<Option<Url>, ClientError> {
        let Some(location) = response.headers().get(reqwest::header::LOCATION) else {
            return Ok(None);
        };
        let location = location.to_str().map_err(|e| ClientError::InvalidUrl {
            url: format!("{:?}", location),
            message: e.to_string(),
        })?;
        self.add_url
            .join(location)
            .map(Some)
            .map_err(|e| ClientError::InvalidUrl { url: location.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_summary(&self) -> CoreResult<SummaryFigures> {
        Ok(self.get_json(&self.summary_url).await?)
    }

    async fn fetch_chart_data(&self) -> CoreResult<ChartData> {
        Ok(self.get_json(&self.chart_data_url).await?)
    }

    async fn submit_quick_add(&self, form: &FormData) -> CoreResult<SubmitOutcome> {
        Ok(self.post_form(form).await?)
    }
}

// ==================== Tests ====================
