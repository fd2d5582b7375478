use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info};

use crate::aggregator::{self, ResultSet};
use crate::api::{self, ApiError, ClientSettings, HttpClientError, UserApi};
use crate::config::{DEFAULT_DESIRED_TOTAL, DEFAULT_MAX_PER_REQUEST};
use crate::model::UserRecord;
use crate::planner::{self, FetchPlan, PlanError};

#[derive(Clone, Debug)]
pub struct Options {
    pub desired_total: usize,
    pub max_per_request: usize,
    pub base_url: String,
    pub fields: String,
    pub seed: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            desired_total: DEFAULT_DESIRED_TOTAL,
            max_per_request: DEFAULT_MAX_PER_REQUEST,
            base_url: api::DEFAULT_BASE_URL.to_string(),
            fields: api::DEFAULT_FIELDS.to_string(),
            seed: api::DEFAULT_SEED.to_string(),
            timeout_seconds: 30,
            proxy: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid fetch plan: {source}")]
    Plan {
        #[source]
        source: PlanError,
    },

    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("seed must not be empty")]
    EmptySeed,

    #[error("fields list must not be empty")]
    EmptyFields,

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching users failed: {source}")]
    Fetch {
        #[source]
        source: ApiError,
    },
}

#[derive(Clone, Debug)]
pub struct FetchResult {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub plan: FetchPlan,
    pub users: ResultSet<UserRecord>,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    plan: FetchPlan,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        let plan = planner::plan(options.desired_total, options.max_per_request)
            .map_err(|source| RunnerError::Plan { source })?;
        if options.seed.trim().is_empty() {
            return Err(RunnerError::EmptySeed);
        }
        if options.fields.trim().is_empty() {
            return Err(RunnerError::EmptyFields);
        }
        if let Err(e) = reqwest::Url::parse(&options.base_url) {
            return Err(RunnerError::InvalidBaseUrl {
                url: options.base_url.clone(),
                message: e.to_string(),
            });
        }
        Ok(Self { options, plan })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.options.base_url.clone(),
            fields: self.options.fields.clone(),
            seed: self.options.seed.clone(),
        }
    }

    pub fn build_api(&self) -> Result<UserApi, RunnerError> {
        let http = build_client(self.options.proxy.as_deref(), self.options.timeout_seconds)?;
        Ok(UserApi::new(http, self.client_settings()))
    }

    pub async fn run(&self) -> Result<FetchResult, RunnerError> {
        let api = self.build_api()?;
        self.run_with(&api).await
    }

    pub async fn run_with(&self, api: &UserApi) -> Result<FetchResult, RunnerError> {
        let started_at = Instant::now();
        info!(
            requests = self.plan.request_count,
            per_request = self.plan.records_per_request,
            deficit = self.plan.first_request_deficit,
            "fetching {} users",
            self.options.desired_total
        );

        let users = aggregator::aggregate(&self.plan, |index, size| api.fetch_page(index, size))
            .await
            .map_err(|source| {
                error!(error = %source, "aggregation failed");
                RunnerError::Fetch { source }
            })?;

        let elapsed = started_at.elapsed();
        info!(
            users = users.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "users fetched"
        );
        Ok(FetchResult {
            started_at,
            elapsed,
            plan: self.plan,
            users,
        })
    }
}

fn build_client(proxy: Option<&str>, timeout_seconds: usize) -> Result<reqwest::Client, RunnerError> {
    api::build_http_client(proxy, timeout_seconds).map_err(|e| match e {
        HttpClientError::Proxy { proxy, source } => RunnerError::ProxySetup { proxy, source },
        HttpClientError::Build { source } => RunnerError::HttpClientBuild { source },
    })
}
