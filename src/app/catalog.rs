// src/app/catalog.rs
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::app::types::{LoadStatus, Video};
use crate::config::AppConfig;
use crate::error::CatalogError;

/// One-shot `GET {api}/videos`.
#[derive(Clone, Debug)]
pub struct CatalogLoader {
    api_domain: String,
    url: String,
    timeout: Duration,
}

impl CatalogLoader {
    pub fn new(api_domain: impl Into<String>, timeout: Duration) -> Self {
        let api_domain = api_domain.into();
        let url = format!("{api_domain}/api/videos");
        Self {
            api_domain,
            url,
            timeout,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.api_domain.clone(), cfg.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    pub fn fetch(&self) -> Result<Vec<Video>, CatalogError> {
        let domain = self.api_domain.trim();
        if domain.is_empty() {
            return Err(CatalogError::Config("the API domain is not set".into()));
        }
        if !(domain.starts_with("http://") || domain.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "the API domain must start with http:// or https:// (got {domain})"
            )));
        }

        let client = Client::builder()
            .user_agent("protube/catalog")
            .timeout(self.timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("http client: {e}")))?;

        let resp = client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| self.classify(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = resp.bytes().map_err(|e| self.classify(&e))?;
        parse_catalog(&body)
    }

    fn classify(&self, e: &reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::NoResponse
        } else if e.is_connect() {
            CatalogError::Connect {
                domain: self.api_domain.clone(),
            }
        } else if e.is_builder() {
            CatalogError::Config(e.to_string())
        } else {
            CatalogError::NoResponse
        }
    }
}

/// The body must be a JSON array. Elements that do not decode as a record are
/// kept as empty records so the grid can still draw fallback art for them.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Video>, CatalogError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(CatalogError::Malformed(format!("got {}", kind_of(&value))));
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Video>(item).unwrap_or_else(|e| {
                warn!("Catalog entry {i} is not a video record ({e})");
                Video::default()
            })
        })
        .collect())
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Clone, Debug)]
pub struct CatalogState {
    pub status: LoadStatus,
    pub message: String,
    pub videos: Vec<Video>,
    pub error: Option<CatalogError>,
    pub fetched_at: Option<DateTime<Local>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            message: "Loading...".to_string(),
            videos: Vec::new(),
            error: None,
            fetched_at: None,
        }
    }
}

impl CatalogState {
    fn finish(&mut self, result: Result<Vec<Video>, CatalogError>) {
        match result {
            Ok(videos) => {
                self.message = format!("{} videos loaded successfully", videos.len());
                info!("{}", self.message);
                self.status = LoadStatus::Success;
                self.videos = videos;
                self.error = None;
                self.fetched_at = Some(Local::now());
            }
            Err(e) => {
                error!("Catalog fetch failed: {e}");
                self.status = LoadStatus::Error;
                self.message = e.to_string();
                self.videos.clear();
                self.error = Some(e);
            }
        }
    }
}

/// Background catalog fetch, polled from the UI thread. Dropping the task
/// detaches the thread; its result is discarded.
#[derive(Default)]
pub struct CatalogTask {
    state: CatalogState,
    rx: Option<Receiver<Result<Vec<Video>, CatalogError>>>,
}

impl CatalogTask {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn start(loader: CatalogLoader) -> Self {
        let mut task = Self {
            state: CatalogState {
                status: LoadStatus::Loading,
                ..CatalogState::default()
            },
            rx: None,
        };
        info!("Fetching catalog from {}", loader.endpoint());

        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("catalog-fetch".into())
            .spawn(move || {
                let _ = tx.send(loader.fetch());
            });
        match spawned {
            Ok(_) => task.rx = Some(rx),
            Err(e) => task
                .state
                .finish(Err(CatalogError::Config(format!("could not start the fetch: {e}")))),
        }
        task
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.status == LoadStatus::Loading
    }

    pub fn poll(&mut self) -> &CatalogState {
        if let Some(rx) = &self.rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.rx = None;
                    self.state.finish(result);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.rx = None;
                    self.state.finish(Err(CatalogError::NoResponse));
                }
            }
        }
        &self.state
    }

    pub fn wait(&mut self, timeout: Duration) -> &CatalogState {
        if let Some(rx) = &self.rx {
            match rx.recv_timeout(timeout) {
                Ok(result) => {
                    self.rx = None;
                    self.state.finish(result);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.rx = None;
                    self.state.finish(Err(CatalogError::NoResponse));
                }
            }
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{closed_port_url, StubServer};
    use crate::app::utils::format_duration;

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn one_record_loads() {
        let body = br#"[{"id":1,"title":"A","user":"u","duration":75}]"#.to_vec();
        let server = StubServer::serve(1, "200 OK", "application/json", body);

        let mut task = CatalogTask::start(CatalogLoader::new(server.base_url(), WAIT));
        assert!(task.is_loading());
        let state = task.wait(WAIT);

        assert_eq!(state.status, LoadStatus::Success);
        assert!(state.message.contains('1'));
        assert_eq!(state.message, "1 videos loaded successfully");
        assert_eq!(state.videos.len(), 1);
        assert_eq!(format_duration(state.videos[0].safe_duration()), "1:15");
        assert!(state.fetched_at.is_some());
        assert_eq!(server.request_lines(), vec!["GET /api/videos HTTP/1.1".to_string()]);
    }

    #[test]
    fn silent_server_times_out_as_no_response() {
        let server = StubServer::silent(Duration::from_secs(3));
        let loader = CatalogLoader::new(server.base_url(), Duration::from_millis(300));

        let mut task = CatalogTask::start(loader);
        let state = task.wait(WAIT);
        assert_eq!(state.status, LoadStatus::Error);
        assert_eq!(state.error, Some(CatalogError::NoResponse));
        assert!(state.message.contains("No response received"));
        assert!(state.videos.is_empty());
    }

    #[test]
    fn refused_connection_names_the_domain() {
        let domain = closed_port_url();
        let err = CatalogLoader::new(domain.clone(), WAIT).fetch().unwrap_err();
        assert_eq!(err, CatalogError::Connect { domain: domain.clone() });
        assert!(err.to_string().contains(&domain));
    }

    #[test]
    fn http_errors_carry_status() {
        let server = StubServer::serve(1, "500 Internal Server Error", "text/plain", b"boom".to_vec());
        let err = CatalogLoader::new(server.base_url(), WAIT).fetch().unwrap_err();
        assert_eq!(
            err,
            CatalogError::Status { code: 500, reason: "Internal Server Error".into() }
        );
        assert_eq!(err.to_string(), "Server error: 500 - Internal Server Error");
    }

    #[test]
    fn non_array_body_is_malformed() {
        let server = StubServer::serve(1, "200 OK", "application/json", br#"{"videos":[]}"#.to_vec());
        let err = CatalogLoader::new(server.base_url(), WAIT).fetch().unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
        assert!(matches!(parse_catalog(b"not json"), Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn bad_domains_are_configuration_errors() {
        for domain in ["", "   ", "localhost:8080"] {
            let err = CatalogLoader::new(domain, WAIT).fetch().unwrap_err();
            assert!(matches!(err, CatalogError::Config(_)), "{domain:?}");
        }
    }

    #[test]
    fn undecodable_entries_become_empty_records() {
        let videos = parse_catalog(br#"[{"id":2,"title":"B"}, 17, "x"]"#).unwrap();
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].id, Some(2));
        assert!(!videos[0].is_renderable());
        assert_eq!(videos[1], Video::default());
    }

    #[test]
    fn idle_task_stays_idle() {
        let mut task = CatalogTask::idle();
        assert_eq!(task.poll().status, LoadStatus::Idle);
        assert_eq!(task.state().message, "Loading...");
    }
}
