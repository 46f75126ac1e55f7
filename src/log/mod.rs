use anyhow::Result;
use chrono::Utc;
use fs_err as fs;
use serde_json::{json, to_string_pretty};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use crate::wire::{AppResponse, GenerationRequest};

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

/// Writes each generation exchange under `<root>/tx/<uuid>/` when enabled.
#[derive(Debug, Clone)]
pub struct Recorder {
    root: PathBuf,
    save_request: bool,
    save_response: bool,
}

impl Recorder {
    pub fn new(root: impl Into<PathBuf>, save_request: bool, save_response: bool) -> Self {
        Self { root: root.into(), save_request, save_response }
    }

    pub fn is_enabled(&self) -> bool {
        self.save_request || self.save_response
    }

    fn tx_dir(&self, tx: Uuid) -> PathBuf {
        self.root.join("tx").join(tx.to_string())
    }

    pub fn save(
        &self,
        req: &GenerationRequest,
        resp: Option<&AppResponse>,
        error: Option<&str>,
    ) -> Result<Option<SavedPaths>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let tx = Uuid::new_v4();
        let dir = self.tx_dir(tx);
        fs::create_dir_all(&dir)?;

        let mut request_path = None;
        let mut response_path = None;

        if self.save_request {
            let p = dir.join("generate.request.json");
            let body = json!({ "saved_at": Utc::now(), "request": req });
            fs::write(&p, to_string_pretty(&body)?)?;
            request_path = Some(p);
        }

        if self.save_response {
            let p = dir.join("generate.response.json");
            let body = match (resp, error) {
                (Some(r), _) => json!({ "saved_at": Utc::now(), "response": r }),
                (None, e) => json!({ "saved_at": Utc::now(), "error": e }),
            };
            fs::write(&p, to_string_pretty(&body)?)?;
            response_path = Some(p);
        }

        let saved = SavedPaths { dir, request: request_path, response: response_path };
        log_saved_paths(&saved);
        Ok(Some(saved))
    }
}

fn log_saved_paths(saved: &SavedPaths) {
    debug!(dir = %saved.dir.display(), "exchange artifacts directory");
    match &saved.request {
        Some(p) => debug!(path = %p.display(), "request saved"),
        None => debug!("request not saved (flag off)"),
    }
    match &saved.response {
        Some(p) => debug!(path = %p.display(), "response saved"),
        None => debug!("response not saved (flag off)"),
    }
}
