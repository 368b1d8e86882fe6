// =============================================================================
// Document sink — durable report storage
// =============================================================================
//
// Rendered reports live under the configured reports directory, one HTML file
// per session id. Writes go through a temp file + rename so a crashed worker
// never leaves a half-written report behind for the REST layer to serve.
// =============================================================================

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AnalysisError;

pub struct ReportSink {
    reports_dir: PathBuf,
}

impl ReportSink {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.reports_dir.join(format!("{session_id}.html"))
    }

    /// Persist a rendered report. Returns the final path.
    pub fn write(&self, session_id: &str, html: &str) -> Result<PathBuf, AnalysisError> {
        std::fs::create_dir_all(&self.reports_dir)?;

        let path = self.path_for(session_id);
        let tmp = self.reports_dir.join(format!("{session_id}.html.tmp"));
        std::fs::write(&tmp, html)?;
        std::fs::rename(&tmp, &path)?;

        info!(path = %path.display(), bytes = html.len(), "report persisted");
        Ok(path)
    }

    /// Read a previously persisted report back, by session id.
    pub fn read(&self, session_id: &str) -> Result<String, AnalysisError> {
        Ok(std::fs::read_to_string(self.path_for(session_id))?)
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }
}
