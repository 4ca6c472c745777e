// src/upload.rs
use anyhow::{Result, Context};
use reqwest::StatusCode;
use tracing::{info, warn};
use crate::config::ReportSettings;
use crate::error::ReportError;
use crate::report::ReportDocument;
use crate::utils::with_trailing_slash;

pub const USER_AGENT: &str = concat!("lca-report/", env!("CARGO_PKG_VERSION"));

/// Posts reports to a report server.
#[derive(Debug, Clone)]
pub struct ReportUploader {
    client: reqwest::Client,
    upload_reports: bool,
    server_url: Option<String>,
}

impl ReportUploader {
    pub fn new(settings: &ReportSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            upload_reports: settings.upload_reports,
            server_url: settings.upload_target().map(with_trailing_slash),
        })
    }

    fn base_url(&self) -> Result<&str, ReportError> {
        if !self.upload_reports {
            return Err(ReportError::UploadNotAllowed {
                reason: "upload_reports is disabled".to_string(),
            });
        }
        self.server_url.as_deref().ok_or_else(|| ReportError::UploadNotAllowed {
            reason: "report_server_url is not set".to_string(),
        })
    }

    /// Address the server publishes a report under.
    pub fn report_url(&self, uuid: &str) -> Result<String> {
        Ok(format!("{}report/{}", self.base_url()?, uuid))
    }

    /// POSTs the document to `<server>/upload`. Only a 200 response counts
    /// as accepted and yields the report address; any other status is
    /// `Ok(None)`. Transport failures are errors.
    pub async fn upload(&self, document: &ReportDocument) -> Result<Option<String>> {
        let base_url = self.base_url()?;
        let upload_url = format!("{}upload", base_url);

        let response = self.client
            .post(&upload_url)
            .json(document)
            .send()
            .await
            .with_context(|| format!("Failed to send report to {}", upload_url))?;

        let status = response.status();
        if status == StatusCode::OK {
            let report_url = self.report_url(&document.metadata.uuid)?;
            info!(url = %report_url, "uploaded LCA report");
            Ok(Some(report_url))
        } else {
            warn!(status = %status, url = %upload_url, "report server did not accept upload");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(upload_reports: bool, url: Option<&str>) -> ReportSettings {
        ReportSettings {
            upload_reports,
            report_server_url: url.map(str::to_string),
            ..ReportSettings::default()
        }
    }

    #[test]
    fn test_report_url_adds_slash() {
        let uploader = ReportUploader::new(&settings(true, Some("http://reports.example"))).unwrap();
        assert_eq!(
            uploader.report_url("abc123").unwrap(),
            "http://reports.example/report/abc123"
        );

        let uploader = ReportUploader::new(&settings(true, Some("http://reports.example/"))).unwrap();
        assert_eq!(
            uploader.report_url("abc123").unwrap(),
            "http://reports.example/report/abc123"
        );
    }

    #[test]
    fn test_disabled_uploads_are_refused() {
        for (flag, url) in [(false, Some("http://reports.example")), (true, None), (false, None)] {
            let uploader = ReportUploader::new(&settings(flag, url)).unwrap();
            let err = uploader.report_url("abc").unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ReportError>(),
                Some(ReportError::UploadNotAllowed { .. })
            ));
        }
    }
}
