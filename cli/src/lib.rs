
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shape_detector::{Zone, server::AnalyzeZone};
use std::fs;
use std::path::Path;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Missing 'url' or 'path' field")]
    MissingSource,
    #[error("Only one of 'url' and 'path' may be set")]
    AmbiguousSource,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}


/// Where the job's snapshot comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource<'a> {
    Url(&'a str),
    Path(&'a str),
}

/// A one-shot analysis: one snapshot and the zones to check on it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeJob {
    /// Snapshot URL
    pub url: Option<String>,
    /// Local snapshot file
    pub path: Option<String>,
    pub zones: Vec<AnalyzeZone>,
}

impl AnalyzeJob {
    /// Load AnalyzeJob configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load AnalyzeJob configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, JobError> {
        let job: AnalyzeJob = toml::from_str(content)?;
        job.source()?;
        Ok(job)
    }

    /// Load AnalyzeJob configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load AnalyzeJob configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, JobError> {
        let job: AnalyzeJob = serde_json::from_str(content)?;
        job.source()?;
        Ok(job)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(JobError::UnsupportedFileFormat),
        }
    }

    /// Convert AnalyzeJob to TOML string
    pub fn to_toml(&self) -> Result<String, JobError> {
        let toml = toml::to_string_pretty(&self)?;
        Ok(toml)
    }

    pub fn source(&self) -> Result<JobSource<'_>, JobError> {
        match (&self.url, &self.path) {
            (Some(url), None) => Ok(JobSource::Url(url)),
            (None, Some(path)) => Ok(JobSource::Path(path)),
            (Some(_), Some(_)) => Err(JobError::AmbiguousSource),
            (None, None) => Err(JobError::MissingSource),
        }
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.zones.iter().cloned().map(Zone::from).collect()
    }
}
