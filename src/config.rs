//! Configuration for tracker-insights
//!
//! Reads from tracker-insights.toml. Every section is optional and falls back
//! to the values the tracker workbook template was built around.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::Dimension;
use crate::error::{InsightError, InsightResult};
use crate::models::Status;

pub const CONFIG_FILE: &str = "tracker-insights.toml";
pub const CONFIG_ENV: &str = "TRACKER_INSIGHTS_CONFIG";

pub const APPS_COLUMNS: &[&str] = &[
    "Company",
    "Industry",
    "Role Type",
    "Date",
    "Salary Min",
    "Salary Max",
    "Platform",
    "Resume ID",
    "Cover Letter",
    "Company Size",
    "Status",
    "Response Date",
    "Response Time (Days)",
    "Number of Interviews",
    "Month",
    "Week",
];

pub const INTERVIEW_COLUMNS: &[&str] = &[
    "Company",
    "Role Type",
    "Date",
    "Round",
    "Type of Interview",
    "Location",
    "Performance",
    "Experience",
];

pub const ROE_COLUMNS: &[&str] = &[
    "Company Name",
    "Application Status",
    "Chance of Success",
    "Application Effort",
    "ROE",
];

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct InsightsConfig {
    #[serde(default)]
    pub taxonomy: Taxonomy,

    #[serde(default)]
    pub sheets: SheetNames,

    #[serde(default)]
    pub files: FileNames,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Applications left out of every aggregate, keyed by company and date
    #[serde(default)]
    pub outliers: Vec<OutlierKey>,
}

/// Which statuses count as a response.
///
/// `all_responses` includes automated signals (Denied, Viewed);
/// `real_responses` is the human-engagement subset. `roe_responses` is the
/// set used when checking the chance-of-success estimate.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Taxonomy {
    #[serde(default = "default_all_responses")]
    pub all_responses: BTreeSet<Status>,

    #[serde(default = "default_real_responses")]
    pub real_responses: BTreeSet<Status>,

    #[serde(default = "default_roe_responses")]
    pub roe_responses: BTreeSet<Status>,
}

fn default_all_responses() -> BTreeSet<Status> {
    [
        Status::Rejected,
        Status::Bailed,
        Status::Interviewing,
        Status::Ghosted,
        Status::OnHold,
        Status::Denied,
        Status::Viewed,
        Status::Offer,
        Status::NoOffer,
    ]
    .into_iter()
    .collect()
}

fn default_real_responses() -> BTreeSet<Status> {
    let mut statuses = default_all_responses();
    statuses.remove(&Status::Denied);
    statuses.remove(&Status::Viewed);
    statuses
}

fn default_roe_responses() -> BTreeSet<Status> {
    [
        Status::Rejected,
        Status::Bailed,
        Status::Interviewing,
        Status::Ghosted,
        Status::OnHold,
    ]
    .into_iter()
    .collect()
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            all_responses: default_all_responses(),
            real_responses: default_real_responses(),
            roe_responses: default_roe_responses(),
        }
    }
}

impl Taxonomy {
    pub fn is_real_response(&self, status: Option<Status>) -> bool {
        status.is_some_and(|s| self.real_responses.contains(&s))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetNames {
    #[serde(default = "default_applications_sheet")]
    pub applications: String,
    #[serde(default = "default_interviews_sheet")]
    pub interviews: String,
    #[serde(default = "default_roe_sheet")]
    pub roe: String,
}

fn default_applications_sheet() -> String {
    "Tracker".to_string()
}

fn default_interviews_sheet() -> String {
    "Interviews".to_string()
}

fn default_roe_sheet() -> String {
    "ROE Calculation".to_string()
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            applications: default_applications_sheet(),
            interviews: default_interviews_sheet(),
            roe: default_roe_sheet(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileNames {
    /// Preferred workbook, used when present in the working directory
    #[serde(default = "default_real_file")]
    pub real_file: PathBuf,

    /// Bundled example data
    #[serde(default = "default_example_file")]
    pub default_file: PathBuf,
}

fn default_real_file() -> PathBuf {
    PathBuf::from("app_tracker.xlsx")
}

fn default_example_file() -> PathBuf {
    PathBuf::from("example_app_tracker.xlsx")
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            real_file: default_real_file(),
            default_file: default_example_file(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
    /// Histogram bin width in days, clamped to 1..=10
    #[serde(default = "default_histogram_bin")]
    pub histogram_bin_days: u32,
}

fn default_primary_color() -> String {
    "#26bce1".to_string()
}

fn default_secondary_color() -> String {
    "#4a58dd".to_string()
}

fn default_histogram_bin() -> u32 {
    3
}

impl DisplayConfig {
    /// Bar colour for a breakdown chart; alternates so side-by-side charts differ.
    pub fn chart_color(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::RoleType | Dimension::Platform => &self.secondary_color,
            _ => &self.primary_color,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            histogram_bin_days: default_histogram_bin(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalysisConfig {
    /// Number of most recent week buckets used for the traction rate
    #[serde(default = "default_traction_weeks")]
    pub traction_window_weeks: usize,

    /// Chance-of-success cutoff for the accuracy check
    #[serde(default = "default_chance_threshold")]
    pub chance_threshold: f64,

    #[serde(default = "default_interview_date_format")]
    pub interview_date_format: String,
}

fn default_traction_weeks() -> usize {
    4
}

fn default_chance_threshold() -> f64 {
    0.5
}

fn default_interview_date_format() -> String {
    "%d-%b-%Y".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            traction_window_weeks: default_traction_weeks(),
            chance_threshold: default_chance_threshold(),
            interview_date_format: default_interview_date_format(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutlierKey {
    pub company: String,
    pub date: NaiveDate,
}

impl InsightsConfig {
    /// Load from an explicit path, the environment, or ./tracker-insights.toml.
    /// Returns the default config when no file exists.
    pub fn load(explicit: Option<&Path>) -> InsightResult<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_path(),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("reading config from {}", path.display());
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> InsightResult<Self> {
        toml::from_str(contents).map_err(|e| InsightError::Config(e.to_string()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(value) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(value));
        }
        let local = PathBuf::from(CONFIG_FILE);
        local.exists().then_some(local)
    }

    pub fn validate(&self) -> InsightResult<()> {
        let taxonomy = &self.taxonomy;
        if !taxonomy.real_responses.is_subset(&taxonomy.all_responses) {
            return Err(InsightError::Config(
                "taxonomy.real_responses must be a subset of taxonomy.all_responses".to_string(),
            ));
        }
        if taxonomy.all_responses.contains(&Status::Pending) {
            return Err(InsightError::Config(
                "Pending is not a terminal status and cannot count as a response".to_string(),
            ));
        }
        if self.analysis.traction_window_weeks == 0 {
            return Err(InsightError::Config(
                "analysis.traction_window_weeks must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.analysis.chance_threshold) {
            return Err(InsightError::Config(
                "analysis.chance_threshold must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn histogram_bin_days(&self) -> u32 {
        self.display.histogram_bin_days.clamp(1, 10)
    }

    pub fn is_outlier(&self, company: Option<&str>, date: Option<NaiveDate>) -> bool {
        match (company, date) {
            (Some(company), Some(date)) => self
                .outliers
                .iter()
                .any(|key| key.company == company && key.date == date),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.all_responses.len(), 9);
        assert_eq!(taxonomy.real_responses.len(), 7);
        assert!(taxonomy.real_responses.is_subset(&taxonomy.all_responses));
        assert!(!taxonomy.is_real_response(Some(Status::Denied)));
        assert!(taxonomy.is_real_response(Some(Status::Offer)));
        assert!(!taxonomy.is_real_response(None));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[taxonomy]
all_responses = ["Rejected", "Interviewing", "Denied"]
real_responses = ["Rejected", "Interviewing"]

[sheets]
applications = "Apps"

[analysis]
traction_window_weeks = 6

[[outliers]]
company = "Acme"
date = "2025-03-04"
"#;
        let config = InsightsConfig::from_toml(toml).unwrap();
        assert_eq!(config.taxonomy.all_responses.len(), 3);
        assert_eq!(config.sheets.applications, "Apps");
        assert_eq!(config.sheets.interviews, "Interviews");
        assert_eq!(config.analysis.traction_window_weeks, 6);
        assert_eq!(config.analysis.interview_date_format, "%d-%b-%Y");
        assert!(config.is_outlier(Some("Acme"), NaiveDate::from_ymd_opt(2025, 3, 4)));
        assert!(!config.is_outlier(Some("Acme"), NaiveDate::from_ymd_opt(2025, 3, 5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_real_outside_all() {
        let toml = r#"
[taxonomy]
all_responses = ["Rejected"]
real_responses = ["Rejected", "Offer"]
"#;
        let config = InsightsConfig::from_toml(toml).unwrap();
        assert!(matches!(config.validate(), Err(InsightError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_status_in_taxonomy() {
        let toml = r#"
[taxonomy]
all_responses = ["Maybe"]
"#;
        assert!(InsightsConfig::from_toml(toml).is_err());
    }

    #[test]
    fn test_histogram_bin_is_clamped() {
        let mut config = InsightsConfig::default();
        config.display.histogram_bin_days = 0;
        assert_eq!(config.histogram_bin_days(), 1);
        config.display.histogram_bin_days = 40;
        assert_eq!(config.histogram_bin_days(), 10);
    }

    #[test]
    fn test_chart_colors_alternate() {
        let display = DisplayConfig::default();
        assert_eq!(display.chart_color(Dimension::Industry), "#26bce1");
        assert_eq!(display.chart_color(Dimension::RoleType), "#4a58dd");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[display]\nprimary_color = \"#000000\"\n").unwrap();
        let config = InsightsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.display.primary_color, "#000000");
        assert_eq!(config.display.secondary_color, "#4a58dd");
    }
}
