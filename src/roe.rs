//! Return-on-effort page: scatter points and the chance-of-success check.

use serde::Serialize;

use crate::config::InsightsConfig;
use crate::error::{InsightError, InsightResult};
use crate::metrics;
use crate::models::{ApplicationRecord, RoeRecord, Status};

/// Chance of success the tracker writes when a posting lists no salary.
pub const NO_SALARY_CHANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoePoint {
    pub application_number: usize,
    pub company_name: Option<String>,
    pub application_status: Option<String>,
    pub chance_of_success: Option<f64>,
    pub application_effort: Option<f64>,
    pub roe: Option<f64>,
    /// Chance of success is exactly `NO_SALARY_CHANCE`
    pub no_salary_listed: bool,
}

impl RoePoint {
    fn new(record: &RoeRecord) -> Self {
        Self {
            application_number: record.application_number,
            company_name: record.company_name.clone(),
            application_status: record.application_status.clone(),
            chance_of_success: record.chance_of_success,
            application_effort: record.application_effort,
            roe: record.roe,
            no_salary_listed: record.chance_of_success == Some(NO_SALARY_CHANCE),
        }
    }
}

/// Statuses in the order they first appear. A trailing `0` or blank left
/// behind by spreadsheet formulas is dropped.
pub fn unique_statuses(records: &[RoeRecord]) -> Vec<String> {
    let mut statuses: Vec<String> = Vec::new();
    for status in records.iter().filter_map(|r| r.application_status.as_deref()) {
        if !statuses.iter().any(|seen| seen == status) {
            statuses.push(status.to_string());
        }
    }
    if statuses
        .last()
        .is_some_and(|last| last.trim().is_empty() || last.trim() == "0")
    {
        statuses.pop();
    }
    statuses
}

/// Points whose status is in `selected`; an empty selection keeps every
/// status `unique_statuses` reports.
pub fn points(records: &[RoeRecord], selected: &[String]) -> Vec<RoePoint> {
    let allowed = if selected.is_empty() {
        unique_statuses(records)
    } else {
        selected.to_vec()
    };

    records
        .iter()
        .filter(|r| {
            r.application_status
                .as_deref()
                .is_some_and(|status| allowed.iter().any(|a| a == status))
        })
        .map(RoePoint::new)
        .collect()
}

/// How well the chance-of-success estimate predicts a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChanceAccuracy {
    pub applications_above_threshold: usize,
    pub responses_above_threshold: usize,
    /// Percent of above-threshold applications that got a response
    pub rate_above_threshold: f64,
    /// Percent of all applications with a real response
    pub real_response_rate: f64,
    /// `(rate_above - real_ratio) / real_ratio - 100`, where `real_ratio` is
    /// the real response rate as a fraction. Kept for comparison with the
    /// tracker workbook; the units do not line up.
    pub workbook_score: f64,
    /// `(rate_above - real_rate) / real_rate * 100`, both in percent
    pub relative_lift: f64,
}

impl ChanceAccuracy {
    pub fn compute(
        roe: &[RoeRecord],
        applications: &[ApplicationRecord],
        config: &InsightsConfig,
    ) -> InsightResult<Self> {
        let threshold = config.analysis.chance_threshold;
        let above: Vec<&RoeRecord> = roe
            .iter()
            .filter(|r| r.chance_of_success.is_some_and(|c| c > threshold))
            .collect();
        let responses_above = above
            .iter()
            .filter(|r| {
                r.application_status
                    .as_deref()
                    .and_then(|s| s.parse::<Status>().ok())
                    .is_some_and(|s| config.taxonomy.roe_responses.contains(&s))
            })
            .count();

        if above.is_empty() {
            return Err(InsightError::DivisionByZero("response rate above threshold"));
        }
        let rate_above = responses_above as f64 / above.len() as f64 * 100.0;

        let (_, real_responses) = metrics::response_counts(applications, &config.taxonomy);
        let real_rate = metrics::response_rate(real_responses, metrics::total_applications(applications))?;
        if real_rate == 0.0 {
            return Err(InsightError::DivisionByZero("chance-of-success accuracy"));
        }
        let real_ratio = real_rate / 100.0;

        Ok(Self {
            applications_above_threshold: above.len(),
            responses_above_threshold: responses_above,
            rate_above_threshold: rate_above,
            real_response_rate: real_rate,
            workbook_score: (rate_above - real_ratio) / real_ratio - 100.0,
            relative_lift: (rate_above - real_rate) / real_rate * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize, status: &str, chance: f64) -> RoeRecord {
        RoeRecord {
            application_number: n,
            company_name: Some(format!("Company {n}")),
            application_status: Some(status.to_string()),
            chance_of_success: Some(chance),
            application_effort: Some(1.0),
            roe: Some(chance * 2.0),
        }
    }

    fn apps(statuses: &[Status]) -> Vec<ApplicationRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| ApplicationRecord {
                company: Some(format!("Company {i}")),
                status: Some(*status),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn unique_statuses_drop_trailing_zero() {
        let records = vec![
            record(0, "Pending", 0.4),
            record(1, "Rejected", 0.6),
            record(2, "Pending", 0.7),
            record(3, "0", 0.0),
        ];
        assert_eq!(unique_statuses(&records), vec!["Pending", "Rejected"]);
    }

    #[test]
    fn sentinel_chance_is_preserved_and_flagged() {
        let records = vec![record(0, "Pending", 0.5), record(1, "Rejected", 0.55)];
        let points = points(&records, &[]);
        assert_eq!(points[0].chance_of_success, Some(0.5));
        assert!(points[0].no_salary_listed);
        assert!(!points[1].no_salary_listed);
    }

    #[test]
    fn no_salary_flag_ignores_threshold() {
        let mut config = InsightsConfig::default();
        config.analysis.chance_threshold = 0.6;
        let records = vec![
            record(0, "Pending", 0.5),
            record(1, "Interviewing", 0.6),
            record(2, "Interviewing", 0.7),
        ];
        let flags: Vec<bool> = points(&records, &[]).iter().map(|p| p.no_salary_listed).collect();
        assert_eq!(flags, vec![true, false, false]);

        // the threshold only moves the accuracy cutoff
        let apps = apps(&[Status::Interviewing, Status::Pending]);
        let accuracy = ChanceAccuracy::compute(&records, &apps, &config).unwrap();
        assert_eq!(accuracy.applications_above_threshold, 1);
    }

    #[test]
    fn points_filter_by_status() {
        let records = vec![record(0, "Pending", 0.4), record(1, "Rejected", 0.6)];
        let selected = vec!["Rejected".to_string()];
        let points = points(&records, &selected);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].application_number, 1);
    }

    #[test]
    fn accuracy_compares_against_real_rate() {
        let roe = vec![
            record(0, "Interviewing", 0.8),
            record(1, "Pending", 0.7),
            record(2, "Offer", 0.9),
            record(3, "Rejected", 0.5),
        ];
        // 1 real response out of 4 applications: 25%
        let applications = apps(&[Status::Rejected, Status::Denied, Status::Pending, Status::Pending]);
        let accuracy = ChanceAccuracy::compute(&roe, &applications, &InsightsConfig::default()).unwrap();
        assert_eq!(accuracy.applications_above_threshold, 3);
        // Offer is not in the default ROE response set
        assert_eq!(accuracy.responses_above_threshold, 1);
        assert!((accuracy.rate_above_threshold - 100.0 / 3.0).abs() < 1e-9);
        assert!((accuracy.real_response_rate - 25.0).abs() < 1e-9);
        assert!((accuracy.relative_lift - (100.0 / 3.0 - 25.0) / 25.0 * 100.0).abs() < 1e-9);
        assert!((accuracy.workbook_score - ((100.0 / 3.0 - 0.25) / 0.25 - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn accuracy_without_real_responses_is_error() {
        let roe = vec![record(0, "Interviewing", 0.8)];
        let applications = apps(&[Status::Denied]);
        let err = ChanceAccuracy::compute(&roe, &applications, &InsightsConfig::default()).unwrap_err();
        assert!(matches!(err, InsightError::DivisionByZero(_)));
    }
}
