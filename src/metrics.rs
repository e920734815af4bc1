//! Scalar metrics for the applications page.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::aggregate::{count_status, recent_week_applications};
use crate::config::{InsightsConfig, Taxonomy};
use crate::error::{InsightError, InsightResult};
use crate::models::{ApplicationRecord, Status};

/// Largest value of a column and the company on the first row holding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub value: f64,
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub total_applications: usize,
    pub unique_companies: usize,
    pub applications_per_company: Option<f64>,
    pub response_count: usize,
    pub real_response_count: usize,
    pub total_response_rate: f64,
    pub real_response_rate: f64,
    pub average_response_days: Option<f64>,
    pub real_average_response_days: Option<f64>,
    pub longest_response: Option<Extreme>,
    pub currently_interviewing: usize,
    pub recent_applications: usize,
    /// `None` when the trailing week window holds no applications
    pub traction_rate: Option<f64>,
    pub applications_per_week: Option<f64>,
}

impl ApplicationSummary {
    pub fn compute(applications: &[ApplicationRecord], config: &InsightsConfig) -> InsightResult<Self> {
        if applications.is_empty() {
            return Err(InsightError::EmptyInput("applications"));
        }
        let taxonomy = &config.taxonomy;
        let total_applications = total_applications(applications);
        let unique_companies = unique_companies(applications);
        let (response_count, real_response_count) = response_counts(applications, taxonomy);
        let window = config.analysis.traction_window_weeks;

        let traction_rate = match traction_rate(applications, window) {
            Ok(rate) => Some(rate),
            Err(InsightError::DivisionByZero(what)) => {
                tracing::debug!("{what} undefined: no applications in the last {window} weeks");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            total_applications,
            unique_companies,
            applications_per_company: (unique_companies > 0)
                .then(|| total_applications as f64 / unique_companies as f64),
            response_count,
            real_response_count,
            total_response_rate: response_rate(response_count, total_applications)?,
            real_response_rate: response_rate(real_response_count, total_applications)?,
            average_response_days: mean(applications.iter().filter_map(|a| a.response_time_days)),
            real_average_response_days: mean(
                applications
                    .iter()
                    .filter(|a| taxonomy.is_real_response(a.status))
                    .filter_map(|a| a.response_time_days),
            ),
            longest_response: longest(applications, |a| a.response_time_days),
            currently_interviewing: currently_interviewing(applications),
            recent_applications: recent_week_applications(applications, window),
            traction_rate,
            applications_per_week: applications_per_week(applications).ok(),
        })
    }
}

/// Rows with a company name; the denominator of every response rate.
pub fn total_applications(applications: &[ApplicationRecord]) -> usize {
    applications.iter().filter(|a| a.company.is_some()).count()
}

pub fn unique_companies(applications: &[ApplicationRecord]) -> usize {
    applications
        .iter()
        .filter_map(|a| a.company.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

/// (all, real) response counts over non-Pending rows.
pub fn response_counts(applications: &[ApplicationRecord], taxonomy: &Taxonomy) -> (usize, usize) {
    let settled = || {
        applications
            .iter()
            .map(|a| a.status)
            .filter(|status| *status != Some(Status::Pending))
    };
    (
        count_status(settled(), &taxonomy.all_responses),
        count_status(settled(), &taxonomy.real_responses),
    )
}

pub fn response_rate(count: usize, total: usize) -> InsightResult<f64> {
    if total == 0 {
        return Err(InsightError::DivisionByZero("response rate"));
    }
    Ok(count as f64 / total as f64 * 100.0)
}

pub fn currently_interviewing(applications: &[ApplicationRecord]) -> usize {
    applications
        .iter()
        .filter(|a| a.status == Some(Status::Interviewing))
        .count()
}

/// Share of the applications sent in the last `window` weeks that are
/// currently interviewing.
pub fn traction_rate(applications: &[ApplicationRecord], window: usize) -> InsightResult<f64> {
    let recent = recent_week_applications(applications, window);
    if recent == 0 {
        return Err(InsightError::DivisionByZero("traction rate"));
    }
    Ok(currently_interviewing(applications) as f64 / recent as f64 * 100.0)
}

/// Total applications divided by the highest week number.
pub fn applications_per_week(applications: &[ApplicationRecord]) -> InsightResult<f64> {
    let weeks = applications.iter().filter_map(|a| a.week).max().unwrap_or(0);
    if weeks <= 0 {
        return Err(InsightError::DivisionByZero("applications per week"));
    }
    Ok(total_applications(applications) as f64 / weeks as f64)
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Maximum of `value` over the rows; the first row wins on ties.
pub fn longest(
    applications: &[ApplicationRecord],
    value: impl Fn(&ApplicationRecord) -> Option<f64>,
) -> Option<Extreme> {
    let mut best: Option<(f64, &ApplicationRecord)> = None;
    for record in applications {
        if let Some(current) = value(record).filter(|v| !v.is_nan()) {
            let replace = match best {
                Some((max, _)) => current > max,
                None => true,
            };
            if replace {
                best = Some((current, record));
            }
        }
    }
    best.map(|(value, record)| Extreme {
        value,
        company: record.company.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Response times bucketed into `bin_days`-wide bins, rows without a finite
/// response time dropped. Empty bins between the first and last are kept.
pub fn response_histogram(
    applications: &[ApplicationRecord],
    bin_days: u32,
) -> InsightResult<Vec<HistogramBin>> {
    let width = bin_days.max(1) as f64;
    let values: Vec<f64> = applications
        .iter()
        .filter_map(|a| a.response_time_days)
        .filter(|value| value.is_finite())
        .collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Ok(Vec::new());
    };

    let (first, last) = ((min / width).floor(), (max / width).floor());
    if last - first + 1.0 > MAX_HISTOGRAM_BINS as f64 {
        return Err(InsightError::HistogramRange {
            min,
            max,
            limit: MAX_HISTOGRAM_BINS,
        });
    }
    let (first, last) = (first as i64, last as i64);
    let mut bins: Vec<HistogramBin> = (first..=last)
        .map(|i| HistogramBin {
            start: i as f64 * width,
            end: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for value in values {
        let index = ((value / width).floor() as i64 - first) as usize;
        bins[index].count += 1;
    }
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(company: &str, status: Option<Status>, days: Option<f64>, week: i64) -> ApplicationRecord {
        ApplicationRecord {
            company: Some(company.to_string()),
            status,
            response_time_days: days,
            week: Some(week),
            ..Default::default()
        }
    }

    fn sample() -> Vec<ApplicationRecord> {
        vec![
            app("Acme", Some(Status::Pending), None, 1),
            app("Acme", Some(Status::Denied), Some(3.0), 1),
            app("Globex", Some(Status::Interviewing), Some(10.0), 2),
            app("Initech", Some(Status::Rejected), Some(10.0), 3),
            app("Umbrella", Some(Status::Viewed), Some(1.0), 4),
            app("Hooli", None, None, 5),
        ]
    }

    #[test]
    fn pending_rows_stay_in_denominator_only() {
        let apps = sample();
        let taxonomy = Taxonomy::default();
        let (all, real) = response_counts(&apps, &taxonomy);
        assert_eq!(all, 4);
        assert_eq!(real, 2);
        assert_eq!(total_applications(&apps), 6);
        let rate = response_rate(all, total_applications(&apps)).unwrap();
        assert!((rate - 66.666_666).abs() < 0.001);
    }

    #[test]
    fn rate_with_no_applications_is_division_error() {
        assert!(matches!(response_rate(0, 0), Err(InsightError::DivisionByZero(_))));
    }

    #[test]
    fn longest_prefers_first_occurrence() {
        let longest = longest(&sample(), |a| a.response_time_days).unwrap();
        assert_eq!(longest.value, 10.0);
        assert_eq!(longest.company.as_deref(), Some("Globex"));
    }

    #[test]
    fn traction_uses_recent_weeks() {
        let apps = sample();
        // weeks 5, 4, 3, 2 hold 4 applications, one interviewing
        let rate = traction_rate(&apps, 4).unwrap();
        assert!((rate - 25.0).abs() < 1e-9);
    }

    #[test]
    fn traction_with_empty_window_is_error() {
        let apps = vec![app("Acme", Some(Status::Interviewing), None, -2)];
        assert!(matches!(traction_rate(&apps, 4), Err(InsightError::DivisionByZero(_))));
        let summary = ApplicationSummary::compute(&apps, &InsightsConfig::default()).unwrap();
        assert_eq!(summary.traction_rate, None);
    }

    #[test]
    fn summary_metrics() {
        let summary = ApplicationSummary::compute(&sample(), &InsightsConfig::default()).unwrap();
        assert_eq!(summary.unique_companies, 5);
        assert_eq!(summary.applications_per_company, Some(6.0 / 5.0));
        assert_eq!(summary.average_response_days, Some(6.0));
        assert_eq!(summary.real_average_response_days, Some(10.0));
        assert_eq!(summary.currently_interviewing, 1);
        assert_eq!(summary.applications_per_week, Some(6.0 / 5.0));
    }

    #[test]
    fn summary_of_nothing_is_empty_input() {
        let err = ApplicationSummary::compute(&[], &InsightsConfig::default()).unwrap_err();
        assert!(matches!(err, InsightError::EmptyInput(_)));
    }

    #[test]
    fn histogram_bins_cover_range() {
        let bins = response_histogram(&sample(), 3).unwrap();
        assert_eq!(bins.first().map(|b| b.start), Some(0.0));
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(bins[3].count, 2);
        assert!(response_histogram(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn histogram_skips_nan_response_times() {
        let apps = vec![
            app("Acme", Some(Status::Rejected), Some(f64::NAN), 1),
            app("Globex", Some(Status::Rejected), Some(30.0), 1),
        ];
        let bins = response_histogram(&apps, 3).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].start, 30.0);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn histogram_with_huge_range_is_error() {
        let apps = vec![
            app("Acme", Some(Status::Rejected), Some(1.0), 1),
            app("Globex", Some(Status::Rejected), Some(1e300), 1),
        ];
        assert!(matches!(
            response_histogram(&apps, 3),
            Err(InsightError::HistogramRange { limit: MAX_HISTOGRAM_BINS, .. })
        ));
    }
}
