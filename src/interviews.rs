//! Interview page: scalar metrics, grouped tables and the calendar heatmap.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::config::InsightsConfig;
use crate::error::{InsightError, InsightResult};
use crate::metrics::{self, Extreme};
use crate::models::{ApplicationRecord, InterviewRecord};
use crate::table::{Cell, GroupKey, Table};

const COUNT: &str = "Number of Interviews";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewColumn {
    RoleType,
    Round,
    InterviewType,
    Location,
}

impl InterviewColumn {
    pub fn name(&self) -> &'static str {
        match self {
            InterviewColumn::RoleType => "Role Type",
            InterviewColumn::Round => "Round",
            InterviewColumn::InterviewType => "Type of Interview",
            InterviewColumn::Location => "Location",
        }
    }

    fn key(&self, record: &InterviewRecord) -> Option<GroupKey> {
        match self {
            InterviewColumn::RoleType => record.role_type.clone().map(GroupKey::Text),
            InterviewColumn::Round => record.round.map(GroupKey::Int),
            InterviewColumn::InterviewType => record.interview_type.clone().map(GroupKey::Text),
            InterviewColumn::Location => record.location.clone().map(GroupKey::Text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Round,
    Performance,
    Experience,
}

impl Measure {
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Round => "Round",
            Measure::Performance => "Performance",
            Measure::Experience => "Experience",
        }
    }

    fn value(&self, record: &InterviewRecord) -> Option<f64> {
        match self {
            Measure::Round => record.round.map(|r| r as f64),
            Measure::Performance => record.performance,
            Measure::Experience => record.experience,
        }
    }
}

/// Interview records grouped on every column in `by` (rows missing any key
/// are left out), with a record count and the mean of each measure.
pub fn group_interviews(
    interviews: &[InterviewRecord],
    by: &[InterviewColumn],
    measures: &[Measure],
) -> Table {
    let mut groups: BTreeMap<Vec<GroupKey>, Vec<&InterviewRecord>> = BTreeMap::new();
    for record in interviews {
        let key: Option<Vec<GroupKey>> = by.iter().map(|column| column.key(record)).collect();
        if let Some(key) = key {
            groups.entry(key).or_default().push(record);
        }
    }

    let columns = by
        .iter()
        .map(InterviewColumn::name)
        .chain([COUNT])
        .chain(measures.iter().map(Measure::name));
    let mut table = Table::new(columns);

    for (key, records) in groups {
        let mut row: Vec<Cell> = key.into_iter().map(Cell::from).collect();
        row.push(Cell::Int(records.len() as i64));
        for measure in measures {
            row.push(Cell::from(metrics::mean(
                records.iter().filter_map(|r| measure.value(r)),
            )));
        }
        table.push_row(row);
    }
    table
}

/// Every table the interview page draws.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewTables {
    pub by_round: Table,
    pub by_round_detail: Table,
    pub by_role: Table,
    pub by_role_detail: Table,
    pub by_location: Table,
    pub by_type: Table,
}

impl InterviewTables {
    pub fn compute(interviews: &[InterviewRecord]) -> InsightResult<Self> {
        use InterviewColumn::{InterviewType, Location, RoleType, Round};

        let scores = [Measure::Performance, Measure::Experience];
        let role_measures = [Measure::Round, Measure::Performance, Measure::Experience];

        let by_round = group_interviews(interviews, &[Round], &scores);
        let by_round_detail = group_interviews(interviews, &[Round, InterviewType, Location], &scores);

        let mut by_role = group_interviews(interviews, &[RoleType], &role_measures);
        by_role.sort_by_column(COUNT, true)?;
        let mut by_role_detail =
            group_interviews(interviews, &[RoleType, InterviewType, Location], &role_measures);
        by_role_detail.sort_by_column(COUNT, true)?;

        let mut by_location = group_interviews(interviews, &[Location], &[]);
        by_location.sort_by_column(COUNT, true)?;
        let mut by_type = group_interviews(interviews, &[InterviewType], &[]);
        by_type.sort_by_column(COUNT, true)?;

        Ok(Self {
            by_round,
            by_round_detail,
            by_role,
            by_role_detail,
            by_location,
            by_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewSummary {
    /// Applications whose status is a real response
    pub roles_interviewed_at: usize,
    pub currently_interviewing: usize,
    /// Interview records, not the Tracker interview column, which can count
    /// one meeting against several roles
    pub total_interviews: usize,
    pub average_per_role: Option<f64>,
    pub average_per_week: Option<f64>,
    pub longest_process: Option<Extreme>,
}

impl InterviewSummary {
    pub fn compute(
        applications: &[ApplicationRecord],
        interviews: &[InterviewRecord],
        config: &InsightsConfig,
    ) -> Self {
        let total_interviews = interviews.iter().filter(|i| i.company.is_some()).count();
        let weeks = applications.iter().filter_map(|a| a.week).max().unwrap_or(0);

        Self {
            roles_interviewed_at: applications
                .iter()
                .filter(|a| config.taxonomy.is_real_response(a.status))
                .count(),
            currently_interviewing: metrics::currently_interviewing(applications),
            total_interviews,
            average_per_role: metrics::mean(
                applications
                    .iter()
                    .filter_map(|a| a.number_of_interviews.map(f64::from)),
            ),
            average_per_week: (weeks > 0).then(|| total_interviews as f64 / weeks as f64),
            longest_process: metrics::longest(applications, |a| {
                a.number_of_interviews.map(f64::from)
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: usize,
    /// 0 = Monday
    pub weekday: u32,
    pub iso_week: u32,
    pub month: String,
}

/// Interviews per calendar day, oldest first. Text dates must match
/// `date_format`; rows without any date are skipped.
pub fn heatmap(interviews: &[InterviewRecord], date_format: &str) -> InsightResult<Vec<HeatmapDay>> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in interviews {
        let date = match (record.date, record.raw_date.as_deref()) {
            (Some(date), _) => date,
            (None, Some(raw)) => NaiveDate::parse_from_str(raw.trim(), date_format).map_err(|_| {
                InsightError::MalformedDate {
                    row: record.line,
                    value: raw.to_string(),
                    format: date_format.to_string(),
                }
            })?,
            (None, None) => continue,
        };
        *counts.entry(date).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(date, count)| HeatmapDay {
            date,
            count,
            weekday: date.weekday().num_days_from_monday(),
            iso_week: date.iso_week().week(),
            month: date.format("%B").to_string(),
        })
        .collect())
}
