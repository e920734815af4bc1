use std::collections::{BTreeMap, BTreeSet};

use clap::ValueEnum;

use crate::config::Taxonomy;
use crate::error::InsightResult;
use crate::format;
use crate::models::{ApplicationRecord, Status};
use crate::table::{Cell, GroupKey, Table};

pub const APPLICATIONS: &str = "# of Applications";
pub const COMPANIES: &str = "# of Companies";
pub const INTERVIEWS: &str = "Interviews";
pub const AVG_MIN: &str = "Avg Min K";
pub const AVG_MAX: &str = "Avg Max K";
pub const AVG_DTR: &str = "Avg DTR";
pub const TOTAL_RESPONSES: &str = "Total Responses";
pub const REAL_RESPONSES: &str = "Real Responses";

pub const NUMBER_OF_INTERVIEWS: &str = "Number of Interviews";
pub const RESPONSE_TIME: &str = "Response Time (Days)";

/// Tracker columns the applications page breaks down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    Industry,
    RoleType,
    CompanySize,
    Platform,
    Week,
    Resume,
    CoverLetter,
    Month,
    Company,
}

impl Dimension {
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Industry => "Industry",
            Dimension::RoleType => "Role Type",
            Dimension::CompanySize => "Company Size",
            Dimension::Platform => "Platform",
            Dimension::Week => "Week",
            Dimension::Resume => "Resume ID",
            Dimension::CoverLetter => "Cover Letter",
            Dimension::Month => "Month",
            Dimension::Company => "Company",
        }
    }
}

/// Number of statuses that fall in `set`. Missing statuses never count.
pub fn count_status(
    statuses: impl IntoIterator<Item = Option<Status>>,
    set: &BTreeSet<Status>,
) -> usize {
    statuses
        .into_iter()
        .filter(|status| status.is_some_and(|s| set.contains(&s)))
        .count()
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Rows bucketed by the value of `column`, rows without a value left out.
/// Buckets come back in ascending key order.
fn group_rows<'a>(
    applications: &'a [ApplicationRecord],
    column: &str,
) -> InsightResult<BTreeMap<GroupKey, Vec<&'a ApplicationRecord>>> {
    // Reject unknown columns even when there are no rows to look at.
    ApplicationRecord::default().group_key(column)?;

    let mut groups: BTreeMap<GroupKey, Vec<&ApplicationRecord>> = BTreeMap::new();
    for record in applications {
        if let Some(key) = record.group_key(column)? {
            groups.entry(key).or_default().push(record);
        }
    }
    Ok(groups)
}

/// One summary row per distinct value of `column`, sorted by application
/// count (descending). Response percentages use the group's row count as
/// denominator.
pub fn groupby_percents(
    applications: &[ApplicationRecord],
    column: &str,
    taxonomy: &Taxonomy,
) -> InsightResult<Table> {
    let groups = group_rows(applications, column)?;

    let mut table = Table::new([
        column,
        APPLICATIONS,
        COMPANIES,
        INTERVIEWS,
        AVG_MIN,
        AVG_MAX,
        AVG_DTR,
        TOTAL_RESPONSES,
        REAL_RESPONSES,
    ]);

    for (key, rows) in groups {
        let count = rows.len();
        let companies: BTreeSet<&str> = rows.iter().filter_map(|r| r.company.as_deref()).collect();
        let interviews: u64 = rows
            .iter()
            .map(|r| r.number_of_interviews.unwrap_or(0) as u64)
            .sum();

        let mut salary_min = Mean::default();
        let mut salary_max = Mean::default();
        let mut response_time = Mean::default();
        for row in &rows {
            salary_min.push(row.salary_min);
            salary_max.push(row.salary_max);
            response_time.push(row.response_time_days);
        }

        let all_positive = count_status(rows.iter().map(|r| r.status), &taxonomy.all_responses);
        let real_positive = count_status(rows.iter().map(|r| r.status), &taxonomy.real_responses);

        table.push_row(vec![
            Cell::from(key),
            Cell::Int(count as i64),
            Cell::Int(companies.len() as i64),
            Cell::Int(interviews as i64),
            Cell::Text(format::currency(salary_min.value())),
            Cell::Text(format::currency(salary_max.value())),
            Cell::Text(format::two_decimals(response_time.value())),
            Cell::Text(format::percent(ratio_percent(all_positive, count))),
            Cell::Text(format::percent(ratio_percent(real_positive, count))),
        ]);
    }

    table.sort_by_column(APPLICATIONS, true)?;
    Ok(table)
}

fn ratio_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Lighter breakdown: non-null count of `count_column`, interview total and
/// mean response time per group, sorted descending by `sort`.
pub fn groupby_smaller(
    applications: &[ApplicationRecord],
    count_column: &str,
    column: &str,
    rename: &str,
    sort: &str,
) -> InsightResult<Table> {
    ApplicationRecord::default().has_value(count_column)?;
    let groups = group_rows(applications, column)?;

    let mut table = Table::new([column, rename, NUMBER_OF_INTERVIEWS, RESPONSE_TIME]);
    for (key, rows) in groups {
        let mut count = 0i64;
        for row in &rows {
            if row.has_value(count_column)? {
                count += 1;
            }
        }
        let interviews: i64 = rows
            .iter()
            .map(|r| r.number_of_interviews.unwrap_or(0) as i64)
            .sum();
        let mut response_time = Mean::default();
        for row in &rows {
            response_time.push(row.response_time_days);
        }

        table.push_row(vec![
            Cell::from(key),
            Cell::Int(count),
            Cell::Int(interviews),
            Cell::from(response_time.value()),
        ]);
    }

    table.sort_by_column(sort, true)?;
    Ok(table)
}

/// `groupby_percents` plus the per-dimension adjustments the applications
/// page makes before display.
pub fn breakdown(
    applications: &[ApplicationRecord],
    dimension: Dimension,
    taxonomy: &Taxonomy,
) -> InsightResult<Table> {
    let table = groupby_percents(applications, dimension.column(), taxonomy)?;

    match dimension {
        Dimension::CompanySize | Dimension::Resume | Dimension::CoverLetter => {
            table.drop_columns(&[AVG_MIN, AVG_MAX])
        }
        Dimension::Month => {
            let mut table = table.drop_columns(&[AVG_MIN, AVG_MAX])?;
            table.sort_by_column(Dimension::Month.column(), false)?;
            table.retain_rows(APPLICATIONS, |cell| cell.as_i64() != Some(0))?;
            Ok(table)
        }
        Dimension::Week => {
            let mut table = table;
            let dropped = table.len();
            table.retain_rows(Dimension::Week.column(), |cell| {
                cell.as_i64().is_some_and(|week| week >= 0)
            })?;
            let dropped = dropped - table.len();
            if dropped > 0 {
                tracing::debug!("dropped {dropped} uncategorized week buckets");
            }
            Ok(table)
        }
        _ => Ok(table),
    }
}

/// Applications per status, using the smaller breakdown.
pub fn status_counts(applications: &[ApplicationRecord]) -> InsightResult<Table> {
    const IN_STATUS: &str = "Applications In Status";
    groupby_smaller(applications, "Role Type", "Status", IN_STATUS, IN_STATUS)
}

/// Sum of the most recent `window` non-negative week buckets.
pub fn recent_week_applications(
    applications: &[ApplicationRecord],
    window: usize,
) -> usize {
    let mut weeks: BTreeMap<i64, usize> = BTreeMap::new();
    for week in applications.iter().filter_map(|r| r.week) {
        if week >= 0 {
            *weeks.entry(week).or_default() += 1;
        }
    }
    weeks.values().rev().take(window).sum()
}
