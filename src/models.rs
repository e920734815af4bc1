use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, InsightResult};
use crate::table::GroupKey;

/// Where an application currently stands. Closed set; anything else in the
/// Status column is rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Rejected,
    Bailed,
    Interviewing,
    Ghosted,
    #[serde(rename = "On Hold")]
    OnHold,
    Denied,
    Viewed,
    Offer,
    #[serde(rename = "No Offer")]
    NoOffer,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Status::Pending,
        Status::Rejected,
        Status::Bailed,
        Status::Interviewing,
        Status::Ghosted,
        Status::OnHold,
        Status::Denied,
        Status::Viewed,
        Status::Offer,
        Status::NoOffer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Rejected => "Rejected",
            Status::Bailed => "Bailed",
            Status::Interviewing => "Interviewing",
            Status::Ghosted => "Ghosted",
            Status::OnHold => "On Hold",
            Status::Denied => "Denied",
            Status::Viewed => "Viewed",
            Status::Offer => "Offer",
            Status::NoOffer => "No Offer",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoverLetter {
    Yes,
    No,
    Unavailable,
    Questionnaire,
}

impl CoverLetter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverLetter::Yes => "Yes",
            CoverLetter::No => "No",
            CoverLetter::Unavailable => "Unavailable",
            CoverLetter::Questionnaire => "Questionnaire",
        }
    }
}

impl FromStr for CoverLetter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            CoverLetter::Yes,
            CoverLetter::No,
            CoverLetter::Unavailable,
            CoverLetter::Questionnaire,
        ]
        .into_iter()
        .find(|value| value.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or(())
    }
}

pub fn parse_status(row: usize, raw: Option<&str>) -> InsightResult<Option<Status>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<Status>()
            .map(Some)
            .map_err(|_| InsightError::UnknownStatus {
                row,
                value: value.to_string(),
            }),
    }
}

pub fn parse_cover_letter(row: usize, raw: Option<&str>) -> InsightResult<Option<CoverLetter>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<CoverLetter>()
            .map(Some)
            .map_err(|_| InsightError::UnknownCoverLetter {
                row,
                value: value.to_string(),
            }),
    }
}

/// One row of the Tracker sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationRecord {
    pub company: Option<String>,
    pub industry: Option<String>,
    pub role_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub platform: Option<String>,
    pub resume_id: Option<String>,
    pub cover_letter: Option<CoverLetter>,
    pub company_size: Option<String>,
    pub status: Option<Status>,
    pub response_date: Option<NaiveDate>,
    pub response_time_days: Option<f64>,
    pub number_of_interviews: Option<u32>,
    pub month: Option<String>,
    /// Negative values mark rows that have not been assigned a week yet
    pub week: Option<i64>,
}

impl ApplicationRecord {
    /// Value of a Tracker column as a grouping key. Missing values are `None`
    /// so callers can leave those rows out of the group.
    pub fn group_key(&self, column: &str) -> InsightResult<Option<GroupKey>> {
        let text = |value: &Option<String>| value.clone().map(GroupKey::Text);
        let key = match column {
            "Company" => text(&self.company),
            "Industry" => text(&self.industry),
            "Role Type" => text(&self.role_type),
            "Platform" => text(&self.platform),
            "Resume ID" => text(&self.resume_id),
            "Company Size" => text(&self.company_size),
            "Month" => text(&self.month),
            "Cover Letter" => self
                .cover_letter
                .map(|value| GroupKey::Text(value.as_str().to_string())),
            "Status" => self
                .status
                .map(|value| GroupKey::Text(value.as_str().to_string())),
            "Week" => self.week.map(GroupKey::Int),
            "Number of Interviews" => self.number_of_interviews.map(|n| GroupKey::Int(n as i64)),
            "Date" => self.date.map(|d| GroupKey::Text(d.to_string())),
            _ => return Err(InsightError::UnknownColumn(column.to_string())),
        };
        Ok(key)
    }

    /// Whether the named column holds a value on this row; used for the
    /// non-null counts the smaller breakdowns report.
    pub fn has_value(&self, column: &str) -> InsightResult<bool> {
        let present = match column {
            "Salary Min" => self.salary_min.is_some(),
            "Salary Max" => self.salary_max.is_some(),
            "Response Date" => self.response_date.is_some(),
            "Response Time (Days)" => self.response_time_days.is_some(),
            _ => self.group_key(column)?.is_some(),
        };
        Ok(present)
    }
}

/// One dated interview meeting. Several records can share a round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterviewRecord {
    /// 1-based sheet row, counting the header
    pub line: usize,
    pub company: Option<String>,
    pub role_type: Option<String>,
    pub date: Option<NaiveDate>,
    /// Date cell as written, kept for sources that store dates as text
    pub raw_date: Option<String>,
    pub round: Option<i64>,
    pub interview_type: Option<String>,
    pub location: Option<String>,
    /// 1-5
    pub performance: Option<f64>,
    /// 1-5
    pub experience: Option<f64>,
}

/// One row of the ROE Calculation sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoeRecord {
    /// Position of the row in the sheet, starting at 0
    pub application_number: usize,
    pub company_name: Option<String>,
    pub application_status: Option<String>,
    /// 0.0-1.0; exactly 0.5 means the posting listed no salary
    pub chance_of_success: Option<f64>,
    pub application_effort: Option<f64>,
    pub roe: Option<f64>,
}

/// The three tables loaded from one tracker workbook.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub applications: Vec<ApplicationRecord>,
    pub interviews: Vec<InterviewRecord>,
    pub roe: Vec<RoeRecord>,
}
