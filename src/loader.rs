//! Reading tracker sheets from an Excel workbook or a directory of CSV files.
//!
//! Sheets are first read into a header row plus a grid of raw cells. Header
//! validation runs on that grid; typed records are parsed from it afterwards.

use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{InsightsConfig, APPS_COLUMNS, INTERVIEW_COLUMNS, ROE_COLUMNS};
use crate::error::{InsightError, InsightResult};
use crate::models::{
    parse_cover_letter, parse_status, ApplicationRecord, Dataset, InterviewRecord, RoeRecord,
};

pub const TRACKER_CSV: &str = "tracker.csv";
pub const INTERVIEWS_CSV: &str = "interviews.csv";
pub const ROE_CSV: &str = "roe.csv";

/// Date layouts accepted for text dates on the Tracker sheet.
const TRACKER_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%m/%d/%Y", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    fn from_calamine(cell: &Data) -> Self {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::String(value) | Data::DurationIso(value) => RawCell::from_text(value),
            Data::Float(value) => RawCell::Number(*value),
            Data::Int(value) => RawCell::Number(*value as f64),
            Data::Bool(value) => RawCell::Text(value.to_string()),
            Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
                Some(date) => RawCell::Date(date),
                None => RawCell::from_text(&cell.to_string()),
            },
            Data::Error(e) => {
                tracing::debug!("treating spreadsheet error cell {e:?} as empty");
                RawCell::Empty
            }
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

static EMPTY: RawCell = RawCell::Empty;

#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    fn from_grid(name: &str, mut grid: impl Iterator<Item = Vec<RawCell>>) -> Self {
        let headers = grid
            .next()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                RawCell::Empty => format!("Unnamed: {i}"),
                RawCell::Text(text) => text,
                RawCell::Number(n) => number_text(n),
                RawCell::Date(d) => d.to_string(),
            })
            .collect();
        Self::new(name, headers, grid.collect())
    }

    fn column_index(&self, column: &str) -> InsightResult<usize> {
        self.headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| InsightError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

    fn require(&self, required: &[&str]) -> InsightResult<()> {
        for column in required {
            self.column_index(column)?;
        }
        Ok(())
    }

    /// Data rows with at least one value, paired with their 0-based position.
    fn data_rows(&self) -> impl Iterator<Item = (usize, RowReader<'_>)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
            .map(move |(index, _)| (index, RowReader { sheet: self, index }))
    }
}

fn number_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Typed access to one data row.
struct RowReader<'a> {
    sheet: &'a RawSheet,
    index: usize,
}

impl RowReader<'_> {
    /// 1-based row number as shown in a spreadsheet, counting the header.
    fn line(&self) -> usize {
        self.index + 2
    }

    fn cell(&self, column: &str) -> InsightResult<&RawCell> {
        let col = self.sheet.column_index(column)?;
        Ok(self.sheet.rows[self.index].get(col).unwrap_or(&EMPTY))
    }

    fn text(&self, column: &str) -> InsightResult<Option<String>> {
        Ok(match self.cell(column)? {
            RawCell::Empty => None,
            RawCell::Text(text) => Some(text.clone()),
            RawCell::Number(n) => Some(number_text(*n)),
            RawCell::Date(d) => Some(d.to_string()),
        })
    }

    fn malformed(&self, column: &str, value: impl ToString) -> InsightError {
        InsightError::MalformedNumber {
            sheet: self.sheet.name.clone(),
            row: self.line(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn number(&self, column: &str) -> InsightResult<Option<f64>> {
        match self.cell(column)? {
            RawCell::Empty => Ok(None),
            RawCell::Number(n) => self.finite(column, *n),
            RawCell::Text(text) => {
                let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
                let cleaned = cleaned.trim();
                if cleaned.is_empty() {
                    return Ok(None);
                }
                let value = cleaned
                    .parse::<f64>()
                    .map_err(|_| self.malformed(column, text))?;
                self.finite(column, value)
            }
            RawCell::Date(d) => Err(self.malformed(column, d)),
        }
    }

    /// NaN reads as a missing value, infinities are malformed.
    fn finite(&self, column: &str, value: f64) -> InsightResult<Option<f64>> {
        if value.is_nan() {
            tracing::debug!("{} row {}: treating NaN {column} as missing", self.sheet.name, self.line());
            Ok(None)
        } else if value.is_infinite() {
            Err(self.malformed(column, value))
        } else {
            Ok(Some(value))
        }
    }

    fn integer(&self, column: &str) -> InsightResult<Option<i64>> {
        match self.number(column)? {
            None => Ok(None),
            Some(n) if (n - n.round()).abs() < 1e-9 => Ok(Some(n.round() as i64)),
            Some(n) => Err(self.malformed(column, n)),
        }
    }

    fn count(&self, column: &str) -> InsightResult<Option<u32>> {
        match self.integer(column)? {
            None => Ok(None),
            Some(n) => u32::try_from(n).map(Some).map_err(|_| self.malformed(column, n)),
        }
    }

    /// Lenient date: unparseable text is logged and treated as missing.
    fn date(&self, column: &str) -> InsightResult<Option<NaiveDate>> {
        Ok(match self.cell(column)? {
            RawCell::Date(d) => Some(*d),
            RawCell::Text(text) => {
                let parsed = TRACKER_DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(text, format).ok());
                if parsed.is_none() {
                    tracing::debug!(
                        "{} row {}: ignoring unparseable {column} '{text}'",
                        self.sheet.name,
                        self.line()
                    );
                }
                parsed
            }
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderState {
    Present,
    Missing,
    Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderStatus {
    pub name: String,
    pub state: HeaderState,
}

/// Required columns flagged present or missing, followed by any extra
/// columns the sheet carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub sheet: String,
    pub sheet_found: bool,
    pub columns: Vec<HeaderStatus>,
}

impl HeaderReport {
    pub fn missing(&self) -> Vec<&str> {
        self.with_state(HeaderState::Missing)
    }

    pub fn extra(&self) -> Vec<&str> {
        self.with_state(HeaderState::Extra)
    }

    pub fn is_valid(&self) -> bool {
        self.sheet_found && self.missing().is_empty()
    }

    fn with_state(&self, state: HeaderState) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.state == state)
            .map(|c| c.name.as_str())
            .collect()
    }
}

pub fn validate_headers(sheet: &str, present: &[String], required: &[&str]) -> HeaderReport {
    let mut columns: Vec<HeaderStatus> = required
        .iter()
        .map(|name| HeaderStatus {
            name: name.to_string(),
            state: if present.iter().any(|p| p == name) {
                HeaderState::Present
            } else {
                HeaderState::Missing
            },
        })
        .collect();
    columns.extend(
        present
            .iter()
            .filter(|p| !required.contains(&p.as_str()))
            .map(|p| HeaderStatus {
                name: p.clone(),
                state: HeaderState::Extra,
            }),
    );

    HeaderReport {
        sheet: sheet.to_string(),
        sheet_found: true,
        columns,
    }
}

fn missing_sheet_report(sheet: &str, required: &[&str]) -> HeaderReport {
    HeaderReport {
        sheet_found: false,
        ..validate_headers(sheet, &[], required)
    }
}

/// The three sheets as read; a sheet the source lacks is `None`.
#[derive(Debug, Clone, Default)]
pub struct RawWorkbook {
    pub applications: Option<RawSheet>,
    pub interviews: Option<RawSheet>,
    pub roe: Option<RawSheet>,
}

impl RawWorkbook {
    pub fn validate(&self, config: &InsightsConfig) -> Vec<HeaderReport> {
        let sheets = &config.sheets;
        [
            (&self.applications, sheets.applications.as_str(), APPS_COLUMNS),
            (&self.interviews, sheets.interviews.as_str(), INTERVIEW_COLUMNS),
            (&self.roe, sheets.roe.as_str(), ROE_COLUMNS),
        ]
        .into_iter()
        .map(|(sheet, name, required)| match sheet {
            Some(sheet) => validate_headers(name, &sheet.headers, required),
            None => missing_sheet_report(name, required),
        })
        .collect()
    }

    pub fn into_dataset(self, config: &InsightsConfig) -> InsightResult<Dataset> {
        let sheets = &config.sheets;
        let applications = self
            .applications
            .ok_or_else(|| InsightError::MissingSheet(sheets.applications.clone()))?;
        let interviews = self
            .interviews
            .ok_or_else(|| InsightError::MissingSheet(sheets.interviews.clone()))?;
        let roe = self
            .roe
            .ok_or_else(|| InsightError::MissingSheet(sheets.roe.clone()))?;

        let mut applications = parse_applications(&applications)?;
        let before = applications.len();
        applications.retain(|a| !config.is_outlier(a.company.as_deref(), a.date));
        if applications.len() < before {
            tracing::debug!("excluded {} outlier applications", before - applications.len());
        }

        let dataset = Dataset {
            applications,
            interviews: parse_interviews(&interviews)?,
            roe: parse_roe(&roe)?,
        };
        tracing::debug!(
            "loaded {} applications, {} interviews, {} ROE rows",
            dataset.applications.len(),
            dataset.interviews.len(),
            dataset.roe.len()
        );
        Ok(dataset)
    }
}

pub fn parse_applications(sheet: &RawSheet) -> InsightResult<Vec<ApplicationRecord>> {
    sheet.require(APPS_COLUMNS)?;
    let mut records = Vec::new();
    for (_, row) in sheet.data_rows() {
        records.push(ApplicationRecord {
            company: row.text("Company")?,
            industry: row.text("Industry")?,
            role_type: row.text("Role Type")?,
            date: row.date("Date")?,
            salary_min: row.number("Salary Min")?,
            salary_max: row.number("Salary Max")?,
            platform: row.text("Platform")?,
            resume_id: row.text("Resume ID")?,
            cover_letter: parse_cover_letter(row.line(), row.text("Cover Letter")?.as_deref())?,
            company_size: row.text("Company Size")?,
            status: parse_status(row.line(), row.text("Status")?.as_deref())?,
            response_date: row.date("Response Date")?,
            response_time_days: row.number("Response Time (Days)")?,
            number_of_interviews: row.count("Number of Interviews")?,
            month: row.text("Month")?,
            week: row.integer("Week")?,
        });
    }
    Ok(records)
}

pub fn parse_interviews(sheet: &RawSheet) -> InsightResult<Vec<InterviewRecord>> {
    sheet.require(INTERVIEW_COLUMNS)?;
    let mut records = Vec::new();
    for (_, row) in sheet.data_rows() {
        let (date, raw_date) = match row.cell("Date")? {
            RawCell::Date(d) => (Some(*d), None),
            _ => (None, row.text("Date")?),
        };
        records.push(InterviewRecord {
            line: row.line(),
            company: row.text("Company")?,
            role_type: row.text("Role Type")?,
            date,
            raw_date,
            round: row.integer("Round")?,
            interview_type: row.text("Type of Interview")?,
            location: row.text("Location")?,
            performance: row.number("Performance")?,
            experience: row.number("Experience")?,
        });
    }
    Ok(records)
}

pub fn parse_roe(sheet: &RawSheet) -> InsightResult<Vec<RoeRecord>> {
    sheet.require(ROE_COLUMNS)?;
    let mut records = Vec::new();
    for (position, row) in sheet.data_rows() {
        records.push(RoeRecord {
            application_number: position,
            company_name: row.text("Company Name")?,
            application_status: row.text("Application Status")?,
            chance_of_success: row.number("Chance of Success")?,
            application_effort: row.number("Application Effort")?,
            roe: row.number("ROE")?,
        });
    }
    Ok(records)
}

/// Where the tracker data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Workbook(PathBuf),
    CsvDir(PathBuf),
}

impl Source {
    /// An explicit path wins; otherwise the real tracker file if present,
    /// else the bundled example.
    pub fn resolve(explicit: Option<&Path>, config: &InsightsConfig) -> Self {
        if let Some(path) = explicit {
            return if path.is_dir() {
                Source::CsvDir(path.to_path_buf())
            } else {
                Source::Workbook(path.to_path_buf())
            };
        }
        let files = &config.files;
        if files.real_file.exists() {
            tracing::info!("using tracker {}", files.real_file.display());
            Source::Workbook(files.real_file.clone())
        } else {
            tracing::warn!(
                "{} not found, using example data from {}",
                files.real_file.display(),
                files.default_file.display()
            );
            Source::Workbook(files.default_file.clone())
        }
    }

    pub fn read(&self, config: &InsightsConfig) -> InsightResult<RawWorkbook> {
        match self {
            Source::Workbook(path) => read_workbook(path, config),
            Source::CsvDir(dir) => read_csv_dir(dir, config),
        }
    }
}

pub fn read_workbook(path: &Path, config: &InsightsConfig) -> InsightResult<RawWorkbook> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let names = workbook.sheet_names();

    let mut read_sheet = |name: &str| -> InsightResult<Option<RawSheet>> {
        if !names.iter().any(|n| n == name) {
            tracing::warn!("sheet '{name}' not found in {}", path.display());
            return Ok(None);
        }
        let range = workbook.worksheet_range(name)?;
        let grid = range
            .rows()
            .map(|row| row.iter().map(RawCell::from_calamine).collect::<Vec<_>>());
        Ok(Some(RawSheet::from_grid(name, grid)))
    };

    let sheets = &config.sheets;
    Ok(RawWorkbook {
        applications: read_sheet(&sheets.applications)?,
        interviews: read_sheet(&sheets.interviews)?,
        roe: read_sheet(&sheets.roe)?,
    })
}

pub fn read_csv_dir(dir: &Path, config: &InsightsConfig) -> InsightResult<RawWorkbook> {
    let sheets = &config.sheets;
    Ok(RawWorkbook {
        applications: read_csv_sheet(&dir.join(TRACKER_CSV), &sheets.applications)?,
        interviews: read_csv_sheet(&dir.join(INTERVIEWS_CSV), &sheets.interviews)?,
        roe: read_csv_sheet(&dir.join(ROE_CSV), &sheets.roe)?,
    })
}

fn read_csv_sheet(path: &Path, name: &str) -> InsightResult<Option<RawSheet>> {
    if !path.exists() {
        tracing::warn!("{} not found", path.display());
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(RawCell::from_text).collect());
    }
    Ok(Some(RawSheet::new(name, headers, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoverLetter, Status};

    fn text(value: &str) -> RawCell {
        RawCell::from_text(value)
    }

    fn tracker_headers() -> Vec<String> {
        APPS_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn tracker_row(company: &str, status: &str, week: f64) -> Vec<RawCell> {
        vec![
            text(company),
            text("Tech"),
            text("Engineer"),
            RawCell::Date(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()),
            RawCell::Number(90.0),
            text("$110"),
            text("LinkedIn"),
            RawCell::Number(2.0),
            text("Yes"),
            text("Startup"),
            text(status),
            RawCell::Empty,
            RawCell::Number(4.5),
            RawCell::Number(1.0),
            text("January"),
            RawCell::Number(week),
        ]
    }

    #[test]
    fn header_report_lists_missing_and_extra() {
        let present = vec!["Company".to_string(), "Notes".to_string()];
        let report = validate_headers("Tracker", &present, &["Company", "Status"]);
        assert_eq!(report.missing(), vec!["Status"]);
        assert_eq!(report.extra(), vec!["Notes"]);
        assert!(!report.is_valid());
        assert_eq!(report.columns[0].state, HeaderState::Present);
    }

    #[test]
    fn missing_sheet_reports_every_column_missing() {
        let report = RawWorkbook::default().validate(&InsightsConfig::default());
        assert_eq!(report.len(), 3);
        assert!(!report[0].sheet_found);
        assert_eq!(report[2].missing().len(), ROE_COLUMNS.len());
    }

    #[test]
    fn parses_tracker_rows() {
        let sheet = RawSheet::new(
            "Tracker",
            tracker_headers(),
            vec![
                tracker_row("Acme", "On Hold", 3.0),
                vec![RawCell::Empty; APPS_COLUMNS.len()],
                tracker_row("Globex", "Pending", -14.0),
            ],
        );
        let apps = parse_applications(&sheet).unwrap();
        assert_eq!(apps.len(), 2);
        let acme = &apps[0];
        assert_eq!(acme.status, Some(Status::OnHold));
        assert_eq!(acme.cover_letter, Some(CoverLetter::Yes));
        assert_eq!(acme.salary_max, Some(110.0));
        assert_eq!(acme.resume_id.as_deref(), Some("2"));
        assert_eq!(acme.number_of_interviews, Some(1));
        assert_eq!(acme.response_date, None);
        assert_eq!(apps[1].week, Some(-14));
    }

    #[test]
    fn unknown_status_fails_with_sheet_row() {
        let sheet = RawSheet::new("Tracker", tracker_headers(), vec![tracker_row("Acme", "Waiting", 1.0)]);
        let err = parse_applications(&sheet).unwrap_err();
        assert!(matches!(err, InsightError::UnknownStatus { row: 2, .. }));
    }

    #[test]
    fn malformed_number_is_reported() {
        let mut row = tracker_row("Acme", "Pending", 1.0);
        row[4] = text("ninety");
        let sheet = RawSheet::new("Tracker", tracker_headers(), vec![row]);
        let err = parse_applications(&sheet).unwrap_err();
        assert!(matches!(err, InsightError::MalformedNumber { ref column, .. } if column == "Salary Min"));
    }

    #[test]
    fn nan_is_missing_and_infinity_is_malformed() {
        let mut row = tracker_row("Acme", "Rejected", 1.0);
        row[12] = text("NaN");
        let second = tracker_row("Globex", "Rejected", 1.0);
        let sheet = RawSheet::new("Tracker", tracker_headers(), vec![row, second]);
        let apps = parse_applications(&sheet).unwrap();
        assert_eq!(apps[0].response_time_days, None);
        assert_eq!(apps[1].response_time_days, Some(4.5));

        let mut row = tracker_row("Acme", "Rejected", 1.0);
        row[12] = text("inf");
        let sheet = RawSheet::new("Tracker", tracker_headers(), vec![row]);
        assert!(matches!(
            parse_applications(&sheet),
            Err(InsightError::MalformedNumber { row: 2, ref column, .. }) if column == "Response Time (Days)"
        ));
    }

    #[test]
    fn missing_column_stops_parsing() {
        let sheet = RawSheet::new("Tracker", vec!["Company".to_string()], vec![]);
        assert!(matches!(
            parse_applications(&sheet),
            Err(InsightError::MissingColumn { .. })
        ));
    }

    #[test]
    fn roe_rows_numbered_by_position() {
        let headers = ROE_COLUMNS.iter().map(|c| c.to_string()).collect();
        let sheet = RawSheet::new(
            "ROE Calculation",
            headers,
            vec![
                vec![text("Acme"), text("Pending"), RawCell::Number(0.5), RawCell::Number(2.0), RawCell::Number(0.25)],
                vec![RawCell::Empty; 5],
                vec![text("Globex"), RawCell::Number(0.0), RawCell::Number(0.7), RawCell::Number(1.0), RawCell::Number(0.7)],
            ],
        );
        let roe = parse_roe(&sheet).unwrap();
        assert_eq!(roe.len(), 2);
        assert_eq!(roe[0].chance_of_success, Some(0.5));
        assert_eq!(roe[1].application_number, 2);
        assert_eq!(roe[1].application_status.as_deref(), Some("0"));
    }

    #[test]
    fn interview_text_dates_kept_raw() {
        let headers = INTERVIEW_COLUMNS.iter().map(|c| c.to_string()).collect();
        let sheet = RawSheet::new(
            "Interviews",
            headers,
            vec![vec![
                text("Acme"),
                text("Engineer"),
                text("03-Mar-2025"),
                RawCell::Number(1.0),
                text("Phone"),
                text("Remote"),
                RawCell::Number(4.0),
                RawCell::Number(3.0),
            ]],
        );
        let interviews = parse_interviews(&sheet).unwrap();
        assert_eq!(interviews[0].date, None);
        assert_eq!(interviews[0].raw_date.as_deref(), Some("03-Mar-2025"));
        assert_eq!(interviews[0].round, Some(1));
        assert_eq!(interviews[0].line, 2);
    }

    #[test]
    fn csv_directory_round_trip_with_outliers() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = format!(
            "{}\n\
             Acme,Tech,Engineer,2025-01-06,90,110,LinkedIn,1,Yes,Startup,Rejected,,4,1,January,1\n\
             Globex,Tech,Engineer,2025-01-07,80,100,Indeed,1,No,Enterprise,Pending,,,0,January,1\n",
            APPS_COLUMNS.join(",")
        );
        std::fs::write(dir.path().join(TRACKER_CSV), tracker).unwrap();
        std::fs::write(
            dir.path().join(INTERVIEWS_CSV),
            format!("{}\nAcme,Engineer,10-Jan-2025,1,Phone,Remote,4,4\n", INTERVIEW_COLUMNS.join(",")),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(ROE_CSV),
            format!("{},Notes\nAcme,Rejected,0.6,2,0.3,\n", ROE_COLUMNS.join(",")),
        )
        .unwrap();

        let mut config = InsightsConfig::default();
        config.outliers.push(crate::config::OutlierKey {
            company: "Globex".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
        });

        let source = Source::resolve(Some(dir.path()), &config);
        assert_eq!(source, Source::CsvDir(dir.path().to_path_buf()));
        let workbook = source.read(&config).unwrap();

        let reports = workbook.validate(&config);
        assert!(reports.iter().all(|r| r.sheet_found && r.missing().is_empty()));
        assert_eq!(reports[2].extra(), vec!["Notes"]);

        let dataset = workbook.into_dataset(&config).unwrap();
        assert_eq!(dataset.applications.len(), 1);
        assert_eq!(dataset.applications[0].company.as_deref(), Some("Acme"));
        assert_eq!(dataset.interviews.len(), 1);
        assert_eq!(dataset.roe[0].chance_of_success, Some(0.6));
    }

    #[test]
    fn missing_csv_sheet_is_none_then_error() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = read_csv_dir(dir.path(), &InsightsConfig::default()).unwrap();
        assert!(workbook.applications.is_none());
        assert!(matches!(
            workbook.into_dataset(&InsightsConfig::default()),
            Err(InsightError::MissingSheet(name)) if name == "Tracker"
        ));
    }
}
