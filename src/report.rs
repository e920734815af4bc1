use std::fmt::Write;

use crate::aggregate::{self, Dimension, REAL_RESPONSES, TOTAL_RESPONSES};
use crate::config::InsightsConfig;
use crate::error::InsightResult;
use crate::format;
use crate::interviews::{self, InterviewSummary, InterviewTables};
use crate::loader::HeaderReport;
use crate::metrics::{self, ApplicationSummary, Extreme};
use crate::models::Dataset;
use crate::roe::{self, ChanceAccuracy};
use crate::table::Table;

pub const SECTION_FAILED: &str = "Something went wrong.";

/// Writes one section. A failed section gets the generic message; the cause
/// goes to the log.
fn section(output: &mut String, title: &str, body: InsightResult<String>) {
    let _ = writeln!(output, "## {title}");
    match body {
        Ok(text) => output.push_str(&text),
        Err(e) => {
            tracing::warn!("section '{title}' failed: {e}");
            let _ = writeln!(output, "{SECTION_FAILED}");
        }
    }
    let _ = writeln!(output);
}

fn or_undefined(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "undefined".to_string())
}

fn extreme_text(extreme: &Option<Extreme>, unit: &str, digits: usize) -> String {
    match extreme {
        Some(extreme) => format!(
            "{} {unit} ({})",
            format::significant(extreme.value, digits),
            extreme.company.as_deref().unwrap_or("unknown")
        ),
        None => "undefined".to_string(),
    }
}

pub fn render_summary(summary: &ApplicationSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "- Total number of applications: {}", summary.total_applications);
    let _ = writeln!(output, "- Number of unique companies: {}", summary.unique_companies);
    let _ = writeln!(
        output,
        "- Average number of applications per company: {}",
        or_undefined(summary.applications_per_company, |v| format!("{v:.2}"))
    );
    let _ = writeln!(
        output,
        "- Total response rate (including auto-denials): {}%",
        format::significant(summary.total_response_rate, 4)
    );
    let _ = writeln!(
        output,
        "- Real response rate (excluding auto-denials): {}%",
        format::significant(summary.real_response_rate, 4)
    );
    let _ = writeln!(
        output,
        "- Average time to respond (including auto-denials): {}",
        or_undefined(summary.average_response_days, format::days)
    );
    let _ = writeln!(
        output,
        "- Real average time to respond (excluding auto-denials): {}",
        or_undefined(summary.real_average_response_days, format::days)
    );
    let _ = writeln!(
        output,
        "- Applications from the last weeks currently interviewing: {}",
        or_undefined(summary.traction_rate, |v| format!("{}%", format::significant(v, 3)))
    );
    let _ = writeln!(
        output,
        "- Longest time to respond: {}",
        extreme_text(&summary.longest_response, "days", 3)
    );
    let _ = writeln!(
        output,
        "- Average applications per week: {}",
        or_undefined(summary.applications_per_week, |v| format::significant(v, 3))
    );
    let _ = writeln!(
        output,
        "\n'Pending' applications are left out of response metrics."
    );
    output
}

/// Table followed by the `T:` / `R:` bar labels the charts draw.
fn render_labelled(table: &Table, column: &str) -> InsightResult<String> {
    let mut output = table.to_markdown();
    let keys = table.column(column)?;
    let total = table.column(TOTAL_RESPONSES)?;
    let real = table.column(REAL_RESPONSES)?;
    let _ = writeln!(output);
    for ((key, total), real) in keys.iter().zip(total).zip(real) {
        let _ = writeln!(
            output,
            "- {key}: {} / {}",
            format::bar_label(TOTAL_RESPONSES, &total.to_string(), None),
            format::bar_label(REAL_RESPONSES, &real.to_string(), None)
        );
    }
    Ok(output)
}

pub fn render_breakdown(
    dataset: &Dataset,
    dimension: Dimension,
    config: &InsightsConfig,
) -> InsightResult<String> {
    let table = aggregate::breakdown(&dataset.applications, dimension, &config.taxonomy)?;
    if table.is_empty() {
        return Ok("No applications recorded.\n".to_string());
    }
    match dimension {
        Dimension::Week | Dimension::Platform => render_labelled(&table, dimension.column()),
        _ => Ok(table.to_markdown()),
    }
}

fn render_histogram(dataset: &Dataset, config: &InsightsConfig) -> InsightResult<String> {
    let bins = metrics::response_histogram(&dataset.applications, config.histogram_bin_days())?;
    let mut output = String::new();
    let _ = writeln!(output, "| Response Time (Days) | Applications |");
    let _ = writeln!(output, "| --- | --- |");
    for bin in bins {
        let _ = writeln!(output, "| {}-{} | {} |", bin.start, bin.end, bin.count);
    }
    Ok(output)
}

fn render_cover_letters(dataset: &Dataset, config: &InsightsConfig) -> InsightResult<String> {
    let mut output = render_breakdown(dataset, Dimension::CoverLetter, config)?;
    let _ = writeln!(output);
    let _ = writeln!(output, "- Yes = Cover letter was sent.");
    let _ = writeln!(output, "- No = Cover letter was not sent.");
    let _ = writeln!(output, "- Unavailable = There was no place to add a cover letter.");
    let _ = writeln!(output, "- Questionnaire = Short-answer questions instead of a cover letter.");
    Ok(output)
}

pub fn render_interview_summary(summary: &InterviewSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "- Number of roles interviewed for: {}", summary.roles_interviewed_at);
    let _ = writeln!(output, "- Currently interviewing: {}", summary.currently_interviewing);
    let _ = writeln!(output, "- Total interviews: {}", summary.total_interviews);
    let _ = writeln!(
        output,
        "- Average number of interviews per role: {}",
        or_undefined(summary.average_per_role, |v| format::significant(v, 3))
    );
    let _ = writeln!(
        output,
        "- Average number of interviews per week: {}",
        or_undefined(summary.average_per_week, |v| format::significant(v, 3))
    );
    let _ = writeln!(
        output,
        "- Longest interview process: {}",
        extreme_text(&summary.longest_process, "interviews", 2)
    );
    output
}

pub fn render_interview_tables(tables: &InterviewTables) -> String {
    let mut output = String::new();
    for (title, table) in [
        ("By round", &tables.by_round),
        ("By round, type and location", &tables.by_round_detail),
        ("By role type", &tables.by_role),
        ("By role type, type and location", &tables.by_role_detail),
        ("By location", &tables.by_location),
        ("By type of interview", &tables.by_type),
    ] {
        let _ = writeln!(output, "### {title}");
        output.push_str(&table.to_markdown());
        let _ = writeln!(output);
    }
    output
}

fn render_heatmap(dataset: &Dataset, config: &InsightsConfig) -> InsightResult<String> {
    let days = interviews::heatmap(&dataset.interviews, &config.analysis.interview_date_format)?;
    let mut output = String::new();
    let _ = writeln!(output, "| Date | Day | Week | Month | Interviews |");
    let _ = writeln!(output, "| --- | --- | --- | --- | --- |");
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for day in days {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            day.date, DAYS[day.weekday as usize], day.iso_week, day.month, day.count
        );
    }
    Ok(output)
}

pub fn render_accuracy(accuracy: &ChanceAccuracy, real_response_rate: f64) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "- Real response rate (excluding auto-denials): {}%",
        format::significant(real_response_rate, 4)
    );
    let _ = writeln!(
        output,
        "- Response rate where the chance of success is above the threshold: {:.2}% ({} of {})",
        accuracy.rate_above_threshold,
        accuracy.responses_above_threshold,
        accuracy.applications_above_threshold
    );
    let _ = writeln!(
        output,
        "- Relative lift over the real response rate: {:.2}%",
        accuracy.relative_lift
    );
    let _ = writeln!(
        output,
        "- Accuracy score as computed in the tracker workbook: {:.2}%",
        accuracy.workbook_score
    );
    let _ = writeln!(
        output,
        "\nA chance of success of exactly {} means the posting listed no salary.",
        roe::NO_SALARY_CHANCE
    );
    output
}

fn render_roe(dataset: &Dataset, config: &InsightsConfig) -> InsightResult<String> {
    let accuracy = ChanceAccuracy::compute(&dataset.roe, &dataset.applications, config)?;
    let mut output = render_accuracy(&accuracy, accuracy.real_response_rate);

    let points = roe::points(&dataset.roe, &[]);
    let no_salary = points.iter().filter(|p| p.no_salary_listed).count();
    let _ = writeln!(
        output,
        "- Plotted applications: {} ({} without a listed salary)",
        points.len(),
        no_salary
    );
    let _ = writeln!(
        output,
        "- Statuses: {}",
        roe::unique_statuses(&dataset.roe).join(", ")
    );
    Ok(output)
}

pub fn render_validation(reports: &[HeaderReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let _ = writeln!(output, "## {}", report.sheet);
        if !report.sheet_found {
            let _ = writeln!(output, "Sheet not found.");
        }
        let missing = report.missing();
        let extra = report.extra();
        if missing.is_empty() {
            let _ = writeln!(output, "- Missing columns: none");
        } else {
            let _ = writeln!(output, "- Missing columns: {}", missing.join(", "));
        }
        if extra.is_empty() {
            let _ = writeln!(output, "- Extra columns: none");
        } else {
            let _ = writeln!(output, "- Extra columns: {}", extra.join(", "));
        }
        let _ = writeln!(output);
    }
    output
}

pub fn glossary() -> String {
    let mut output = String::new();
    let _ = writeln!(output, "- DTR: days to respond, measured to the first contact after an application is sent.");
    let _ = writeln!(output, "- Experience: how well the interviewers conducted the interview (1-5).");
    let _ = writeln!(output, "- Performance: perceived performance during an interview (1-5).");
    let _ = writeln!(output, "- Round: one scheduled interview item, possibly spanning several meetings.");
    let _ = writeln!(output, "- ROE: return on effort, the expected return relative to the effort put in.");
    let _ = writeln!(output);
    let _ = writeln!(output, "Real responses:");
    let _ = writeln!(output, "- Bailed: lost interest in the role after interviewing.");
    let _ = writeln!(output, "- Ghosted: the company stopped responding after an interview.");
    let _ = writeln!(output, "- Interviewing: currently being interviewed.");
    let _ = writeln!(output, "- No Offer: completed every round without an offer.");
    let _ = writeln!(output, "- Offer: the company sent an offer.");
    let _ = writeln!(output, "- On Hold: something is blocking the application, such as a hiring freeze.");
    let _ = writeln!(output, "- Rejected: someone at the company reached out directly to decline.");
    let _ = writeln!(output);
    let _ = writeln!(output, "Automated responses:");
    let _ = writeln!(output, "- Denied: an automated denial.");
    let _ = writeln!(output, "- Viewed: a platform reported the application was viewed, with no contact.");
    output
}

pub fn build_report(dataset: &Dataset, config: &InsightsConfig) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Job Application Insights");
    let _ = writeln!(output);

    section(
        &mut output,
        "Applications",
        ApplicationSummary::compute(&dataset.applications, config).map(|s| render_summary(&s)),
    );
    for (title, dimension) in [
        ("Applications by Industry", Dimension::Industry),
        ("Applications by Role Type", Dimension::RoleType),
        ("Applications by Company Size", Dimension::CompanySize),
        ("Applications per Week", Dimension::Week),
        ("Applications by Platform", Dimension::Platform),
        ("Month by Month", Dimension::Month),
        ("Resume Details", Dimension::Resume),
    ] {
        section(&mut output, title, render_breakdown(dataset, dimension, config));
    }
    section(&mut output, "Cover Letter Details", render_cover_letters(dataset, config));
    section(
        &mut output,
        "Application Response Time",
        render_histogram(dataset, config),
    );
    section(
        &mut output,
        "Applications by Status",
        aggregate::status_counts(&dataset.applications).map(|t| t.to_markdown()),
    );

    section(
        &mut output,
        "Interviews",
        Ok(render_interview_summary(&InterviewSummary::compute(
            &dataset.applications,
            &dataset.interviews,
            config,
        ))),
    );
    section(
        &mut output,
        "Breakdown of Interviews",
        InterviewTables::compute(&dataset.interviews).map(|t| render_interview_tables(&t)),
    );
    section(&mut output, "Interview Heatmap", render_heatmap(dataset, config));

    section(&mut output, "Return on Effort", render_roe(dataset, config));
    section(&mut output, "Glossary", Ok(glossary()));

    output
}
