pub mod types;

pub use types::{ContributionReport, OutputFormat};

use colored::Colorize;
use minijinja::{context, Environment};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to render HTML report: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Contribution report for {{ report.display_name }}</title>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 42rem; color: #24292f; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #d0d7de; }
td.count { text-align: right; font-variant-numeric: tabular-nums; }
.muted { color: #57606a; }
</style>
</head>
<body>
<h1>Contribution report for {{ report.display_name }}</h1>
<p class="muted">@{{ report.username }}{% if report.start_date or report.end_date %} &middot; {% if report.start_date %}{{ report.start_date }}{% else %}N/A{% endif %} &ndash; {% if report.end_date %}{{ report.end_date }}{% else %}N/A{% endif %}{% endif %}</p>
<table>
<tr><th>Pull requests authored</th><td class="count">{{ report.pull_requests_authored }}</td></tr>
<tr><th>Pull requests reviewed</th><td class="count">{{ report.pull_requests_reviewed }}</td></tr>
<tr><th>Valid comments</th><td class="count">{{ report.valid_comments }}</td></tr>
<tr><th>Lines added</th><td class="count">{{ report.lines_added }}</td></tr>
<tr><th>Lines deleted</th><td class="count">{{ report.lines_deleted }}</td></tr>
<tr><th>Lines modified</th><td class="count">{{ report.lines_modified }}</td></tr>
</table>
<h2>Top active repositories</h2>
{% if report.top_repositories %}
<ol>
{% for repo in report.top_repositories %}  <li>{{ repo.repository }} <span class="muted">({{ repo.interactions }} interactions)</span></li>
{% endfor %}</ol>
{% else %}
<p class="muted">No repository activity in this period.</p>
{% endif %}
<p class="muted">Repositories scanned: {{ report.repositories_scanned }}{% if report.repositories_failed %} ({{ report.repositories_failed }} failed){% endif %}</p>
</body>
</html>
"#;

/// Render `report` in the requested format. `styled` enables terminal colors
/// for [`OutputFormat::Text`] and is ignored otherwise.
pub fn render(
    report: &ContributionReport,
    format: OutputFormat,
    styled: bool,
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => Ok(render_text(report, styled)),
        OutputFormat::Html => render_html(report),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

/// Print the report to stdout (default) or write it to `output_path`.
/// Files never get color codes.
#[instrument(skip(report), fields(user = %report.username))]
pub fn output(
    report: &ContributionReport,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print!("{}", render(report, format, true)?);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            std::fs::write(path, render(report, format, false)?)?;
            Ok(())
        }
    }
}

fn render_text(report: &ContributionReport, styled: bool) -> String {
    let heading = |text: &str| {
        if styled {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    };
    let count = |n: u64| {
        if styled {
            n.to_string().bold().to_string()
        } else {
            n.to_string()
        }
    };

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        heading(&format!(
            "User Contribution Report: {} (@{})",
            report.display_name, report.username
        ))
    ));
    if report.start_date.is_some() || report.end_date.is_some() {
        out.push_str(&format!(
            "Date Range: {} - {}\n",
            date_or_na(report.start_date),
            date_or_na(report.end_date)
        ));
    }
    out.push('\n');

    let rows = [
        ("Pull Requests Authored", report.pull_requests_authored),
        ("Pull Requests Reviewed", report.pull_requests_reviewed),
        ("Valid Comments", report.valid_comments),
        ("Lines Added", report.lines_added),
        ("Lines Deleted", report.lines_deleted),
        ("Lines Modified", report.lines_modified),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{label}: {}\n", count(value)));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", heading("═══ Top 3 Active Repositories ═══")));
    if report.top_repositories.is_empty() {
        out.push_str("  No repository activity.\n");
    }
    for repo in &report.top_repositories {
        let noun = if repo.interactions == 1 {
            "interaction"
        } else {
            "interactions"
        };
        out.push_str(&format!(
            "  - {}: {} {noun}\n",
            repo.repository,
            count(repo.interactions)
        ));
    }
    out.push('\n');

    let failed = if report.repositories_failed > 0 {
        let note = format!(" ({} failed)", report.repositories_failed);
        if styled {
            note.yellow().to_string()
        } else {
            note
        }
    } else {
        String::new()
    };
    out.push_str(&format!(
        "Repositories scanned: {}{failed}\n",
        report.repositories_scanned
    ));
    out
}

fn render_html(report: &ContributionReport) -> Result<String, ReportError> {
    let mut env = Environment::new();
    // `.html` name turns on HTML auto-escaping
    env.add_template("report.html", HTML_TEMPLATE)?;
    let tmpl = env.get_template("report.html")?;
    Ok(tmpl.render(context! { report => report })?)
}

fn date_or_na(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::RepoActivity;
    use chrono::NaiveDate;

    fn sample_report() -> ContributionReport {
        ContributionReport {
            username: "alice".to_string(),
            display_name: "Alice Liddell".to_string(),
            pull_requests_authored: 4,
            pull_requests_reviewed: 7,
            valid_comments: 5,
            lines_added: 320,
            lines_deleted: 45,
            lines_modified: 365,
            top_repositories: vec![
                RepoActivity {
                    repository: "org/app".to_string(),
                    interactions: 3,
                },
                RepoActivity {
                    repository: "org/lib".to_string(),
                    interactions: 1,
                },
            ],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: None,
            repositories_scanned: 5,
            repositories_failed: 1,
        }
    }

    #[test]
    fn test_text_report_contents() {
        let text = render(&sample_report(), OutputFormat::Text, false).unwrap();
        assert!(text.contains("User Contribution Report: Alice Liddell (@alice)"));
        assert!(text.contains("Date Range: 2024-01-01 - N/A"));
        assert!(text.contains("Pull Requests Reviewed: 7"));
        assert!(text.contains("Lines Modified: 365"));
        assert!(text.contains("  - org/app: 3 interactions"));
        assert!(text.contains("  - org/lib: 1 interaction\n"));
        assert!(text.contains("Repositories scanned: 5 (1 failed)"));
    }

    #[test]
    fn test_text_report_omits_unbounded_date_range() {
        let mut report = sample_report();
        report.start_date = None;
        report.top_repositories.clear();
        report.repositories_failed = 0;
        let text = render(&report, OutputFormat::Text, false).unwrap();
        assert!(!text.contains("Date Range"));
        assert!(text.contains("No repository activity."));
        assert!(text.contains("Repositories scanned: 5\n"));
    }

    #[test]
    fn test_styled_text_does_not_panic() {
        let text = render(&sample_report(), OutputFormat::Text, true).unwrap();
        assert!(text.contains("org/app"));
    }

    #[test]
    fn test_html_report_escapes_and_lists_repos() {
        let mut report = sample_report();
        report.display_name = "<script>alert(1)</script>".to_string();
        let html = render(&report, OutputFormat::Html, false).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        // minijinja escapes `/` in HTML mode
        assert!(html.contains("<li>org&#x2f;app") || html.contains("<li>org/app"));
        assert!(html.contains("2024-01-01 &ndash; N/A"));
        assert!(html.contains("(1 failed)"));
    }

    #[test]
    fn test_json_report() {
        let json = render(&sample_report(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lines_modified"], 365);
        assert_eq!(value["top_repositories"][0]["repository"], "org/app");
    }

    #[test]
    fn test_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        output(&sample_report(), OutputFormat::Html, Some(&path)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Contribution report for Alice Liddell"));
    }

    #[test]
    fn test_text_file_has_no_color_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        output(&sample_report(), OutputFormat::Text, Some(&path)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\u{1b}'));
        assert!(content.contains("Lines Added: 320"));
    }

    #[test]
    fn test_output_to_terminal() {
        output(&sample_report(), OutputFormat::Json, None).unwrap();
    }
}
