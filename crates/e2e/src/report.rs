//! HTML run report
//!
//! One report file per run. The path is fixed before any test executes and
//! the file is rewritten as results arrive, so a crashed run still leaves a
//! readable partial report.

use std::path::{Path, PathBuf};
use chrono::{DateTime, Local};
use tracing::info;

use flair_common::ArtifactDirs;

use crate::error::E2eResult;
use crate::hooks::{write_new_file, Status, TIMESTAMP_FORMAT};
use crate::runner::TestResult;

pub const REPORT_PREFIX: &str = "flair_test_report";

/// Picks the report destination for a run
pub struct ReportFinalizer;

impl ReportFinalizer {
    /// `flair_test_report_{YYYYMMDD_HHMMSS}` for a run started at `at`
    pub fn report_stem(at: DateTime<Local>) -> String {
        format!("{}_{}", REPORT_PREFIX, at.format(TIMESTAMP_FORMAT))
    }

    /// Reserve this run's report file. Existing reports are never reused.
    pub fn configure(dirs: &ArtifactDirs, at: DateTime<Local>) -> E2eResult<Report> {
        std::fs::create_dir_all(&dirs.reports)?;

        let mut report = Report {
            path: PathBuf::new(),
            started_at: at,
            results: Vec::new(),
        };
        report.path = write_new_file(
            &dirs.reports,
            &Self::report_stem(at),
            "html",
            report.render().as_bytes(),
        )?;

        info!("Report: {}", report.path.display());
        Ok(report)
    }
}

/// The run's report, accumulated test by test
#[derive(Debug)]
pub struct Report {
    path: PathBuf,
    started_at: DateTime<Local>,
    results: Vec<TestResult>,
}

impl Report {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Add a finished test and rewrite the file
    pub fn record(&mut self, result: TestResult) -> E2eResult<()> {
        self.results.push(result);
        std::fs::write(&self.path, self.render())?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let count = |status: Status| self.results.iter().filter(|r| r.status == status).count();

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>FLAIR Test Report</title>\n");
        html.push_str(
            "<style>body{font-family:sans-serif}table{border-collapse:collapse}\
             td,th{border:1px solid #ccc;padding:4px 8px}\
             .passed{color:#2a7a2a}.failed{color:#b00}.error{color:#b60}</style>\n",
        );
        html.push_str("</head>\n<body>\n<h1>FLAIR Test Report</h1>\n");
        html.push_str(&format!(
            "<p>Started {}. {} test(s): {} passed, {} failed, {} errors.</p>\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.results.len(),
            count(Status::Passed),
            count(Status::Failed),
            count(Status::Error),
        ));
        html.push_str(
            "<table>\n<tr><th>Test</th><th>Result</th><th>Phase</th>\
             <th>Duration (ms)</th><th>Message</th><th>Evidence</th></tr>\n",
        );

        for result in &self.results {
            let evidence = result
                .evidence
                .as_ref()
                .map(|p| {
                    let p = escape(&p.to_string_lossy());
                    format!("<a href=\"file://{}\">{}</a>", p, p)
                })
                .unwrap_or_default();

            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td><pre>{}</pre></td><td>{}</td></tr>\n",
                escape(&result.name),
                result.status,
                result.status,
                result.phase,
                result.duration_ms,
                escape(result.error.as_deref().unwrap_or("")),
                evidence,
            ));
        }

        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
