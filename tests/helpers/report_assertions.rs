//! Assertions on file reports.

use incwise::FileReport;
use incwise::analysis::OutputLine;
use incwise::hir::Diagnostic;
use incwise::session::SessionReport;

use super::unit_builder::file;

pub fn texts(lines: &[OutputLine]) -> Vec<String> {
    lines.iter().map(OutputLine::text).collect()
}

/// The report of `name`, which must exist.
pub fn report<'a>(session: &'a SessionReport, name: &str) -> &'a FileReport {
    let target = file(name);
    match session.report_for(&target) {
        Some(report) => report,
        None => panic!(
            "no report for {target}; reported: {:?}",
            session.files.iter().map(|r| &r.file).collect::<Vec<_>>()
        ),
    }
}

pub fn main_report(session: &SessionReport) -> &FileReport {
    report(session, session.main_file.as_str())
}

pub fn assert_adds(report: &FileReport, expected: &[&str]) {
    assert_eq!(
        texts(&report.add),
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "add list of {}",
        report.file
    );
}

pub fn assert_removes(report: &FileReport, expected: &[&str]) {
    assert_eq!(
        texts(&report.remove),
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "remove list of {}",
        report.file
    );
}

pub fn assert_full(report: &FileReport, expected: &[&str]) {
    assert_eq!(
        texts(&report.full),
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "full list of {}",
        report.file
    );
}

pub fn assert_clean(report: &FileReport) {
    assert!(
        report.is_clean(),
        "expected no changes for {}, got add {:?} remove {:?}",
        report.file,
        texts(&report.add),
        texts(&report.remove)
    );
}

pub fn codes<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Vec<String> {
    diagnostics
        .into_iter()
        .filter_map(|d| d.code.as_deref().map(str::to_string))
        .collect()
}
