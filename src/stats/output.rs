use crate::model::{AuthorStats, AuthorTable, Identity, RepositoryReport, WindowBoundary};
use console::style;
use std::io::{self, Write};

const AUTHOR_COLUMN: &str = "Author                    ";
const COMMITS_COLUMN: &str = "Commits in last year  ";
const TOTAL_COMMITS_COLUMN: &str = "Total commits  ";
const REVIEWS_COLUMN: &str = "Reviews in last year  ";
const TOTAL_REVIEWS_COLUMN: &str = "Total reviews";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Only authors active inside the window; window counters only.
    Windowed,
    /// Every author with all four counters.
    Totals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub mode: DisplayMode,
    pub format: OutputFormat,
}

impl ReportOptions {
    pub fn from_flags(show_totals: bool, csv: bool) -> Self {
        Self {
            mode: if show_totals {
                DisplayMode::Totals
            } else {
                DisplayMode::Windowed
            },
            format: if csv {
                OutputFormat::Csv
            } else {
                OutputFormat::Table
            },
        }
    }
}

/// Descending by window activity; equal keys keep first-seen order.
pub fn sorted_authors(table: &AuthorTable) -> Vec<(&Identity, &AuthorStats)> {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by(|a, b| b.1.window_activity().cmp(&a.1.window_activity()));
    rows
}

pub fn selected_authors(table: &AuthorTable, mode: DisplayMode) -> Vec<(&Identity, &AuthorStats)> {
    sorted_authors(table)
        .into_iter()
        .filter(|(_, stats)| mode == DisplayMode::Totals || stats.is_active_in_window())
        .collect()
}

pub fn write_table<W: Write>(out: &mut W, table: &AuthorTable, mode: DisplayMode) -> io::Result<()> {
    let rows = selected_authors(table, mode);
    writeln!(out)?;
    match mode {
        DisplayMode::Totals => {
            let header = format!(
                "{AUTHOR_COLUMN}{COMMITS_COLUMN}{TOTAL_COMMITS_COLUMN}{REVIEWS_COLUMN}{TOTAL_REVIEWS_COLUMN}"
            );
            writeln!(out, "{header}")?;
            writeln!(out, "{}", "-".repeat(header.chars().count()))?;
            for (author, stats) in rows {
                writeln!(
                    out,
                    "{:<a$}{:<c$}{:<t$}{:<r$}{}",
                    author.as_str(),
                    stats.commits_in_window,
                    stats.total_commits,
                    stats.reviews_in_window,
                    stats.total_reviews,
                    a = AUTHOR_COLUMN.len(),
                    c = COMMITS_COLUMN.len(),
                    t = TOTAL_COMMITS_COLUMN.len(),
                    r = REVIEWS_COLUMN.len(),
                )?;
            }
        }
        DisplayMode::Windowed => {
            let header = format!("{AUTHOR_COLUMN}{COMMITS_COLUMN}{}", REVIEWS_COLUMN.trim_end());
            writeln!(out, "{header}")?;
            writeln!(out, "{}", "-".repeat(header.chars().count()))?;
            for (author, stats) in rows {
                writeln!(
                    out,
                    "{:<a$}{:<c$}{}",
                    author.as_str(),
                    stats.commits_in_window,
                    stats.reviews_in_window,
                    a = AUTHOR_COLUMN.len(),
                    c = COMMITS_COLUMN.len(),
                )?;
            }
        }
    }
    writeln!(out)
}

/// Author names are written unquoted.
pub fn write_csv<W: Write>(out: &mut W, table: &AuthorTable, mode: DisplayMode) -> io::Result<()> {
    let rows = selected_authors(table, mode);
    match mode {
        DisplayMode::Totals => {
            writeln!(out, "Author,Commits in last year,Total commits,Reviews in last year,Total reviews")?;
            for (author, stats) in rows {
                writeln!(
                    out,
                    "{},{},{},{},{}",
                    author,
                    stats.commits_in_window,
                    stats.total_commits,
                    stats.reviews_in_window,
                    stats.total_reviews
                )?;
            }
        }
        DisplayMode::Windowed => {
            writeln!(out, "Author,Commits in last year,Reviews in last year")?;
            for (author, stats) in rows {
                writeln!(out, "{},{},{}", author, stats.commits_in_window, stats.reviews_in_window)?;
            }
        }
    }
    writeln!(out)
}

/// The whole organization report: timestamp line, then each repository.
pub fn write_report<W: Write>(
    out: &mut W,
    reports: &[RepositoryReport],
    boundary: &WindowBoundary,
    options: ReportOptions,
) -> io::Result<()> {
    writeln!(
        out,
        "Data as of {}",
        boundary.captured_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    for report in reports {
        writeln!(out, "{}", style(&report.repository.name).bold())?;
        match options.format {
            OutputFormat::Table => write_table(out, &report.authors, options.mode)?,
            OutputFormat::Csv => write_csv(out, &report.authors, options.mode)?,
        }
    }
    Ok(())
}
