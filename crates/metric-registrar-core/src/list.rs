//! Tables of registrations per app.

use crate::error::Result;
use crate::platform::Platform;
use crate::registrations::{RegistrationFetcher, RegistrationKind};
use std::fmt;

/// Space between columns.
const PADDING: usize = 2;

/// A header row plus data rows, printed with left-aligned columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.len());
                }
            }
        }
        widths
    }

    fn write_row(f: &mut fmt::Formatter<'_>, widths: &[usize], row: &[String]) -> fmt::Result {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                write!(f, "{cell}")?;
            } else {
                let width = widths.get(i).copied().unwrap_or_default() + PADDING;
                write!(f, "{cell:<width$}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        Self::write_row(f, &widths, &self.header)?;
        for row in &self.rows {
            Self::write_row(f, &widths, row)?;
        }
        Ok(())
    }
}

/// `App` / `Format` rows for every structured-format registration.
pub fn registered_log_formats<P, F>(platform: &P, fetcher: &F, app_name: Option<&str>) -> Result<Table>
where
    P: Platform + ?Sized,
    F: RegistrationFetcher + ?Sized,
{
    registrations_table(
        platform,
        fetcher,
        &[RegistrationKind::StructuredFormat],
        app_name,
        "Format",
    )
}

/// `App` / `Path` rows for every metrics and secure endpoint registration.
pub fn registered_metrics_endpoints<P, F>(platform: &P, fetcher: &F, app_name: Option<&str>) -> Result<Table>
where
    P: Platform + ?Sized,
    F: RegistrationFetcher + ?Sized,
{
    registrations_table(platform, fetcher, &RegistrationKind::METRICS, app_name, "Path")
}

fn registrations_table<P, F>(
    platform: &P,
    fetcher: &F,
    kinds: &[RegistrationKind],
    app_name: Option<&str>,
    config_column: &str,
) -> Result<Table>
where
    P: Platform + ?Sized,
    F: RegistrationFetcher + ?Sized,
{
    let registrations = fetcher.fetch_all(kinds)?;
    let apps = platform.get_apps()?;

    let rows = apps
        .iter()
        .filter(|app| app_name.is_none_or(|name| name == app.name))
        .flat_map(|app| {
            registrations
                .get(&app.guid)
                .into_iter()
                .flatten()
                .map(move |registration| vec![app.name.clone(), registration.config.clone()])
        })
        .collect();

    Ok(Table {
        header: vec!["App".to_string(), config_column.to_string()],
        rows,
    })
}
