//! Long-format CSV ingest and pivot to a wide table.
//!
//! The input has one row per `(date, site, value)` observation. The output is a
//! [`WideTable`] with one row per distinct timestamp and one column per site.
//!
//! Design goals:
//! - **Minimal schema**: only the three configured columns are required, any
//!   other column is ignored
//! - **Day-first dates**: `01/02/2000` is the 1st of February
//! - **All or nothing**: a bad row fails the whole load with its line number
//! - **Missing is not zero**: a site with no record for a date gets `None`

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use log::{debug, warn};

use crate::domain::{LoaderConfig, LongRecord};
use crate::error::{CatchmentError, Result};
use crate::table::{RowIndex, WideTable};

/// Load a long-format CSV file into a wide table.
///
/// The file is opened, read fully and closed before this returns.
pub fn load_wide_table_from_path(path: &Path, config: &LoaderConfig) -> Result<WideTable> {
    debug!("loading `{}` from {}", config.value_column, path.display());
    let file = File::open(path)?;
    load_wide_table(file, config)
}

/// Load long-format CSV from any reader into a wide table.
pub fn load_wide_table<R: Read>(input: R, config: &LoaderConfig) -> Result<WideTable> {
    let records = read_long_records(input, config)?;
    let table = pivot_long_records(&records)?;
    debug!(
        "pivoted {} records into {} timestamps x {} sites",
        records.len(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

/// Parse long-format CSV into records without reshaping.
pub fn read_long_records<R: Read>(input: R, config: &LoaderConfig) -> Result<Vec<LongRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnPositions::resolve(&headers, config)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Quoted fields may span lines, so prefer the reader's own position.
        let line = record.position().map_or(idx + 2, |p| p.line() as usize);
        let parsed = parse_row(&record, &columns).map_err(|message| CatchmentError::Parse { line, message })?;
        records.push(parsed);
    }
    Ok(records)
}

/// Reshape long records into a wide table.
///
/// Rows are the union of all timestamps, ascending. Columns follow the order in
/// which sites first appear. A repeated `(timestamp, site)` pair keeps the later
/// value.
pub fn pivot_long_records(records: &[LongRecord]) -> Result<WideTable> {
    let mut columns: Vec<String> = Vec::new();
    let mut column_of: HashMap<&str, usize> = HashMap::new();
    for r in records {
        if !column_of.contains_key(r.site.as_str()) {
            column_of.insert(r.site.as_str(), columns.len());
            columns.push(r.site.clone());
        }
    }

    let width = columns.len();
    let mut by_time: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    let mut seen: HashSet<(NaiveDateTime, usize)> = HashSet::with_capacity(records.len());

    for r in records {
        let col = column_of[r.site.as_str()];
        if !seen.insert((r.timestamp, col)) {
            warn!("duplicate reading for site {} at {}; keeping the later one", r.site, r.timestamp);
        }
        by_time.entry(r.timestamp).or_insert_with(|| vec![None; width])[col] = r.value;
    }

    let (keys, rows): (Vec<_>, Vec<_>) = by_time.into_iter().unzip();
    WideTable::new(RowIndex::Timestamps(keys), columns, rows)
}

struct ColumnPositions {
    date: usize,
    site: usize,
    value: usize,
}

impl ColumnPositions {
    fn resolve(headers: &StringRecord, config: &LoaderConfig) -> Result<Self> {
        let header_map = build_header_map(headers);
        let lookup = |name: &str| header_map.get(&normalize_header_name(name)).copied();

        let wanted = [&config.date_column, &config.site_column, &config.value_column];
        let missing: Vec<String> = wanted
            .iter()
            .filter(|name| lookup(name.as_str()).is_none())
            .map(|name| name.to_string())
            .collect();

        match (
            lookup(config.date_column.as_str()),
            lookup(config.site_column.as_str()),
            lookup(config.value_column.as_str()),
        ) {
            (Some(date), Some(site), Some(value)) => Ok(Self { date, site, value }),
            _ => Err(CatchmentError::Schema(missing)),
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, columns: &ColumnPositions) -> std::result::Result<LongRecord, String> {
    let timestamp = parse_timestamp(get_required(record, columns.date, "date")?)?;
    let site = get_required(record, columns.site, "site")?.to_string();
    let value = parse_value(get_optional(record, columns.value))?;
    Ok(LongRecord { timestamp, site, value })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, what: &str) -> std::result::Result<&'a str, String> {
    get_optional(record, idx).ok_or_else(|| format!("Missing required {what} value"))
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_value(s: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let Some(s) = s else { return Ok(None) };
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid measurement value '{s}'"))?;
    Ok(if v.is_nan() { None } else { Some(v) })
}

/// Parse a day-first date, optionally with a time of day.
///
/// ISO `YYYY-MM-DD` is also accepted since it cannot be read day-first.
/// Years must have four digits: `01/02/03` is rejected rather than read as
/// year 3.
pub fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, String> {
    const DATETIME_FMTS: [&str; 10] = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FMTS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

    let s = s.trim();
    // chrono's %Y accepts any number of digits.
    let four_digit_year = |dt: &NaiveDateTime| (1000..=9999).contains(&dt.year());

    let parsed = DATETIME_FMTS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .chain(
            DATE_FMTS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN)),
        )
        .find(four_digit_year);

    if let Some(dt) = parsed {
        return Ok(dt);
    }
    Err(format!(
        "Invalid date '{s}'. Expected DD/MM/YYYY, DD-MM-YYYY, DD.MM.YYYY or YYYY-MM-DD, optionally with HH:MM[:SS]."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAINFALL_CSV: &str = "\
Date,Site,Rainfall (mm),River Level (m)
01/02/2000,FP35,0.0,30.1
01/02/2000,FP56,2.0,29.0
02/02/2000,FP35,1.0,34.0
03/02/2000,FP56,0.5,33.2
";

    fn at_midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn dates_are_read_day_first() {
        assert_eq!(parse_timestamp("01/02/2000").unwrap(), at_midnight(2000, 2, 1));
        assert_eq!(parse_timestamp("13-01-2000").unwrap(), at_midnight(2000, 1, 13));
        assert_eq!(parse_timestamp("2000-02-01").unwrap(), at_midnight(2000, 2, 1));

        let with_time = parse_timestamp("01/02/2000 13:45").unwrap();
        assert_eq!(with_time, at_midnight(2000, 2, 1) + chrono::Duration::minutes(13 * 60 + 45));
        assert!(parse_timestamp("02/13/2000").is_err());
        assert_eq!(parse_timestamp("1/2/2000").unwrap(), at_midnight(2000, 2, 1));
    }

    #[test]
    fn two_digit_years_are_rejected() {
        assert!(parse_timestamp("01/02/03").is_err());
        assert!(parse_timestamp("01-02-03 10:00").is_err());
        assert!(parse_timestamp("03-02-01").is_err());

        let csv = "Date,Site,Rainfall (mm)\n01/02/03,FP35,1.0\n";
        assert!(matches!(
            load_wide_table(csv.as_bytes(), &LoaderConfig::default()),
            Err(CatchmentError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn pivots_long_rows_into_site_columns() {
        let table = load_wide_table(RAINFALL_CSV.as_bytes(), &LoaderConfig::default()).unwrap();

        assert_eq!(table.columns(), &["FP35", "FP56"]);
        assert_eq!(
            table.index(),
            &RowIndex::Timestamps(vec![
                at_midnight(2000, 2, 1),
                at_midnight(2000, 2, 2),
                at_midnight(2000, 2, 3),
            ])
        );
        assert_eq!(table.column("FP35").unwrap(), vec![Some(0.0), Some(1.0), None]);
        assert_eq!(table.column("FP56").unwrap(), vec![Some(2.0), None, Some(0.5)]);
    }

    #[test]
    fn value_column_is_configurable() {
        let config = LoaderConfig::for_value_column("river level (m)");
        let table = load_wide_table(RAINFALL_CSV.as_bytes(), &config).unwrap();
        assert_eq!(table.get(0, "FP35").unwrap(), Some(30.1));
    }

    #[test]
    fn rows_are_sorted_even_when_input_is_not() {
        let csv = "Date,Site,Rainfall (mm)\n03/01/2000,A,3\n01/01/2000,A,1\n02/01/2000,B,2\n";
        let table = load_wide_table(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(table.column("A").unwrap(), vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(table.column("B").unwrap(), vec![None, Some(2.0), None]);
    }

    #[test]
    fn blank_value_is_missing_not_zero() {
        let csv = "Date,Site,Rainfall (mm)\n01/01/2000,A,\n01/01/2000,B,NaN\n";
        let table = load_wide_table(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(table.rows().to_vec(), vec![vec![None::<f64>, None]]);
    }

    #[test]
    fn missing_columns_are_a_schema_error() {
        let csv = "Date,Station,Rainfall (mm)\n01/01/2000,A,1\n";
        match load_wide_table(csv.as_bytes(), &LoaderConfig::default()) {
            Err(CatchmentError::Schema(missing)) => assert_eq!(missing, vec!["Site".to_string()]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn header_match_ignores_case_and_bom() {
        let csv = "\u{feff}date,SITE,rainfall (MM)\n01/01/2000,A,1.5\n";
        let table = load_wide_table(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(table.get(0, "A").unwrap(), Some(1.5));
    }

    #[test]
    fn bad_date_reports_its_line() {
        let csv = "Date,Site,Rainfall (mm)\n01/01/2000,A,1\nyesterday,A,2\n";
        match load_wide_table(csv.as_bytes(), &LoaderConfig::default()) {
            Err(CatchmentError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn parse_line_counts_multiline_fields() {
        let csv = "Date,Site,Rainfall (mm)\n01/01/2000,\"two\nlines\",1\n02/01/2000,A,lots\n";
        match load_wide_table(csv.as_bytes(), &LoaderConfig::default()) {
            Err(CatchmentError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn bad_value_fails_the_load() {
        let csv = "Date,Site,Rainfall (mm)\n01/01/2000,A,lots\n";
        assert!(matches!(
            load_wide_table(csv.as_bytes(), &LoaderConfig::default()),
            Err(CatchmentError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn duplicate_pair_keeps_later_value() {
        let records = vec![
            LongRecord { timestamp: at_midnight(2000, 1, 1), site: "A".into(), value: Some(1.0) },
            LongRecord { timestamp: at_midnight(2000, 1, 1), site: "A".into(), value: Some(4.0) },
        ];
        let table = pivot_long_records(&records).unwrap();
        assert_eq!(table.rows().to_vec(), vec![vec![Some(4.0)]]);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = load_wide_table("Date,Site,Rainfall (mm)\n".as_bytes(), &LoaderConfig::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.index(), &RowIndex::Timestamps(vec![]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = Path::new("/definitely/not/here/rain.csv");
        assert!(matches!(
            load_wide_table_from_path(path, &LoaderConfig::default()),
            Err(CatchmentError::Io(_))
        ));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rainfall.csv");
        std::fs::write(&path, RAINFALL_CSV).unwrap();

        let table = load_wide_table_from_path(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(table.columns(), &["FP35", "FP56"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.get(0, "FP56").unwrap(), Some(2.0));
    }
}
