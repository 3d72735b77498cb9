use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

use super::{DatasetError, PrevalenceFeed};
use crate::scoring::{
    flag_from_code, AdverseRow, AdverseTable, AgeBand, CityCode, Gender, HealthSystemRow,
    HealthSystemTable, InfectionRow, InfectionTable, Observation, ObservationSeries, RiskError,
    TransmissionRow, TransmissionTable,
};

pub(crate) const HEALTH_SYSTEM_FILE: &str = "health_system.csv";
pub(crate) const INFECTION_FILE: &str = "p_inf.csv";
pub(crate) const ADVERSE_FILE: &str = "p_adverse.csv";
pub(crate) const PREVALENCE_FILE: &str = "prevalence_live.csv";
pub(crate) const TRANSMISSION_FILE: &str = "transmission.csv";

const MISSING_MARKERS: [&str; 3] = ["NA", "N/A", "-"];

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn rows<R, T>(source: R, file: &'static str) -> Result<Vec<T>, DatasetError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    reader(source)
        .deserialize::<T>()
        .map(|row| row.map_err(|source| DatasetError::Csv { file, source }))
        .collect()
}

fn table_error(file: &'static str) -> impl Fn(RiskError) -> DatasetError {
    move |source| DatasetError::Table { file, source }
}

#[derive(Debug, Deserialize)]
struct HealthSystemCsvRow {
    #[serde(rename = "City_code")]
    city: u16,
    #[serde(rename = "Beds")]
    beds: f64,
    #[serde(rename = "ICU")]
    icu: f64,
}

pub fn parse_health_system<R: Read>(source: R) -> Result<HealthSystemTable, DatasetError> {
    let parsed = rows::<_, HealthSystemCsvRow>(source, HEALTH_SYSTEM_FILE)?
        .into_iter()
        .map(|row| HealthSystemRow {
            city: CityCode(row.city),
            beds: row.beds,
            icu: row.icu,
        })
        .collect();
    Ok(HealthSystemTable::new(parsed))
}

#[derive(Debug, Deserialize)]
struct InfectionCsvRow {
    #[serde(rename = "Gender")]
    gender: u8,
    #[serde(rename = "City_code")]
    city: u16,
    #[serde(rename = "Prob")]
    probability: f64,
}

pub fn parse_infection<R: Read>(source: R) -> Result<InfectionTable, DatasetError> {
    let to_table = table_error(INFECTION_FILE);
    let parsed = rows::<_, InfectionCsvRow>(source, INFECTION_FILE)?
        .into_iter()
        .map(|row| -> Result<InfectionRow, RiskError> {
            Ok(InfectionRow {
                gender: Gender::from_code(row.gender)?,
                city: CityCode(row.city),
                probability: row.probability,
            })
        })
        .collect::<Result<Vec<_>, RiskError>>()
        .map_err(&to_table)?;
    InfectionTable::new(parsed).map_err(to_table)
}

#[derive(Debug, Deserialize)]
struct AdverseCsvRow {
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Diabetes")]
    diabetes: u8,
    #[serde(rename = "Hypertension")]
    hypertension: u8,
    #[serde(rename = "Hosp")]
    hospitalization: f64,
    #[serde(rename = "Death")]
    death: f64,
}

pub fn parse_adverse<R: Read>(source: R) -> Result<AdverseTable, DatasetError> {
    let to_table = table_error(ADVERSE_FILE);
    let parsed = rows::<_, AdverseCsvRow>(source, ADVERSE_FILE)?
        .into_iter()
        .map(|row| -> Result<AdverseRow, RiskError> {
            Ok(AdverseRow {
                age_band: AgeBand::from_code(row.age)?,
                diabetes: flag_from_code("diabetes", row.diabetes)?,
                hypertension: flag_from_code("hypertension", row.hypertension)?,
                hospitalization: row.hospitalization,
                death: row.death,
            })
        })
        .collect::<Result<Vec<_>, RiskError>>()
        .map_err(&to_table)?;
    AdverseTable::new(parsed).map_err(to_table)
}

#[derive(Debug, Deserialize)]
struct TransmissionCsvRow {
    #[serde(rename = "City_code")]
    city: u16,
    #[serde(rename = "Place")]
    place: String,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Transmission")]
    transmission: f64,
}

pub fn parse_transmission<R: Read>(source: R) -> Result<TransmissionTable, DatasetError> {
    let parsed = rows::<_, TransmissionCsvRow>(source, TRANSMISSION_FILE)?
        .into_iter()
        .map(|row| TransmissionRow {
            city: CityCode(row.city),
            place: row.place,
            kind: row.kind,
            transmission: row.transmission,
        })
        .collect();
    Ok(TransmissionTable::new(parsed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedColumn {
    Date,
    Active(CityCode),
    Growth(CityCode),
    Ignored,
}

fn classify_header(header: &str) -> FeedColumn {
    let lowered = header.trim().to_ascii_lowercase();
    if lowered == "date" {
        return FeedColumn::Date;
    }
    let city = |suffix: &str| suffix.parse::<u16>().ok().map(CityCode);
    if let Some(code) = lowered.strip_prefix("active_").and_then(city) {
        return FeedColumn::Active(code);
    }
    if let Some(code) = lowered.strip_prefix("growth_").and_then(city) {
        return FeedColumn::Growth(code);
    }
    FeedColumn::Ignored
}

fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| raw.eq_ignore_ascii_case(marker))
}

struct FeedRow {
    row_number: usize,
    date: Option<NaiveDate>,
    cells: Vec<(FeedColumn, Option<f64>)>,
}

/// Puts feed rows oldest first. Fully dated feeds are sorted by date; undated
/// exports list the newest row first and are reversed. A feed that dates only
/// some of its rows is rejected at the first undated row.
fn order_chronologically(
    rows: &mut [FeedRow],
    columns: &[FeedColumn],
    headers: &csv::StringRecord,
) -> Result<(), DatasetError> {
    let Some(first_undated) = rows
        .iter()
        .find(|row| row.date.is_none())
        .map(|row| row.row_number)
    else {
        rows.sort_by_key(|row| row.date);
        return Ok(());
    };

    if rows.iter().all(|row| row.date.is_none()) {
        rows.reverse();
        return Ok(());
    }

    let date_column = columns
        .iter()
        .position(|column| *column == FeedColumn::Date)
        .and_then(|position| headers.get(position))
        .unwrap_or("Date");
    Err(DatasetError::MalformedCell {
        file: PREVALENCE_FILE,
        row: first_undated,
        column: date_column.to_string(),
        value: String::new(),
    })
}

/// Reads the live feed: an optional `Date` column plus `active_<city>` and
/// `growth_<city>` columns. Missing cells become unavailable observations.
pub fn parse_prevalence<R: Read>(source: R) -> Result<PrevalenceFeed, DatasetError> {
    let csv_error = |source: csv::Error| DatasetError::Csv {
        file: PREVALENCE_FILE,
        source,
    };
    let mut csv_reader = reader(source);
    let columns: Vec<FeedColumn> = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(classify_header)
        .collect();
    let headers = csv_reader.headers().map_err(csv_error)?.clone();

    let mut feed_rows: Vec<FeedRow> = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row_number = index + 2;
        let mut date = None;
        let mut cells = Vec::new();

        for (position, raw) in record.iter().enumerate() {
            let column = columns.get(position).copied().unwrap_or(FeedColumn::Ignored);
            let raw = raw.trim();
            match column {
                FeedColumn::Ignored => {}
                FeedColumn::Date => {
                    if !raw.is_empty() {
                        date = Some(parse_feed_date(raw).ok_or_else(|| {
                            DatasetError::MalformedCell {
                                file: PREVALENCE_FILE,
                                row: row_number,
                                column: headers.get(position).unwrap_or_default().to_string(),
                                value: raw.to_string(),
                            }
                        })?);
                    }
                }
                FeedColumn::Active(_) | FeedColumn::Growth(_) => {
                    let value = if is_missing(raw) {
                        None
                    } else {
                        Some(raw.parse::<f64>().map_err(|_| DatasetError::MalformedCell {
                            file: PREVALENCE_FILE,
                            row: row_number,
                            column: headers.get(position).unwrap_or_default().to_string(),
                            value: raw.to_string(),
                        })?)
                    };
                    cells.push((column, value));
                }
            }
        }

        feed_rows.push(FeedRow {
            row_number,
            date,
            cells,
        });
    }

    order_chronologically(&mut feed_rows, &columns, &headers)?;

    let mut active: BTreeMap<CityCode, Vec<Observation>> = BTreeMap::new();
    let mut growth: BTreeMap<CityCode, Vec<Observation>> = BTreeMap::new();
    for column in &columns {
        match column {
            FeedColumn::Active(city) => {
                active.entry(*city).or_default();
            }
            FeedColumn::Growth(city) => {
                growth.entry(*city).or_default();
            }
            _ => {}
        }
    }

    for FeedRow { date, cells, .. } in feed_rows {
        for (column, value) in cells {
            let observation = Observation { date, value };
            match column {
                FeedColumn::Active(city) => active.entry(city).or_default().push(observation),
                FeedColumn::Growth(city) => growth.entry(city).or_default().push(observation),
                _ => {}
            }
        }
    }

    let series = |prefix: &'static str,
                  feed: BTreeMap<CityCode, Vec<Observation>>|
     -> BTreeMap<CityCode, ObservationSeries> {
        feed.into_iter()
            .map(move |(city, entries)| {
                (
                    city,
                    ObservationSeries::new(format!("{prefix}_{}", city.0), entries),
                )
            })
            .collect()
    };

    Ok(PrevalenceFeed::new(
        series("active", active),
        series("growth", growth),
    ))
}
