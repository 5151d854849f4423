//! Municipality rate records, parsed from CSV.
//!
//! The CSV carries the rates as published percentages (e.g. `23.39`); the
//! table conversion turns them into the fractions the engine computes with.

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use netto_core::{Municipality, MunicipalityTable};

/// The bundled 2026 rate table, all 98 kommuner.
const MUNICIPALITY_CSV_2026: &str = include_str!("../data/municipalities_2026.csv");

/// Errors that can occur when loading municipality rate data.
#[derive(Debug, Error)]
pub enum MunicipalityLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("duplicate municipality: {0}")]
    Duplicate(String),

    #[error("rate out of range for {name}: {value}")]
    RateOutOfRange { name: String, value: Decimal },
}

impl From<csv::Error> for MunicipalityLoaderError {
    fn from(err: csv::Error) -> Self {
        MunicipalityLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the municipalities CSV file.
///
/// Columns:
/// - `name`: the official municipality name, the exact lookup key
/// - `kommuneskat_pct`: municipal tax as a percentage (e.g. 23.39)
/// - `kirkeskat_pct`: church tax as a percentage (e.g. 0.80)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MunicipalityRecord {
    pub name: String,
    pub kommuneskat_pct: Decimal,
    pub kirkeskat_pct: Decimal,
}

/// Loader for municipality rate data from CSV.
pub struct MunicipalityLoader;

impl MunicipalityLoader {
    /// Parse municipality records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MunicipalityRecord>, MunicipalityLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: MunicipalityRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed municipality records");
        Ok(records)
    }

    /// Builds the engine's lookup table from parsed records, converting the
    /// published percentages to fractions and rejecting duplicates or rates
    /// outside a sane percentage range.
    pub fn table(
        records: &[MunicipalityRecord],
    ) -> Result<MunicipalityTable, MunicipalityLoaderError> {
        let hundred = Decimal::from(100u32);
        let mut entries = Vec::with_capacity(records.len());
        let mut seen = std::collections::HashSet::new();

        for record in records {
            if !seen.insert(record.name.clone()) {
                return Err(MunicipalityLoaderError::Duplicate(record.name.clone()));
            }
            for value in [record.kommuneskat_pct, record.kirkeskat_pct] {
                if value < Decimal::ZERO || value > hundred {
                    return Err(MunicipalityLoaderError::RateOutOfRange {
                        name: record.name.clone(),
                        value,
                    });
                }
            }
            entries.push(Municipality {
                name: record.name.clone(),
                kommuneskat: record.kommuneskat_pct / hundred,
                kirkeskat: record.kirkeskat_pct / hundred,
            });
        }

        Ok(MunicipalityTable::new(entries))
    }

    /// The bundled 2026 table.
    pub fn bundled() -> Result<MunicipalityTable, MunicipalityLoaderError> {
        let records = Self::parse(MUNICIPALITY_CSV_2026.as_bytes())?;
        Self::table(&records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = "name,kommuneskat_pct,kirkeskat_pct\n\
                            København,23.39,0.80\n\
                            Aarhus,24.52,0.74\n";

    #[test]
    fn parse_reads_records_in_file_order() {
        let records = MunicipalityLoader::parse(TEST_CSV.as_bytes()).expect("parse CSV");

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            MunicipalityRecord {
                name: "København".to_string(),
                kommuneskat_pct: dec!(23.39),
                kirkeskat_pct: dec!(0.80),
            }
        );
    }

    #[test]
    fn table_converts_percentages_to_fractions() {
        let records = MunicipalityLoader::parse(TEST_CSV.as_bytes()).expect("parse CSV");

        let table = MunicipalityLoader::table(&records).expect("build table");

        let kbh = table.get("København").expect("lookup");
        assert_eq!(kbh.kommuneskat, dec!(0.2339));
        assert_eq!(kbh.kirkeskat, dec!(0.008));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let csv = "name,kommuneskat_pct,kirkeskat_pct\nKøbenhavn,23.39,0.80\nKøbenhavn,24.00,0.80\n";
        let records = MunicipalityLoader::parse(csv.as_bytes()).expect("parse CSV");

        let result = MunicipalityLoader::table(&records);

        assert!(matches!(
            result,
            Err(MunicipalityLoaderError::Duplicate(ref name)) if name == "København"
        ));
    }

    #[test]
    fn percent_rate_above_hundred_is_rejected() {
        let csv = "name,kommuneskat_pct,kirkeskat_pct\nAtlantis,123.00,0.80\n";
        let records = MunicipalityLoader::parse(csv.as_bytes()).expect("parse CSV");

        let result = MunicipalityLoader::table(&records);

        assert!(matches!(
            result,
            Err(MunicipalityLoaderError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn parse_rejects_missing_columns() {
        let csv = "name,kommuneskat_pct\nKøbenhavn,23.39\n";

        let result = MunicipalityLoader::parse(csv.as_bytes());

        let err = result.expect_err("should fail for missing column");
        let MunicipalityLoaderError::CsvParse(msg) = err else {
            panic!("expected CsvParse error, got: {err:?}");
        };
        assert!(
            msg.contains("missing field"),
            "expected 'missing field' in error, got: {msg}"
        );
    }

    #[test]
    fn parse_rejects_bad_decimals() {
        let csv = "name,kommuneskat_pct,kirkeskat_pct\nKøbenhavn,abc,0.80\n";

        let result = MunicipalityLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(MunicipalityLoaderError::CsvParse(_))));
    }

    #[test]
    fn bundled_table_loads() {
        let table = MunicipalityLoader::bundled().expect("bundled table");

        assert_eq!(table.len(), 98);
    }
}
