//! Write operations for fitted records

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::record::FitRecord;

// external crates
use log::debug;

/// Write [FitRecord]s to a CSV file
///
/// One row per record with a header of
/// `index,id,x,y,z,value,method`, which is easy to join against node tables
/// in a spreadsheet or dataframe.
///
/// ```rust, no_run
/// # use thermofit_fit::{fit_data, write_csv};
/// # let records = fit_data(&[], &[], &[], &[], &[]).unwrap_or_default();
/// write_csv(&records, "./fitted.csv").unwrap();
/// ```
pub fn write_csv<P: AsRef<Path>>(records: &[FitRecord], path: P) -> Result<()> {
    let mut writer = csv::Writer::from_writer(init_writer(path)?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Wrote {} records to csv", records.len());
    Ok(())
}

/// Read [FitRecord]s back from a CSV file written by [write_csv()]
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<FitRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut reader = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Write [FitRecord]s to a JSON file
///
/// Direct serialisation of the records as a pretty printed JSON array.
///
/// ```rust, no_run
/// # use thermofit_fit::{fit_data, write_json};
/// # let records = fit_data(&[], &[], &[], &[], &[]).unwrap_or_default();
/// write_json(&records, "./fitted.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(records: &[FitRecord], path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Write [FitRecord]s as fixed width text for a quick look
pub fn write_ascii<P: AsRef<Path>>(records: &[FitRecord], path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    writeln!(
        writer,
        "{:>8} {:>10} {:>11} {:>11} {:>11} {:>11} method",
        "index", "id", "x", "y", "z", "value"
    )?;
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Method;

    fn records() -> Vec<FitRecord> {
        vec![
            FitRecord {
                index: 1,
                id: 11,
                x: 0.0,
                y: 0.5,
                z: -1.0,
                value: 12.5,
                method: Method::Interpolated,
            },
            FitRecord {
                index: 2,
                id: 12,
                x: 1.0e-3,
                y: 0.0,
                z: 2.0,
                value: 0.0,
                method: Method::Extrapolated,
            },
        ]
    }

    #[test]
    fn csv_round_trip() {
        let path = std::env::temp_dir().join("thermofit_writer_csv_round_trip.csv");
        write_csv(&records(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("index,id,x,y,z,value,method"));
        assert!(text.contains("extrapolated"));

        assert_eq!(read_csv(&path).unwrap(), records());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_array() {
        let path = std::env::temp_dir().join("thermofit_writer_json_array.json");
        write_json(&records(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<FitRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records());
        std::fs::remove_file(&path).ok();
    }
}
