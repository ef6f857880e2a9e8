use std::fs::File;
use std::io;
use std::io::prelude::*;

use crate::errors::*;

/// Reads a tab-separated table, skipping blank lines.
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut table: Vec<Vec<String>> = Vec::new();
    for line in reader.lines() {
        let line = line.chain_err(|| "error reading line from table")?;
        if !line.trim().is_empty() {
            table.push(line.trim_end().split('\t').map(|v| v.to_string()).collect());
        }
    }

    Ok(table)
}

/// Parses a finite decimal number; anything else is reported against `field`.
pub fn parse_f64(value: &str, field: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ErrorKind::MalformedNumber(field.to_owned(), value.to_owned()).into()),
    }
}

pub fn open_file_or_stdout(file: &Option<String>) -> Result<Box<dyn Write>> {
    if let Some(path) = file {
        let handle =
            File::create(path).chain_err(|| format!("could not create output file {:?}", path))?;

        Ok(Box::new(io::BufWriter::new(handle)))
    } else {
        Ok(Box::new(io::stdout()))
    }
}
