//! Plain text storage for a [`QTable`] and its epoch counter
//!
//! The first line holds the epoch. It is followed by one line per cell in row-major order,
//! each with the four action values (up, down, left, right) separated by spaces.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    algo::tabular::QTable,
    error::{Error, Result},
};

/// Write `table` and `epoch` to `path`, replacing any existing file
pub fn save<P: AsRef<Path>>(table: &QTable, epoch: u32, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_err = |operation: &str| {
        let operation = format!("{operation} {}", path.display());
        move |source| Error::Io { operation, source }
    };

    let file = File::create(path).map_err(io_err("create"))?;
    let mut writer = BufWriter::new(file);
    write_table(&mut writer, table, epoch).map_err(io_err("write"))?;
    writer.flush().map_err(io_err("flush"))
}

/// Read a table for a `width` x `height` grid and its epoch from `path`
pub fn load<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<(QTable, u32)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open {}", path.display()),
        source,
    })?;
    read_table(BufReader::new(file), width, height)
}

/// Serialize `table` and `epoch` into `writer`
///
/// Values use the shortest representation that parses back to the same `f64`.
pub fn write_table<W: Write>(writer: &mut W, table: &QTable, epoch: u32) -> io::Result<()> {
    writeln!(writer, "{epoch}")?;
    for [up, down, left, right] in table.iter() {
        writeln!(writer, "{up} {down} {left} {right}")?;
    }
    Ok(())
}

/// Parse a table for a `width` x `height` grid and its epoch from `reader`
///
/// Blank lines are skipped. Any malformed line or a wrong number of cells fails the whole read.
pub fn read_table<R: BufRead>(reader: R, width: usize, height: usize) -> Result<(QTable, u32)> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

    let (line, epoch) = lines.next().ok_or(Error::Parse {
        line: 1,
        message: String::from("missing epoch"),
    })?;
    let epoch = read_line(line, epoch)?
        .trim()
        .parse::<u32>()
        .map_err(|e| Error::Parse {
            line,
            message: format!("invalid epoch: {e}"),
        })?;

    let mut values = Vec::with_capacity(width * height);
    for (line, text) in lines {
        let text = read_line(line, text)?;
        let row = text
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Parse {
                line,
                message: format!("invalid value: {e}"),
            })?;
        let row: [f64; 4] = row.try_into().map_err(|row: Vec<f64>| Error::Parse {
            line,
            message: format!("expected 4 values, found {}", row.len()),
        })?;
        values.push(row);
    }

    let found = values.len();
    let table = QTable::from_values(width, height, values).ok_or(Error::Shape {
        expected: width * height,
        found,
    })?;
    Ok((table, epoch))
}

fn read_line(line: usize, text: io::Result<String>) -> Result<String> {
    text.map_err(|source| Error::Io {
        operation: format!("read line {line}"),
        source,
    })
}
