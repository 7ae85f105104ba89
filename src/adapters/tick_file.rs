//! JSON-lines tick files
//!
//! One `PriceTick` object per line:
//! `{"symbol":"BTC","price":64000.5,"volume":1.2,"timestamp":17}`.
//! Blank lines are skipped. Parse errors carry the 1-based line number.

use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::domain::tick::PriceTick;

#[derive(Debug, Error)]
pub enum TickFileError {
    #[error("Failed to read ticks: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: invalid tick: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Streaming tick reader over any buffered source
pub struct TickReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TickReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TickReader<R> {
    type Item = Result<PriceTick, TickFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(serde_json::from_str(trimmed).map_err(|source| TickFileError::Parse {
                line: self.line_no,
                source,
            }));
        }
    }
}

/// Write one tick as a JSON line
pub fn write_tick<W: Write>(writer: &mut W, tick: &PriceTick) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, tick)?;
    writer.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_ticks_and_skips_blank_lines() {
        let input = r#"{"symbol":"X","price":10.0,"volume":1.0,"timestamp":1}

{"symbol":"Y","price":20.5,"volume":0.0,"timestamp":2}
"#;
        let ticks: Vec<PriceTick> = TickReader::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1], PriceTick::new("Y", 20.5, 0.0, 2));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "{\"symbol\":\"X\",\"price\":10.0}\n\nnot json\n";
        let results: Vec<_> = TickReader::new(Cursor::new(input)).collect();
        assert!(results[0].is_ok());
        match &results[1] {
            Err(TickFileError::Parse { line, .. }) => assert_eq!(*line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut buffer = Vec::new();
        write_tick(&mut buffer, &PriceTick::new("BTC", 64000.5, 1.25, 9)).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.ends_with('\n'));

        let tick = TickReader::new(Cursor::new(buffer)).next().unwrap().unwrap();
        assert_eq!(tick.symbol, "BTC");
        assert_eq!(tick.timestamp, 9);
    }
}
