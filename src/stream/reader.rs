//! Edge list reader
//!
//! One record per line: `src<DELIM>dst` for insertion-only streams and
//! `src<DELIM>dst<DELIM>sign` for fully dynamic ones, where a negative sign
//! marks a deletion. Blank lines and lines starting with `#` or `%` are
//! skipped.

use super::config::Mode;
use super::{StreamError, StreamResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tristream_sampling::{EdgeEvent, EdgeOp, NodeId};

/// Parse a single record.
///
/// Returns `Ok(None)` for lines that carry no record.
pub fn parse_record(line: &str, delimiter: char, mode: Mode) -> Result<Option<EdgeEvent>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
        return Ok(None);
    }

    let mut fields = line.split(delimiter).map(str::trim);
    let src = parse_node(fields.next(), "source")?;
    let dst = parse_node(fields.next(), "destination")?;

    let op = match mode {
        Mode::Insertion => EdgeOp::Insert,
        Mode::Dynamic => {
            let field = fields
                .next()
                .filter(|f| !f.is_empty())
                .ok_or_else(|| "missing sign field".to_string())?;
            let sign: i64 = field
                .parse()
                .map_err(|e| format!("invalid sign '{}': {}", field, e))?;
            EdgeOp::from_sign(sign)
        }
    };

    Ok(Some(EdgeEvent { src, dst, op }))
}

fn parse_node(field: Option<&str>, role: &str) -> Result<NodeId, String> {
    let field = field
        .filter(|f| !f.is_empty())
        .ok_or_else(|| format!("missing {} node", role))?;
    field
        .parse()
        .map_err(|e| format!("invalid {} node '{}': {}", role, field, e))
}

/// Iterator over the records of an edge list
pub struct EdgeReader<R> {
    lines: Lines<R>,
    delimiter: char,
    mode: Mode,
    line_no: u64,
}

impl EdgeReader<BufReader<File>> {
    /// Open an edge list file
    pub fn open(path: impl AsRef<Path>, delimiter: char, mode: Mode) -> StreamResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), delimiter, mode))
    }
}

impl<R: BufRead> EdgeReader<R> {
    pub fn new(reader: R, delimiter: char, mode: Mode) -> Self {
        EdgeReader {
            lines: reader.lines(),
            delimiter,
            mode,
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for EdgeReader<R> {
    type Item = StreamResult<EdgeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(StreamError::Io(e))),
            };
            self.line_no += 1;

            match parse_record(&line, self.delimiter, self.mode) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(reason) => {
                    return Some(Err(StreamError::Parse {
                        line: self.line_no,
                        reason,
                    }))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_insertion_record() {
        assert_eq!(
            parse_record("1\t2", '\t', Mode::Insertion),
            Ok(Some(EdgeEvent::insert(1, 2)))
        );
        // a sign column is ignored for insertion-only streams
        assert_eq!(
            parse_record("3\t4\t-1\r", '\t', Mode::Insertion),
            Ok(Some(EdgeEvent::insert(3, 4)))
        );
        assert_eq!(parse_record("   ", '\t', Mode::Insertion), Ok(None));
        assert_eq!(parse_record("# FromNodeId\tToNodeId", '\t', Mode::Insertion), Ok(None));
    }

    #[test]
    fn test_parse_dynamic_record() {
        assert_eq!(
            parse_record("1\t2\t1", '\t', Mode::Dynamic),
            Ok(Some(EdgeEvent::insert(1, 2)))
        );
        assert_eq!(
            parse_record("1\t2\t0", '\t', Mode::Dynamic),
            Ok(Some(EdgeEvent::insert(1, 2)))
        );
        assert_eq!(
            parse_record("1,2,-1", ',', Mode::Dynamic),
            Ok(Some(EdgeEvent::delete(1, 2)))
        );
        assert!(parse_record("1\t2", '\t', Mode::Dynamic).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert!(parse_record("1", '\t', Mode::Insertion).is_err());
        assert!(parse_record("a\t2", '\t', Mode::Insertion).is_err());
        assert!(parse_record("1\t3000000000", '\t', Mode::Insertion).is_err());
        assert!(parse_record("1\t2\tx", '\t', Mode::Dynamic).is_err());
    }

    #[test]
    fn test_parse_negative_ids() {
        assert_eq!(
            parse_record("-5\t3", '\t', Mode::Insertion),
            Ok(Some(EdgeEvent::insert(-5, 3)))
        );
        assert_eq!(
            parse_record("-2147483648\t-1\t-1", '\t', Mode::Dynamic),
            Ok(Some(EdgeEvent::delete(i32::MIN, -1)))
        );
    }

    #[test]
    fn test_reader_reports_line_numbers() {
        let data = "1\t2\n\n2\t3\nbad\n";
        let mut reader = EdgeReader::new(Cursor::new(data), '\t', Mode::Insertion);

        assert_eq!(reader.next().unwrap().unwrap(), EdgeEvent::insert(1, 2));
        assert_eq!(reader.next().unwrap().unwrap(), EdgeEvent::insert(2, 3));
        match reader.next() {
            Some(Err(StreamError::Parse { line, .. })) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }
}
