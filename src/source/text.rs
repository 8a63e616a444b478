//! Line-oriented instance listing reader.
//!
//! Format: one instance per line, `<class> <size>`.
//!
//! Example: "java.util.HashMap$Node 32"
//! The last whitespace-separated token is the shallow size, everything before
//! it is the class. `?` in either position marks an unresolved value.

use super::InstanceRecord;
use crate::histogram::ClassIdentity;
use crate::utils::config::UNRESOLVED_MARKER;
use crate::utils::error::SourceError;
use std::io::{BufRead, Lines};

/// Lazy reader over a text instance listing
pub struct TextInstanceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TextInstanceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TextInstanceReader<R> {
    type Item = Result<InstanceRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(SourceError::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(parse_line(trimmed, self.line_no));
        }
    }
}

/// Parse a single non-empty listing line
///
/// **Private** - internal helper for the reader
fn parse_line(line: &str, line_no: usize) -> Result<InstanceRecord, SourceError> {
    let (class_part, size_part) = line
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| SourceError::Malformed {
            line: line_no,
            reason: format!("expected '<class> <size>', got '{}'", line),
        })?;

    let class_part = class_part.trim_end();

    let size = if size_part == UNRESOLVED_MARKER {
        None
    } else {
        let size = size_part.parse::<u64>().map_err(|_| SourceError::Malformed {
            line: line_no,
            reason: format!("invalid size '{}'", size_part),
        })?;
        Some(size)
    };

    let class = if class_part == UNRESOLVED_MARKER {
        None
    } else {
        Some(ClassIdentity::parse(class_part))
    };

    Ok(InstanceRecord { class, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<Result<InstanceRecord, SourceError>> {
        TextInstanceReader::new(Cursor::new(input.to_string())).collect()
    }

    #[test]
    fn test_parse_basic_lines() {
        let records = read_all("java.lang.String 24\n0x7f 16\n");

        assert_eq!(records.len(), 2);
        assert_eq!(*records[0].as_ref().unwrap(), InstanceRecord::new("java.lang.String", 24));
        assert_eq!(
            *records[1].as_ref().unwrap(),
            InstanceRecord::new(ClassIdentity::id(0x7f), 16)
        );
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let records = read_all("# heap listing\n\n   \nFoo 8\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_unresolved_markers() {
        let records = read_all("? 16\nFoo ?\n");
        let first = records[0].as_ref().unwrap();
        let second = records[1].as_ref().unwrap();

        assert!(first.class.is_none());
        assert_eq!(first.size, Some(16));
        assert_eq!(second.class, Some(ClassIdentity::named("Foo")));
        assert!(second.size.is_none());
    }

    #[test]
    fn test_class_with_spaces() {
        let records = read_all("int[] of length 3 40\n");
        assert_eq!(
            *records[0].as_ref().unwrap(),
            InstanceRecord::new("int[] of length 3", 40)
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let records = read_all("Foo 8\n# c\nBar\nBaz -3\n");

        assert!(records[0].is_ok());
        match &records[1] {
            Err(SourceError::Malformed { line, .. }) => assert_eq!(*line, 3),
            other => panic!("unexpected: {:?}", other),
        }
        match &records[2] {
            Err(SourceError::Malformed { line, reason }) => {
                assert_eq!(*line, 4);
                assert!(reason.contains("-3"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
