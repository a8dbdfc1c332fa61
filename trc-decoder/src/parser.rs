//! Trace file parsing orchestration
//!
//! [`TrcParser`] ties the pieces together: it reads the comment header,
//! resolves the [`TraceVersion`] (fatal on failure, before any record is
//! produced), then hands out a lazy iterator that pushes every body line
//! through the selected grammar. Lines that match become
//! [`NormalizedRecord`]s; lines that do not are counted and skipped, never
//! raised - one malformed line must not cost the rest of the file.

use crate::grammar::LineGrammar;
use crate::types::{NormalizedRecord, Result, TraceVersion};
use crate::version;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// TRC file parser - entry point for a parse run
pub struct TrcParser;

impl TrcParser {
    /// Open a TRC file and return an iterator over its normalized records.
    ///
    /// The header is consumed eagerly: a missing or unrecognized
    /// `;$FILEVERSION=` directive fails here, with zero records produced.
    /// Body lines are only read as the iterator is drained.
    pub fn parse(path: &Path) -> Result<TrcRecordIterator<BufReader<File>>> {
        log::info!("Parsing TRC file: {:?}", path);

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Like [`TrcParser::parse`], over any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<TrcRecordIterator<R>> {
        let mut lines = reader.lines();
        let mut header: Vec<String> = Vec::new();
        let mut pending = None;

        // Header phase: the leading run of comment lines. The first
        // non-comment line belongs to the body and is retained.
        for line in lines.by_ref() {
            let line = line?;
            if line.starts_with(';') {
                header.push(line);
            } else {
                pending = Some(line);
                break;
            }
        }

        let version = version::select_version(header.iter().map(String::as_str))?;
        log::info!("Selected TRC {} grammar", version);

        Ok(TrcRecordIterator {
            lines,
            version,
            grammar: version.grammar(),
            pending,
            lines_processed: 0,
            lines_skipped: 0,
        })
    }
}

/// Lazy iterator over the normalized records of one trace file
///
/// Yields `Ok(record)` per matched line and `Err` only for read failures;
/// grammar mismatches are not errors. The public counters are the run
/// statistics: `lines_processed` counts every non-comment body line handed
/// to the grammar, `lines_skipped` the subset that did not match. Both are
/// final once the iterator is drained, and remain readable afterwards.
///
/// The sequence is single-pass; re-iterating requires re-opening the file.
/// Dropping the iterator early just releases the reader.
pub struct TrcRecordIterator<R> {
    lines: Lines<R>,
    version: TraceVersion,
    grammar: &'static dyn LineGrammar,
    /// First body line, read during the header phase
    pending: Option<String>,
    pub lines_processed: usize,
    pub lines_skipped: usize,
}

impl<R> std::fmt::Debug for TrcRecordIterator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrcRecordIterator")
            .field("version", &self.version)
            .field("lines_processed", &self.lines_processed)
            .field("lines_skipped", &self.lines_skipped)
            .finish_non_exhaustive()
    }
}

impl<R> TrcRecordIterator<R> {
    /// The version resolved from the file header
    pub fn version(&self) -> TraceVersion {
        self.version
    }
}

impl<R: BufRead> Iterator for TrcRecordIterator<R> {
    type Item = Result<NormalizedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.pending.take() {
                Some(line) => line,
                None => match self.lines.next()? {
                    Ok(line) => line,
                    Err(e) => return Some(Err(e.into())),
                },
            };

            // Comment lines may be interleaved with data; skip silently
            if line.starts_with(';') {
                continue;
            }

            self.lines_processed += 1;
            match self.grammar.parse_line(&line) {
                Some(raw) => return Some(Ok(NormalizedRecord::from_raw(raw))),
                None => {
                    self.lines_skipped += 1;
                    log::debug!("Skipping unmatched line: {}", line.trim_end());
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DecoderError, DestinationAddress, Direction};
    use std::io::Cursor;

    const V13_FILE: &str = "\
;$FILEVERSION=1.3.2
;$STARTTIME=45123.5000000
;   Start time: 10/07/2024 12:00:00.000.0
     1)      1059.9  1  Rx     18FEF121  -  8    01 02 03 04 05 06 07 08
     2)      1060.2  1  Tx     0CF00421  -  3    AA BB CC
";

    const V21_FILE: &str = "\
;$FILEVERSION=2.1
;$STARTTIME=45123.5000000
      1      1059.9 DT     1  18FEF121 Rx -  8    01 02 03 04 05 06 07 08
      2      1060.2 DT     1  0CF00421 Tx -  3    AA BB CC
";

    #[test]
    fn test_parse_v13_file() {
        let iter = TrcParser::from_reader(Cursor::new(V13_FILE)).unwrap();
        assert_eq!(iter.version(), TraceVersion::V1_3);

        let records: Vec<_> = iter.map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.timestamp, "1059.9");
        assert_eq!(first.direction, Direction::Rx);
        assert_eq!(first.can_id, "18FEF121");
        assert_eq!(first.fields.pgn, 0xFEF1);
        assert_eq!(
            first.fields.destination_address,
            DestinationAddress::Node(0xF1)
        );
        assert_eq!(first.data.len(), 8);

        let second = &records[1];
        assert_eq!(second.direction, Direction::Tx);
        assert_eq!(second.byte_count, 3);
        assert_eq!(second.data[2], "CC");
        assert_eq!(second.data[3], "");
        assert_eq!(
            second.fields.destination_address,
            DestinationAddress::Broadcast
        );
    }

    #[test]
    fn test_v13_and_v21_produce_identical_records() {
        let v13: Vec<_> = TrcParser::from_reader(Cursor::new(V13_FILE))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        let v21: Vec<_> = TrcParser::from_reader(Cursor::new(V21_FILE))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(v13, v21);
    }

    #[test]
    fn test_unsupported_version_yields_no_records() {
        let file = ";$FILEVERSION=2.0\n     1)      1.0  1  Rx     18FEF121  -  1    01\n";
        let err = TrcParser::from_reader(Cursor::new(file)).unwrap_err();
        match err {
            DecoderError::UnsupportedFormat(v) => assert_eq!(v, "2.0"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_directive_is_fatal() {
        let file = ";$STARTTIME=1\n     1)      1.0  1  Rx     18FEF121  -  1    01\n";
        let err = TrcParser::from_reader(Cursor::new(file)).unwrap_err();
        match err {
            DecoderError::UnsupportedFormat(v) => assert_eq!(v, "absent"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_line_skipped_and_counted() {
        let file = "\
;$FILEVERSION=1.3
     1)      1.0  1  Rx     18FEF121  -  1    01
     2)      garbage line that matches nothing
     3)      3.0  1  Rx     18FEF121  -  1    03
";
        let mut iter = TrcParser::from_reader(Cursor::new(file)).unwrap();
        let records: Vec<_> = iter.by_ref().map(|r| r.unwrap()).collect();

        // The bad line costs nothing but itself
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].data[0], "03");
        assert_eq!(iter.lines_skipped, 1);
        assert_eq!(iter.lines_processed, 3);
    }

    #[test]
    fn test_body_comments_not_counted() {
        let file = "\
;$FILEVERSION=1.3
     1)      1.0  1  Rx     18FEF121  -  1    01
; a comment inside the body
     2)      2.0  1  Rx     18FEF121  -  1    02
";
        let mut iter = TrcParser::from_reader(Cursor::new(file)).unwrap();
        let count = iter.by_ref().filter(|r| r.is_ok()).count();
        assert_eq!(count, 2);
        assert_eq!(iter.lines_skipped, 0);
        assert_eq!(iter.lines_processed, 2);
    }

    #[test]
    fn test_first_data_line_not_lost_to_header_scan() {
        // No trailing comments: the header phase reads one line too far and
        // must hand it back to the body phase.
        let file = ";$FILEVERSION=2.1\n      1      1.0 DT     1  18FEF121 Rx -  1    01\n";
        let records: Vec<_> = TrcParser::from_reader(Cursor::new(file))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].can_id, "18FEF121");
    }

    #[test]
    fn test_empty_body_is_fine() {
        let file = ";$FILEVERSION=1.3\n";
        let mut iter = TrcParser::from_reader(Cursor::new(file)).unwrap();
        assert!(iter.next().is_none());
        assert_eq!(iter.lines_processed, 0);
    }
}
