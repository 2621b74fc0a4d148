use std::io::{self, BufRead};

use crate::{DatasetError, RecordLayout};

/// Options controlling how a dataset file is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub layout: RecordLayout,
    /// Maximum number of records to load. Skipped records do not count.
    pub max_samples: Option<usize>,
}

impl LoadOptions {
    #[must_use]
    pub const fn new(layout: RecordLayout) -> Self {
        Self {
            layout,
            max_samples: None,
        }
    }

    #[must_use]
    pub const fn with_max_samples(mut self, max_samples: Option<usize>) -> Self {
        self.max_samples = max_samples;
        self
    }
}

/// Splits a byte stream into fixed-width records.
#[derive(Debug)]
pub(crate) struct RecordReader<R> {
    reader: R,
    buf: Vec<u8>,
    records_read: usize,
}

impl<R> RecordReader<R>
where
    R: BufRead,
{
    pub(crate) fn new(reader: R, width: usize) -> Self {
        Self {
            reader,
            buf: vec![0; width],
            records_read: 0,
        }
    }

    /// Number of records returned so far, separators included.
    #[cfg(test)]
    pub(crate) fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the next record, or `None` at end of stream.
    pub(crate) fn next_record(&mut self) -> Result<Option<&[u8]>, DatasetError> {
        self.skip_line_terminators()?;

        let mut filled = 0;
        while filled < self.buf.len() {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < self.buf.len() {
            return Err(DatasetError::Truncated {
                record: self.records_read,
                len: filled,
                expected: self.buf.len(),
            });
        }
        self.records_read += 1;
        Ok(Some(&self.buf))
    }

    fn skip_line_terminators(&mut self) -> io::Result<()> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let skip = available
                .iter()
                .take_while(|b| matches!(b, b'\n' | b'\r'))
                .count();
            let exhausted = skip < available.len() || available.is_empty();
            self.reader.consume(skip);
            if exhausted {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reader_splits_fixed_width() {
        let mut reader = RecordReader::new("abcdef\n\nghi".as_bytes(), 3);
        assert_eq!(reader.next_record().unwrap(), Some(&b"abc"[..]));
        assert_eq!(reader.next_record().unwrap(), Some(&b"def"[..]));
        assert_eq!(reader.next_record().unwrap(), Some(&b"ghi"[..]));
        assert_eq!(reader.next_record().unwrap(), None);
        assert_eq!(reader.records_read(), 3);
    }

    #[test]
    fn test_record_reader_trailing_newlines() {
        let mut reader = RecordReader::new("ab\r\n\r\n".as_bytes(), 2);
        assert_eq!(reader.next_record().unwrap(), Some(&b"ab"[..]));
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn test_record_reader_small_buffer() {
        // force refills across record boundaries
        let inner = io::BufReader::with_capacity(2, "abc\ndef".as_bytes());
        let mut reader = RecordReader::new(inner, 3);
        assert_eq!(reader.next_record().unwrap(), Some(&b"abc"[..]));
        assert_eq!(reader.next_record().unwrap(), Some(&b"def"[..]));
        assert_eq!(reader.next_record().unwrap(), None);
    }
}
