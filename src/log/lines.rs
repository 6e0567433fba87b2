use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes requested from the source per read. One page.
const CHUNK_SIZE: usize = 4096;

/// Forward-only iterator over the trimmed text lines of a byte source.
///
/// Only the unterminated tail of the last chunk is carried between reads, so
/// memory stays bounded by the longest line rather than the file size. The
/// final line is yielded even without a trailing newline.
pub struct LineReader<R> {
    source: R,
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to contain no newline.
    scanned: usize,
    exhausted: bool,
}

impl LineReader<File> {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            scanned: 0,
            exhausted: false,
        }
    }

    fn take_line(&mut self, end: usize, consumed: usize) -> String {
        let line = decode(&self.buffer[..end]);
        self.buffer.drain(..consumed);
        self.scanned = 0;
        line
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            if let Some(pos) = self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
                let end = self.scanned + pos;
                return Some(Ok(self.take_line(end, end + 1)));
            }
            self.scanned = self.buffer.len();

            let n = match self.source.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            };

            if n == 0 {
                self.exhausted = true;
                if self.buffer.is_empty() {
                    return None;
                }
                let len = self.buffer.len();
                return Some(Ok(self.take_line(len, len)));
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<String> {
        LineReader::new(Cursor::new(input.to_vec()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn splits_and_trims() {
        assert_eq!(collect(b"  a \n\tb\r\n\nc\n"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn yields_unterminated_final_line() {
        assert_eq!(collect(b"first\nlast"), vec!["first", "last"]);
    }

    #[test]
    fn empty_source_yields_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn lines_spanning_chunk_boundaries() {
        let long = "x".repeat(CHUNK_SIZE * 2 + 17);
        let input = format!("{long}\nshort\n{long}");
        assert_eq!(collect(input.as_bytes()), vec![long.clone(), "short".into(), long]);
    }

    #[test]
    fn small_reads_reassemble_lines() {
        let reader = LineReader::new(Trickle {
            data: b"# ninja log v6\n1\t2\t0\tfoo\tabc\n",
            step: 3,
        });
        let lines: Vec<String> = reader.map(Result::unwrap).collect();
        assert_eq!(lines, vec!["# ninja log v6", "1\t2\t0\tfoo\tabc"]);
    }

    #[test]
    fn stays_exhausted() {
        let mut reader = LineReader::new(Cursor::new(b"only".to_vec()));
        assert_eq!(reader.next().unwrap().unwrap(), "only");
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn read_error_is_reported_once() {
        let mut reader = LineReader::new(Failing);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let lines = collect(b"ok\n\xffbad\n");
        assert_eq!(lines[0], "ok");
        assert_eq!(lines[1], "\u{fffd}bad");
    }
}
