use std::io::{self, Write};

use tracing::warn;

/// Writer that duplicates every buffer into a primary sink and an optional
/// secondary sink.
///
/// Each `write` hands the whole buffer to both sinks with `write_all`, so the
/// two streams never diverge on a short write. Only primary errors are
/// returned: a failing secondary is dropped and the primary keeps receiving
/// output.
#[derive(Debug)]
pub struct TeeWriter<A, B> {
    primary: A,
    secondary: Option<B>,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    /// Create a tee. With `secondary = None` it is a plain pass-through.
    pub fn new(primary: A, secondary: Option<B>) -> Self {
        Self { primary, secondary }
    }

    /// Give back both sinks
    pub fn into_inner(self) -> (A, Option<B>) {
        (self.primary, self.secondary)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        let mirrored = self.secondary.as_mut().map(|s| s.write_all(buf));
        if let Some(Err(e)) = mirrored {
            self.detach_secondary(&e);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        let flushed = self.secondary.as_mut().map(Write::flush);
        if let Some(Err(e)) = flushed {
            self.detach_secondary(&e);
        }
        Ok(())
    }
}

impl<A, B> TeeWriter<A, B> {
    /// Whether output is still being mirrored
    pub fn is_mirroring(&self) -> bool {
        self.secondary.is_some()
    }

    fn detach_secondary(&mut self, err: &io::Error) {
        warn!("Console output disabled after write error: {err}");
        self.secondary = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per call
    struct Trickle {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_both_sinks_receive_same_bytes() {
        let mut tee = TeeWriter::new(Vec::new(), Some(Vec::new()));
        tee.write_all(b"hello ").unwrap();
        tee.write_all(b"world\n").unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a, b"hello world\n");
        assert_eq!(b.unwrap(), a);
    }

    #[test]
    fn test_short_writes_do_not_diverge() {
        let trickle = Trickle {
            data: Vec::new(),
            limit: 3,
        };
        let mut tee = TeeWriter::new(trickle, Some(Vec::new()));
        let payload = b"a somewhat longer line of output\n";
        let n = tee.write(payload).unwrap();
        assert_eq!(n, payload.len());
        let (a, b) = tee.into_inner();
        assert_eq!(a.data, payload);
        assert_eq!(b.unwrap(), payload);
    }

    #[test]
    fn test_without_secondary() {
        let mut tee: TeeWriter<Vec<u8>, Vec<u8>> = TeeWriter::new(Vec::new(), None);
        tee.write_all(b"only the log").unwrap();
        tee.flush().unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a, b"only the log");
        assert!(b.is_none());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_secondary_error_detaches_secondary() {
        let mut tee = TeeWriter::new(Vec::new(), Some(Broken));
        assert!(tee.is_mirroring());
        tee.write_all(b"first\n").unwrap();
        assert!(!tee.is_mirroring());
        tee.write_all(b"second\n").unwrap();
        tee.flush().unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a, b"first\nsecond\n");
        assert!(b.is_none());
    }

    #[test]
    fn test_primary_error_is_returned() {
        let mut tee = TeeWriter::new(Broken, Some(Vec::new()));
        assert!(tee.write(b"x").is_err());
    }
}
