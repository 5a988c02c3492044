use std::collections::VecDeque;
use std::io::{self, Read};

/// Presents a sequence of readers as one continuous byte stream.
///
/// Sources are pulled strictly in order: the chain reads from the first
/// source until it reports end-of-data, moves to the next, and reports
/// end-of-data itself only once the last source is exhausted. Each source is
/// dropped as soon as it runs dry, so anything it holds (an open file, for
/// instance) is released before the rest of the chain is read.
///
/// Errors from the current source are returned as-is. A failed source is not
/// skipped, so callers observe the failure at the exact point in the stream
/// where it occurred, and an [`Interrupted`](std::io::ErrorKind::Interrupted)
/// read can simply be retried.
///
/// # Examples
///
/// ```
/// use std::io::{Cursor, Read};
///
/// use formstream::ChainedReader;
///
/// let mut chained = ChainedReader::new(vec![
///     Cursor::new(&b"head "[..]),
///     Cursor::new(&b"body"[..]),
/// ]);
///
/// let mut out = String::new();
/// chained.read_to_string(&mut out).unwrap();
/// assert_eq!(out, "head body");
/// ```
pub struct ChainedReader<R> {
    sources: VecDeque<R>,
}

impl<R: Read> ChainedReader<R> {
    /// Chains `sources` in the order the iterator yields them.
    pub fn new<I>(sources: I) -> ChainedReader<R>
    where
        I: IntoIterator<Item = R>,
    {
        ChainedReader {
            sources: sources.into_iter().collect(),
        }
    }
}

impl<R: Read> Read for ChainedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while let Some(source) = self.sources.front_mut() {
            match source.read(buf)? {
                0 => {
                    self.sources.pop_front();
                }
                n => return Ok(n),
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    struct DropProbe {
        data: Cursor<Vec<u8>>,
        dropped: Arc<AtomicBool>,
    }

    impl Read for DropProbe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Drop for DropProbe {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    struct FailAfter {
        remaining: usize,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "source gave out"));
            }

            let n = buf.len().min(self.remaining);
            for byte in &mut buf[..n] {
                *byte = b'x';
            }
            self.remaining -= n;

            Ok(n)
        }
    }

    struct InterruptOnce {
        data: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }

            self.data.read(buf)
        }
    }

    #[test]
    fn test_sources_are_read_in_order() {
        let mut chained = ChainedReader::new(vec![
            Cursor::new(Vec::from(&b"one "[..])),
            Cursor::new(Vec::new()),
            Cursor::new(Vec::from(&b"two "[..])),
            Cursor::new(Vec::from(&b"three"[..])),
        ]);

        let mut out = String::new();
        chained.read_to_string(&mut out).unwrap();
        assert_eq!(out, "one two three");
    }

    #[test]
    fn test_empty_chain_is_immediately_exhausted() {
        let mut chained = ChainedReader::new(Vec::<Cursor<Vec<u8>>>::new());

        let mut buf = [0u8; 8];
        assert_eq!(chained.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_empty_destination_does_not_advance_the_chain() {
        let mut chained = ChainedReader::new(vec![Cursor::new(vec![1u8, 2, 3])]);
        assert_eq!(chained.read(&mut []).unwrap(), 0);

        let mut out = Vec::new();
        chained.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_source_error_surfaces_where_it_occurs() {
        let mut chained = ChainedReader::new(vec![
            Box::new(Cursor::new(Vec::from(&b"ok"[..]))) as Box<dyn Read>,
            Box::new(FailAfter { remaining: 3 }),
        ]);

        let mut out = Vec::new();
        let err = chained.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.to_string(), "source gave out");
        assert_eq!(out, Vec::from(&b"okxxx"[..]));
    }

    #[test]
    fn test_interrupted_source_is_retried_not_skipped() {
        let mut chained = ChainedReader::new(vec![
            Box::new(Cursor::new(Vec::from(&b"first "[..]))) as Box<dyn Read>,
            Box::new(InterruptOnce {
                data: Cursor::new(Vec::from(&b"second"[..])),
                interrupted: false,
            }),
        ]);

        let mut buf = [0u8; 6];
        chained.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"first ");

        let err = chained.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);

        // the interrupted source stays current, so retrying drains it
        let mut out = String::new();
        chained.read_to_string(&mut out).unwrap();
        assert_eq!(out, "second");
    }

    #[test]
    fn test_exhausted_sources_are_dropped_eagerly() {
        let dropped = Arc::new(AtomicBool::new(false));
        let mut chained = ChainedReader::new(vec![
            Box::new(DropProbe {
                data: Cursor::new(vec![b'a'; 4]),
                dropped: dropped.clone(),
            }) as Box<dyn Read>,
            Box::new(Cursor::new(vec![b'b'; 4])),
        ]);

        let mut buf = [0u8; 4];
        chained.read(&mut buf).unwrap();
        assert!(!dropped.load(Ordering::SeqCst));

        // the next read sees the first source report end-of-data
        chained.read(&mut buf).unwrap();
        assert!(dropped.load(Ordering::SeqCst));
    }
}
