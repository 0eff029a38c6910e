//! Typed reader for newline-delimited JSON response bodies.

use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Lazily decodes one record at a time from a byte stream.
///
/// [`JsonLines::next_record`] yields `Ok(Some(record))` per record and
/// `Ok(None)` once the body ends cleanly. A malformed record is an error,
/// never an end of stream. Blank lines are skipped, and a final record
/// without a trailing newline is still decoded.
pub struct JsonLines<S, T> {
    stream: S,
    buf: BytesMut,
    eof: bool,
    _record: PhantomData<fn() -> T>,
}

impl<S, T, E> JsonLines<S, T>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    T: DeserializeOwned,
    ApiError: From<E>,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buf: BytesMut::new(),
            eof: false,
            _record: PhantomData,
        }
    }

    pub async fn next_record(&mut self) -> Result<Option<T>, ApiError> {
        loop {
            if let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
                let line = self.buf.split_to(pos + 1);
                let line = line.trim_ascii();
                if line.is_empty() {
                    continue;
                }
                return Ok(Some(serde_json::from_slice(line)?));
            }

            if self.eof {
                let rest = self.buf.split();
                let rest = rest.trim_ascii();
                if rest.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(serde_json::from_slice(rest)?));
            }

            match self.stream.next().await {
                Some(chunk) => self.buf.extend_from_slice(&chunk?),
                None => self.eof = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        n: u32,
    }

    fn lines(
        chunks: &[&'static str],
    ) -> JsonLines<impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin, Record> {
        let chunks: Vec<Result<Bytes, std::io::Error>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        JsonLines::new(stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_records_split_across_chunks() {
        let mut records = lines(&["{\"n\":1}\n{\"n\"", ":2}\n", "\n{\"n\":3}\n"]);
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 1 }));
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 2 }));
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 3 }));
        assert_eq!(records.next_record().await.unwrap(), None);
        // end of stream is sticky
        assert_eq!(records.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unterminated_final_record() {
        let mut records = lines(&["{\"n\":1}\n{\"n\":2}  "]);
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 1 }));
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 2 }));
        assert_eq!(records.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_body_is_clean_end() {
        let mut records = lines(&[]);
        assert_eq!(records.next_record().await.unwrap(), None);
        let mut records = lines(&["\n \n"]);
        assert_eq!(records.next_record().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_record_is_decode_error() {
        let mut records = lines(&["{\"n\":1}\n{\"n\":", "\n"]);
        assert_eq!(records.next_record().await.unwrap(), Some(Record { n: 1 }));
        let err = records.next_record().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_truncated_stream_is_decode_error() {
        let mut records = lines(&["{\"n\":1}\n{\"n\":"]);
        records.next_record().await.unwrap();
        assert!(matches!(
            records.next_record().await,
            Err(ApiError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"n\":1}\n")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut records: JsonLines<_, Record> = JsonLines::new(stream::iter(chunks));
        assert!(records.next_record().await.unwrap().is_some());
        assert!(matches!(records.next_record().await, Err(ApiError::Io(_))));
    }
}
