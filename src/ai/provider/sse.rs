//! Server-sent-event decoding (Bytes -> JSON Value)
//!
//! Splits the byte stream on blank lines, joins the `data:` lines of each
//! event and parses the payload as JSON. Bytes are buffered undecoded until a
//! full event is available, so multi-byte characters split across network
//! chunks survive intact.

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use super::{ErrorCategory, LlmError, ProviderResult};

const DONE_SIGNAL: &str = "[DONE]";

/// Decode an SSE byte stream into JSON payloads
pub fn decode_sse(
    input: BoxStream<'static, ProviderResult<Bytes>>,
) -> BoxStream<'static, ProviderResult<Value>> {
    stream::unfold(
        (input, Vec::<u8>::new(), false),
        |(mut input, mut buf, mut eof)| async move {
            loop {
                if let Some(idx) = find_delimiter(&buf) {
                    let frame: Vec<u8> = buf.drain(..idx + 2).collect();
                    match parse_frame(&frame[..idx]) {
                        Frame::Payload(result) => return Some((result, (input, buf, eof))),
                        Frame::Done => return None,
                        Frame::Skip => continue,
                    }
                }

                if eof {
                    if buf.is_empty() {
                        return None;
                    }
                    let rest = std::mem::take(&mut buf);
                    return match parse_frame(&rest) {
                        Frame::Payload(result) => Some((result, (input, buf, eof))),
                        Frame::Done | Frame::Skip => None,
                    };
                }

                match input.next().await {
                    // \r never appears unescaped inside JSON, so CRLF framing
                    // can be normalized byte-wise
                    Some(Ok(bytes)) => buf.extend(bytes.iter().copied().filter(|b| *b != b'\r')),
                    Some(Err(e)) => return Some((Err(e), (input, buf, true))),
                    None => eof = true,
                }
            }
        },
    )
    .boxed()
}

enum Frame {
    Payload(ProviderResult<Value>),
    Done,
    Skip,
}

fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}

fn parse_frame(raw: &[u8]) -> Frame {
    let text = String::from_utf8_lossy(raw);

    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|payload| payload.strip_prefix(' ').unwrap_or(payload))
        .collect();

    if data.is_empty() {
        // comments, event names, keep-alives
        return Frame::Skip;
    }

    let payload = data.join("\n");
    let payload = payload.trim();
    if payload.is_empty() {
        return Frame::Skip;
    }
    if payload == DONE_SIGNAL {
        return Frame::Done;
    }

    Frame::Payload(serde_json::from_str(payload).map_err(|e| {
        LlmError::new(
            ErrorCategory::Unknown,
            format!("Malformed stream frame: {}", e),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&[u8]]) -> BoxStream<'static, ProviderResult<Bytes>> {
        let owned: Vec<ProviderResult<Bytes>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p)))
            .collect();
        stream::iter(owned).boxed()
    }

    async fn collect(parts: &[&[u8]]) -> Vec<ProviderResult<Value>> {
        decode_sse(chunks(parts)).collect().await
    }

    #[tokio::test]
    async fn test_frames_split_across_chunks() {
        let frames = collect(&[
            b"data: {\"n\":",
            b"1}\n",
            b"\ndata: {\"n\":2}\n\n",
        ])
        .await;

        let values: Vec<i64> = frames
            .into_iter()
            .map(|f| f.unwrap()["n"].as_i64().unwrap())
            .collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_multibyte_character_split_across_chunks() {
        let text = "data: {\"t\":\"🚐 go\"}\n\n".as_bytes();
        // split inside the 4-byte emoji
        let (head, tail) = text.split_at(14);
        let frames = collect(&[head, tail]).await;

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_ref().unwrap()["t"], "🚐 go");
    }

    #[tokio::test]
    async fn test_crlf_comments_and_trailing_frame() {
        let frames = collect(&[
            b": keep-alive\r\n\r\n",
            b"data: {\"a\":true}\r\n\r\n",
            b"data: {\"b\":true}",
        ])
        .await;

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_ref().unwrap()["a"], true);
        assert_eq!(frames[1].as_ref().unwrap()["b"], true);
    }

    #[tokio::test]
    async fn test_done_signal_ends_stream() {
        let frames = collect(&[b"data: {\"a\":1}\n\ndata: [DONE]\n\ndata: {\"a\":2}\n\n"]).await;
        assert_eq!(frames.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_frame_is_an_error_item() {
        let frames = collect(&[b"data: {not json}\n\n"]).await;
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_err());
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let input = stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"a\":1}\n\n")),
            Err(LlmError::new(ErrorCategory::Network, "connection reset")),
            Ok(Bytes::from_static(b"data: {\"a\":2}\n\n")),
        ])
        .boxed();

        let frames: Vec<_> = decode_sse(input).collect().await;
        assert_eq!(frames.len(), 2);
        assert!(frames[1].is_err());
    }
}
