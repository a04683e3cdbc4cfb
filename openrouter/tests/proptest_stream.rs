//! Property-based tests: how the body is split and which filler lines surround
//! the data lines never change the chunks a reader yields.

use std::convert::Infallible;

use bytes::Bytes;
use futures::StreamExt;
use openrouter::sse::DEFAULT_MAX_LINE_BYTES;
use openrouter::{CompletionStreamChunk, StreamReader};
use proptest::prelude::*;

fn arb_filler() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[ -~]{0,16}".prop_map(|s| format!(":{s}")),
        Just("event: message".to_string()),
        Just("id: 7".to_string()),
        Just("retry: 1000".to_string()),
    ]
}

fn data_line(id: &str, text: &str) -> String {
    let payload = serde_json::json!({
        "id": id,
        "choices": [{ "index": 0, "text": text }]
    });
    format!("data: {payload}")
}

/// Body lines: each chunk preceded by filler, then the terminator.
fn build_body(chunks: &[(String, String)], fillers: &[Vec<String>], crlf: bool) -> String {
    let eol = if crlf { "\r\n" } else { "\n" };
    let mut body = String::new();
    for (i, (id, text)) in chunks.iter().enumerate() {
        for filler in fillers.get(i).into_iter().flatten() {
            body.push_str(filler);
            body.push_str(eol);
        }
        body.push_str(&data_line(id, text));
        body.push_str(eol);
    }
    body.push_str("data: [DONE]");
    body.push_str(eol);
    body
}

/// Split `body` at the given cut points (mod its length).
fn split_body(body: &str, cuts: &[usize]) -> Vec<Result<Bytes, Infallible>> {
    let bytes = body.as_bytes();
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    points.push(0);
    points.push(bytes.len());
    points.sort_unstable();
    points.dedup();
    points
        .windows(2)
        .map(|w| Ok(Bytes::copy_from_slice(&bytes[w[0]..w[1]])))
        .collect()
}

async fn read_all(parts: Vec<Result<Bytes, Infallible>>) -> Vec<(String, String)> {
    let reader: StreamReader<CompletionStreamChunk> =
        StreamReader::from_byte_stream(futures::stream::iter(parts), DEFAULT_MAX_LINE_BYTES);
    reader
        .into_stream()
        .map(|c| {
            let c = c.unwrap();
            let text = c.choices.into_iter().map(|ch| ch.text).collect();
            (c.id, text)
        })
        .collect()
        .await
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #[test]
    fn filler_and_splitting_do_not_change_chunks(
        chunks in proptest::collection::vec(("[a-z0-9-]{1,8}", "\\PC{0,12}"), 0..6),
        fillers in proptest::collection::vec(proptest::collection::vec(arb_filler(), 0..3), 0..6),
        cuts in proptest::collection::vec(any::<usize>(), 0..12),
        crlf in any::<bool>(),
    ) {
        let body = build_body(&chunks, &fillers, crlf);
        let got = block_on(read_all(split_body(&body, &cuts)));
        prop_assert_eq!(got, chunks);
    }

    #[test]
    fn missing_terminator_yields_same_chunks(
        chunks in proptest::collection::vec(("[a-z0-9-]{1,8}", "[a-z ]{0,12}"), 0..6),
    ) {
        let mut body = build_body(&chunks, &[], false);
        body.truncate(body.len() - "data: [DONE]\n".len());
        let got = block_on(read_all(split_body(&body, &[])));
        prop_assert_eq!(got, chunks);
    }
}
