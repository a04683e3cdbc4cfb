#![no_main]
use libfuzzer_sys::fuzz_target;
use openrouter::sse::{LineBuffer, classify};

// First byte picks the split stride; the rest is the body.
fuzz_target!(|data: &[u8]| {
    let Some((&stride, body)) = data.split_first() else {
        return;
    };
    let stride = usize::from(stride).max(1);
    let mut buf = LineBuffer::new(256);
    for piece in body.chunks(stride) {
        buf.push(piece);
        while let Ok(Some(line)) = buf.next_line() {
            let _ = classify(&line);
        }
    }
    buf.finish();
    while let Ok(Some(line)) = buf.next_line() {
        let _ = classify(&line);
    }
});
