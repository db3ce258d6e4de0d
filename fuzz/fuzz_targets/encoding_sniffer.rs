#![no_main]

use html_prescan::{EncodingSniffer, SniffResult, SnifferConfig, sniff_encoding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, doc)) = data.split_first() else {
        return;
    };
    let expected = sniff_encoding(doc);

    let mut sniffer = EncodingSniffer::new(SnifferConfig::default());
    let mut settled = None;
    for chunk in doc.chunks(usize::from(split % 16) + 1) {
        if let SniffResult::Done(sniffed) = sniffer.push_bytes(chunk) {
            settled = Some(sniffed);
            break;
        }
    }
    let sniffed = settled.unwrap_or_else(|| sniffer.finish());
    assert_eq!(sniffed, expected);
    assert!(sniffer.bytes_examined() <= 1024);
});
