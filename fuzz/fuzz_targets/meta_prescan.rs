#![no_main]

use html_prescan::{MetaScanner, ScannerConfig, SliceSource, prescan};
use libfuzzer_sys::fuzz_target;

// First byte picks the chunk size; the rest is the document. Feeding in
// chunks must offer exactly the candidates a whole-input scan offers.
fuzz_target!(|data: &[u8]| {
    let Some((&split, doc)) = data.split_first() else {
        return;
    };
    let chunk_size = usize::from(split % 32) + 1;

    let mut whole = Vec::new();
    let outcome = prescan(doc, &mut |label: &str| {
        whole.push(label.to_string());
        false
    });
    assert!(!outcome.found());

    let mut chunked = Vec::new();
    let mut scanner = MetaScanner::new(ScannerConfig::default());
    for chunk in doc.chunks(chunk_size) {
        scanner.scan(&mut SliceSource::new(chunk), &mut |label: &str| {
            chunked.push(label.to_string());
            false
        });
    }
    assert_eq!(whole, chunked, "chunk_size={chunk_size}");
    assert_eq!(scanner.stats().bytes_consumed, doc.len() as u64);
    assert!(whole.iter().all(|label| !label.is_empty()));
});
