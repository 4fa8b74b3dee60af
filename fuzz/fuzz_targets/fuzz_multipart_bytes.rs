#![no_main]

use libfuzzer_sys::fuzz_target;
use partwise::{FormData, FormDataParser};

fuzz_target!(|data: &[u8]| {
    let whole = FormData::from_bytes(data, "X-BOUNDARY");

    // Any split point must give the same outcome as a single write.
    let at = data.first().map(|&b| b as usize % (data.len() + 1)).unwrap_or(0);
    let mut parser = FormDataParser::new("X-BOUNDARY").expect("parser");
    let split = parser
        .write(&data[..at])
        .and_then(|_| parser.write(&data[at..]))
        .and_then(|_| parser.finish());

    match (whole, split) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("split at {} changed the outcome: {:?} vs {:?}", at, a, b),
    }
});
