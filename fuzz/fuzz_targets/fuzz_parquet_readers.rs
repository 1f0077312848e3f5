#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Malformed artifacts must fail with an error, never panic
    if let Ok(file) = resoscan::artifact::HistogramFile::from_bytes(bytes.clone()) {
        for hist in file.histograms() {
            let _ = hist.quantiles(&[0.16, 0.84]);
        }
    }

    // Same for event files, including ragged or out-of-range list columns
    if let Ok(reader) = resoscan::events::EventReader::from_bytes(bytes) {
        if let Ok(events) = reader.events() {
            for event in events.take(100) {
                match event {
                    Ok(event) => {
                        let _ = event.muon_candidates();
                        let _ = event.association_index();
                    }
                    Err(_) => break,
                }
            }
        }
    }
});
