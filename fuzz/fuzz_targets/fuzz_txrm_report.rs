#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use txrm_params::container::{MemoryContainer, TxrmFile};
use txrm_params::fields::FIELD_SPECS;
use txrm_params::report::{extract, ReportParams};
use txrm_params::table::make_table_from;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a whole container: must open or fail cleanly, never panic
    if let Ok(mut file) = TxrmFile::from_reader(Cursor::new(data)) {
        let _ = file.entries();
        let _ = make_table_from(&mut file, &["1000", "1001"], &ReportParams::default());
    }

    // Arbitrary bytes as every stream the report reads
    let mut container = MemoryContainer::new();
    for spec in FIELD_SPECS.iter() {
        if let Some(path) = spec.source.path() {
            container.insert_stream(path, data.to_vec());
        }
    }
    let _ = extract(&mut container, "1000", &ReportParams::default());
});
