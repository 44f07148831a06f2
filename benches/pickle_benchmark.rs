//! Single-process micro-benchmarks for pickle encoding and decoding.
//! Builds one large pickle of mixed fields, decodes it sequentially, then
//! scans a file of many small pickles through the stream and slice
//! readers.

use r_pickle::{Pickle, PickleSlices, PickleStream};
use rand::{Rng, rng}; // `rng()` & `random_range` are the new, non-deprecated names
use std::io::Cursor;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

const NUM_RECORDS: usize = 1_000_000; // records in the large pickle
const MAX_NAME_LEN: usize = 32; // bytes per string field
const NUM_SMALL_PICKLES: usize = 200_000; // pickles in the scanned buffer

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    println!("Running pickle benchmark…");
    let pickle = benchmark_encode();
    benchmark_decode(&pickle);
    let frames = build_frames();
    benchmark_slices(&frames);
    benchmark_stream(&frames);
    println!("✅ Benchmarks completed.");
}

// ---------------------------------------------------------------------------
// 1 ─ Encode 1 M records into one pickle
// ---------------------------------------------------------------------------

fn benchmark_encode() -> Pickle<'static> {
    let mut rng = rng();
    let names: Vec<String> = (0..256)
        .map(|_| {
            let len = rng.random_range(0..MAX_NAME_LEN);
            (0..len).map(|_| rng.random_range('a'..='z')).collect()
        })
        .collect();

    let start_time = Instant::now();

    let mut pickle = Pickle::new();
    for i in 0..NUM_RECORDS {
        pickle.write_u64(i as u64);
        pickle.write_bool(i % 2 == 0);
        pickle.write_string(&names[i % names.len()]);
    }

    let dt = start_time.elapsed();
    println!(
        "Encoded {NUM_RECORDS} records ({} bytes) in {:#.3}s ({:#.3} records/s)",
        pickle.size(),
        dt.as_secs_f64(),
        NUM_RECORDS as f64 / dt.as_secs_f64()
    );
    pickle
}

// ---------------------------------------------------------------------------
// 2 ─ Decode them back with zero-copy string reads
// ---------------------------------------------------------------------------

fn benchmark_decode(pickle: &Pickle<'_>) {
    let start_time = Instant::now();

    let mut iter = pickle.iter();
    let mut checksum = 0u64;
    for i in 0..NUM_RECORDS {
        let id = iter.read_u64().expect("id");
        assert_eq!(id, i as u64);
        let flag = iter.read_bool().expect("flag");
        let name = iter.read_string_piece().expect("name");
        checksum = checksum.wrapping_add(id ^ flag as u64 ^ name.len() as u64);
    }
    assert!(iter.reached_end());

    let dt = start_time.elapsed();
    println!(
        "Decoded {NUM_RECORDS} records in {:#.3}s ({:#.3} records/s, checksum {checksum})",
        dt.as_secs_f64(),
        NUM_RECORDS as f64 / dt.as_secs_f64()
    );
}

// ---------------------------------------------------------------------------
// 3 ─ Scan back-to-back pickles
// ---------------------------------------------------------------------------

fn build_frames() -> Vec<u8> {
    let mut frames = Vec::new();
    for i in 0..NUM_SMALL_PICKLES {
        let mut pickle = Pickle::new();
        pickle.write_int(i as i32);
        pickle.write_data(&[0xa5; 20]);
        pickle.write_to(&mut frames).expect("write to Vec");
    }
    frames
}

fn benchmark_slices(frames: &[u8]) {
    let start_time = Instant::now();
    let count = PickleSlices::new(frames).count();
    assert_eq!(count, NUM_SMALL_PICKLES);

    let dt = start_time.elapsed();
    println!(
        "Sliced {count} pickles in {:#.3}s ({:#.3} pickles/s)",
        dt.as_secs_f64(),
        count as f64 / dt.as_secs_f64()
    );
}

fn benchmark_stream(frames: &[u8]) {
    let start_time = Instant::now();
    let mut count = 0usize;
    for pickle in PickleStream::new(Cursor::new(frames)) {
        let pickle = pickle.expect("well-formed stream");
        assert!(pickle.is_valid());
        count += 1;
    }
    assert_eq!(count, NUM_SMALL_PICKLES);

    let dt = start_time.elapsed();
    println!(
        "Streamed {count} pickles in {:#.3}s ({:#.3} pickles/s)",
        dt.as_secs_f64(),
        count as f64 / dt.as_secs_f64()
    );
}
