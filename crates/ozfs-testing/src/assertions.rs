//! Common assertions for ozfs testing

use ozfs_core::pattern::pattern_byte;

/// The bytes an object holds after writing `total` bytes in `chunk`-sized
/// pieces of the pattern buffer
pub fn expected_object(total: usize, chunk: usize) -> Vec<u8> {
    (0..total).map(|i| pattern_byte(i % chunk)).collect()
}

/// Asserts that `data` is what writing `data.len()` bytes with a `chunk`
/// byte pattern buffer produces
pub fn assert_pattern_object(data: &[u8], chunk: usize) {
    if let Some(pos) = data
        .iter()
        .enumerate()
        .position(|(i, byte)| *byte != pattern_byte(i % chunk))
    {
        panic!(
            "Pattern mismatch at offset {}: expected {:?}, got {:?}",
            pos,
            pattern_byte(pos % chunk) as char,
            data[pos] as char
        );
    }
}

/// Asserts that `writes` is the chunk plan for `total` bytes in `chunk`
/// sized writes
pub fn assert_chunk_plan(writes: &[usize], total: usize, chunk: usize) {
    assert_eq!(
        writes.len(),
        total.div_ceil(chunk),
        "Unexpected number of writes: {:?}",
        writes
    );
    assert_eq!(writes.iter().sum::<usize>(), total, "Writes do not add up");
    if let Some((last, rest)) = writes.split_last() {
        assert!(rest.iter().all(|len| *len == chunk), "Non-final short write: {:?}", writes);
        let tail = if total % chunk == 0 { chunk } else { total % chunk };
        assert_eq!(*last, tail, "Unexpected final write");
    }
}
