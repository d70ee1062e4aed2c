//! Property tests over arbitrary and seeded pseudo-random inputs.

use std::io::Cursor;

use huffpack_core::{
    compress_stream, decompress_stream, header::MAX_CODE_LEN, CodeTable, CodeTree,
    FrequencyCounter, Symbol,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn round_trip(data: &[u8]) -> Vec<u8> {
    let mut packed = Vec::new();
    compress_stream(Cursor::new(data), &mut packed).unwrap();

    let mut restored = Vec::new();
    decompress_stream(&packed[..], &mut restored).unwrap();
    restored
}

fn table_for(data: &[u8]) -> CodeTable {
    let mut counter = FrequencyCounter::new();
    counter.observe_all(data);
    let tree = CodeTree::build(&counter.finalize()).unwrap();
    CodeTable::from_tree(&tree)
}

proptest! {
    #[test]
    fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 1..2000)) {
        prop_assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn prop_round_trip_small_alphabet(
        data in prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c']), 1..500)
    ) {
        prop_assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn prop_codes_are_prefix_free(data in prop::collection::vec(any::<u8>(), 1..1000)) {
        let table = table_for(&data);
        prop_assert!(table.is_prefix_free());
    }

    #[test]
    fn prop_every_symbol_has_a_code(data in prop::collection::vec(any::<u8>(), 1..1000)) {
        let table = table_for(&data);

        prop_assert!(table.get(Symbol::EndOfStream).is_some());
        for &b in &data {
            prop_assert!(table.get(Symbol::Byte(b)).is_some());
        }
        prop_assert!(table.max_code_len() <= MAX_CODE_LEN);
    }

    #[test]
    fn prop_rebuilt_tree_matches_table(data in prop::collection::vec(any::<u8>(), 1..1000)) {
        let table = table_for(&data);
        let rebuilt = CodeTree::from_codes(&table.entries()).unwrap();

        prop_assert_eq!(CodeTable::from_tree(&rebuilt).entries(), table.entries());
    }

    #[test]
    fn prop_deterministic(data in prop::collection::vec(any::<u8>(), 1..500)) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        compress_stream(Cursor::new(&data), &mut first).unwrap();
        compress_stream(Cursor::new(&data), &mut second).unwrap();

        prop_assert_eq!(first, second);
    }
}

/// Seeded text-like input with a skewed distribution.
#[test]
fn test_seeded_random_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let alphabet = b"etaoin shrdlu";

    let data: Vec<u8> = (0..200_000)
        .map(|_| {
            if rng.gen_bool(0.9) {
                alphabet[rng.gen_range(0..alphabet.len())]
            } else {
                rng.gen()
            }
        })
        .collect();

    assert_eq!(round_trip(&data), data);
}

/// Fibonacci-like counts push code lengths towards the worst case.
#[test]
fn test_skewed_counts_round_trip() {
    let mut data = Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for symbol in 0..20u8 {
        data.extend(std::iter::repeat(symbol).take(a));
        (a, b) = (b, a + b);
    }

    let table = table_for(&data);
    assert!(table.max_code_len() >= 19);
    assert_eq!(round_trip(&data), data);
}
