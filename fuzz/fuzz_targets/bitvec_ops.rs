#![no_main]
use libfuzzer_sys::fuzz_target;
use rsbits::bitvec::BitVector;

fuzz_target!(|data: (Vec<u64>, usize)| {
    let (words, seed) = data;
    if words.is_empty() {
        return;
    }

    let len = words.len() * 64;
    let bv = BitVector::new(words.clone());

    // Check total rank
    let mut expected_total = 0;
    for i in 0..len {
        if (words[i / 64] >> (i % 64)) & 1 != 0 {
            expected_total += 1;
        }
    }
    assert_eq!(bv.rank(len).unwrap(), expected_total);
    assert_eq!(bv.count_ones(), expected_total);

    // Check rank/select agreement at a derived rank
    if expected_total > 0 {
        let k = (seed / 13) % expected_total;
        let pos = bv.select(k).unwrap_or_else(|| {
            panic!("select({}) failed for expected_total={}", k, expected_total)
        });
        assert!(pos < len);
        assert!(bv.get(pos).unwrap());
        assert_eq!(bv.rank(pos).unwrap(), k);
        assert_eq!(bv.rank(pos + 1).unwrap(), k + 1);
    }

    // Serialization must round-trip
    let restored = BitVector::from_bytes(&bv.to_bytes()).unwrap();
    assert_eq!(restored.words(), bv.words());
});
