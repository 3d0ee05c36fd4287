// Digest smoke tests: 1000 distinct inputs per key type should not collide.
//
// These are empirical checks with fixed seeds, not guarantees.
use chained_hashmap::{DynamicArray, Hashable};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s >> 33)
    })
}

const NUM_HASHES: usize = 1000;

// Counts digests already seen, using the crate's own array as the record.
fn count_collisions<I: IntoIterator<Item = u64>>(digests: I) -> usize {
    let mut seen: DynamicArray<u64> = DynamicArray::with_capacity(NUM_HASHES);
    let mut err = 0;
    for h in digests {
        if seen.find(&h).is_some() {
            err += 1;
        }
        seen.push_back(h);
    }
    err
}

#[test]
fn random_strings_do_not_collide() {
    const NUM_CHARS: usize = 20;
    let mut rng = lcg(0x5eed);
    let mut strings = std::collections::BTreeSet::new();
    while strings.len() < NUM_HASHES {
        let s: String = (0..NUM_CHARS)
            .map(|_| char::from(b'0' + (rng.next().unwrap_or(0) % u64::from(b'z' - b'0')) as u8))
            .collect();
        strings.insert(s);
    }
    assert_eq!(count_collisions(strings.iter().map(|s| s.digest())), 0);
}

#[test]
fn small_integers_do_not_collide() {
    assert_eq!(count_collisions((0..NUM_HASHES as i32).map(|i| i.digest())), 0);
    assert_eq!(count_collisions((0..NUM_HASHES as u32).map(|i| i.digest())), 0);
    assert_eq!(
        count_collisions((0..NUM_HASHES as i32).map(|i| (-i - 1).digest())),
        0
    );
}

#[test]
fn growing_byte_sequences_do_not_collide() {
    let mut rng = lcg(42);
    let digests = (1..=NUM_HASHES).map(|i| {
        let mut bytes: DynamicArray<u8> = DynamicArray::with_capacity(i * 2);
        for _ in 0..bytes.capacity() {
            bytes.push_back((rng.next().unwrap_or(0) % 255) as u8);
        }
        bytes.digest()
    });
    assert_eq!(count_collisions(digests), 0);
}

#[test]
fn borrowed_and_owned_text_agree() {
    let owned = String::from("borrowed lookups need equal digests");
    assert_eq!(owned.digest(), owned.as_str().digest());
    assert_eq!((&owned).digest(), owned.digest());
}
