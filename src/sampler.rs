//! Seeded index sampling for subset creation.

use rand::RngCore;
use rand::seq::index;

/// splitmix64-based RNG with a fully visible 8-byte state.
///
/// The draw stream depends only on the seed, never on platform or process
/// state, which keeps subset selection reproducible across machines.
#[derive(Clone, Debug)]
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RngCore for SampleRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Draw `amount` unique indices from `[0, total)` without replacement and
/// return them sorted ascending.
///
/// The sort is load-bearing, not cosmetic: selected records keep their
/// original relative order in the output dataset instead of the draw order.
///
/// # Panics
///
/// Panics when `amount > total`. Callers resolve the target size against the
/// dataset length first (see [`crate::SubsetSpec::resolve`]).
pub fn sample_indices(total: usize, amount: usize, seed: u64) -> Vec<usize> {
    let mut rng = SampleRng::new(seed);
    let mut indices = index::sample(&mut rng, total, amount).into_vec();
    indices.sort_unstable();
    indices
}
