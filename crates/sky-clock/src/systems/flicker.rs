//! Lamp flicker source.

/// Seedable xorshift64 generator. Seeded from config so ticks replay exactly in tests.
#[derive(Debug, Clone)]
pub struct Flicker {
    state: u64,
}

impl Flicker {
    pub fn new(seed: u64) -> Self {
        Flicker {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform sample in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Flicker::new(42);
        let mut b = Flicker::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn samples_are_unit_interval() {
        let mut f = Flicker::new(0);
        for _ in 0..1000 {
            let v = f.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
