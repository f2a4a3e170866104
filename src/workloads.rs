//! Factorial workloads: iterative, while-loop and recursive.
//!
//! Results are arbitrary precision so that `fac(100)` and larger do real
//! multiplication work instead of overflowing a machine integer.

use crate::error::WorkloadError;
use crate::runner::BenchRunner;
use std::fmt;

/// Unsigned arbitrary-precision integer, little-endian base 2^32 limbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNat {
    limbs: Vec<u32>,
}

impl BigNat {
    pub fn one() -> Self {
        Self { limbs: vec![1] }
    }

    /// Multiply in place by a small factor.
    pub fn mul_small(&mut self, factor: u32) {
        if factor == 0 {
            self.limbs.clear();
            self.limbs.push(0);
            return;
        }
        let mut carry = 0u64;
        for limb in self.limbs.iter_mut() {
            let prod = *limb as u64 * factor as u64 + carry;
            *limb = prod as u32;
            carry = prod >> 32;
        }
        if carry > 0 {
            self.limbs.push(carry as u32);
        }
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u64 {
        match self.limbs.iter().rposition(|&l| l != 0) {
            Some(top) => top as u64 * 32 + (32 - self.limbs[top].leading_zeros() as u64),
            None => 0,
        }
    }

    /// Divide in place by a small divisor, returning the remainder.
    fn div_rem_small(&mut self, divisor: u32) -> u32 {
        let mut rem = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let cur = (rem << 32) | *limb as u64;
            *limb = (cur / divisor as u64) as u32;
            rem = cur % divisor as u64;
        }
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        rem as u32
    }

    fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }
}

impl From<u64> for BigNat {
    fn from(v: u64) -> Self {
        let mut limbs = vec![v as u32];
        if v >> 32 != 0 {
            limbs.push((v >> 32) as u32);
        }
        Self { limbs }
    }
}

impl fmt::Display for BigNat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        // peel off base-10^9 chunks, least significant first
        let mut n = self.clone();
        let mut chunks = Vec::new();
        while !n.is_zero() {
            chunks.push(n.div_rem_small(1_000_000_000));
        }
        let mut out = String::with_capacity(chunks.len() * 9);
        if let Some(top) = chunks.pop() {
            out.push_str(&top.to_string());
        }
        for chunk in chunks.iter().rev() {
            out.push_str(&format!("{chunk:09}"));
        }
        f.write_str(&out)
    }
}

/// `n!` with a `for` loop over `2..=n`.
pub fn fac_iter(n: u32) -> BigNat {
    let mut res = BigNat::one();
    for i in 2..=n {
        res.mul_small(i);
    }
    res
}

/// `n!` with an explicit counter and `while` loop.
pub fn fac_while(n: u32) -> BigNat {
    let mut res = BigNat::one();
    let mut i = 2;
    while i <= n {
        res.mul_small(i);
        i += 1;
    }
    res
}

/// `n!` by naive recursion, one stack frame per factor.
///
/// `max_depth` bounds the recursion explicitly; asking for more frames than
/// that fails with [`WorkloadError::DepthExceeded`] before any work is done.
/// The caller is responsible for running on a thread whose stack can hold
/// `max_depth` frames.
pub fn fac_rec(n: u32, max_depth: u32) -> Result<BigNat, WorkloadError> {
    if n > max_depth {
        return Err(WorkloadError::DepthExceeded { n, max_depth });
    }
    Ok(fac_rec_unchecked(n))
}

fn fac_rec_unchecked(n: u32) -> BigNat {
    if n < 2 {
        BigNat::one()
    } else {
        let mut res = fac_rec_unchecked(n - 1);
        res.mul_small(n);
        res
    }
}

/// The factorial implementations the CLI can benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    Iter,
    While,
    Rec,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Iter, Variant::While, Variant::Rec];

    /// Function name used in benchmark names and output.
    pub fn fn_name(&self) -> &'static str {
        match self {
            Variant::Iter => "fac_iter",
            Variant::While => "fac_while",
            Variant::Rec => "fac_rec",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Variant::Iter => "for-loop over 2..=n",
            Variant::While => "explicit counter with a while loop",
            Variant::Rec => "naive recursion, one frame per factor",
        }
    }

    /// Compute `n!` with this variant.
    pub fn compute(&self, n: u32, max_depth: u32) -> Result<BigNat, WorkloadError> {
        match self {
            Variant::Iter => Ok(fac_iter(n)),
            Variant::While => Ok(fac_while(n)),
            Variant::Rec => fac_rec(n, max_depth),
        }
    }
}

/// Register the given factorial variants for `n` on a runner.
///
/// Benchmarks are named `<variant>(<n>)`, e.g. `fac_rec(100)`.
pub fn register_workloads(
    runner: &mut BenchRunner,
    variants: &[Variant],
    n: u32,
    max_depth: u32,
) -> Result<(), WorkloadError> {
    for variant in variants {
        let name = format!("{}({})", variant.fn_name(), n);
        runner.try_run(&name, || variant.compute(n, max_depth))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_small_factorials() {
        assert_eq!(fac_iter(0).to_string(), "1");
        assert_eq!(fac_iter(1).to_string(), "1");
        assert_eq!(fac_iter(5).to_string(), "120");
        assert_eq!(fac_iter(20).to_string(), "2432902008176640000");
    }

    #[test]
    fn should_compute_factorial_beyond_u64() {
        assert_eq!(
            fac_iter(25).to_string(),
            "15511210043330985984000000"
        );
        // 100! has 158 decimal digits and ends with 24 zeros
        let s = fac_iter(100).to_string();
        assert_eq!(s.len(), 158);
        assert!(s.starts_with("93326215443944152681"));
        assert!(s.ends_with(&"0".repeat(24)));
    }

    #[test]
    fn should_agree_across_variants() {
        for n in [0, 1, 2, 10, 33, 100, 257] {
            let expected = fac_iter(n);
            assert_eq!(fac_while(n), expected, "fac_while({n})");
            assert_eq!(fac_rec(n, 1_000).unwrap(), expected, "fac_rec({n})");
        }
    }

    #[test]
    fn should_fail_when_depth_exceeded() {
        assert_eq!(
            fac_rec(150, 100),
            Err(WorkloadError::DepthExceeded {
                n: 150,
                max_depth: 100
            })
        );
        assert!(fac_rec(100, 100).is_ok());
    }

    #[test]
    fn should_count_bits() {
        assert_eq!(BigNat::from(0).bits(), 0);
        assert_eq!(BigNat::from(1).bits(), 1);
        assert_eq!(BigNat::from(u64::MAX).bits(), 64);
        assert_eq!(fac_iter(20).bits(), 62);
    }

    #[test]
    fn should_zero_out_when_multiplied_by_zero() {
        let mut n = fac_iter(30);
        n.mul_small(0);
        assert_eq!(n.to_string(), "0");
    }

    #[test]
    fn should_dispatch_by_variant() {
        for v in Variant::ALL {
            assert_eq!(v.compute(12, 50).unwrap().to_string(), "479001600");
        }
        assert!(Variant::Rec.compute(60, 50).is_err());
        assert!(Variant::Iter.compute(60, 50).is_ok());
    }
}
