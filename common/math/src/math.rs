use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};

/// Exact integer helpers shared by the rate model and the health engine.
///
/// Every division truncates toward zero, including for negative operands.
/// Implementors get the behaviour for free with an empty `impl`.
pub trait SharedMathModule {
    /// `a * b / c`, or `None` when `c` is zero.
    fn mul_div(&self, a: &BigInt, b: &BigInt, c: &BigInt) -> Option<BigInt> {
        if c.is_zero() {
            return None;
        }
        Some(a * b / c)
    }

    /// Same as [`mul_div`](Self::mul_div) for native scales.
    fn mul_div_u64(&self, a: &BigInt, b: u64, c: u64) -> Option<BigInt> {
        self.mul_div(a, &BigInt::from(b), &BigInt::from(c))
    }

    fn get_min(&self, a: BigInt, b: BigInt) -> BigInt {
        if a < b {
            a
        } else {
            b
        }
    }

    fn get_max(&self, a: BigInt, b: BigInt) -> BigInt {
        if a > b {
            a
        } else {
            b
        }
    }

    /// `10^decimals`, the unit of an asset with that many decimals.
    fn pow10(&self, decimals: u8) -> BigInt {
        num_traits::pow(BigInt::from(10u8), usize::from(decimals))
    }

    /// Converts the exact ratio `num / den` to `f64`.
    ///
    /// The quotient is taken on `num << 64` so that the fractional part keeps
    /// 64 bits before the single rounding step into a float.
    fn ratio_to_f64(&self, num: &BigInt, den: &BigInt) -> Option<f64> {
        if den.is_zero() {
            return None;
        }
        let scaled: BigInt = (num << 64u32) / den;
        let negative = scaled.sign() == Sign::Minus;
        let float = scaled.magnitude().to_f64()? / 2f64.powi(64);
        Some(if negative { -float } else { float })
    }
}
