//! # WAD Fixed-Point Arithmetic
//!
//! Unsigned 18-decimal fixed point (`1.0 == WAD`) on `u128`, with the
//! logarithm and exponential needed to raise a ratio to a fractional power.
//!
//! ```text
//! x^e = exp(e × ln(x))
//!
//! ln(x):  x = 2^n × y, y ∈ [1, 2)
//!         ln(x) = n × ln2 + 2 × atanh((y - 1) / (y + 1))
//!
//! exp(x): x = n × ln2 + r, r ∈ [0, ln2)
//!         exp(x) = 2^n × Σ r^i / i!
//! ```
//!
//! Every division truncates. Callers that need the opposite rounding use the
//! `*_ceil` helpers.

use anchor_lang::prelude::*;

use super::bancor::CurveError;

/// 1.0 in fixed point
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Parts-per-million denominator used by every ratio parameter
pub const PPM: u128 = 1_000_000;

/// ln(2) scaled by WAD
pub const LN2_WAD: u128 = 693_147_180_559_945_309;

/// Largest power of two `exp_wad` may apply without overflowing `u128`
const MAX_EXP_SHIFT: u128 = 64;

/// exp(42) > 1e18, so WAD / exp(t) truncates to zero beyond this point
const EXP_UNDERFLOW: u128 = 42 * WAD;

/// Computes `floor(a × b / d)` without requiring `a × b` to fit in `u128`
/// as long as `b % d` times `a` does.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128> {
    require!(d > 0, CurveError::DivisionByZero);

    if let Some(product) = a.checked_mul(b) {
        return Ok(product / d);
    }

    // a × b / d = a × q + a × r / d   where b = q × d + r
    let q = b / d;
    let r = b % d;
    let high = a.checked_mul(q).ok_or(CurveError::Overflow)?;
    let low = a.checked_mul(r).ok_or(CurveError::Overflow)? / d;

    Ok(high.checked_add(low).ok_or(CurveError::Overflow)?)
}

/// Computes `ceil(a × b / d)`
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128> {
    require!(d > 0, CurveError::DivisionByZero);

    if let Some(product) = a.checked_mul(b) {
        let rounded = product / d + u128::from(product % d != 0);
        return Ok(rounded);
    }

    let q = b / d;
    let r = b % d;
    let high = a.checked_mul(q).ok_or(CurveError::Overflow)?;
    let partial = a.checked_mul(r).ok_or(CurveError::Overflow)?;
    let low = partial / d + u128::from(partial % d != 0);

    Ok(high.checked_add(low).ok_or(CurveError::Overflow)?)
}

/// Natural logarithm of `x` for `x >= WAD`
pub fn ln_wad(x: u128) -> Result<u128> {
    require!(x >= WAD, CurveError::OutOfDomain);

    // n = floor(log2(x / WAD)), so x >> n lands in [WAD, 2 × WAD)
    let whole = x / WAD;
    let n = 127 - whole.leading_zeros();
    let y = x >> n;

    let z = (y - WAD) * WAD / (y + WAD);
    let z_squared = z * z / WAD;

    let mut term = z;
    let mut sum = z;
    let mut k: u128 = 3;
    while term > 0 && k < 201 {
        term = term * z_squared / WAD;
        sum += term / k;
        k += 2;
    }

    let scaled = u128::from(n)
        .checked_mul(LN2_WAD)
        .ok_or(CurveError::Overflow)?;

    Ok(scaled.checked_add(2 * sum).ok_or(CurveError::Overflow)?)
}

/// Natural exponential of a non-negative WAD value
pub fn exp_wad(x: u128) -> Result<u128> {
    let n = x / LN2_WAD;
    require!(n <= MAX_EXP_SHIFT, CurveError::Overflow);
    let r = x - n * LN2_WAD;

    let mut term = WAD;
    let mut sum = WAD;
    let mut i: u128 = 1;
    while term > 0 {
        term = term * r / WAD / i;
        sum += term;
        i += 1;
    }

    Ok(sum.checked_mul(1u128 << n).ok_or(CurveError::Overflow)?)
}

/// Raises `base >= WAD` to a non-negative WAD exponent
pub fn pow_wad(base: u128, exponent: u128) -> Result<u128> {
    require!(base >= WAD, CurveError::OutOfDomain);

    if exponent == 0 || base == WAD {
        return Ok(WAD);
    }
    if exponent == WAD {
        return Ok(base);
    }

    let log = ln_wad(base)?;
    let scaled = mul_div_floor(log, exponent, WAD)?;
    exp_wad(scaled)
}

/// Raises `base <= WAD` to a non-negative WAD exponent.
///
/// Evaluated as `1 / (1 / base)^exponent`. The result is rounded up, and
/// collapses to zero once it would fall below one WAD unit.
pub fn pow_unit_wad(base: u128, exponent: u128) -> Result<u128> {
    require!(base <= WAD, CurveError::OutOfDomain);

    if exponent == 0 || base == WAD {
        return Ok(WAD);
    }
    if base == 0 {
        return Ok(0);
    }
    if exponent == WAD {
        return Ok(base);
    }

    let inverse = WAD * WAD / base;
    let log = ln_wad(inverse)?;
    let scaled = match log.checked_mul(exponent) {
        Some(product) => product / WAD,
        None => return Ok(0),
    };
    if scaled >= EXP_UNDERFLOW {
        return Ok(0);
    }

    let grown = exp_wad(scaled)?;
    mul_div_ceil(WAD, WAD, grown)
}

// ============================================================================
// TESTS
// ============================================================================
