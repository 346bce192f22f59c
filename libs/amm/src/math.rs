//! Wide-intermediate integer arithmetic
//!
//! Every monetary computation in the workspace goes through these helpers.
//! Products are formed in 512 bits so `a * b` never overflows before the
//! division; only a quotient that cannot fit back into 256 bits is an error.

use crate::error::{AmmError, Result};
use primitive_types::{U256, U512};

/// `floor(a * b / denominator)`
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    narrow(quotient)
}

/// `ceil(a * b / denominator)`
///
/// Used wherever the pool must receive at least the exact amount.
pub fn mul_div_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let wide_denominator = U512::from(denominator);
    let mut quotient = product / wide_denominator;
    if !(product % wide_denominator).is_zero() {
        quotient += U512::one();
    }
    narrow(quotient)
}

/// `floor(a * b * scale / denominator)` for a denominator that may exceed 256 bits
///
/// `a * b` is split into `q * denominator + r` first, so only `r * scale`
/// is ever multiplied by the scale and the 512-bit intermediate stays exact.
pub fn mul_div_scaled(a: U256, b: U256, scale: u32, denominator: U512) -> Result<U256> {
    let (quotient, _) = scaled_quotient(a, b, scale, denominator)?;
    narrow(quotient)
}

/// `ceil(a * b * scale / denominator)`, see [`mul_div_scaled`]
pub fn mul_div_scaled_up(a: U256, b: U256, scale: u32, denominator: U512) -> Result<U256> {
    let (mut quotient, inexact) = scaled_quotient(a, b, scale, denominator)?;
    if inexact {
        quotient = quotient
            .checked_add(U512::one())
            .ok_or(AmmError::Overflow("scaled mul_div result"))?;
    }
    narrow(quotient)
}

/// Floored quotient and whether a remainder was dropped
fn scaled_quotient(a: U256, b: U256, scale: u32, denominator: U512) -> Result<(U512, bool)> {
    if denominator.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let scale = U512::from(scale);
    let (q, r) = a.full_mul(b).div_mod(denominator);

    let head = q
        .checked_mul(scale)
        .ok_or(AmmError::Overflow("scaled mul_div result"))?;
    let (tail, rest) = r
        .checked_mul(scale)
        .ok_or(AmmError::Overflow("scaled mul_div remainder"))?
        .div_mod(denominator);
    let quotient = head
        .checked_add(tail)
        .ok_or(AmmError::Overflow("scaled mul_div result"))?;
    Ok((quotient, !rest.is_zero()))
}

#[inline]
pub fn checked_add(a: U256, b: U256, context: &'static str) -> Result<U256> {
    a.checked_add(b).ok_or(AmmError::Overflow(context))
}

#[inline]
pub fn checked_sub(a: U256, b: U256, context: &'static str) -> Result<U256> {
    a.checked_sub(b).ok_or(AmmError::Underflow(context))
}

fn narrow(value: U512) -> Result<U256> {
    U256::try_from(value).map_err(|_| AmmError::Overflow("mul_div result exceeds 256 bits"))
}
