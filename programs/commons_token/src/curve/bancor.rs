//! # Continuous Token Curve
//!
//! Mint and burn quantities for a reserve-ratio bonding curve.
//!
//! ## Token Minting Formula
//!
//! When a user deposits `E` reserve into a curve with supply `S`, reserve
//! `R` and reserve ratio `k`:
//!
//! ```text
//! S' = S × ((R + E) / R)^k
//! tokens_out = S' - S
//! ```
//!
//! ## Token Burning Formula
//!
//! When a user burns `T` tokens:
//!
//! ```text
//! reserve_out = R × (1 - (1 - T / S)^(1 / k))
//! ```
//!
//! ## Rounding
//!
//! Every intermediate value is rounded so the protocol never pays out more
//! than the exact formula: minted tokens round down, the reserve retained
//! after a burn rounds up.

use anchor_lang::prelude::*;

use super::fixed_point::{mul_div_ceil, mul_div_floor, pow_unit_wad, pow_wad, PPM, WAD};

/// Errors specific to the curve math
#[error_code(offset = 7000)]
pub enum CurveError {
    #[msg("Invalid reserves: must be positive")]
    InvalidReserves,
    #[msg("Invalid token supply: must be positive")]
    InvalidSupply,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Value outside of the function domain")]
    OutOfDomain,
    #[msg("Cannot burn more tokens than supply")]
    InsufficientTokens,
    #[msg("No tokens to mint")]
    NoTokensToMint,
    #[msg("No reserve to release")]
    NoReserveToRelease,
}

/// Bancor-style continuous curve parameterised by a ppm reserve ratio
pub struct BancorCurve;

impl BancorCurve {
    /// Calculate tokens to mint when `deposit` reserve is added
    ///
    /// # Arguments
    /// * `supply` - Current token supply (S)
    /// * `reserve` - Current reserve balance (R)
    /// * `reserve_ratio` - kappa in parts per million
    /// * `deposit` - Reserve being deposited (E)
    ///
    /// # Example
    /// ```ignore
    /// // Linear curve (kappa = 1): tokens scale with the reserve
    /// let tokens = BancorCurve::purchase_return(1_000, 1_000, 1_000_000, 100)?;
    /// assert_eq!(tokens, 100);
    /// ```
    pub fn purchase_return(
        supply: u64,
        reserve: u64,
        reserve_ratio: u32,
        deposit: u64,
    ) -> Result<u64> {
        require!(supply > 0, CurveError::InvalidSupply);
        require!(reserve > 0, CurveError::InvalidReserves);
        Self::check_ratio(reserve_ratio)?;

        if deposit == 0 {
            return Ok(0);
        }

        // Step 1: growth = (R + E) / R
        let new_reserve = (reserve as u128) + (deposit as u128);
        let growth = mul_div_floor(new_reserve, WAD, reserve as u128)?;

        // Step 2: growth^k
        let exponent = mul_div_floor(reserve_ratio as u128, WAD, PPM)?;
        let scaled = pow_wad(growth, exponent)?;

        // Step 3: tokens_out = S × (growth^k - 1)
        let minted = mul_div_floor(supply as u128, scaled - WAD, WAD)?;

        u64::try_from(minted).map_err(|_| error!(CurveError::Overflow))
    }

    /// Calculate reserve to release when `amount` tokens are burned
    ///
    /// # Arguments
    /// * `supply` - Current token supply (S)
    /// * `reserve` - Current reserve balance (R)
    /// * `reserve_ratio` - kappa in parts per million
    /// * `amount` - Tokens being burned (T)
    pub fn sale_return(supply: u64, reserve: u64, reserve_ratio: u32, amount: u64) -> Result<u64> {
        require!(supply > 0, CurveError::InvalidSupply);
        require!(reserve > 0, CurveError::InvalidReserves);
        Self::check_ratio(reserve_ratio)?;
        require!(amount <= supply, CurveError::InsufficientTokens);

        if amount == 0 {
            return Ok(0);
        }
        if amount == supply {
            return Ok(reserve);
        }

        // Step 1: remaining = 1 - T / S
        let remaining = mul_div_ceil((supply - amount) as u128, WAD, supply as u128)?;

        // Step 2: remaining^(1 / k)
        let exponent = mul_div_floor(PPM, WAD, reserve_ratio as u128)?;
        let scaled = pow_unit_wad(remaining, exponent)?;

        // Step 3: reserve_out = R - R × remaining^(1 / k)
        let retained = mul_div_ceil(reserve as u128, scaled, WAD)?;
        let released = (reserve as u128).saturating_sub(retained);

        Ok(released as u64)
    }

    /// Marginal price of the next token, WAD-scaled reserve units per token
    ///
    /// `price = R / (k × S)`
    pub fn spot_price(supply: u64, reserve: u64, reserve_ratio: u32) -> Result<u128> {
        require!(supply > 0, CurveError::InvalidSupply);
        Self::check_ratio(reserve_ratio)?;

        let numerator = (reserve as u128) * PPM;
        let denominator = (supply as u128) * (reserve_ratio as u128);
        mul_div_floor(numerator, WAD, denominator)
    }

    /// `floor(amount × ppm / 1_000_000)`
    pub fn ppm_share(amount: u64, ppm: u32) -> Result<u64> {
        require!(ppm as u128 <= PPM, CurveError::OutOfDomain);
        let share = mul_div_floor(amount as u128, ppm as u128, PPM)?;
        Ok(share as u64)
    }

    /// Splits a gross amount into `(net, fee)` with `net + fee == gross`
    pub fn split_fee(gross: u64, fee_ppm: u32) -> Result<(u64, u64)> {
        let fee = Self::ppm_share(gross, fee_ppm)?;
        Ok((gross - fee, fee))
    }

    fn check_ratio(reserve_ratio: u32) -> Result<()> {
        require!(
            reserve_ratio > 0 && reserve_ratio as u128 <= PPM,
            CurveError::OutOfDomain
        );
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
