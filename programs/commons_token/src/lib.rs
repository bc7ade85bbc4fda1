//! # Commons Token: Augmented Bonding Curve
//!
//! A continuous token with a two-phase funding protocol on Solana.
//!
//! ## Overview
//!
//! 1. **Hatch**: contributors pay the reserve asset at a fixed initial price
//!    until the raise target is met. Their tokens are locked.
//! 2. **Open**: anyone can mint and burn against a reserve-ratio bonding
//!    curve. Burns pay a friction fee to the funding pool.
//!
//! Locked hatch tokens vest as the funding pool reports how much of the raise
//! it has put to use, not as time passes.

use anchor_lang::prelude::*;

pub mod curve;
pub mod errors;
pub mod instructions;
pub mod state;

pub use curve::*;
pub use instructions::*;
pub use state::CurveParameters;

// Replace with your deployed program ID
declare_id!("5kHatchCmnsTkn4VdB2qYfR8sJxWp1LzNe7uMcGa3Tvo");

#[program]
pub mod commons_token {
    use super::*;

    /// Deploy a curve and its internal token mint (Step 1)
    pub fn initialize(ctx: Context<Initialize>, params: CurveParameters) -> Result<()> {
        ctx.accounts.initialize(params, &ctx.bumps)
    }

    /// Create the reserve vault and token treasury (Step 2)
    pub fn initialize_vaults(ctx: Context<InitializeVaults>) -> Result<()> {
        ctx.accounts.initialize_vaults()
    }

    /// Contribute reserve during the hatch
    pub fn hatch_contribute(ctx: Context<HatchContribute>, amount: u64) -> Result<()> {
        ctx.accounts.hatch_contribute(amount, &ctx.bumps)
    }

    /// Report utilized funds (funding pool only)
    pub fn funds_allocated(ctx: Context<ReportAllocation>, amount: u64) -> Result<()> {
        ctx.accounts.funds_allocated(amount)
    }

    /// Release the unlocked share of the caller's hatch tokens
    pub fn claim_funds(ctx: Context<ClaimFunds>) -> Result<()> {
        ctx.accounts.claim_funds()
    }

    /// Mint tokens by depositing reserve
    pub fn mint_tokens(
        ctx: Context<Trade>,
        external_amount_in: u64,
        min_tokens_out: u64,
    ) -> Result<u64> {
        ctx.accounts.mint_tokens(external_amount_in, min_tokens_out)
    }

    /// Burn tokens to withdraw reserve
    pub fn burn_tokens(
        ctx: Context<Trade>,
        token_amount_in: u64,
        min_external_out: u64,
    ) -> Result<u64> {
        ctx.accounts.burn_tokens(token_amount_in, min_external_out)
    }

    /// Tokens a deposit would currently mint
    pub fn quote_mint(ctx: Context<Quote>, external_amount_in: u64) -> Result<u64> {
        ctx.accounts.quote_mint(external_amount_in)
    }

    /// Net reserve a burn would currently pay out
    pub fn quote_burn(ctx: Context<Quote>, token_amount_in: u64) -> Result<u64> {
        ctx.accounts.quote_burn(token_amount_in)
    }

    /// Marginal token price, WAD-scaled
    pub fn spot_price(ctx: Context<Quote>) -> Result<u128> {
        ctx.accounts.spot_price()
    }

    /// Phase, raise progress and vesting totals
    pub fn hatch_status(ctx: Context<Status>) -> Result<CommonsStatus> {
        ctx.accounts.hatch_status()
    }

    /// `(paid, locked, claimed)` for one contributor
    pub fn initial_contributions(ctx: Context<ContributorStatus>) -> Result<InitialContribution> {
        ctx.accounts.initial_contributions()
    }
}
