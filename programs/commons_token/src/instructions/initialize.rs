//! Curve Deployment
//!
//! Deployment is split in two steps to stay within the stack limit:
//!
//! Step 1: Initialize - Validates the parameters, creates the `Commons`
//!         account and the internal token mint.
//! Step 2: InitializeVaults - Creates the reserve vault and the token
//!         treasury owned by the `Commons` PDA.
//!
//! No internal tokens exist until the hatch completes.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::state::{Commons, CurveParameters};

/// Event emitted when a curve is deployed
#[event]
pub struct CommonsInitialized {
    pub commons: Pubkey,
    pub reserve_mint: Pubkey,
    pub token_mint: Pubkey,
    pub funding_pool: Pubkey,
    pub params: CurveParameters,
    pub hatch_deadline: i64,
}

// =============================================================================
// STEP 1: CREATE CURVE STATE AND MINT
// =============================================================================

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer, pays for the accounts
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + Commons::INIT_SPACE,
        seeds = [Commons::SEED, authority.key().as_ref(), reserve_mint.key().as_ref()],
        bump,
    )]
    pub commons: Box<Account<'info, Commons>>,

    /// External reserve asset
    pub reserve_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Internal token, minted only by the curve
    #[account(
        init,
        payer = authority,
        mint::decimals = reserve_mint.decimals,
        mint::authority = commons,
        seeds = [Commons::TOKEN_MINT_SEED, commons.key().as_ref()],
        bump,
    )]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: Only the address is recorded; it must sign `funds_allocated`
    pub funding_pool: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(&mut self, params: CurveParameters, bumps: &InitializeBumps) -> Result<()> {
        let clock = Clock::get()?;

        self.commons.set_inner(Commons::new(
            self.authority.key(),
            self.reserve_mint.key(),
            self.token_mint.key(),
            self.funding_pool.key(),
            params,
            clock.unix_timestamp,
            bumps.commons,
        )?);

        emit!(CommonsInitialized {
            commons: self.commons.key(),
            reserve_mint: self.reserve_mint.key(),
            token_mint: self.token_mint.key(),
            funding_pool: self.funding_pool.key(),
            params,
            hatch_deadline: self.commons.hatch_deadline(),
        });

        msg!("Commons initialized!");
        msg!("Reserve ratio: {} ppm", params.reserve_ratio);
        msg!("Raise target: {}", params.initial_raise_target);
        msg!("Hatch deadline: {}", self.commons.hatch_deadline());

        Ok(())
    }
}

// =============================================================================
// STEP 2: CREATE VAULTS
// =============================================================================

#[derive(Accounts)]
pub struct InitializeVaults<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        has_one = authority,
        has_one = reserve_mint,
        has_one = token_mint,
    )]
    pub commons: Box<Account<'info, Commons>>,

    pub reserve_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    /// External asset backing the curve
    #[account(
        init,
        payer = authority,
        associated_token::mint = reserve_mint,
        associated_token::authority = commons,
    )]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Protocol's own internal token balance
    #[account(
        init,
        payer = authority,
        associated_token::mint = token_mint,
        associated_token::authority = commons,
    )]
    pub token_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeVaults<'info> {
    pub fn initialize_vaults(&mut self) -> Result<()> {
        msg!("Reserve vault: {}", self.reserve_vault.key());
        msg!("Token treasury: {}", self.token_treasury.key());
        Ok(())
    }
}
