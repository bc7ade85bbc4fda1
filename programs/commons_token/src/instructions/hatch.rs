//! Hatch Contributions
//!
//! During the hatch anyone may contribute the reserve asset at the fixed
//! initial price. Contributions are capped at the remaining room, so the
//! contribution that crosses the target fills it exactly and opens the curve.
//!
//! ## Hatch Completion
//!
//! ```text
//! hatch_supply  = initial_raise_target / p0
//! funding pool  = hatch_supply × theta / 1_000_000
//! token treasury = hatch_supply - funding pool
//! ```

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked},
};

use crate::errors::CommonsError;
use crate::state::{Commons, ContributorRecord, HatchSplit};

/// Event emitted for every accepted contribution
#[event]
pub struct ContributionAccepted {
    pub commons: Pubkey,
    pub contributor: Pubkey,
    pub accepted_amount: u64,
    pub raised_external: u64,
}

/// Event emitted once, when the curve moves to the open phase
#[event]
pub struct HatchCompleted {
    pub commons: Pubkey,
    pub raised_external: u64,
    pub hatch_supply: u64,
    pub funding_pool_tokens: u64,
    pub treasury_tokens: u64,
    pub timestamp: i64,
}

#[derive(Accounts)]
pub struct HatchContribute<'info> {
    #[account(mut)]
    pub contributor: Signer<'info>,

    #[account(
        mut,
        seeds = [Commons::SEED, commons.authority.as_ref(), commons.reserve_mint.as_ref()],
        bump = commons.bump,
        has_one = reserve_mint,
        has_one = token_mint,
        has_one = funding_pool @ CommonsError::Unauthorized,
    )]
    pub commons: Box<Account<'info, Commons>>,

    #[account(
        init_if_needed,
        payer = contributor,
        space = 8 + ContributorRecord::INIT_SPACE,
        seeds = [ContributorRecord::SEED, commons.key().as_ref(), contributor.key().as_ref()],
        bump,
    )]
    pub contributor_record: Box<Account<'info, ContributorRecord>>,

    pub reserve_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Contributor's reserve asset account
    #[account(
        mut,
        associated_token::mint = reserve_mint,
        associated_token::authority = contributor,
    )]
    pub contributor_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = reserve_mint,
        associated_token::authority = commons,
    )]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = commons,
    )]
    pub token_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Matched against `commons.funding_pool`
    pub funding_pool: UncheckedAccount<'info>,

    /// Receives the funding pool share of the hatch supply
    #[account(
        init_if_needed,
        payer = contributor,
        associated_token::mint = token_mint,
        associated_token::authority = funding_pool,
    )]
    pub funding_pool_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> HatchContribute<'info> {
    pub fn hatch_contribute(&mut self, amount: u64, bumps: &HatchContributeBumps) -> Result<()> {
        let clock = Clock::get()?;

        let receipt = self.commons.accept_contribution(amount, clock.unix_timestamp)?;
        require!(
            self.contributor_reserve.amount >= receipt.accepted,
            CommonsError::TransferFailed
        );

        if self.contributor_record.is_new() {
            self.contributor_record.open(
                self.commons.key(),
                self.contributor.key(),
                bumps.contributor_record,
            );
            self.commons.register_contributor()?;
        }
        self.contributor_record
            .record_contribution(receipt.accepted, receipt.locked)?;

        // Ledger reaches its post-contribution value before any token CPI
        self.commons.exit(&crate::ID)?;
        self.contributor_record.exit(&crate::ID)?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.contributor_reserve.to_account_info(),
                    mint: self.reserve_mint.to_account_info(),
                    to: self.reserve_vault.to_account_info(),
                    authority: self.contributor.to_account_info(),
                },
            ),
            receipt.accepted,
            self.reserve_mint.decimals,
        )
        .map_err(|_| error!(CommonsError::TransferFailed))?;

        emit!(ContributionAccepted {
            commons: self.commons.key(),
            contributor: self.contributor.key(),
            accepted_amount: receipt.accepted,
            raised_external: self.commons.raised_external(),
        });

        msg!(
            "Contribution accepted: {} ({} / {})",
            receipt.accepted,
            self.commons.raised_external(),
            self.commons.params.initial_raise_target
        );

        if let Some(split) = receipt.hatch {
            self.complete_hatch(split, clock.unix_timestamp)?;
        }

        Ok(())
    }

    fn complete_hatch(&self, split: HatchSplit, timestamp: i64) -> Result<()> {
        let authority = self.commons.authority;
        let reserve_mint = self.commons.reserve_mint;
        let bump = [self.commons.bump];
        let commons_seeds: &[&[u8]] = &[Commons::SEED, authority.as_ref(), reserve_mint.as_ref(), &bump];
        let signer_seeds = &[commons_seeds];

        for (destination, amount) in [
            (&self.funding_pool_token, split.funding_pool_share),
            (&self.token_treasury, split.treasury_share),
        ] {
            if amount == 0 {
                continue;
            }
            mint_to(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    MintTo {
                        mint: self.token_mint.to_account_info(),
                        to: destination.to_account_info(),
                        authority: self.commons.to_account_info(),
                    },
                    signer_seeds,
                ),
                amount,
            )?;
        }

        emit!(HatchCompleted {
            commons: self.commons.key(),
            raised_external: self.commons.raised_external(),
            hatch_supply: split.hatch_supply,
            funding_pool_tokens: split.funding_pool_share,
            treasury_tokens: split.treasury_share,
            timestamp,
        });

        msg!("Hatch complete, curve is open");
        msg!("Funding pool tokens: {}", split.funding_pool_share);
        msg!("Treasury tokens: {}", split.treasury_share);

        Ok(())
    }
}
