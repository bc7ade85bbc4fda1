//! Vested Token Claims
//!
//! Pull-based release of locked hatch tokens. A contributor can claim up to
//! `locked × unlocked_fraction` in total. Claims are paid out of the hatch
//! tokens held by the token treasury; once it is empty the remainder is
//! minted.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::state::{Commons, ContributorRecord};

/// Event emitted when locked tokens are released
#[event]
pub struct FundsClaimed {
    pub commons: Pubkey,
    pub contributor: Pubkey,
    pub amount: u64,
    pub from_treasury: u64,
    pub minted: u64,
}

#[derive(Accounts)]
pub struct ClaimFunds<'info> {
    #[account(mut)]
    pub contributor: Signer<'info>,

    #[account(
        mut,
        seeds = [Commons::SEED, commons.authority.as_ref(), commons.reserve_mint.as_ref()],
        bump = commons.bump,
        has_one = token_mint,
    )]
    pub commons: Box<Account<'info, Commons>>,

    #[account(
        mut,
        seeds = [ContributorRecord::SEED, commons.key().as_ref(), contributor.key().as_ref()],
        bump = contributor_record.bump,
        has_one = commons,
        has_one = contributor,
    )]
    pub contributor_record: Box<Account<'info, ContributorRecord>>,

    #[account(mut)]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = commons,
    )]
    pub token_treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = contributor,
        associated_token::mint = token_mint,
        associated_token::authority = contributor,
    )]
    pub contributor_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> ClaimFunds<'info> {
    pub fn claim_funds(&mut self) -> Result<()> {
        let fraction = self.commons.total_unlocked_fraction();
        let amount = self.contributor_record.record_claim(fraction)?;
        let split = self.commons.record_claim(amount)?;

        self.commons.exit(&crate::ID)?;
        self.contributor_record.exit(&crate::ID)?;

        let authority = self.commons.authority;
        let reserve_mint = self.commons.reserve_mint;
        let bump = [self.commons.bump];
        let commons_seeds: &[&[u8]] = &[Commons::SEED, authority.as_ref(), reserve_mint.as_ref(), &bump];
        let signer_seeds = &[commons_seeds];

        if split.from_treasury > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.token_treasury.to_account_info(),
                        mint: self.token_mint.to_account_info(),
                        to: self.contributor_token.to_account_info(),
                        authority: self.commons.to_account_info(),
                    },
                    signer_seeds,
                ),
                split.from_treasury,
                self.token_mint.decimals,
            )?;
        }

        if split.minted > 0 {
            mint_to(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    MintTo {
                        mint: self.token_mint.to_account_info(),
                        to: self.contributor_token.to_account_info(),
                        authority: self.commons.to_account_info(),
                    },
                    signer_seeds,
                ),
                split.minted,
            )?;
        }

        emit!(FundsClaimed {
            commons: self.commons.key(),
            contributor: self.contributor.key(),
            amount,
            from_treasury: split.from_treasury,
            minted: split.minted,
        });

        msg!(
            "Claimed {} ({} of {} locked)",
            amount,
            self.contributor_record.claimed_internal,
            self.contributor_record.locked_internal
        );

        Ok(())
    }
}
