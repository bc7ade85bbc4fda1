//! Curve Trading
//!
//! Once the hatch is complete, anyone can mint tokens by depositing the
//! reserve asset, or burn tokens to withdraw it. Burns pay a friction fee to
//! the funding pool.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TokenInterface,
        TransferChecked,
    },
};

use crate::errors::CommonsError;
use crate::state::Commons;

/// Event emitted when tokens are minted against the curve
#[event]
pub struct TokensMinted {
    pub commons: Pubkey,
    pub buyer: Pubkey,
    pub external_in: u64,
    pub tokens_out: u64,
}

/// Event emitted when tokens are burned against the curve
#[event]
pub struct TokensBurned {
    pub commons: Pubkey,
    pub seller: Pubkey,
    pub tokens_in: u64,
    pub external_out: u64,
    pub fee: u64,
}

/// Accounts for trading operations
#[derive(Accounts)]
pub struct Trade<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        mut,
        seeds = [Commons::SEED, commons.authority.as_ref(), commons.reserve_mint.as_ref()],
        bump = commons.bump,
        has_one = reserve_mint,
        has_one = token_mint,
        has_one = funding_pool @ CommonsError::Unauthorized,
    )]
    pub commons: Box<Account<'info, Commons>>,

    pub reserve_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub token_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Trader's reserve asset account
    #[account(
        mut,
        associated_token::mint = reserve_mint,
        associated_token::authority = trader,
    )]
    pub trader_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Trader's internal token account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = token_mint,
        associated_token::authority = trader,
    )]
    pub trader_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = reserve_mint,
        associated_token::authority = commons,
    )]
    pub reserve_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Matched against `commons.funding_pool`
    pub funding_pool: UncheckedAccount<'info>,

    /// Receives the friction fee
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = reserve_mint,
        associated_token::authority = funding_pool,
    )]
    pub funding_pool_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Trade<'info> {
    /// Deposit `external_amount_in` reserve and mint tokens along the curve
    pub fn mint_tokens(&mut self, external_amount_in: u64, min_tokens_out: u64) -> Result<u64> {
        let tokens_out = self.commons.apply_mint(
            external_amount_in,
            self.token_mint.supply,
            min_tokens_out,
        )?;
        require!(
            self.trader_reserve.amount >= external_amount_in,
            CommonsError::TransferFailed
        );

        self.commons.exit(&crate::ID)?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.trader_reserve.to_account_info(),
                    mint: self.reserve_mint.to_account_info(),
                    to: self.reserve_vault.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            external_amount_in,
            self.reserve_mint.decimals,
        )
        .map_err(|_| error!(CommonsError::TransferFailed))?;

        let authority = self.commons.authority;
        let reserve_mint = self.commons.reserve_mint;
        let bump = [self.commons.bump];
        let commons_seeds: &[&[u8]] = &[Commons::SEED, authority.as_ref(), reserve_mint.as_ref(), &bump];
        let signer_seeds = &[commons_seeds];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.token_mint.to_account_info(),
                    to: self.trader_token.to_account_info(),
                    authority: self.commons.to_account_info(),
                },
                signer_seeds,
            ),
            tokens_out,
        )?;

        emit!(TokensMinted {
            commons: self.commons.key(),
            buyer: self.trader.key(),
            external_in: external_amount_in,
            tokens_out,
        });

        Ok(tokens_out)
    }

    /// Burn `token_amount_in` tokens and withdraw reserve along the curve.
    /// Returns the reserve paid to the trader, net of the friction fee.
    pub fn burn_tokens(&mut self, token_amount_in: u64, min_external_out: u64) -> Result<u64> {
        let receipt = self.commons.apply_burn(
            token_amount_in,
            self.token_mint.supply,
            self.trader_token.amount,
            min_external_out,
        )?;

        self.commons.exit(&crate::ID)?;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.token_mint.to_account_info(),
                    from: self.trader_token.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            token_amount_in,
        )?;

        let authority = self.commons.authority;
        let reserve_mint = self.commons.reserve_mint;
        let bump = [self.commons.bump];
        let commons_seeds: &[&[u8]] = &[Commons::SEED, authority.as_ref(), reserve_mint.as_ref(), &bump];
        let signer_seeds = &[commons_seeds];

        for (destination, amount) in [
            (&self.trader_reserve, receipt.payout),
            (&self.funding_pool_reserve, receipt.fee),
        ] {
            if amount == 0 {
                continue;
            }
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.reserve_vault.to_account_info(),
                        mint: self.reserve_mint.to_account_info(),
                        to: destination.to_account_info(),
                        authority: self.commons.to_account_info(),
                    },
                    signer_seeds,
                ),
                amount,
                self.reserve_mint.decimals,
            )
            .map_err(|_| error!(CommonsError::TransferFailed))?;
        }

        emit!(TokensBurned {
            commons: self.commons.key(),
            seller: self.trader.key(),
            tokens_in: token_amount_in,
            external_out: receipt.payout,
            fee: receipt.fee,
        });

        Ok(receipt.payout)
    }
}

#[derive(Accounts)]
pub struct Quote<'info> {
    #[account(has_one = token_mint)]
    pub commons: Account<'info, Commons>,

    pub token_mint: InterfaceAccount<'info, Mint>,
}

impl<'info> Quote<'info> {
    pub fn quote_mint(&self, external_amount_in: u64) -> Result<u64> {
        self.commons
            .quote_mint(external_amount_in, self.token_mint.supply)
    }

    pub fn quote_burn(&self, token_amount_in: u64) -> Result<u64> {
        let receipt = self
            .commons
            .quote_burn(token_amount_in, self.token_mint.supply)?;
        Ok(receipt.payout)
    }

    pub fn spot_price(&self) -> Result<u128> {
        self.commons.spot_price(self.token_mint.supply)
    }
}
