//! Funding Pool Allocation Reports
//!
//! The funding pool reports how much of the raise it has put to real-world
//! use. That share of every contributor lock becomes claimable, independent
//! of elapsed time.

use anchor_lang::prelude::*;

use crate::state::Commons;

/// Event emitted when an allocation report is processed
#[event]
pub struct AllocationReported {
    pub commons: Pubkey,
    pub amount: u64,
    pub total_unlocked_fraction: u32,
}

#[derive(Accounts)]
pub struct ReportAllocation<'info> {
    /// Funding pool, checked against `commons.funding_pool`
    pub funding_pool: Signer<'info>,

    #[account(
        mut,
        seeds = [Commons::SEED, commons.authority.as_ref(), commons.reserve_mint.as_ref()],
        bump = commons.bump,
    )]
    pub commons: Account<'info, Commons>,
}

impl<'info> ReportAllocation<'info> {
    pub fn funds_allocated(&mut self, amount: u64) -> Result<()> {
        let fraction = self
            .commons
            .record_allocation(&self.funding_pool.key(), amount)?;

        emit!(AllocationReported {
            commons: self.commons.key(),
            amount,
            total_unlocked_fraction: fraction,
        });

        msg!("Funds allocated: {}, unlocked {} ppm", amount, fraction);

        Ok(())
    }
}
