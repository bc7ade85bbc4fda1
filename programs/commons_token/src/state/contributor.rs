//! Hatch Contributor Records
//!
//! Each address that contributes during the hatch gets one record. It is
//! never closed, so the full contribution history stays on-chain.
//!
//! ## Vesting
//!
//! ```text
//! entitlement = locked_internal × total_unlocked_fraction / 1_000_000
//! claimable   = entitlement - claimed_internal
//! ```

use anchor_lang::prelude::*;

use crate::curve::{mul_div_floor, PPM};
use crate::errors::CommonsError;

/// Per-contributor hatch ledger
///
/// Seeds: ["contributor", commons, contributor]
#[account]
#[derive(InitSpace, Default)]
pub struct ContributorRecord {
    /// Curve instance this record belongs to
    pub commons: Pubkey,

    /// Contributor wallet
    pub contributor: Pubkey,

    /// External units contributed
    pub paid_external: u64,

    /// Internal tokens allocated but not yet transferable
    pub locked_internal: u64,

    /// Internal tokens already released
    pub claimed_internal: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl ContributorRecord {
    pub const SEED: &'static [u8] = b"contributor";

    /// True until the first contribution has been recorded
    pub fn is_new(&self) -> bool {
        self.contributor == Pubkey::default()
    }

    pub fn open(&mut self, commons: Pubkey, contributor: Pubkey, bump: u8) {
        self.commons = commons;
        self.contributor = contributor;
        self.bump = bump;
    }

    pub fn record_contribution(&mut self, accepted: u64, locked: u64) -> Result<()> {
        let paid = self
            .paid_external
            .checked_add(accepted)
            .ok_or(CommonsError::Overflow)?;
        let locked = self
            .locked_internal
            .checked_add(locked)
            .ok_or(CommonsError::Overflow)?;

        self.paid_external = paid;
        self.locked_internal = locked;
        Ok(())
    }

    pub fn entitlement(&self, unlocked_fraction: u32) -> Result<u64> {
        let entitled = mul_div_floor(
            self.locked_internal as u128,
            (unlocked_fraction as u128).min(PPM),
            PPM,
        )?;
        Ok(entitled as u64)
    }

    pub fn claimable(&self, unlocked_fraction: u32) -> Result<u64> {
        Ok(self
            .entitlement(unlocked_fraction)?
            .saturating_sub(self.claimed_internal))
    }

    /// Mark the currently unlocked share as claimed and return its size
    pub fn record_claim(&mut self, unlocked_fraction: u32) -> Result<u64> {
        let claimable = self.claimable(unlocked_fraction)?;
        require!(claimable > 0, CommonsError::NothingToClaim);

        self.claimed_internal = self
            .claimed_internal
            .checked_add(claimable)
            .ok_or(CommonsError::Overflow)?;
        Ok(claimable)
    }

    /// `(paid_external, locked_internal, claimed_internal)`
    pub fn initial_contribution(&self) -> (u64, u64, u64) {
        (self.paid_external, self.locked_internal, self.claimed_internal)
    }
}
