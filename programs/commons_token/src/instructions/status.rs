//! Read-only protocol and contributor queries, served as return data.

use anchor_lang::prelude::*;

use crate::state::{Commons, ContributorRecord};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct CommonsStatus {
    pub is_hatched: bool,
    pub raised_external: u64,
    pub total_unlocked_fraction: u32,
    pub hatch_deadline: i64,
    pub total_claimed_internal: u64,
    pub treasury_internal: u64,
    pub contributor_count: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct InitialContribution {
    pub paid_external: u64,
    pub locked_internal: u64,
    pub claimed_internal: u64,
}

#[derive(Accounts)]
pub struct Status<'info> {
    pub commons: Account<'info, Commons>,
}

impl<'info> Status<'info> {
    pub fn hatch_status(&self) -> Result<CommonsStatus> {
        Ok(CommonsStatus {
            is_hatched: self.commons.is_hatched(),
            raised_external: self.commons.raised_external(),
            total_unlocked_fraction: self.commons.total_unlocked_fraction(),
            hatch_deadline: self.commons.hatch_deadline(),
            total_claimed_internal: self.commons.state.total_claimed_internal,
            treasury_internal: self.commons.state.treasury_internal,
            contributor_count: self.commons.state.contributor_count,
        })
    }
}

#[derive(Accounts)]
pub struct ContributorStatus<'info> {
    pub commons: Account<'info, Commons>,

    #[account(has_one = commons)]
    pub contributor_record: Account<'info, ContributorRecord>,
}

impl<'info> ContributorStatus<'info> {
    pub fn initial_contributions(&self) -> Result<InitialContribution> {
        let (paid_external, locked_internal, claimed_internal) =
            self.contributor_record.initial_contribution();
        Ok(InitialContribution {
            paid_external,
            locked_internal,
            claimed_internal,
        })
    }
}
