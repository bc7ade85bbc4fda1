//! Commons Protocol State
//!
//! One `Commons` account exists per deployed curve. It owns the immutable
//! economic parameters and the mutable hatch/curve accounting; every
//! instruction goes through the transition methods defined here.
//!
//! ## Lifecycle
//!
//! ```text
//!   initialize ──▶ Hatch ──(raised == target)──▶ Open
//!                    │                            │
//!                    │ hatch_contribute           │ mint / burn
//!                    │                            │ funds_allocated
//!                    ▼                            ▼
//!            deadline passes: contributions fail with PhaseViolation
//! ```

use anchor_lang::prelude::*;

use crate::curve::{mul_div_floor, BancorCurve, CurveError, PPM, WAD};
use crate::errors::CommonsError;

/// Economic parameters, fixed at deployment
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct CurveParameters {
    /// Reserve ratio (kappa) in parts per million
    pub reserve_ratio: u32,

    /// Share of the hatch supply minted to the funding pool, in ppm
    pub theta: u32,

    /// Initial price used while hatching
    pub p0: u64,

    /// External amount the hatch must raise before trading opens
    pub initial_raise_target: u64,

    /// Fee charged on burns and routed to the funding pool, in ppm
    pub friction_fee: u32,

    /// Seconds after deployment during which contributions are accepted
    pub hatch_duration_seconds: i64,

    /// Smallest contribution accepted during the hatch
    pub minimal_contribution: u64,
}

impl CurveParameters {
    /// Check every parameter bound
    pub fn validate(&self) -> Result<()> {
        require!(
            self.reserve_ratio > 0 && self.reserve_ratio as u128 <= PPM,
            CommonsError::InvalidParameters
        );
        require!(self.theta as u128 <= PPM, CommonsError::InvalidParameters);
        require!(self.friction_fee as u128 <= PPM, CommonsError::InvalidParameters);
        require!(self.p0 > 0, CommonsError::InvalidParameters);
        require!(self.initial_raise_target > 0, CommonsError::InvalidParameters);
        require!(self.hatch_supply() > 0, CommonsError::InvalidParameters);
        require!(
            self.initial_raise_target.checked_mul(self.p0).is_some(),
            CommonsError::InvalidParameters
        );
        require!(self.hatch_duration_seconds > 0, CommonsError::InvalidParameters);
        require!(
            self.minimal_contribution <= self.initial_raise_target,
            CommonsError::InvalidParameters
        );
        Ok(())
    }

    /// Internal supply minted when the hatch completes
    pub fn hatch_supply(&self) -> u64 {
        self.initial_raise_target / self.p0
    }

    /// Internal tokens locked for an external contribution
    pub fn locked_for(&self, external: u64) -> Result<u64> {
        external
            .checked_mul(self.p0)
            .ok_or_else(|| error!(CommonsError::Overflow))
    }
}

/// Protocol phase
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum Phase {
    /// Raising the initial reserve, trading disabled
    #[default]
    Hatch,
    /// Curve trading enabled, terminal
    Open,
}

/// Mutable protocol accounting
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct ProtocolState {
    pub phase: Phase,

    /// Cumulative external amount accepted during the hatch
    pub raised_external: u64,

    /// Sum of every contributor's locked internal tokens
    pub total_locked_internal: u64,

    /// Share of every lock that may be claimed, in ppm
    pub total_unlocked_fraction: u32,

    /// Unix timestamp of deployment
    pub deploy_timestamp: i64,

    /// External units in the reserve vault backing the curve
    pub reserve_balance: u64,

    /// Locked tokens released to contributors so far
    pub total_claimed_internal: u64,

    /// Hatch tokens still held by the token treasury. Claims draw on these
    /// before any new supply is minted.
    pub treasury_internal: u64,

    /// Number of contributor records created
    pub contributor_count: u64,
}

/// Curve instance account
///
/// Seeds: ["commons", authority, reserve_mint]
#[account]
#[derive(InitSpace)]
pub struct Commons {
    /// Deployer
    pub authority: Pubkey,

    /// External reserve asset mint
    pub reserve_mint: Pubkey,

    /// Internal token mint (authority: this account)
    pub token_mint: Pubkey,

    /// Funding pool address, the only reporter of fund utilization
    pub funding_pool: Pubkey,

    pub params: CurveParameters,

    pub state: ProtocolState,

    /// PDA bump seed
    pub bump: u8,
}

/// Outcome of an accepted hatch contribution
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ContributionReceipt {
    /// External amount actually pulled, after capping at the target
    pub accepted: u64,
    /// Internal tokens locked for the contributor
    pub locked: u64,
    /// Present when this contribution completed the hatch
    pub hatch: Option<HatchSplit>,
}

/// Distribution of the hatch supply
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HatchSplit {
    pub hatch_supply: u64,
    pub funding_pool_share: u64,
    pub treasury_share: u64,
}

/// Where a vested claim is paid from
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClaimSplit {
    /// Moved out of the token treasury
    pub from_treasury: u64,
    /// Minted as new supply once the treasury is empty
    pub minted: u64,
}

/// Reserve released by a burn
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BurnReceipt {
    /// Reserve leaving the curve
    pub gross: u64,
    /// Paid to the seller
    pub payout: u64,
    /// Paid to the funding pool
    pub fee: u64,
}

impl Commons {
    pub const SEED: &'static [u8] = b"commons";
    pub const TOKEN_MINT_SEED: &'static [u8] = b"token_mint";

    pub fn new(
        authority: Pubkey,
        reserve_mint: Pubkey,
        token_mint: Pubkey,
        funding_pool: Pubkey,
        params: CurveParameters,
        deploy_timestamp: i64,
        bump: u8,
    ) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            authority,
            reserve_mint,
            token_mint,
            funding_pool,
            params,
            state: ProtocolState {
                deploy_timestamp,
                ..ProtocolState::default()
            },
            bump,
        })
    }

    pub fn hatch_deadline(&self) -> i64 {
        self.state
            .deploy_timestamp
            .saturating_add(self.params.hatch_duration_seconds)
    }

    pub fn is_hatched(&self) -> bool {
        match self.state.phase {
            Phase::Hatch => false,
            Phase::Open => true,
        }
    }

    pub fn raised_external(&self) -> u64 {
        self.state.raised_external
    }

    pub fn total_unlocked_fraction(&self) -> u32 {
        self.state.total_unlocked_fraction
    }

    fn require_hatching(&self, now: i64) -> Result<()> {
        match self.state.phase {
            Phase::Hatch => {
                require!(now <= self.hatch_deadline(), CommonsError::PhaseViolation);
                Ok(())
            }
            Phase::Open => err!(CommonsError::PhaseViolation),
        }
    }

    fn require_open(&self) -> Result<()> {
        match self.state.phase {
            Phase::Hatch => err!(CommonsError::PhaseViolation),
            Phase::Open => Ok(()),
        }
    }

    /// Accept a hatch contribution, capping it at the remaining room.
    ///
    /// Flips the phase to `Open` when the target is reached. Nothing is
    /// written unless every check passes.
    pub fn accept_contribution(&mut self, amount: u64, now: i64) -> Result<ContributionReceipt> {
        self.require_hatching(now)?;
        require!(
            amount >= self.params.minimal_contribution,
            CommonsError::BelowMinimum
        );
        require!(amount > 0, CommonsError::ZeroAmount);

        let target = self.params.initial_raise_target;
        let room = target
            .checked_sub(self.state.raised_external)
            .ok_or(CommonsError::Overflow)?;
        let accepted = amount.min(room);
        let locked = self.params.locked_for(accepted)?;

        let raised = self
            .state
            .raised_external
            .checked_add(accepted)
            .ok_or(CommonsError::Overflow)?;
        let total_locked = self
            .state
            .total_locked_internal
            .checked_add(locked)
            .ok_or(CommonsError::Overflow)?;
        let reserve = self
            .state
            .reserve_balance
            .checked_add(accepted)
            .ok_or(CommonsError::Overflow)?;

        let hatch = if raised == target {
            Some(self.hatch_split()?)
        } else {
            None
        };

        self.state.raised_external = raised;
        self.state.total_locked_internal = total_locked;
        self.state.reserve_balance = reserve;
        if let Some(split) = hatch {
            self.state.phase = Phase::Open;
            self.state.treasury_internal = split.treasury_share;
        }

        Ok(ContributionReceipt {
            accepted,
            locked,
            hatch,
        })
    }

    fn hatch_split(&self) -> Result<HatchSplit> {
        let hatch_supply = self.params.hatch_supply();
        let funding_pool_share = BancorCurve::ppm_share(hatch_supply, self.params.theta)?;

        Ok(HatchSplit {
            hatch_supply,
            funding_pool_share,
            treasury_share: hatch_supply - funding_pool_share,
        })
    }

    pub fn register_contributor(&mut self) -> Result<()> {
        self.state.contributor_count = self
            .state
            .contributor_count
            .checked_add(1)
            .ok_or(CommonsError::Overflow)?;
        Ok(())
    }

    /// Record funds the funding pool has put to use and raise the unlocked
    /// fraction accordingly. Returns the new fraction.
    pub fn record_allocation(&mut self, caller: &Pubkey, amount: u64) -> Result<u32> {
        require_keys_eq!(*caller, self.funding_pool, CommonsError::Unauthorized);
        self.require_open()?;
        require!(amount > 0, CommonsError::ZeroAmount);

        let delta = mul_div_floor(
            amount as u128,
            PPM,
            self.state.total_locked_internal as u128,
        )?;
        let fraction = (self.state.total_unlocked_fraction as u128)
            .saturating_add(delta)
            .min(PPM) as u32;

        self.state.total_unlocked_fraction = fraction;
        Ok(fraction)
    }

    /// Account for a released claim, paying it from the treasury first
    pub fn record_claim(&mut self, amount: u64) -> Result<ClaimSplit> {
        let from_treasury = amount.min(self.state.treasury_internal);
        let split = ClaimSplit {
            from_treasury,
            minted: amount - from_treasury,
        };

        self.state.total_claimed_internal = self
            .state
            .total_claimed_internal
            .checked_add(amount)
            .ok_or(CommonsError::Overflow)?;
        self.state.treasury_internal -= from_treasury;
        Ok(split)
    }

    /// Tokens a deposit would mint at the current curve state
    pub fn quote_mint(&self, deposit: u64, supply: u64) -> Result<u64> {
        self.require_open()?;
        require!(deposit > 0, CommonsError::ZeroAmount);

        let tokens = BancorCurve::purchase_return(
            supply,
            self.state.reserve_balance,
            self.params.reserve_ratio,
            deposit,
        )?;
        require!(tokens > 0, CurveError::NoTokensToMint);
        Ok(tokens)
    }

    /// Reserve a burn would release at the current curve state
    pub fn quote_burn(&self, amount: u64, supply: u64) -> Result<BurnReceipt> {
        self.require_open()?;
        require!(amount > 0, CommonsError::ZeroAmount);

        let gross = BancorCurve::sale_return(
            supply,
            self.state.reserve_balance,
            self.params.reserve_ratio,
            amount,
        )?;
        require!(gross > 0, CurveError::NoReserveToRelease);

        let (payout, fee) = BancorCurve::split_fee(gross, self.params.friction_fee)?;
        Ok(BurnReceipt { gross, payout, fee })
    }

    /// Apply a deposit to the curve, returning the tokens to mint
    pub fn apply_mint(&mut self, deposit: u64, supply: u64, min_tokens_out: u64) -> Result<u64> {
        let tokens = self.quote_mint(deposit, supply)?;
        require!(tokens >= min_tokens_out, CommonsError::SlippageExceeded);

        self.state.reserve_balance = self
            .state
            .reserve_balance
            .checked_add(deposit)
            .ok_or(CommonsError::Overflow)?;
        Ok(tokens)
    }

    /// Apply a burn to the curve. `balance` is the seller's token balance;
    /// `min_external_out` bounds the payout net of the fee.
    pub fn apply_burn(
        &mut self,
        amount: u64,
        supply: u64,
        balance: u64,
        min_external_out: u64,
    ) -> Result<BurnReceipt> {
        self.require_open()?;
        require!(balance >= amount, CommonsError::InsufficientBalance);

        let receipt = self.quote_burn(amount, supply)?;
        require!(
            receipt.payout >= min_external_out,
            CommonsError::SlippageExceeded
        );

        self.state.reserve_balance = self
            .state
            .reserve_balance
            .checked_sub(receipt.gross)
            .ok_or(CommonsError::Overflow)?;
        Ok(receipt)
    }

    /// Marginal price, WAD-scaled. Fixed at `p0` while hatching.
    pub fn spot_price(&self, supply: u64) -> Result<u128> {
        match self.state.phase {
            Phase::Hatch => Ok((self.params.p0 as u128) * WAD),
            Phase::Open => BancorCurve::spot_price(
                supply,
                self.state.reserve_balance,
                self.params.reserve_ratio,
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ContributorRecord;

    const DEPLOYED_AT: i64 = 1_700_000_000;

    fn params() -> CurveParameters {
        CurveParameters {
            reserve_ratio: 142_857,
            theta: 350_000,
            p0: 1,
            initial_raise_target: 300_000,
            friction_fee: 20_000,
            hatch_duration_seconds: 3_600,
            minimal_contribution: 100,
        }
    }

    fn commons_with(params: CurveParameters) -> Commons {
        Commons::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            params,
            DEPLOYED_AT,
            254,
        )
        .unwrap()
    }

    fn commons() -> Commons {
        commons_with(params())
    }

    /// Drive the hatch to completion with one contribution
    fn hatched() -> Commons {
        let mut commons = commons();
        commons.accept_contribution(300_000, DEPLOYED_AT).unwrap();
        commons
    }

    #[test]
    fn test_new_starts_in_hatch() {
        let commons = commons();
        assert!(!commons.is_hatched());
        assert_eq!(commons.raised_external(), 0);
        assert_eq!(commons.total_unlocked_fraction(), 0);
        assert_eq!(commons.state.total_locked_internal, 0);
        assert_eq!(commons.state.reserve_balance, 0);
        assert_eq!(commons.hatch_deadline(), DEPLOYED_AT + 3_600);
    }

    #[test]
    fn test_parameter_validation() {
        let invalid = [
            CurveParameters { reserve_ratio: 0, ..params() },
            CurveParameters { reserve_ratio: 1_000_001, ..params() },
            CurveParameters { theta: 1_000_001, ..params() },
            CurveParameters { friction_fee: 1_000_001, ..params() },
            CurveParameters { p0: 0, ..params() },
            CurveParameters { p0: 300_001, ..params() },
            CurveParameters { initial_raise_target: 0, ..params() },
            CurveParameters { p0: u64::MAX / 2, initial_raise_target: u64::MAX, ..params() },
            CurveParameters { hatch_duration_seconds: 0, ..params() },
            CurveParameters { minimal_contribution: 300_001, ..params() },
        ];
        for candidate in invalid {
            assert_eq!(
                candidate.validate().unwrap_err(),
                CommonsError::InvalidParameters.into()
            );
        }

        let boundary = CurveParameters {
            reserve_ratio: 1_000_000,
            theta: 1_000_000,
            friction_fee: 1_000_000,
            ..params()
        };
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_contribution_below_target() {
        let mut commons = commons();
        let receipt = commons.accept_contribution(200, DEPLOYED_AT + 10).unwrap();

        assert_eq!(receipt.accepted, 200);
        assert_eq!(receipt.locked, 200);
        assert!(receipt.hatch.is_none());
        assert_eq!(commons.raised_external(), 200);
        assert_eq!(commons.state.total_locked_internal, 200);
        assert_eq!(commons.state.reserve_balance, 200);
        assert!(!commons.is_hatched());
    }

    #[test]
    fn test_contribution_below_minimum() {
        let mut commons = commons();
        let before = commons.state;

        assert_eq!(
            commons.accept_contribution(99, DEPLOYED_AT).unwrap_err(),
            CommonsError::BelowMinimum.into()
        );
        assert_eq!(commons.state, before);
    }

    #[test]
    fn test_zero_contribution_without_minimum() {
        let mut commons = commons_with(CurveParameters { minimal_contribution: 0, ..params() });
        assert_eq!(
            commons.accept_contribution(0, DEPLOYED_AT).unwrap_err(),
            CommonsError::ZeroAmount.into()
        );
    }

    #[test]
    fn test_contribution_after_deadline() {
        let mut commons = commons();

        // The deadline itself is still inside the hatch
        commons.accept_contribution(100, DEPLOYED_AT + 3_600).unwrap();

        let before = commons.state;
        assert_eq!(
            commons.accept_contribution(100, DEPLOYED_AT + 3_601).unwrap_err(),
            CommonsError::PhaseViolation.into()
        );
        assert_eq!(commons.state, before);
    }

    #[test]
    fn test_spillover_caps_at_target_and_opens() {
        let mut commons = commons();
        let receipt = commons.accept_contribution(400_000, DEPLOYED_AT).unwrap();

        assert_eq!(receipt.accepted, 300_000);
        assert_eq!(receipt.locked, 300_000);
        assert_eq!(commons.raised_external(), 300_000);
        assert!(commons.is_hatched());
        assert_eq!(
            receipt.hatch,
            Some(HatchSplit {
                hatch_supply: 300_000,
                funding_pool_share: 105_000,
                treasury_share: 195_000,
            })
        );
        assert_eq!(commons.state.reserve_balance, 300_000);
    }

    #[test]
    fn test_late_contribution_fills_remaining_room() {
        let mut commons = commons();
        commons.accept_contribution(299_950, DEPLOYED_AT).unwrap();

        // Smaller than the minimum would be rejected, but any request at or
        // above it is truncated to the 50 units left
        let receipt = commons.accept_contribution(1_000, DEPLOYED_AT).unwrap();
        assert_eq!(receipt.accepted, 50);
        assert!(receipt.hatch.is_some());
        assert_eq!(commons.raised_external(), 300_000);
    }

    #[test]
    fn test_hatch_split_conserves_supply() {
        for theta in [0u32, 1, 333_333, 350_000, 999_999, 1_000_000] {
            let mut commons = commons_with(CurveParameters {
                theta,
                initial_raise_target: 299_999,
                ..params()
            });
            let split = commons
                .accept_contribution(299_999, DEPLOYED_AT)
                .unwrap()
                .hatch
                .unwrap();
            assert_eq!(split.funding_pool_share + split.treasury_share, split.hatch_supply);
        }
    }

    #[test]
    fn test_phase_is_irreversible() {
        let mut commons = hatched();
        assert!(commons.is_hatched());

        let before = commons.state;
        assert_eq!(
            commons.accept_contribution(1_000, DEPLOYED_AT).unwrap_err(),
            CommonsError::PhaseViolation.into()
        );
        assert_eq!(commons.state, before);
        assert!(commons.is_hatched());
    }

    #[test]
    fn test_raised_never_exceeds_target_and_matches_contributors() {
        let mut commons = commons();
        let mut records = vec![ContributorRecord::default(); 4];
        let requests = [50_000u64, 120_000, 90_000, 75_000];

        for (record, amount) in records.iter_mut().zip(requests) {
            if commons.is_hatched() {
                break;
            }
            let receipt = commons.accept_contribution(amount, DEPLOYED_AT).unwrap();
            record.record_contribution(receipt.accepted, receipt.locked).unwrap();
            assert!(commons.raised_external() <= commons.params.initial_raise_target);
        }

        let paid: u64 = records.iter().map(|r| r.paid_external).sum();
        let locked: u64 = records.iter().map(|r| r.locked_internal).sum();
        assert_eq!(paid, commons.raised_external());
        assert_eq!(locked, commons.state.total_locked_internal);
        assert!(commons.is_hatched());
        // Last request was truncated from 75000 to 40000
        assert_eq!(records[3].paid_external, 40_000);
    }

    #[test]
    fn test_allocation_requires_funding_pool() {
        let mut commons = hatched();
        let before = commons.state;

        assert_eq!(
            commons
                .record_allocation(&Pubkey::new_unique(), 1_000)
                .unwrap_err(),
            CommonsError::Unauthorized.into()
        );
        assert_eq!(commons.state, before);
    }

    #[test]
    fn test_allocation_requires_open_phase() {
        let mut commons = commons();
        let pool = commons.funding_pool;
        commons.accept_contribution(1_000, DEPLOYED_AT).unwrap();

        assert_eq!(
            commons.record_allocation(&pool, 1_000).unwrap_err(),
            CommonsError::PhaseViolation.into()
        );
    }

    #[test]
    fn test_allocation_raises_fraction_up_to_cap() {
        let mut commons = hatched();
        let pool = commons.funding_pool;

        // 30000 / 300000 = 10%
        assert_eq!(commons.record_allocation(&pool, 30_000).unwrap(), 100_000);
        // rounding truncates: 1 / 300000 ppm = 3.33
        assert_eq!(commons.record_allocation(&pool, 1).unwrap(), 100_003);

        let mut previous = commons.total_unlocked_fraction();
        for _ in 0..12 {
            let fraction = commons.record_allocation(&pool, 45_000).unwrap();
            assert!(fraction >= previous);
            assert!(fraction <= 1_000_000);
            previous = fraction;
        }
        assert_eq!(commons.total_unlocked_fraction(), 1_000_000);
    }

    #[test]
    fn test_claims_drain_treasury_before_minting() {
        let mut commons = hatched();
        assert_eq!(commons.state.treasury_internal, 195_000);

        let first = commons.record_claim(150_000).unwrap();
        assert_eq!(first, ClaimSplit { from_treasury: 150_000, minted: 0 });
        assert_eq!(commons.state.treasury_internal, 45_000);

        let second = commons.record_claim(150_000).unwrap();
        assert_eq!(second, ClaimSplit { from_treasury: 45_000, minted: 105_000 });
        assert_eq!(commons.state.treasury_internal, 0);
        assert_eq!(commons.state.total_claimed_internal, 300_000);

        let third = commons.record_claim(10).unwrap();
        assert_eq!(third, ClaimSplit { from_treasury: 0, minted: 10 });
    }

    #[test]
    fn test_full_vesting_reuses_hatch_supply() {
        let mut commons = commons();
        let mut records = vec![ContributorRecord::default(); 3];
        let mut hatch_supply = 0;

        for (record, amount) in records.iter_mut().zip([100_000u64, 120_000, 80_000]) {
            let receipt = commons.accept_contribution(amount, DEPLOYED_AT).unwrap();
            record.record_contribution(receipt.accepted, receipt.locked).unwrap();
            if let Some(split) = receipt.hatch {
                hatch_supply = split.hatch_supply;
            }
        }
        assert!(commons.is_hatched());

        let pool = commons.funding_pool;
        commons.record_allocation(&pool, 300_000).unwrap();
        let fraction = commons.total_unlocked_fraction();

        let mut minted_by_claims = 0;
        for record in records.iter_mut() {
            let amount = record.record_claim(fraction).unwrap();
            minted_by_claims += commons.record_claim(amount).unwrap().minted;
        }

        let total_locked = commons.state.total_locked_internal;
        let treasury_share = hatch_supply - 105_000;
        assert_eq!(commons.state.total_claimed_internal, total_locked);
        assert_eq!(commons.state.treasury_internal, 0);
        // Only the part of the locks the treasury could not cover is new supply
        assert_eq!(minted_by_claims, total_locked - treasury_share);
        assert_eq!(hatch_supply + minted_by_claims, 405_000);
    }

    #[test]
    fn test_trading_requires_open_phase() {
        let mut commons = commons();
        commons.accept_contribution(1_000, DEPLOYED_AT).unwrap();

        assert_eq!(
            commons.apply_burn(10, 1_000, 1_000, 0).unwrap_err(),
            CommonsError::PhaseViolation.into()
        );
        assert_eq!(
            commons.apply_mint(10, 1_000, 0).unwrap_err(),
            CommonsError::PhaseViolation.into()
        );
    }

    #[test]
    fn test_mint_grows_reserve() {
        let mut commons = hatched();
        let tokens = commons.apply_mint(300_000, 300_000, 0).unwrap();

        assert!((31_200..=31_250).contains(&tokens));
        assert_eq!(commons.state.reserve_balance, 600_000);
    }

    #[test]
    fn test_dust_mint_is_rejected() {
        let mut commons = hatched();
        let before = commons.state;

        assert_eq!(
            commons.apply_mint(1, 10, 0).unwrap_err(),
            CurveError::NoTokensToMint.into()
        );
        assert_eq!(commons.state, before);
    }

    #[test]
    fn test_burn_splits_friction_fee() {
        let mut commons = hatched();
        let receipt = commons.apply_burn(30_000, 300_000, 30_000, 0).unwrap();

        assert_eq!(receipt.payout + receipt.fee, receipt.gross);
        assert_eq!(receipt.fee, receipt.gross * 20_000 / 1_000_000);
        assert_eq!(commons.state.reserve_balance, 300_000 - receipt.gross);
    }

    #[test]
    fn test_burn_requires_balance() {
        let mut commons = hatched();
        let before = commons.state;

        assert_eq!(
            commons.apply_burn(500, 300_000, 499, 0).unwrap_err(),
            CommonsError::InsufficientBalance.into()
        );
        assert_eq!(commons.state, before);
    }

    #[test]
    fn test_trades_respect_minimum_output() {
        let mut commons = hatched();
        let before = commons.state;

        let quoted = commons.quote_mint(300_000, 300_000).unwrap();
        assert_eq!(
            commons.apply_mint(300_000, 300_000, quoted + 1).unwrap_err(),
            CommonsError::SlippageExceeded.into()
        );
        assert_eq!(commons.state, before);
        assert_eq!(commons.apply_mint(300_000, 300_000, quoted).unwrap(), quoted);

        let supply = 300_000 + quoted;
        let payout = commons.quote_burn(30_000, supply).unwrap().payout;
        let before = commons.state;
        assert_eq!(
            commons
                .apply_burn(30_000, supply, 30_000, payout + 1)
                .unwrap_err(),
            CommonsError::SlippageExceeded.into()
        );
        assert_eq!(commons.state, before);
        assert_eq!(
            commons.apply_burn(30_000, supply, 30_000, payout).unwrap().payout,
            payout
        );
    }

    #[test]
    fn test_contributor_count() {
        let mut commons = commons();
        commons.register_contributor().unwrap();
        commons.register_contributor().unwrap();
        assert_eq!(commons.state.contributor_count, 2);
    }

    #[test]
    fn test_spot_price_by_phase() {
        let mut commons = commons_with(CurveParameters { p0: 3, ..params() });
        assert_eq!(commons.spot_price(0).unwrap(), 3 * WAD);

        commons.accept_contribution(300_000, DEPLOYED_AT).unwrap();
        let open_price = commons.spot_price(100_000).unwrap();
        assert_eq!(open_price, BancorCurve::spot_price(100_000, 300_000, 142_857).unwrap());
    }
}
