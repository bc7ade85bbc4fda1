use anchor_lang::prelude::*;

#[error_code]
pub enum CommonsError {
    #[msg("Operation not allowed in the current phase")]
    PhaseViolation,
    #[msg("Contribution is below the minimal contribution")]
    BelowMinimum,
    #[msg("Reserve asset transfer failed")]
    TransferFailed,
    #[msg("Only the funding pool can perform this action")]
    Unauthorized,
    #[msg("Insufficient balance")]
    InsufficientBalance,
    #[msg("Nothing to claim")]
    NothingToClaim,
    #[msg("Invalid curve parameters")]
    InvalidParameters,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Numerical overflow occurred")]
    Overflow,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
}
