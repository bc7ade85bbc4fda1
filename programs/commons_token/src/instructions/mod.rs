//! Instruction handlers for the commons token protocol
//!
//! - `initialize` - Deploy a curve and its internal mint
//! - `hatch` - Contribute reserve during the hatch phase
//! - `allocation` - Funding pool reports utilized funds
//! - `claim` - Release vested hatch tokens
//! - `trade` - Mint/burn against the open curve, plus quotes
//! - `status` - Hatch progress and contributor ledger queries

pub mod allocation;
pub mod claim;
pub mod hatch;
pub mod initialize;
pub mod status;
pub mod trade;

pub use allocation::*;
pub use claim::*;
pub use hatch::*;
pub use initialize::*;
pub use status::*;
pub use trade::*;
