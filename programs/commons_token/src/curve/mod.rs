//! # Augmented Bonding Curve Module
//!
//! This module implements the **Bancor-style continuous curve** used once the
//! hatch has completed, plus the fixed-point primitives it is built on.
//!
//! ## The Reserve Ratio Invariant
//!
//! The reserve asset held by the protocol is always a constant fraction
//! (`kappa`, the reserve ratio) of the token's market capitalisation:
//!
//! ```text
//!          reserve = kappa × price × supply
//!
//!   price ▲
//!         │                         ╱
//!         │                      ╱
//!         │                  ╱        kappa small => steep curve
//!         │             ╱
//!         │      ╱
//!         │╱
//!         └──────────────────────────▶ supply
//! ```
//!
//! Everything is integer arithmetic on `u128` with 18 decimals (WAD).

pub mod bancor;
pub mod fixed_point;

pub use bancor::*;
pub use fixed_point::*;
