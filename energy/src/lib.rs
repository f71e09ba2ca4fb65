//! Energy contributions.
//!
//! An [`EnergyContribution`] is a view over an energy-contribution
//! transaction. Validators decide which contributions are eligible for
//! minting; rejected contributions are dropped, not reported as errors.

pub mod contribution;
pub mod validator;

pub use contribution::EnergyContribution;
pub use validator::{EnergyValidator, Rejection, RuleValidator};
