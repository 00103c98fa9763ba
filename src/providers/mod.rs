// Providers layer - Work performers
//
// Providers hold the decision logic coordinators compose: token issuance
// and the mapping from directory outcomes to results.

pub mod outcome_mapper;
pub mod token_provider;

pub use token_provider::TokenProvider;
