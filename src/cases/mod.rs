//! Saved cases: computed results plus the request that produced them

mod store;

pub use store::{Case, CaseStore, CaseSummary};
