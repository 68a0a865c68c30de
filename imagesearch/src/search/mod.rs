//! Search coordination.
//!
//! Every change of the search term becomes a [`SearchRequest`] stamped with
//! a new [`Generation`](crate::stamp::Generation). Outcomes come back as
//! [`SearchOutcome`]s in any order; the [`SearchCoordinator`] applies only
//! the one carrying the latest generation.

mod coordinator;
mod request;

pub use coordinator::SearchCoordinator;
pub use request::{SearchOutcome, SearchRequest, SearchResolution};
