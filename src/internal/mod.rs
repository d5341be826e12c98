//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod dispose_bag;
pub(crate) mod in_flight;

pub(crate) use circular::ResolutionGuard;
pub(crate) use dispose_bag::DisposeBag;
pub(crate) use in_flight::InFlight;
