//! Document lifecycle: ports and the upload poll loop

pub mod poller;
pub mod ports;

pub use poller::{poll_until_terminal, PollOutcome, PollState};
pub use ports::DocumentSource;
