//! Testing utilities and harness for pagerkit

pub mod fake_factory;
pub mod fake_host;
pub mod testing;

pub use fake_factory::{ContentId, ContentRegistry, FakePageFactory, FakeState, LivePage, SharedRegistry};
pub use fake_host::{FakeHost, HostCommand, HostState, Snapshot};
pub use testing::*;

pub mod prelude {
    pub use crate::fake_factory::{ContentId, FakePageFactory, FakeState};
    pub use crate::fake_host::{FakeHost, HostCommand, Snapshot};
    pub use crate::testing::*;
}
