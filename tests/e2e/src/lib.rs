//! End-to-end test support for StackSearch
//!
//! - [`harness`]: temporary artifact directories loaded through the real loaders
//! - [`mocks`]: fixture corpora, word vectors and tag models

pub mod harness;
pub mod mocks;

pub use harness::TestArtifactDir;
pub use mocks::{FixtureFactory, QuestionFixture};
