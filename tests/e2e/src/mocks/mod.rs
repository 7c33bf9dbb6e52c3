//! Fixture data

mod fixtures;

pub use fixtures::{FixtureFactory, QuestionFixture, TagModelFixture};
