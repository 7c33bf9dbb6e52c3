//! Test harness

mod artifact_dir;

pub use artifact_dir::TestArtifactDir;
