//! Builders for test fixtures

mod test_files;

pub use test_files::TestFileBuilder;
