pub mod lifecycle_tests;
pub mod publish_tests;
pub mod support;
