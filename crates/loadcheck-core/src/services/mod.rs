//! Core services.
//!
//! Services orchestrate between ports and domain logic. They never know
//! which toolchain or process adapter they are talking to.


pub use loader_test::{BUILD_DIR_NAME, LoaderTestCase, WORKSPACE_PREFIX};
