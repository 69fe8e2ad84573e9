//! Internal test modules - whitebox tests with crate access
//!
//! End-to-end checks of the load, assemble and render pipeline that use
//! crate-private helpers such as the diff line formatter.
