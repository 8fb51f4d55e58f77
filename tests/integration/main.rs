//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! recording mocks.  All tests run on the host with no real hardware
//! required.

mod service_tests;
