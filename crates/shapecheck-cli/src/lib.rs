//! Command-line front end of the shapecheck analysis.

pub mod args;
pub mod config;
pub mod dot;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/dot_tests.rs"]
mod dot_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
#[cfg(test)]
#[path = "tests/test_support.rs"]
mod test_support;
#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
