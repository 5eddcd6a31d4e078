//! Integration test modules.

mod accessor_test;
mod postgres_test;
