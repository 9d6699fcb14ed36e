//! Unit tests for the remote API client.

mod accounts_tests;
mod support;
