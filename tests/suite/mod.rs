//! Integration test suite modules

mod fragment;
mod properties;
mod scenarios;
