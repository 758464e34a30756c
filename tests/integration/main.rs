//! Integration tests for the umidedup binary.
//!
//! These tests run the `umidedup` executable end to end against temporary files.

mod helpers;
mod test_correct_command;
mod test_error_paths;
