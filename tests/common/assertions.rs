//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating lg command output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks for the one-line `lg:` error prefix
pub fn lg_error(message: &str) -> impl Predicate<str> {
    predicates::str::starts_with("lg: ").and(predicates::str::contains(message.to_string()))
}

pub fn already_baselined(path: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("{path} is already baselined"))
}

pub fn outside_root() -> impl Predicate<str> {
    predicates::str::contains("is outside repository")
}

pub fn on_baseline_branch() -> impl Predicate<str> {
    predicates::str::contains("is the baseline branch")
}

pub fn already_initialized() -> impl Predicate<str> {
    predicates::str::contains("metadata already exists")
}
