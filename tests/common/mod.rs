//! Consolidated test utilities for lg
//!
//! This module provides unified testing utilities for integration tests,
//! driving the real `lg` binary against temporary git repositories.

pub mod assertions;
pub mod fixtures;
pub mod repository;
