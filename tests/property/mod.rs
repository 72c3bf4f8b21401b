// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! proptest suites over generated component configurations.

mod config_properties;
