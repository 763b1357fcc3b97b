// ABOUTME: Shared helper modules for integration tests
// ABOUTME: Currently the in-process axum request driver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

pub mod axum_test;
