// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod build;
pub mod social;

pub use build::build_command;
pub use social::social_command;
