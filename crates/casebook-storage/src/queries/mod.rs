// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the inquiry aggregate and its taxonomy.

pub mod inquiries;
pub mod taxonomy;
