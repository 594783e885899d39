// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport security and log hygiene for the Truthlens client.
//!
//! TLS enforcement for the detection service's base URL, a hardened reqwest
//! client, and redaction of bearer tokens and passwords from log output.

pub mod redact;
pub mod tls;

pub use redact::{RedactingWriter, SecretRegistry, redact, register_secret};
pub use tls::{build_secure_client, is_localhost, validate_base_url};
