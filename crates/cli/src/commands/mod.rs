// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations.
//!
//! Queue and sync commands run against a [`BridgeClient`](crate::host::BridgeClient)
//! so they can be exercised against a fake host. Host commands take the data
//! directory directly.

pub mod host;
pub mod queue;
pub mod sync;

use serde::Serialize;

use crate::error::Result;

/// Print a value as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
