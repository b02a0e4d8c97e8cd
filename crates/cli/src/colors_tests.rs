// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fg256_produces_escape_sequence() {
    assert_eq!(fg256(0), "\x1b[38;5;0m");
    assert_eq!(fg256(74), "\x1b[38;5;74m");
    assert_eq!(fg256(250), "\x1b[38;5;250m");
}

#[test]
fn reset_sequence_is_correct() {
    assert_eq!(RESET, "\x1b[0m");
}

// Test binaries do not run on a TTY, so unless COLOR=1 is exported the
// helpers pass text through untouched.
#[test]
fn plain_output_without_tty() {
    if should_colorize() {
        return;
    }
    assert_eq!(header("Queue:"), "Queue:");
    assert_eq!(literal("sync"), "sync");
    let block = "Examples:\n  ordo sync    Drain the queue";
    assert_eq!(examples(block), block);
}
