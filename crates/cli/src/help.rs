// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let color = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = color(colors::codes::HEADER);
    let context = color(colors::codes::CONTEXT);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(color(colors::codes::LITERAL))
        .placeholder(context)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_queue}
  {queue}       Queue a mutation for delivery
  {pending}     List queued actions
  {failed}      List actions past their retry ceiling
  {retry}       Grant a failed action more attempts
  {discard}     Drop a queued action

{header_sync}
  {sync}        Drain the queue now
  {status}      Show connectivity and sync state
  {online}      Mark the host online
  {offline}     Mark the host offline
  {auto_sync}   Start or stop periodic syncing
  {token}       Set or clear the API token

{header_host}
  {host}        Manage the ordod sync host
  {completion}  Generate shell completions
",
        header_queue = colors::header("Offline Queue:"),
        header_sync = colors::header("Sync:"),
        header_host = colors::header("Host:"),
        queue = colors::literal("queue"),
        pending = colors::literal("pending"),
        failed = colors::literal("failed"),
        retry = colors::literal("retry"),
        discard = colors::literal("discard"),
        sync = colors::literal("sync"),
        status = colors::literal("status"),
        online = colors::literal("online"),
        offline = colors::literal("offline"),
        auto_sync = colors::literal("auto-sync"),
        token = colors::literal("token"),
        host = colors::literal("host"),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  ordo offline                                    Work without the network
  ordo queue create /tasks -e task -d '{\"title\":\"X\"}'  Queue a task creation
  ordo pending                                    See what is waiting
  ordo online                                     Reconnect and sync",
    )
}
