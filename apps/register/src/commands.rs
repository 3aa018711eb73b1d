use anyhow::{bail, Result};
use client_core::FlowEvent;
use shared::domain::TaskId;

pub const HELP: &str = "\
commands:
  handle <name>          set your x handle
  open <task>            open a task's link
  url <task> <link>      paste the url a task asks for
  tick <task>            toggle a task's checkbox
  address <0x...>        type a wallet address
  connect <0x...>        connect a wallet provider
  reject                 decline the wallet connection prompt
  next                   continue to the next step
  submit                 submit the registration
  <empty line>           enter
  status | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(FlowEvent),
    Status,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Input> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Event(FlowEvent::EnterPressed));
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let event = match verb.to_ascii_lowercase().as_str() {
        "status" => return Ok(Input::Status),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => return Ok(Input::Quit),
        "handle" => FlowEvent::HandleChanged(rest.to_string()),
        "address" => FlowEvent::AddressChanged(rest.to_string()),
        "connect" => FlowEvent::WalletConnected(required(rest, "connect <0x...>")?.to_string()),
        "reject" => FlowEvent::WalletConnectRejected,
        "open" => FlowEvent::LinkClicked(task_arg(rest, "open <task>")?),
        "tick" => FlowEvent::TaskClicked(task_arg(rest, "tick <task>")?),
        "url" => {
            let (task, url) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            FlowEvent::QuoteUrlChanged {
                task_id: task_arg(task, "url <task> <link>")?,
                url: url.trim().to_string(),
            }
        }
        "next" | "continue" => FlowEvent::ContinuePressed,
        "submit" => FlowEvent::SubmitPressed,
        other => bail!("unknown command `{other}`, try `help`"),
    };
    Ok(Input::Event(event))
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str> {
    if value.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(value)
}

fn task_arg(value: &str, usage: &str) -> Result<TaskId> {
    required(value.trim(), usage).map(TaskId::new)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
