use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use clap::Parser;
use client_core::{
    FlowCommand, FlowConfig, FlowEvent, FlowOrchestrator, FlowVariant, HttpSubmissionClient,
    MemorySessionStore, Phase, TaskStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod tasks;

use commands::{parse_line, Input, HELP};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server_url: String,
    #[arg(long, default_value = "combined")]
    variant: FlowVariant,
    /// TOML file with a `[[tasks]]` table; the built-in like/quote pair otherwise.
    #[arg(long)]
    tasks_file: Option<PathBuf>,
}

type Flow = FlowOrchestrator<MemorySessionStore>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let args = Args::parse();

    let tasks = tasks::load_tasks(args.tasks_file.as_deref())?;
    let client = HttpSubmissionClient::new(args.server_url);
    info!(endpoint = %client.endpoint(), variant = ?args.variant, "starting registration");
    let mut flow: Flow = FlowOrchestrator::new(FlowConfig::new(args.variant, tasks));

    println!("{HELP}\n");
    render(&flow, Instant::now());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let now = Instant::now();
        flow.handle(FlowEvent::Tick, now);

        let event = match parse_line(&line) {
            Ok(Input::Event(event)) => event,
            Ok(Input::Status) => {
                render(&flow, now);
                continue;
            }
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Quit) => break,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if let FlowEvent::LinkClicked(task_id) = &event {
            if let Some(task) = flow.form().gate().tasks().iter().find(|t| &t.id == task_id) {
                println!("opening {}", task.link);
            }
        }

        if let Some(FlowCommand::Submit) = flow.handle(event, now) {
            println!("submitting...");
            if let Err(err) = flow.submit(&client).await {
                warn!(error = %err, "submission not started");
            }
        }

        if flow.is_finished() {
            render_confirmation(&flow);
            return Ok(());
        }
        render(&flow, Instant::now());
    }

    Ok(())
}

fn render(flow: &Flow, now: Instant) {
    let form = flow.form();
    println!("-- {:?} --", flow.phase());
    if matches!(flow.phase(), Phase::Register | Phase::Identity) {
        println!("handle:  {}", form.handle());
    }
    if matches!(flow.phase(), Phase::Register | Phase::Tasks) {
        for task in form.gate().tasks() {
            let mark = match form.gate().status(&task.id) {
                Ok(TaskStatus::Completed) => "[x]",
                Ok(TaskStatus::UrlPending) => "[~]",
                Ok(TaskStatus::LinkVisited) => "[ ]",
                Ok(TaskStatus::Locked) | Err(_) => "[-]",
            };
            let shake = if flow.is_shaking(&task.id, now) { " <" } else { "" };
            println!("{mark} {} ({}){shake}", task.label, task.id);
            if let Some(url) = form.gate().supplied_url(&task.id) {
                println!("      url: {url}");
            }
        }
    }
    if matches!(flow.phase(), Phase::Register | Phase::Wallet) {
        let source = if form.address_connected() { " (connected)" } else { "" };
        println!("address: {}{source}", form.address());
    }
    if let Some(field) = flow.invalid_field() {
        println!("! check {field:?}");
    }
    if let Some(hint) = flow.visible_hint(now) {
        println!("! {hint}");
    }
    if let Some(error) = flow.inline_error() {
        println!("! {error}");
    }
    let ready = if flow.in_flight() {
        "submitting"
    } else if flow.can_advance() {
        "ready"
    } else {
        "waiting"
    };
    println!("-- {ready} --");
}

fn render_confirmation(flow: &Flow) {
    let Some(view) = flow.confirmation() else {
        return;
    };
    println!("you're on the list.");
    println!("handle:  @{}", view.handle);
    println!("wallet:  {}", view.short_address());
    match view.share_intent(flow.share_config()) {
        Ok(url) => println!("share:   {url}"),
        Err(err) => warn!(error = %err, "failed to build share link"),
    }
}
