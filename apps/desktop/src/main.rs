use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::markdown;
use client_core::view::message_time;
use client_core::{
    load_settings, CertificatesResource, ChatSession, ChatTransport, PortfolioClient,
    ProfileResource, ProjectsResource, RemoteResource, Resource, SkillsResource,
    TimelineResource,
};
use shared::domain::ChatRole;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Portfolio client for the terminal")]
struct Args {
    /// Settings file; defaults to ./folio.toml or the per-user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Profile,
    Projects,
    Skills,
    Timeline,
    Certificates,
    /// Every section, in page order.
    All,
    /// Interactive assistant. `/suggest N` sends a suggestion, `/quit` exits.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref());
    tracing::debug!(api = %settings.api_base_url, command = ?args.command, "settings loaded");
    let client = PortfolioClient::from_settings(&settings)?;

    match args.command {
        Command::Profile => show_profile(&client).await,
        Command::Projects => {
            show_list::<ProjectsResource>(&client, "Projects", |v| render::projects(v)).await
        }
        Command::Skills => {
            show_list::<SkillsResource>(&client, "Skills", |v| render::skills(v)).await
        }
        Command::Timeline => {
            show_list::<TimelineResource>(&client, "Timeline", |v| render::timeline(v)).await
        }
        Command::Certificates => {
            show_list::<CertificatesResource>(&client, "Achievements", |v| {
                render::certificates(v)
            })
            .await
        }
        Command::All => {
            show_profile(&client).await;
            show_list::<TimelineResource>(&client, "Timeline", |v| render::timeline(v)).await;
            show_list::<CertificatesResource>(&client, "Achievements", |v| {
                render::certificates(v)
            })
            .await;
            show_list::<ProjectsResource>(&client, "Projects", |v| render::projects(v)).await;
            show_list::<SkillsResource>(&client, "Skills", |v| render::skills(v)).await;
        }
        Command::Chat => run_chat(&client, &settings.owner_name).await?,
    }
    Ok(())
}

async fn show_profile(client: &PortfolioClient) {
    match client.load::<ProfileResource>().await {
        RemoteResource::Loaded(profile) => print!("{}", render::profile(&profile)),
        RemoteResource::Errored(err) => eprintln!("Error loading profile: {err}"),
        RemoteResource::Unloaded => {}
    }
}

/// List failures print nothing; the load already logged them.
async fn show_list<R>(
    client: &PortfolioClient,
    title: &str,
    render: impl Fn(&R::Output) -> String,
) where
    R: Resource,
{
    println!("\n== {title} ==");
    if let RemoteResource::Loaded(value) = client.load::<R>().await {
        print!("{}", render(&value));
    }
}

async fn run_chat(client: &PortfolioClient, owner_name: &str) -> Result<()> {
    let transport = client.chat_transport();
    let mut session = ChatSession::for_owner(owner_name);
    print_last_reply(&session);
    for (index, suggestion) in session.suggestions().iter().enumerate() {
        println!("  /suggest {} -> {suggestion}", index + 1);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        if let Some(arg) = line.strip_prefix("/suggest") {
            let Some(index) = arg.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1))
            else {
                eprintln!("usage: /suggest N");
                continue;
            };
            match session.submit_suggestion(index) {
                Ok(request) => {
                    let outcome = transport.send(&request).await;
                    session.finish(outcome);
                }
                Err(rejected) => {
                    eprintln!("{rejected}");
                    continue;
                }
            }
        } else {
            session.set_input(line);
            if let Err(rejected) = session.submit(&transport).await {
                eprintln!("{rejected}");
                continue;
            }
        }
        print_last_reply(&session);
    }
    Ok(())
}

fn print_last_reply(session: &ChatSession) {
    if let Some(message) = session
        .transcript()
        .last()
        .filter(|m| m.role == ChatRole::Assistant)
    {
        println!(
            "{}\n  [{}]\n",
            markdown::to_plain_text(&markdown::parse(&message.content)),
            message_time(message)
        );
    }
}
