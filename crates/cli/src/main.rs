//! CLI for the Return Signals API.
//!
//! Signs in with the given credentials (or picks up an existing session),
//! runs one command, and prints a table or the raw JSON payload.

use clap::{Parser, Subcommand};
use serde::Serialize;
use signals_api::{ConversationListParams, ReturnSignals, Session};
use signals_core::analytics::DateRange;
use signals_core::types::ConversationStatus;
use signals_core::ApiError;
use signals_gateway::GatewayConfig;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "signals", version, about = "Return Signals API client")]
struct Cli {
    #[arg(long, env = "SIGNALS_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Sign in with these credentials before running the command.
    #[arg(long, env = "SIGNALS_EMAIL", requires = "password")]
    email: Option<String>,

    #[arg(long, env = "SIGNALS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "SIGNALS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Print raw JSON instead of a table.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the signed-in user and their organizations.
    Me,
    /// List organizations visible to the user.
    Orgs,
    /// List conversations in an organization.
    Conversations {
        #[arg(long)]
        org: String,

        #[arg(long)]
        status: Option<ConversationStatus>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },
    /// Send a message into a conversation as a human agent.
    Send {
        #[arg(long)]
        org: String,

        #[arg(long)]
        conversation: String,

        content: String,
    },
    /// List organization members.
    Members {
        #[arg(long)]
        org: String,
    },
    /// Analytics overview for a date window (YYYY-MM-DD).
    Overview {
        #[arg(long)]
        org: String,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,
    },
}

fn emit<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string_pretty(value).map_err(ApiError::Encode)?;
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let t0 = Instant::now();

    let config =
        GatewayConfig::new(&cli.api_url)?.with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = ReturnSignals::new(config)?;
    let session = Session::new(client.clone());

    match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => {
            if let Err(e) = session.login(email, password).await {
                if e.is_email_verification_required() {
                    eprintln!("Email verification required before signing in.");
                } else {
                    eprintln!("Login failed: {}", e.display_message());
                }
                std::process::exit(1);
            }
        }
        _ => {
            if session.restore().await.is_none() {
                tracing::debug!("running without a session");
            }
        }
    }

    if let Err(e) = run(&cli, &client).await {
        eprintln!("{}", e.display_message());
        std::process::exit(1);
    }

    tracing::debug!(elapsed_ms = t0.elapsed().as_millis(), "done");
    Ok(())
}

async fn run(cli: &Cli, client: &ReturnSignals) -> Result<(), ApiError> {
    match &cli.command {
        Commands::Me => {
            let user = client.auth().me().await?;
            if cli.json {
                return emit(&user);
            }
            println!("{} ({})", user.email, user.user_id);
            for membership in &user.memberships {
                println!(
                    "  {:<28} {:<10} {}",
                    membership.organization_name,
                    membership.role.as_str(),
                    membership.organization_id
                );
            }
        }
        Commands::Orgs => {
            let orgs = client.organizations().list().await?;
            if cli.json {
                return emit(&orgs);
            }
            for org in &orgs {
                let role = org.user_role.map(|r| r.as_str()).unwrap_or("-");
                println!("{:<36} {:<24} {}", org.organization_id, org.name, role);
            }
        }
        Commands::Conversations {
            org,
            status,
            limit,
            offset,
        } => {
            let params = ConversationListParams {
                status: *status,
                limit: *limit,
                offset: *offset,
            };
            let list = client.conversations().list(org, &params).await?;
            if cli.json {
                return emit(&list);
            }
            for c in &list.conversations {
                println!(
                    "{:<36} {:<16} {:<10} {:>3} {}",
                    c.conversation_id,
                    c.customer_phone,
                    c.status.as_str(),
                    c.unread_count,
                    c.last_message_preview.as_deref().unwrap_or("")
                );
            }
            println!("{} of {} conversations", list.conversations.len(), list.total);
        }
        Commands::Send {
            org,
            conversation,
            content,
        } => {
            let sent = client
                .conversations()
                .send_message(org, conversation, content)
                .await?;
            if cli.json {
                return emit(&sent);
            }
            println!("sent {}", sent.message.message_id);
        }
        Commands::Members { org } => {
            let members = client.members().list(org).await?;
            if cli.json {
                return emit(&members);
            }
            for m in &members.members {
                println!("{:<32} {:<10} {}", m.email, m.role.as_str(), m.user_id);
            }
        }
        Commands::Overview { org, from, to } => {
            let range = DateRange {
                from_date: from.clone(),
                to_date: to.clone(),
            };
            let overview = client.analytics().overview(org, &range).await?;
            if cli.json {
                return emit(&overview);
            }
            let m = &overview.metrics;
            println!("{} .. {}", overview.period_start, overview.period_end);
            println!("  active check-ins   {}", m.active_checkins);
            println!("  check-ins sent     {}", m.checkins_sent);
            println!("  response rate      {:.1}%", m.response_rate * 100.0);
            println!(
                "  outcomes           kept {} / exchanged {} / returned {} / pending {}",
                m.outcomes.kept, m.outcomes.exchanged, m.outcomes.returned, m.outcomes.pending
            );
        }
    }

    Ok(())
}
