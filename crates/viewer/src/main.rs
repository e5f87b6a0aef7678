use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunely_core::viewer::{PollEvent, Poller, ViewerRole};
use tunely_viewer::client::{ApiClient, DEFAULT_API_URL};
use tunely_viewer::render::{render, CLOSED_MESSAGE};
use tunely_viewer::source::SessionSource;

/// Follow an artist's live request queue from the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Artist handle, as in the share link.
    handle: String,

    /// Which view to show: performer, display or requester.
    #[arg(short, long, default_value = "display")]
    role: ViewerRole,

    /// Base URL of the Tunely API.
    #[arg(long, env = "TUNELY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunely_viewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url).context("failed to build HTTP client")?;

    let artist = client
        .artist(&cli.handle)
        .await
        .with_context(|| format!("could not load artist @{}", cli.handle))?;
    let Some(session) = client.active_session(&artist.handle).await? else {
        println!("{}: {CLOSED_MESSAGE}", artist.display_name);
        return Ok(());
    };

    let poller = Poller::for_role(cli.role);
    tracing::info!(
        handle = %artist.handle,
        session_id = session.id,
        role = %cli.role,
        period_ms = poller.period().as_millis() as u64,
        "Following session",
    );

    let source = SessionSource::new(client, session.id, cli.role);
    let follow = poller.run(&source, |event| match event {
        PollEvent::Update(snapshot) => {
            println!("{}", render(cli.role, &artist.display_name, &snapshot));
        }
        PollEvent::Failed(err) => tracing::warn!(error = %err, "Poll failed, retrying"),
    });

    tokio::select! {
        exit = follow => {
            tracing::info!(?exit, "Session closed");
            println!("{}: {CLOSED_MESSAGE}", artist.display_name);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }
    Ok(())
}
