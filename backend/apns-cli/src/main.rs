//! Command line front end for the JWT APNs client.
//!
//! Sends one notification and prints the APNs status and reason. APNs-level
//! rejections still exit 0; only local or transport failures abort.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jwt_apns_client::{ApnsClient, ApnsConfig, Environment, NotificationRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "jwt-apns-client", about = "APNs client using JWT provider tokens")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a push notification to one device
    Send(SendArgs),
}

#[derive(clap::Args, Debug)]
struct SendArgs {
    /// A message to send in an alert
    #[arg(long, default_value = "testing!")]
    message: String,

    /// A device registration id
    #[arg(long)]
    device: String,

    /// Development or production environment
    #[arg(long, env = "APNS_ENVIRONMENT", default_value = "dev")]
    environment: Environment,

    /// Path to the .p8 file
    #[arg(long = "key_path", env = "APNS_KEY_PATH")]
    key_path: Option<PathBuf>,

    /// APNs Key Id
    #[arg(long = "key_id", env = "APNS_KEY_ID")]
    key_id: Option<String>,

    /// APNs Team Id
    #[arg(long = "team_id", env = "APNS_TEAM_ID")]
    team_id: Option<String>,

    /// APNs Topic
    #[arg(long, env = "APNS_TOPIC")]
    topic: Option<String>,
}

impl SendArgs {
    fn config(&self) -> ApnsConfig {
        ApnsConfig {
            team_id: self.team_id.clone(),
            key_id: self.key_id.clone(),
            key_path: self.key_path.clone(),
            topic: self.topic.clone(),
            environment: self.environment,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Send(args) => send(args).await,
    }
}

async fn send(args: SendArgs) -> Result<()> {
    let client = ApnsClient::new(args.config()).context("Failed to initialize APNs client")?;

    let request = NotificationRequest::new(&args.device).alert(args.message.as_str());
    let response = client
        .send_notification(&request)
        .await
        .context("Failed to send notification")?;

    println!("Status: {}", response.status);
    if !response.reason.is_empty() {
        println!("Reason: {}", response.reason);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_defaults() {
        let cli = Cli::try_parse_from(["jwt-apns-client", "send", "--device", "abc"]).unwrap();
        let Command::Send(args) = cli.command;

        assert_eq!(args.message, "testing!");
        assert_eq!(args.device, "abc");

        let cfg = args.config();
        assert_eq!(cfg.environment, Environment::Dev);
        assert_eq!(cfg.resolved_host(), "api.development.push.apple.com");
        assert_eq!(cfg.algorithm, "ES256");
    }

    #[test]
    fn test_send_all_flags() {
        let cli = Cli::try_parse_from([
            "jwt-apns-client",
            "send",
            "--message",
            "hello",
            "--device",
            "abc",
            "--environment",
            "prod",
            "--key_path",
            "/keys/AuthKey.p8",
            "--key_id",
            "KEY1234567",
            "--team_id",
            "TEAM123456",
            "--topic",
            "com.example.app",
        ])
        .unwrap();
        let Command::Send(args) = cli.command;

        let cfg = args.config();
        assert_eq!(cfg.environment, Environment::Prod);
        assert_eq!(cfg.resolved_host(), "api.push.apple.com");
        assert_eq!(cfg.key_path, Some(PathBuf::from("/keys/AuthKey.p8")));
        assert_eq!(cfg.key_id.as_deref(), Some("KEY1234567"));
        assert_eq!(cfg.team_id.as_deref(), Some("TEAM123456"));
        assert_eq!(cfg.topic.as_deref(), Some("com.example.app"));
    }

    #[test]
    fn test_device_is_required() {
        assert!(Cli::try_parse_from(["jwt-apns-client", "send"]).is_err());
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let result = Cli::try_parse_from([
            "jwt-apns-client",
            "send",
            "--device",
            "abc",
            "--environment",
            "staging",
        ]);
        assert!(result.is_err());
    }
}
