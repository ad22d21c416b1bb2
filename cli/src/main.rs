use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use userdesk_client::net::api::ApiClient;
use userdesk_client::util::auth::{ExpiryPolicy, Navigation, now_epoch_secs};
use userdesk_client::{ClientApp, ClientConfig, ClientError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "userdesk", about = "userdesk admin console client")]
struct Cli {
    #[arg(long, env = "USERDESK_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "USERDESK_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Treat sessions past their expiry as signed out.
    #[arg(long, default_value_t = false)]
    enforce_expiry: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Login {
        #[arg(long, env = "USERDESK_EMAIL")]
        email: String,
        #[arg(long, env = "USERDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Status,
    Theme(ThemeCommand),
    /// Call a protected endpoint with the stored bearer token.
    Api {
        method: String,
        path: String,
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ThemeCommand {
    #[command(subcommand)]
    command: Option<ThemeSubcommand>,
}

#[derive(Subcommand, Debug)]
enum ThemeSubcommand {
    Show,
    Toggle,
    Set {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir.clone_from(dir);
        }
        if self.enforce_expiry {
            config.expiry_policy = ExpiryPolicy::Enforce;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();
    tracing::debug!(base_url = %config.base_url, policy = ?config.expiry_policy, "cli starting");
    let app = ClientApp::open(&config)?;

    match cli.command {
        Command::Ping => {
            app.api.ping().await?;
            println!("ok");
            Ok(())
        }
        Command::Login { email, password } => run_login(&app.api, &email, &password).await,
        Command::Logout => {
            app.api.logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            run_status(&app);
            Ok(())
        }
        Command::Theme(theme) => run_theme(&app, theme),
        Command::Api { method, path, data } => run_api(&app.api, &method, &path, data.as_deref()).await,
    }
}

async fn run_login(api: &ApiClient, email: &str, password: &str) -> Result<(), CliError> {
    let login = api.login(email, password).await?;
    println!("signed in as {} <{}>", login.user.name, login.user.email);
    println!("token expires at {} (epoch seconds)", login.expires_in);
    Ok(())
}

fn run_status(app: &ClientApp) {
    let session = app.session.read();
    let state = app.guard.state();
    println!("guard: {state:?} (policy {:?})", app.guard.policy());
    match session.expires_at() {
        Some(expires_at) => println!("session: present, {}", describe_expiry(expires_at, now_epoch_secs())),
        None => println!("session: none"),
    }
    match app.guard.resolve("/") {
        Navigation::Redirect(target) => println!("landing: {target}"),
        other => println!("landing: {other:?}"),
    }
}

/// Human-readable distance to `expires_at`. Saturates on hand-edited extremes.
fn describe_expiry(expires_at: i64, now: i64) -> String {
    let remaining = expires_at.saturating_sub(now);
    if remaining > 0 {
        format!("expires in {remaining}s")
    } else {
        format!("expired {}s ago", remaining.unsigned_abs())
    }
}

fn run_theme(app: &ClientApp, theme: ThemeCommand) -> Result<(), CliError> {
    let dark = match theme.command.unwrap_or(ThemeSubcommand::Show) {
        ThemeSubcommand::Show => app.theme.read(),
        ThemeSubcommand::Toggle => app.theme.toggle()?,
        ThemeSubcommand::Set { enabled } => {
            app.theme.set(enabled)?;
            enabled
        }
    };
    println!("{}", if dark { "dark" } else { "light" });
    Ok(())
}

async fn run_api(api: &ApiClient, method: &str, path: &str, data: Option<&str>) -> Result<(), CliError> {
    let method = parse_method(method)?;
    let body = data.map(serde_json::from_str::<Value>).transpose()?;
    match api.send_authorized(method, path, body.as_ref()).await {
        Ok(json) => print_json(&json),
        Err(e) => {
            if let Some(target) = e.redirect_target() {
                eprintln!("redirect: {target}");
            }
            Err(e.into())
        }
    }
}

fn parse_method(raw: &str) -> Result<reqwest::Method, CliError> {
    let upper = raw.to_ascii_uppercase();
    match upper.as_str() {
        "GET" | "POST" | "PUT" | "PATCH" | "DELETE" => {
            reqwest::Method::from_bytes(upper.as_bytes()).map_err(|_| CliError::InvalidMethod(raw.to_owned()))
        }
        _ => Err(CliError::InvalidMethod(raw.to_owned())),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_method_accepts_rest_verbs() {
        assert_eq!(parse_method("get").unwrap(), reqwest::Method::GET);
        assert_eq!(parse_method("DELETE").unwrap(), reqwest::Method::DELETE);
        assert_eq!(parse_method("Put").unwrap(), reqwest::Method::PUT);
    }

    #[test]
    fn parse_method_rejects_others() {
        assert!(matches!(parse_method("TRACE"), Err(CliError::InvalidMethod(_))));
        assert!(matches!(parse_method(""), Err(CliError::InvalidMethod(_))));
    }

    #[test]
    fn cli_parses_login() {
        let cli = Cli::try_parse_from(["userdesk", "login", "--email", "a@b.c", "--password", "pw"]).unwrap();
        assert!(matches!(cli.command, Command::Login { ref email, .. } if email == "a@b.c"));
    }

    #[test]
    fn cli_parses_theme_set() {
        let cli = Cli::try_parse_from(["userdesk", "theme", "set", "true"]).unwrap();
        let Command::Theme(theme) = cli.command else { panic!("expected theme command") };
        assert!(matches!(theme.command, Some(ThemeSubcommand::Set { enabled: true })));
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "userdesk",
            "--base-url",
            "http://api.test:9000",
            "--storage-dir",
            "/tmp/userdesk-cli-test",
            "--enforce-expiry",
            "status",
        ])
        .unwrap();
        let config = cli.client_config();
        assert_eq!(config.base_url, "http://api.test:9000");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/userdesk-cli-test"));
        assert_eq!(config.expiry_policy, ExpiryPolicy::Enforce);
    }

    #[test]
    fn describe_expiry_counts_both_directions() {
        assert_eq!(describe_expiry(160, 100), "expires in 60s");
        assert_eq!(describe_expiry(100, 100), "expired 0s ago");
        assert_eq!(describe_expiry(40, 100), "expired 60s ago");
    }

    #[test]
    fn describe_expiry_saturates_on_extreme_values() {
        assert_eq!(describe_expiry(i64::MIN, 1_700_000_000), format!("expired {}s ago", 1_u64 << 63));
        assert_eq!(describe_expiry(i64::MAX, -5), format!("expires in {}s", i64::MAX));
    }

    #[test]
    fn client_errors_display_user_message() {
        let err = CliError::from(ClientError::Transport("boom".into()));
        assert_eq!(err.to_string(), "Something went wrong.");
    }
}
