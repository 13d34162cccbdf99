//! updown.io CLI: manage checks, downtimes, metrics, nodes, and recipients from the terminal.

mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use updown_lib::{
    calculate_range, get_api_key, CheckItem, Client, MetricGroup, Recipient, RecipientType, Url,
    Webhook,
};

#[derive(Parser)]
#[command(name = "updown")]
#[command(about = "updown.io CLI: manage checks, downtimes, metrics, and recipients", long_about = None)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", value_enum, global = true)]
    output: OutputFormatArg,

    /// API key. Falls back to secret backends (1Password, Bitwarden, KeePassXC) when unset.
    #[arg(long, env = "UPDOWN_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API endpoint, for proxies and testing.
    #[arg(long, env = "UPDOWN_BASE_URL", global = true)]
    base_url: Option<Url>,

    /// Request timeout in seconds.
    #[arg(long, default_value = "15", global = true)]
    timeout: u64,

    /// Log format on stderr; verbosity comes from RUST_LOG (default: warn).
    #[arg(long, default_value = "pretty", value_enum, global = true)]
    log_format: LogFormatArg,

    /// Treat CHECK arguments as check aliases and resolve them to tokens.
    #[arg(short = 'a', long, global = true)]
    by_alias: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List checks
    Checks,
    /// Show one check
    Check { check: String },
    /// Add a check
    AddCheck {
        url: String,
        #[command(flatten)]
        opts: CheckOpts,
    },
    /// Update a check
    UpdateCheck {
        check: String,
        /// New URL to monitor
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        opts: CheckOpts,
    },
    /// Remove a check
    RemoveCheck { check: String },
    /// Resolve a check alias to its token
    Token { alias: String },
    /// List downtimes for a check
    Downtimes {
        check: String,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Get metrics for a check
    Metrics {
        check: String,
        #[arg(long, default_value = "time", value_parser = ["time", "host"])]
        group: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Window ending at --to (or now), e.g. 6hours, 1day, 2weeks. Overrides --from.
        #[arg(long)]
        range: Option<String>,
    },
    /// List monitoring nodes
    Nodes,
    /// List IPv4 addresses of monitoring nodes
    Ipv4,
    /// List IPv6 addresses of monitoring nodes
    Ipv6,
    /// List recipients
    Recipients,
    /// Add a recipient
    AddRecipient {
        #[arg(value_parser = ["email", "sms", "telegram", "webhook", "zapier"])]
        kind: String,
        /// Address, phone number or URL
        value: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a recipient
    RemoveRecipient { id: String },
    /// List webhooks (deprecated by updown.io in favour of recipients)
    Webhooks,
    /// Add a webhook
    AddWebhook { url: String },
    /// Remove a webhook
    RemoveWebhook { id: String },
    /// Show version
    Version,
}

#[derive(Args)]
struct CheckOpts {
    /// Human readable name
    #[arg(long)]
    alias: Option<String>,
    /// Interval in seconds
    #[arg(long)]
    period: Option<u32>,
    /// APDEX threshold in seconds
    #[arg(long)]
    apdex: Option<f64>,
    #[arg(long)]
    enabled: Option<bool>,
    /// Make the status page public
    #[arg(long)]
    published: Option<bool>,
    /// Require this string in the page body
    #[arg(long)]
    string_match: Option<String>,
    /// A time, "recovery" or "forever"
    #[arg(long)]
    mute_until: Option<String>,
    /// Location to skip (repeatable)
    #[arg(long = "disabled-location")]
    disabled_locations: Vec<String>,
    /// Custom request header NAME=VALUE (repeatable)
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

impl CheckOpts {
    fn into_item(self, url: Option<String>) -> CheckItem {
        CheckItem {
            url,
            period: self.period,
            apdex: self.apdex,
            enabled: self.enabled,
            published: self.published,
            alias: self.alias,
            string_match: self.string_match,
            mute_until: self.mute_until,
            disabled_locations: (!self.disabled_locations.is_empty())
                .then_some(self.disabled_locations),
            custom_headers: (!self.headers.is_empty()).then(|| self.headers.into_iter().collect()),
        }
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if matches!(cli.command, Commands::Version) {
        println!("updown {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let format = match cli.output {
        OutputFormatArg::Plain => output::OutputFormat::Plain,
        OutputFormatArg::Json => output::OutputFormat::Json,
    };

    match run(&client, cli.command, cli.by_alias, format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match log_format {
        LogFormatArg::Json => builder.json().init(),
        LogFormatArg::Pretty => builder.init(),
    }
}

fn build_client(cli: &Cli) -> Result<Client, String> {
    let (api_key, source) = get_api_key(cli.api_key.as_deref())?;
    tracing::debug!(?source, "using API key");
    let client = Client::with_timeout(api_key, Duration::from_secs(cli.timeout))
        .map_err(|e| e.to_string())?;
    Ok(match &cli.base_url {
        Some(url) => client.with_base_url(url.clone()),
        None => client,
    })
}

async fn check_token(client: &Client, check: &str, by_alias: bool) -> Result<String, String> {
    if !by_alias {
        return Ok(check.to_string());
    }
    client
        .checks()
        .token_for_alias(check)
        .await
        .map_err(|e| format!("{}: {}", check, e))
}

fn print<T: Serialize>(data: &T, format: output::OutputFormat) -> Result<(), String> {
    let value = serde_json::to_value(data).map_err(|e| e.to_string())?;
    let text = output::render(&value, format).map_err(|e| e.to_string())?;
    println!("{}", text.trim_end());
    Ok(())
}

async fn run(
    client: &Client,
    cmd: Commands,
    by_alias: bool,
    format: output::OutputFormat,
) -> Result<(), String> {
    let deleted = |d: bool| serde_json::json!({ "deleted": d });

    match cmd {
        Commands::Checks => {
            let res = client.checks().list().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Check { check } => {
            let token = check_token(client, &check, by_alias).await?;
            let res = client.checks().get(&token).await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::AddCheck { url, opts } => {
            let item = opts.into_item(Some(url));
            let res = client.checks().add(&item).await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::UpdateCheck { check, url, opts } => {
            let token = check_token(client, &check, by_alias).await?;
            let item = opts.into_item(url);
            let res = client
                .checks()
                .update(&token, &item)
                .await
                .map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::RemoveCheck { check } => {
            let token = check_token(client, &check, by_alias).await?;
            let res = client
                .checks()
                .remove(&token)
                .await
                .map_err(|e| e.to_string())?;
            print(&deleted(res.data), format)?;
        }
        Commands::Token { alias } => {
            let token = check_token(client, &alias, true).await?;
            print(&token, format)?;
        }
        Commands::Downtimes { check, page } => {
            let token = check_token(client, &check, by_alias).await?;
            let res = client
                .downtimes()
                .list(&token, page)
                .await
                .map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Metrics {
            check,
            group,
            from,
            to,
            range,
        } => {
            let token = check_token(client, &check, by_alias).await?;
            let group: MetricGroup = group.parse()?;
            let (from, to) = match range {
                Some(r) => {
                    let (f, t) = calculate_range(&r, to.as_deref())?;
                    (Some(f), Some(t))
                }
                None => (from, to),
            };
            let res = client
                .metrics()
                .list(&token, group, from.as_deref(), to.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Nodes => {
            let res = client.nodes().list().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Ipv4 => {
            let res = client.nodes().list_ipv4().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Ipv6 => {
            let res = client.nodes().list_ipv6().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::Recipients => {
            let res = client.recipients().list().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::AddRecipient { kind, value, name } => {
            let kind: RecipientType = kind.parse()?;
            let recipient = Recipient {
                name,
                ..Recipient::new(kind, value)
            };
            let res = client
                .recipients()
                .add(&recipient)
                .await
                .map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::RemoveRecipient { id } => {
            let res = client
                .recipients()
                .remove(&id)
                .await
                .map_err(|e| e.to_string())?;
            print(&deleted(res.data), format)?;
        }
        Commands::Webhooks => {
            let res = client.webhooks().list().await.map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::AddWebhook { url } => {
            let webhook = Webhook {
                id: String::new(),
                url,
            };
            let res = client
                .webhooks()
                .add(&webhook)
                .await
                .map_err(|e| e.to_string())?;
            print(&res.data, format)?;
        }
        Commands::RemoveWebhook { id } => {
            let res = client
                .webhooks()
                .remove(&id)
                .await
                .map_err(|e| e.to_string())?;
            print(&deleted(res.data), format)?;
        }
        Commands::Version => {}
    }
    Ok(())
}
