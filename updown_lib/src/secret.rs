//! Secret backends for reading the updown.io API key.
//!
//! Each backend is configured through `UPDOWN_*` environment variables and
//! shells out to the vendor CLI. A backend that is not configured, or whose
//! CLI fails, yields `None`.

use std::process::{Command, Stdio};

/// Non-empty, trimmed value of an environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Run a command with extra env vars and return its trimmed stdout.
/// stderr is discarded so secrets never reach the terminal.
fn run_cmd(args: &[&str], env_extra: &[(&str, &str)]) -> Option<String> {
    let (bin, rest) = args.split_first()?;
    let mut cmd = Command::new(bin);
    cmd.args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in env_extra {
        cmd.env(k, v);
    }
    let out = cmd.output().ok()?;
    if !out.status.success() {
        tracing::debug!(bin = *bin, status = ?out.status, "secret backend failed");
        return None;
    }
    String::from_utf8(out.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 1Password CLI (`op read`).
///
/// - `UPDOWN_OP_ENTRY_PATH`: `op://Vault/Item`
/// - or `UPDOWN_OP_VAULT` + `UPDOWN_OP_ITEM`
/// - `UPDOWN_OP_FIELD`: field name (default `API_KEY`)
pub fn one_password() -> Option<String> {
    let field = env_var("UPDOWN_OP_FIELD").unwrap_or_else(|| "API_KEY".to_string());
    let uri = match env_var("UPDOWN_OP_ENTRY_PATH") {
        Some(path) => format!("{}/{}", path.trim_end_matches('/'), field),
        None => format!(
            "op://{}/{}/{}",
            env_var("UPDOWN_OP_VAULT")?,
            env_var("UPDOWN_OP_ITEM")?,
            field
        ),
    };
    run_cmd(&["op", "read", &uri], &[])
}

/// Bitwarden CLI (`bw get password`).
///
/// - `UPDOWN_BW_ITEM_ID`: UUID of the login item
/// - `UPDOWN_BW_SESSION`: optional session key, passed on as `BW_SESSION`
pub fn bitwarden() -> Option<String> {
    let id = env_var("UPDOWN_BW_ITEM_ID")?;
    match env_var("UPDOWN_BW_SESSION") {
        Some(session) => run_cmd(
            &["bw", "get", "password", &id],
            &[("BW_SESSION", session.as_str())],
        ),
        None => run_cmd(&["bw", "get", "password", &id], &[]),
    }
}

/// KeePassXC CLI (`keepassxc-cli show`).
///
/// - `UPDOWN_KPXC_DB`: path to the .kdbx database
/// - `UPDOWN_KPXC_ENTRY`: entry title or path (e.g. "Web/updown")
/// - `UPDOWN_KPXC_ATTRIBUTE`: attribute name (default `Password`)
pub fn keepassxc() -> Option<String> {
    let db = env_var("UPDOWN_KPXC_DB")?;
    let entry = env_var("UPDOWN_KPXC_ENTRY")?;
    let attr = env_var("UPDOWN_KPXC_ATTRIBUTE").unwrap_or_else(|| "Password".to_string());
    run_cmd(&["keepassxc-cli", "show", "-a", &attr, &db, &entry], &[])
}
