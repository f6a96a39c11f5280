// SPDX-FileCopyrightText: 2026 Casebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `casebook doctor` command implementation.
//!
//! Runs diagnostic checks against the configured database and upstream
//! services and prints a report. Checks never modify anything.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use casebook_channeltalk::ChannelTalkSource;
use casebook_config::model::CasebookConfig;
use casebook_core::CasebookError;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `casebook doctor` command.
///
/// Configuration was already loaded and validated by the caller, so the
/// config check only reports which integrations are set up.
pub async fn run_doctor(config: &CasebookConfig, plain: bool) -> Result<(), CasebookError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_database(&config.storage.database_path).await,
        check_channel_talk(config).await,
        check_openai(config),
        check_notion(config),
    ];

    println!();
    println!("  casebook doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (&result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
    };
    format!(
        "    {symbol} {:<20} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Check the database exists, opens, and has been migrated.
async fn check_database(db_path: &str) -> CheckResult {
    const NAME: &str = "Database";
    let start = Instant::now();

    if !std::path::Path::new(db_path).exists() {
        return CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("not found: {db_path} (run `casebook migrate` or start the server)"),
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new(NAME, CheckStatus::Fail, format!("open failed: {e}"), start);
        }
    };

    let applied = conn
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM refinery_schema_history",
                [],
                |row| row.get(0),
            )
        })
        .await;

    match applied {
        Ok(count) => CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("connected, {count} migration(s) applied"),
            start,
        ),
        Err(e) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("schema not migrated: {e}"),
            start,
        ),
    }
}

/// Check the Channel Talk credentials against the upstream.
async fn check_channel_talk(config: &CasebookConfig) -> CheckResult {
    const NAME: &str = "Channel Talk";
    let start = Instant::now();

    let source = match ChannelTalkSource::new(&config.channel_talk) {
        Ok(source) => source,
        Err(e) => return CheckResult::new(NAME, CheckStatus::Fail, e.to_string(), start),
    };

    let has_credentials = config.channel_talk.api_key.is_some()
        && config.channel_talk.api_secret.is_some();
    if !has_credentials {
        return CheckResult::new(NAME, CheckStatus::Fail, "no credentials configured", start);
    }

    if source.validate_credentials().await {
        CheckResult::new(NAME, CheckStatus::Pass, "credentials accepted", start)
    } else {
        CheckResult::new(NAME, CheckStatus::Fail, "credentials rejected or upstream unreachable", start)
    }
}

fn check_openai(config: &CasebookConfig) -> CheckResult {
    let start = Instant::now();
    if config.openai.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        CheckResult::new(
            "OpenAI",
            CheckStatus::Pass,
            format!("key configured, model {}", config.openai.model),
            start,
        )
    } else {
        CheckResult::new(
            "OpenAI",
            CheckStatus::Warn,
            "no API key, inquiries will be recorded unclassified",
            start,
        )
    }
}

fn check_notion(config: &CasebookConfig) -> CheckResult {
    let start = Instant::now();
    let token = config.notion.token.as_deref().is_some_and(|t| !t.trim().is_empty());
    let database = config
        .notion
        .database_id
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    match (token, database) {
        (true, true) => CheckResult::new("Notion", CheckStatus::Pass, "token and database configured", start),
        (false, _) => CheckResult::new(
            "Notion",
            CheckStatus::Warn,
            "no token, docs pages will not be published",
            start,
        ),
        (true, false) => CheckResult::new(
            "Notion",
            CheckStatus::Warn,
            "no database_id, docs pages will not be published",
            start,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_database_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let result = check_database(&path.to_string_lossy()).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[tokio::test]
    async fn migrated_database_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casebook.db").to_string_lossy().to_string();
        let db = casebook_storage::Database::open(&path).await.unwrap();
        db.close().await.unwrap();

        let result = check_database(&path).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
        assert!(result.message.contains("migration"));
    }

    #[tokio::test]
    async fn unmigrated_database_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        std::fs::File::create(&path).unwrap();

        let result = check_database(&path.to_string_lossy()).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn channel_talk_without_credentials_fails_fast() {
        let result = check_channel_talk(&CasebookConfig::default()).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn unset_integrations_are_warnings() {
        let config = CasebookConfig::default();
        assert_eq!(check_openai(&config).status, CheckStatus::Warn);
        assert_eq!(check_notion(&config).status, CheckStatus::Warn);

        let mut config = CasebookConfig::default();
        config.openai.api_key = Some("sk-test".into());
        config.notion.token = Some("secret".into());
        config.notion.database_id = Some("db".into());
        assert_eq!(check_openai(&config).status, CheckStatus::Pass);
        assert_eq!(check_notion(&config).status, CheckStatus::Pass);
    }

    #[test]
    fn plain_lines_use_bracket_tags() {
        let result = CheckResult {
            name: "Database".into(),
            status: CheckStatus::Fail,
            message: "open failed".into(),
            duration: Duration::from_millis(3),
        };
        let line = format_line(&result, false);
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("Database"));
        assert!(line.contains("(3ms)"));
    }
}
