//! CLI administration tool for qr-relay.
//!
//! Provides commands for managing accounts and their API tokens, viewing
//! statistics, and performing database operations without requiring HTTP
//! API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an account with a fresh API token
//! cargo run --bin admin -- account create --email ops@example.com --plan pro
//!
//! # List all accounts
//! cargo run --bin admin -- account list
//!
//! # Revoke an account's token
//! cargo run --bin admin -- account revoke ops@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `account create`): must match the
//!   server's secret, otherwise issued tokens will not authenticate

use qr_relay::application::services::auth_service::hash_token;
use qr_relay::domain::entities::Plan;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;

/// CLI tool for managing qr-relay.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage accounts and API tokens
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account with an API token
    Create {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,

        /// Subscription plan: free, pro, enterprise
        #[arg(short, long, default_value = "free")]
        plan: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,

    /// Revoke an account's API token
    Revoke {
        /// Account email or ID
        email_or_id: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Minimal account row for CLI listings.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    plan: String,
    revoked: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Account { action } => handle_account_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account management commands.
async fn handle_account_action(action: AccountAction, pool: &PgPool) -> Result<()> {
    match action {
        AccountAction::Create { email, plan, yes } => {
            create_account(pool, email, plan, yes).await?;
        }
        AccountAction::List => {
            list_accounts(pool).await?;
        }
        AccountAction::Revoke { email_or_id } => {
            revoke_account(pool, email_or_id).await?;
        }
    }

    Ok(())
}

/// Creates an account and issues its API token.
///
/// # Security
///
/// - Only the HMAC-SHA256 hash of the token is stored
/// - The raw token is displayed once and cannot be retrieved later
/// - Tokens are 48 characters (alphanumeric) for high entropy
async fn create_account(
    pool: &PgPool,
    email: Option<String>,
    plan: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create Account".bright_blue().bold());
    println!();

    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let plan = Plan::try_from(plan).map_err(|e| anyhow::anyhow!("{e}"))?;

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let token_value = generate_token();

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Email: {}", email.cyan());
    println!("  Plan:  {}", plan.as_str().cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value);

    sqlx::query("INSERT INTO accounts (email, plan, token_hash) VALUES ($1, $2, $3)")
        .bind(&email)
        .bind(plan.as_str())
        .bind(&token_hash)
        .execute(pool)
        .await
        .context("Failed to create account")?;

    println!();
    println!("{}", "✅ Account created successfully!".green().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token_value.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/qr",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all accounts with status indicators.
async fn list_accounts(pool: &PgPool) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let accounts = sqlx::query_as::<_, AccountRow>(
        "SELECT id, email, plan, revoked, created_at FROM accounts ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list accounts")?;

    if accounts.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin account create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<32} {:<12} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Plan".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for account in &accounts {
        let status = if account.revoked {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<4} {:<32} {:<12} {:<18} {}",
            account.id.to_string().bright_black(),
            account.email.cyan(),
            account.plan,
            account
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        accounts.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes an account's token by email or ID with confirmation prompt.
async fn revoke_account(pool: &PgPool, email_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke Account".bright_blue().bold());
    println!();

    let account = match email_or_id.parse::<i64>() {
        Ok(id) => sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, plan, revoked, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?,
        Err(_) => sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, plan, revoked, created_at FROM accounts WHERE email = $1",
        )
        .bind(&email_or_id)
        .fetch_optional(pool)
        .await?,
    };

    let account = account.context("Account not found")?;

    if account.revoked {
        println!("{}", "⚠️  This account is already revoked".yellow());
        return Ok(());
    }

    println!("  Email: {}", account.email.cyan());
    println!("  ID:    {}", account.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this account's token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    sqlx::query("UPDATE accounts SET revoked = TRUE WHERE id = $1")
        .bind(account.id)
        .execute(pool)
        .await
        .context("Failed to revoke account")?;

    println!();
    println!("{}", "✅ Account revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let accounts_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE revoked = FALSE")
            .fetch_one(pool)
            .await?;

    let records_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_records")
        .fetch_one(pool)
        .await?;

    let active_records_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM qr_records WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;

    let scans_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scan_events")
        .fetch_one(pool)
        .await?;

    println!(
        "  Active accounts: {}",
        accounts_count.to_string().bright_green().bold()
    );
    println!(
        "  QR records:      {} ({} active)",
        records_count.to_string().bright_green().bold(),
        active_records_count.to_string().bright_green()
    );
    println!(
        "  Scan events:     {}",
        scans_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
