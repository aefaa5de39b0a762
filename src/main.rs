#[macro_use]
extern crate log;
use std::collections::VecDeque;

use chrono::Utc;
use futures::future::FutureExt;

use backend::{Account, Backend, NewAccount, DEFAULT_BACKEND};
use leaderboard::{Row, SortKey};
use request_pool::drain_buffered;

mod backend;
mod leaderboard;
mod rank_points;
mod request_pool;

// The admin panel this replaces shipped with these exact credentials.
const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "admin";

const LOOKUP_CONCURRENCY: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let base_url = std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND.to_string());
    let app = App {
        backend: Backend::new(base_url),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => app.refresh(SortKey::Rank).await,
        Some("refresh") => {
            let key = match args.get(1) {
                Some(s) => SortKey::parse(s)
                    .ok_or_else(|| anyhow::anyhow!("unknown sort key: {} (rank|points|server)", s))?,
                None => SortKey::Rank,
            };
            app.refresh(key).await
        }
        Some("add") => {
            check_admin_login()?;
            app.add(&args[1..]).await
        }
        Some("delete-account") => {
            check_admin_login()?;
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("usage: delete-account <id>"))?
                .parse()?;
            app.backend.delete_account(id).await?;
            info!("Deleted account {}.", id);
            Ok(())
        }
        Some("delete-player") => {
            check_admin_login()?;
            let player = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("usage: delete-player <name>"))?;
            app.backend.delete_player(player).await?;
            info!("Deleted all accounts of {}.", player);
            Ok(())
        }
        Some(other) => anyhow::bail!(
            "unknown command: {} (refresh|add|delete-account|delete-player)",
            other
        ),
    }
}

fn check_admin_login() -> anyhow::Result<()> {
    let user = std::env::var("ADMIN_USER").unwrap_or_default();
    let pass = std::env::var("ADMIN_PASS").unwrap_or_default();
    if user != ADMIN_USER || pass != ADMIN_PASS {
        anyhow::bail!("wrong login");
    }
    Ok(())
}

struct App {
    backend: Backend,
}

impl App {
    /// One full leaderboard cycle: account list, one ranked lookup per
    /// account (bounded parallel, failures isolated per row), sort,
    /// print.
    async fn refresh(&self, key: SortKey) -> anyhow::Result<()> {
        let accounts = self.backend.fetch_accounts().await?;
        info!("Tracking {} accounts.", accounts.len());

        let queue: VecDeque<_> = accounts
            .iter()
            .map(|account| self.process_account(account).boxed())
            .collect();
        let rows = drain_buffered(queue, LOOKUP_CONCURRENCY).await;

        let rows = leaderboard::sort_rows(rows, key);
        println!("Leaderboard as of {}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
        print!("{}", leaderboard::render(&rows));
        Ok(())
    }

    async fn process_account(&self, account: &Account) -> Row {
        match self.backend.fetch_rank(&account.riot_id, &account.server).await {
            Ok(live) => leaderboard::build_row(account, Some(&live)),
            Err(e) => {
                error!("lookup failed for {}: {:#}", account.riot_id, e);
                leaderboard::build_row(account, None)
            }
        }
    }

    async fn add(&self, args: &[String]) -> anyhow::Result<()> {
        if args.len() < 5 {
            anyhow::bail!("usage: add <player> <riotId> <server> <peakTier> <peakDivision> [peakLP]");
        }
        let division = match args[4].as_str() {
            "none" | "None" => "",
            d => d,
        };
        // Malformed LP is recorded as 0, same as everywhere else
        let peak_lp = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(0);
        let account = NewAccount {
            player: args[0].clone(),
            riot_id: args[1].clone(),
            server: args[2].clone(),
            peak_rank: args[3].clone(),
            peak_division: division.to_string(),
            peak_lp,
        };
        self.backend.add_account(&account).await?;
        info!("Added {} ({}).", account.player, account.riot_id);
        Ok(())
    }
}
