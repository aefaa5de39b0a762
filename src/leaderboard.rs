use std::collections::HashMap;

use crate::backend::{Account, LiveRank};
use crate::rank_points::points_for_rank;

/// One rendered leaderboard entry. Rebuilt from scratch on every
/// refresh, never updated in place.
#[derive(Debug, Clone)]
pub struct Row {
    pub player: String,
    pub riot_id: String,
    pub server: String,
    pub tier_icon: String,
    pub display_rank: String,
    pub current_points: i32,
    /// Progress: current points minus peak points.
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Absolute rank, best first.
    Rank,
    /// Progress since peak, one best entry per player.
    Points,
    /// Grouped by server, rank order within each server.
    Server,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<SortKey> {
        match s {
            "rank" => Some(SortKey::Rank),
            "points" => Some(SortKey::Points),
            "server" => Some(SortKey::Server),
            _ => None,
        }
    }
}

/// Joins a tracked account with its live lookup result.
///
/// `live: None` means the lookup itself failed; that is scored exactly
/// like an unranked account (full regression from peak) so one bad
/// lookup never knocks the whole board over. Only the display label
/// tells the two cases apart.
pub fn build_row(account: &Account, live: Option<&LiveRank>) -> Row {
    let peak = points_for_rank(&account.peak_tier, &account.peak_division, account.peak_lp);

    match live {
        Some(r) if r.ranked => {
            let current = points_for_rank(&r.tier, &r.division, r.lp);
            Row {
                player: account.player.clone(),
                riot_id: account.riot_id.clone(),
                server: account.server.clone(),
                tier_icon: r.tier.to_lowercase(),
                display_rank: display_rank(&r.tier, &r.division, r.lp),
                current_points: current,
                points: current - peak,
            }
        }
        Some(_) => fallback_row(account, "Unranked", peak),
        None => fallback_row(account, "Invalid", peak),
    }
}

fn fallback_row(account: &Account, label: &str, peak: i32) -> Row {
    Row {
        player: account.player.clone(),
        riot_id: account.riot_id.clone(),
        server: account.server.clone(),
        tier_icon: "unranked".to_string(),
        display_rank: label.to_string(),
        current_points: 0,
        points: -peak,
    }
}

pub fn display_rank(tier: &str, division: &str, lp: i32) -> String {
    if division.is_empty() {
        format!("{} {} LP", tier, lp)
    } else {
        format!("{} {} {} LP", tier, division, lp)
    }
}

pub fn sort_rows(mut rows: Vec<Row>, key: SortKey) -> Vec<Row> {
    match key {
        SortKey::Rank => {
            rows.sort_by(|a, b| b.current_points.cmp(&a.current_points));
            rows
        }
        SortKey::Points => {
            let mut best: HashMap<String, Row> = HashMap::new();
            for row in rows {
                let keep = match best.get(&row.player) {
                    Some(existing) => row.points > existing.points,
                    None => true,
                };
                if keep {
                    best.insert(row.player.clone(), row);
                }
            }
            let mut rows: Vec<Row> = best.into_iter().map(|(_, row)| row).collect();
            rows.sort_by(|a, b| b.points.cmp(&a.points));
            rows
        }
        SortKey::Server => {
            rows.sort_by(|a, b| b.current_points.cmp(&a.current_points));
            // Stable sort keeps the rank order inside each server group
            rows.sort_by(|a, b| a.server.cmp(&b.server));
            rows
        }
    }
}

pub fn render(rows: &[Row]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:<24} {:<7} {:<24} {:>7}\n",
        "PLAYER", "RIOT ID", "SERVER", "RANK", "POINTS"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<16} {:<24} {:<7} {:<24} {:>7}\n",
            row.player,
            row.riot_id,
            row.server.to_uppercase(),
            row.display_rank,
            row.points
        ));
    }
    out
}
