use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rank_points::{coerce_lp, normalize_tier};

pub const DEFAULT_BACKEND: &str = "https://lol-ranked-backend-production.up.railway.app";

/// A tracked account as stored by the backend. Wire keys are all
/// lowercase, peak LP sometimes arrives as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: i64,
    pub player: String,
    #[serde(rename = "riotid")]
    pub riot_id: String,
    pub server: String,
    #[serde(rename = "peakrank", default)]
    pub peak_tier: String,
    #[serde(rename = "peakdivision", default)]
    pub peak_division: String,
    #[serde(rename = "peaklp", default, deserialize_with = "lp_field")]
    pub peak_lp: i32,
}

/// Body for `POST /accounts`. The backend expects camelCase here,
/// unlike what it hands back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub player: String,
    pub riot_id: String,
    pub server: String,
    pub peak_rank: String,
    pub peak_division: String,
    #[serde(rename = "peakLP")]
    pub peak_lp: i32,
}

/// One live ranked lookup, already normalized.
#[derive(Debug, Clone)]
pub struct LiveRank {
    pub ranked: bool,
    pub tier: String,
    pub division: String,
    pub lp: i32,
}

fn lp_field<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_lp(&value))
}

/// `{success, data}` envelope around the account list. `success: false`
/// means an empty board, not an error.
pub fn parse_accounts(body: &Value) -> anyhow::Result<Vec<Account>> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Ok(Vec::new());
    }
    let data = body.get("data").cloned().unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(data).context("account list has unexpected shape")
}

/// Field-by-field tolerant parse of the ranked endpoint's payload.
/// Tier case varies between servers, `rank` is absent above Diamond,
/// `lp` is occasionally stringly.
pub fn parse_live_rank(body: &Value) -> LiveRank {
    let ranked = body.get("ranked").and_then(Value::as_bool).unwrap_or(false);
    let tier = body
        .get("tier")
        .and_then(Value::as_str)
        .map(normalize_tier)
        .unwrap_or_default();
    let division = body
        .get("rank")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let lp = body.get("lp").map(coerce_lp).unwrap_or(0);
    LiveRank { ranked, tier, division, lp }
}

pub struct Backend {
    http: reqwest::Client,
    base_url: String,
}

impl Backend {
    pub fn new(base_url: String) -> Self {
        Backend {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn fetch_accounts(&self) -> anyhow::Result<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        let body: Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("GET {} returned malformed json", url))?;
        parse_accounts(&body)
    }

    pub async fn fetch_rank(&self, riot_id: &str, server: &str) -> anyhow::Result<LiveRank> {
        let url = format!("{}/rank", self.base_url);
        let body: Value = self
            .http
            .get(&url)
            .query(&[("riotId", riot_id), ("server", server)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("rank lookup for {} ({}) failed", riot_id, server))?;
        debug!("rank payload for {}: {}", riot_id, body);
        Ok(parse_live_rank(&body))
    }

    pub async fn add_account(&self, account: &NewAccount) -> anyhow::Result<()> {
        let url = format!("{}/accounts", self.base_url);
        self.http
            .post(&url)
            .json(account)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("POST {} rejected", url))?;
        Ok(())
    }

    pub async fn delete_account(&self, id: i64) -> anyhow::Result<()> {
        let url = format!("{}/accounts/{}", self.base_url, id);
        self.http
            .delete(&url)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("DELETE {} rejected", url))?;
        Ok(())
    }

    /// Removes every account belonging to one display name.
    pub async fn delete_player(&self, player: &str) -> anyhow::Result<()> {
        let url = format!("{}/accounts/player/{}", self.base_url, player);
        self.http
            .delete(&url)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("DELETE {} rejected", url))?;
        Ok(())
    }
}
