// src/ledger/lcd.rs
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cosmrs::{AccountId, Coin};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{AccountInfo, Ledger, TxResponse};
use crate::error::LedgerError;

/// Cosmos SDK REST (LCD) endpoint.
#[derive(Debug, Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    base: String,
}

#[derive(Deserialize)]
struct TxEnvelope {
    tx_response: TxResponse,
}

#[derive(Deserialize)]
struct SimulateResponse {
    gas_info: GasInfo,
}

#[derive(Deserialize)]
struct GasInfo {
    gas_used: String,
}

#[derive(Deserialize)]
struct TaxResponse {
    #[serde(default)]
    tax_amount: Vec<TaxCoin>,
}

#[derive(Deserialize)]
struct TaxCoin {
    denom: String,
    amount: String,
}

impl TaxCoin {
    fn into_coin(self) -> Result<Coin, LedgerError> {
        let amount = self
            .amount
            .parse()
            .map_err(|_| LedgerError::Decode(format!("tax amount is not a number: {}", self.amount)))?;
        Ok(Coin {
            denom: self.denom.parse().map_err(LedgerError::sdk)?,
            amount,
        })
    }
}

/// Normalised LCD base URL: http or https with a host, no trailing slash.
pub fn lcd_base_url(url: &str) -> Result<String, LedgerError> {
    let parsed = url::Url::parse(url).map_err(|e| LedgerError::Decode(format!("invalid LCD url {url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(LedgerError::Decode(format!("LCD url must be http(s) with a host: {url}")));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

impl LcdClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let base = lcd_base_url(url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    async fn read<T: DeserializeOwned>(url: String, resp: reqwest::Response) -> Result<T, LedgerError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Node {
                status: status.as_u16(),
                url,
                body,
            });
        }
        Ok(resp.json().await?)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, LedgerError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        Self::read(url, resp).await
    }
}

/// Account numbers sit on the base account, which vesting accounts nest.
fn base_account(account: &Value) -> Option<&Value> {
    if account.get("account_number").is_some() {
        return Some(account);
    }
    account
        .get("base_account")
        .or_else(|| account.get("base_vesting_account"))
        .and_then(base_account)
}

fn number(value: &Value, field: &str) -> Result<u64, LedgerError> {
    match value.get(field) {
        Some(Value::String(s)) => s.parse().map_err(|_| LedgerError::Decode(format!("{field} is not a number: {s}"))),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| LedgerError::Decode(format!("{field} out of range: {n}"))),
        // fresh accounts omit a zero sequence
        None if field == "sequence" => Ok(0),
        _ => Err(LedgerError::Decode(format!("missing {field}"))),
    }
}

fn parse_account(body: &Value) -> Result<AccountInfo, LedgerError> {
    let account = body
        .get("account")
        .and_then(base_account)
        .ok_or_else(|| LedgerError::Decode(format!("no base account in {body}")))?;
    Ok(AccountInfo {
        account_number: number(account, "account_number")?,
        sequence: number(account, "sequence")?,
    })
}

#[async_trait]
impl Ledger for LcdClient {
    async fn account(&self, address: &AccountId) -> Result<AccountInfo, LedgerError> {
        let url = self.endpoint(&format!("cosmos/auth/v1beta1/accounts/{address}"));
        let resp = self.http.get(&url).send().await?;
        let body: Value = Self::read(url, resp).await?;
        parse_account(&body)
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, LedgerError> {
        let body = json!({ "tx_bytes": STANDARD.encode(tx_bytes) });
        let resp: SimulateResponse = self.post("cosmos/tx/v1beta1/simulate", &body).await?;
        resp.gas_info
            .gas_used
            .parse()
            .map_err(|_| LedgerError::Decode(format!("gas_used is not a number: {}", resp.gas_info.gas_used)))
    }

    async fn compute_tax(&self, tx_bytes: &[u8]) -> Result<Vec<Coin>, LedgerError> {
        let body = json!({ "tx_bytes": STANDARD.encode(tx_bytes) });
        let resp: TaxResponse = self.post("terra/tx/v1beta1/compute_tax", &body).await?;
        resp.tax_amount.into_iter().map(TaxCoin::into_coin).collect()
    }

    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, LedgerError> {
        let body = json!({
            "tx_bytes": STANDARD.encode(tx_bytes),
            "mode": "BROADCAST_MODE_SYNC",
        });
        let resp: TxEnvelope = self.post("cosmos/tx/v1beta1/txs", &body).await?;
        Ok(resp.tx_response)
    }

    async fn tx(&self, hash: &str) -> Result<Option<TxResponse>, LedgerError> {
        let url = self.endpoint(&format!("cosmos/tx/v1beta1/txs/{hash}"));
        let resp = self.http.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: TxEnvelope = Self::read(url, resp).await?;
        Ok(Some(envelope.tx_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let client = LcdClient::new("https://bombay-lcd.terra.dev/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("cosmos/tx/v1beta1/txs"),
            "https://bombay-lcd.terra.dev/cosmos/tx/v1beta1/txs"
        );
    }

    #[test]
    fn new_rejects_garbage_url() {
        assert!(LcdClient::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn base_url_must_be_http_with_host() {
        assert_eq!(lcd_base_url("http://localhost:1317/").unwrap(), "http://localhost:1317");
        assert!(lcd_base_url("ftp://lcd.example.com").is_err());
        assert!(lcd_base_url("unix:/var/run/lcd.sock").is_err());
    }

    #[test]
    fn tax_coins_decode() {
        let resp: TaxResponse =
            serde_json::from_value(json!({"tax_amount": [{"denom": "uusd", "amount": "1250000"}]})).unwrap();
        let coins: Vec<Coin> = resp.tax_amount.into_iter().map(|c| c.into_coin().unwrap()).collect();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].amount, 1_250_000);
        assert_eq!(coins[0].denom.to_string(), "uusd");

        let empty: TaxResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.tax_amount.is_empty());
    }

    #[test]
    fn parses_base_account() {
        let body = json!({
            "account": {
                "@type": "/cosmos.auth.v1beta1.BaseAccount",
                "address": "terra1xyz",
                "account_number": "41",
                "sequence": "7"
            }
        });
        assert_eq!(
            parse_account(&body).unwrap(),
            AccountInfo {
                account_number: 41,
                sequence: 7
            }
        );
    }

    #[test]
    fn parses_nested_vesting_account() {
        let body = json!({
            "account": {
                "@type": "/cosmos.vesting.v1beta1.ContinuousVestingAccount",
                "base_vesting_account": {
                    "base_account": {"address": "terra1xyz", "account_number": "3"},
                    "original_vesting": []
                }
            }
        });
        assert_eq!(
            parse_account(&body).unwrap(),
            AccountInfo {
                account_number: 3,
                sequence: 0
            }
        );
    }

    #[test]
    fn missing_account_is_an_error() {
        assert!(parse_account(&json!({"code": 5, "message": "not found"})).is_err());
    }
}
