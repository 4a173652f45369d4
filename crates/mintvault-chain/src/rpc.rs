//! JSON-RPC client for account reads
//!
//! Thin wrapper over the node's HTTP endpoint covering only the calls the
//! backup pipeline needs: a connection probe, raw account fetches and the
//! owner's parsed token-account listing.

use crate::error::ChainError;
use crate::pubkey::Pubkey;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// The token program owning all token accounts
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Raw account contents returned by the node
#[derive(Debug, Clone)]
pub struct AccountData {
    /// Program that owns the account
    pub owner: Pubkey,
    /// Account balance in lamports
    pub lamports: u64,
    /// Decoded account payload
    pub data: Vec<u8>,
}

/// A token account as reported by the parsed listing
#[derive(Debug, Clone)]
pub struct TokenAccountView {
    /// Address of the token account itself
    pub pubkey: Pubkey,
    /// Parsed account JSON as returned by the node
    pub parsed: Value,
}

/// RPC client bound to one endpoint with a fixed request timeout
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RpcClient {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mintvault/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// Probe the endpoint; succeeds if the node answers `getVersion`
    pub async fn get_version(&self) -> Result<String, ChainError> {
        let result = self.call("getVersion", json!([])).await?;
        let version = result
            .get("solana-core")
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::MalformedResponse("missing solana-core version".into()))?;
        Ok(version.to_string())
    }

    /// Fetch a raw account
    ///
    /// # Errors
    /// [`ChainError::AccountNotFound`] when the account does not exist,
    /// distinct from transport and decode failures.
    pub async fn get_account_info(&self, pubkey: &Pubkey) -> Result<AccountData, ChainError> {
        let params = json!([pubkey.to_string(), { "encoding": "base64" }]);
        let result = self.call("getAccountInfo", params).await?;

        let value = result.get("value").unwrap_or(&Value::Null);
        if value.is_null() {
            return Err(ChainError::AccountNotFound(*pubkey));
        }

        let owner = value
            .get("owner")
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::MalformedResponse("account missing owner".into()))?
            .parse()?;
        let lamports = value.get("lamports").and_then(Value::as_u64).unwrap_or(0);

        let encoded = value
            .get("data")
            .and_then(Value::as_array)
            .and_then(|pair| pair.first())
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::MalformedResponse("account missing data".into()))?;
        let data = base64::engine::general_purpose::STANDARD.decode(encoded)?;

        Ok(AccountData {
            owner,
            lamports,
            data,
        })
    }

    /// List the owner's token accounts with node-side parsing
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountView>, ChainError> {
        let params = json!([
            owner.to_string(),
            { "programId": TOKEN_PROGRAM_ID },
            { "encoding": "jsonParsed" }
        ]);
        let result = self.call("getTokenAccountsByOwner", params).await?;

        let entries = result
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| ChainError::MalformedResponse("missing token account list".into()))?;

        let mut accounts = Vec::with_capacity(entries.len());
        for entry in entries {
            let pubkey: Pubkey = entry
                .get("pubkey")
                .and_then(Value::as_str)
                .ok_or_else(|| ChainError::MalformedResponse("token account missing pubkey".into()))?
                .parse()?;
            accounts.push(TokenAccountView {
                pubkey,
                parsed: entry.get("account").cloned().unwrap_or(Value::Null),
            });
        }
        Ok(accounts)
    }

    /// Find the owner's token account holding the given mint
    ///
    /// # Errors
    /// [`ChainError::TokenAccountNotFound`] when no listed account holds
    /// the mint.
    pub async fn find_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, ChainError> {
        let accounts = self.get_token_accounts_by_owner(owner).await?;
        let wanted = mint.to_string();
        for account in &accounts {
            if token_account_mint(&account.parsed) == Some(wanted.as_str()) {
                return Ok(account.pubkey);
            }
        }
        Err(ChainError::TokenAccountNotFound(*mint))
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        tracing::debug!("rpc call: {method}");

        let envelope: RpcEnvelope = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| ChainError::MalformedResponse("missing result".into()))
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Extract the mint address from a parsed token-account value
///
/// Parsed account JSON in the wild nests the token info either under
/// `data.parsed.info` or directly under `info`; both shapes are walked
/// explicitly rather than reflected over at call sites.
fn token_account_mint(account: &Value) -> Option<&str> {
    let info = account
        .get("data")
        .and_then(|data| data.get("parsed"))
        .and_then(|parsed| parsed.get("info"))
        .or_else(|| account.get("info"))?;
    info.get("mint").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_mint_from_parsed_shape() {
        let account = json!({
            "data": {
                "parsed": {
                    "info": { "mint": "So11111111111111111111111111111111111111112" },
                    "type": "account"
                },
                "program": "spl-token"
            }
        });
        assert_eq!(
            token_account_mint(&account),
            Some("So11111111111111111111111111111111111111112")
        );
    }

    #[test]
    fn extracts_mint_from_flat_shape() {
        let account = json!({
            "info": { "mint": "4Nd1mYwqrRYhd8eEnzUVnGFrMLkvpfoVjNmumdAKo5nf" }
        });
        assert_eq!(
            token_account_mint(&account),
            Some("4Nd1mYwqrRYhd8eEnzUVnGFrMLkvpfoVjNmumdAKo5nf")
        );
    }

    #[test]
    fn missing_mint_is_none() {
        assert_eq!(token_account_mint(&json!({})), None);
        assert_eq!(token_account_mint(&json!({"data": {"parsed": {}}})), None);
    }
}
