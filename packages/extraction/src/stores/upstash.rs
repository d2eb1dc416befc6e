//! Upstash Redis over its REST API.
//!
//! Each command is a JSON array POSTed to the base URL with a bearer token.
//! The reply is `{"result": ...}` on success or `{"error": "..."}`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{KvError, KvResult};
use crate::security::KvCredentials;
use crate::traits::kv::KvStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct UpstashKv {
    credentials: KvCredentials,
    client: reqwest::Client,
}

impl UpstashKv {
    pub fn new(credentials: KvCredentials) -> KvResult<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            credentials,
            client,
        })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn command(&self, args: Vec<String>) -> KvResult<Value> {
        let name = args.first().cloned().unwrap_or_default();
        debug!(command = %name, "KV command");

        let response = self
            .client
            .post(&self.credentials.url)
            .bearer_auth(self.credentials.token.expose())
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(mut reply)) => {
                if let Some(error) = reply.remove("error") {
                    return Err(KvError::Command {
                        command: name,
                        message: error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()),
                    });
                }
                if !status.is_success() {
                    return Err(KvError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                reply.remove("result").ok_or_else(|| KvError::UnexpectedResponse {
                    command: name,
                    detail: "reply has no result field".to_string(),
                })
            }
            _ if !status.is_success() => Err(KvError::Status {
                status: status.as_u16(),
                body,
            }),
            _ => Err(KvError::UnexpectedResponse {
                command: name,
                detail: format!("not a JSON object: {}", body),
            }),
        }
    }
}

fn ttl_seconds(ttl: Duration) -> String {
    ttl.as_secs().max(1).to_string()
}

/// Escape glob metacharacters for KEYS patterns.
fn glob_escape(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unexpected(command: &str, value: &Value) -> KvError {
    KvError::UnexpectedResponse {
        command: command.to_string(),
        detail: value.to_string(),
    }
}

fn as_integer(command: &str, value: Value) -> KvResult<i64> {
    match &value {
        Value::Number(n) => n.as_i64().ok_or_else(|| unexpected(command, &value)),
        Value::String(s) => s.parse().map_err(|_| unexpected(command, &value)),
        _ => Err(unexpected(command, &value)),
    }
}

fn as_string_list(command: &str, value: Value) -> KvResult<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(unexpected(command, &other)),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(unexpected(command, &other)),
    }
}

/// HGETALL replies as a flat `[field, value, ...]` array (or an object).
fn as_hash(command: &str, value: Value) -> KvResult<HashMap<String, String>> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(field, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (field, value)
            })
            .collect()),
        other => {
            let flat = as_string_list(command, other)?;
            Ok(flat
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect())
        }
    }
}

#[async_trait]
impl KvStore for UpstashKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        match self.command(vec!["GET".into(), key.into()]).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(unexpected("GET", &other)),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()> {
        self.command(vec![
            "SET".into(),
            key.into(),
            value.into(),
            "EX".into(),
            ttl_seconds(ttl),
        ])
        .await?;
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> KvResult<Vec<String>> {
        let pattern = format!("{}*", glob_escape(prefix));
        let reply = self.command(vec!["KEYS".into(), pattern]).await?;
        as_string_list("KEYS", reply)
    }

    async fn delete(&self, keys: &[String]) -> KvResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut args = vec!["DEL".to_string()];
        args.extend(keys.iter().cloned());
        let reply = self.command(args).await?;
        Ok(as_integer("DEL", reply)?.max(0) as usize)
    }

    async fn list_push(&self, key: &str, value: &str) -> KvResult<usize> {
        let reply = self
            .command(vec!["LPUSH".into(), key.into(), value.into()])
            .await?;
        Ok(as_integer("LPUSH", reply)?.max(0) as usize)
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>> {
        let reply = self
            .command(vec![
                "LRANGE".into(),
                key.into(),
                start.to_string(),
                stop.to_string(),
            ])
            .await?;
        as_string_list("LRANGE", reply)
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> KvResult<()> {
        self.command(vec![
            "LTRIM".into(),
            key.into(),
            start.to_string(),
            stop.to_string(),
        ])
        .await?;
        Ok(())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> KvResult<()> {
        self.command(vec!["HSET".into(), key.into(), field.into(), value.into()])
            .await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> KvResult<HashMap<String, String>> {
        let reply = self.command(vec!["HGETALL".into(), key.into()]).await?;
        as_hash("HGETALL", reply)
    }

    async fn hash_increment_by(&self, key: &str, field: &str, delta: i64) -> KvResult<i64> {
        let reply = self
            .command(vec![
                "HINCRBY".into(),
                key.into(),
                field.into(),
                delta.to_string(),
            ])
            .await?;
        as_integer("HINCRBY", reply)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        let reply = self
            .command(vec!["EXPIRE".into(), key.into(), ttl_seconds(ttl)])
            .await?;
        Ok(as_integer("EXPIRE", reply)? == 1)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_glob_escape() {
        assert_eq!(glob_escape("token:"), "token:");
        assert_eq!(glob_escape("a*b?[c]"), "a\\*b\\?\\[c\\]");
    }

    #[test]
    fn test_ttl_seconds_never_zero() {
        assert_eq!(ttl_seconds(Duration::from_millis(10)), "1");
        assert_eq!(ttl_seconds(Duration::from_secs(86_400)), "86400");
    }

    #[test]
    fn test_hash_reply_shapes() {
        let flat = as_hash("HGETALL", json!(["total_checks", "4", "last_execution", "x"])).unwrap();
        assert_eq!(flat.get("total_checks").map(String::as_str), Some("4"));
        assert_eq!(flat.len(), 2);

        let object = as_hash("HGETALL", json!({"total_checks": 4})).unwrap();
        assert_eq!(object.get("total_checks").map(String::as_str), Some("4"));

        assert!(as_hash("HGETALL", json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_integer_replies() {
        assert_eq!(as_integer("DEL", json!(3)).unwrap(), 3);
        assert_eq!(as_integer("DEL", json!("3")).unwrap(), 3);
        assert!(as_integer("DEL", json!(["x"])).is_err());
    }
}
