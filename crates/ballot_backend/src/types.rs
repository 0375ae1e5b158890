use serde::{Deserialize, Serialize};

/// Body of every POST the backend accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressRequest {
    pub address: String,
}

/// The backend wraps every payload as `{ "result": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

/// Response to `POST /claim-tokens`. The payload shape is backend-defined;
/// a transaction hash is recognized when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimResponse {
    pub raw: serde_json::Value,
}

impl ClaimResponse {
    /// The distribution transaction hash, if `result` is a 32-byte hex string.
    pub fn tx_hash(&self) -> Option<&str> {
        let result = self.raw.get("result")?.as_str()?;
        let digits = result.strip_prefix("0x")?;
        (digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

    #[test]
    fn address_request_serializes_as_object() {
        let body = AddressRequest {
            address: "0xabc".into(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"address": "0xabc"}));
    }

    #[test]
    fn api_response_tolerates_missing_result() {
        let parsed: ApiResponse<String> = serde_json::from_str("{}").unwrap();
        assert!(parsed.result.is_none());
        let parsed: ApiResponse<String> = serde_json::from_str(r#"{"result":"0x1"}"#).unwrap();
        assert_eq!(parsed.result.as_deref(), Some("0x1"));
    }

    #[test]
    fn claim_response_recognizes_tx_hash() {
        let resp = ClaimResponse {
            raw: json!({ "result": HASH }),
        };
        assert_eq!(resp.tx_hash(), Some(HASH));
    }

    #[test]
    fn claim_response_ignores_other_payloads() {
        for raw in [
            json!({ "result": true }),
            json!({ "result": "0x1234" }),
            json!({ "status": "ok" }),
            json!("plain"),
        ] {
            assert!(ClaimResponse { raw }.tx_hash().is_none());
        }
    }
}
