use std::path::Path;

use ethers::abi::Abi;
use rust_embed::RustEmbed;
use tracing::info;

use crate::error::ChainError;

/// Embedded Hardhat artifacts shipped with the client.
#[derive(RustEmbed)]
#[folder = "../../assets"]
struct Artifacts;

/// File name of the embedded voting token artifact.
pub const TOKEN_ARTIFACT: &str = "MyToken.json";
/// File name of the embedded ballot artifact.
pub const BALLOT_ARTIFACT: &str = "Ballot.json";

/// Methods the dashboard calls on the token contract.
pub const TOKEN_METHODS: &[&str] = &["balanceOf", "getVotes", "delegate"];
/// Methods the dashboard calls on the ballot contract.
pub const BALLOT_METHODS: &[&str] = &[
    "vote",
    "winnerName",
    "winningProposal",
    "targetBlock",
    "proposals",
    "votingPower",
];

/// A named contract ABI.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: Abi,
}

impl ContractArtifact {
    /// Parse either a compiler artifact (`{ "abi": [...] }`) or a bare ABI array.
    pub fn from_json(name: &str, json: &str) -> Result<Self, ChainError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ChainError::Abi(format!("{name}: invalid JSON: {e}")))?;

        let abi_value = match value {
            serde_json::Value::Array(_) => value,
            serde_json::Value::Object(mut obj) => obj
                .remove("abi")
                .ok_or_else(|| ChainError::Abi(format!("{name}: artifact has no `abi` field")))?,
            _ => {
                return Err(ChainError::Abi(format!(
                    "{name}: expected an ABI array or an artifact object"
                )));
            }
        };

        let abi: Abi = serde_json::from_value(abi_value)
            .map_err(|e| ChainError::Abi(format!("{name}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            abi,
        })
    }

    /// Load an artifact from disk.
    pub fn from_path(path: &Path) -> Result<Self, ChainError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ChainError::Abi(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let artifact = Self::from_json(&name, &json)?;
        info!(path = %path.display(), functions = artifact.abi.functions.len(), "ABI loaded");
        Ok(artifact)
    }

    /// Load one of the artifacts bundled into the binary.
    pub fn embedded(file: &str) -> Result<Self, ChainError> {
        let asset = Artifacts::get(file)
            .ok_or_else(|| ChainError::Abi(format!("no embedded artifact named {file}")))?;
        let json = std::str::from_utf8(&asset.data)
            .map_err(|e| ChainError::Abi(format!("{file}: {e}")))?;
        Self::from_json(file, json)
    }

    /// Token ABI from `path`, or the embedded one.
    pub fn token(path: Option<&Path>) -> Result<Self, ChainError> {
        let artifact = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::embedded(TOKEN_ARTIFACT)?,
        };
        artifact.require_functions(TOKEN_METHODS)?;
        Ok(artifact)
    }

    /// Ballot ABI from `path`, or the embedded one.
    pub fn ballot(path: Option<&Path>) -> Result<Self, ChainError> {
        let artifact = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::embedded(BALLOT_ARTIFACT)?,
        };
        artifact.require_functions(BALLOT_METHODS)?;
        Ok(artifact)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.abi.functions.contains_key(name)
    }

    /// Fail fast when an override ABI lacks a method the dashboard calls.
    pub fn require_functions(&self, names: &[&str]) -> Result<(), ChainError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !self.has_function(n))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChainError::Abi(format!(
                "{}: missing functions: {}",
                self.name,
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_token_has_votes_interface() {
        let artifact = ContractArtifact::token(None).unwrap();
        assert_eq!(artifact.name, TOKEN_ARTIFACT);
        for method in TOKEN_METHODS {
            assert!(artifact.has_function(method), "missing {method}");
        }
    }

    #[test]
    fn embedded_ballot_has_tally_interface() {
        let artifact = ContractArtifact::ballot(None).unwrap();
        for method in BALLOT_METHODS {
            assert!(artifact.has_function(method), "missing {method}");
        }
        let vote = &artifact.abi.functions["vote"][0];
        assert_eq!(vote.inputs.len(), 2);
    }

    #[test]
    fn bare_array_is_accepted() {
        let json = r#"[{"type":"function","name":"winnerName","inputs":[],
            "outputs":[{"name":"","type":"bytes32"}],"stateMutability":"view"}]"#;
        let artifact = ContractArtifact::from_json("bare", json).unwrap();
        assert!(artifact.has_function("winnerName"));
    }

    #[test]
    fn object_without_abi_is_rejected() {
        let err = ContractArtifact::from_json("x", r#"{"bytecode":"0x"}"#).unwrap_err();
        assert!(err.to_string().contains("no `abi` field"));
    }

    #[test]
    fn require_functions_lists_missing() {
        let artifact = ContractArtifact::from_json("empty", "[]").unwrap();
        let err = artifact.require_functions(&["vote", "winnerName"]).unwrap_err();
        assert!(err.to_string().contains("vote, winnerName"));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Custom.json");
        std::fs::write(
            &path,
            r#"{"abi":[{"type":"function","name":"balanceOf",
                "inputs":[{"name":"a","type":"address"}],
                "outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}]}"#,
        )
        .unwrap();

        let artifact = ContractArtifact::from_path(&path).unwrap();
        assert_eq!(artifact.name, "Custom.json");
        assert!(artifact.has_function("balanceOf"));
        assert!(ContractArtifact::token(Some(&path)).is_err());
    }
}
