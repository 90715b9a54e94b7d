use std::path::Path;

use async_trait::async_trait;

use fwlens_core::browse::Detail;
use fwlens_core::model::{LogEntry, LogKind, NatRule, RemoteUser, SecurityRule, Session};
use fwlens_core::provider::{Provider, ProviderError, ViewKind};

use super::{SnapshotData, detail_for};

/// Serves a captured appliance snapshot from a JSON file. Every refresh
/// returns the same data; useful for inspecting an incident offline.
pub struct ReplayProvider {
    data: SnapshotData,
}

impl ReplayProvider {
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProviderError::Connect {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let data: SnapshotData =
            serde_json::from_str(content).map_err(|e| ProviderError::Decode {
                reason: e.to_string(),
            })?;
        Ok(Self { data })
    }
}

#[async_trait]
impl Provider for ReplayProvider {
    fn name(&self) -> &'static str {
        "replay"
    }

    async fn fetch_sessions(&mut self) -> Result<Vec<Session>, ProviderError> {
        Ok(self.data.sessions.clone())
    }

    async fn fetch_rules(&mut self) -> Result<Vec<SecurityRule>, ProviderError> {
        Ok(self.data.rules.clone())
    }

    async fn fetch_nat_rules(&mut self) -> Result<Vec<NatRule>, ProviderError> {
        Ok(self.data.nat_rules.clone())
    }

    async fn fetch_logs(&mut self, kind: LogKind) -> Result<Vec<LogEntry>, ProviderError> {
        Ok(self.data.logs.iter().filter(|e| e.kind() == kind).cloned().collect())
    }

    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>, ProviderError> {
        Ok(self.data.users.clone())
    }

    async fn fetch_detail(
        &mut self,
        view: ViewKind,
        id: &str,
    ) -> Result<Detail, ProviderError> {
        detail_for(&self.data, view, id).ok_or_else(|| ProviderError::Backend {
            reason: format!("no such item: {}", id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sessions": [{
            "id": 42,
            "application": "ssh",
            "protocol": "tcp",
            "src_ip": "10.1.1.5",
            "dst_ip": "10.2.0.9",
            "src_zone": "trust",
            "dst_zone": "dmz",
            "rule": "allow-ssh-mgmt",
            "bytes": 9000,
            "start_epoch": 1700000000
        }],
        "logs": [{
            "kind": "system",
            "at_epoch": 1700000100,
            "event_type": "config",
            "description": "configuration committed",
            "severity": "informational"
        }]
    }"#;

    #[tokio::test]
    async fn decodes_and_serves_a_snapshot() {
        let mut provider = ReplayProvider::from_json(SAMPLE).unwrap();
        let sessions = provider.fetch_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].application, "ssh");
        assert!(provider.fetch_rules().await.unwrap().is_empty());
        let logs = provider.fetch_logs(LogKind::System).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert!(provider.fetch_logs(LogKind::Threat).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_malformed_documents() {
        assert!(matches!(
            ReplayProvider::from_json("{ nope"),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn detail_round_trip() {
        let mut provider = ReplayProvider::from_json(SAMPLE).unwrap();
        let detail = provider.fetch_detail(ViewKind::Sessions, "42").await.unwrap();
        assert!(detail.fields.iter().any(|(k, v)| k == "rule" && v == "allow-ssh-mgmt"));
        assert!(provider.fetch_detail(ViewKind::Sessions, "99").await.is_err());
    }
}
