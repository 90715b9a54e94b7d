use serde::{Deserialize, Serialize};

/// Severity scale shared by system and threat logs. Ordered so comparators
/// can sort on it directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Action taken by a security rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleAction {
    Allow,
    Deny,
    Drop,
    ResetClient,
    ResetServer,
    ResetBoth,
}

impl RuleAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Drop => "drop",
            Self::ResetClient => "reset-client",
            Self::ResetServer => "reset-server",
            Self::ResetBoth => "reset-both",
        }
    }
}

impl std::fmt::Display for RuleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An active session on the appliance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub application: String,
    pub protocol: String,
    pub src_ip: String,
    pub dst_ip: String,
    pub src_zone: String,
    pub dst_zone: String,
    /// Name of the security rule the session matched.
    pub rule: String,
    #[serde(default)]
    pub user: Option<String>,
    pub bytes: u64,
    pub start_epoch: i64,
}

/// A security policy rule, in rulebase order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecurityRule {
    pub position: u32,
    pub name: String,
    pub src_zones: Vec<String>,
    pub dst_zones: Vec<String>,
    pub src_addrs: Vec<String>,
    pub dst_addrs: Vec<String>,
    pub application: String,
    pub service: String,
    pub action: RuleAction,
    #[serde(default)]
    pub disabled: bool,
    pub hit_count: u64,
    #[serde(default)]
    pub last_hit_epoch: Option<i64>,
}

/// A NAT policy rule, in rulebase order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NatRule {
    pub position: u32,
    pub name: String,
    pub src_zones: Vec<String>,
    pub dst_zone: String,
    pub original_src: String,
    pub original_dst: String,
    pub translated_src: String,
    #[serde(default)]
    pub translated_dst: Option<String>,
    pub service: String,
    pub hit_count: u64,
}

/// Which log rulebase a log view browses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Traffic,
    Threat,
}

impl LogKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Traffic => "traffic",
            Self::Threat => "threat",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::System => Self::Traffic,
            Self::Traffic => Self::Threat,
            Self::Threat => Self::System,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::System, Self::Traffic, Self::Threat]
    }
}

/// One log entry. The field set differs per log kind, so each kind is its
/// own variant rather than a bag of optionals.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogEntry {
    System {
        at_epoch: i64,
        event_type: String,
        description: String,
        severity: Severity,
        #[serde(default)]
        object: Option<String>,
    },
    Traffic {
        at_epoch: i64,
        src_ip: String,
        dst_ip: String,
        application: String,
        rule: String,
        action: String,
        #[serde(default)]
        user: Option<String>,
        bytes: u64,
    },
    Threat {
        at_epoch: i64,
        threat_name: String,
        category: String,
        severity: Severity,
        action: String,
        src_ip: String,
        dst_ip: String,
    },
}

impl LogEntry {
    pub fn kind(&self) -> LogKind {
        match self {
            Self::System { .. } => LogKind::System,
            Self::Traffic { .. } => LogKind::Traffic,
            Self::Threat { .. } => LogKind::Threat,
        }
    }

    pub fn at_epoch(&self) -> i64 {
        match self {
            Self::System { at_epoch, .. }
            | Self::Traffic { at_epoch, .. }
            | Self::Threat { at_epoch, .. } => *at_epoch,
        }
    }

    /// Severity for sorting. Traffic logs carry none and rank lowest.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::System { severity, .. } | Self::Threat { severity, .. } => Some(*severity),
            Self::Traffic { .. } => None,
        }
    }
}

/// A connected remote-access (VPN) user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteUser {
    pub username: String,
    pub client_ip: String,
    pub gateway: String,
    pub login_epoch: i64,
    #[serde(default)]
    pub tunnel_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Informational < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn log_kind_cycle_wraps() {
        assert_eq!(LogKind::System.next(), LogKind::Traffic);
        assert_eq!(LogKind::Traffic.next(), LogKind::Threat);
        assert_eq!(LogKind::Threat.next(), LogKind::System);
    }

    #[test]
    fn log_entry_deserializes_by_kind_tag() {
        let json = r#"{
            "kind": "threat",
            "at_epoch": 1700000000,
            "threat_name": "Generic.Trojan",
            "category": "spyware",
            "severity": "high",
            "action": "drop",
            "src_ip": "10.0.0.5",
            "dst_ip": "203.0.113.9"
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind(), LogKind::Threat);
        assert_eq!(entry.severity(), Some(Severity::High));
        assert_eq!(entry.at_epoch(), 1_700_000_000);
    }
}
