mod fake;
mod replay;

pub use fake::FakeProvider;
pub use replay::ReplayProvider;

use serde::{Deserialize, Serialize};

use fwlens_core::browse::{Browsable, Detail};
use fwlens_core::model::{LogEntry, NatRule, RemoteUser, SecurityRule, Session};
use fwlens_core::provider::ViewKind;

/// Complete appliance state as one document. The fake provider maintains
/// one of these between refreshes; the replay provider loads one from disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub rules: Vec<SecurityRule>,
    #[serde(default)]
    pub nat_rules: Vec<NatRule>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub users: Vec<RemoteUser>,
}

/// Format an epoch timestamp as HH:MM:SS for display
pub fn format_epoch(secs: i64) -> String {
    if secs < 0 {
        return "??:??:??".to_string();
    }
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a byte count with a binary unit suffix
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn field(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}

/// Build the extended detail payload for one item, looked up by identity.
/// Shared by the fake and replay providers.
pub fn detail_for(data: &SnapshotData, view: ViewKind, id: &str) -> Option<Detail> {
    let fields = match view {
        ViewKind::Sessions => {
            let s = data.sessions.iter().find(|s| s.identity() == id)?;
            vec![
                field("application", s.application.clone()),
                field("protocol", s.protocol.clone()),
                field("source", format!("{} ({})", s.src_ip, s.src_zone)),
                field("destination", format!("{} ({})", s.dst_ip, s.dst_zone)),
                field("rule", s.rule.clone()),
                field("user", s.user.clone().unwrap_or_else(|| "-".into())),
                field("bytes", format_bytes(s.bytes)),
                field("started", format_epoch(s.start_epoch)),
            ]
        }
        ViewKind::Rules => {
            let r = data.rules.iter().find(|r| r.identity() == id)?;
            vec![
                field("position", r.position.to_string()),
                field("from", r.src_zones.join(", ")),
                field("to", r.dst_zones.join(", ")),
                field("source", r.src_addrs.join(", ")),
                field("destination", r.dst_addrs.join(", ")),
                field("application", r.application.clone()),
                field("service", r.service.clone()),
                field("action", r.action.label()),
                field("state", if r.disabled { "disabled" } else { "enabled" }),
                field("hits", r.hit_count.to_string()),
                field(
                    "last hit",
                    r.last_hit_epoch.map(format_epoch).unwrap_or_else(|| "never".into()),
                ),
            ]
        }
        ViewKind::Nat => {
            let n = data.nat_rules.iter().find(|n| n.identity() == id)?;
            vec![
                field("position", n.position.to_string()),
                field("from", n.src_zones.join(", ")),
                field("to", n.dst_zone.clone()),
                field("original src", n.original_src.clone()),
                field("original dst", n.original_dst.clone()),
                field("translated src", n.translated_src.clone()),
                field(
                    "translated dst",
                    n.translated_dst.clone().unwrap_or_else(|| "-".into()),
                ),
                field("service", n.service.clone()),
                field("hits", n.hit_count.to_string()),
            ]
        }
        ViewKind::Logs(_) => {
            let entry = data.logs.iter().find(|e| e.identity() == id)?;
            match entry {
                LogEntry::System { at_epoch, event_type, description, severity, object } => vec![
                    field("time", format_epoch(*at_epoch)),
                    field("type", event_type.clone()),
                    field("severity", severity.label()),
                    field("description", description.clone()),
                    field("object", object.clone().unwrap_or_else(|| "-".into())),
                ],
                LogEntry::Traffic {
                    at_epoch, src_ip, dst_ip, application, rule, action, user, bytes,
                } => vec![
                    field("time", format_epoch(*at_epoch)),
                    field("source", src_ip.clone()),
                    field("destination", dst_ip.clone()),
                    field("application", application.clone()),
                    field("rule", rule.clone()),
                    field("action", action.clone()),
                    field("user", user.clone().unwrap_or_else(|| "-".into())),
                    field("bytes", format_bytes(*bytes)),
                ],
                LogEntry::Threat {
                    at_epoch, threat_name, category, severity, action, src_ip, dst_ip,
                } => vec![
                    field("time", format_epoch(*at_epoch)),
                    field("threat", threat_name.clone()),
                    field("category", category.clone()),
                    field("severity", severity.label()),
                    field("action", action.clone()),
                    field("source", src_ip.clone()),
                    field("destination", dst_ip.clone()),
                ],
            }
        }
        ViewKind::Users => {
            let u = data.users.iter().find(|u| u.identity() == id)?;
            vec![
                field("username", u.username.clone()),
                field("client ip", u.client_ip.clone()),
                field("gateway", u.gateway.clone()),
                field("tunnel", u.tunnel_type.clone().unwrap_or_else(|| "-".into())),
                field("logged in", format_epoch(u.login_epoch)),
            ]
        }
    };
    Some(Detail { id: id.to_string(), fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwlens_core::model::LogKind;

    #[test]
    fn format_bytes_scales() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn detail_lookup_misses_return_none() {
        let data = SnapshotData::default();
        assert!(detail_for(&data, ViewKind::Sessions, "1").is_none());
        assert!(detail_for(&data, ViewKind::Logs(LogKind::System), "x").is_none());
    }
}
