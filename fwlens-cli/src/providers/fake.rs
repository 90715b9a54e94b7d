use std::time::SystemTime;

use async_trait::async_trait;

use fwlens_core::browse::Detail;
use fwlens_core::model::{
    LogEntry, LogKind, NatRule, RemoteUser, RuleAction, SecurityRule, Session, Severity,
};
use fwlens_core::provider::{Provider, ProviderError, ViewKind};

use super::{SnapshotData, detail_for};

const APPS: [&str; 8] =
    ["web-browsing", "ssl", "dns", "ssh", "smtp", "ldap", "rdp", "mysql"];
const PROTOCOLS: [&str; 2] = ["tcp", "udp"];
const USERS: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];
const GATEWAYS: [&str; 2] = ["gw-east", "gw-west"];
const THREATS: [(&str, &str); 4] = [
    ("Eicar.Test.File", "virus"),
    ("Generic.Trojan.Downloader", "spyware"),
    ("SQL.Injection.Attempt", "vulnerability"),
    ("DNS.Tunneling.Detected", "command-and-control"),
];
const SYSTEM_EVENTS: [(&str, &str); 4] = [
    ("config", "configuration committed by admin"),
    ("ha", "high-availability peer heartbeat missed"),
    ("routing", "BGP peer session established"),
    ("general", "content update installed"),
];

/// Simulated appliance for demos and development. Deterministic for a
/// given seed; state churns a little on every refresh cycle so the
/// browsing behavior under mutation is visible.
pub struct FakeProvider {
    state: SnapshotData,
    rng: u64,
    tick: u64,
    fail_every: Option<u64>,
    log_page: usize,
}

impl FakeProvider {
    pub fn new(seed: u64, log_page: usize) -> Self {
        let mut provider = Self {
            state: SnapshotData::default(),
            rng: seed.wrapping_mul(2) | 1,
            tick: 0,
            fail_every: None,
            log_page,
        };
        provider.state.rules = provider.base_rules();
        provider.state.nat_rules = provider.base_nat();
        provider
    }

    /// Fail every Nth sessions fetch, to exercise the error path.
    pub fn with_failure_cadence(mut self, every: u64) -> Self {
        self.fail_every = Some(every.max(2));
        self
    }

    fn next(&mut self) -> u64 {
        self.rng = self
            .rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.rng >> 16
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next() as usize) % options.len()]
    }

    fn ip(&mut self, internal: bool) -> String {
        if internal {
            format!("10.{}.{}.{}", self.next() % 4, self.next() % 255, 1 + self.next() % 254)
        } else {
            format!("203.0.113.{}", 1 + self.next() % 254)
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn base_rules(&mut self) -> Vec<SecurityRule> {
        let specs: [(&str, &str, &str, &str, RuleAction); 8] = [
            ("allow-web-out", "trust", "untrust", "web-browsing", RuleAction::Allow),
            ("allow-dns-out", "trust", "untrust", "dns", RuleAction::Allow),
            ("allow-ssh-mgmt", "trust", "dmz", "ssh", RuleAction::Allow),
            ("dmz-mail-in", "untrust", "dmz", "smtp", RuleAction::Allow),
            ("vpn-to-trust", "vpn", "trust", "any", RuleAction::Allow),
            ("block-rdp-in", "untrust", "trust", "rdp", RuleAction::Deny),
            ("drop-p2p", "trust", "untrust", "bittorrent", RuleAction::Drop),
            ("deny-all", "any", "any", "any", RuleAction::Deny),
        ];
        let now = Self::now();
        specs
            .iter()
            .enumerate()
            .map(|(i, (name, from, to, app, action))| {
                let hits = self.next() % 5000;
                SecurityRule {
                    position: i as u32 + 1,
                    name: (*name).into(),
                    src_zones: vec![(*from).into()],
                    dst_zones: vec![(*to).into()],
                    src_addrs: vec!["any".into()],
                    dst_addrs: vec!["any".into()],
                    application: (*app).into(),
                    service: "application-default".into(),
                    action: *action,
                    disabled: false,
                    hit_count: hits,
                    last_hit_epoch: if hits > 0 {
                        Some(now - (self.next() % 86_400) as i64)
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    fn base_nat(&mut self) -> Vec<NatRule> {
        let now_hits = |s: &mut Self| s.next() % 900;
        vec![
            NatRule {
                position: 1,
                name: "outbound-snat".into(),
                src_zones: vec!["trust".into()],
                dst_zone: "untrust".into(),
                original_src: "10.0.0.0/8".into(),
                original_dst: "any".into(),
                translated_src: "203.0.113.1".into(),
                translated_dst: None,
                service: "any".into(),
                hit_count: now_hits(self),
            },
            NatRule {
                position: 2,
                name: "dmz-web-dnat".into(),
                src_zones: vec!["untrust".into()],
                dst_zone: "dmz".into(),
                original_src: "any".into(),
                original_dst: "203.0.113.10".into(),
                translated_src: "203.0.113.10".into(),
                translated_dst: Some("10.2.0.80".into()),
                service: "service-https".into(),
                hit_count: now_hits(self),
            },
            NatRule {
                position: 3,
                name: "dmz-mail-dnat".into(),
                src_zones: vec!["untrust".into()],
                dst_zone: "dmz".into(),
                original_src: "any".into(),
                original_dst: "203.0.113.25".into(),
                translated_src: "203.0.113.25".into(),
                translated_dst: Some("10.2.0.25".into()),
                service: "service-smtp".into(),
                hit_count: now_hits(self),
            },
        ]
    }

    fn churn_sessions(&mut self) {
        let now = Self::now();
        let target = 20 + (self.next() % 40) as usize;
        // Retire a few, keep the rest, top up with new ones.
        let keep = self.state.sessions.len().saturating_sub(1 + (self.next() % 5) as usize);
        self.state.sessions.truncate(keep);
        let mut next_id = self.state.sessions.iter().map(|s| s.id).max().unwrap_or(1000);
        while self.state.sessions.len() < target {
            next_id += 1;
            let app = self.pick(&APPS);
            let rule = match app {
                "web-browsing" | "ssl" => "allow-web-out",
                "dns" => "allow-dns-out",
                "ssh" => "allow-ssh-mgmt",
                "smtp" => "dmz-mail-in",
                _ => "vpn-to-trust",
            };
            let user = if self.next() % 3 == 0 {
                Some(self.pick(&USERS).to_string())
            } else {
                None
            };
            let src_ip = self.ip(true);
            let dst_ip = self.ip(false);
            let bytes = self.next() % 50_000_000;
            let age = (self.next() % 3600) as i64;
            let protocol = self.pick(&PROTOCOLS).into();
            self.state.sessions.push(Session {
                id: next_id,
                application: app.into(),
                protocol,
                src_ip,
                dst_ip,
                src_zone: "trust".into(),
                dst_zone: "untrust".into(),
                rule: rule.into(),
                user,
                bytes,
                start_epoch: now - age,
            });
        }
    }

    fn bump_rules(&mut self) {
        let now = Self::now();
        for i in 0..self.state.rules.len() {
            if self.next() % 3 == 0 {
                let bump = self.next() % 40;
                let rule = &mut self.state.rules[i];
                rule.hit_count += bump;
                if bump > 0 {
                    rule.last_hit_epoch = Some(now);
                }
            }
        }
    }

    fn emit_logs(&mut self) {
        let now = Self::now();
        let burst = 2 + (self.next() % 6) as usize;
        for _ in 0..burst {
            let entry = match self.next() % 5 {
                0 => {
                    let (event_type, description) =
                        SYSTEM_EVENTS[(self.next() as usize) % SYSTEM_EVENTS.len()];
                    LogEntry::System {
                        at_epoch: now,
                        event_type: event_type.into(),
                        description: description.into(),
                        severity: match self.next() % 4 {
                            0 => Severity::Medium,
                            1 => Severity::Low,
                            _ => Severity::Informational,
                        },
                        object: None,
                    }
                }
                1 => {
                    let (threat_name, category) =
                        THREATS[(self.next() as usize) % THREATS.len()];
                    let src_ip = self.ip(false);
                    let dst_ip = self.ip(true);
                    LogEntry::Threat {
                        at_epoch: now,
                        threat_name: threat_name.into(),
                        category: category.into(),
                        severity: match self.next() % 3 {
                            0 => Severity::Critical,
                            1 => Severity::High,
                            _ => Severity::Medium,
                        },
                        action: "drop".into(),
                        src_ip,
                        dst_ip,
                    }
                }
                _ => {
                    let app = self.pick(&APPS);
                    let user = if self.next() % 4 == 0 {
                        Some(self.pick(&USERS).to_string())
                    } else {
                        None
                    };
                    let src_ip = self.ip(true);
                    let dst_ip = self.ip(false);
                    let bytes = self.next() % 5_000_000;
                    LogEntry::Traffic {
                        at_epoch: now,
                        src_ip,
                        dst_ip,
                        application: app.into(),
                        rule: "allow-web-out".into(),
                        action: "allow".into(),
                        user,
                        bytes,
                    }
                }
            };
            self.state.logs.push(entry);
        }
        // Bound the buffer: newest entries live at the tail.
        let cap = self.log_page * 3;
        if self.state.logs.len() > cap {
            let drop = self.state.logs.len() - cap;
            self.state.logs.drain(..drop);
        }
    }

    fn churn_users(&mut self) {
        let now = Self::now();
        let target = 2 + (self.next() % 5) as usize;
        if self.state.users.len() > target {
            self.state.users.truncate(target);
        }
        while self.state.users.len() < target {
            let username = self.pick(&USERS).to_string();
            if self.state.users.iter().any(|u| u.username == username) {
                break;
            }
            let client_ip = self.ip(false);
            let gateway = self.pick(&GATEWAYS).to_string();
            let age = (self.next() % 14_400) as i64;
            self.state.users.push(RemoteUser {
                username,
                client_ip,
                gateway,
                login_epoch: now - age,
                tunnel_type: Some("ssl-vpn".into()),
            });
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_sessions(&mut self) -> Result<Vec<Session>, ProviderError> {
        self.tick += 1;
        if let Some(every) = self.fail_every {
            if self.tick % every == 0 {
                return Err(ProviderError::Backend {
                    reason: "simulated appliance timeout".into(),
                });
            }
        }
        self.churn_sessions();
        Ok(self.state.sessions.clone())
    }

    async fn fetch_rules(&mut self) -> Result<Vec<SecurityRule>, ProviderError> {
        self.bump_rules();
        Ok(self.state.rules.clone())
    }

    async fn fetch_nat_rules(&mut self) -> Result<Vec<NatRule>, ProviderError> {
        Ok(self.state.nat_rules.clone())
    }

    async fn fetch_logs(&mut self, kind: LogKind) -> Result<Vec<LogEntry>, ProviderError> {
        if kind == LogKind::System {
            // One burst per cycle; the system fetch runs first.
            self.emit_logs();
        }
        let mut entries: Vec<LogEntry> = self
            .state
            .logs
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect();
        if entries.len() > self.log_page {
            let skip = entries.len() - self.log_page;
            entries.drain(..skip);
        }
        Ok(entries)
    }

    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>, ProviderError> {
        self.churn_users();
        Ok(self.state.users.clone())
    }

    async fn fetch_detail(
        &mut self,
        view: ViewKind,
        id: &str,
    ) -> Result<Detail, ProviderError> {
        detail_for(&self.state, view, id).ok_or_else(|| ProviderError::Backend {
            reason: format!("no such item: {}", id),
        })
    }
}
