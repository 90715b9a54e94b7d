//! Per-entity wiring for the generic browser: which fields each view
//! searches, which keys it sorts by, and what counts as item identity.
//!
//! Every list view in the dashboard is `Browser<T>` with one of these
//! parameterizations; nothing here is hand-copied per view.

use std::cmp::Ordering;

use crate::browse::Browsable;
use crate::filter::Searchable;
use crate::model::{LogEntry, NatRule, RemoteUser, SecurityRule, Session};
use crate::sort::SortKey;

// ---------- sessions ----------

impl Searchable for Session {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.application);
        out.push(&self.src_ip);
        out.push(&self.dst_ip);
        out.push(&self.src_zone);
        out.push(&self.dst_zone);
        out.push(&self.rule);
        if let Some(user) = &self.user {
            out.push(user);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKey {
    Id,
    Application,
    Bytes,
    Start,
}

impl SortKey for SessionKey {
    type Item = Session;

    fn next(self) -> Self {
        match self {
            Self::Id => Self::Application,
            Self::Application => Self::Bytes,
            Self::Bytes => Self::Start,
            Self::Start => Self::Id,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Application => "application",
            Self::Bytes => "bytes",
            Self::Start => "start",
        }
    }

    fn default_ascending(&self) -> bool {
        match self {
            Self::Id | Self::Application => true,
            Self::Bytes | Self::Start => false,
        }
    }

    fn compare(&self, a: &Session, b: &Session) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Application => a.application.cmp(&b.application),
            Self::Bytes => a.bytes.cmp(&b.bytes),
            Self::Start => a.start_epoch.cmp(&b.start_epoch),
        }
    }
}

impl Browsable for Session {
    type Key = SessionKey;

    fn first_key() -> SessionKey {
        SessionKey::Id
    }

    fn identity(&self) -> String {
        self.id.to_string()
    }
}

// ---------- security rules ----------

impl Searchable for SecurityRule {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.name);
        out.extend(self.src_zones.iter().map(String::as_str));
        out.extend(self.dst_zones.iter().map(String::as_str));
        out.extend(self.src_addrs.iter().map(String::as_str));
        out.extend(self.dst_addrs.iter().map(String::as_str));
        out.push(&self.application);
        out.push(&self.service);
        out.push(self.action.label());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKey {
    Position,
    Name,
    Hits,
    LastHit,
}

impl SortKey for RuleKey {
    type Item = SecurityRule;

    fn next(self) -> Self {
        match self {
            Self::Position => Self::Name,
            Self::Name => Self::Hits,
            Self::Hits => Self::LastHit,
            Self::LastHit => Self::Position,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Name => "name",
            Self::Hits => "hits",
            Self::LastHit => "last hit",
        }
    }

    fn default_ascending(&self) -> bool {
        match self {
            Self::Position | Self::Name => true,
            Self::Hits | Self::LastHit => false,
        }
    }

    fn compare(&self, a: &SecurityRule, b: &SecurityRule) -> Ordering {
        match self {
            Self::Position => a.position.cmp(&b.position),
            Self::Name => a.name.cmp(&b.name),
            Self::Hits => a.hit_count.cmp(&b.hit_count),
            // Never-hit rules (None) rank below any hit timestamp.
            Self::LastHit => a.last_hit_epoch.cmp(&b.last_hit_epoch),
        }
    }
}

impl Browsable for SecurityRule {
    type Key = RuleKey;

    fn first_key() -> RuleKey {
        RuleKey::Position
    }

    fn identity(&self) -> String {
        self.name.clone()
    }
}

// ---------- NAT rules ----------

impl Searchable for NatRule {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.name);
        out.extend(self.src_zones.iter().map(String::as_str));
        out.push(&self.dst_zone);
        out.push(&self.original_src);
        out.push(&self.original_dst);
        out.push(&self.translated_src);
        if let Some(dst) = &self.translated_dst {
            out.push(dst);
        }
        out.push(&self.service);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NatKey {
    Position,
    Name,
    Hits,
}

impl SortKey for NatKey {
    type Item = NatRule;

    fn next(self) -> Self {
        match self {
            Self::Position => Self::Name,
            Self::Name => Self::Hits,
            Self::Hits => Self::Position,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Name => "name",
            Self::Hits => "hits",
        }
    }

    fn default_ascending(&self) -> bool {
        !matches!(self, Self::Hits)
    }

    fn compare(&self, a: &NatRule, b: &NatRule) -> Ordering {
        match self {
            Self::Position => a.position.cmp(&b.position),
            Self::Name => a.name.cmp(&b.name),
            Self::Hits => a.hit_count.cmp(&b.hit_count),
        }
    }
}

impl Browsable for NatRule {
    type Key = NatKey;

    fn first_key() -> NatKey {
        NatKey::Position
    }

    fn identity(&self) -> String {
        self.name.clone()
    }
}

// ---------- logs ----------

impl Searchable for LogEntry {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::System { event_type, description, severity, .. } => {
                out.push(description);
                out.push(event_type);
                out.push(severity.label());
            }
            Self::Traffic { src_ip, dst_ip, application, rule, action, user, .. } => {
                out.push(src_ip);
                out.push(dst_ip);
                out.push(application);
                out.push(rule);
                out.push(action);
                if let Some(user) = user {
                    out.push(user);
                }
            }
            Self::Threat { threat_name, category, severity, action, .. } => {
                out.push(threat_name);
                out.push(category);
                out.push(severity.label());
                out.push(action);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKey {
    Time,
    Severity,
}

impl SortKey for LogKey {
    type Item = LogEntry;

    fn next(self) -> Self {
        match self {
            Self::Time => Self::Severity,
            Self::Severity => Self::Time,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Severity => "severity",
        }
    }

    fn default_ascending(&self) -> bool {
        false
    }

    fn compare(&self, a: &LogEntry, b: &LogEntry) -> Ordering {
        match self {
            Self::Time => a.at_epoch().cmp(&b.at_epoch()),
            Self::Severity => a.severity().cmp(&b.severity()),
        }
    }
}

impl Browsable for LogEntry {
    type Key = LogKey;

    fn first_key() -> LogKey {
        LogKey::Time
    }

    fn identity(&self) -> String {
        match self {
            Self::System { at_epoch, event_type, .. } => {
                format!("system:{}:{}", at_epoch, event_type)
            }
            Self::Traffic { at_epoch, src_ip, dst_ip, .. } => {
                format!("traffic:{}:{}>{}", at_epoch, src_ip, dst_ip)
            }
            Self::Threat { at_epoch, threat_name, .. } => {
                format!("threat:{}:{}", at_epoch, threat_name)
            }
        }
    }
}

// ---------- remote users ----------

impl Searchable for RemoteUser {
    fn search_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.username);
        out.push(&self.client_ip);
        out.push(&self.gateway);
        if let Some(tunnel) = &self.tunnel_type {
            out.push(tunnel);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserKey {
    Username,
    LoginTime,
    Gateway,
}

impl SortKey for UserKey {
    type Item = RemoteUser;

    fn next(self) -> Self {
        match self {
            Self::Username => Self::LoginTime,
            Self::LoginTime => Self::Gateway,
            Self::Gateway => Self::Username,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Username => "user",
            Self::LoginTime => "login",
            Self::Gateway => "gateway",
        }
    }

    fn default_ascending(&self) -> bool {
        !matches!(self, Self::LoginTime)
    }

    fn compare(&self, a: &RemoteUser, b: &RemoteUser) -> Ordering {
        match self {
            Self::Username => a.username.cmp(&b.username),
            Self::LoginTime => a.login_epoch.cmp(&b.login_epoch),
            Self::Gateway => a.gateway.cmp(&b.gateway),
        }
    }
}

impl Browsable for RemoteUser {
    type Key = UserKey;

    fn first_key() -> UserKey {
        UserKey::Username
    }

    fn identity(&self) -> String {
        self.username.clone()
    }
}
