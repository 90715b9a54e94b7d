use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::browse::Detail;
use crate::model::{LogEntry, LogKind, NatRule, RemoteUser, SecurityRule, Session};

/// Addresses one of the dashboard's list views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Sessions,
    Rules,
    Nat,
    Logs(LogKind),
    Users,
}

/// Errors from a data provider. Stored verbatim on the view that asked;
/// the core never interprets or retries them.
#[derive(Clone, Debug)]
pub enum ProviderError {
    Connect { reason: String },
    Auth { reason: String },
    Decode { reason: String },
    Backend { reason: String },
    NotSupported { operation: String },
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { reason } => write!(f, "connect failed: {}", reason),
            Self::Auth { reason } => write!(f, "authentication failed: {}", reason),
            Self::Decode { reason } => write!(f, "bad response: {}", reason),
            Self::Backend { reason } => write!(f, "appliance error: {}", reason),
            Self::NotSupported { operation } => write!(f, "operation not supported: {}", operation),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A pluggable source of appliance state.
///
/// Implementations fetch complete lists; the browsing core replaces its
/// raw list wholesale per refresh and never observes a partial update.
#[async_trait]
pub trait Provider: Send {
    fn name(&self) -> &'static str;

    async fn fetch_sessions(&mut self) -> Result<Vec<Session>, ProviderError>;

    async fn fetch_rules(&mut self) -> Result<Vec<SecurityRule>, ProviderError>;

    async fn fetch_nat_rules(&mut self) -> Result<Vec<NatRule>, ProviderError>;

    async fn fetch_logs(&mut self, kind: LogKind) -> Result<Vec<LogEntry>, ProviderError>;

    async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>, ProviderError>;

    /// On-demand extended data for one item.
    async fn fetch_detail(
        &mut self,
        _view: ViewKind,
        _id: &str,
    ) -> Result<Detail, ProviderError> {
        Err(ProviderError::NotSupported { operation: "detail".into() })
    }
}

/// Requests sent into the refresh loop from the UI.
#[derive(Clone, Debug)]
pub enum ProviderCommand {
    FetchDetail { view: ViewKind, id: String },
}

/// One refresh payload. A failed fetch travels as the `Err` side and is
/// surfaced on the owning view; it never cancels the other payloads of
/// the same cycle.
#[derive(Clone, Debug)]
pub enum Refresh {
    Sessions(Result<Vec<Session>, ProviderError>),
    Rules(Result<Vec<SecurityRule>, ProviderError>),
    Nat(Result<Vec<NatRule>, ProviderError>),
    Logs(LogKind, Result<Vec<LogEntry>, ProviderError>),
    Users(Result<Vec<RemoteUser>, ProviderError>),
    Detail { view: ViewKind, id: String, result: Result<Detail, ProviderError> },
}

#[derive(Clone, Debug)]
pub struct RefreshEvent {
    pub seq: u64,
    pub at: SystemTime,
    pub payload: Refresh,
}

async fn send(tx: &mpsc::Sender<RefreshEvent>, seq: &mut u64, payload: Refresh) -> bool {
    *seq += 1;
    tx.send(RefreshEvent { seq: *seq, at: SystemTime::now(), payload })
        .await
        .is_ok()
}

/// Drive a provider on a fixed interval, delivering one `RefreshEvent` per
/// view per cycle, and serve detail requests between ticks. Returns when
/// either channel closes.
pub async fn run_refresh_loop(
    mut provider: Box<dyn Provider>,
    every: Duration,
    mut commands: mpsc::Receiver<ProviderCommand>,
    events: mpsc::Sender<RefreshEvent>,
) {
    let mut seq: u64 = 0;
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut batch = vec![
                    Refresh::Sessions(provider.fetch_sessions().await),
                    Refresh::Rules(provider.fetch_rules().await),
                    Refresh::Nat(provider.fetch_nat_rules().await),
                ];
                for kind in LogKind::all() {
                    batch.push(Refresh::Logs(kind, provider.fetch_logs(kind).await));
                }
                batch.push(Refresh::Users(provider.fetch_users().await));
                for payload in batch {
                    if !send(&events, &mut seq, payload).await {
                        return;
                    }
                }
            }
            cmd = commands.recv() => {
                match cmd {
                    Some(ProviderCommand::FetchDetail { view, id }) => {
                        let result = provider.fetch_detail(view, &id).await;
                        if !send(&events, &mut seq, Refresh::Detail { view, id, result }).await {
                            return;
                        }
                    }
                    None => return,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        fail_sessions: bool,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch_sessions(&mut self) -> Result<Vec<Session>, ProviderError> {
            if self.fail_sessions {
                Err(ProviderError::Backend { reason: "boom".into() })
            } else {
                Ok(Vec::new())
            }
        }

        async fn fetch_rules(&mut self) -> Result<Vec<SecurityRule>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fetch_nat_rules(&mut self) -> Result<Vec<NatRule>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fetch_logs(&mut self, _kind: LogKind) -> Result<Vec<LogEntry>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fetch_users(&mut self) -> Result<Vec<RemoteUser>, ProviderError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn one_cycle_delivers_every_view_with_increasing_seq() {
        let (_cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run_refresh_loop(
            Box::new(StubProvider { fail_sessions: false }),
            Duration::from_secs(3600),
            cmd_rx,
            event_tx,
        ));

        // sessions, rules, nat, 3 log kinds, users
        let mut last_seq = 0;
        for _ in 0..7 {
            let event = event_rx.recv().await.unwrap();
            assert!(event.seq > last_seq);
            last_seq = event.seq;
        }
        handle.abort();
    }

    #[tokio::test]
    async fn a_failed_fetch_travels_as_an_error_payload() {
        let (_cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run_refresh_loop(
            Box::new(StubProvider { fail_sessions: true }),
            Duration::from_secs(3600),
            cmd_rx,
            event_tx,
        ));

        let first = event_rx.recv().await.unwrap();
        match first.payload {
            Refresh::Sessions(Err(ProviderError::Backend { reason })) => {
                assert_eq!(reason, "boom");
            }
            other => panic!("expected failed sessions payload, got {:?}", other),
        }
        // The rest of the cycle still arrives.
        let second = event_rx.recv().await.unwrap();
        assert!(matches!(second.payload, Refresh::Rules(Ok(_))));
        handle.abort();
    }

    #[tokio::test]
    async fn detail_requests_default_to_not_supported() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run_refresh_loop(
            Box::new(StubProvider { fail_sessions: false }),
            Duration::from_secs(3600),
            cmd_rx,
            event_tx,
        ));

        // Drain the startup cycle.
        for _ in 0..7 {
            event_rx.recv().await.unwrap();
        }
        cmd_tx
            .send(ProviderCommand::FetchDetail { view: ViewKind::Sessions, id: "42".into() })
            .await
            .unwrap();
        let event = event_rx.recv().await.unwrap();
        match event.payload {
            Refresh::Detail { id, result, .. } => {
                assert_eq!(id, "42");
                assert!(matches!(result, Err(ProviderError::NotSupported { .. })));
            }
            other => panic!("expected detail payload, got {:?}", other),
        }
        handle.abort();
    }
}
