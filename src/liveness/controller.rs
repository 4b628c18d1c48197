use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use super::{Clock, CredentialStore, LivenessState, LogoutReason};
use crate::config::{LivenessConfig, SessionConfig};

/// Capacity of the cross-tab logout channel. Logouts are rare and
/// receivers act on the first one they see, so a small buffer suffices.
const LOGOUT_CHANNEL_CAPACITY: usize = 8;

/// Per-tab liveness state machine.
///
/// Drives the idle warning, the idle logout, and the missed-heartbeat
/// logout. One controller per tab; tabs share credentials, so a logout in
/// one broadcasts to the rest. `LoggedOut` is terminal: once entered, every
/// input becomes a no-op, so a timer that fires late cannot resurrect the
/// session.
pub struct LivenessController<C: Clock, K: CredentialStore> {
    clock: C,
    credentials: K,
    liveness: LivenessConfig,
    session: SessionConfig,
    state: LivenessState,
    last_activity: DateTime<Utc>,
    last_heartbeat: DateTime<Utc>,
    missed_heartbeats: u32,
    logout_tx: broadcast::Sender<LogoutReason>,
}

impl<C: Clock, K: CredentialStore> LivenessController<C, K> {
    pub fn new(clock: C, credentials: K, liveness: LivenessConfig, session: SessionConfig) -> Self {
        let now = clock.now();
        let (logout_tx, _) = broadcast::channel(LOGOUT_CHANNEL_CAPACITY);

        Self {
            clock,
            credentials,
            liveness,
            session,
            state: LivenessState::Active,
            last_activity: now,
            last_heartbeat: now,
            missed_heartbeats: 0,
            logout_tx,
        }
    }

    pub fn state(&self) -> LivenessState {
        self.state
    }

    /// Subscribe to logout notifications, one subscription per sibling tab.
    pub fn subscribe(&self) -> broadcast::Receiver<LogoutReason> {
        self.logout_tx.subscribe()
    }

    /// Records passive user activity (mouse, keyboard, scroll).
    ///
    /// Throttled to once per second so a mousemove storm does not turn
    /// every event into a state update. Ignored in `Warning`: only the
    /// explicit continue button dismisses the warning, otherwise the very
    /// mouse movement toward it would reset the idle timer.
    pub fn on_activity(&mut self) {
        if self.state != LivenessState::Active {
            return;
        }

        let now = self.clock.now();
        if now - self.last_activity < self.liveness.activity_throttle {
            return;
        }
        self.last_activity = now;
    }

    /// Advances the timers. Call on a coarse interval (once a second is
    /// plenty); transitions are driven by elapsed time, not by call count.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        let idle_for = now - self.last_activity;

        match self.state {
            LivenessState::Active => {
                if idle_for >= self.liveness.idle_timeout - self.liveness.warning_window {
                    self.state = LivenessState::Warning;
                }
            }
            LivenessState::Warning => {
                if idle_for >= self.liveness.idle_timeout {
                    self.logout(LogoutReason::IdleTimeout);
                }
            }
            LivenessState::LoggedOut(_) => {}
        }
    }

    /// The user clicked "stay signed in". The only path out of `Warning`.
    pub fn on_continue(&mut self) {
        if self.state != LivenessState::Warning {
            return;
        }
        self.last_activity = self.clock.now();
        self.state = LivenessState::Active;
    }

    /// Whether the next heartbeat should be sent.
    pub fn heartbeat_due(&self) -> bool {
        matches!(self.state, LivenessState::Active | LivenessState::Warning)
            && self.clock.now() - self.last_heartbeat >= self.session.heartbeat_interval
    }

    /// A heartbeat round-trip succeeded.
    pub fn record_heartbeat_success(&mut self) {
        if matches!(self.state, LivenessState::LoggedOut(_)) {
            return;
        }
        self.last_heartbeat = self.clock.now();
        self.missed_heartbeats = 0;
    }

    /// A heartbeat failed (network error or non-security server error).
    ///
    /// Tolerated up to the configured limit; a flaky connection should not
    /// end a session, a dead one should.
    pub fn record_heartbeat_failure(&mut self) {
        if matches!(self.state, LivenessState::LoggedOut(_)) {
            return;
        }
        self.last_heartbeat = self.clock.now();
        self.missed_heartbeats += 1;
        if self.missed_heartbeats >= self.session.max_missed_heartbeats {
            self.logout(LogoutReason::HeartbeatFailures);
        }
    }

    /// Outcome of the out-of-band revalidation run when a tab regains
    /// focus. A definitive rejection logs out immediately rather than
    /// waiting out the missed-heartbeat tolerance.
    pub fn on_focus_revalidation(&mut self, ok: bool) {
        if matches!(self.state, LivenessState::LoggedOut(_)) {
            return;
        }
        if !ok {
            self.logout(LogoutReason::RevalidationFailed);
        }
    }

    /// Transitions to `LoggedOut`, clears credentials, and notifies
    /// sibling tabs. Also the entry point for user-initiated logout.
    pub fn logout(&mut self, reason: LogoutReason) {
        if matches!(self.state, LivenessState::LoggedOut(_)) {
            return;
        }
        self.state = LivenessState::LoggedOut(reason);
        self.missed_heartbeats = 0;
        self.credentials.clear();
        // No receivers is fine; a single tab has no one to tell.
        let _ = self.logout_tx.send(reason);
    }

    /// A sibling tab logged out. Tears this tab down without
    /// re-broadcasting, so the notification cannot ping-pong.
    pub fn observe_remote_logout(&mut self, reason: LogoutReason) {
        if matches!(self.state, LivenessState::LoggedOut(_)) {
            return;
        }
        self.state = LivenessState::LoggedOut(reason);
        self.missed_heartbeats = 0;
        self.credentials.clear();
    }
}
