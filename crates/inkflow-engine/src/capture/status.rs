/// Connection state of an ink device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ConnectionStatus {
    #[default]
    NotConnected,
    Connecting,
    /// Connected and ready for realtime ink or file transfer.
    Idle,
    Busy,
    Syncing,
    ExpectingButtonTapToConfirm,
    ExpectingButtonTapToReconnect,
    HoldButtonToEnterUserConfirmation,
    AcknowledgeConfirmationTimeout,
    FailedToConnect,
    FailedToPair,
    FailedToAuthorize,
}

/// A step the device needs from the user while pairing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PairingPrompt {
    TapToConfirm,
    TapToReconnect,
    HoldButton,
    AcknowledgeTimeout,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ConnectFailure {
    Connect,
    Pair,
    Authorize,
}

/// Inputs that move a device between statuses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StatusEvent {
    ConnectRequested,
    Prompt(PairingPrompt),
    UserConfirmed,
    Connected,
    Failed(ConnectFailure),
    BusyStarted,
    BusyFinished,
    SyncStarted,
    SyncFinished,
    Disconnected,
}

#[derive(Debug, thiserror::Error, Copy, Clone, Eq, PartialEq)]
#[error("{event:?} is not valid while {from:?}")]
pub struct TransitionError {
    pub from: ConnectionStatus,
    pub event: StatusEvent,
}

impl ConnectionStatus {
    /// Transition table.
    pub fn apply(self, event: StatusEvent) -> Result<ConnectionStatus, TransitionError> {
        use ConnectionStatus as S;
        use StatusEvent as E;

        let next = match (self, event) {
            (_, E::Disconnected) => S::NotConnected,

            (s, E::ConnectRequested) if s == S::NotConnected || s.is_failure() => S::Connecting,

            (s, E::Prompt(p)) if s == S::Connecting || s.awaits_user() => match p {
                PairingPrompt::TapToConfirm => S::ExpectingButtonTapToConfirm,
                PairingPrompt::TapToReconnect => S::ExpectingButtonTapToReconnect,
                PairingPrompt::HoldButton => S::HoldButtonToEnterUserConfirmation,
                PairingPrompt::AcknowledgeTimeout => S::AcknowledgeConfirmationTimeout,
            },
            (s, E::UserConfirmed) if s.awaits_user() => S::Connecting,
            (s, E::Connected) if s == S::Connecting || s.awaits_user() => S::Idle,
            (s, E::Failed(f)) if s == S::Connecting || s.awaits_user() => match f {
                ConnectFailure::Connect => S::FailedToConnect,
                ConnectFailure::Pair => S::FailedToPair,
                ConnectFailure::Authorize => S::FailedToAuthorize,
            },

            (S::Idle, E::BusyStarted) => S::Busy,
            (S::Busy, E::BusyFinished) => S::Idle,
            (S::Idle, E::SyncStarted) => S::Syncing,
            (S::Syncing, E::SyncFinished) => S::Idle,

            (from, event) => return Err(TransitionError { from, event }),
        };

        if next != self {
            log::debug!("device status {self:?} -> {next:?}");
        }
        Ok(next)
    }

    /// Connected in any form: idle, busy or syncing.
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Idle | Self::Busy | Self::Syncing)
    }

    /// Waiting on a button action from the user.
    #[inline]
    pub fn awaits_user(self) -> bool {
        matches!(
            self,
            Self::ExpectingButtonTapToConfirm
                | Self::ExpectingButtonTapToReconnect
                | Self::HoldButtonToEnterUserConfirmation
                | Self::AcknowledgeConfirmationTimeout
        )
    }

    /// Terminal failure; a new connect attempt is required.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::FailedToConnect | Self::FailedToPair | Self::FailedToAuthorize)
    }

    /// Message worth surfacing to the user, if any.
    pub fn message(self) -> Option<&'static str> {
        let msg = match self {
            Self::NotConnected | Self::Busy => return None,
            Self::Idle => "Device connected",
            Self::Syncing => "Device syncing",
            Self::Connecting => "Device connecting",
            Self::ExpectingButtonTapToConfirm => "Tap device button to confirm connection",
            Self::ExpectingButtonTapToReconnect => "Tap device button to reconnect",
            Self::HoldButtonToEnterUserConfirmation => "Hold button to enter user confirmation mode",
            Self::AcknowledgeConfirmationTimeout => "Tap device button to acknowledge user timeout",
            Self::FailedToConnect => "Failed to connect to device",
            Self::FailedToPair => "Failed to pair to device",
            Self::FailedToAuthorize => "Failed to authorize",
        };
        Some(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ConnectionStatus as S;
    use StatusEvent as E;

    fn run(events: &[StatusEvent]) -> Result<ConnectionStatus, TransitionError> {
        events.iter().try_fold(S::NotConnected, |s, &e| s.apply(e))
    }

    #[test]
    fn pairing_with_confirmation() {
        let s = run(&[
            E::ConnectRequested,
            E::Prompt(PairingPrompt::HoldButton),
            E::Prompt(PairingPrompt::TapToConfirm),
            E::UserConfirmed,
            E::Connected,
        ])
        .unwrap();
        assert_eq!(s, S::Idle);
        assert!(s.is_connected());
    }

    #[test]
    fn failure_is_terminal_until_retry() {
        let s = run(&[E::ConnectRequested, E::Failed(ConnectFailure::Pair)]).unwrap();
        assert_eq!(s, S::FailedToPair);
        assert!(s.is_failure());

        assert_eq!(
            s.apply(E::Connected),
            Err(TransitionError { from: S::FailedToPair, event: E::Connected })
        );
        assert_eq!(s.apply(E::ConnectRequested), Ok(S::Connecting));
    }

    #[test]
    fn sync_and_busy_return_to_idle() {
        let s = run(&[E::ConnectRequested, E::Connected, E::SyncStarted]).unwrap();
        assert_eq!(s, S::Syncing);
        assert_eq!(s.apply(E::SyncFinished), Ok(S::Idle));
        assert_eq!(S::Idle.apply(E::BusyStarted).and_then(|s| s.apply(E::BusyFinished)), Ok(S::Idle));
    }

    #[test]
    fn disconnect_from_anywhere() {
        for s in [S::Connecting, S::Idle, S::Syncing, S::FailedToAuthorize, S::NotConnected] {
            assert_eq!(s.apply(E::Disconnected), Ok(S::NotConnected));
        }
    }

    #[test]
    fn cannot_sync_while_connecting() {
        assert!(S::Connecting.apply(E::SyncStarted).is_err());
        assert!(S::Idle.apply(E::ConnectRequested).is_err());
    }

    #[test]
    fn quiet_statuses_have_no_message() {
        assert_eq!(S::NotConnected.message(), None);
        assert_eq!(S::Busy.message(), None);
        assert_eq!(S::Idle.message(), Some("Device connected"));
    }
}
