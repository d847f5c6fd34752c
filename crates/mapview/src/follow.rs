use foundation::LatLon;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{AuthorizationStatus, LocationFix};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    #[default]
    Off,
    PendingPermission,
    Following,
}

/// Whether a manual pan/zoom ends follow mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowPolicy {
    pub cancel_on_gesture: bool,
}

impl Default for FollowPolicy {
    fn default() -> Self {
        Self {
            cancel_on_gesture: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FollowInput {
    /// The follow button was pressed.
    RequestFollow,
    AuthorizationChanged(AuthorizationStatus),
    LocationUpdated(LocationFix),
    GestureStarted,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FollowCommand {
    RequestAuthorization,
    StartUpdates,
    StopUpdates,
    CenterOn(LatLon),
    NotifyPermissionDenied,
}

#[derive(Debug, Clone, Default)]
pub struct FollowController {
    state: FollowState,
    policy: FollowPolicy,
    latest_fix: Option<LocationFix>,
}

impl FollowController {
    pub fn new(policy: FollowPolicy) -> Self {
        Self {
            state: FollowState::Off,
            policy,
            latest_fix: None,
        }
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn policy(&self) -> FollowPolicy {
        self.policy
    }

    pub fn latest_fix(&self) -> Option<LocationFix> {
        self.latest_fix
    }

    /// Advance the state machine. `status` is the location service's current
    /// authorization status.
    pub fn handle(&mut self, input: FollowInput, status: AuthorizationStatus) -> Vec<FollowCommand> {
        let before = self.state;
        let commands = match input {
            FollowInput::RequestFollow => self.on_request_follow(status),
            FollowInput::AuthorizationChanged(status) => self.on_authorization(status),
            FollowInput::LocationUpdated(fix) => self.on_fix(fix),
            FollowInput::GestureStarted => self.on_gesture(),
        };
        if before != self.state {
            info!(from = ?before, to = ?self.state, "follow state changed");
        }
        commands
    }

    fn on_request_follow(&mut self, status: AuthorizationStatus) -> Vec<FollowCommand> {
        match self.state {
            FollowState::Off if status.is_refused() => {
                warn!(?status, "follow requested without location permission");
                vec![FollowCommand::NotifyPermissionDenied]
            }
            FollowState::Off if status.is_granted() => self.enter_following(),
            FollowState::Off => {
                self.state = FollowState::PendingPermission;
                vec![FollowCommand::RequestAuthorization]
            }
            // Resolved only by the permission callback.
            FollowState::PendingPermission => Vec::new(),
            FollowState::Following => {
                self.state = FollowState::Off;
                vec![FollowCommand::StopUpdates]
            }
        }
    }

    fn on_authorization(&mut self, status: AuthorizationStatus) -> Vec<FollowCommand> {
        match self.state {
            FollowState::PendingPermission if status.is_granted() => self.enter_following(),
            FollowState::PendingPermission if status.is_refused() => {
                warn!(?status, "location permission refused");
                self.state = FollowState::Off;
                vec![FollowCommand::NotifyPermissionDenied]
            }
            FollowState::Following if status.is_refused() => {
                warn!(?status, "location permission revoked while following");
                self.state = FollowState::Off;
                vec![
                    FollowCommand::StopUpdates,
                    FollowCommand::NotifyPermissionDenied,
                ]
            }
            _ => Vec::new(),
        }
    }

    fn on_fix(&mut self, fix: LocationFix) -> Vec<FollowCommand> {
        if let Some(prev) = self.latest_fix
            && prev.timestamp.is_after(fix.timestamp)
        {
            debug!(?fix, "ignoring stale location fix");
            return Vec::new();
        }
        self.latest_fix = Some(fix);

        match self.state {
            FollowState::Following => vec![FollowCommand::CenterOn(fix.coordinate)],
            FollowState::Off | FollowState::PendingPermission => Vec::new(),
        }
    }

    fn on_gesture(&mut self) -> Vec<FollowCommand> {
        if self.state == FollowState::Following && self.policy.cancel_on_gesture {
            self.state = FollowState::Off;
            return vec![FollowCommand::StopUpdates];
        }
        Vec::new()
    }

    fn enter_following(&mut self) -> Vec<FollowCommand> {
        self.state = FollowState::Following;
        let mut commands = vec![FollowCommand::StartUpdates];
        if let Some(fix) = self.latest_fix {
            commands.push(FollowCommand::CenterOn(fix.coordinate));
        }
        commands
    }
}
