use mapview::sim::{SimLocation, SimSurfaceFactory, SurfaceCall};
use mapview::{AuthorizationStatus, MapConfig, MapEvent, MapIntent, MapSession, SessionSnapshot};
use runtime::{MetricsSnapshot, Notice};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Intent(MapIntent),
    Event(MapEvent),
    /// The user answered the permission prompt.
    Authorize(AuthorizationStatus),
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub snapshot: SessionSnapshot,
    pub notices: Vec<Notice>,
    pub metrics: MetricsSnapshot,
    pub engine_calls: Vec<SurfaceCall>,
}

pub fn parse_steps(json: &str) -> Result<Vec<Step>, String> {
    serde_json::from_str(json).map_err(|e| format!("scenario: {e}"))
}

pub fn replay(
    config: MapConfig,
    factory: SimSurfaceFactory,
    status: AuthorizationStatus,
    steps: &[Step],
) -> Report {
    let mut session = MapSession::new(config, factory, SimLocation::new(status));

    for (i, step) in steps.iter().enumerate() {
        info!(step = i, ?step, "replaying");
        match *step {
            Step::Intent(intent) => session.apply(intent),
            Step::Event(MapEvent::RegionChanged { center, zoom }) => {
                // The engine moved first; the notification reports it.
                session.surface_mut().simulate_region(center, zoom);
                session.dispatch(MapEvent::RegionChanged { center, zoom });
            }
            Step::Event(event) => session.dispatch(event),
            Step::Authorize(status) => {
                session.location_mut().set_status(status);
                session.dispatch(MapEvent::AuthorizationChanged(status));
            }
        }
    }

    Report {
        snapshot: session.snapshot(),
        notices: session.drain_notices(),
        metrics: session.metrics(),
        engine_calls: session.surface().calls().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::LatLon;
    use mapview::FollowState;
    use pretty_assertions::assert_eq;
    use style::StyleMode;

    fn config() -> MapConfig {
        MapConfig::with_bundled_raster().unwrap()
    }

    #[test]
    fn parses_intents_and_events() {
        let steps = parse_steps(
            r#"[
                {"intent": "zoom_in"},
                {"intent": {"set_mode": "vector-3d"}},
                {"event": "gesture_started"},
                {"event": {"region_changed": {"center": {"lat": 1.0, "lon": 2.0}, "zoom": 4.5}}},
                {"event": {"location_updated": {"coordinate": {"lat": 3.0, "lon": 4.0}, "timestamp": 12.0}}},
                {"authorize": "authorized_when_in_use"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], Step::Intent(MapIntent::ZoomIn));
        assert_eq!(steps[1], Step::Intent(MapIntent::SetMode(StyleMode::Vector3D)));
        assert_eq!(
            steps[5],
            Step::Authorize(AuthorizationStatus::AuthorizedWhenInUse)
        );
    }

    #[test]
    fn rejects_unknown_steps() {
        assert!(parse_steps(r#"[{"intent": "fly_away"}]"#).is_err());
    }

    #[test]
    fn replays_permission_prompt_and_follow() {
        let steps = parse_steps(
            r#"[
                {"intent": "toggle_follow"},
                {"authorize": "authorized_always"},
                {"event": {"location_updated": {"coordinate": {"lat": 59.91, "lon": 10.75}, "timestamp": 1.0}}}
            ]"#,
        )
        .unwrap();
        let report = replay(
            config(),
            SimSurfaceFactory::new(),
            AuthorizationStatus::NotDetermined,
            &steps,
        );
        assert_eq!(report.snapshot.follow, FollowState::Following);
        assert_eq!(report.snapshot.viewport.center, LatLon::new(59.91, 10.75));
        assert!(report.notices.is_empty());
    }

    #[test]
    fn region_changes_move_the_simulated_engine() {
        let steps = parse_steps(
            r#"[
                {"event": "gesture_started"},
                {"event": {"region_changed": {"center": {"lat": 1.0, "lon": 2.0}, "zoom": 4.5}}},
                {"event": "gesture_ended"}
            ]"#,
        )
        .unwrap();
        let report = replay(
            config(),
            SimSurfaceFactory::new(),
            AuthorizationStatus::NotDetermined,
            &steps,
        );
        assert_eq!(report.snapshot.viewport.center, LatLon::new(1.0, 2.0));
        assert_eq!(report.snapshot.viewport.zoom, 4.5);
        assert!(!report.snapshot.gesture_active);
    }
}
