//! Single-threaded dispatcher tying the components together.
//!
//! Every intent or engine notification is processed as one reconciliation
//! pass: the tick advances, viewport ownership is fixed, then the input is
//! handled. Deferred actions run only on idle `Tick` events.

use foundation::{Generation, LatLon};
use runtime::{DeferredQueue, Metrics, MetricsSnapshot, Notice, NoticeBus, NoticeKind, Tick};
use serde::{Deserialize, Serialize};
use style::{AugmentReport, AugmentedLayer, StyleAugmenter, StyleMode};
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::engine::{AuthorizationStatus, LocationFix, LocationService, RenderSurface, SurfaceFactory};
use crate::follow::{FollowCommand, FollowController, FollowInput, FollowState};
use crate::viewport::{ApplyReport, Viewport, ViewportReconciler, ViewportTarget, ZOOM_STEP};

/// Requests coming from the user or the application.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapIntent {
    ToggleFollow,
    CenterOnMe,
    ZoomIn,
    ZoomOut,
    SetMode(StyleMode),
}

/// Notifications delivered by the rendering engine and the location service.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEvent {
    GestureStarted,
    GestureEnded,
    RegionChanged { center: LatLon, zoom: f64 },
    StyleLoaded,
    AuthorizationChanged(AuthorizationStatus),
    LocationUpdated(LocationFix),
    /// An idle scheduling tick.
    Tick,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DeferredAction {
    /// Disable built-in pinch/double-tap zoom on the surface of this generation.
    ConfigureGestures(Generation),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub mode: StyleMode,
    pub follow: FollowState,
    pub viewport: Viewport,
    pub gesture_active: bool,
    pub surface_generation: Generation,
    pub augmented_layer: Option<AugmentedLayer>,
    pub latest_fix: Option<LocationFix>,
}

pub struct MapSession<F: SurfaceFactory, L: LocationService> {
    config: MapConfig,
    factory: F,
    location: L,
    surface: F::Surface,
    generation: Generation,
    mode: StyleMode,
    reconciler: ViewportReconciler,
    follow: FollowController,
    augmenter: StyleAugmenter,
    notices: NoticeBus,
    metrics: Metrics,
    deferred: DeferredQueue<DeferredAction>,
    tick: Tick,
    config_notice_raised: bool,
}

impl<F: SurfaceFactory, L: LocationService> MapSession<F, L> {
    pub fn new(config: MapConfig, mut factory: F, location: L) -> Self {
        let tick = Tick::new(0);
        let mut notices = NoticeBus::new();
        let mut config_notice_raised = false;
        let mode = resolve_mode(
            &config,
            config.initial_mode,
            tick,
            &mut notices,
            &mut config_notice_raised,
        );

        let generation = Generation::new(1);
        let mut surface = create_surface(&config, &mut factory, mode);
        let mut reconciler = ViewportReconciler::new(config.initial_viewport);
        reconciler.push_all(&mut surface, mode.required_pitch());

        let mut deferred = DeferredQueue::new();
        deferred.defer(tick, DeferredAction::ConfigureGestures(generation));

        info!(%mode, %generation, "map session created");

        Self {
            follow: FollowController::new(config.follow_policy),
            augmenter: StyleAugmenter::new(config.augment_config()),
            config,
            factory,
            location,
            surface,
            generation,
            mode,
            reconciler,
            notices,
            metrics: Metrics::new(),
            deferred,
            tick,
            config_notice_raised,
        }
    }

    pub fn mode(&self) -> StyleMode {
        self.mode
    }

    pub fn follow_state(&self) -> FollowState {
        self.follow.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.reconciler.viewport()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn surface(&self) -> &F::Surface {
        &self.surface
    }

    /// Direct engine access, for delivering engine-side camera changes.
    pub fn surface_mut(&mut self) -> &mut F::Surface {
        &mut self.surface
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn notices(&self) -> &[Notice] {
        self.notices.notices()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick.index,
            mode: self.mode,
            follow: self.follow.state(),
            viewport: self.reconciler.viewport(),
            gesture_active: self.reconciler.gesture_active(),
            surface_generation: self.generation,
            augmented_layer: self.augmenter.augmented().cloned(),
            latest_fix: self.follow.latest_fix(),
        }
    }

    pub fn apply(&mut self, intent: MapIntent) {
        self.begin_pass();
        debug!(tick = self.tick.index, ?intent, "intent");
        match intent {
            MapIntent::ToggleFollow => self.drive_follow(FollowInput::RequestFollow),
            MapIntent::CenterOnMe => self.center_on_me(),
            MapIntent::ZoomIn => {
                let report = self.reconciler.step_zoom(&mut self.surface, ZOOM_STEP);
                self.record(report);
            }
            MapIntent::ZoomOut => {
                let report = self.reconciler.step_zoom(&mut self.surface, -ZOOM_STEP);
                self.record(report);
            }
            MapIntent::SetMode(mode) => self.switch_mode(mode),
        }
    }

    pub fn dispatch(&mut self, event: MapEvent) {
        self.begin_pass();
        debug!(tick = self.tick.index, ?event, "event");
        match event {
            MapEvent::GestureStarted => {
                self.reconciler.gesture_started();
                self.drive_follow(FollowInput::GestureStarted);
            }
            MapEvent::GestureEnded => self.reconciler.gesture_ended(&self.surface),
            MapEvent::RegionChanged { center, zoom } => self.reconciler.absorb(center, zoom),
            MapEvent::StyleLoaded => {
                self.augment_style();
            }
            MapEvent::AuthorizationChanged(status) => {
                self.drive_follow(FollowInput::AuthorizationChanged(status))
            }
            MapEvent::LocationUpdated(fix) => self.drive_follow(FollowInput::LocationUpdated(fix)),
            MapEvent::Tick => self.run_due_actions(),
        }
    }

    fn begin_pass(&mut self) {
        self.tick = self.tick.next();
        self.reconciler.begin_pass();
    }

    fn run_due_actions(&mut self) {
        if self.deferred.is_empty() {
            return;
        }
        for action in self.deferred.take_due(self.tick) {
            self.run_deferred(action);
        }
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ConfigureGestures(generation) if generation == self.generation => {
                self.surface.set_builtin_zoom_gestures(false);
                debug!(%generation, "built-in zoom gestures disabled");
            }
            DeferredAction::ConfigureGestures(generation) => {
                debug!(%generation, current = %self.generation, "surface replaced; skipping gesture setup");
            }
        }
    }

    fn drive_follow(&mut self, input: FollowInput) {
        let status = self.location.authorization_status();
        let commands = self.follow.handle(input, status);
        for command in commands {
            self.run_follow_command(command);
        }
    }

    fn run_follow_command(&mut self, command: FollowCommand) {
        match command {
            FollowCommand::RequestAuthorization => self.location.request_authorization(),
            FollowCommand::StartUpdates => self.location.start_updates(),
            FollowCommand::StopUpdates => self.location.stop_updates(),
            FollowCommand::CenterOn(center) => {
                let report = self
                    .reconciler
                    .set_target(&mut self.surface, ViewportTarget::center(center));
                self.record(report);
            }
            FollowCommand::NotifyPermissionDenied => {
                self.metrics.inc_counter("notices.permission_denied", 1);
                self.notices.emit(
                    self.tick,
                    NoticeKind::PermissionDenied,
                    "Location access is off. Allow location access for this app in Settings to follow your position.",
                );
            }
        }
    }

    fn center_on_me(&mut self) {
        let Some(fix) = self.follow.latest_fix() else {
            debug!("no location fix yet; nothing to center on");
            return;
        };
        if !self.location.authorization_status().is_granted() {
            debug!("location not authorized; ignoring center-on-me");
            return;
        }
        let report = self
            .reconciler
            .set_target(&mut self.surface, ViewportTarget::center(fix.coordinate));
        self.record(report);
    }

    fn switch_mode(&mut self, requested: StyleMode) {
        let mode = resolve_mode(
            &self.config,
            requested,
            self.tick,
            &mut self.notices,
            &mut self.config_notice_raised,
        );
        if mode == self.mode {
            debug!(%mode, "style mode unchanged");
            return;
        }

        let previous = self.mode;
        self.mode = mode;
        self.generation = self.generation.next();
        // The old surface is released on assignment; nothing of it carries over.
        self.surface = create_surface(&self.config, &mut self.factory, mode);
        self.augmenter.reset();
        self.reconciler.reset_gesture();
        self.reconciler.push_all(&mut self.surface, mode.required_pitch());
        self.deferred
            .defer(self.tick, DeferredAction::ConfigureGestures(self.generation));
        self.metrics.inc_counter("style.mode_switches", 1);

        info!(from = %previous, to = %mode, generation = %self.generation, "style mode switched");
    }

    fn augment_style(&mut self) -> Option<AugmentReport> {
        let mode = self.mode;
        let generation = self.generation;
        let Some(doc) = self.surface.style_mut() else {
            debug!("style-loaded notification without a loaded style");
            return None;
        };
        let report = self.augmenter.augment(doc, mode, generation);
        self.metrics.inc_counter("style.augment_runs", 1);
        if let Some(pitch) = report.target_pitch {
            let report = self
                .reconciler
                .set_target(&mut self.surface, ViewportTarget::pitch(pitch));
            self.record(report);
        }
        Some(report)
    }

    fn record(&mut self, report: ApplyReport) {
        if report.center_written {
            self.metrics.inc_counter("viewport.center_writes", 1);
        }
        if report.zoom_written {
            self.metrics.inc_counter("viewport.zoom_writes", 1);
        }
        if report.pitch_written {
            self.metrics.inc_counter("viewport.pitch_writes", 1);
        }
        if report.dropped {
            self.metrics.inc_counter("viewport.dropped_writes", 1);
        }
    }
}

/// Resolve the mode actually usable with `config`, falling back to raster and
/// raising the configuration notice at most once per session.
fn resolve_mode(
    config: &MapConfig,
    requested: StyleMode,
    tick: Tick,
    notices: &mut NoticeBus,
    notice_raised: &mut bool,
) -> StyleMode {
    match config.style_source(requested) {
        Ok(_) => requested,
        Err(err) => {
            warn!(%requested, %err, "vector style unavailable; falling back to raster");
            if !*notice_raised {
                *notice_raised = true;
                notices.emit(
                    tick,
                    NoticeKind::Configuration,
                    format!("The vector map style could not be loaded ({err}). Showing the raster map instead."),
                );
            }
            StyleMode::Raster
        }
    }
}

fn create_surface<F: SurfaceFactory>(config: &MapConfig, factory: &mut F, mode: StyleMode) -> F::Surface {
    let source = match config.style_source(mode) {
        Ok(source) => source,
        Err(_) => crate::engine::StyleSource::Document(config.raster_style.clone()),
    };
    factory.create_surface(&source)
}
