//! The sky clock controller.
//!
//! [`SkyClock`] owns all widget state and runs one tick per scheduled frame:
//! drain async results, recompute the sky, restyle the scene and overlay,
//! hand a [`Frame`] to the host and schedule the next tick. The host calls
//! in through a handful of entry points and never touches the state directly.

use glam::{Quat, Vec3};
use log::{debug, info, trace, warn};

use crate::api::config::ClockConfig;
use crate::api::error::AssetError;
use crate::api::host::{ClockHost, FrameScheduler, LocationFix, SatelliteQuery};
use crate::api::types::{FrameRate, PovMode, TickHandle, Ticket, Viewport};
use crate::astro::{look_angles, CelestialPosition, SatelliteFix};
use crate::components::blueprint::SceneBlueprint;
use crate::components::node::NodeKind;
use crate::core::inbox::Inbox;
use crate::core::lifecycle::{AnimationLoop, LoopState};
use crate::core::observer::Observer;
use crate::core::scene::SceneGraph;
use crate::renderer::camera::CameraRig;
use crate::renderer::effects::EffectsPipeline;
use crate::renderer::traits::{Frame, Renderer};
use crate::systems::bodies::{SkySnapshot, PLANET_RADIUS, SATELLITE_RADIUS};
use crate::systems::flicker::Flicker;
use crate::systems::format;
use crate::systems::lighting;
use crate::systems::overlay::{Overlay, OverlayId};
use crate::systems::satellite::{PollAction, SatellitePoller};

pub struct SkyClock {
    config: ClockConfig,
    observer: Observer,
    animation: AnimationLoop,
    locations: Inbox<LocationFix>,
    satellites: Inbox<SatelliteFix>,
    poller: SatellitePoller,
    blueprint: SceneBlueprint,
    scene: SceneGraph,
    overlay: Overlay,
    camera: CameraRig,
    effects: EffectsPipeline,
    flicker: Flicker,
    frame_rate: FrameRate,
    pov: PovMode,
    camera_reset: bool,
    sky: Option<SkySnapshot>,
    satellite: Option<CelestialPosition>,
    frames: u64,
}

impl SkyClock {
    /// Build the clock. `now_ms` anchors the first satellite poll.
    pub fn new(config: ClockConfig, now_ms: f64) -> Self {
        let features = config.features;
        let viewport = Viewport::default();
        let blueprint = SceneBlueprint::for_features(&features);
        let scene = SceneGraph::from_blueprint(&blueprint);
        let mut camera = CameraRig::for_pov(config.pov);
        camera.resize(viewport);

        Self {
            observer: Observer::from_config(config.position),
            animation: AnimationLoop::new(),
            locations: Inbox::new(),
            satellites: Inbox::new(),
            poller: SatellitePoller::new(
                config.satellite_poll_interval_ms,
                now_ms + config.first_satellite_poll_delay_ms,
            ),
            blueprint,
            scene,
            overlay: Overlay::new(&features),
            camera,
            effects: EffectsPipeline::new(&features, viewport),
            flicker: Flicker::new(config.rng_seed),
            frame_rate: config.frame_rate,
            pov: config.pov,
            camera_reset: false,
            sky: None,
            satellite: None,
            frames: 0,
            config,
        }
    }

    /// Pick up the host viewport. Call once before `start`.
    pub fn init<H: ClockHost + ?Sized>(&mut self, host: &mut H) {
        info!(
            "sky clock init: variant={:?} observer=({}, {}) pinned={}",
            self.config.variant,
            self.observer.latitude(),
            self.observer.longitude(),
            self.observer.is_pinned()
        );
        if !self.config.reserved.is_empty() {
            info!("reserved parameters ignored: {:?}", self.config.reserved);
        }
        let viewport = host.viewport();
        self.resize(viewport, host);
    }

    // ---- Lifecycle ----

    /// Schedule the first tick. A second call while running does nothing.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        let started = self.animation.start(scheduler);
        if started {
            info!("sky clock started");
        }
        started
    }

    /// Cancel the pending tick and orphan every in-flight lookup.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        let stopped = self.animation.stop(scheduler);
        self.locations.cancel_all();
        self.satellites.cancel_all();
        if stopped {
            info!("sky clock stopped after {} frames", self.frames);
        }
        stopped
    }

    /// Run one frame. Returns `false` for a tick that was not expected
    /// (stopped, or superseded), in which case nothing is touched.
    pub fn on_tick<H: ClockHost + ?Sized>(&mut self, handle: TickHandle, host: &mut H) -> bool {
        if !self.animation.accept(handle) {
            trace!("ignoring tick {:?}", handle);
            return false;
        }
        let now = host.now_ms();

        self.drain_inboxes();

        // A zone override shifts the instant the sky is computed for.
        let local = host.local_offset_minutes(now);
        let (sky_ms, offset) = match self.config.timezone_override {
            Some(tz) => (now + f64::from(tz - local) * 60_000.0, tz),
            None => (now, local),
        };

        let viewport = host.viewport();
        if viewport != self.effects.viewport() {
            self.resize(viewport, host);
        }

        let spin = lighting::cloud_spin(sky_ms);
        self.scene
            .update(NodeKind::Clouds, |n| n.rotation = Quat::from_rotation_y(spin));

        let sky = SkySnapshot::compute(sky_ms, &self.observer, &self.config.features);
        self.place_sun_and_moon(&sky);
        self.place_planets(&sky);
        self.poll_satellite(now, host);
        self.light_surroundings(sky.sun.altitude);
        self.refresh_overlay(&sky, now, offset, viewport);
        self.sky = Some(sky);

        if !self.observer.is_pinned() {
            let ticket = self.locations.issue(now);
            host.request_location(ticket);
        }

        self.frames += 1;
        let frame = Frame {
            scene: &self.scene,
            camera: &self.camera,
            effects: &self.effects,
            overlay: &self.overlay,
            frame_index: self.frames,
            camera_reset: self.camera_reset,
        };
        host.render(&frame);
        self.camera_reset = false;

        self.animation.reschedule(host, self.frame_rate.delay_ms());
        true
    }

    // ---- Tick steps ----

    fn drain_inboxes(&mut self) {
        if let Some((ticket, fix)) = self.locations.take() {
            if self.observer.apply_fix(fix.latitude, fix.longitude) {
                debug!(
                    "location #{} applied: ({}, {})",
                    ticket.seq,
                    self.observer.latitude(),
                    self.observer.longitude()
                );
            }
        }

        if let Some((ticket, fix)) = self.satellites.take() {
            let pos = look_angles(&fix, self.observer.latitude(), self.observer.longitude());
            debug!(
                "satellite #{} applied: alt={:.3} az={:.3}",
                ticket.seq, pos.altitude, pos.azimuth
            );
            self.satellite = Some(pos);
            self.poller.on_fix();
            self.scene.update(NodeKind::Satellite, |n| {
                n.position = pos.to_scene(SATELLITE_RADIUS);
            });
        }
    }

    fn place_sun_and_moon(&mut self, sky: &SkySnapshot) {
        let sun = sky.sun_scene();
        let moon = sky.moon_scene();
        let tint = lighting::sun_tint(sky.sun.altitude);

        self.scene.update(NodeKind::Sun, |n| {
            n.position = sun;
            n.color = tint.emissive;
        });
        self.scene.update(NodeKind::SunLight, |n| {
            n.color = tint.light_color;
            n.intensity = tint.intensity;
        });

        let glow = lighting::moon_glow(sun, moon, sky.sun.altitude, sky.moon.position.altitude);
        self.scene.update(NodeKind::Moon, |n| n.position = moon);
        self.scene
            .update(NodeKind::MoonLight, |n| n.intensity = glow);

        let cover = lighting::terminator_orientation(moon, sun);
        self.scene
            .update(NodeKind::MoonCover, |n| n.rotation = cover);
    }

    fn place_planets(&mut self, sky: &SkySnapshot) {
        let Some(planets) = &sky.planets else {
            return;
        };
        for (planet, pos) in planets.iter() {
            let at: Vec3 = pos.to_scene(PLANET_RADIUS);
            self.scene
                .update(NodeKind::Planet(planet), |n| n.position = at);
        }
    }

    fn poll_satellite<H: ClockHost + ?Sized>(&mut self, now: f64, host: &mut H) {
        if !self.config.features.satellite {
            return;
        }
        if self.poller.step(now) == PollAction::Poll {
            let ticket = self.satellites.issue(now);
            debug!("satellite poll #{}", ticket.seq);
            host.request_satellite(
                ticket,
                SatelliteQuery {
                    at_ms: now,
                    latitude: self.observer.latitude(),
                    longitude: self.observer.longitude(),
                },
            );
        }
        let emissive = self.poller.emissive();
        self.scene
            .update(NodeKind::Satellite, |n| n.color = emissive);
    }

    fn light_surroundings(&mut self, sun_altitude: f64) {
        let ambient = lighting::ambient(sun_altitude);
        self.scene.update(NodeKind::AmbientLight, |n| {
            n.color = ambient.color;
            n.intensity = ambient.intensity;
        });

        let lamp = lighting::lamp_color(sun_altitude, self.flicker.next_f32());
        self.scene
            .update(NodeKind::LampLight, |n| n.color = lamp);
    }

    fn refresh_overlay(&mut self, sky: &SkySnapshot, now: f64, offset: i32, viewport: Viewport) {
        let civil = format::civil_time(now, offset);
        let o = &mut self.overlay;
        o.get_mut(OverlayId::Time)
            .set_text(format::time_text(civil.as_ref()));
        o.get_mut(OverlayId::Date)
            .set_text(format::date_text(civil.as_ref()));
        o.get_mut(OverlayId::Timezone)
            .set_text(format::timezone_text(offset));
        o.get_mut(OverlayId::Coordinates).set_text(format::coordinates_text(
            self.observer.latitude(),
            self.observer.longitude(),
        ));
        o.get_mut(OverlayId::SunReadout)
            .set_text(format::sun_text(&sky.sun));
        o.get_mut(OverlayId::MoonReadout)
            .set_text(format::moon_text(&sky.moon.position, &sky.illumination));
        o.get_mut(OverlayId::FpsButton)
            .set_text(self.frame_rate.label());
        o.get_mut(OverlayId::PovButton).set_text(self.pov.label());

        o.set_color_all(lighting::text_color(sky.sun.altitude));
        o.layout(viewport);
    }

    // ---- Async results ----

    /// Deliver a device location. Stale or superseded results are dropped.
    pub fn post_location(&mut self, ticket: Ticket, fix: LocationFix) -> bool {
        let accepted = self.locations.post(ticket, fix);
        if !accepted {
            trace!("stale location #{} dropped", ticket.seq);
        }
        accepted
    }

    pub fn post_satellite(&mut self, ticket: Ticket, fix: SatelliteFix) -> bool {
        let accepted = self.satellites.post(ticket, fix);
        if !accepted {
            trace!("stale satellite fix #{} dropped", ticket.seq);
        }
        accepted
    }

    // ---- UI ----

    pub fn toggle_frame_rate(&mut self) -> FrameRate {
        self.frame_rate = self.frame_rate.toggled();
        info!("frame rate: {}", self.frame_rate.label());
        self.frame_rate
    }

    /// Switch camera point of view. No-op when the feature is off.
    pub fn toggle_pov(&mut self) -> PovMode {
        if !self.config.features.pov_toggle {
            return self.pov;
        }
        self.pov = self.pov.toggled();
        let aspect = self.camera.aspect;
        self.camera = CameraRig::for_pov(self.pov);
        self.camera.aspect = aspect;
        self.camera_reset = true;
        info!("point of view: {}", self.pov.label());
        self.pov
    }

    pub fn resize<R: Renderer + ?Sized>(&mut self, viewport: Viewport, renderer: &mut R) {
        self.camera.resize(viewport);
        self.effects.resize(viewport);
        self.overlay.layout(viewport);
        renderer.resize(viewport);
        debug!("resized to {}x{}", viewport.width, viewport.height);
    }

    // ---- Scene membership ----

    pub fn attach(&mut self, kind: NodeKind) -> bool {
        let attached = self.scene.attach(kind);
        if attached {
            debug!("{} attached", kind);
        } else {
            warn!("attach of undeclared node {}", kind);
        }
        attached
    }

    pub fn detach(&mut self, kind: NodeKind) -> bool {
        self.scene.detach(kind)
    }

    /// A host asset failed to load. The node stays absent for the session.
    pub fn asset_failed(&mut self, kind: NodeKind, reason: &str) -> AssetError {
        self.scene.detach(kind);
        let err = AssetError {
            node: kind.to_string(),
            reason: reason.to_string(),
        };
        warn!("{}", err);
        err
    }

    pub fn measure_overlay(&mut self, id: OverlayId, width: f32, height: f32) {
        self.overlay.set_measured(id, width, height);
    }

    // ---- Accessors ----

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn blueprint(&self) -> &SceneBlueprint {
        &self.blueprint
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn effects(&self) -> &EffectsPipeline {
        &self.effects
    }

    /// Body positions from the most recent tick.
    pub fn sky(&self) -> Option<&SkySnapshot> {
        self.sky.as_ref()
    }

    /// Last applied satellite look angles.
    pub fn satellite(&self) -> Option<CelestialPosition> {
        self.satellite
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn pov(&self) -> PovMode {
        self.pov
    }

    pub fn state(&self) -> LoopState {
        self.animation.state()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{FeatureSet, Variant};
    use crate::api::host::{Environment, LocationSource, SatelliteSource};
    use std::f64::consts::PI;

    /// 2024-12-21T17:35:30Z, local solar noon in Atlanta.
    const ATLANTA_NOON_MS: f64 = 1_734_802_530_000.0;
    const ATLANTA_MIDNIGHT_MS: f64 = ATLANTA_NOON_MS + 43_200_000.0;
    const ATLANTA: (f64, f64) = (33.749, -84.388);

    #[derive(Debug, Clone, PartialEq)]
    struct Rendered {
        frame_index: u64,
        camera_reset: bool,
        sun: Vec3,
    }

    struct MockHost {
        now: f64,
        offset: i32,
        viewport: Viewport,
        next_handle: u32,
        scheduled: Vec<(TickHandle, u32)>,
        cancelled: Vec<TickHandle>,
        location_requests: Vec<Ticket>,
        satellite_requests: Vec<(Ticket, SatelliteQuery)>,
        rendered: Vec<Rendered>,
        resizes: usize,
    }

    impl MockHost {
        fn at(now: f64) -> Self {
            Self {
                now,
                offset: -300,
                viewport: Viewport::new(1200.0, 800.0),
                next_handle: 0,
                scheduled: Vec::new(),
                cancelled: Vec::new(),
                location_requests: Vec::new(),
                satellite_requests: Vec::new(),
                rendered: Vec::new(),
                resizes: 0,
            }
        }

        fn last_scheduled(&self) -> (TickHandle, u32) {
            *self.scheduled.last().unwrap()
        }
    }

    impl Environment for MockHost {
        fn now_ms(&self) -> f64 {
            self.now
        }

        fn local_offset_minutes(&self, _at_ms: f64) -> i32 {
            self.offset
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }
    }

    impl FrameScheduler for MockHost {
        fn schedule(&mut self, delay_ms: u32) -> TickHandle {
            self.next_handle += 1;
            let handle = TickHandle(self.next_handle);
            self.scheduled.push((handle, delay_ms));
            handle
        }

        fn cancel(&mut self, handle: TickHandle) {
            self.cancelled.push(handle);
        }
    }

    impl LocationSource for MockHost {
        fn request_location(&mut self, ticket: Ticket) {
            self.location_requests.push(ticket);
        }
    }

    impl SatelliteSource for MockHost {
        fn request_satellite(&mut self, ticket: Ticket, query: SatelliteQuery) {
            self.satellite_requests.push((ticket, query));
        }
    }

    impl Renderer for MockHost {
        fn render(&mut self, frame: &Frame<'_>) {
            let sun = frame
                .scene
                .get(NodeKind::Sun)
                .map_or(Vec3::ZERO, |n| n.position);
            self.rendered.push(Rendered {
                frame_index: frame.frame_index,
                camera_reset: frame.camera_reset,
                sun,
            });
        }

        fn resize(&mut self, _viewport: Viewport) {
            self.resizes += 1;
        }
    }

    fn pinned_config() -> ClockConfig {
        ClockConfig::default().with_position(ATLANTA.0, ATLANTA.1)
    }

    fn started(config: ClockConfig, now: f64) -> (SkyClock, MockHost) {
        let mut host = MockHost::at(now);
        let mut clock = SkyClock::new(config, now);
        clock.init(&mut host);
        for i in 0..NodeKind::COUNT as u32 {
            if let Some(kind) = NodeKind::from_index(i) {
                clock.attach(kind);
            }
        }
        assert!(clock.start(&mut host));
        (clock, host)
    }

    /// Fire the pending tick after its delay.
    fn fire(clock: &mut SkyClock, host: &mut MockHost) -> bool {
        let (handle, delay) = host.last_scheduled();
        host.now += delay as f64;
        clock.on_tick(handle, host)
    }

    fn node(clock: &SkyClock, kind: NodeKind) -> &crate::components::node::SceneNode {
        clock.scene().get(kind).unwrap()
    }

    fn iss_fix() -> SatelliteFix {
        SatelliteFix {
            latitude: 35.0,
            longitude: -84.0,
            altitude_km: 420.0,
        }
    }

    #[test]
    fn double_start_schedules_once() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        assert!(!clock.start(&mut host));
        assert_eq!(host.scheduled.len(), 1);
        assert_eq!(host.last_scheduled().1, 0);
    }

    #[test]
    fn each_tick_renders_once_and_reschedules() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        assert!(fire(&mut clock, &mut host));
        assert!(fire(&mut clock, &mut host));
        assert_eq!(host.rendered.len(), 2);
        assert_eq!(host.rendered[1].frame_index, 2);
        assert_eq!(host.scheduled.len(), 3);
        assert_eq!(host.last_scheduled().1, FrameRate::Low.delay_ms());
    }

    #[test]
    fn stop_cancels_and_ignores_late_ticks() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        let (pending, _) = host.last_scheduled();

        assert!(clock.stop(&mut host));
        assert!(!clock.stop(&mut host));
        assert_eq!(host.cancelled, vec![pending]);
        assert_eq!(clock.state(), LoopState::Stopped);

        // The timer fires anyway.
        assert!(!clock.on_tick(pending, &mut host));
        assert_eq!(host.rendered.len(), 1);
    }

    #[test]
    fn superseded_handle_is_ignored() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        let (first, _) = host.last_scheduled();
        fire(&mut clock, &mut host);
        assert!(!clock.on_tick(first, &mut host));
        assert_eq!(host.rendered.len(), 1);
    }

    #[test]
    fn at_most_one_satellite_poll_per_interval() {
        let mut config = pinned_config();
        config.frame_rate = FrameRate::High;
        let (mut clock, mut host) = started(config, ATLANTA_NOON_MS);
        for _ in 0..400 {
            fire(&mut clock, &mut host);
        }
        // 400 ticks at 25 ms = 10 s.
        let times: Vec<f64> = host.satellite_requests.iter().map(|(_, q)| q.at_ms).collect();
        assert!(times.len() >= 4 && times.len() <= 5, "{} polls", times.len());
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= 2000.0);
        }
        assert!(times[0] >= ATLANTA_NOON_MS + 100.0);
    }

    #[test]
    fn satellite_fix_moves_marker() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        fire(&mut clock, &mut host);
        let (ticket, query) = host.satellite_requests[0];
        assert_eq!(query.latitude, ATLANTA.0);

        assert!(clock.post_satellite(ticket, iss_fix()));
        fire(&mut clock, &mut host);

        let marker = node(&clock, NodeKind::Satellite);
        assert!((marker.position.length() - SATELLITE_RADIUS).abs() < 1e-4);
        assert_eq!(marker.color, [1.0, 0.0, 0.0]);
        assert!(clock.satellite().unwrap().is_up());
    }

    #[test]
    fn late_satellite_result_after_stop_is_dropped() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        fire(&mut clock, &mut host);
        let (ticket, _) = host.satellite_requests[0];

        clock.stop(&mut host);
        assert!(!clock.post_satellite(ticket, iss_fix()));

        clock.start(&mut host);
        fire(&mut clock, &mut host);
        assert_eq!(node(&clock, NodeKind::Satellite).position, Vec3::ZERO);
        assert!(clock.satellite().is_none());
    }

    #[test]
    fn older_satellite_result_never_overwrites_newer() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        for _ in 0..30 {
            fire(&mut clock, &mut host);
        }
        assert!(host.satellite_requests.len() >= 2);
        let (old, _) = host.satellite_requests[0];
        let (new, _) = host.satellite_requests[1];

        assert!(clock.post_satellite(new, iss_fix()));
        assert!(!clock.post_satellite(old, SatelliteFix {
            latitude: -35.0,
            longitude: 96.0,
            altitude_km: 420.0,
        }));
        fire(&mut clock, &mut host);
        assert!(clock.satellite().unwrap().is_up());
    }

    #[test]
    fn atlanta_noon() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);

        let sky = clock.sky().unwrap();
        assert!(sky.sun.altitude > 0.0);
        assert!((sky.sun.azimuth - PI).abs() < 0.05);

        let sun = node(&clock, NodeKind::Sun).position;
        assert!(sun.y > 0.0 && sun.z > 0.0);
        assert_eq!(host.rendered[0].sun, sun);

        assert_eq!(node(&clock, NodeKind::LampLight).color, [0.0, 0.0, 0.0]);
        let sun_light = node(&clock, NodeKind::SunLight);
        assert!(sun_light.intensity > 0.0 && sun_light.intensity <= 5.0);
        assert_eq!(clock.overlay().get(OverlayId::Time).color, "#5de356");
    }

    #[test]
    fn atlanta_midnight() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_MIDNIGHT_MS);
        fire(&mut clock, &mut host);

        let sky = clock.sky().unwrap();
        assert!(sky.sun.altitude < 0.0);
        assert!(node(&clock, NodeKind::Sun).position.y < 0.0);
        assert_eq!(node(&clock, NodeKind::SunLight).intensity, 0.0);

        let lamp = node(&clock, NodeKind::LampLight).color;
        assert!(lamp[0] >= 0.8 && lamp[1] == 0.4);
        let ambient = node(&clock, NodeKind::AmbientLight).intensity;
        assert!((ambient - lighting::AMBIENT_FLOOR).abs() < 1e-6);
        assert_eq!(clock.overlay().get(OverlayId::Date).color, "cornflowerblue");
    }

    #[test]
    fn absent_nodes_are_left_alone() {
        let mut host = MockHost::at(ATLANTA_NOON_MS);
        let mut clock = SkyClock::new(pinned_config(), ATLANTA_NOON_MS);
        clock.init(&mut host);
        clock.start(&mut host);
        assert!(fire(&mut clock, &mut host));
        assert_eq!(node(&clock, NodeKind::Sun).position, Vec3::ZERO);
        assert_eq!(host.rendered.len(), 1);
    }

    #[test]
    fn failed_asset_stays_absent() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        let err = clock.asset_failed(NodeKind::Clouds, "404");
        assert_eq!(err.node, "clouds");
        fire(&mut clock, &mut host);
        assert!(!clock.scene().is_present(NodeKind::Clouds));
        assert_eq!(node(&clock, NodeKind::Clouds).rotation, Quat::IDENTITY);
    }

    #[test]
    fn device_location_flows_through_inbox() {
        let (mut clock, mut host) = started(ClockConfig::default(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        assert_eq!(host.location_requests.len(), 1);
        assert_eq!(clock.observer().latitude(), 0.0);

        let ticket = host.location_requests[0];
        assert!(clock.post_location(ticket, LocationFix {
            latitude: 95.0,
            longitude: 200.0,
        }));
        fire(&mut clock, &mut host);
        assert_eq!(clock.observer().latitude(), crate::astro::MAX_LATITUDE);
        assert!((clock.observer().longitude() + 160.0).abs() < 1e-9);
        assert_eq!(host.location_requests.len(), 2);
        assert!(clock
            .overlay()
            .get(OverlayId::Coordinates)
            .text
            .starts_with("GCS [89.999999"));
    }

    #[test]
    fn pinned_observer_ignores_device() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        for _ in 0..3 {
            fire(&mut clock, &mut host);
        }
        assert!(host.location_requests.is_empty());
        assert_eq!(clock.observer().latitude(), ATLANTA.0);
    }

    #[test]
    fn timezone_override_shifts_the_sky_instant() {
        let (mut clock, mut host) =
            started(pinned_config().with_timezone(330), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        assert_eq!(host.now, ATLANTA_NOON_MS);
        assert_eq!(clock.overlay().get(OverlayId::Time).text, "23:05:30");
        assert_eq!(clock.overlay().get(OverlayId::Timezone).text, "UTC+05:30");

        // Device is at UTC-05:00, so the sky moves forward 330 + 300 minutes.
        let shifted = ATLANTA_NOON_MS + f64::from(330 + 300) * 60_000.0;
        let expected = crate::astro::sun_position(shifted, ATLANTA.0, ATLANTA.1);
        let sun = clock.sky().unwrap().sun;
        assert_eq!(sun, expected);
        assert!(sun.altitude < 0.0);
        assert!(node(&clock, NodeKind::Sun).position.y < 0.0);
        assert_eq!(
            node(&clock, NodeKind::Clouds).rotation,
            Quat::from_rotation_y(lighting::cloud_spin(shifted))
        );
    }

    #[test]
    fn no_override_uses_the_true_instant() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        assert_eq!(clock.overlay().get(OverlayId::Time).text, "12:35:30");
        assert_eq!(clock.overlay().get(OverlayId::Timezone).text, "UTC-05:00");
        let expected = crate::astro::sun_position(ATLANTA_NOON_MS, ATLANTA.0, ATLANTA.1);
        assert_eq!(clock.sky().unwrap().sun, expected);
    }

    #[test]
    fn override_matching_device_zone_is_a_no_op() {
        let (mut clock, mut host) =
            started(pinned_config().with_timezone(-300), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        let expected = crate::astro::sun_position(ATLANTA_NOON_MS, ATLANTA.0, ATLANTA.1);
        assert_eq!(clock.sky().unwrap().sun, expected);
        assert_eq!(clock.overlay().get(OverlayId::Time).text, "12:35:30");
    }

    #[test]
    fn frame_rate_toggle_changes_delay() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        assert_eq!(clock.toggle_frame_rate(), FrameRate::High);
        fire(&mut clock, &mut host);
        assert_eq!(host.last_scheduled().1, 25);
        assert_eq!(clock.overlay().get(OverlayId::FpsButton).text, "40 FPS");
    }

    #[test]
    fn pov_toggle_resets_camera_once() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        assert_eq!(clock.toggle_pov(), PovMode::First);
        assert_eq!(clock.camera().max_distance, 0.001);
        fire(&mut clock, &mut host);
        fire(&mut clock, &mut host);
        assert!(host.rendered[0].camera_reset);
        assert!(!host.rendered[1].camera_reset);
        assert_eq!(clock.overlay().get(OverlayId::PovButton).text, "1st POV");
    }

    #[test]
    fn base_variant_skips_extended_work() {
        let config = pinned_config().with_variant(Variant::Base);
        assert_eq!(config.features, FeatureSet::BASE);
        let (mut clock, mut host) = started(config, ATLANTA_NOON_MS);
        for _ in 0..30 {
            fire(&mut clock, &mut host);
        }
        assert!(host.satellite_requests.is_empty());
        assert!(clock.sky().unwrap().planets.is_none());
        assert_eq!(clock.toggle_pov(), PovMode::Third);
        assert!(!clock.overlay().get(OverlayId::PovButton).visible);
    }

    #[test]
    fn planets_land_on_their_sphere() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        fire(&mut clock, &mut host);
        for planet in crate::astro::Planet::ALL {
            let p = node(&clock, NodeKind::Planet(planet)).position;
            assert!((p.length() - PLANET_RADIUS).abs() < 1e-4, "{planet:?}");
        }
    }

    #[test]
    fn viewport_change_resizes_once() {
        let (mut clock, mut host) = started(pinned_config(), ATLANTA_NOON_MS);
        let after_init = host.resizes;
        fire(&mut clock, &mut host);
        assert_eq!(host.resizes, after_init);

        host.viewport = Viewport::new(400.0, 900.0);
        fire(&mut clock, &mut host);
        fire(&mut clock, &mut host);
        assert_eq!(host.resizes, after_init + 1);
        assert_eq!(clock.effects().generation(), 2);
        assert_eq!(clock.overlay().get(OverlayId::Time).font_size, 47.0);
    }
}
