use crate::api::SequencerApi;
use crate::error::{ClientError, Result};
use crate::image_cache::{as_data_url, ImageCache};
use seqmirror_core::{
    any_running, assign_paths, existing_equipment, extract_guide_series, is_at_least,
    CollapsedStates, Container, Envelope, GuideSeries, Snapshot,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Minimum controller API version the engine will mirror.
pub const MINIMUM_API_VERSION: &str = "2.1.7.0";

/// Polls the controller on a cadence and reconciles the results into one
/// snapshot.
///
/// Subsystem fetches within a tick run concurrently and fail independently: a
/// rejected envelope keeps the previous field value, while an unreachable or
/// incompatible backend clears the whole snapshot. Nothing here panics; every
/// failure path leaves the snapshot in a well-defined state.
pub struct PollingEngine {
    api: Arc<dyn SequencerApi>,
    minimum_version: String,
    snapshot: RwLock<Snapshot>,
    collapsed: Mutex<CollapsedStates>,
    image_cache: Mutex<ImageCache>,
    sequence_editable: AtomicBool,
}

/// Owned handle for a running poll loop. Dropping it does not stop the loop.
pub struct EngineHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Stops the loop. Safe at any time; a tick already in flight lets its
    /// fetches settle but commits nothing afterwards.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Stops and waits for the loop to wind down.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}

impl PollingEngine {
    pub fn new(api: Arc<dyn SequencerApi>) -> Arc<Self> {
        Self::with_minimum_version(api, MINIMUM_API_VERSION)
    }

    pub fn with_minimum_version(
        api: Arc<dyn SequencerApi>,
        minimum: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            minimum_version: minimum.into(),
            snapshot: RwLock::new(Snapshot::default()),
            collapsed: Mutex::new(CollapsedStates::new()),
            image_cache: Mutex::new(ImageCache::new()),
            sequence_editable: AtomicBool::new(true),
        })
    }

    /// Begins the repeating poll. Ticks are serialized: the next tick is not
    /// examined until the previous cycle has fully settled.
    pub fn start(self: &Arc<Self>, period: Duration) -> EngineHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let commit_guard = stop_rx.clone();
        let engine = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = tick.tick() => {}
                }
                engine.sync_tick(&commit_guard).await;
            }
            debug!("polling loop exited");
        });
        EngineHandle {
            stop: stop_tx,
            task,
        }
    }

    /// Runs one full poll-and-reconcile cycle on demand.
    pub async fn sync_once(&self) {
        let (_keep_alive, stop) = watch::channel(false);
        self.sync_tick(&stop).await;
    }

    /// A copy of the current reconciled state.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Whether the lightweight sequence-state query is still in use.
    pub fn sequence_editable(&self) -> bool {
        self.sequence_editable.load(Ordering::Relaxed)
    }

    pub async fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.lock().await.is_collapsed(path)
    }

    pub async fn toggle_collapsed(&self, path: &str) {
        self.collapsed.lock().await.toggle(path);
    }

    /// Fetches a sequence image, serving repeat requests from the single-slot
    /// cache when the cached entry has equal-or-better quality and scale.
    ///
    /// A non-200 envelope or transport failure leaves the cache untouched and
    /// surfaces as an error.
    pub async fn image_by_index(&self, index: u32, quality: u8, scale: f64) -> Result<String> {
        if let Some(hit) = self
            .image_cache
            .lock()
            .await
            .lookup(index, quality, scale)
            .map(str::to_string)
        {
            debug!(index, "image served from cache");
            return Ok(hit);
        }
        let envelope = self.api.sequence_image(index, quality, true, scale).await?;
        if envelope.status_code != 200 {
            return Err(ClientError::ImageUnavailable {
                status_code: envelope.status_code,
            });
        }
        let Some(data) = envelope.response else {
            return Err(ClientError::ImageUnavailable {
                status_code: envelope.status_code,
            });
        };
        let image = as_data_url(&data);
        self.image_cache
            .lock()
            .await
            .store(index, quality, scale, image.clone());
        Ok(image)
    }

    async fn sync_tick(&self, stop: &watch::Receiver<bool>) {
        let version = match self.api.version().await {
            Ok(env) if env.success => env.response,
            Ok(env) => {
                warn!("backend not reachable: {}", env.error_message());
                self.reset(stop).await;
                return;
            }
            Err(e) => {
                warn!("backend not reachable: {e}");
                self.reset(stop).await;
                return;
            }
        };
        let Some(version) = version else {
            warn!("backend not reachable: version probe returned no payload");
            self.reset(stop).await;
            return;
        };
        if !is_at_least(&version, &self.minimum_version) {
            warn!(
                current = %version,
                minimum = %self.minimum_version,
                "controller api version is too old; clearing mirrored state"
            );
            self.reset(stop).await;
            return;
        }

        let (
            sequence,
            image_history,
            camera,
            mount,
            filter_wheel,
            rotator,
            focuser,
            focuser_autofocus,
            guider,
            flat_device,
            dome,
            guider_graph,
            safety,
            weather,
            switches,
        ) = tokio::join!(
            self.fetch_sequence(),
            self.api.image_history(),
            self.api.camera_info(),
            self.api.mount_info(),
            self.api.filter_info(),
            self.api.rotator_info(),
            self.api.focuser_info(),
            self.api.focuser_autofocus_info(),
            self.api.guider_info(),
            self.api.flatdevice_info(),
            self.api.dome_info(),
            self.api.guider_graph(),
            self.api.safety_info(),
            self.api.weather_info(),
            self.api.switch_info(),
        );

        if *stop.borrow() {
            debug!("engine stopped mid-tick; discarding results");
            return;
        }

        {
            let mut snap = self.snapshot.write().await;
            snap.backend_reachable = true;
            snap.version_compatible = true;
            snap.current_api_version = Some(version);

            apply(&mut snap.image_history, image_history, "image history");
            apply(&mut snap.camera, camera, "camera");
            apply(&mut snap.mount, mount, "mount");
            apply(&mut snap.filter_wheel, filter_wheel, "filter wheel");
            apply(&mut snap.focuser, focuser, "focuser");
            apply(
                &mut snap.focuser_autofocus,
                focuser_autofocus,
                "focuser autofocus",
            );
            apply(&mut snap.rotator, rotator, "rotator");
            apply(&mut snap.guider, guider, "guider");
            apply(&mut snap.flat_device, flat_device, "flat device");
            apply(&mut snap.dome, dome, "dome");
            apply(&mut snap.safety, safety, "safety monitor");
            apply(&mut snap.weather, weather, "weather");
            apply(&mut snap.switches, switches, "switch");

            apply_guider_graph(&mut snap, guider_graph);
            apply_sequence(&mut snap, sequence);
        }

        // The equipment profile only makes sense once the backend has passed
        // the reachability and version checks above.
        let profile = self.api.profile_active().await;
        if *stop.borrow() {
            debug!("engine stopped mid-tick; discarding profile");
            return;
        }
        let mut snap = self.snapshot.write().await;
        match profile {
            Ok(env) => match env.response {
                Some(payload) => {
                    snap.existing_equipment_list = existing_equipment(&payload);
                    snap.profile = payload;
                }
                None => warn!("profile fetch rejected: {}", env.error_message()),
            },
            Err(e) => warn!("profile fetch failed: {e}"),
        }
    }

    /// Dual-mode sequence fetch: prefer the lightweight state query until it
    /// proves unsupported, then stick to the full json query for the rest of
    /// the session.
    async fn fetch_sequence(&self) -> Result<Envelope<Value>> {
        if self.sequence_editable.load(Ordering::Relaxed) {
            match self.api.sequence_state().await {
                Ok(env) if env.status_code != 0 && env.status_code != 500 => return Ok(env),
                Ok(env) => self.degrade_sequence_mode(&format!(
                    "state query returned status {}",
                    env.status_code
                )),
                Err(e) => self.degrade_sequence_mode(&format!("state query failed: {e}")),
            }
        }
        self.api.sequence_json().await
    }

    fn degrade_sequence_mode(&self, reason: &str) {
        // swap so the downgrade is logged exactly once
        if self.sequence_editable.swap(false, Ordering::Relaxed) {
            info!("sequence state endpoint unsupported ({reason}); using full json query from now on");
        }
    }

    async fn reset(&self, stop: &watch::Receiver<bool>) {
        if *stop.borrow() {
            return;
        }
        self.snapshot.write().await.clear();
    }
}

/// Commits one subsystem envelope. Rejections keep the previous value so a
/// single failing endpoint never disturbs the rest of the snapshot.
fn apply(slot: &mut Value, fetched: Result<Envelope<Value>>, subsystem: &str) {
    match fetched {
        Ok(env) if env.success => *slot = env.response.unwrap_or(Value::Null),
        Ok(env) => warn!("{subsystem} fetch rejected: {}", env.error_message()),
        Err(e) => warn!("{subsystem} fetch failed: {e}"),
    }
}

fn apply_guider_graph(snap: &mut Snapshot, fetched: Result<Envelope<Value>>) {
    match fetched {
        Ok(env) if env.success => {
            let graph = env.response.unwrap_or(Value::Null);
            match extract_guide_series(&graph) {
                Some(series) => snap.guide_series = series,
                None => {
                    warn!("guider graph payload has no GuideSteps array");
                    snap.guide_series = GuideSeries::default();
                }
            }
            snap.guider_chart = graph;
        }
        Ok(env) => warn!("guider graph fetch rejected: {}", env.error_message()),
        Err(e) => warn!("guider graph fetch failed: {e}"),
    }
}

fn apply_sequence(snap: &mut Snapshot, fetched: Result<Envelope<Value>>) {
    let envelope = match fetched {
        Ok(env) => env,
        Err(e) => {
            warn!("sequence fetch failed: {e}");
            snap.sequence_is_loaded = false;
            snap.sequence_running = false;
            return;
        }
    };
    if !envelope.success {
        warn!("sequence fetch rejected: {}", envelope.error_message());
        snap.sequence_is_loaded = false;
        snap.sequence_running = false;
        return;
    }
    let mut tree: Vec<Container> = match envelope.response {
        Some(value) => match serde_json::from_value(value) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("sequence payload did not parse as a container list: {e}");
                snap.sequence_is_loaded = false;
                snap.sequence_running = false;
                return;
            }
        },
        None => Vec::new(),
    };
    assign_paths(&mut tree);
    snap.sequence_running = any_running(&tree);
    snap.sequence_is_loaded = true;
    snap.sequence_tree = tree;
}
