//! Asynchronous model loading with superseding requests.
//!
//! Every request gets a generation number. Loads run on a background task
//! (a tokio runtime natively, the browser's executor on wasm32) and report
//! back through a channel that the frame loop drains without blocking. Only
//! the outcome of the newest request is ever handed out; results of older
//! requests that arrive late are discarded.

use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use futures::StreamExt;
use futures::channel::mpsc;
use log::{debug, info, warn};

use crate::{
    data_structures::scene_graph::SceneGraph,
    error::ConfiguratorError,
    resources::{UriBase, decode_gltf, load_binary, load_file},
};

/// Where a model comes from.
#[derive(Clone, Debug)]
pub enum ModelSource {
    /// A file in the assets directory, e.g. `Wardrobe.glb`.
    Asset(String),
    Path(PathBuf),
    /// A file the user picked, already read into memory.
    Bytes { name: String, data: Vec<u8> },
}

impl ModelSource {
    /// Accepts user uploads, which must be `.gltf` or `.glb` files.
    pub fn upload(name: impl Into<String>, data: Vec<u8>) -> Result<Self, ConfiguratorError> {
        let name = name.into();
        check_extension(&name)?;
        Ok(Self::Bytes { name, data })
    }

    pub fn path(path: impl Into<PathBuf>) -> Result<Self, ConfiguratorError> {
        let path = path.into();
        check_extension(&path.to_string_lossy())?;
        Ok(Self::Path(path))
    }

    pub fn name(&self) -> String {
        match self {
            ModelSource::Asset(name) => name.clone(),
            ModelSource::Path(path) => path.display().to_string(),
            ModelSource::Bytes { name, .. } => name.clone(),
        }
    }

    pub async fn fetch(self) -> anyhow::Result<SceneGraph> {
        match self {
            ModelSource::Asset(name) => {
                let data = load_binary(&name).await?;
                decode_gltf(&data, &name, &UriBase::Assets).await
            }
            ModelSource::Path(path) => {
                let data = load_file(&path).await?;
                let base = path
                    .parent()
                    .map(|dir| UriBase::Directory(dir.to_path_buf()))
                    .unwrap_or(UriBase::Assets);
                decode_gltf(&data, &path.display().to_string(), &base).await
            }
            ModelSource::Bytes { name, data } => decode_gltf(&data, &name, &UriBase::Assets).await,
        }
    }
}

fn check_extension(name: &str) -> Result<(), ConfiguratorError> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".gltf") || lower.ends_with(".glb") {
        Ok(())
    } else {
        Err(ConfiguratorError::UnsupportedModelFormat(name.to_string()))
    }
}

/// Completion signal of one load request.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub origin: String,
    pub result: Result<SceneGraph, ConfiguratorError>,
}

pub struct ModelLoader {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    sender: mpsc::UnboundedSender<LoadOutcome>,
    receiver: mpsc::UnboundedReceiver<LoadOutcome>,
    latest: u64,
    in_flight: bool,
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("latest", &self.latest)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl ModelLoader {
    pub fn new() -> Result<Self, ConfiguratorError> {
        let (sender, receiver) = mpsc::unbounded();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("model-loader")
                .enable_all()
                .build()?,
            sender,
            receiver,
            latest: 0,
            in_flight: false,
        })
    }

    /// Starts loading `source` and supersedes every earlier request.
    pub fn request(&mut self, source: ModelSource) -> u64 {
        self.latest += 1;
        self.in_flight = true;
        let generation = self.latest;
        let origin = source.name();
        let sender = self.sender.clone();
        info!("Loading model `{}` (request {})", origin, generation);

        let task = async move {
            let result = source
                .fetch()
                .await
                .map_err(|e| ConfiguratorError::load_failure(origin.clone(), &e));
            if sender
                .unbounded_send(LoadOutcome {
                    generation,
                    origin,
                    result,
                })
                .is_err()
            {
                debug!("Loader was dropped before request {} finished", generation);
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(task);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);

        generation
    }

    /// True while the newest request has not reported back.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn latest_request(&self) -> u64 {
        self.latest
    }

    /// Invalidates every pending request, e.g. when a model was installed by other means.
    pub fn supersede(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = false;
        self.latest
    }

    /// Non-blocking: returns the newest request's outcome once it arrived.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let mut newest = None;
        while let Ok(Some(outcome)) = self.receiver.try_next() {
            if let Some(outcome) = self.accept(outcome) {
                newest = Some(outcome);
            }
        }
        newest
    }

    /**
     * Blocks until the newest request reports back or `timeout` passes.
     *
     * Meant for native hosts that want the model before showing the first frame.
     * Returns right away when no request is pending.
     */
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<LoadOutcome> {
        let deadline = instant::Instant::now() + timeout;
        while self.in_flight {
            let remaining = deadline.saturating_duration_since(instant::Instant::now());
            let receiver = &mut self.receiver;
            let next = self
                .async_runtime
                .block_on(async move { tokio::time::timeout(remaining, receiver.next()).await });
            match next {
                Ok(Some(outcome)) => {
                    if let Some(outcome) = self.accept(outcome) {
                        return Some(outcome);
                    }
                }
                Ok(None) => return None,
                Err(_) => {
                    warn!("Timed out after {:?} waiting for model request {}", timeout, self.latest);
                    return None;
                }
            }
        }
        None
    }

    fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if outcome.generation < self.latest {
            warn!(
                "Discarding model `{}` from request {}, superseded by request {}",
                outcome.origin, outcome.generation, self.latest
            );
            return None;
        }
        self.in_flight = false;
        Some(outcome)
    }

    pub fn shutdown(self) {
        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.shutdown_background();
    }
}
