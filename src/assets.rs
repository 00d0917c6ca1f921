//! Asynchronous asset loading.
//!
//! Loads run on a background executor (a tokio runtime natively, the
//! browser's task queue on the web) and report back through a oneshot
//! channel. An [`AssetSlot`] is polled between frames and moves from
//! `Loading` to either `Bound` or `Failed` exactly once.

use std::{fmt, future::Future, time::Duration};

use futures::channel::oneshot;

use crate::{
    data_structures::{scene_graph::ModelNode, texture::Texture},
    error::SceneError,
    materials::bind_materials,
    resources,
};

pub type LoadResult<T> = Result<T, SceneError>;

#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Bound(T),
    Failed(SceneError),
}

pub struct AssetSlot<T> {
    path: String,
    state: LoadState<T>,
    receiver: Option<oneshot::Receiver<LoadResult<T>>>,
    started: Duration,
    timeout: Option<Duration>,
}

impl<T: fmt::Debug> fmt::Debug for AssetSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetSlot")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish()
    }
}

impl<T> AssetSlot<T> {
    /// A slot waiting on `receiver`. `started` is the clock reading at dispatch.
    pub fn new(
        path: impl Into<String>,
        receiver: oneshot::Receiver<LoadResult<T>>,
        started: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            path: path.into(),
            state: LoadState::Loading,
            receiver: Some(receiver),
            started,
            timeout,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn get(&self) -> Option<&T> {
        match &self.state {
            LoadState::Bound(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Checks for a result. Returns `true` if the state changed.
    ///
    /// Failures are logged here; they never propagate further.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.is_loading() {
            return false;
        }
        let Some(receiver) = self.receiver.as_mut() else {
            return false;
        };
        let next = match receiver.try_recv() {
            Ok(Some(Ok(asset))) => LoadState::Bound(asset),
            Ok(Some(Err(err))) => LoadState::Failed(err),
            Ok(None) => match self.timeout {
                Some(timeout) if now.saturating_sub(self.started) >= timeout => {
                    LoadState::Failed(SceneError::LoadTimeout {
                        path: self.path.clone(),
                        after: timeout,
                    })
                }
                _ => return false,
            },
            Err(oneshot::Canceled) => LoadState::Failed(SceneError::AssetLoad {
                path: self.path.clone(),
                reason: "the loader stopped before completing".to_string(),
            }),
        };

        self.receiver = None;
        match &next {
            LoadState::Bound(_) => log::info!("{} is ready", self.path),
            LoadState::Failed(err) => log::error!("{}", err),
            LoadState::Loading => (),
        }
        self.state = next;
        true
    }
}

/// Runs load futures in the background.
#[derive(Clone, Debug)]
pub struct Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    handle: tokio::runtime::Handle,
}

impl Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load<T, F>(&self, fut: F) -> oneshot::Receiver<LoadResult<T>>
    where
        T: Send + 'static,
        F: Future<Output = LoadResult<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            // The slot may have been dropped already
            let _ = tx.send(fut.await);
        });
        rx
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load<T, F>(&self, fut: F) -> oneshot::Receiver<LoadResult<T>>
    where
        T: 'static,
        F: Future<Output = LoadResult<T>> + 'static,
    {
        let (tx, rx) = oneshot::channel();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = tx.send(fut.await);
        });
        rx
    }
}

/// Starts loading the portal model. The materials are bound before the slot
/// sees the result, so a missing node arrives as a failed load.
pub fn load_model(
    spawner: &Spawner,
    device: &wgpu::Device,
    path: &str,
    now: Duration,
    timeout: Option<Duration>,
) -> AssetSlot<ModelNode> {
    let device = device.clone();
    let owned_path = path.to_string();
    let receiver = spawner.load(async move {
        let mut root = resources::load_model_gltf(&owned_path, &device)
            .await
            .map_err(|e| SceneError::asset(&owned_path, e))?;
        bind_materials(&mut root)?;
        Ok(root)
    });
    AssetSlot::new(path, receiver, now, timeout)
}

pub fn load_baked_texture(
    spawner: &Spawner,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &str,
    now: Duration,
    timeout: Option<Duration>,
) -> AssetSlot<Texture> {
    let device = device.clone();
    let queue = queue.clone();
    let owned_path = path.to_string();
    let receiver = spawner.load(async move {
        resources::load_texture(&owned_path, &device, &queue)
            .await
            .map_err(|e| SceneError::asset(&owned_path, e))
    });
    AssetSlot::new(path, receiver, now, timeout)
}
