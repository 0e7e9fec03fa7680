//! Scene loading and navigation.
//!
//! [`SceneRouter`] models the host engine's scene loader: a load is requested
//! synchronously but completes asynchronously, a configurable number of ticks
//! later, at which point a [`SceneLoaded`] event is handed back to the driver.
//! The router also carries the build-order navigation ("load the next scene,
//! wrapping") that portal-style interactables use.

/// What to load: a scene by table name or by build index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    Name(String),
    Index(usize),
}

/// Emitted once when a pending load finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLoaded {
    pub index: usize,
    pub name: String,
}

/// Default ticks between a load request and its completion.
pub const LOAD_LATENCY_TICKS: u32 = 1;

struct PendingLoad {
    target: usize,
    ticks_left: u32,
}

/// Ordered scene table plus the current scene and at most one pending load.
pub struct SceneRouter {
    scenes: Vec<String>,
    current: usize,
    pending: Option<PendingLoad>,
    load_latency: u32,
}

impl SceneRouter {
    /// Build a router over an ordered, non-empty scene table. The first entry
    /// is the scene the process starts in.
    pub fn new<I, S>(scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scenes: Vec<String> = scenes.into_iter().map(Into::into).collect();
        assert!(!scenes.is_empty(), "scene table must not be empty");
        Self {
            scenes,
            current: 0,
            pending: None,
            load_latency: LOAD_LATENCY_TICKS,
        }
    }

    /// Override the simulated load latency (ticks). Zero completes on the
    /// next `tick` call.
    pub fn with_load_latency(mut self, ticks: u32) -> Self {
        self.load_latency = ticks;
        self
    }

    /// Request a scene load. Completion is asynchronous; the event comes out
    /// of [`SceneRouter::tick`]. A request issued while another load is
    /// pending supersedes it. Unknown targets are logged and ignored.
    pub fn load(&mut self, target: SceneTarget) -> bool {
        let index = match &target {
            SceneTarget::Index(i) => {
                if *i >= self.scenes.len() {
                    log::error!("scene index {i} out of range ({} scenes)", self.scenes.len());
                    return false;
                }
                *i
            }
            SceneTarget::Name(name) => match self.scenes.iter().position(|s| s == name) {
                Some(i) => i,
                None => {
                    log::error!("unknown scene {name:?}");
                    return false;
                }
            },
        };
        if self.pending.is_some() {
            log::warn!("superseding pending scene load");
        }
        log::info!("loading scene {:?}", self.scenes[index]);
        self.pending = Some(PendingLoad {
            target: index,
            ticks_left: self.load_latency,
        });
        true
    }

    /// Load the next scene in build order, wrapping at the end of the table.
    pub fn load_next(&mut self) -> bool {
        let next = (self.current + 1) % self.scenes.len();
        self.load(SceneTarget::Index(next))
    }

    /// Advance the pending load, if any. Returns the completion event exactly
    /// once, on the tick the load finishes.
    pub fn tick(&mut self) -> Option<SceneLoaded> {
        let pending = self.pending.as_mut()?;
        if pending.ticks_left > 0 {
            pending.ticks_left -= 1;
            return None;
        }
        let target = pending.target;
        self.pending = None;
        self.current = target;
        log::info!("scene {:?} loaded", self.scenes[target]);
        Some(SceneLoaded {
            index: target,
            name: self.scenes[target].clone(),
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &str {
        &self.scenes[self.current]
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}
