//! create::expand
//!
//! Frame-based expansion of a discovered child subtree.
//!
//! # Design
//!
//! Template graphs nest to arbitrary depth, so expansion runs over an
//! explicit frame arena instead of call-stack recursion:
//!
//! 1. **Build phase** — level by level, every pending child slot across the
//!    current level resolves concurrently: starting data (template, or the
//!    store value of the clone source), a fresh instance URI, and a shallow
//!    discovery pass over the starting data that seeds the next level.
//! 2. **Commit phase** — deepest level first, siblings of a level
//!    concurrently. A leaf commits its starting data with its schema fetch
//!    riding alongside. A node with children commits twice: a stub (child
//!    paths replaced by bare references) strictly before its full data
//!    (child paths replaced by each child's complete expanded data). The
//!    store therefore never holds a full parent whose child path resolves
//!    to nothing.
//!
//! Each level is a fan-out-then-join group: every resolution or commit in
//! it runs to completion before the first failure is surfaced, so a
//! mid-tree failure can leave already-committed children behind with no
//! referencing parent. That orphaning is accepted; there is no rollback.

use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use super::discover::find_child_components;
use super::{ComponentCreator, CreateError};
use crate::core::config::SiteConfig;
use crate::core::paths;
use crate::core::types::{ChildMapping, ChildSlot, ComponentName, DataObject, InstantiationMode};

/// One node of the expansion arena.
struct Frame {
    /// The node's instance URI.
    uri: String,
    /// Component type; `None` for the expansion root, whose schema the
    /// orchestrator already resolved.
    name: Option<ComponentName>,
    /// Starting data (template, clone source, or the root's merged data).
    data: DataObject,
    /// Children discovered in `data`, in data key order.
    children: ChildMapping,
    /// Arena indices of the frames created for `children`, same order.
    child_frames: Vec<usize>,
    /// Distance from the expansion root.
    depth: usize,
}

/// What a frame commits.
enum FramePayload {
    /// No children: one commit of the starting data.
    Leaf { data: DataObject },
    /// Children: stub commit strictly before full commit.
    Parent { stub: DataObject, full: DataObject },
}

/// A minimal reference-only object: `{"_ref": uri}`.
fn ref_stub(uri: &str) -> Value {
    let mut stub = DataObject::new();
    stub.insert(paths::REF_KEY.to_string(), Value::String(uri.to_string()));
    Value::Object(stub)
}

/// Expands a parent's discovered children into committed instances.
pub(super) struct TreeExpander<'a> {
    engine: &'a ComponentCreator,
}

impl<'a> TreeExpander<'a> {
    pub(super) fn new(engine: &'a ComponentCreator) -> Self {
        Self { engine }
    }

    /// Instantiate `children`, rewire `parent_data` to point at them, and
    /// commit the parent (stub, then full). Returns the parent's full data
    /// with its self-reference attached.
    pub(super) async fn expand(
        &self,
        site: &SiteConfig,
        children: ChildMapping,
        parent_uri: String,
        parent_data: DataObject,
        mode: InstantiationMode,
    ) -> Result<DataObject, CreateError> {
        let mut frames = vec![Frame {
            uri: parent_uri,
            name: None,
            data: parent_data,
            children,
            child_frames: Vec::new(),
            depth: 0,
        }];

        // Build phase: resolve the whole subtree, one level at a time.
        let mut level = vec![0usize];
        while !level.is_empty() {
            let pending: Vec<(usize, ChildSlot)> = level
                .iter()
                .flat_map(|&frame| {
                    frames[frame]
                        .children
                        .iter()
                        .cloned()
                        .map(move |slot| (frame, slot))
                })
                .collect();
            if pending.is_empty() {
                break;
            }

            let resolutions = join_all(
                pending
                    .iter()
                    .map(|(_, slot)| self.resolve_child_start(site, slot)),
            )
            .await;

            let mut next_level = Vec::with_capacity(resolutions.len());
            for ((parent, slot), resolution) in pending.iter().zip(resolutions) {
                let (name, data) = resolution?;
                let id = self.engine.ids.new_id();
                let uri = paths::instance_uri(&site.prefix, name.as_str(), &id);
                debug!(
                    parent = %frames[*parent].uri,
                    path = %slot.path,
                    child = %uri,
                    "created child instance"
                );

                let grandchildren = find_child_components(&data, mode);
                let depth = frames[*parent].depth + 1;
                let index = frames.len();
                frames.push(Frame {
                    uri,
                    name: Some(name),
                    data,
                    children: grandchildren,
                    child_frames: Vec::new(),
                    depth,
                });
                frames[*parent].child_frames.push(index);
                next_level.push(index);
            }
            level = next_level;
        }

        // Commit phase: children before parents, siblings concurrently.
        let max_depth = frames.iter().map(|f| f.depth).max().unwrap_or(0);
        let mut expanded: Vec<Option<DataObject>> = (0..frames.len()).map(|_| None).collect();

        for depth in (1..=max_depth).rev() {
            let indices: Vec<usize> = (1..frames.len())
                .filter(|&i| frames[i].depth == depth)
                .collect();

            let prepared: Vec<_> = indices
                .iter()
                .map(|&i| {
                    let frame = &frames[i];
                    (
                        frame.name.clone(),
                        frame.uri.clone(),
                        build_payload(frame, &frames, &expanded),
                    )
                })
                .collect();

            let results = join_all(
                prepared
                    .into_iter()
                    .map(|(name, uri, payload)| self.commit_frame(site, name, uri, payload)),
            )
            .await;

            for (&index, result) in indices.iter().zip(results) {
                expanded[index] = Some(result?);
            }
        }

        // The expansion root commits last; its schema was the orchestrator's job.
        let payload = build_payload(&frames[0], &frames, &expanded);
        let uri = frames[0].uri.clone();
        self.commit_frame(site, None, uri, payload).await
    }

    /// Resolve a child's starting data and component type.
    ///
    /// Template references resolve to their type's template data. Instance
    /// references (reachable only in clone mode) deep-copy the current
    /// store value of the referenced instance, minus its self-reference:
    /// the duplicate receives its own identity at commit time.
    async fn resolve_child_start(
        &self,
        site: &SiteConfig,
        slot: &ChildSlot,
    ) -> Result<(ComponentName, DataObject), CreateError> {
        let name = slot.reference.component_name().clone();

        if slot.reference.is_template() {
            let data = self.engine.defaults.resolve(site, &name).await?;
            Ok((name, data))
        } else {
            let source_uri = slot.reference.uri();
            let value = self.engine.store.read(source_uri).await?;
            let mut data = match value {
                Some(Value::Object(map)) => map,
                _ => {
                    return Err(CreateError::CloneSourceMissing {
                        uri: source_uri.to_string(),
                    })
                }
            };
            data.remove(paths::REF_KEY);
            Ok((name, data))
        }
    }

    /// Commit one frame and return its expanded data.
    async fn commit_frame(
        &self,
        site: &SiteConfig,
        name: Option<ComponentName>,
        uri: String,
        payload: FramePayload,
    ) -> Result<DataObject, CreateError> {
        match payload {
            FramePayload::Leaf { data } => {
                let commit = self.engine.projector.commit(&uri, data.clone());
                match &name {
                    Some(name) => {
                        // schema fetch rides alongside; neither blocks the other
                        let (schema, committed) =
                            tokio::join!(self.engine.schemas.resolve(site, name), commit);
                        schema?;
                        committed?;
                    }
                    None => {
                        commit.await?;
                    }
                }
                Ok(data)
            }
            FramePayload::Parent { stub, full } => {
                // stub strictly precedes full; sequential chaining is the
                // only ordering mechanism
                self.engine.projector.commit(&uri, stub).await?;
                if let Some(name) = &name {
                    self.engine.schemas.resolve(site, name).await?;
                }
                self.engine.projector.commit(&uri, full.clone()).await?;
                Ok(full)
            }
        }
    }
}

/// Build what a frame will commit, rewiring child paths.
fn build_payload(frame: &Frame, frames: &[Frame], expanded: &[Option<DataObject>]) -> FramePayload {
    if frame.children.is_empty() {
        let mut data = frame.data.clone();
        data.insert(paths::REF_KEY.to_string(), Value::String(frame.uri.clone()));
        FramePayload::Leaf { data }
    } else {
        let mut stub = frame.data.clone();
        let mut full = frame.data.clone();
        for (slot, &child) in frame.children.iter().zip(&frame.child_frames) {
            slot.path.set(&mut stub, ref_stub(&frames[child].uri));
            let child_data = expanded[child]
                .clone()
                .expect("children commit before their parent");
            slot.path.set(&mut full, Value::Object(child_data));
        }
        full.insert(paths::REF_KEY.to_string(), Value::String(frame.uri.clone()));
        FramePayload::Parent { stub, full }
    }
}
