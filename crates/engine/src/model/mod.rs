//! The mutable model entity actions operate on.
//!
//! A [`Model`] wraps its [`ModelData`] in a reader/writer lock. Action bodies
//! hold [`Model::write`] for the duration of a mutation; presentation code and
//! `is_allowed` predicates take [`Model::read`].
//!
//! Each mutation operation corresponds to one [`EventMask`] change flag and
//! clears the saved flag it invalidates.

mod assessment;
mod mesh;

use std::collections::BTreeMap;

use cranio_primitives::{EventMask, ModelId, ViewerId};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use assessment::{AssessmentSet, MeasurePath};
pub use mesh::{Bounds, CameraPose, IDENTITY, Mesh, MeshIndex, Point, Transform};

/// Whether the model's persisted state matches memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedFlags {
	/// Mesh, mask and transform are saved.
	pub content: bool,
	/// Landmarks, paths, notes and metadata are saved.
	pub meta: bool,
}

impl SavedFlags {
	pub const SAVED: Self = Self { content: true, meta: true };

	pub fn is_saved(self) -> bool {
		self.content && self.meta
	}
}

impl Default for SavedFlags {
	fn default() -> Self {
		Self::SAVED
	}
}

/// State of one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
	pub(crate) mesh: Mesh,
	pub(crate) index: MeshIndex,
	pub(crate) mask: Option<Mesh>,
	/// `[mesh bounds, mask bounds]`, each present only when its mesh is non-empty.
	pub(crate) bounds: Vec<Bounds>,
	pub(crate) transform: Transform,
	pub(crate) cameras: BTreeMap<ViewerId, CameraPose>,
	pub(crate) assessment: AssessmentSet,
	pub(crate) saved: SavedFlags,
}

impl Default for ModelData {
	fn default() -> Self {
		Self::new(Mesh::default())
	}
}

impl ModelData {
	/// Creates freshly loaded (saved) model data around `mesh`.
	pub fn new(mesh: Mesh) -> Self {
		let mut data = Self {
			index: MeshIndex::build(&mesh),
			mesh,
			mask: None,
			bounds: Vec::new(),
			transform: IDENTITY,
			cameras: BTreeMap::from([(ViewerId::PRIMARY, CameraPose::default())]),
			assessment: AssessmentSet::default(),
			saved: SavedFlags::SAVED,
		};
		data.recompute_bounds();
		data
	}

	pub fn mesh(&self) -> &Mesh {
		&self.mesh
	}

	pub fn index(&self) -> &MeshIndex {
		&self.index
	}

	pub fn mask(&self) -> Option<&Mesh> {
		self.mask.as_ref()
	}

	pub fn bounds(&self) -> &[Bounds] {
		&self.bounds
	}

	pub fn transform(&self) -> &Transform {
		&self.transform
	}

	pub fn camera(&self, viewer: ViewerId) -> Option<&CameraPose> {
		self.cameras.get(&viewer)
	}

	pub fn assessment(&self) -> &AssessmentSet {
		&self.assessment
	}

	pub fn saved(&self) -> SavedFlags {
		self.saved
	}

	/// Replaces the mesh. Returns [`EventMask::MESH`].
	pub fn set_mesh(&mut self, mesh: Mesh) -> EventMask {
		self.index = MeshIndex::build(&mesh);
		self.mesh = mesh;
		self.recompute_bounds();
		self.saved.content = false;
		EventMask::MESH
	}

	/// Replaces (or removes) the template mask. Returns [`EventMask::MASK`].
	pub fn set_mask(&mut self, mask: Option<Mesh>) -> EventMask {
		self.mask = mask;
		self.recompute_bounds();
		self.saved.content = false;
		EventMask::MASK
	}

	/// Returns [`EventMask::AFFINE`].
	pub fn set_transform(&mut self, transform: Transform) -> EventMask {
		self.transform = transform;
		self.saved.content = false;
		EventMask::AFFINE
	}

	/// Camera poses are not persisted and leave the saved flags alone.
	pub fn set_camera(&mut self, viewer: ViewerId, pose: CameraPose) -> EventMask {
		self.cameras.insert(viewer, pose);
		EventMask::CAMERA
	}

	pub fn set_landmark(&mut self, name: impl Into<String>, position: Point) -> EventMask {
		self.assessment.landmarks.insert(name.into(), position);
		self.saved.meta = false;
		EventMask::LANDMARKS
	}

	/// Returns [`EventMask::none`] when no such landmark existed.
	pub fn remove_landmark(&mut self, name: &str) -> EventMask {
		if self.assessment.landmarks.remove(name).is_none() {
			return EventMask::none();
		}
		self.saved.meta = false;
		EventMask::LANDMARKS
	}

	/// Adds a path, replacing any existing path with the same name.
	pub fn add_path(&mut self, path: MeasurePath) -> EventMask {
		match self.assessment.paths.iter_mut().find(|p| p.name == path.name) {
			Some(existing) => *existing = path,
			None => self.assessment.paths.push(path),
		}
		self.saved.meta = false;
		EventMask::PATHS
	}

	pub fn set_assessment_note(&mut self, notes: impl Into<String>) -> EventMask {
		self.assessment.notes = notes.into();
		self.saved.meta = false;
		EventMask::ASSESSMENT
	}

	pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> EventMask {
		self.assessment.metadata.insert(key.into(), value.into());
		self.saved.meta = false;
		EventMask::METADATA
	}

	/// Marks everything as persisted. Returns [`EventMask::SAVED_MODEL`].
	pub fn mark_saved(&mut self) -> EventMask {
		self.saved = SavedFlags::SAVED;
		EventMask::SAVED_MODEL
	}

	fn recompute_bounds(&mut self) {
		self.bounds = [self.mesh.bounds(), self.mask.as_ref().and_then(Mesh::bounds)].into_iter().flatten().collect();
	}
}

/// A loaded model shared between the home context and action bodies.
#[derive(Debug)]
pub struct Model {
	id: ModelId,
	name: String,
	data: RwLock<ModelData>,
}

impl Model {
	pub fn new(name: impl Into<String>, data: ModelData) -> Self {
		Self {
			id: ModelId::next(),
			name: name.into(),
			data: RwLock::new(data),
		}
	}

	pub fn id(&self) -> ModelId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Shared read access; may be held concurrently.
	pub fn read(&self) -> RwLockReadGuard<'_, ModelData> {
		self.data.read()
	}

	/// Exclusive write access for the duration of a mutation.
	pub fn write(&self) -> RwLockWriteGuard<'_, ModelData> {
		self.data.write()
	}

	pub fn saved(&self) -> SavedFlags {
		self.data.read().saved
	}
}
