use smallvec::SmallVec;

/// A point or direction in model space.
pub type Point = [f32; 3];

/// Column-major 4x4 affine transform.
pub type Transform = [[f32; 4]; 4];

/// The identity transform.
pub const IDENTITY: Transform = [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]];

/// Triangle surface mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
	pub vertices: Vec<Point>,
	pub faces: Vec<[u32; 3]>,
}

impl Mesh {
	pub fn new(vertices: Vec<Point>, faces: Vec<[u32; 3]>) -> Self {
		Self { vertices, faces }
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}

	/// Axis-aligned bounds of all vertices, or `None` for an empty mesh.
	pub fn bounds(&self) -> Option<Bounds> {
		let (first, rest) = self.vertices.split_first()?;
		let mut b = Bounds { min: *first, max: *first };
		for v in rest {
			for axis in 0..3 {
				b.min[axis] = b.min[axis].min(v[axis]);
				b.max[axis] = b.max[axis].max(v[axis]);
			}
		}
		Some(b)
	}
}

/// Axis-aligned bounding volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
	pub min: Point,
	pub max: Point,
}

/// Vertex → incident faces adjacency derived from a [`Mesh`].
///
/// Rebuilt whenever the mesh topology changes and captured alongside the
/// mesh for undo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshIndex {
	vertex_faces: Vec<SmallVec<[u32; 6]>>,
}

impl MeshIndex {
	pub fn build(mesh: &Mesh) -> Self {
		let mut vertex_faces = vec![SmallVec::new(); mesh.vertices.len()];
		for (fid, face) in mesh.faces.iter().enumerate() {
			for &v in face {
				if let Some(slot) = vertex_faces.get_mut(v as usize) {
					slot.push(fid as u32);
				}
			}
		}
		Self { vertex_faces }
	}

	/// Faces incident to vertex `v`.
	pub fn faces_of(&self, v: u32) -> &[u32] {
		self.vertex_faces.get(v as usize).map(|f| f.as_slice()).unwrap_or(&[])
	}

	pub fn vertex_count(&self) -> usize {
		self.vertex_faces.len()
	}
}

/// Camera pose of one viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
	pub position: Point,
	pub focus: Point,
	pub up: Point,
}

impl Default for CameraPose {
	fn default() -> Self {
		Self {
			position: [0.0, 0.0, 500.0],
			focus: [0.0, 0.0, 0.0],
			up: [0.0, 1.0, 0.0],
		}
	}
}
