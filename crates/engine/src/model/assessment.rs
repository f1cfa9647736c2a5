use std::collections::BTreeMap;

use super::mesh::Point;

/// A named measurement path traced over the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurePath {
	pub name: String,
	pub points: Vec<Point>,
}

/// Everything recorded about a subject on top of the mesh: landmarks,
/// measurement paths, assessment notes and subject metadata.
///
/// Undo captures this collection as a whole whenever any part of it is
/// implicated by a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentSet {
	pub landmarks: BTreeMap<String, Point>,
	pub paths: Vec<MeasurePath>,
	pub notes: String,
	pub metadata: BTreeMap<String, String>,
}

impl AssessmentSet {
	pub fn landmark(&self, name: &str) -> Option<Point> {
		self.landmarks.get(name).copied()
	}

	pub fn path(&self, name: &str) -> Option<&MeasurePath> {
		self.paths.iter().find(|p| p.name == name)
	}
}
