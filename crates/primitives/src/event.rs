use std::fmt;

bitflags::bitflags! {
	/// A set of "what changed" flags raised into the orchestrator.
	///
	/// Masks are plain values: combine them with [`EventMask::combine`] and
	/// test them with [`EventMask::has`] or [`EventMask::intersects`].
	/// [`EventMask::CANCEL`] is exclusive and absorbs anything combined with it.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct EventMask: u64 {
		/// Vertex positions changed.
		const GEOMETRY = 1 << 0;
		/// Face connectivity (topology) changed.
		const CONNECTIVITY = 1 << 1;
		/// Alignment transform changed.
		const AFFINE = 1 << 2;
		/// Template mask changed.
		const MASK = 1 << 3;
		/// Landmarks changed.
		const LANDMARKS = 1 << 4;
		/// Measurement paths changed.
		const PATHS = 1 << 5;
		/// Assessment notes changed.
		const ASSESSMENT = 1 << 6;
		/// Subject metadata changed.
		const METADATA = 1 << 7;
		/// Camera pose of one or more viewers changed.
		const CAMERA = 1 << 8;
		/// The selected model changed.
		const MODEL_SELECT = 1 << 9;
		/// A model was loaded.
		const LOADED_MODEL = 1 << 10;
		/// A model was saved.
		const SAVED_MODEL = 1 << 11;
		/// A model was closed.
		const CLOSED_MODEL = 1 << 12;
		/// Presentation options changed.
		const VIEW_CHANGE = 1 << 13;
		/// An operation reported an error.
		const ERR_MSG = 1 << 14;
		/// The change was initiated by the user.
		const USER = 1 << 15;
		/// Apply to every attached view of the model.
		const ALL_VIEWS = 1 << 16;
		/// Apply to every viewer.
		const ALL_VIEWERS = 1 << 17;
		/// An action declined to run.
		const CANCEL = 1 << 63;

		/// Geometry or connectivity changed.
		const MESH = Self::GEOMETRY.bits() | Self::CONNECTIVITY.bits();
		/// Any change to the assessment collection.
		const ANY_ASSESSMENT = Self::LANDMARKS.bits() | Self::PATHS.bits() | Self::ASSESSMENT.bits() | Self::METADATA.bits();
	}
}

impl EventMask {
	/// The empty mask.
	pub const fn none() -> Self {
		Self::empty()
	}

	/// The exclusive cancellation mask.
	pub const fn cancel() -> Self {
		Self::CANCEL
	}

	/// Returns the union of `a` and `b`.
	///
	/// Cancellation is never merged with other flags: if either side is
	/// [`EventMask::CANCEL`] the result is `CANCEL` alone.
	pub const fn combine(a: Self, b: Self) -> Self {
		if a.is_cancel() || b.is_cancel() {
			return Self::CANCEL;
		}
		a.union(b)
	}

	/// Returns true iff every flag in `subset` is present in `mask`.
	pub const fn has(mask: Self, subset: Self) -> bool {
		mask.contains(subset)
	}

	/// Returns true if this mask is the cancellation mask.
	pub const fn is_cancel(self) -> bool {
		self.contains(Self::CANCEL)
	}

	/// Returns true if no flag is set.
	pub const fn is_none(self) -> bool {
		self.is_empty()
	}

	/// Returns the mask with the routing modifiers (`USER`, `ALL_VIEWS`,
	/// `ALL_VIEWERS`) removed, leaving only the semantic change flags.
	pub const fn changes(self) -> Self {
		self.difference(Self::USER.union(Self::ALL_VIEWS).union(Self::ALL_VIEWERS))
	}
}

impl fmt::Display for EventMask {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return f.write_str("NONE");
		}
		let mut first = true;
		for (name, _) in self.iter_names() {
			if !first {
				f.write_str("|")?;
			}
			f.write_str(name)?;
			first = false;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn mask() -> impl Strategy<Value = EventMask> {
		(0u64..(1 << 18)).prop_map(EventMask::from_bits_truncate)
	}

	#[test]
	fn cancel_absorbs_other_flags() {
		let merged = EventMask::combine(EventMask::MESH, EventMask::cancel());
		assert_eq!(merged, EventMask::CANCEL);
		assert!(merged.is_cancel());
		assert!(!EventMask::MESH.is_cancel());
	}

	#[test]
	fn mesh_is_geometry_and_connectivity() {
		assert!(EventMask::has(EventMask::MESH, EventMask::GEOMETRY));
		assert!(EventMask::has(EventMask::MESH, EventMask::CONNECTIVITY));
		assert!(!EventMask::has(EventMask::GEOMETRY, EventMask::MESH));
		assert!(EventMask::GEOMETRY.intersects(EventMask::MESH));
	}

	#[test]
	fn changes_strips_routing_modifiers() {
		let e = EventMask::AFFINE | EventMask::USER | EventMask::ALL_VIEWS;
		assert_eq!(e.changes(), EventMask::AFFINE);
	}

	#[test]
	fn display_lists_flag_names() {
		assert_eq!(EventMask::none().to_string(), "NONE");
		assert_eq!((EventMask::AFFINE | EventMask::LANDMARKS).to_string(), "AFFINE|LANDMARKS");
	}

	proptest! {
		#[test]
		fn combine_is_commutative_and_idempotent(a in mask(), b in mask()) {
			prop_assert_eq!(EventMask::combine(a, b), EventMask::combine(b, a));
			prop_assert_eq!(EventMask::combine(a, a), a);
		}

		#[test]
		fn combined_mask_has_both_operands(a in mask(), b in mask()) {
			let c = EventMask::combine(a, b);
			prop_assert!(EventMask::has(c, a));
			prop_assert!(EventMask::has(c, b));
		}

		#[test]
		fn none_is_identity_and_always_contained(a in mask()) {
			prop_assert_eq!(EventMask::combine(a, EventMask::none()), a);
			prop_assert!(EventMask::has(a, EventMask::none()));
		}
	}
}
