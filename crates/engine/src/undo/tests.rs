use cranio_primitives::{EventMask, ViewerId};
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::model::{CameraPose, MeasurePath, Mesh, Model, ModelData};

fn tri(scale: f32) -> Mesh {
	Mesh::new(vec![[0.0, 0.0, 0.0], [scale, 0.0, 0.0], [0.0, scale, 0.0]], vec![[0, 1, 2]])
}

fn quad(scale: f32) -> Mesh {
	Mesh::new(
		vec![[0.0, 0.0, 0.0], [scale, 0.0, 0.0], [scale, scale, 0.0], [0.0, scale, 1.0]],
		vec![[0, 1, 2], [0, 2, 3]],
	)
}

fn subject() -> Model {
	let mut data = ModelData::new(tri(1.0));
	data.set_mask(Some(tri(2.0)));
	data.set_landmark("nasion", [0.0, 1.0, 2.0]);
	data.add_path(MeasurePath {
		name: "arc".into(),
		points: vec![[0.0; 3], [1.0; 3]],
	});
	data.set_metadata("subject", "S001");
	data.mark_saved();
	Model::new("S001", data)
}

/// Changes every field of the model so each differs from `subject()`.
fn mutate_everything(model: &Model) {
	let mut data = model.write();
	data.set_mesh(quad(3.0));
	data.set_mask(Some(quad(4.0)));
	let mut t = crate::model::IDENTITY;
	t[3][0] = 10.0;
	data.set_transform(t);
	data.set_camera(
		ViewerId::PRIMARY,
		CameraPose {
			position: [1.0, 2.0, 3.0],
			..CameraPose::default()
		},
	);
	data.set_landmark("nasion", [9.0, 9.0, 9.0]);
	data.set_assessment_note("revised");
}

#[rstest]
#[case(EventMask::GEOMETRY, FieldSelection { mesh: true, bounds: true, ..Default::default() })]
#[case(EventMask::CONNECTIVITY, FieldSelection { mesh: true, bounds: true, ..Default::default() })]
#[case(EventMask::MASK, FieldSelection { mask: true, bounds: true, ..Default::default() })]
#[case(EventMask::AFFINE, FieldSelection { transform: true, ..Default::default() })]
#[case(EventMask::CAMERA, FieldSelection { cameras: true, ..Default::default() })]
#[case(EventMask::LANDMARKS, FieldSelection { assessment: true, ..Default::default() })]
#[case(EventMask::PATHS, FieldSelection { assessment: true, ..Default::default() })]
#[case(EventMask::METADATA, FieldSelection { assessment: true, ..Default::default() })]
#[case(EventMask::USER | EventMask::ALL_VIEWS, FieldSelection::default())]
fn field_selection_follows_event(#[case] event: EventMask, #[case] expected: FieldSelection) {
	assert_eq!(FieldSelection::for_event(event), expected);
	assert_eq!(UndoState::captures_anything(event), !expected.is_empty());
}

#[test]
fn affine_undo_keeps_later_topology_change() {
	let model = subject();
	let before_transform = *model.read().transform();

	let state = UndoState::capture(&model, EventMask::AFFINE);
	let mut t = crate::model::IDENTITY;
	t[3][1] = -4.0;
	model.write().set_transform(t);
	model.write().set_mesh(quad(5.0));

	let restored = state.restore(&model);
	assert_eq!(restored, EventMask::AFFINE);

	let data = model.read();
	assert_eq!(*data.transform(), before_transform);
	assert_eq!(*data.mesh(), quad(5.0), "topology change must persist");
}

#[test]
fn restore_resets_saved_flags() {
	let model = subject();
	let state = UndoState::capture(&model, EventMask::LANDMARKS);
	model.write().set_landmark("gnathion", [0.0; 3]);
	model.write().set_transform(crate::model::IDENTITY);
	assert!(!model.saved().is_saved());

	state.restore(&model);
	assert!(model.saved().is_saved());
	assert!(model.read().assessment().landmark("gnathion").is_none());
}

#[test]
fn stack_discards_and_clears() {
	let model = subject();
	let mut stack = UndoStack::new(8);
	stack.push(UndoState::capture(&model, EventMask::AFFINE));
	stack.push(UndoState::capture(&model, EventMask::LANDMARKS));
	assert_eq!(stack.len(), 2);
	assert_eq!(stack.last_event(), Some(EventMask::LANDMARKS));

	assert!(stack.discard_last());
	assert_eq!(stack.last_event(), Some(EventMask::AFFINE));

	stack.clear();
	assert!(stack.is_empty());
	assert!(!stack.discard_last());
}

#[test]
fn stack_evicts_oldest_at_limit() {
	let model = subject();
	let mut stack = UndoStack::new(2);
	stack.push(UndoState::capture(&model, EventMask::AFFINE));
	stack.push(UndoState::capture(&model, EventMask::MASK));
	stack.push(UndoState::capture(&model, EventMask::CAMERA));
	assert_eq!(stack.len(), 2);
	assert_eq!(stack.pop().map(|s| s.event()), Some(EventMask::CAMERA));
	assert_eq!(stack.pop().map(|s| s.event()), Some(EventMask::MASK));
	assert!(stack.pop().is_none());
}

proptest! {
	#[test]
	fn restore_round_trips_selected_fields_only(bits in 0u64..(1 << 9)) {
		let event = EventMask::from_bits_truncate(bits);
		let sel = FieldSelection::for_event(event);
		let model = subject();
		let original = model.read().clone();

		let state = UndoState::capture(&model, event);
		mutate_everything(&model);
		let mutated = model.read().clone();
		state.restore(&model);

		let data = model.read();
		let pick = |selected: bool| if selected { &original } else { &mutated };
		prop_assert_eq!(&data.mesh, &pick(sel.mesh).mesh);
		prop_assert_eq!(&data.index, &pick(sel.mesh).index);
		prop_assert_eq!(&data.mask, &pick(sel.mask).mask);
		prop_assert_eq!(&data.bounds, &pick(sel.bounds).bounds);
		prop_assert_eq!(&data.transform, &pick(sel.transform).transform);
		prop_assert_eq!(&data.cameras, &pick(sel.cameras).cameras);
		prop_assert_eq!(&data.assessment, &pick(sel.assessment).assessment);
		prop_assert_eq!(data.saved, original.saved);
	}
}
