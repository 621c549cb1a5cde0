//! Unit tests for the document model.

use bevy::prelude::*;

use crate::drawing::{
    EditTool, Line, LineEnd, LineNode, NodePoint, ObjectId, ObjectRegistry,
    ScaledCanvas, SnapKind,
};
use crate::geometry::{Color, UnitPoint, UnitRect};
use crate::persistence::Properties;

use super::{Capture, Document, DocumentPlugin, DrawingLayer, RedoRequest, UndoRequest};

fn point(x: f64, y: f64) -> UnitPoint {
    UnitPoint::new(x, y)
}

fn add_line(doc: &mut Document, layer: &str, p1: UnitPoint, p2: UnitPoint) -> ObjectId {
    doc.add_object(layer, Box::new(Line::new(p1, p2))).unwrap()
}

fn line(doc: &Document, id: ObjectId) -> Line {
    doc.object(id)
        .unwrap()
        .as_any()
        .downcast_ref::<Line>()
        .unwrap()
        .clone()
}

/// Moves its objects itself and records only through `after_edit_objects`
#[derive(Clone)]
struct ShiftTool {
    ids: Vec<ObjectId>,
    offset: UnitPoint,
    finished: bool,
}

impl EditTool for ShiftTool {
    fn clone_tool(&self) -> Box<dyn EditTool> {
        Box::new(self.clone())
    }

    fn finished(&mut self) {
        self.finished = true;
    }

    fn undo(&mut self, document: &mut Document) {
        // Recording here must be swallowed by the replay guard
        document.move_objects(-self.offset, &self.ids);
    }

    fn redo(&mut self, document: &mut Document) {
        document.move_objects_with(self.offset, &self.ids, Capture::Replay);
    }
}

#[test]
fn test_new_document_defaults() {
    let doc = Document::default();
    assert_eq!(doc.layers().len(), 3);
    assert_eq!(doc.active_layer_id(), "layer0");
    assert_eq!(doc.zoom(), 1.0);
    assert_eq!(doc.center_point(), UnitPoint::ZERO);
    assert!(!doc.is_dirty());
    assert!(!doc.can_undo());
    assert!(!doc.can_redo());
}

#[test]
fn test_create_object_binds_to_active_layer() {
    let mut doc = Document::default();
    doc.set_active_layer("layer1");

    let object = doc.create_object("line", point(2.0, 3.0), None).unwrap();
    let created = object.as_any().downcast_ref::<Line>().unwrap();
    assert_eq!(created.p1, point(2.0, 3.0));
    assert_eq!(created.width, 0.005);

    // Creating does not insert or record
    assert!(doc.layer("layer1").unwrap().is_empty());
    assert!(!doc.can_undo());
}

#[test]
fn test_create_object_on_disabled_layer_fails() {
    let mut doc = Document::default();
    doc.layer_mut("layer0").unwrap().enabled = false;
    assert!(doc.create_object("line", UnitPoint::ZERO, None).is_none());
}

#[test]
fn test_create_unregistered_type_fails() {
    let doc = Document::new(ObjectRegistry::empty());
    assert!(doc.create_object("line", UnitPoint::ZERO, None).is_none());
}

#[test]
fn test_add_to_unknown_layer_is_rejected() {
    let mut doc = Document::default();
    assert!(doc.add_object("nope", Box::new(Line::default())).is_none());
    assert!(!doc.can_undo());
}

// Scenario: create, undo, redo
#[test]
fn test_add_undo_redo() {
    let mut doc = Document::default();
    let object = doc.create_object("line", point(1.0, 1.0), None).unwrap();
    let id = doc.add_object("layer0", object).unwrap();
    doc.with_object_mut(id, |o| o.set_property("P2", "4,5").unwrap());
    let before = line(&doc, id);

    assert!(doc.layer("layer0").unwrap().contains(id));
    assert!(doc.can_undo());
    assert!(doc.is_dirty());

    assert!(doc.undo());
    assert!(doc.object(id).is_none());
    assert!(doc.can_redo());

    assert!(doc.redo());
    assert_eq!(doc.layer_of(id).unwrap().id(), "layer0");
    assert_eq!(line(&doc, id), before);
    assert!(!doc.can_redo());
}

#[test]
fn test_undo_on_empty_history() {
    let mut doc = Document::default();
    assert!(!doc.undo());
    assert!(!doc.redo());
    assert!(!doc.is_dirty());
}

// Scenario: move a selection and undo it
#[test]
fn test_move_undo_restores_exactly() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.1, 0.2), point(1.3, 2.7));
    let b = add_line(&mut doc, "layer1", point(-4.0, 9.5), point(3.0, 3.0));
    doc.add_selected_object(a);
    doc.add_selected_object(b);

    let selected = doc.selected_objects();
    doc.move_objects(point(5.0, 0.0), &selected);
    assert!(line(&doc, a).p1.approx_eq(point(5.1, 0.2), 1e-12));
    assert!(line(&doc, b).p1.approx_eq(point(1.0, 9.5), 1e-12));

    doc.undo();
    assert!(line(&doc, a).p1.approx_eq(point(0.1, 0.2), 1e-8));
    assert!(line(&doc, a).p2.approx_eq(point(1.3, 2.7), 1e-8));
    assert!(line(&doc, b).p1.approx_eq(point(-4.0, 9.5), 1e-8));

    doc.redo();
    assert!(line(&doc, a).p1.approx_eq(point(5.1, 0.2), 1e-8));
}

#[test]
fn test_move_with_no_ids_records_nothing() {
    let mut doc = Document::default();
    doc.move_objects(point(1.0, 1.0), &[]);
    assert!(!doc.can_undo());
}

#[test]
fn test_move_absent_ids_records_nothing() {
    let mut doc = Document::default();
    doc.move_objects(point(1.0, 0.0), &[ObjectId::new()]);
    assert!(!doc.can_undo());
    assert!(!doc.is_dirty());

    // Only resident objects end up in the command
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    doc.move_objects(point(1.0, 0.0), &[a, ObjectId::new()]);
    assert_eq!(doc.history().undo_count(), 2);
    assert!(line(&doc, a).p1.approx_eq(point(1.0, 0.0), 1e-8));
    doc.undo();
    assert!(line(&doc, a).p1.approx_eq(point(0.0, 0.0), 1e-8));
}

// Scenario: delete, undo, redo
#[test]
fn test_delete_undo_redo() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    let b = add_line(&mut doc, "layer0", point(0.0, 1.0), point(1.0, 1.0));
    let c = add_line(&mut doc, "layer0", point(0.0, 2.0), point(1.0, 2.0));
    let undo_before = doc.history().undo_count();

    assert_eq!(doc.delete_objects(&[b]), 1);
    assert_eq!(doc.history().undo_count(), undo_before + 1);
    assert_eq!(doc.layer("layer0").unwrap().object_ids(), vec![a, c]);

    doc.undo();
    // Restored at its original position
    assert_eq!(doc.layer("layer0").unwrap().object_ids(), vec![a, b, c]);

    doc.redo();
    assert_eq!(doc.layer("layer0").unwrap().object_ids(), vec![a, c]);
}

#[test]
fn test_delete_across_layers_is_one_command() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    let b = add_line(&mut doc, "layer2", point(0.0, 1.0), point(1.0, 1.0));
    let undo_before = doc.history().undo_count();

    assert_eq!(doc.delete_objects(&[a, b]), 2);
    assert_eq!(doc.history().undo_count(), undo_before + 1);

    doc.undo();
    assert_eq!(doc.layer_of(a).unwrap().id(), "layer0");
    assert_eq!(doc.layer_of(b).unwrap().id(), "layer2");
}

#[test]
fn test_delete_absent_object_is_noop() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    let undo_before = doc.history().undo_count();

    assert_eq!(doc.delete_objects(&[ObjectId::new()]), 0);
    assert_eq!(doc.history().undo_count(), undo_before);
    assert_eq!(doc.layer("layer0").unwrap().object_ids(), vec![a]);
}

#[test]
fn test_delete_deselects() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    doc.add_selected_object(a);

    doc.delete_objects(&[a]);
    assert!(!doc.is_selected(a));
    assert_eq!(doc.selected_count(), 0);

    doc.undo();
    assert!(!doc.object(a).unwrap().is_selected());
}

#[test]
fn test_delete_with_replay_returns_removal() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer1", point(0.0, 0.0), point(1.0, 0.0));
    let undo_before = doc.history().undo_count();

    let removals = doc.delete_objects_with(&[a], Capture::Replay);
    assert_eq!(removals.len(), 1);
    assert_eq!(removals[0].layer, "layer1");
    assert_eq!(removals[0].ids, vec![a]);
    assert_eq!(doc.history().undo_count(), undo_before);
}

#[test]
fn test_push_after_undo_discards_redo() {
    let mut doc = Document::default();
    add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    add_line(&mut doc, "layer0", point(0.0, 1.0), point(1.0, 1.0));

    doc.undo();
    assert!(doc.can_redo());

    add_line(&mut doc, "layer0", point(0.0, 2.0), point(1.0, 2.0));
    assert!(!doc.can_redo());
}

#[test]
fn test_copy_objects() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer1", point(0.0, 0.0), point(1.0, 0.0));
    doc.add_selected_object(a);
    let undo_before = doc.history().undo_count();

    let copies = doc.copy_objects(point(0.0, 2.0), &[a]);
    assert_eq!(copies.len(), 1);
    let copy = copies[0];
    assert_ne!(copy, a);

    // Clones land in the active layer and replace the selection
    assert_eq!(doc.layer_of(copy).unwrap().id(), "layer0");
    assert_eq!(doc.selected_objects(), vec![copy]);
    assert!(!doc.object(a).unwrap().is_selected());
    assert!(doc.object(copy).unwrap().is_selected());
    assert_eq!(line(&doc, copy).p1, point(0.0, 2.0));
    assert_eq!(doc.history().undo_count(), undo_before + 1);

    doc.undo();
    assert!(doc.object(copy).is_none());
    assert_eq!(doc.selected_count(), 0);
    assert!(doc.object(a).is_some());

    doc.redo();
    assert!(doc.layer("layer0").unwrap().contains(copy));
}

#[test]
fn test_move_nodes_undo_redo() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(10.0, 0.0));
    let nodes: Vec<Box<dyn NodePoint>> = vec![Box::new(LineNode::new(a, LineEnd::End))];

    doc.move_nodes(point(10.0, 5.0), nodes);
    assert_eq!(line(&doc, a).p2, point(10.0, 5.0));

    doc.undo();
    assert_eq!(line(&doc, a).p2, point(10.0, 0.0));

    doc.redo();
    assert_eq!(line(&doc, a).p2, point(10.0, 5.0));
    assert_eq!(line(&doc, a).p1, UnitPoint::ZERO);
}

#[test]
fn test_tool_edit_replay_is_not_recorded() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    let offset = point(3.0, 0.0);
    doc.move_objects_with(offset, &[a], Capture::Replay);

    let undo_before = doc.history().undo_count();
    doc.after_edit_objects(Box::new(ShiftTool {
        ids: vec![a],
        offset,
        finished: false,
    }));
    assert_eq!(doc.history().undo_count(), undo_before + 1);

    doc.undo();
    assert_eq!(line(&doc, a).p1, UnitPoint::ZERO);
    assert_eq!(doc.history().undo_count(), undo_before);
    assert_eq!(doc.history().redo_count(), 1);

    doc.redo();
    assert_eq!(line(&doc, a).p1, point(3.0, 0.0));
    assert_eq!(doc.history().undo_count(), undo_before + 1);
}

#[test]
fn test_get_edit_tool_returns_copy() {
    let mut doc = Document::default();
    doc.add_edit_tool(
        "shift",
        Box::new(ShiftTool {
            ids: Vec::new(),
            offset: UnitPoint::ZERO,
            finished: false,
        }),
    );

    assert!(doc.get_edit_tool("shift").is_some());
    assert!(doc.get_edit_tool("rotate").is_none());
}

#[test]
fn test_selection_lockstep() {
    let mut doc = Document::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    let b = add_line(&mut doc, "layer0", point(0.0, 1.0), point(1.0, 1.0));

    assert!(doc.add_selected_object(a));
    assert!(doc.add_selected_object(a));
    assert!(doc.add_selected_object(b));
    assert_eq!(doc.selected_count(), 2);
    assert_eq!(doc.first_selected(), Some(a));
    assert!(doc.object(a).unwrap().is_selected());

    assert!(doc.remove_selected_object(a));
    assert!(!doc.remove_selected_object(a));
    assert!(!doc.object(a).unwrap().is_selected());

    doc.clear_selected_objects();
    assert_eq!(doc.selected_count(), 0);
    assert!(!doc.object(b).unwrap().is_selected());

    // Objects outside the document cannot be selected
    assert!(!doc.add_selected_object(ObjectId::new()));
}

#[test]
fn test_hit_objects_skip_hidden_layers() {
    let mut doc = Document::default();
    let canvas = ScaledCanvas::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(10.0, 0.0));
    let b = add_line(&mut doc, "layer1", point(0.0, 1.0), point(10.0, 1.0));
    let c = add_line(&mut doc, "layer2", point(0.0, 100.0), point(10.0, 100.0));

    assert_eq!(doc.get_hit_objects(&canvas, point(5.0, 0.5)), vec![a, b]);

    let region = UnitRect::from_corners(point(-1.0, -1.0), point(11.0, 101.0));
    assert_eq!(doc.get_hit_objects_in_rect(&canvas, &region, false), vec![a, b, c]);

    doc.layer_mut("layer1").unwrap().visible = false;
    assert_eq!(doc.get_hit_objects(&canvas, point(5.0, 0.5)), vec![a]);
    assert_eq!(doc.get_hit_objects_in_rect(&canvas, &region, true), vec![a, c]);
}

#[test]
fn test_snap_point_first_hit_wins() {
    let mut doc = Document::default();
    let canvas = ScaledCanvas::default();
    let a = add_line(&mut doc, "layer0", point(0.0, 0.0), point(10.0, 0.0));
    add_line(&mut doc, "layer0", point(0.0, 0.0), point(0.0, 10.0));

    let snap = doc
        .snap_point(&canvas, point(0.5, 0.5), &[SnapKind::Endpoint], None)
        .unwrap();
    assert_eq!(snap.owner, a);
    assert_eq!(snap.point, UnitPoint::ZERO);

    assert!(
        doc.snap_point(&canvas, point(50.0, 50.0), &[SnapKind::Nearest], None)
            .is_none()
    );
}

#[test]
fn test_document_properties() {
    let mut doc = Document::default();
    doc.set_property("Zoom", "2.5").unwrap();
    doc.set_property("CenterPoint", "10,20").unwrap();
    doc.set_property("ActiveLayer", "layer2").unwrap();
    assert_eq!(doc.zoom(), 2.5);
    assert_eq!(doc.center_point(), point(10.0, 20.0));
    assert_eq!(doc.active_layer_id(), "layer2");

    assert!(doc.set_property("IsDirty", "true").is_err());
    assert!(doc.set_property("ActiveLayer", "missing").is_err());
    assert!(doc.set_property("Zoom", "-1").is_err());
    assert!(doc.set_property("Zoom", "NaN").is_err());
    assert!(doc.set_property("Zoom", "inf").is_err());
    assert_eq!(doc.zoom(), 2.5);
    assert_eq!(doc.active_layer_id(), "layer2");

    let names: Vec<&str> = doc.properties().iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["Zoom", "CenterPoint", "ActiveLayer"]);
}

#[test]
fn test_add_layer_rejects_duplicate_id() {
    let mut doc = Document::default();
    assert!(doc.add_layer(DrawingLayer::new("dims", "Dimensions", Color::WHITE, 0.0)));
    assert!(!doc.add_layer(DrawingLayer::new("dims", "Again", Color::WHITE, 0.0)));
    assert_eq!(doc.layers().len(), 4);
    assert!(doc.set_active_layer("dims"));
    assert!(!doc.set_active_layer("missing"));
}

#[test]
fn test_reset_to_default_keeps_history_limit() {
    let mut doc = Document::default();
    doc.set_history_limit(5);
    add_line(&mut doc, "layer0", point(0.0, 0.0), point(1.0, 0.0));
    doc.set_zoom(3.0);
    doc.add_layer(DrawingLayer::new("extra", "Extra", Color::WHITE, 0.0));

    doc.reset_to_default();
    assert_eq!(doc.layers().len(), 3);
    assert!(doc.layers().iter().all(|layer| layer.is_empty()));
    assert_eq!(doc.zoom(), 1.0);
    assert!(!doc.can_undo());
    assert!(!doc.is_dirty());
    assert_eq!(doc.history().limit(), 5);
}

#[test]
fn test_set_zoom_ignores_invalid() {
    let mut doc = Document::default();
    doc.set_zoom(0.0);
    doc.set_zoom(f64::NAN);
    assert_eq!(doc.zoom(), 1.0);
    assert!(!doc.is_dirty());
}

#[test]
fn test_plugin_handles_undo_and_redo_requests() {
    let mut app = App::new();
    app.add_plugins(DocumentPlugin);
    app.update();

    let id = app
        .world_mut()
        .resource_mut::<Document>()
        .add_object("layer0", Box::new(Line::default()))
        .unwrap();

    app.world_mut().write_message(UndoRequest);
    app.update();
    assert!(app.world().resource::<Document>().object(id).is_none());

    app.world_mut().write_message(RedoRequest);
    app.update();
    assert!(app.world().resource::<Document>().object(id).is_some());
}
