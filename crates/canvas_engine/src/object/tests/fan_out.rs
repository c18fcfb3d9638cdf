//! Grouping fan-out, reparenting and opacity chains

use super::full;
use crate::foundation::math::Point;
use crate::object::{Capabilities, ChildOptions, Composer, GameObject, ObjectId, ObjectProps, PropValue};
use approx::assert_relative_eq;

fn parent_with_child(child: ObjectProps) -> (GameObject, ObjectId) {
    let mut parent = full(ObjectProps::default());
    let id = parent.add_child(full(child)).unwrap();
    (parent, id)
}

#[test]
fn test_position_delta_reaches_child() {
    let (mut parent, id) = parent_with_child(ObjectProps::new().with_position(40.0, 10.0));

    parent.set_x(parent.x() + 20.0);
    parent.set_y(parent.y() - 5.0);

    let child = parent.child(id).unwrap();
    assert_eq!(child.x(), 60.0);
    assert_eq!(child.y(), 5.0);
}

#[test]
fn test_camera_and_rotation_deltas_reach_child() {
    let (mut parent, id) = parent_with_child(ObjectProps::new().with_camera(40.0, 40.0).with_rotation(0.5));

    parent.set_sx(20.0);
    parent.set_sy(-10.0);
    parent.set_rotation(1.0);

    let child = parent.child(id).unwrap();
    assert_eq!(child.sx(), Some(60.0));
    assert_eq!(child.sy(), Some(30.0));
    assert_eq!(child.rotation(), Some(1.5));
}

#[test]
fn test_repeated_identical_writes_are_idempotent() {
    let (mut parent, id) = parent_with_child(ObjectProps::new().with_position(40.0, 0.0));

    parent.set_x(20.0);
    parent.set_x(20.0);
    parent.set_x(20.0);

    assert_eq!(parent.child(id).unwrap().x(), 60.0);
}

#[test]
fn test_delta_composes_through_nested_groups() {
    let mut grandchild = full(ObjectProps::new().with_position(1.0, 1.0));
    grandchild.set_rotation(0.25);
    let grandchild_id = grandchild.id();

    let mut child = full(ObjectProps::new().with_position(10.0, 10.0));
    child.add_child(grandchild).unwrap();
    let child_id = child.id();

    let mut root = full(ObjectProps::default());
    root.add_child(child).unwrap();

    root.set_x(100.0);
    root.set_rotation(0.5);

    let child = root.child(child_id).unwrap();
    let grandchild = child.child(grandchild_id).unwrap();
    assert_eq!(child.x(), 110.0);
    assert_eq!(grandchild.x(), 111.0);
    assert_eq!(grandchild.y(), 11.0);
    assert_eq!(grandchild.rotation(), Some(0.75));
}

#[test]
fn test_set_scale_propagates_as_delta() {
    let (mut parent, id) = parent_with_child(ObjectProps::new().with_scale(40.0, 20.0));
    assert_eq!(parent.child(id).unwrap().scale(), Some(Point::new(40.0, 20.0)));

    parent.set_scale(2.0, 5.0).unwrap();

    assert_eq!(parent.child(id).unwrap().scale(), Some(Point::new(41.0, 24.0)));
}

#[test]
fn test_scale_passes_through_nested_groups() {
    let grandchild = full(ObjectProps::default());
    let grandchild_id = grandchild.id();
    let mut child = full(ObjectProps::default());
    child.add_child(grandchild).unwrap();
    let child_id = child.id();
    let mut root = full(ObjectProps::default());
    root.add_child(child).unwrap();

    root.set_uniform_scale(3.0).unwrap();

    let grandchild = root.child(child_id).and_then(|child| child.child(grandchild_id)).unwrap();
    assert_eq!(grandchild.scale(), Some(Point::splat(3.0)));
}

#[test]
fn test_add_child_seeds_scale_from_identity() {
    let mut parent = full(ObjectProps::new().with_scale(2.0, 3.0));

    let id = parent.add_child(full(ObjectProps::new().with_scale(4.0, 4.0))).unwrap();

    assert_eq!(parent.child(id).unwrap().scale(), Some(Point::new(5.0, 6.0)));
}

#[test]
fn test_opacity_chain_multiplies() {
    let mut parent = full(ObjectProps::new().with_opacity(0.5));
    let id = parent.add_child(full(ObjectProps::default())).unwrap();
    assert_eq!(parent.child(id).unwrap().final_opacity(), Some(0.5));

    parent.child_mut(id).unwrap().set_opacity(0.25);

    assert_relative_eq!(parent.child(id).unwrap().final_opacity().unwrap(), 0.125);
}

#[test]
fn test_opacity_change_cascades_to_grandchildren() {
    let grandchild = full(ObjectProps::new().with_opacity(0.5));
    let grandchild_id = grandchild.id();
    let mut child = full(ObjectProps::new().with_opacity(0.5));
    child.add_child(grandchild).unwrap();
    let child_id = child.id();
    let mut root = full(ObjectProps::default());
    root.add_child(child).unwrap();

    root.set_opacity(0.5);

    let child = root.child(child_id).unwrap();
    let grandchild = child.child(grandchild_id).unwrap();
    assert_relative_eq!(child.final_opacity().unwrap(), 0.25);
    assert_relative_eq!(grandchild.final_opacity().unwrap(), 0.125);
    assert_eq!(grandchild.opacity(), Some(0.5));
}

#[test]
fn test_opacity_without_grouping_is_own_value() {
    let mut object = Composer::new(Capabilities::OPACITY).build(ObjectProps::default());

    object.set_opacity(0.3);

    assert_eq!(object.final_opacity(), Some(0.3));
}

#[test]
fn test_parent_without_opacity_leaves_child_final_as_own() {
    let mut parent = Composer::new(Capabilities::GROUP).build(ObjectProps::default());
    let id = parent.add_child(full(ObjectProps::new().with_opacity(0.4))).unwrap();

    assert_eq!(parent.child(id).unwrap().final_opacity(), Some(0.4));
}

#[test]
fn test_relative_add_child_offsets_coordinates() {
    let mut parent = full(ObjectProps::new().with_position(100.0, 200.0));

    let id = parent.add_child(full(ObjectProps::new().with_position(5.0, 6.0))).unwrap();

    let child = parent.child(id).unwrap();
    assert_eq!((child.x(), child.y()), (105.0, 206.0));
}

#[test]
fn test_absolute_add_child_keeps_coordinates() {
    let mut parent = full(ObjectProps::new().with_position(100.0, 200.0).with_rotation(1.0));

    let id = parent
        .add_child_with(full(ObjectProps::new().with_position(5.0, 6.0)), ChildOptions::absolute())
        .unwrap();

    let child = parent.child(id).unwrap();
    assert_eq!((child.x(), child.y()), (5.0, 6.0));
    assert_eq!(child.rotation(), Some(0.0));

    parent.set_x(110.0);
    assert_eq!(parent.child(id).unwrap().x(), 15.0);
}

#[test]
fn test_children_given_at_construction_are_reparented() {
    let parent = full(
        ObjectProps::new()
            .with_position(10.0, 10.0)
            .with_child(full(ObjectProps::new().with_position(1.0, 2.0))),
    );

    let child = &parent.children()[0];
    assert_eq!((child.x(), child.y()), (11.0, 12.0));
    assert_eq!(child.parent_id(), Some(parent.id()));
}

#[test]
fn test_update_advances_children_after_parent() {
    let child = full(ObjectProps::new().with_velocity(0.0, 10.0).with_ttl(5.0));
    let mut parent = full(ObjectProps::new().with_velocity(10.0, 0.0).with_child(child));

    parent.update(1.0);

    let child = &parent.children()[0];
    assert_eq!(parent.x(), 10.0);
    // Moved by the parent's fan-out, then by its own velocity
    assert_eq!((child.x(), child.y()), (10.0, 10.0));
    assert_eq!(child.ttl(), Some(4.0));
}

#[test]
fn test_read_only_properties_ignore_assignment() {
    let mut object = full(ObjectProps::new().with_position(30.0, 30.0).with_size(10.0, 10.0));

    object.set("viewX", 99.0);
    object.set("scaledWidth", 99.0);
    object.set("finalOpacity", 0.0);

    assert_eq!(object.view_x(), Some(30.0));
    assert_eq!(object.get("viewX"), Some(PropValue::Number(30.0)));
    assert_eq!(object.scaled_width(), Some(10.0));
    assert_eq!(object.final_opacity(), Some(1.0));
}

#[test]
fn test_ttl_boundary_controls_alive() {
    let mut object = full(ObjectProps::new().with_ttl(1.0));
    assert!(object.is_alive());

    object.update(1.0);

    assert_eq!(object.ttl(), Some(0.0));
    assert!(!object.is_alive());
}
