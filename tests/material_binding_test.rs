use portal_scene::{
    SceneError,
    data_structures::scene_graph::MaterialSlot,
    materials::{MaterialKind, binding_table, bind_materials},
};

use crate::common::test_utils::{portal_model, portal_model_without};

mod common;

#[test]
fn named_children_receive_their_materials() {
    let mut root = portal_model();
    bind_materials(&mut root).expect("all nodes are present");

    for (name, kind) in binding_table() {
        let node = root.child(name).expect("bound node");
        assert_eq!(node.material, MaterialSlot::Bound(*kind), "{name}");
    }
    assert_eq!(
        root.child("portalLight").and_then(|n| n.material.kind()),
        Some(MaterialKind::PortalLight)
    );
}

#[test]
fn every_other_node_is_baked() {
    let mut root = portal_model();
    bind_materials(&mut root).expect("all nodes are present");

    assert_eq!(root.material.kind(), Some(MaterialKind::Baked));
    let baked = root.child("baked").expect("baked node");
    for nested in &baked.children {
        assert_eq!(nested.material.kind(), Some(MaterialKind::Baked), "{}", nested.name);
    }
}

#[test]
fn missing_node_is_reported_and_tree_left_untouched() {
    let mut root = portal_model_without("poleLightB");
    let err = bind_materials(&mut root).expect_err("poleLightB is missing");
    assert_eq!(err, SceneError::MissingNode("poleLightB".to_string()));
    assert!(!err.is_fatal());

    let mut untouched = true;
    root.traverse(&mut |node| untouched &= node.material == MaterialSlot::Default);
    assert!(untouched);
}

#[test]
fn first_missing_name_wins() {
    let mut root = portal_model_without("portalLight");
    root.children.retain(|child| child.name != "poleLightA");
    assert_eq!(
        bind_materials(&mut root),
        Err(SceneError::MissingNode("portalLight".to_string()))
    );
}

#[test]
fn binding_table_covers_the_authored_nodes() {
    let names: Vec<_> = binding_table().iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["baked", "portalLight", "poleLightA", "poleLightB"]);
}
