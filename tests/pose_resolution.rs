//! Posing loaded skeletons and reading back world-space joints.

mod common;

use cgmath::{Point3, Transform, Vector3, Zero};
use common::{assert_close, data_path};
use mocap_anim_parser::parse::{load_asf_amc_from_files, load_bvh_from_file};
use mocap_anim_parser::{LoadOptions, MotionData};
use pretty_assertions::assert_eq;

#[test]
fn test_bvh_world_positions() {
    let (mut skeleton, motion) = load_bvh_from_file(data_path("simple.bvh")).unwrap();
    assert!(skeleton.set_pose(&motion, 1));

    let positions = skeleton.world_positions();
    assert_eq!(positions.len(), 6);
    let expected = [
        Vector3::new(1.5, 10.0, -2.0),
        Vector3::new(-3.5, 10.0, -2.0),
        Vector3::new(-3.5, 10.0, 1.0),
        Vector3::new(1.5, 12.0, -2.0),
        Vector3::new(5.5, 12.0, -2.0),
        Vector3::new(9.5, 12.0, -2.0),
    ];
    for (actual, expected) in positions.into_iter().zip(expected) {
        assert_close(actual, expected);
    }
}

#[test]
fn test_rest_frame_matches_offsets() {
    let (mut skeleton, motion) = load_bvh_from_file(data_path("simple.bvh")).unwrap();
    assert!(skeleton.set_pose(&motion, 0));
    let positions = skeleton.world_positions();
    // frame 0 only lifts the root
    assert_close(positions[2], Vector3::new(0.0, 18.0, 0.0));
    assert_close(positions[5], Vector3::new(2.0, 2.0, 0.0));
}

#[test]
fn test_world_transform_agrees_with_batch() {
    let (mut skeleton, motion) = load_bvh_from_file(data_path("simple.bvh")).unwrap();
    assert!(skeleton.set_pose(&motion, 2));

    let batch = skeleton.world_transforms();
    for index in 0..skeleton.joint_count() {
        let single = skeleton.world_transform(index).unwrap();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let a = single.transform_point(origin);
        let b = batch[index].transform_point(origin);
        assert_close(Vector3::new(a.x, a.y, a.z), Vector3::new(b.x, b.y, b.z));
    }
    assert!(skeleton.world_transform(skeleton.joint_count()).is_none());
}

#[test]
fn test_acclaim_world_positions() {
    let (mut skeleton, motion) = load_asf_amc_from_files(
        data_path("skeleton.asf"),
        data_path("skeleton.amc"),
        &LoadOptions::default(),
    )
    .unwrap();
    assert!(skeleton.set_pose(&motion, 1));

    let positions = skeleton.world_positions();
    assert_close(positions[0], Vector3::zero());
    assert_close(positions[1], Vector3::zero());
    assert_close(positions[2], Vector3::new(0.0, 0.0, -10.0));
    assert_close(positions[3], Vector3::new(0.0, 0.0, -18.0));
    assert_close(positions[5], Vector3::new(0.0, 5.0, 0.0));
}

#[test]
fn test_mismatched_motion_leaves_pose_untouched() {
    let (mut skeleton, motion) = load_bvh_from_file(data_path("simple.bvh")).unwrap();
    assert!(skeleton.set_pose(&motion, 1));
    let before = skeleton.world_positions();

    let foreign = MotionData::new(1, skeleton.joint_count() - 1, 0.1);
    assert!(!skeleton.set_pose(&foreign, 0));
    assert!(!skeleton.set_pose(&motion, motion.frame_count()));

    assert_eq!(skeleton.world_positions(), before);
}

#[test]
fn test_bone_helpers() {
    let (skeleton, _) = load_bvh_from_file(data_path("simple.bvh")).unwrap();
    let knee_site = skeleton.get_joint(5).unwrap();
    assert_eq!(knee_site.bone_length(), 4.0);

    let tip = knee_site
        .bone_transform()
        .transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_close(Vector3::new(tip.x, tip.y, tip.z), knee_site.offset());

    assert_eq!(skeleton.root().bone_length(), 0.0);
}
