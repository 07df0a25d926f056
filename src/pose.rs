//! Applying a frame of [`MotionData`] to a [`Skeleton`] and composing world transforms.

use crate::skeleton::Skeleton;
use crate::types::*;
use cgmath::{Point3, SquareMatrix, Transform as _};

impl Skeleton {
    /// Write the root position and every joint rotation of `frame` into the skeleton.
    ///
    /// Returns `false` and leaves the skeleton untouched when the motion was built for a
    /// different joint count or `frame` is out of range.
    pub fn set_pose(&mut self, motion_data: &MotionData, frame: Index) -> bool {
        if motion_data.joint_count() != self.joint_count() {
            log::trace!(
                "pose skipped: motion has {} joints, skeleton has {}",
                motion_data.joint_count(),
                self.joint_count()
            );
            return false;
        }
        let Some(position) = motion_data.get_position(frame) else {
            log::trace!(
                "pose skipped: frame {} out of {}",
                frame,
                motion_data.frame_count()
            );
            return false;
        };

        self.set_position(position);
        for (joint_index, joint) in self.joints.iter_mut().enumerate() {
            if let Some(rotation) = motion_data.get_rotation(frame, joint_index) {
                joint.set_rotation(rotation);
            }
        }
        true
    }

    /// Product of the local transforms from the root down to `index`.
    pub fn world_transform(&self, index: Index) -> Option<Transform> {
        let joint = self.get_joint(index)?;
        let mut transform = joint.local_transform();
        let mut parent = joint.parent();
        while let Some(parent_index) = parent {
            let parent_joint = &self.joints[parent_index];
            transform = parent_joint.local_transform() * transform;
            parent = parent_joint.parent();
        }
        Some(transform)
    }

    /// World transforms of every joint, in flattened order.
    pub fn world_transforms(&self) -> Vec<Transform> {
        let mut transforms: Vec<Transform> = Vec::with_capacity(self.joint_count());
        for joint in self.joints.iter() {
            // parents always precede their children
            let parent_transform = joint
                .parent()
                .map(|parent| transforms[parent])
                .unwrap_or_else(Transform::identity);
            transforms.push(parent_transform * joint.local_transform());
        }
        transforms
    }

    /// World-space origin of every joint, in flattened order.
    pub fn world_positions(&self) -> Vec<Position> {
        self.world_transforms()
            .iter()
            .map(|transform| {
                let p = transform.transform_point(Point3::new(0.0, 0.0, 0.0));
                Position::new(p.x, p.y, p.z)
            })
            .collect()
    }
}
