use crate::types::*;
use cgmath::{InnerSpace, Matrix4, One, Rad, Rotation3, SquareMatrix, Vector3, Zero};
use std::f64::consts::PI;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// A node of the skeletal tree. Parent and children are indices into the owning [`Skeleton`].
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    index: Index,
    parent: Option<Index>,
    children: Vec<Index>,
    offset: Position,
    basis: Rotation,
    is_end_site: bool,

    // pose state, written by `Skeleton::set_pose`
    rotation: Quaternion,
    position: Position,
}

impl Joint {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this joint in the flattened joint list.
    pub fn index(&self) -> Index {
        self.index
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    /// Bind-pose translation from the parent joint.
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Fixed frame in which this joint's animated rotations are expressed (ASF only).
    pub fn basis(&self) -> Rotation {
        self.basis
    }

    /// BVH `End Site` or ASF synthetic `Site` leaf.
    pub fn is_end_site(&self) -> bool {
        self.is_end_site
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Transform relative to the parent: `T(position) * T(offset) * R(rotation)`.
    pub fn local_transform(&self) -> Transform {
        Matrix4::from_translation(self.position)
            * Matrix4::from_translation(self.offset)
            * Matrix4::from(self.rotation)
    }

    /// Length of the bone drawn from the parent to this joint.
    pub fn bone_length(&self) -> f64 {
        self.offset.magnitude()
    }

    /// Rotation carrying +X onto the offset direction.
    pub fn bone_rotation(&self) -> Quaternion {
        let length = self.bone_length();
        if length <= f64::EPSILON {
            return Quaternion::one();
        }
        let dir = self.offset / length;
        let x_axis = Vector3::unit_x();
        let dot = x_axis.dot(dir);
        if dot > 0.9999 {
            Quaternion::one()
        } else if dot < -0.9999 {
            // anti-parallel, any perpendicular axis works
            Quaternion::from_axis_angle(Vector3::unit_z(), Rad(PI))
        } else {
            let axis = x_axis.cross(dir).normalize();
            Quaternion::from_axis_angle(axis, Rad(dot.acos()))
        }
    }

    /// Model matrix for a unit bone along +X, placed in the parent's space.
    pub fn bone_transform(&self) -> Transform {
        Matrix4::from(self.bone_rotation())
            * Matrix4::from_nonuniform_scale(self.bone_length(), 1.0, 1.0)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Joint tree flattened depth-first (parent before children). Index 0 is always the root.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub(crate) joints: Vec<Joint>,
}

impl Skeleton {
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn get_joint(&self, index: Index) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Index of the first joint called `name`.
    pub fn find_joint_index(&self, name: &str) -> Option<Index> {
        self.joints.iter().position(|joint| joint.name == name)
    }

    pub fn root(&self) -> &Joint {
        &self.joints[0]
    }

    pub fn parent_of(&self, index: Index) -> Option<&Joint> {
        self.get_joint(index)
            .and_then(|joint| joint.parent)
            .and_then(|parent| self.get_joint(parent))
    }

    pub fn children_of(&self, index: Index) -> impl Iterator<Item = &Joint> + '_ {
        self.get_joint(index)
            .map(|joint| joint.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&child| self.get_joint(child))
    }

    /// Set the root joint's position.
    pub fn set_position(&mut self, position: Position) {
        self.joints[0].set_position(position);
    }

    /// Set the root joint's rotation.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.joints[0].set_rotation(rotation);
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
struct JointDraft {
    name: String,
    offset: Position,
    basis: Rotation,
    position: Position,
    is_end_site: bool,
    parent: Option<Index>,
    children: Vec<Index>,
}

/// Arena used while parsing. Joints can be declared in any order and linked later;
/// [`SkeletonBuilder::build`] flattens whatever hangs below the root.
#[derive(Debug, Default)]
pub(crate) struct SkeletonBuilder {
    drafts: Vec<JointDraft>,
}

/// Why a [`SkeletonBuilder::link`] was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkError {
    SelfLink,
    HasParent,
}

impl SkeletonBuilder {
    pub(crate) fn new() -> Self {
        SkeletonBuilder::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.drafts.len()
    }

    pub(crate) fn add_joint(&mut self, name: impl Into<String>) -> Index {
        self.drafts.push(JointDraft {
            name: name.into(),
            offset: Position::zero(),
            basis: Rotation::identity(),
            position: Position::zero(),
            is_end_site: false,
            parent: None,
            children: Vec::new(),
        });
        self.drafts.len() - 1
    }

    pub(crate) fn add_end_site(&mut self, name: impl Into<String>, offset: Position) -> Index {
        let index = self.add_joint(name);
        self.drafts[index].offset = offset;
        self.drafts[index].is_end_site = true;
        index
    }

    pub(crate) fn name(&self, index: Index) -> &str {
        &self.drafts[index].name
    }

    pub(crate) fn offset(&self, index: Index) -> Position {
        self.drafts[index].offset
    }

    pub(crate) fn set_offset(&mut self, index: Index, offset: Position) {
        self.drafts[index].offset = offset;
    }

    pub(crate) fn set_basis(&mut self, index: Index, basis: Rotation) {
        self.drafts[index].basis = basis;
    }

    pub(crate) fn set_position(&mut self, index: Index, position: Position) {
        self.drafts[index].position = position;
    }

    pub(crate) fn parent(&self, index: Index) -> Option<Index> {
        self.drafts[index].parent
    }

    pub(crate) fn children(&self, index: Index) -> &[Index] {
        &self.drafts[index].children
    }

    /// Append `child` to `parent`'s children. A joint gets at most one parent.
    pub(crate) fn link(&mut self, parent: Index, child: Index) -> Result<(), LinkError> {
        if parent == child {
            return Err(LinkError::SelfLink);
        }
        if self.drafts[child].parent.is_some() {
            return Err(LinkError::HasParent);
        }
        self.drafts[child].parent = Some(parent);
        self.drafts[parent].children.push(child);
        Ok(())
    }

    /// Flatten the tree hanging from `root` in depth-first preorder.
    ///
    /// Returns the skeleton and, for every draft, its index in the skeleton
    /// (`None` for drafts not reachable from the root).
    pub(crate) fn build(self, root: Index) -> Result<(Skeleton, Vec<Option<Index>>), LinkError> {
        if self.drafts[root].parent.is_some() {
            return Err(LinkError::HasParent);
        }

        let mut order: Vec<Index> = Vec::with_capacity(self.drafts.len());
        let mut stack = vec![root];
        while let Some(draft) = stack.pop() {
            order.push(draft);
            stack.extend(self.drafts[draft].children.iter().rev());
        }

        let mut remap: Vec<Option<Index>> = vec![None; self.drafts.len()];
        for (index, &draft) in order.iter().enumerate() {
            remap[draft] = Some(index);
        }
        for (draft, slot) in remap.iter().enumerate() {
            if slot.is_none() {
                log::warn!(
                    "joint `{}` is not connected to the root and was dropped",
                    self.drafts[draft].name
                );
            }
        }

        let mut drafts: Vec<Option<JointDraft>> = self.drafts.into_iter().map(Some).collect();
        let joints = order
            .iter()
            .enumerate()
            .filter_map(|(index, &draft)| {
                let draft = drafts[draft].take()?;
                Some(Joint {
                    name: draft.name,
                    index,
                    parent: draft.parent.and_then(|parent| remap[parent]),
                    children: draft
                        .children
                        .iter()
                        .filter_map(|&child| remap[child])
                        .collect(),
                    offset: draft.offset,
                    basis: draft.basis,
                    is_end_site: draft.is_end_site,
                    rotation: Quaternion::one(),
                    position: draft.position,
                })
            })
            .collect();

        Ok((Skeleton { joints }, remap))
    }
}
