use crate::asf_parsing::AsfSkeleton;
use crate::config::LoadOptions;
use crate::error::{ParseError, Result};
use crate::types::*;
use crate::utils::{self, Lines};
use cgmath::{Matrix, Matrix3, SquareMatrix, Zero};

/// Angle unit declared by an AMC header line, if any.
fn header_angle_unit(line: &str) -> Option<AngleUnit> {
    match line {
        ":DEGREES" => Some(AngleUnit::Degrees),
        ":RADIANS" => Some(AngleUnit::Radians),
        _ => None,
    }
}

/// Pass 1: the highest frame marker is the frame count.
fn count_frames(text: &str) -> Result<usize> {
    let mut frame_count = 0;
    for (line_no, line) in Lines::new(text, utils::hash_comments) {
        if line.starts_with(':') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        if let (Some(marker), None) = (tokens.next(), tokens.next()) {
            frame_count = frame_count.max(utils::parse_index(marker, line_no)?);
        }
    }
    Ok(frame_count)
}

/// Parse an AMC document against the skeleton it was captured for.
pub(crate) fn parse_amc(text: &str, asf: &AsfSkeleton, options: &LoadOptions) -> Result<MotionData> {
    let skeleton = asf.skeleton();
    let frame_count = count_frames(text)?;
    let mut motion_data = MotionData::try_new(frame_count, skeleton.joint_count(), options.amc_frame_time)?;

    // Pass 2: fill in the records
    let mut angle_unit = asf.angle_unit();
    let mut current_frame: Option<Index> = None;
    for (line_no, line) in Lines::new(text, utils::hash_comments) {
        if line.starts_with(':') {
            if let Some(unit) = header_angle_unit(line) {
                angle_unit = unit;
            }
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            continue;
        };
        let values = tokens
            .map(|token| utils::parse_float(token, line_no))
            .collect::<Result<Vec<f64>>>()?;

        if values.is_empty() {
            let frame = utils::parse_index(head, line_no)?;
            if frame == 0 {
                return Err(ParseError::InvalidFrame {
                    line: line_no,
                    frame,
                });
            }
            current_frame = Some(frame - 1);
            continue;
        }

        let Some(frame) = current_frame else {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "a frame number",
                found: line.to_string(),
            });
        };
        let joint_index = skeleton
            .find_joint_index(head)
            .ok_or_else(|| ParseError::UnknownBone {
                line: line_no,
                name: head.to_string(),
            })?;
        let dof = asf.dof(joint_index);
        if dof.len() != values.len() {
            return Err(ParseError::ChannelCount {
                line: line_no,
                expected: dof.len(),
                found: values.len(),
            });
        }

        let mut accum: Rotation = Matrix3::identity();
        let mut position = Position::zero();
        for (&channel, &value) in dof.iter().zip(values.iter()) {
            match channel.rotation(angle_unit.to_rad(value)) {
                Some(rotation) => accum = rotation * accum,
                None => channel.apply_position(value, &mut position),
            }
        }

        // re-express the rotation, defined in the bone's own axis frame, in the hierarchy
        let Some(joint) = skeleton.get_joint(joint_index) else {
            continue;
        };
        let mut frame_basis = joint.basis();
        if let Some(parent) = skeleton.parent_of(joint_index) {
            frame_basis = frame_basis * parent.basis().transpose();
        }
        accum = frame_basis * accum;

        if joint_index == 0 {
            motion_data.set_position(frame, position);
        }
        motion_data.set_rotation(frame, joint_index, utils::quaternion_from_rotation(accum));
    }

    log::info!(
        "parsed AMC: {} frames for {} joints",
        motion_data.frame_count(),
        motion_data.joint_count()
    );
    Ok(motion_data)
}
