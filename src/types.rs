use crate::error::{ParseError, Result};
use cgmath::{Matrix3, One, Quaternion as CgQuaternion, Rad, Vector3, Zero};

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
pub type Quaternion = CgQuaternion<f64>;
pub type Position = Vector3<f64>;
pub type Rotation = Matrix3<f64>;
pub type Transform = cgmath::Matrix4<f64>;

/////////////////////////////////////////////////////////////////////////////////////////////////

/// One animated scalar per frame: a rotation about an axis or a position component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    RotationX,
    RotationY,
    RotationZ,
    PositionX,
    PositionY,
    PositionZ,
}

const BVH_CHANNEL_NAMES: [(&str, Channel); 6] = [
    ("Xrotation", Channel::RotationX),
    ("Yrotation", Channel::RotationY),
    ("Zrotation", Channel::RotationZ),
    ("Xposition", Channel::PositionX),
    ("Yposition", Channel::PositionY),
    ("Zposition", Channel::PositionZ),
];

// ASF root `order` uses upper case (TX RX ...), bone `dof` lower case (rx ...)
const ASF_CHANNEL_NAMES: [(&str, Channel); 6] = [
    ("rx", Channel::RotationX),
    ("ry", Channel::RotationY),
    ("rz", Channel::RotationZ),
    ("tx", Channel::PositionX),
    ("ty", Channel::PositionY),
    ("tz", Channel::PositionZ),
];

impl Channel {
    /// Decode a BVH `CHANNELS` entry such as `Zrotation`.
    pub fn from_bvh_name(name: &str) -> Option<Channel> {
        BVH_CHANNEL_NAMES
            .iter()
            .find(|(channel_name, _)| *channel_name == name)
            .map(|(_, channel)| *channel)
    }

    /// Decode an ASF root `order` or bone `dof` entry, case-insensitively.
    pub fn from_asf_name(name: &str) -> Option<Channel> {
        ASF_CHANNEL_NAMES
            .iter()
            .find(|(channel_name, _)| channel_name.eq_ignore_ascii_case(name))
            .map(|(_, channel)| *channel)
    }

    /// Elemental rotation about this channel's axis, `None` for position channels.
    pub fn rotation(self, angle: Rad<f64>) -> Option<Rotation> {
        match self {
            Channel::RotationX => Some(Matrix3::from_angle_x(angle)),
            Channel::RotationY => Some(Matrix3::from_angle_y(angle)),
            Channel::RotationZ => Some(Matrix3::from_angle_z(angle)),
            _ => None,
        }
    }

    /// Write a position channel's value into `position`. Rotation channels are ignored.
    pub fn apply_position(self, value: f64, position: &mut Position) {
        match self {
            Channel::PositionX => position.x = value,
            Channel::PositionY => position.y = value,
            Channel::PositionZ => position.z = value,
            _ => {}
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Unit of the angles found in ASF `axis` records and AMC motion values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn from_name(name: &str) -> Option<AngleUnit> {
        if name.eq_ignore_ascii_case("deg") || name.eq_ignore_ascii_case("degrees") {
            Some(AngleUnit::Degrees)
        } else if name.eq_ignore_ascii_case("rad") || name.eq_ignore_ascii_case("radians") {
            Some(AngleUnit::Radians)
        } else {
            None
        }
    }

    pub fn to_rad(self, value: f64) -> Rad<f64> {
        match self {
            AngleUnit::Degrees => Rad(value.to_radians()),
            AngleUnit::Radians => Rad(value),
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Dense, frame-major table of root positions and per-joint rotations.
#[derive(Debug, Clone)]
pub struct MotionData {
    frame_count: usize,
    joint_count: usize,
    frame_time: f64,
    positions: Vec<Position>,
    rotations: Vec<Quaternion>,
}

impl MotionData {
    /// Zero positions and identity rotations for every frame and joint.
    pub fn new(frame_count: usize, joint_count: usize, frame_time: f64) -> Self {
        MotionData {
            frame_count,
            joint_count,
            frame_time,
            positions: vec![Position::zero(); frame_count],
            rotations: vec![Quaternion::one(); frame_count * joint_count],
        }
    }

    /// Like [`MotionData::new`], for frame counts taken from untrusted input: a table
    /// that overflows or cannot be allocated is an error.
    pub(crate) fn try_new(frame_count: usize, joint_count: usize, frame_time: f64) -> Result<Self> {
        let too_large = || ParseError::MotionTooLarge {
            frame_count,
            joint_count,
        };
        let cells = frame_count.checked_mul(joint_count).ok_or_else(too_large)?;

        let mut positions = Vec::new();
        positions.try_reserve_exact(frame_count).map_err(|_| too_large())?;
        let mut rotations = Vec::new();
        rotations.try_reserve_exact(cells).map_err(|_| too_large())?;
        positions.resize(frame_count, Position::zero());
        rotations.resize(cells, Quaternion::one());

        Ok(MotionData {
            frame_count,
            joint_count,
            frame_time,
            positions,
            rotations,
        })
    }

    /// Append a frame at rest (zero position, identity rotations) and return its index.
    pub(crate) fn push_frame(&mut self) -> Index {
        self.positions.push(Position::zero());
        self.rotations
            .extend(std::iter::repeat(Quaternion::one()).take(self.joint_count));
        self.frame_count += 1;
        self.frame_count - 1
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    /// Seconds per frame.
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Frames per second, rounded to the nearest integer.
    pub fn fps(&self) -> u32 {
        if self.frame_time > 0.0 {
            (1.0 / self.frame_time).round() as u32
        } else {
            0
        }
    }

    /// Root translation of `frame`.
    pub fn get_position(&self, frame: Index) -> Option<Position> {
        self.positions.get(frame).copied()
    }

    pub fn get_rotation(&self, frame: Index, joint_index: Index) -> Option<Quaternion> {
        if frame >= self.frame_count || joint_index >= self.joint_count {
            return None;
        }
        self.rotations
            .get(frame * self.joint_count + joint_index)
            .copied()
    }

    pub(crate) fn set_position(&mut self, frame: Index, position: Position) {
        if let Some(slot) = self.positions.get_mut(frame) {
            *slot = position;
        }
    }

    pub(crate) fn set_rotation(&mut self, frame: Index, joint_index: Index, rotation: Quaternion) {
        if frame >= self.frame_count || joint_index >= self.joint_count {
            return;
        }
        if let Some(slot) = self.rotations.get_mut(frame * self.joint_count + joint_index) {
            *slot = rotation;
        }
    }
}
