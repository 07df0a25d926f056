use crate::config::LoadOptions;
use crate::error::{ParseError, Result};
use crate::skeleton::{LinkError, Skeleton, SkeletonBuilder};
use crate::types::*;
use crate::utils::{self, Lines};
use cgmath::{Matrix, Matrix3, SquareMatrix, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// one `(lo hi)` pair of a `limits` record
static RE_LIMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*([^\s()]+)\s+([^\s()]+)\s*\)").expect("valid regex"));
static RE_AXIS_ORDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[XYZxyz]{1,3}$").expect("valid regex"));

const ROOT_NAME: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Name,
    Units,
    Documentation,
    Root,
    BoneData,
    Hierarchy,
}

const SECTIONS: [(&str, Section); 7] = [
    (":version", Section::Version),
    (":name", Section::Name),
    (":units", Section::Units),
    (":documentation", Section::Documentation),
    (":root", Section::Root),
    (":bonedata", Section::BoneData),
    (":hierarchy", Section::Hierarchy),
];

impl Section {
    fn decode(token: &str) -> Option<Section> {
        SECTIONS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, section)| *section)
    }
}

/// A bone record from the `:bonedata` section, as declared.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneDefinition {
    pub id: Option<u32>,
    pub name: String,
    /// Unit vector of the bone in world space.
    pub direction: Position,
    pub length: f64,
    /// Local frame built from the `axis` record.
    pub basis: Rotation,
    pub dof: Vec<Channel>,
    /// `(min, max)` per DOF, possibly infinite.
    pub limits: Vec<(f64, f64)>,
}

/// Skeleton parsed from an ASF file, plus what the AMC parser needs to read motion for it.
#[derive(Debug, Clone)]
pub struct AsfSkeleton {
    skeleton: Skeleton,
    dof: Vec<Vec<Channel>>,
    angle_unit: AngleUnit,
    name: Option<String>,
    version: Option<String>,
    bones: Vec<BoneDefinition>,
}

impl AsfSkeleton {
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn into_skeleton(self) -> Skeleton {
        self.skeleton
    }

    /// Channel order of the joint at `index`: the root `order`, a bone `dof`, or nothing.
    pub fn dof(&self, index: Index) -> &[Channel] {
        self.dof.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn angle_unit(&self) -> AngleUnit {
        self.angle_unit
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Bone records in declaration order.
    pub fn bones(&self) -> &[BoneDefinition] {
        &self.bones
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default)]
struct BoneDraft {
    id: Option<u32>,
    name: Option<String>,
    direction: Option<Position>,
    length: f64,
    basis: Option<Rotation>,
    dof: Vec<Channel>,
    limits: Vec<(f64, f64)>,
}

struct AsfParser<'a> {
    lines: Lines<'a>,
    options: LoadOptions,

    section: Option<Section>,
    name: Option<String>,
    version: Option<String>,
    angle_unit: AngleUnit,
    length_unit: f64,

    builder: SkeletonBuilder,
    root: Index,
    // arena index -> channel order
    dof: Vec<Vec<Channel>>,
    bones: Vec<BoneDefinition>,
    bone_index: HashMap<String, Index>,

    current_bone: Option<BoneDraft>,
    in_hierarchy_block: bool,
}

impl<'a> AsfParser<'a> {
    fn new(text: &'a str, options: LoadOptions) -> Self {
        let mut builder = SkeletonBuilder::new();
        let root = builder.add_joint(ROOT_NAME);
        AsfParser {
            lines: Lines::new(text, utils::hash_comments),
            options,
            section: None,
            name: None,
            version: None,
            angle_unit: AngleUnit::Degrees,
            length_unit: 1.0,
            builder,
            root,
            dof: vec![Vec::new()],
            bones: Vec::new(),
            bone_index: HashMap::new(),
            current_bone: None,
            in_hierarchy_block: false,
        }
    }

    fn parse(mut self) -> Result<AsfSkeleton> {
        while let Some((line_no, line)) = self.lines.next() {
            let mut tokens = line.split_whitespace();
            let Some(head) = tokens.next() else {
                continue;
            };

            if head.starts_with(':') {
                self.enter_section(head, tokens, line_no)?;
                continue;
            }

            match self.section {
                Some(Section::Units) => self.parse_units(head, tokens, line_no)?,
                Some(Section::Root) => self.parse_root(head, tokens, line_no)?,
                Some(Section::BoneData) => self.parse_bonedata(head, line, tokens, line_no)?,
                Some(Section::Hierarchy) => self.parse_hierarchy(head, tokens, line_no)?,
                Some(Section::Version | Section::Name | Section::Documentation) | None => {}
            }
        }

        if self.current_bone.is_some() {
            return Err(ParseError::UnexpectedEof {
                expected: "`end` of bone block",
            });
        }
        if self.in_hierarchy_block {
            return Err(ParseError::UnexpectedEof {
                expected: "`end` of hierarchy block",
            });
        }

        self.fixup_joints();
        self.finish()
    }

    fn enter_section<'t>(
        &mut self,
        head: &str,
        mut tokens: impl Iterator<Item = &'t str>,
        line_no: usize,
    ) -> Result<()> {
        if self.current_bone.is_some() {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "`end` of bone block",
                found: head.to_string(),
            });
        }

        self.section = Section::decode(head);
        match self.section {
            Some(Section::Version) => self.version = tokens.next().map(str::to_string),
            Some(Section::Name) => self.name = tokens.next().map(str::to_string),
            Some(section) => log::debug!("section {:?}", section),
            None => log::warn!("skipping unknown ASF section `{}` (line {})", head, line_no),
        }
        Ok(())
    }

    fn parse_units<'t>(
        &mut self,
        head: &str,
        mut tokens: impl Iterator<Item = &'t str>,
        line_no: usize,
    ) -> Result<()> {
        let value = tokens.next().ok_or_else(|| ParseError::Syntax {
            line: line_no,
            expected: "a unit value",
            found: head.to_string(),
        })?;
        match head {
            "angle" => {
                self.angle_unit =
                    AngleUnit::from_name(value).ok_or_else(|| ParseError::Syntax {
                        line: line_no,
                        expected: "`deg` or `rad`",
                        found: value.to_string(),
                    })?;
            }
            "length" => {
                let length = utils::parse_float(value, line_no)?;
                if length <= 0.0 || !length.is_finite() {
                    return Err(ParseError::InvalidUnits {
                        line: line_no,
                        value: length,
                    });
                }
                self.length_unit = length;
            }
            _ => log::debug!("ignoring unit `{}`", head),
        }
        Ok(())
    }

    fn parse_root<'t>(
        &mut self,
        head: &str,
        tokens: impl Iterator<Item = &'t str>,
        line_no: usize,
    ) -> Result<()> {
        match head {
            "order" => self.dof[self.root] = parse_channel_names(tokens, line_no)?,
            "position" => {
                let position = utils::parse_vector3(tokens, line_no)?;
                self.builder.set_position(self.root, position);
            }
            // root axis and orientation do not affect the root basis
            _ => log::debug!("ignoring root field `{}`", head),
        }
        Ok(())
    }

    fn parse_bonedata<'t>(
        &mut self,
        head: &str,
        line: &str,
        mut tokens: impl Iterator<Item = &'t str>,
        line_no: usize,
    ) -> Result<()> {
        if head == "begin" {
            if self.current_bone.is_some() {
                return Err(ParseError::Syntax {
                    line: line_no,
                    expected: "`end` of bone block",
                    found: line.to_string(),
                });
            }
            self.current_bone = Some(BoneDraft::default());
            return Ok(());
        }

        let Some(bone) = self.current_bone.as_mut() else {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "`begin`",
                found: line.to_string(),
            });
        };

        match head {
            "end" => {
                if let Some(bone) = self.current_bone.take() {
                    self.finish_bone(bone, line_no)?;
                }
            }
            "id" => {
                bone.id = match tokens.next() {
                    Some(token) => Some(token.parse::<u32>().map_err(|_| {
                        ParseError::InvalidNumber {
                            line: line_no,
                            token: token.to_string(),
                        }
                    })?),
                    None => None,
                };
            }
            "name" => {
                bone.name = Some(
                    tokens
                        .next()
                        .ok_or_else(|| ParseError::Syntax {
                            line: line_no,
                            expected: "`name <bone>`",
                            found: line.to_string(),
                        })?
                        .to_string(),
                );
            }
            "direction" => bone.direction = Some(utils::parse_vector3(tokens, line_no)?),
            "length" => {
                let token = tokens.next().ok_or_else(|| ParseError::Syntax {
                    line: line_no,
                    expected: "`length <value>`",
                    found: line.to_string(),
                })?;
                bone.length = utils::parse_float(token, line_no)?;
            }
            "axis" => bone.basis = Some(parse_axis(tokens, line, line_no, self.angle_unit)?),
            "dof" => bone.dof = parse_channel_names(tokens, line_no)?,
            "limits" => bone.limits = parse_limits(line, line_no)?,
            _ if head.starts_with('(') => bone.limits.extend(parse_limits(line, line_no)?),
            _ => log::debug!("ignoring bone field `{}`", head),
        }
        Ok(())
    }

    fn finish_bone(&mut self, bone: BoneDraft, line_no: usize) -> Result<()> {
        let name = bone.name.ok_or_else(|| ParseError::Syntax {
            line: line_no,
            expected: "`name` before `end`",
            found: "end".to_string(),
        })?;
        if name == ROOT_NAME || self.bone_index.contains_key(&name) {
            return Err(ParseError::DuplicateBone {
                line: line_no,
                name,
            });
        }

        let direction = bone.direction.unwrap_or_else(Position::zero);
        let basis = bone.basis.unwrap_or_else(Matrix3::identity);
        // bone vector re-expressed in the bone's own frame
        let bone_vector = direction * (bone.length / self.length_unit);
        let offset = basis.transpose() * bone_vector;

        log::debug!("bone `{}` dof {:?}", name, bone.dof);
        let index = self.builder.add_joint(name.clone());
        self.builder.set_offset(index, offset);
        self.builder.set_basis(index, basis);
        self.dof.push(bone.dof.clone());
        self.bone_index.insert(name.clone(), index);
        self.bones.push(BoneDefinition {
            id: bone.id,
            name,
            direction,
            length: bone.length,
            basis,
            dof: bone.dof,
            limits: bone.limits,
        });
        Ok(())
    }

    fn parse_hierarchy<'t>(
        &mut self,
        head: &str,
        tokens: impl Iterator<Item = &'t str>,
        line_no: usize,
    ) -> Result<()> {
        match head {
            "begin" => {
                self.in_hierarchy_block = true;
                return Ok(());
            }
            "end" => {
                self.in_hierarchy_block = false;
                return Ok(());
            }
            _ => {}
        }
        if !self.in_hierarchy_block {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "`begin`",
                found: head.to_string(),
            });
        }

        let parent = self.lookup_bone(head, line_no)?;
        for child_name in tokens {
            let child = self.lookup_bone(child_name, line_no)?;
            if child == self.root {
                return Err(ParseError::Syntax {
                    line: line_no,
                    expected: "a child bone",
                    found: child_name.to_string(),
                });
            }
            self.builder
                .link(parent, child)
                .map_err(|err| match err {
                    LinkError::HasParent => ParseError::DuplicateParent {
                        line: line_no,
                        name: child_name.to_string(),
                    },
                    LinkError::SelfLink => ParseError::Syntax {
                        line: line_no,
                        expected: "a child other than the parent",
                        found: child_name.to_string(),
                    },
                })?;
        }
        Ok(())
    }

    fn lookup_bone(&self, name: &str, line_no: usize) -> Result<Index> {
        if name == ROOT_NAME {
            return Ok(self.root);
        }
        self.bone_index
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::UnknownBone {
                line: line_no,
                name: name.to_string(),
            })
    }

    /// Give every childless joint a `Site` leaf and move bone vectors one level down:
    /// a joint sits at the end of its parent's bone, a site at the end of its own.
    fn fixup_joints(&mut self) {
        let scale = self.options.offset_scale;
        let site_scale = if self.options.scale_site_offsets { scale } else { 1.0 };
        let bone_vectors: Vec<Position> = (0..self.builder.len())
            .map(|index| self.builder.offset(index))
            .collect();

        let mut site_count = 0;
        let mut stack = vec![self.root];
        while let Some(joint) = stack.pop() {
            let children = self.builder.children(joint).to_vec();
            if children.is_empty() {
                let name = format!("{}_Site", self.builder.name(joint));
                let site = self.builder.add_end_site(name, bone_vectors[joint] * site_scale);
                self.dof.push(Vec::new());
                // a fresh site has no parent, the link cannot fail
                let _ = self.builder.link(joint, site);
                site_count += 1;
            } else {
                stack.extend(children);
            }

            let shifted = self
                .builder
                .parent(joint)
                .map(|parent| bone_vectors[parent])
                .unwrap_or_else(Position::zero);
            self.builder.set_offset(joint, shifted * scale);
        }
        log::debug!("added {} site joints", site_count);
    }

    fn finish(self) -> Result<AsfSkeleton> {
        let AsfParser {
            builder,
            root,
            mut dof,
            angle_unit,
            name,
            version,
            bones,
            ..
        } = self;

        let (skeleton, remap) = builder.build(root).map_err(|_| ParseError::Syntax {
            line: 0,
            expected: "a tree rooted at `root`",
            found: "a cyclic hierarchy".to_string(),
        })?;

        let mut joint_dof = vec![Vec::new(); skeleton.joint_count()];
        for (draft, slot) in remap.into_iter().enumerate() {
            if let Some(index) = slot {
                joint_dof[index] = std::mem::take(&mut dof[draft]);
            }
        }

        log::info!(
            "parsed ASF `{}`: {} bones, {} joints",
            name.as_deref().unwrap_or("?"),
            bones.len(),
            skeleton.joint_count()
        );
        Ok(AsfSkeleton {
            skeleton,
            dof: joint_dof,
            angle_unit,
            name,
            version,
            bones,
        })
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn parse_channel_names<'t>(
    tokens: impl Iterator<Item = &'t str>,
    line_no: usize,
) -> Result<Vec<Channel>> {
    tokens
        .map(|name| {
            Channel::from_asf_name(name).ok_or_else(|| ParseError::UnknownChannel {
                line: line_no,
                name: name.to_string(),
            })
        })
        .collect()
}

/// `axis a1 a2 a3 ORDER`: elemental rotations composed in ORDER, each left-multiplied.
fn parse_axis<'t>(
    tokens: impl Iterator<Item = &'t str>,
    line: &str,
    line_no: usize,
    angle_unit: AngleUnit,
) -> Result<Rotation> {
    let tokens: Vec<&str> = tokens.collect();
    let (angles, order) = match tokens.as_slice() {
        [x, y, z, order] if RE_AXIS_ORDER.is_match(order) => ([*x, *y, *z], *order),
        _ => {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "`axis <x> <y> <z> <order>`",
                found: line.to_string(),
            })
        }
    };
    let angles = [
        utils::parse_float(angles[0], line_no)?,
        utils::parse_float(angles[1], line_no)?,
        utils::parse_float(angles[2], line_no)?,
    ];

    let mut basis: Rotation = Matrix3::identity();
    for axis in order.chars() {
        let rotation = match axis.to_ascii_uppercase() {
            'X' => Matrix3::from_angle_x(angle_unit.to_rad(angles[0])),
            'Y' => Matrix3::from_angle_y(angle_unit.to_rad(angles[1])),
            _ => Matrix3::from_angle_z(angle_unit.to_rad(angles[2])),
        };
        basis = rotation * basis;
    }
    Ok(basis)
}

fn parse_limits(line: &str, line_no: usize) -> Result<Vec<(f64, f64)>> {
    RE_LIMIT
        .captures_iter(line)
        .map(|captures| {
            Ok((
                utils::parse_float(&captures[1], line_no)?,
                utils::parse_float(&captures[2], line_no)?,
            ))
        })
        .collect()
}

/// Parse a complete ASF document.
pub(crate) fn parse_asf(text: &str, options: &LoadOptions) -> Result<AsfSkeleton> {
    AsfParser::new(text, *options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace};
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = "# comment
:version 1.10
:name tiny
:units
  mass 1.0
  length 0.5
  angle deg
:documentation
  begin is just text here
:root
   order TX TY TZ RX RY RZ
   axis XYZ
   position 1 2 3
   orientation 0 0 0
:bonedata
  begin
     id 1
     name upper
     direction 0 1 0
     length 2
     axis 0 0 0 XYZ
     dof rx ry rz
     limits (-160.0 20.0)
            (-inf inf)
            (-60 70)
  end
  begin
     id 2
     name lower
     direction 1 0 0
     length 1
     axis 0 0 90 XYZ
     dof rz
  end
:hierarchy
  begin
    root upper
    upper lower
  end
";

    fn names(asf: &AsfSkeleton) -> Vec<&str> {
        asf.skeleton().joints().iter().map(|joint| joint.name()).collect()
    }

    #[test]
    fn test_sections_and_units() {
        let asf = parse_asf(MINIMAL, &LoadOptions::default()).unwrap();
        assert_eq!(asf.name(), Some("tiny"));
        assert_eq!(asf.version(), Some("1.10"));
        assert_eq!(asf.angle_unit(), AngleUnit::Degrees);
        assert_eq!(names(&asf), vec!["root", "upper", "lower", "lower_Site"]);
        assert_eq!(
            asf.dof(0),
            &[
                Channel::PositionX,
                Channel::PositionY,
                Channel::PositionZ,
                Channel::RotationX,
                Channel::RotationY,
                Channel::RotationZ
            ]
        );
        assert_eq!(asf.dof(2), &[Channel::RotationZ]);
        assert_eq!(asf.dof(3), &[] as &[Channel]);
        assert_eq!(asf.skeleton().root().position(), Position::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_identity_axis_gives_identity_basis() {
        let asf = parse_asf(MINIMAL, &LoadOptions::default()).unwrap();
        let upper = asf.skeleton().get_joint(1).unwrap();
        assert_eq!(upper.basis(), Matrix3::identity());
        assert_eq!(asf.bones()[0].limits, vec![
            (-160.0, 20.0),
            (f64::NEG_INFINITY, f64::INFINITY),
            (-60.0, 70.0)
        ]);
        assert_eq!(asf.bones()[0].id, Some(1));
    }

    #[test]
    fn test_offsets_are_shifted_to_child_and_site() {
        let asf = parse_asf(MINIMAL, &LoadOptions::default()).unwrap();
        let skeleton = asf.skeleton();
        // root and its direct children sit at the origin
        assert_eq!(skeleton.get_joint(0).unwrap().offset(), Position::zero());
        assert_eq!(skeleton.get_joint(1).unwrap().offset(), Position::zero());
        // `lower` sits at the end of `upper`: length 2 / unit 0.5
        let lower = skeleton.get_joint(2).unwrap();
        assert!((lower.offset() - Position::new(0.0, 4.0, 0.0)).magnitude() < 1e-9);
        // `lower` bone vector (2, 0, 0) seen through the transpose of its Z90 basis
        let site = skeleton.get_joint(3).unwrap();
        assert!(site.is_end_site());
        assert!((site.offset() - Position::new(0.0, -2.0, 0.0)).magnitude() < 1e-9);
        assert_eq!(site.basis(), Matrix3::identity());
        let expected = Matrix3::from_angle_z(Deg(90.0));
        for column in 0..3 {
            assert!((lower.basis()[column] - expected[column]).magnitude() < 1e-9);
        }
    }

    #[test]
    fn test_offset_scale_applies_to_every_joint() {
        let options = LoadOptions::default().with_offset_scale(3.0);
        let asf = parse_asf(MINIMAL, &options).unwrap();
        let skeleton = asf.skeleton();
        assert!((skeleton.get_joint(2).unwrap().offset() - Position::new(0.0, 12.0, 0.0)).magnitude() < 1e-9);
        assert!((skeleton.get_joint(3).unwrap().offset() - Position::new(0.0, -6.0, 0.0)).magnitude() < 1e-9);
    }

    #[test]
    fn test_legacy_scale_leaves_sites_unscaled() {
        let single = ":bonedata\n  begin\n     name a\n     direction 0 1 0\n     length 2\n     axis 0 0 0 XYZ\n  end\n:hierarchy\n  begin\n    root a\n  end\n";
        let asf = parse_asf(single, &LoadOptions::legacy()).unwrap();
        assert_eq!(names(&asf), vec!["root", "a", "a_Site"]);
        let site = asf.skeleton().get_joint(2).unwrap();
        assert!((site.offset() - Position::new(0.0, 2.0, 0.0)).magnitude() < 1e-9);

        let asf = parse_asf(MINIMAL, &LoadOptions::legacy()).unwrap();
        let skeleton = asf.skeleton();
        assert!((skeleton.get_joint(2).unwrap().offset() - Position::new(0.0, 12.0, 0.0)).magnitude() < 1e-9);
        assert!((skeleton.get_joint(3).unwrap().offset() - Position::new(0.0, -2.0, 0.0)).magnitude() < 1e-9);
    }

    #[test]
    fn test_every_leaf_gets_one_site() {
        let side = "  begin\n     name side\n     direction 0 0 1\n     length 1\n     axis 0 0 0 XYZ\n  end\n:hierarchy";
        let text = MINIMAL
            .replace(":hierarchy", side)
            .replace("    root upper\n", "    root upper side\n");
        let asf = parse_asf(&text, &LoadOptions::default()).unwrap();
        assert_eq!(
            names(&asf),
            vec!["root", "upper", "lower", "lower_Site", "side", "side_Site"]
        );

        let skeleton = asf.skeleton();
        for joint in skeleton.joints() {
            if joint.is_end_site() {
                assert!(joint.children().is_empty());
                continue;
            }
            assert!(!joint.children().is_empty());
            let sites: Vec<&str> = skeleton
                .children_of(joint.index())
                .filter(|child| child.is_end_site())
                .map(|child| child.name())
                .collect();
            match joint.name() {
                "lower" | "side" => assert_eq!(sites.len(), 1),
                _ => assert!(sites.is_empty()),
            }
        }
    }

    #[test]
    fn test_root_without_bones_gets_site() {
        let asf = parse_asf(":root\n order TX TY TZ\n", &LoadOptions::default()).unwrap();
        assert_eq!(names(&asf), vec!["root", "root_Site"]);
    }

    #[test]
    fn test_orphan_bones_are_dropped() {
        let text = MINIMAL.replace("    upper lower\n", "");
        let asf = parse_asf(&text, &LoadOptions::default()).unwrap();
        assert_eq!(names(&asf), vec!["root", "upper", "upper_Site"]);
        assert_eq!(asf.bones().len(), 2);
    }

    #[test]
    fn test_hierarchy_errors() {
        let unknown = MINIMAL.replace("upper lower", "upper foot");
        assert!(matches!(
            parse_asf(&unknown, &LoadOptions::default()).unwrap_err(),
            ParseError::UnknownBone { ref name, .. } if name == "foot"
        ));

        let twice = MINIMAL.replace("    root upper\n", "    root upper lower\n");
        assert!(matches!(
            parse_asf(&twice, &LoadOptions::default()).unwrap_err(),
            ParseError::DuplicateParent { ref name, .. } if name == "lower"
        ));

        let root_child = MINIMAL.replace("upper lower", "upper root");
        assert!(matches!(
            parse_asf(&root_child, &LoadOptions::default()).unwrap_err(),
            ParseError::Syntax { .. }
        ));
    }

    #[test]
    fn test_bonedata_errors() {
        let no_name = MINIMAL.replace("     name lower\n", "");
        assert!(matches!(
            parse_asf(&no_name, &LoadOptions::default()).unwrap_err(),
            ParseError::Syntax { .. }
        ));

        let duplicate = MINIMAL.replace("name lower", "name upper");
        assert!(matches!(
            parse_asf(&duplicate, &LoadOptions::default()).unwrap_err(),
            ParseError::DuplicateBone { .. }
        ));

        let bad_dof = MINIMAL.replace("dof rz", "dof rz l");
        assert!(matches!(
            parse_asf(&bad_dof, &LoadOptions::default()).unwrap_err(),
            ParseError::UnknownChannel { ref name, .. } if name == "l"
        ));

        let bad_number = MINIMAL.replace("length 2", "length two");
        assert!(matches!(
            parse_asf(&bad_number, &LoadOptions::default()).unwrap_err(),
            ParseError::InvalidNumber { .. }
        ));

        let unterminated = MINIMAL.replace("     dof rz\n  end\n", "     dof rz\n");
        assert!(parse_asf(&unterminated, &LoadOptions::default()).is_err());

        let bad_units = MINIMAL.replace("length 0.5", "length 0");
        assert!(matches!(
            parse_asf(&bad_units, &LoadOptions::default()).unwrap_err(),
            ParseError::InvalidUnits { .. }
        ));
    }

    #[test]
    fn test_bone_id_must_fit_u32() {
        let large = MINIMAL.replace("id 2", "id 4294967298");
        match parse_asf(&large, &LoadOptions::default()).unwrap_err() {
            ParseError::InvalidNumber { line, token } => {
                assert_eq!(line, 28);
                assert_eq!(token, "4294967298");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let max = MINIMAL.replace("id 2", "id 4294967295");
        let asf = parse_asf(&max, &LoadOptions::default()).unwrap();
        assert_eq!(asf.bones()[1].id, Some(u32::MAX));
    }

    #[test]
    fn test_radian_axis() {
        let text = MINIMAL
            .replace("angle deg", "angle rad")
            .replace("axis 0 0 90 XYZ", "axis 0 0 1.5707963267948966 XYZ");
        let asf = parse_asf(&text, &LoadOptions::default()).unwrap();
        assert_eq!(asf.angle_unit(), AngleUnit::Radians);
        let expected = Matrix3::from_angle_z(Deg(90.0));
        let basis = asf.skeleton().get_joint(2).unwrap().basis();
        for column in 0..3 {
            assert!((basis[column] - expected[column]).magnitude() < 1e-9);
        }
    }
}
