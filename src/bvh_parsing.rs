use crate::error::{ParseError, Result};
use crate::skeleton::{Skeleton, SkeletonBuilder};
use crate::types::*;
use crate::utils::{self, Lines};
use cgmath::{Deg, Matrix3, SquareMatrix, Zero};
use once_cell::sync::Lazy;
use regex::Regex;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static RE_FRAMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Frames:\s*(\S+)$").expect("valid regex"));
static RE_FRAME_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Frame\s+Time:\s*(\S+)$").expect("valid regex"));

/// Leading token of a hierarchy line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Hierarchy,
    Root,
    Joint,
    End,
    Offset,
    Channels,
    Open,
    Close,
    Motion,
}

const KEYWORDS: [(&str, Keyword); 9] = [
    ("HIERARCHY", Keyword::Hierarchy),
    ("ROOT", Keyword::Root),
    ("JOINT", Keyword::Joint),
    ("End", Keyword::End),
    ("OFFSET", Keyword::Offset),
    ("CHANNELS", Keyword::Channels),
    ("{", Keyword::Open),
    ("}", Keyword::Close),
    ("MOTION", Keyword::Motion),
];

impl Keyword {
    fn decode(token: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, keyword)| *keyword)
    }
}

/// Channel order of every joint, indexed like the builder's arena. End sites have none.
type ChannelLayout = Vec<Vec<Channel>>;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct BvhParser<'a> {
    lines: Lines<'a>,
}

impl<'a> BvhParser<'a> {
    fn new(text: &'a str) -> Self {
        BvhParser {
            lines: Lines::new(text, utils::no_comments),
        }
    }

    /// Next line, split into its decoded keyword and the remaining tokens.
    fn next_record(
        &mut self,
        expected: &'static str,
    ) -> Result<(usize, &'a str, Option<Keyword>, std::str::SplitWhitespace<'a>)> {
        let (line_no, line) = self.lines.expect_line(expected)?;
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().and_then(Keyword::decode);
        Ok((line_no, line, keyword, tokens))
    }

    fn expect_keyword(&mut self, keyword: Keyword, expected: &'static str) -> Result<usize> {
        let (line_no, line, found, _) = self.next_record(expected)?;
        if found != Some(keyword) {
            return Err(ParseError::Syntax {
                line: line_no,
                expected,
                found: line.to_string(),
            });
        }
        Ok(line_no)
    }

    fn parse_hierarchy(&mut self) -> Result<(Skeleton, ChannelLayout)> {
        self.expect_keyword(Keyword::Hierarchy, "`HIERARCHY`")?;

        let (line_no, line, keyword, mut tokens) = self.next_record("`ROOT`")?;
        let root_name = match (keyword, tokens.next()) {
            (Some(Keyword::Root), Some(name)) => name.to_string(),
            _ => {
                return Err(ParseError::Syntax {
                    line: line_no,
                    expected: "`ROOT <name>`",
                    found: line.to_string(),
                })
            }
        };

        let mut builder = SkeletonBuilder::new();
        let mut layout: ChannelLayout = Vec::new();
        let root = self.parse_joint(&mut builder, &mut layout, None, root_name)?;

        let (skeleton, remap) = builder.build(root).map_err(|_| ParseError::Syntax {
            line: line_no,
            expected: "a single root joint",
            found: "a cyclic hierarchy".to_string(),
        })?;

        // reorder the channel lists from arena order to skeleton order
        let mut channels: ChannelLayout = vec![Vec::new(); skeleton.joint_count()];
        for (draft, slot) in remap.into_iter().enumerate() {
            if let Some(index) = slot {
                channels[index] = std::mem::take(&mut layout[draft]);
            }
        }
        Ok((skeleton, channels))
    }

    /// Parse a `{ ... }` joint block. The joint is linked to `parent` once its `}` is read.
    fn parse_joint(
        &mut self,
        builder: &mut SkeletonBuilder,
        layout: &mut ChannelLayout,
        parent: Option<Index>,
        name: String,
    ) -> Result<Index> {
        self.expect_keyword(Keyword::Open, "`{`")?;

        log::debug!("joint `{}`", name);
        let joint = builder.add_joint(name);
        layout.push(Vec::new());
        debug_assert_eq!(layout.len(), builder.len());

        loop {
            let (line_no, line, keyword, mut tokens) =
                self.next_record("`OFFSET`, `CHANNELS`, `JOINT`, `End Site` or `}`")?;
            match keyword {
                Some(Keyword::Offset) => {
                    builder.set_offset(joint, utils::parse_vector3(tokens, line_no)?);
                }
                Some(Keyword::Channels) => {
                    layout[joint] = parse_channels(tokens, line_no)?;
                }
                Some(Keyword::Joint) => {
                    let child_name = tokens.next().ok_or_else(|| ParseError::Syntax {
                        line: line_no,
                        expected: "`JOINT <name>`",
                        found: line.to_string(),
                    })?;
                    self.parse_joint(builder, layout, Some(joint), child_name.to_string())?;
                }
                Some(Keyword::End) => {
                    self.parse_end_site(builder, layout, joint)?;
                }
                Some(Keyword::Close) => {
                    if let Some(parent) = parent {
                        builder
                            .link(parent, joint)
                            .map_err(|_| ParseError::DuplicateParent {
                                line: line_no,
                                name: builder.name(joint).to_string(),
                            })?;
                    }
                    return Ok(joint);
                }
                _ => {
                    return Err(ParseError::Syntax {
                        line: line_no,
                        expected: "`OFFSET`, `CHANNELS`, `JOINT`, `End Site` or `}`",
                        found: line.to_string(),
                    })
                }
            }
        }
    }

    /// `End Site { OFFSET x y z }`, a channel-less leaf.
    fn parse_end_site(
        &mut self,
        builder: &mut SkeletonBuilder,
        layout: &mut ChannelLayout,
        parent: Index,
    ) -> Result<Index> {
        self.expect_keyword(Keyword::Open, "`{`")?;

        let (line_no, line, keyword, tokens) = self.next_record("`OFFSET`")?;
        if keyword != Some(Keyword::Offset) {
            return Err(ParseError::Syntax {
                line: line_no,
                expected: "`OFFSET`",
                found: line.to_string(),
            });
        }
        let offset = utils::parse_vector3(tokens, line_no)?;

        self.expect_keyword(Keyword::Close, "`}`")?;

        let name = format!("{}_Site", builder.name(parent));
        let site = builder.add_end_site(name, offset);
        layout.push(Vec::new());
        builder
            .link(parent, site)
            .map_err(|_| ParseError::DuplicateParent {
                line: line_no,
                name: builder.name(site).to_string(),
            })?;
        Ok(site)
    }

    fn parse_motion(&mut self, skeleton: &Skeleton, channels: &ChannelLayout) -> Result<MotionData> {
        self.expect_keyword(Keyword::Motion, "`MOTION`")?;

        let (line_no, line) = self.lines.expect_line("`Frames:`")?;
        let num_frames = match RE_FRAMES.captures(line) {
            Some(captures) => utils::parse_index(&captures[1], line_no)?,
            None => {
                return Err(ParseError::Syntax {
                    line: line_no,
                    expected: "`Frames: <count>`",
                    found: line.to_string(),
                })
            }
        };

        let (line_no, line) = self.lines.expect_line("`Frame Time:`")?;
        let frame_time = match RE_FRAME_TIME.captures(line) {
            Some(captures) => utils::parse_float(&captures[1], line_no)?,
            None => {
                return Err(ParseError::Syntax {
                    line: line_no,
                    expected: "`Frame Time: <seconds>`",
                    found: line.to_string(),
                })
            }
        };

        let num_channels: usize = channels.iter().map(Vec::len).sum();
        // one frame is pushed per decoded line, never sized from `Frames:`
        let mut motion_data = MotionData::new(0, skeleton.joint_count(), frame_time);

        for _ in 0..num_frames {
            let (line_no, line) = self.lines.expect_line("a frame of channel values")?;
            let values = line
                .split_whitespace()
                .map(|token| utils::parse_float(token, line_no))
                .collect::<Result<Vec<f64>>>()?;
            if values.len() != num_channels {
                return Err(ParseError::ChannelCount {
                    line: line_no,
                    expected: num_channels,
                    found: values.len(),
                });
            }

            let frame = motion_data.push_frame();
            let mut values = values.into_iter();
            for (joint_index, joint_channels) in channels.iter().enumerate() {
                let mut accum: Rotation = Matrix3::identity();
                let mut position = Position::zero();
                for (&channel, value) in joint_channels.iter().zip(values.by_ref()) {
                    match channel.rotation(Deg(value).into()) {
                        Some(rotation) => accum = accum * rotation,
                        None => channel.apply_position(value, &mut position),
                    }
                }
                if joint_index == 0 {
                    motion_data.set_position(frame, position);
                }
                motion_data.set_rotation(frame, joint_index, utils::quaternion_from_rotation(accum));
            }
        }

        if let Some((line_no, _)) = self.lines.next() {
            log::warn!(
                "ignoring data after the last of {} frames (line {})",
                num_frames,
                line_no
            );
        }
        Ok(motion_data)
    }
}

/// `CHANNELS n <names...>`: exactly `n` known channel names.
fn parse_channels<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Vec<Channel>> {
    let count = match tokens.next() {
        Some(token) => utils::parse_index(token, line)?,
        None => {
            return Err(ParseError::Syntax {
                line,
                expected: "`CHANNELS <count> <names...>`",
                found: String::new(),
            })
        }
    };
    let channels = tokens
        .map(|name| {
            Channel::from_bvh_name(name).ok_or_else(|| ParseError::UnknownChannel {
                line,
                name: name.to_string(),
            })
        })
        .collect::<Result<Vec<Channel>>>()?;
    if channels.len() != count {
        return Err(ParseError::ChannelCount {
            line,
            expected: count,
            found: channels.len(),
        });
    }
    Ok(channels)
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Parse a complete BVH document.
pub(crate) fn parse_bvh(text: &str) -> Result<(Skeleton, MotionData)> {
    let mut parser = BvhParser::new(text);
    let (skeleton, channels) = parser.parse_hierarchy()?;
    let motion_data = parser.parse_motion(&skeleton, &channels)?;
    log::info!(
        "parsed BVH: {} joints, {} frames at {} fps",
        skeleton.joint_count(),
        motion_data.frame_count(),
        motion_data.fps()
    );
    Ok((skeleton, motion_data))
}
