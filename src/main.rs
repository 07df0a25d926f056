//! `mocap-info`: print the skeleton and motion summary of a BVH or ASF/AMC recording.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mocap_anim_parser::config::DEFAULT_AMC_FRAME_TIME;
use mocap_anim_parser::parse::{load_amc_from_file, load_asf_from_file, load_bvh_from_file};
use mocap_anim_parser::{LoadOptions, MotionData, Skeleton};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mocap-info")]
#[command(about = "Inspect BVH and ASF/AMC motion capture files", long_about = None)]
#[command(version)]
struct Cli {
    /// Motion file (.bvh) or skeleton file (.asf)
    input: PathBuf,

    /// AMC motion file to read against an .asf skeleton
    #[arg(long)]
    amc: Option<PathBuf>,

    /// Print world-space joint positions for this frame (0-based)
    #[arg(short, long)]
    frame: Option<usize>,

    /// Multiplier applied to ASF joint offsets
    #[arg(long, default_value_t = 1.0)]
    offset_scale: f64,

    /// Seconds per frame assumed for AMC motion
    #[arg(long, default_value_t = DEFAULT_AMC_FRAME_TIME)]
    amc_frame_time: f64,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    let options = LoadOptions::default()
        .with_offset_scale(cli.offset_scale)
        .with_amc_frame_time(cli.amc_frame_time);

    let extension = cli
        .input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let (mut skeleton, motion) = match extension.as_deref() {
        Some("bvh") => {
            let (skeleton, motion) = load_bvh_from_file(&cli.input)
                .with_context(|| format!("failed to load {}", cli.input.display()))?;
            (skeleton, Some(motion))
        }
        Some("asf") => {
            let asf = load_asf_from_file(&cli.input, &options)
                .with_context(|| format!("failed to load {}", cli.input.display()))?;
            let motion = match &cli.amc {
                Some(amc) => Some(
                    load_amc_from_file(amc, &asf, &options)
                        .with_context(|| format!("failed to load {}", amc.display()))?,
                ),
                None => None,
            };
            (asf.into_skeleton(), motion)
        }
        _ => bail!(
            "{}: expected a .bvh or .asf file",
            cli.input.display()
        ),
    };

    print_tree(&skeleton);

    let Some(motion) = motion else {
        if cli.frame.is_some() {
            bail!("--frame needs motion data (pass --amc for .asf input)");
        }
        return Ok(());
    };
    print_motion(&motion);

    if let Some(frame) = cli.frame {
        if !skeleton.set_pose(&motion, frame) {
            bail!(
                "frame {} is out of range (0..{})",
                frame,
                motion.frame_count()
            );
        }
        println!("\nWorld positions at frame {}:", frame);
        for (joint, position) in skeleton.joints().iter().zip(skeleton.world_positions()) {
            println!(
                "  {:<24} {:>10.4} {:>10.4} {:>10.4}",
                joint.name(),
                position.x,
                position.y,
                position.z
            );
        }
    }

    Ok(())
}

fn print_tree(skeleton: &Skeleton) {
    println!("Skeleton: {} joints", skeleton.joint_count());
    let mut stack = vec![(0, 0)];
    while let Some((index, depth)) = stack.pop() {
        let Some(joint) = skeleton.get_joint(index) else {
            continue;
        };
        let offset = joint.offset();
        println!(
            "{}{} [{:.3} {:.3} {:.3}]",
            "  ".repeat(depth + 1),
            joint.name(),
            offset.x,
            offset.y,
            offset.z
        );
        stack.extend(joint.children().iter().rev().map(|&child| (child, depth + 1)));
    }
}

fn print_motion(motion: &MotionData) {
    println!(
        "\nMotion: {} frames, {:.6} s/frame ({} fps)",
        motion.frame_count(),
        motion.frame_time(),
        motion.fps()
    );
}
