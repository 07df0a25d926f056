use crate::amc_parsing::parse_amc;
use crate::asf_parsing::{parse_asf, AsfSkeleton};
use crate::bvh_parsing::parse_bvh;
use crate::config::LoadOptions;
use crate::error::Result;
use crate::skeleton::Skeleton;
use crate::types::MotionData;
use std::path::Path;

//////////////////////////////////////////////////////////////// PUBLIC ///////////////////////////////////////////////////////////////////////////////////

/// load a bvh file from a file path
pub fn load_bvh_from_file(file_path: impl AsRef<Path>) -> Result<(Skeleton, MotionData)> {
    let contents = read_file(file_path.as_ref())?;
    parse_bvh(&contents)
}

/// load a bvh file from a string
pub fn load_bvh_from_string(bvh_string: &str) -> Result<(Skeleton, MotionData)> {
    parse_bvh(bvh_string)
}

/// load an asf skeleton from a file path
pub fn load_asf_from_file(file_path: impl AsRef<Path>, options: &LoadOptions) -> Result<AsfSkeleton> {
    let contents = read_file(file_path.as_ref())?;
    parse_asf(&contents, options)
}

/// load an asf skeleton from a string
pub fn load_asf_from_string(asf_string: &str, options: &LoadOptions) -> Result<AsfSkeleton> {
    parse_asf(asf_string, options)
}

/// load amc motion for an already parsed skeleton from a file path
pub fn load_amc_from_file(
    file_path: impl AsRef<Path>,
    asf: &AsfSkeleton,
    options: &LoadOptions,
) -> Result<MotionData> {
    let contents = read_file(file_path.as_ref())?;
    parse_amc(&contents, asf, options)
}

/// load amc motion for an already parsed skeleton from a string
pub fn load_amc_from_string(
    amc_string: &str,
    asf: &AsfSkeleton,
    options: &LoadOptions,
) -> Result<MotionData> {
    parse_amc(amc_string, asf, options)
}

/// load an asf skeleton and its amc motion in one go
pub fn load_asf_amc_from_files(
    asf_path: impl AsRef<Path>,
    amc_path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<(Skeleton, MotionData)> {
    let asf = load_asf_from_file(asf_path, options)?;
    let motion_data = load_amc_from_file(amc_path, &asf, options)?;
    Ok((asf.into_skeleton(), motion_data))
}

// the file handle is released before parsing starts
fn read_file(path: &Path) -> Result<String> {
    log::debug!("reading {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}
