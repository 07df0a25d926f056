//! Options that tune how ASF/AMC data is turned into a skeleton and motion.

/// Offset multiplier that older tooling applied to every ASF joint offset.
/// Use it to reproduce skeletons built by that tooling.
pub const LEGACY_OFFSET_SCALE: f64 = 3.0;

/// AMC files carry no timing, most captures are recorded at 120 Hz.
pub const DEFAULT_AMC_FRAME_TIME: f64 = 1.0 / 120.0;

/// Options for the Acclaim loaders. BVH files are self-describing and ignore them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Multiplier applied to every ASF joint offset during the fixup pass.
    pub offset_scale: f64,
    /// Whether synthetic `_Site` leaves take `offset_scale` too. The historical loader
    /// left them at the raw bone vector.
    pub scale_site_offsets: bool,
    /// Seconds per frame reported for AMC motion.
    pub amc_frame_time: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            offset_scale: 1.0,
            scale_site_offsets: true,
            amc_frame_time: DEFAULT_AMC_FRAME_TIME,
        }
    }
}

impl LoadOptions {
    /// Options matching the historical loader: joint offsets scaled by
    /// [`LEGACY_OFFSET_SCALE`], site offsets left unscaled.
    pub fn legacy() -> Self {
        LoadOptions {
            offset_scale: LEGACY_OFFSET_SCALE,
            scale_site_offsets: false,
            ..Default::default()
        }
    }

    pub fn with_offset_scale(mut self, offset_scale: f64) -> Self {
        self.offset_scale = offset_scale;
        self
    }

    pub fn with_site_offset_scaling(mut self, enabled: bool) -> Self {
        self.scale_site_offsets = enabled;
        self
    }

    pub fn with_amc_frame_time(mut self, frame_time: f64) -> Self {
        self.amc_frame_time = frame_time;
        self
    }
}
