/// Video duration probing
///
/// Reads the movie header (`mvhd`) of an MP4/QuickTime file to get the
/// duration without decoding any media.
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How much of the file is scanned for the movie header
const PROBE_BYTES: usize = 4 * 1024 * 1024;

/// Probe a video file on disk
pub fn probe_duration(path: &Path) -> Option<f64> {
    let file = File::open(path).ok()?;
    let mut data = Vec::new();
    file.take(PROBE_BYTES as u64).read_to_end(&mut data).ok()?;

    let duration = mp4_duration(&data);
    if duration.is_none() {
        tracing::debug!("No movie header found in {}", path.display());
    }
    duration
}

/// Find the `mvhd` box and return its duration in seconds
///
/// Most encoders put `moov` at the front; files with `moov` after a large
/// `mdat` beyond the probe window report no duration.
pub fn mp4_duration(data: &[u8]) -> Option<f64> {
    let marker = b"mvhd";

    let start = data.windows(marker.len()).position(|w| w == marker)? + marker.len();
    let body = data.get(start..)?;
    let version = *body.first()?;

    // version(1) flags(3), then creation/modification times, timescale, duration
    let (timescale, duration) = match version {
        0 => {
            let timescale = read_u32(body, 12)?;
            let duration = read_u32(body, 16)? as u64;
            (timescale, duration)
        }
        1 => {
            let timescale = read_u32(body, 20)?;
            let duration = read_u64(body, 24)?;
            (timescale, duration)
        }
        _ => return None,
    };

    if timescale == 0 || duration == u64::MAX || (version == 0 && duration == u32::MAX as u64) {
        return None;
    }

    Some(duration as f64 / timescale as f64)
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset + 8)?;
    Some(u64::from_be_bytes(bytes.try_into().ok()?))
}
