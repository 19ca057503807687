// render.rs - Two-colour raster snapshots and looping GIF animation

use crate::error::{IsingError, Result};
use crate::lattice::{SpinLattice, SPIN_UP};
use crate::observer::SweepObserver;
use crate::topology::NeighborTable;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DOWN_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const UP_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

const SNAPSHOT_PREFIX: &str = "lattice_step_";
const SNAPSHOT_EXT: &str = "png";

/// Each site becomes a `scale`×`scale` block; row 0 is drawn at the bottom.
pub fn render_lattice(lattice: &SpinLattice, scale: u32) -> RgbaImage {
    let side = lattice.side() as u32;
    RgbaImage::from_fn(side * scale, side * scale, |x, y| {
        let col = (x / scale) as usize;
        let row = (side - 1 - y / scale) as usize;
        if lattice.get(row * lattice.side() + col) == SPIN_UP {
            UP_COLOR
        } else {
            DOWN_COLOR
        }
    })
}

/// `<dir>/lattice_step_<sweep>.png`
pub fn snapshot_path(dir: &Path, sweep: usize) -> PathBuf {
    dir.join(format!("{SNAPSHOT_PREFIX}{sweep}.{SNAPSHOT_EXT}"))
}

fn check_scale(scale: u32) -> Result<()> {
    if scale == 0 {
        return Err(IsingError::InvalidConfig("image scale must be positive".into()));
    }
    Ok(())
}

pub fn save_snapshot(lattice: &SpinLattice, scale: u32, path: &Path) -> Result<()> {
    check_scale(scale)?;
    render_lattice(lattice, scale).save(path)?;
    Ok(())
}

/// Writes one PNG per observed sweep. The first failure stops further
/// writes and is returned by `finish`.
pub struct SnapshotWriter {
    dir: PathBuf,
    scale: u32,
    written: usize,
    error: Option<IsingError>,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, scale: u32) -> Result<Self> {
        check_scale(scale)?;
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, scale, written: 0, error: None })
    }

    /// Number of snapshots written, or the first error hit.
    pub fn finish(self) -> Result<usize> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.written),
        }
    }
}

impl SweepObserver for SnapshotWriter {
    fn on_sweep(&mut self, sweep: usize, lattice: &SpinLattice, _table: &NeighborTable) {
        if self.error.is_some() {
            return;
        }
        let path = snapshot_path(&self.dir, sweep);
        match save_snapshot(lattice, self.scale, &path) {
            Ok(()) => {
                self.written += 1;
                debug!(path = %path.display(), "snapshot written");
            }
            Err(e) => self.error = Some(e),
        }
    }
}

/// Sweep number encoded in a snapshot file name.
fn snapshot_index(path: &Path) -> Option<usize> {
    if path.extension()?.to_str()? != SNAPSHOT_EXT {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(SNAPSHOT_PREFIX)?
        .parse()
        .ok()
}

/// Snapshot files in `dir` ordered by sweep number.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut indexed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(k) = snapshot_index(&path) {
            indexed.push((k, path));
        }
    }
    indexed.sort_by_key(|(k, _)| *k);
    Ok(indexed.into_iter().map(|(_, p)| p).collect())
}

/// First `limit` snapshots of `dir` in sweep order.
pub fn collect_snapshot_frames(dir: &Path, limit: usize) -> Result<Vec<RgbaImage>> {
    let paths = list_snapshots(dir)?;
    if paths.len() < limit {
        return Err(IsingError::MissingFrames { found: paths.len(), expected: limit });
    }
    paths
        .iter()
        .take(limit)
        .map(|p| -> Result<RgbaImage> { Ok(image::open(p)?.to_rgba8()) })
        .collect()
}

/// GIF with a fixed per-frame delay that loops forever. The trailer is
/// written before returning; the caller flushes `writer`.
pub fn encode_animation<W: Write>(
    writer: &mut W,
    frames: Vec<RgbaImage>,
    delay_ms: u32,
) -> Result<()> {
    let n_frames = frames.len();
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    for img in frames {
        let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame)?;
    }
    drop(encoder);
    info!(frames = n_frames, delay_ms, "animation encoded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_zero_is_bottom() {
        // 2×2 with only site 0 (row 0, col 0) up
        let l = SpinLattice::from_spins(2, vec![1, -1, -1, -1]).unwrap();
        let img = render_lattice(&l, 3);
        assert_eq!(img.dimensions(), (6, 6));
        assert_eq!(*img.get_pixel(0, 5), UP_COLOR);
        assert_eq!(*img.get_pixel(0, 0), DOWN_COLOR);
        assert_eq!(*img.get_pixel(5, 5), DOWN_COLOR);
    }

    #[test]
    fn parses_snapshot_names() {
        assert_eq!(snapshot_index(Path::new("a/lattice_step_12.png")), Some(12));
        assert_eq!(snapshot_index(Path::new("lattice_step_0.png")), Some(0));
        assert_eq!(snapshot_index(Path::new("lattice_step_x.png")), None);
        assert_eq!(snapshot_index(Path::new("lattice_step_3.gif")), None);
    }
}
