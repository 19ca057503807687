//! Snapshot files on disk and GIF encoding.

use ising_t0::ensemble::Ensemble;
use ising_t0::lattice::{SpinLattice, SPIN_DOWN, SPIN_UP};
use ising_t0::observer::SweepObserver;
use ising_t0::render::{
    collect_snapshot_frames, encode_animation, list_snapshots, render_lattice, save_snapshot,
    snapshot_path, SnapshotWriter, DEFAULT_FRAME_DELAY_MS, DOWN_COLOR, UP_COLOR,
};
use ising_t0::topology::NeighborTable;
use ising_t0::{IsingError, SeedPolicy, SimConfig};
use std::fs;
use tempfile::tempdir;

/// Up at sweep 1, down at sweep 2, checkerboard at sweep 10.
fn write_three_snapshots(dir: &std::path::Path) {
    save_snapshot(&SpinLattice::checkerboard(4), 1, &snapshot_path(dir, 10)).unwrap();
    save_snapshot(&SpinLattice::polarized(4, SPIN_DOWN), 1, &snapshot_path(dir, 2)).unwrap();
    save_snapshot(&SpinLattice::polarized(4, SPIN_UP), 1, &snapshot_path(dir, 1)).unwrap();
}

#[test]
fn test_snapshots_sorted_by_sweep_number() {
    let dir = tempdir().unwrap();
    write_three_snapshots(dir.path());
    fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

    let names: Vec<String> = list_snapshots(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["lattice_step_1.png", "lattice_step_2.png", "lattice_step_10.png"]);

    let frames = collect_snapshot_frames(dir.path(), 3).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(*frames[0].get_pixel(0, 0), UP_COLOR);
    assert_eq!(*frames[1].get_pixel(0, 0), DOWN_COLOR);
    assert_eq!(frames[2], render_lattice(&SpinLattice::checkerboard(4), 1));

    // A smaller limit keeps the earliest sweeps
    let first = collect_snapshot_frames(dir.path(), 1).unwrap();
    assert_eq!(*first[0].get_pixel(3, 3), UP_COLOR);
}

#[test]
fn test_too_few_snapshots_is_an_error() {
    let dir = tempdir().unwrap();
    write_three_snapshots(dir.path());
    let err = collect_snapshot_frames(dir.path(), 4).unwrap_err();
    assert!(matches!(err, IsingError::MissingFrames { found: 3, expected: 4 }));
}

#[test]
fn test_writer_saves_every_sweep() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    let ensemble = Ensemble::new(SimConfig::new(4, 5, 1)).unwrap();

    let mut writer = SnapshotWriter::new(&frames, 2).unwrap();
    ensemble.run_single(SeedPolicy::Fixed(11), &mut writer).unwrap();
    assert_eq!(writer.finish().unwrap(), 6);

    let paths = list_snapshots(&frames).unwrap();
    assert_eq!(paths.len(), 6);
    assert_eq!(paths[0], snapshot_path(&frames, 0));
    assert_eq!(paths[5], snapshot_path(&frames, 5));
    assert_eq!(collect_snapshot_frames(&frames, 6).unwrap()[0].dimensions(), (8, 8));
}

#[test]
fn test_writer_reports_first_failure() {
    let dir = tempdir().unwrap();
    let frames = dir.path().join("frames");
    let mut writer = SnapshotWriter::new(&frames, 1).unwrap();
    fs::remove_dir_all(&frames).unwrap();

    let table = NeighborTable::new(2);
    let lattice = SpinLattice::checkerboard(2);
    writer.on_sweep(0, &lattice, &table);
    writer.on_sweep(1, &lattice, &table);
    assert!(writer.finish().is_err());
    assert!(!frames.exists());
}

#[test]
fn test_zero_scale_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("final.png");
    let err = save_snapshot(&SpinLattice::checkerboard(2), 0, &path).unwrap_err();
    assert!(matches!(err, IsingError::InvalidConfig(_)));
    assert!(!path.exists());

    let err = SnapshotWriter::new(dir.path(), 0).err().unwrap();
    assert!(matches!(err, IsingError::InvalidConfig(_)));
}

#[test]
fn test_animation_loops_with_frame_delay() {
    let frames = vec![
        render_lattice(&SpinLattice::checkerboard(4), 2),
        render_lattice(&SpinLattice::polarized(4, SPIN_UP), 2),
    ];
    let mut buf = Vec::new();
    encode_animation(&mut buf, frames, DEFAULT_FRAME_DELAY_MS).unwrap();

    assert!(buf.starts_with(b"GIF89a"));
    assert_eq!(*buf.last().unwrap(), 0x3B, "missing GIF trailer");

    // Application extension with loop count 0 (forever)
    let netscape = b"NETSCAPE2.0";
    let at = buf
        .windows(netscape.len())
        .position(|w| w == netscape)
        .expect("no NETSCAPE2.0 loop block");
    assert_eq!(&buf[at + netscape.len()..at + netscape.len() + 4], &[0x03, 0x01, 0x00, 0x00]);

    // Every graphic control extension carries 10 centiseconds
    let delays: Vec<u16> = buf
        .windows(6)
        .filter(|w| w[0] == 0x21 && w[1] == 0xF9 && w[2] == 0x04)
        .map(|w| u16::from_le_bytes([w[4], w[5]]))
        .collect();
    assert_eq!(delays, vec![10, 10]);
}
