use crate::common::file::write_binary_file;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn compare_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A pair of small binaries differing at offset 1 only.
#[fixture]
pub fn byte_pair_dir(compare_dir: TempDir) -> TempDir {
    write_binary_file(compare_dir.path(), "a.bin", &[0x01, 0x02, 0x03]);
    write_binary_file(compare_dir.path(), "b.bin", &[0x01, 0xff, 0x03]);
    compare_dir
}

pub fn run_segdiff_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("segdiff").expect("Failed to find segdiff binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
