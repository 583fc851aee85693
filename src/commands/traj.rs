//! # traj 命令实现
//!
//! 读取 XDATCAR（或一组单帧结构文件），导出为多帧 xyz、pdb 或 axsf。
//!
//! ## 依赖关系
//! - 使用 `cli/traj.rs` 定义的参数
//! - 使用 `parsers/{xdatcar, xyz, pdb, axsf}.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::traj::{TrajArgs, TrajFormat};
use crate::error::{Result, VtoolsError};
use crate::models::Crystal;
use crate::parsers::{self, axsf, pdb, xdatcar, xyz};
use crate::utils::{output, progress};

use std::fs;
use std::path::PathBuf;

fn read_snapshots(paths: &[PathBuf]) -> Result<Vec<Crystal>> {
    let pb = progress::create_progress_bar(paths.len() as u64, "Reading snapshots");
    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        pb.set_message(path.display().to_string());
        frames.push(parsers::parse_structure_file(path)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(frames)
}

/// 按格式生成轨迹文本
pub fn render(frames: &[Crystal], format: TrajFormat) -> String {
    match format {
        TrajFormat::Xyz => xyz::to_xyz_trajectory(frames),
        TrajFormat::Pdb => pdb::to_pdb_string(frames),
        TrajFormat::Axsf => axsf::to_axsf_string(frames),
    }
}

/// 执行 traj 命令
pub fn execute(args: TrajArgs) -> Result<()> {
    output::print_header("Exporting trajectory");

    let frames = if args.snapshots.is_empty() {
        if !args.input.exists() {
            return Err(VtoolsError::FileNotFound {
                path: args.input.display().to_string(),
            });
        }
        xdatcar::parse_xdatcar_file(&args.input)?
    } else {
        read_snapshots(&args.snapshots)?
    };

    let natoms = frames.first().map_or(0, Crystal::len);
    if let Some(bad) = frames.iter().position(|f| f.len() != natoms) {
        output::print_warning(&format!(
            "Frame {} has {} atoms, the first frame has {}",
            bad + 1,
            frames[bad].len(),
            natoms
        ));
    }
    output::print_info(&format!("{} frames, {} atoms", frames.len(), natoms));

    let output_path = PathBuf::from(format!("{}.{}", args.output, args.format.extension()));
    fs::write(&output_path, render(&frames, args.format)).map_err(|e| {
        VtoolsError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        }
    })?;

    output::print_success(&format!("Trajectory written to '{}'", output_path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_render_formats() {
        let lattice = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]);
        let frame = Crystal::new("H", lattice, vec![Atom::new("H", [0.0; 3])]);
        let frames = vec![frame.clone(), frame];

        assert!(render(&frames, TrajFormat::Axsf).starts_with("ANIMSTEPS 2"));
        assert_eq!(render(&frames, TrajFormat::Pdb).matches("ENDMDL").count(), 2);
        assert_eq!(render(&frames, TrajFormat::Xyz).lines().count(), 6);
    }
}
