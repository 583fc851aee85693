//! # convert 命令实现
//!
//! 批量转换结构文件格式。
//!
//! ## 功能
//! - 文件和目录混合输入，目录按 glob 模式筛选
//! - 输出 POSCAR (Direct)、extended XYZ 或 CIF
//! - 输出名为 `{stem}.{ext}`（与输入同目录），或 `{prefix}_{NN}.{ext}`
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `parsers/`, `utils/collector.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::convert::{ConvertArgs, InputFormat, OutputFormat};
use crate::error::{Result, VtoolsError};
use crate::models::Crystal;
use crate::parsers::{self, cif, poscar, xyz};
use crate::utils::collector::FileCollector;
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting to {} format", args.output_format));

    let files = FileCollector::new(&args.pattern)?
        .recursive(args.recursive)
        .collect(&args.inputs)?;

    if files.is_empty() {
        output::print_warning(&format!("No files matched '{}'", args.pattern));
        return Ok(());
    }

    output::print_info(&format!("Found {} files to convert", files.len()));

    let pb = progress::create_progress_bar(files.len() as u64, "Converting");
    let mut success = 0usize;

    for (ii, input) in files.iter().enumerate() {
        let target = output_path(input, args.prefix.as_deref(), ii, args.output_format);
        match convert_one(input, &target, args.input_format, args.output_format) {
            Ok(()) => {
                success += 1;
                pb.suspend(|| {
                    output::print_conversion(
                        &input.display().to_string(),
                        &target.display().to_string(),
                    )
                });
            }
            Err(e) => {
                pb.suspend(|| output::print_error(&format!("{}: {}", input.display(), e)));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    output::print_done(&format!(
        "Converted {}/{} file(s) to '{}'",
        success,
        files.len(),
        args.output_format
    ));

    if success < files.len() {
        return Err(VtoolsError::Other(format!(
            "{} file(s) failed to convert",
            files.len() - success
        )));
    }
    Ok(())
}

/// 输出文件名
fn output_path(input: &Path, prefix: Option<&str>, index: usize, format: OutputFormat) -> PathBuf {
    match prefix {
        Some(prefix) => PathBuf::from(format!("{}_{:02}.{}", prefix, index, format.extension())),
        None => input.with_extension(format.extension()),
    }
}

fn read_structure(path: &Path, format: Option<InputFormat>) -> Result<Crystal> {
    match format {
        Some(InputFormat::Vasp) => poscar::parse_poscar_file(path),
        Some(InputFormat::Xyz) => xyz::parse_xyz_file(path),
        None => parsers::parse_structure_file(path),
    }
}

fn convert_one(
    input: &Path,
    target: &Path,
    input_format: Option<InputFormat>,
    output_format: OutputFormat,
) -> Result<()> {
    let crystal = read_structure(input, input_format)?;

    // 无晶格的 XYZ 不能写成周期性格式
    if output_format != OutputFormat::Xyz && crystal.lattice.inverse().is_none() {
        return Err(VtoolsError::config(format!(
            "{} has no lattice; cannot write {}",
            input.display(),
            output_format
        )));
    }

    let content = match output_format {
        OutputFormat::Vasp => poscar::to_poscar_string(&crystal, poscar::CoordinateMode::Direct),
        OutputFormat::Xyz => xyz::to_xyz_string(&crystal),
        OutputFormat::Cif => cif::to_cif_string(&crystal),
    };

    fs::write(target, content).map_err(|e| VtoolsError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        let input = Path::new("run/CONTCAR");
        assert_eq!(
            output_path(input, None, 0, OutputFormat::Xyz),
            PathBuf::from("run/CONTCAR.xyz")
        );
        assert_eq!(
            output_path(Path::new("a/b.xyz"), None, 3, OutputFormat::Vasp),
            PathBuf::from("a/b.vasp")
        );
        assert_eq!(
            output_path(input, Some("img"), 7, OutputFormat::Cif),
            PathBuf::from("img_07.cif")
        );
    }

    #[test]
    fn test_xyz_without_lattice_cannot_become_poscar() {
        let dir = std::env::temp_dir().join(format!("vtools_convert_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("h2.xyz");
        fs::write(&input, "2\nH2\nH 0 0 0\nH 0 0 0.74\n").unwrap();

        let err = convert_one(&input, &dir.join("h2.vasp"), None, OutputFormat::Vasp).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
        convert_one(&input, &dir.join("copy.xyz"), None, OutputFormat::Xyz).unwrap();
        assert!(dir.join("copy.xyz").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
