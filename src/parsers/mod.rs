//! # 解析器模块
//!
//! 结构文件（POSCAR、XYZ、XDATCAR）、VASP 输出（OUTCAR、LOCPOT）与 VTST 数据的读取，
//! 以及 POSCAR、XYZ、CIF、AXSF、PDB 的写出。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, xyz, xdatcar, outcar, locpot, neb, cif, axsf, pdb

pub mod axsf;
pub mod cif;
pub mod locpot;
pub mod neb;
pub mod outcar;
pub mod pdb;
pub mod poscar;
pub mod xdatcar;
pub mod xyz;

use crate::error::{Result, VtoolsError};
use crate::models::Crystal;
use std::path::Path;

/// 结构文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Poscar,
    Xyz,
}

/// 从文件名推断结构格式
///
/// `.xyz` 为 XYZ；`.vasp`、`POSCAR*`、`CONTCAR*` 以及无扩展名的文件按 POSCAR 读取。
pub fn detect_format(path: &Path) -> Option<StructureFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    match ext.as_deref() {
        Some("xyz") => return Some(StructureFormat::Xyz),
        Some("vasp") | None => return Some(StructureFormat::Poscar),
        _ => {}
    }

    // 可能是 POSCAR_1、CONTCAR.relax 之类
    let name = path.file_name()?.to_str()?.to_uppercase();
    if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
        Some(StructureFormat::Poscar)
    } else {
        None
    }
}

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    match detect_format(path) {
        Some(StructureFormat::Poscar) => poscar::parse_poscar_file(path),
        Some(StructureFormat::Xyz) => xyz::parse_xyz_file(path),
        None => Err(VtoolsError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("POSCAR")), Some(StructureFormat::Poscar));
        assert_eq!(detect_format(Path::new("run/CONTCAR.relax")), Some(StructureFormat::Poscar));
        assert_eq!(detect_format(Path::new("Cu.vasp")), Some(StructureFormat::Poscar));
        assert_eq!(detect_format(Path::new("h2o.XYZ")), Some(StructureFormat::Xyz));
        assert_eq!(detect_format(Path::new("bulk.cif")), None);
    }

    #[test]
    fn test_unknown_format_is_error() {
        let err = parse_structure_file(Path::new("bulk.cif")).unwrap_err();
        assert!(matches!(err, VtoolsError::UnsupportedFormat(_)));
    }
}
