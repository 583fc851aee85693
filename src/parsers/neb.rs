//! # VTST NEB 数据文件
//!
//! `nebbarrier.pl` 写出的 `neb.dat` 与 `nebspline.pl` 写出的 `spline.dat`
//! 都是空白分隔的数值列：第 0 列为像编号，第 1 列为反应坐标 (Å)，第 2 列为能量 (eV)。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/neb.rs` 使用

use crate::error::{Result, VtoolsError};

use std::fs;
use std::path::Path;

const FORMAT: &str = "neb";

/// 读取 (反应坐标, 能量) 序列，忽略空行和 `#` 注释
pub fn parse_mep_content(content: &str, source: &str) -> Result<Vec<(f64, f64)>> {
    let mut points = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        let value = |i: usize| cols.get(i).and_then(|s| s.parse::<f64>().ok());
        match (value(1), value(2)) {
            (Some(x), Some(e)) => points.push((x, e)),
            _ => {
                return Err(VtoolsError::parse(
                    FORMAT,
                    source,
                    format!("Line {} needs at least three numeric columns", lineno + 1),
                ))
            }
        }
    }

    if points.is_empty() {
        return Err(VtoolsError::parse(FORMAT, source, "No data points"));
    }
    Ok(points)
}

pub fn parse_mep_file(path: &Path) -> Result<Vec<(f64, f64)>> {
    if !path.exists() {
        return Err(VtoolsError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_mep_content(&content, &path.display().to_string())
}

/// 正向能垒：路径上的最高能量减去初态能量
pub fn forward_barrier(points: &[(f64, f64)]) -> Option<f64> {
    let (_, e0) = points.first()?;
    let top = points
        .iter()
        .map(|(_, e)| *e)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(top - e0)
}
