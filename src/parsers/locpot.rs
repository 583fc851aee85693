//! # VASP LOCPOT 解析器
//!
//! 文件结构：POSCAR 头部与坐标，空行，网格维度 `NGX NGY NGZ`，
//! 随后是 NGX*NGY*NGZ 个数值（x 最快）。自旋极化时后面还有第二个数据块，这里只读第一个。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/workfunc.rs` 使用
//! - 复用 `parsers/poscar.rs`，构造 `models/volumetric.rs`

use super::poscar::parse_poscar_lines;
use crate::error::{Result, VtoolsError};
use crate::models::volumetric::VolumetricData;

use std::fs;
use std::path::Path;

const FORMAT: &str = "locpot";

pub fn parse_locpot_content(content: &str, source: &str) -> Result<VolumetricData> {
    let lines: Vec<&str> = content.lines().collect();
    let (structure, mut idx) = parse_poscar_lines(&lines, source)?;

    while lines.get(idx).is_some_and(|l| l.trim().is_empty()) {
        idx += 1;
    }

    let grid: Vec<usize> = lines
        .get(idx)
        .and_then(|l| {
            l.split_whitespace()
                .map(|s| s.parse().ok())
                .collect::<Option<Vec<usize>>>()
        })
        .filter(|g| g.len() == 3 && g.iter().all(|&n| n > 0))
        .ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Invalid grid dimensions at line {}", idx + 1),
            )
        })?;
    let grid = [grid[0], grid[1], grid[2]];
    let total = grid[0] * grid[1] * grid[2];

    let mut data = Vec::with_capacity(total);
    'outer: for line in &lines[idx + 1..] {
        for token in line.split_whitespace() {
            if data.len() == total {
                break 'outer;
            }
            let value: f64 = token.parse().map_err(|_| {
                VtoolsError::parse(FORMAT, source, format!("Invalid grid value '{}'", token))
            })?;
            data.push(value);
        }
    }

    if data.len() != total {
        return Err(VtoolsError::parse(
            FORMAT,
            source,
            format!("Expected {} grid values, found {}", total, data.len()),
        ));
    }

    Ok(VolumetricData {
        structure,
        grid,
        data,
    })
}

pub fn parse_locpot_file(path: &Path) -> Result<VolumetricData> {
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_locpot_content(&content, &path.display().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 2x2x3 网格，数值等于 z 方向的网格序号
    pub(crate) const SAMPLE: &str = "slab
1.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 6.0
H
1
Direct
0.0 0.0 0.5

    2    2    3
 0.0 0.0 0.0 0.0 1.0
 1.0 1.0 1.0 2.0 2.0
 2.0 2.0
";

    #[test]
    fn test_parse_grid() {
        let data = parse_locpot_content(SAMPLE, "LOCPOT").unwrap();
        assert_eq!(data.grid, [2, 2, 3]);
        assert_eq!(data.data.len(), 12);
        assert_eq!(data.get(1, 1, 0), 0.0);
        assert_eq!(data.get(0, 1, 2), 2.0);
        assert_eq!(data.structure.len(), 1);
    }

    #[test]
    fn test_short_grid_is_error() {
        let text = SAMPLE.trim_end().rsplit_once('\n').unwrap().0;
        let err = parse_locpot_content(text, "LOCPOT").unwrap_err();
        assert!(matches!(err, VtoolsError::ParseError { .. }));
    }
}
