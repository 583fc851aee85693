//! # VASP POSCAR 格式解析器
//!
//! 解析与写出 VASP POSCAR/CONTCAR 文件。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (负数表示目标体积)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1 [T T T]       # atom positions
//! ...
//!                        # optional blank line + velocity block (Å/fs)
//! ```
//!
//! 头部（注释、缩放、晶格、元素和数目）的解析函数也供 XDATCAR、LOCPOT 解析器复用。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`、`parsers/xdatcar.rs`、`parsers/locpot.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, VtoolsError};
use crate::models::element;
use crate::models::structure::{Atom, Crystal, Lattice, Vec3};

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const FORMAT: &str = "poscar";

/// 写出坐标的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    #[default]
    Direct,
    Cartesian,
}

/// POSCAR 头部：注释、晶格（已乘缩放因子）与 (元素, 数目) 列表
#[derive(Debug, Clone)]
pub(crate) struct PoscarHeader {
    pub name: String,
    pub lattice: Lattice,
    /// 笛卡尔坐标需要乘的缩放因子（负缩放时由目标体积换算）
    pub scale: f64,
    pub species: Vec<(String, usize)>,
    /// 头部之后的第一行
    pub next: usize,
}

impl PoscarHeader {
    pub fn natoms(&self) -> usize {
        self.species.iter().map(|(_, n)| n).sum()
    }

    /// 每个原子的元素符号
    pub fn symbols(&self) -> Vec<String> {
        self.species
            .iter()
            .flat_map(|(el, n)| std::iter::repeat(el.clone()).take(*n))
            .collect()
    }
}

fn parse_floats(line: &str, n: usize) -> Option<Vec<f64>> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(n)
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    (values.len() == n).then_some(values)
}

/// 去掉 POTCAR 后缀，如 "Fe_pv" -> "Fe"、"O/3a1b" -> "O"
fn clean_symbol(token: &str) -> String {
    token
        .split(['_', '/'])
        .next()
        .unwrap_or(token)
        .to_string()
}

/// 解析从 `start` 行开始的 POSCAR 头部
pub(crate) fn parse_header(lines: &[&str], start: usize, source: &str) -> Result<PoscarHeader> {
    let line = |i: usize| {
        lines
            .get(start + i)
            .copied()
            .ok_or_else(|| VtoolsError::parse(FORMAT, source, "Unexpected end of file in header"))
    };

    let name = line(0)?.trim().to_string();

    let raw_scale: f64 = line(1)?
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            VtoolsError::parse(FORMAT, source, format!("Invalid scaling factor at line {}", start + 2))
        })?;

    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let v = parse_floats(line(2 + i)?, 3).ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Invalid lattice vector at line {}", start + 3 + i),
            )
        })?;
        *row = [v[0], v[1], v[2]];
    }

    // 负缩放因子表示目标体积
    let scale = if raw_scale < 0.0 {
        let volume = Lattice::from_vectors(matrix).volume().abs();
        if volume < 1e-12 {
            return Err(VtoolsError::parse(FORMAT, source, "Degenerate lattice"));
        }
        (raw_scale.abs() / volume).cbrt()
    } else {
        raw_scale
    };
    for row in matrix.iter_mut() {
        for x in row.iter_mut() {
            *x *= scale;
        }
    }

    // VASP 5 有元素行，VASP 4 没有
    let tokens: Vec<&str> = line(5)?.split_whitespace().collect();
    let vasp4 = tokens
        .first()
        .map(|t| t.parse::<usize>().is_ok())
        .unwrap_or(false);

    let (symbols, count_line, next) = if vasp4 {
        (None, line(5)?, 6)
    } else {
        let symbols: Vec<String> = tokens.iter().map(|t| clean_symbol(t)).collect();
        (Some(symbols), line(6)?, 7)
    };

    let counts: Vec<usize> = count_line
        .split_whitespace()
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()
        .ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Invalid atom counts at line {}", start + next),
            )
        })?;

    let symbols = match symbols {
        Some(symbols) => symbols,
        None => {
            // VASP 4：尝试从注释行读取元素
            let from_comment: Vec<String> =
                name.split_whitespace().map(clean_symbol).collect();
            if from_comment.len() >= counts.len()
                && from_comment[..counts.len()]
                    .iter()
                    .all(|s| element::lookup(s).is_some())
            {
                from_comment[..counts.len()].to_vec()
            } else {
                (0..counts.len()).map(|i| format!("X{}", i + 1)).collect()
            }
        }
    };

    if symbols.len() != counts.len() {
        return Err(VtoolsError::parse(
            FORMAT,
            source,
            format!(
                "{} element symbols but {} atom counts",
                symbols.len(),
                counts.len()
            ),
        ));
    }

    Ok(PoscarHeader {
        name,
        lattice: Lattice::from_vectors(matrix),
        scale,
        species: symbols.into_iter().zip(counts).collect(),
        next: start + next,
    })
}

fn parse_flag(token: &str) -> Option<bool> {
    match token.chars().next() {
        Some('T') | Some('t') => Some(true),
        Some('F') | Some('f') => Some(false),
        _ => None,
    }
}

/// 解析头部与原子坐标，返回结构和坐标块之后的行号（不读速度）
pub(crate) fn parse_poscar_lines(lines: &[&str], source: &str) -> Result<(Crystal, usize)> {
    let header = parse_header(lines, 0, source)?;
    let mut idx = header.next;

    let next_line = |i: usize| {
        lines.get(i).copied().ok_or_else(|| {
            VtoolsError::parse(FORMAT, source, "Missing coordinate type line")
        })
    };

    let mut selective = false;
    if next_line(idx)?.trim_start().starts_with(['S', 's']) {
        selective = true;
        idx += 1;
    }

    let cartesian = next_line(idx)?.trim_start().starts_with(['C', 'c', 'K', 'k']);
    idx += 1;

    let natoms = header.natoms();
    let symbols = header.symbols();
    let mut atoms = Vec::with_capacity(natoms);

    for (i, symbol) in symbols.into_iter().enumerate() {
        let line = lines.get(idx + i).ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Expected {} atomic positions, found {}", natoms, i),
            )
        })?;

        let v = parse_floats(line, 3).ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Invalid atomic position at line {}", idx + i + 1),
            )
        })?;
        let raw = [v[0], v[1], v[2]];
        let position = if cartesian {
            [raw[0] * header.scale, raw[1] * header.scale, raw[2] * header.scale]
        } else {
            header.lattice.frac_to_cart(raw)
        };

        let mut atom = Atom::new(symbol, position);
        if selective {
            let flags: Vec<bool> = line
                .split_whitespace()
                .skip(3)
                .take(3)
                .filter_map(parse_flag)
                .collect();
            if flags.len() == 3 {
                atom = atom.with_selective([flags[0], flags[1], flags[2]]);
            }
        }
        atoms.push(atom);
    }

    let crystal = Crystal::new(header.name, header.lattice, atoms);
    Ok((crystal, idx + natoms))
}

/// 坐标块之后可选的速度块；格式不完整时忽略
fn parse_velocities(lines: &[&str], mut idx: usize, crystal: &Crystal) -> Option<Vec<Vec3>> {
    while lines.get(idx)?.trim().is_empty() {
        idx += 1;
    }

    let mut direct = false;
    let first = lines.get(idx)?.trim_start();
    if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
        direct = first.starts_with(['D', 'd']);
        idx += 1;
    }

    let velocities: Vec<Vec3> = (0..crystal.len())
        .map(|i| {
            let v = parse_floats(lines.get(idx + i)?, 3)?;
            Some([v[0], v[1], v[2]])
        })
        .collect::<Option<_>>()?;

    if direct {
        Some(
            velocities
                .into_iter()
                .map(|v| crystal.lattice.frac_to_cart(v))
                .collect(),
        )
    } else {
        Some(velocities)
    }
}

/// 从字符串内容解析 POSCAR
pub fn parse_poscar_content(content: &str, source: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();
    let (mut crystal, next) = parse_poscar_lines(&lines, source)?;

    if let Some(velocities) = parse_velocities(&lines, next, &crystal) {
        crystal.atoms = std::mem::take(&mut crystal.atoms)
            .into_iter()
            .zip(velocities)
            .map(|(atom, v)| atom.with_velocity(v))
            .collect();
    }

    if crystal.name.is_empty() {
        crystal.name = source.to_string();
    }
    Ok(crystal)
}

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(&content, &path.display().to_string())
}

/// 连续相同元素合并为一组，保持原子顺序
fn species_runs(crystal: &Crystal) -> Vec<(&str, usize)> {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    for atom in &crystal.atoms {
        match runs.last_mut() {
            Some((el, n)) if *el == atom.element => *n += 1,
            _ => runs.push((atom.element.as_str(), 1)),
        }
    }
    runs
}

/// 将 Crystal 转换为 VASP 5 格式的 POSCAR 字符串
///
/// 任一原子带有选择性动力学标记时写出 `Selective dynamics`（未标记的原子写 T T T）；
/// 任一原子带有速度时在末尾追加速度块。
pub fn to_poscar_string(crystal: &Crystal, mode: CoordinateMode) -> String {
    let mut result = String::new();

    let _ = writeln!(result, "{}", crystal.name);
    let _ = writeln!(result, "{:19.14}", 1.0);

    for row in &crystal.lattice.matrix {
        let _ = writeln!(result, " {:21.16} {:21.16} {:21.16}", row[0], row[1], row[2]);
    }

    let runs = species_runs(crystal);
    let symbols: Vec<String> = runs.iter().map(|(el, _)| format!("{:>3}", el)).collect();
    let counts: Vec<String> = runs.iter().map(|(_, n)| format!("{:>3}", n)).collect();
    let _ = writeln!(result, "  {}", symbols.join("  "));
    let _ = writeln!(result, "  {}", counts.join("  "));

    let selective = crystal.has_selective();
    if selective {
        result.push_str("Selective dynamics\n");
    }

    match mode {
        CoordinateMode::Direct => result.push_str("Direct\n"),
        CoordinateMode::Cartesian => result.push_str("Cartesian\n"),
    }

    for atom in &crystal.atoms {
        let p = match mode {
            CoordinateMode::Direct => crystal.lattice.cart_to_frac(atom.position),
            CoordinateMode::Cartesian => atom.position,
        };
        let _ = write!(result, " {:19.16} {:19.16} {:19.16}", p[0], p[1], p[2]);

        if selective {
            let flags = atom.selective.unwrap_or([true; 3]);
            for f in flags {
                result.push_str(if f { "   T" } else { "   F" });
            }
        }
        result.push('\n');
    }

    if crystal.has_velocities() {
        result.push('\n');
        for atom in &crystal.atoms {
            let v = atom.velocity.unwrap_or([0.0; 3]);
            let _ = writeln!(result, "{:20.16}{:20.16}{:20.16}", v[0], v[1], v[2]);
        }
    }

    result
}

/// 写出 POSCAR 文件
pub fn write_poscar(crystal: &Crystal, path: &Path, mode: CoordinateMode) -> Result<()> {
    fs::write(path, to_poscar_string(crystal, mode)).map_err(|e| VtoolsError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
