//! # 吸附分子的添加与删除
//!
//! 把分子放到 slab 的某个原子上方，或按序号删除原子，然后重新处理真空层。
//!
//! 放置步骤：分子在 slab 晶胞内居中 -> 依次绕坐标轴转动 ->
//! 平移使分子的参考原子与 slab 的吸附位点重合 -> 加上面内偏移和高度。
//!
//! ## 依赖关系
//! - 被 `commands/molecule.rs` 调用
//! - 使用 `models/structure.rs`

use crate::error::{Result, VtoolsError};
use crate::models::structure::{sub, Atom, Axis, Crystal, Lattice};

/// 内置小分子的坐标 (Å)，取自 G2 分子集
#[rustfmt::skip]
const MOLECULES: &[(&str, &[(&str, [f64; 3])])] = &[
    ("H2", &[("H", [0.0, 0.0, 0.368583]), ("H", [0.0, 0.0, -0.368583])]),
    ("N2", &[("N", [0.0, 0.0, 0.56499]), ("N", [0.0, 0.0, -0.56499])]),
    ("O2", &[("O", [0.0, 0.0, 0.622978]), ("O", [0.0, 0.0, -0.622978])]),
    ("CO", &[("O", [0.0, 0.0, 0.493003]), ("C", [0.0, 0.0, -0.657337])]),
    ("OH", &[("O", [0.0, 0.0, 0.108786]), ("H", [0.0, 0.0, -0.870284])]),
    ("H2O", &[
        ("O", [0.0, 0.0, 0.119262]),
        ("H", [0.0, 0.763239, -0.477047]),
        ("H", [0.0, -0.763239, -0.477047]),
    ]),
    ("CO2", &[
        ("C", [0.0, 0.0, 0.0]),
        ("O", [0.0, 0.0, 1.178658]),
        ("O", [0.0, 0.0, -1.178658]),
    ]),
    ("NH3", &[
        ("N", [0.0, 0.0, 0.116489]),
        ("H", [0.0, 0.939731, -0.271808]),
        ("H", [0.813831, -0.469865, -0.271808]),
        ("H", [-0.813831, -0.469865, -0.271808]),
    ]),
    ("CH4", &[
        ("C", [0.0, 0.0, 0.0]),
        ("H", [0.629118, 0.629118, 0.629118]),
        ("H", [-0.629118, -0.629118, 0.629118]),
        ("H", [0.629118, -0.629118, -0.629118]),
        ("H", [-0.629118, 0.629118, -0.629118]),
    ]),
];

/// 内置分子名称
pub fn molecule_names() -> Vec<&'static str> {
    MOLECULES.iter().map(|(name, _)| *name).collect()
}

/// 按名称取内置分子（大小写不敏感），晶格为零
pub fn builtin_molecule(name: &str) -> Option<Crystal> {
    MOLECULES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(n, atoms)| {
            Crystal::new(
                *n,
                Lattice::from_vectors([[0.0; 3]; 3]),
                atoms.iter().map(|(el, p)| Atom::new(*el, *p)).collect(),
            )
        })
}

/// 解析 `z90`、`x-45` 这样的转动参数；省略轴名时绕 z 轴
pub fn parse_rotation(token: &str) -> Result<(Axis, f64)> {
    let token = token.trim();
    let (axis, angle) = match token.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('x') => (Axis::X, &token[1..]),
        Some('y') => (Axis::Y, &token[1..]),
        Some('z') => (Axis::Z, &token[1..]),
        _ => (Axis::Z, token),
    };
    let angle: f64 = angle.parse().map_err(|_| {
        VtoolsError::config(format!(
            "Invalid rotation '{}': expected e.g. z90 or x-45",
            token
        ))
    })?;
    Ok((axis, angle))
}

/// 吸附位点
#[derive(Debug, Clone)]
pub struct AdsorptionSite {
    /// slab 中的吸附原子（从 0 开始）
    pub atom_index: usize,
    /// 分子中放在吸附原子上方的原子（从 0 开始）
    pub mol_index: usize,
    /// 面内偏移 (Å)
    pub offset: [f64; 2],
    /// 沿 z 的高度 (Å)
    pub height: f64,
}

/// 把分子放到 slab 上，返回 slab 原子在前、分子原子在后的新结构
pub fn place_molecule(
    slab: &Crystal,
    molecule: &Crystal,
    rotations: &[(Axis, f64)],
    site: &AdsorptionSite,
) -> Result<Crystal> {
    let anchor = slab.atoms.get(site.atom_index).ok_or_else(|| {
        VtoolsError::config(format!(
            "Atom index {} out of range: slab has {} atoms",
            site.atom_index,
            slab.len()
        ))
    })?;
    if site.mol_index >= molecule.len() {
        return Err(VtoolsError::config(format!(
            "Molecule index {} out of range: molecule has {} atoms",
            site.mol_index,
            molecule.len()
        )));
    }

    let mut mol = Crystal::new(molecule.name.clone(), slab.lattice.clone(), molecule.atoms.clone());
    mol.center(None, &Axis::ALL);
    // 晶胞被补全过，放回 slab 的晶格
    mol.lattice = slab.lattice.clone();

    for &(axis, angle) in rotations {
        mol.rotate(axis, angle);
    }

    let shift = sub(anchor.position, mol.atoms[site.mol_index].position);
    mol.translate(shift);
    mol.translate([site.offset[0], site.offset[1], site.height]);

    let mut combined = slab.clone();
    combined.extend(&mol);
    Ok(combined)
}

/// 删除给定的原子（序号从 1 开始），其余原子保持原顺序
pub fn delete_atoms(crystal: &Crystal, one_based: &[usize]) -> Result<Crystal> {
    if let Some(&bad) = one_based.iter().find(|&&i| i == 0 || i > crystal.len()) {
        return Err(VtoolsError::config(format!(
            "Atom index {} out of range: expected 1..={}",
            bad,
            crystal.len()
        )));
    }
    let kept: Vec<usize> = (0..crystal.len())
        .filter(|i| !one_based.contains(&(i + 1)))
        .collect();
    Ok(crystal.select(&kept))
}

/// 重新设置真空层
///
/// 给定总真空厚度时在 `axes` 两侧各留一半；否则只沿 z 居中，晶格不变。
pub fn apply_vacuum(crystal: &mut Crystal, vacuum: Option<f64>, axes: &[Axis]) {
    match vacuum {
        Some(v) if v > 0.0 => crystal.center(Some(v / 2.0), axes),
        _ => crystal.center(None, &[Axis::Z]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab() -> Crystal {
        let lattice = Lattice::from_vectors([[6.0, 0.0, 0.0], [0.0, 6.0, 0.0], [0.0, 0.0, 20.0]]);
        Crystal::new(
            "Cu slab",
            lattice,
            vec![Atom::new("Cu", [0.0, 0.0, 5.0]), Atom::new("Cu", [3.0, 3.0, 7.0])],
        )
    }

    #[test]
    fn test_builtin_molecules() {
        let water = builtin_molecule("h2o").unwrap();
        assert_eq!(water.symbols(), vec!["O", "H", "H"]);
        assert!(builtin_molecule("C60").is_none());
        assert!(molecule_names().contains(&"CO2"));
    }

    #[test]
    fn test_parse_rotation() {
        assert_eq!(parse_rotation("z90").unwrap(), (Axis::Z, 90.0));
        assert_eq!(parse_rotation("X-45").unwrap(), (Axis::X, -45.0));
        assert_eq!(parse_rotation("30").unwrap(), (Axis::Z, 30.0));
        assert!(parse_rotation("q10").is_err());
    }

    #[test]
    fn test_place_on_top_site() {
        let co = builtin_molecule("CO").unwrap();
        let site = AdsorptionSite {
            atom_index: 1,
            mol_index: 1,
            offset: [0.5, 0.0],
            height: 1.8,
        };
        // 绕 x 转 180 度使 C 朝上，然后 C 放在 Cu 上方
        let combined = place_molecule(&slab(), &co, &[(Axis::X, 180.0)], &site).unwrap();

        assert_eq!(combined.symbols(), vec!["Cu", "Cu", "O", "C"]);
        let c = combined.atoms[3].position;
        assert!((c[0] - 3.5).abs() < 1e-9);
        assert!((c[1] - 3.0).abs() < 1e-9);
        assert!((c[2] - 8.8).abs() < 1e-9);
        // 转动后 O 在 C 下方
        assert!(combined.atoms[2].position[2] < c[2]);
        assert_eq!(combined.lattice.matrix, slab().lattice.matrix);
    }

    #[test]
    fn test_place_rejects_bad_index() {
        let co = builtin_molecule("CO").unwrap();
        let site = AdsorptionSite {
            atom_index: 5,
            mol_index: 0,
            offset: [0.0, 0.0],
            height: 1.0,
        };
        let err = place_molecule(&slab(), &co, &[], &site).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
    }

    #[test]
    fn test_delete_atoms_one_based() {
        let kept = delete_atoms(&slab(), &[1]).unwrap();
        assert_eq!(kept.len(), 1);
        assert!((kept.atoms[0].position[2] - 7.0).abs() < 1e-12);
        assert!(delete_atoms(&slab(), &[0]).is_err());
        assert!(delete_atoms(&slab(), &[3]).is_err());
    }

    #[test]
    fn test_apply_vacuum() {
        let mut s = slab();
        apply_vacuum(&mut s, Some(10.0), &[Axis::Z]);
        assert!((s.lattice.matrix[2][2] - 12.0).abs() < 1e-9);

        let mut s = slab();
        apply_vacuum(&mut s, None, &[Axis::Z]);
        assert!((s.lattice.matrix[2][2] - 20.0).abs() < 1e-9);
        assert!((s.atoms[0].position[2] - 9.0).abs() < 1e-9);
    }
}
