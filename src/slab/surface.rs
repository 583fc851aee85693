//! # 表面切割
//!
//! 按 Miller 指数 (h, k, l) 从体相晶胞切出表面 slab。
//!
//! ## 算法
//! 1. 用扩展欧几里得算法求整数表面基矢 c1、c2（面内）与 c3（面外），
//!    并在 c1 的选择上做一次优化，使 c1、c2 尽量正交
//! 2. 把所有原子表示到新基矢下并折回 [0, 1)
//! 3. 沿 c3 堆叠 `layers` 次
//! 4. 让第三个矢量垂直于表面，旋转到 a1 ∥ x、法向 ∥ z 的标准取向
//! 5. 面内分数坐标折回晶胞，面外矢量置零（非周期），由调用者加真空
//!
//! ## 依赖关系
//! - 被 `commands/slab.rs` 调用
//! - 使用 `models/structure.rs`，线性求解使用 `nalgebra`

use crate::error::{Result, VtoolsError};
use crate::models::structure::{cross, dot, norm, scale, Crystal, Lattice, Vec3};

use nalgebra::{Matrix3, Vector3};

/// 分数坐标折回时的容差
const WRAP_TOL: f64 = 1e-10;

/// 向下取整的取模（结果与除数同号）
fn floor_mod(a: i64, b: i64) -> i64 {
    ((a % b) + b) % b
}

/// 向下取整的整除
fn floor_div(a: i64, b: i64) -> i64 {
    (a - floor_mod(a, b)) / b
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// 扩展欧几里得算法：返回 (x, y) 使 a·x + b·y = gcd(a, b)
pub fn ext_gcd(a: i64, b: i64) -> (i64, i64) {
    if b == 0 {
        (1, 0)
    } else if a % b == 0 {
        (0, 1)
    } else {
        let (x, y) = ext_gcd(b, floor_mod(a, b));
        (y, x - y * floor_div(a, b))
    }
}

fn combine(c: [i64; 3], cell: &[[f64; 3]; 3]) -> Vec3 {
    let mut v = [0.0; 3];
    for (coef, row) in c.iter().zip(cell.iter()) {
        for k in 0..3 {
            v[k] += *coef as f64 * row[k];
        }
    }
    v
}

/// 求 Miller 指数对应的整数表面基矢 [c1, c2, c3]
pub fn surface_basis(lattice: &Lattice, hkl: [i64; 3]) -> Result<[[i64; 3]; 3]> {
    let [h, k, l] = hkl;
    if hkl == [0, 0, 0] {
        return Err(VtoolsError::config(
            "Miller indices (0 0 0) do not define a surface",
        ));
    }

    let zeros = hkl.iter().filter(|&&x| x == 0).count();
    if zeros == 2 {
        return Ok(if h != 0 {
            [[0, 1, 0], [0, 0, 1], [1, 0, 0]]
        } else if k != 0 {
            [[0, 0, 1], [1, 0, 0], [0, 1, 0]]
        } else {
            [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
        });
    }

    let (mut p, mut q) = ext_gcd(k, l);
    let [a1, a2, a3] = lattice.matrix;

    // dot(c1, c2) = k1 + i·k2，取使其最小的整数 i
    let lin = |ca: f64, va: Vec3, cb: f64, vb: Vec3| -> Vec3 {
        [
            ca * va[0] + cb * vb[0],
            ca * va[1] + cb * vb[1],
            ca * va[2] + cb * vb[2],
        ]
    };
    let (hf, kf, lf) = (h as f64, k as f64, l as f64);
    let u = lin(kf, a1, -hf, a2);
    let v = lin(lf, a1, -hf, a3);
    let w = lin(lf, a2, -kf, a3);

    let k1 = dot(lin(p as f64, u, q as f64, v), w);
    let k2 = dot(lin(lf, u, -kf, v), w);
    if k2.abs() > WRAP_TOL {
        let i = -(k1 / k2).round() as i64;
        p += i * l;
        q -= i * k;
    }

    let (a, b) = ext_gcd(p * k + q * l, h);
    let g = gcd(l, k);

    Ok([
        [p * k + q * l, -p * h, -q * h],
        [0, l / g, -k / g],
        [b, a * p, a * q],
    ])
}

/// 构造 slab；返回结构的第三个晶格矢量为零，需由 `Crystal::center` 补上真空
pub fn build_surface(bulk: &Crystal, hkl: [i64; 3], layers: usize) -> Result<Crystal> {
    if layers == 0 {
        return Err(VtoolsError::config("Number of slab layers must be positive"));
    }

    let basis = surface_basis(&bulk.lattice, hkl)?;

    // 在新基矢下的分数坐标：basisᵀ · x = s
    let basis_t = Matrix3::from_fn(|r, c| basis[c][r] as f64);
    let lu = basis_t.lu();

    let mut fracs = Vec::with_capacity(bulk.len());
    for s in bulk.scaled_positions() {
        let x = lu
            .solve(&Vector3::new(s[0], s[1], s[2]))
            .ok_or_else(|| VtoolsError::config("Surface basis is singular"))?;
        fracs.push([
            x[0] - (x[0] + WRAP_TOL).floor(),
            x[1] - (x[1] + WRAP_TOL).floor(),
            x[2] - (x[2] + WRAP_TOL).floor(),
        ]);
    }

    let cell = bulk.lattice.matrix;
    let new_cell = Lattice::from_vectors([
        combine(basis[0], &cell),
        combine(basis[1], &cell),
        combine(basis[2], &cell),
    ]);

    let mut surf = bulk.clone();
    for (atom, frac) in surf.atoms.iter_mut().zip(&fracs) {
        atom.position = new_cell.frac_to_cart(*frac);
    }
    surf.lattice = new_cell;

    let mut surf = surf.repeat([1, 1, layers]);

    // 第三个矢量投影到表面法向
    let [a1, a2, a3] = surf.lattice.matrix;
    let n = cross(a1, a2);
    let a3 = scale(n, dot(a3, n) / dot(n, n));
    surf.set_lattice(Lattice::from_vectors([a1, a2, a3]), false);

    // 旋转到标准取向
    let len1 = norm(a1);
    let proj = dot(a1, a2) / len1;
    let standard = Lattice::from_vectors([
        [len1, 0.0, 0.0],
        [proj, (dot(a2, a2) - proj * proj).max(0.0).sqrt(), 0.0],
        [0.0, 0.0, norm(a3)],
    ]);
    surf.set_lattice(standard, true);

    // 面内折回晶胞
    let scaled = surf.scaled_positions();
    for (atom, mut frac) in surf.atoms.iter_mut().zip(scaled) {
        frac[0] = frac[0].rem_euclid(1.0);
        frac[1] = frac[1].rem_euclid(1.0);
        atom.position = surf.lattice.frac_to_cart(frac);
    }

    surf.lattice.matrix[2] = [0.0; 3];
    surf.name = format!("{} ({}{}{})", bulk.name.trim(), hkl[0], hkl[1], hkl[2]);
    Ok(surf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::structure::{Atom, Axis};

    fn simple_cubic(a: f64) -> Crystal {
        let lattice = Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
        Crystal::new("Po", lattice, vec![Atom::new("Po", [0.0, 0.0, 0.0])])
    }

    fn fcc(a: f64) -> Crystal {
        let lattice = Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
        let h = a / 2.0;
        let atoms = vec![
            Atom::new("Cu", [0.0, 0.0, 0.0]),
            Atom::new("Cu", [h, h, 0.0]),
            Atom::new("Cu", [h, 0.0, h]),
            Atom::new("Cu", [0.0, h, h]),
        ];
        Crystal::new("Cu", lattice, atoms)
    }

    #[test]
    fn test_ext_gcd() {
        for (a, b) in [(3, 5), (12, 8), (1, 1), (-2, 3), (4, -6), (0, 1)] {
            let (x, y) = ext_gcd(a, b);
            assert_eq!((a * x + b * y).abs(), gcd(a, b), "a={} b={}", a, b);
        }
    }

    #[test]
    fn test_zero_indices_rejected() {
        let err = build_surface(&simple_cubic(3.0), [0, 0, 0], 3).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
    }

    #[test]
    fn test_cubic_001_stacks_layers() {
        let mut slab = build_surface(&simple_cubic(3.0), [0, 0, 1], 4).unwrap();
        assert_eq!(slab.len(), 4);
        assert_eq!(slab.lattice.matrix[2], [0.0; 3]);

        let mut z = slab.coordinates(Axis::Z);
        z.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (i, zi) in z.iter().enumerate() {
            assert!((zi - 3.0 * i as f64).abs() < 1e-9);
        }

        slab.center(Some(5.0), &[Axis::Z]);
        assert!((slab.lattice.matrix[2][2] - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_fcc_111_surface_cell() {
        let a = 3.6;
        let slab = build_surface(&fcc(a), [1, 1, 1], 3).unwrap();
        // 惯用晶胞的 (111) 面：每个重复单元是含 4 个原子的单层
        assert_eq!(slab.len(), 12);

        let [a1, a2, _] = slab.lattice.matrix;
        assert!(a1[1].abs() < 1e-12 && a1[2].abs() < 1e-12);
        assert!(a2[2].abs() < 1e-12);
        let area = norm(cross(a1, a2));
        assert!((area - 3f64.sqrt() * a * a).abs() < 1e-6);

        // 层间距 a/√3
        let mut z = slab.coordinates(Axis::Z);
        z.sort_by(|a, b| a.partial_cmp(b).unwrap());
        z.dedup_by(|x, y| (*x - *y).abs() < 1e-6);
        assert_eq!(z.len(), 3);
        assert!((z[1] - z[0] - a / 3f64.sqrt()).abs() < 1e-6);
    }
}
