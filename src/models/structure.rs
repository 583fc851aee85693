//! # 晶体结构数据模型
//!
//! 统一的原子结构表示，所有结构文件读写器都围绕 `Crystal` 工作。
//!
//! 与常见的分数坐标表示不同，这里的原子位置一律保存为笛卡尔坐标 (Å)，
//! 因为分层、排序、真空居中等操作都在笛卡尔空间中定义。
//! 每个原子同时携带元素、位置、选择性动力学标记和速度，
//! 因此各数组天然按原子索引对齐。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`slab/`、`dynamics/` 和 `commands/` 使用
//! - 使用 `nalgebra` 构造转动矩阵

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────
// 三维向量工具
// ─────────────────────────────────────────────────────────────

pub type Vec3 = [f64; 3];

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

// ─────────────────────────────────────────────────────────────
// 坐标轴
// ─────────────────────────────────────────────────────────────

/// 笛卡尔坐标轴 / 晶格矢量编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// 其余两个轴，按 x < y < z 的顺序返回
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 晶格
// ─────────────────────────────────────────────────────────────

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 三个晶格矢量的长度
    pub fn lengths(&self) -> Vec3 {
        [
            norm(self.matrix[0]),
            norm(self.matrix[1]),
            norm(self.matrix[2]),
        ]
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;
        let [a, b, c] = self.lengths();

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(a, cross(b, c))
    }

    /// 晶格矩阵的逆；奇异时返回 None
    pub fn inverse(&self) -> Option<[[f64; 3]; 3]> {
        let m = self.matrix;
        let det = self.volume();
        if det.abs() < 1e-10 {
            return None;
        }

        Some([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: Vec3) -> Vec3 {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标；奇异晶格时原样返回
    pub fn cart_to_frac(&self, cart: Vec3) -> Vec3 {
        let inv = match self.inverse() {
            Some(inv) => inv,
            None => return cart,
        };

        // frac = cart · M⁻¹
        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }

    /// 与第 i 个晶格矢量同向的单位法向量（垂直于另两个矢量张成的平面）
    fn plane_normal(&self, i: usize) -> Vec3 {
        let v = self.matrix[i];
        let n = cross(self.matrix[(i + 1) % 3], self.matrix[(i + 2) % 3]);
        let len = norm(n);
        if len < 1e-12 {
            return scale(v, 1.0 / norm(v));
        }
        let n = scale(n, 1.0 / len);
        if dot(n, v) < 0.0 {
            scale(n, -1.0)
        } else {
            n
        }
    }

    /// 把长度为零的晶格矢量替换为另两个矢量的单位法向量
    fn complete(&mut self) {
        for i in 0..3 {
            if norm(self.matrix[i]) > 1e-12 {
                continue;
            }
            let n = cross(self.matrix[(i + 1) % 3], self.matrix[(i + 2) % 3]);
            let len = norm(n);
            self.matrix[i] = if len > 1e-12 {
                scale(n, 1.0 / len)
            } else {
                let mut unit = [0.0; 3];
                unit[i] = 1.0;
                unit
            };
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 原子
// ─────────────────────────────────────────────────────────────

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: Vec3,

    /// 选择性动力学标记 (true = 可移动)，对应 POSCAR 中的 T/F
    pub selective: Option<[bool; 3]>,

    /// 速度 (Å/fs)
    pub velocity: Option<Vec3>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: Vec3) -> Self {
        Atom {
            element: element.into(),
            position,
            selective: None,
            velocity: None,
        }
    }

    pub fn with_selective(mut self, flags: [bool; 3]) -> Self {
        self.selective = Some(flags);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// 三个方向全部固定
    pub fn is_fixed(&self) -> bool {
        matches!(self.selective, Some([false, false, false]))
    }
}

// ─────────────────────────────────────────────────────────────
// 晶体结构
// ─────────────────────────────────────────────────────────────

/// 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称（POSCAR 注释行）
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表，索引即原子编号
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 计算化学式（按元素名排序）
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 每个原子的元素符号
    pub fn symbols(&self) -> Vec<String> {
        self.atoms.iter().map(|a| a.element.clone()).collect()
    }

    /// 按首次出现顺序排列的元素种类
    pub fn species_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for atom in &self.atoms {
            if !order.contains(&atom.element) {
                order.push(atom.element.clone());
            }
        }
        order
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// 所有原子沿某一轴的笛卡尔分量
    pub fn coordinates(&self, axis: Axis) -> Vec<f64> {
        self.atoms
            .iter()
            .map(|a| a.position[axis.index()])
            .collect()
    }

    pub fn scaled_positions(&self) -> Vec<Vec3> {
        self.atoms
            .iter()
            .map(|a| self.lattice.cart_to_frac(a.position))
            .collect()
    }

    pub fn has_selective(&self) -> bool {
        self.atoms.iter().any(|a| a.selective.is_some())
    }

    pub fn has_velocities(&self) -> bool {
        self.atoms.iter().any(|a| a.velocity.is_some())
    }

    /// 按给定索引顺序取出原子，生成新结构（可用于删除或重排）
    pub fn select(&self, indices: &[usize]) -> Crystal {
        Crystal {
            name: self.name.clone(),
            lattice: self.lattice.clone(),
            atoms: indices.iter().map(|&i| self.atoms[i].clone()).collect(),
        }
    }

    /// 整体平移所有原子
    pub fn translate(&mut self, shift: Vec3) {
        for atom in &mut self.atoms {
            atom.position = add(atom.position, shift);
        }
    }

    /// 更换晶格；`scale_atoms` 为 true 时保持分数坐标不变
    pub fn set_lattice(&mut self, lattice: Lattice, scale_atoms: bool) {
        if scale_atoms {
            let scaled = self.scaled_positions();
            for (atom, frac) in self.atoms.iter_mut().zip(scaled) {
                atom.position = lattice.frac_to_cart(frac);
            }
        }
        self.lattice = lattice;
    }

    /// 按 n1 x n2 x n3 构造超胞
    ///
    /// 原子顺序：平移块按 (m0, m1, m2) 字典序排列，m2 变化最快；
    /// 每个块内保持原结构的原子顺序。
    pub fn repeat(&self, size: [usize; 3]) -> Crystal {
        let m = self.lattice.matrix;
        let mut atoms = Vec::with_capacity(self.len() * size.iter().product::<usize>());

        for m0 in 0..size[0] {
            for m1 in 0..size[1] {
                for m2 in 0..size[2] {
                    let shift = self
                        .lattice
                        .frac_to_cart([m0 as f64, m1 as f64, m2 as f64]);
                    for atom in &self.atoms {
                        let mut image = atom.clone();
                        image.position = add(atom.position, shift);
                        atoms.push(image);
                    }
                }
            }
        }

        let matrix = [
            scale(m[0], size[0] as f64),
            scale(m[1], size[1] as f64),
            scale(m[2], size[2] as f64),
        ];

        Crystal::new(self.name.clone(), Lattice::from_vectors(matrix), atoms)
    }

    /// 沿给定轴居中原子
    ///
    /// `vacuum = Some(v)`：调整该方向晶格矢量长度，使原子两侧各留 v Å 真空；
    /// `vacuum = None`：晶格不变，仅把原子移到晶胞中央。
    /// 长度为零的晶格矢量先补全为单位法向量。
    pub fn center(&mut self, vacuum: Option<f64>, axes: &[Axis]) {
        self.lattice.complete();
        let cell = self.lattice.matrix;
        let positions = self.positions();

        let mut new_cell = cell;
        let mut translation = [0.0; 3];

        for &axis in axes {
            let i = axis.index();
            let dir = self.lattice.plane_normal(i);

            let (p0, p1) = positions
                .iter()
                .map(|&p| dot(p, dir))
                .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                    None => Some((x, x)),
                    Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                })
                .unwrap_or((0.0, 0.0));

            let height = dot(cell[i], dir);
            let longer = match vacuum {
                Some(v) => p1 - p0 + 2.0 * v - height,
                None => 0.0,
            };
            let top = longer + height - p1;
            let shift = 0.5 * (top - p0);

            let len = norm(cell[i]);
            let cosphi = height / len;
            let unit = scale(cell[i], 1.0 / len);

            new_cell[i] = scale(unit, len + longer / cosphi);
            translation = add(translation, scale(unit, shift / cosphi));
        }

        self.lattice = Lattice::from_vectors(new_cell);
        self.translate(translation);
    }

    /// 绕过原点的坐标轴转动 `degrees` 度（右手定则）
    pub fn rotate(&mut self, axis: Axis, degrees: f64) {
        let unit = match axis {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        let rotation = Rotation3::from_axis_angle(&unit, degrees.to_radians());
        for atom in &mut self.atoms {
            atom.position = (rotation * Vector3::from(atom.position)).into();
        }
    }

    /// 追加另一个结构的原子，晶格保持不变
    pub fn extend(&mut self, other: &Crystal) {
        self.atoms.extend(other.atoms.iter().cloned());
    }
}
