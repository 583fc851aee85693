//! # Maxwell-Boltzmann 初速度
//!
//! 单位约定与 VASP POSCAR 速度块一致：位置 Å，速度 Å/fs，质量 amu，能量 eV。
//!
//! 流程：按温度抽样 -> 强制到目标温度 -> 去除质心平动 -> 强制温度
//! -> 去除整体转动 -> 强制温度。
//!
//! ## 依赖关系
//! - 被 `commands/velinit.rs` 使用
//! - 使用 `rand`/`rand_distr` 抽样，`nalgebra` 求惯量张量本征分解

use crate::error::{Result, VtoolsError};
use crate::models::element::atomic_mass;
use crate::models::structure::{add, cross, scale, sub, Vec3};
use crate::models::Crystal;

use nalgebra::{Matrix3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Boltzmann 常数 (eV/K)
pub const KB: f64 = 8.617333262e-5;

/// 1 amu·Å²/fs² 对应的能量 (eV)
pub const AMU_A2_FS2_TO_EV: f64 = 103.642_696_6;

/// 惯量主值低于该阈值时视为零（线性分子）
const MOMENT_EPS: f64 = 1e-10;

/// 低于该温度 (K) 视为静止，不再缩放
pub const REST_TEMPERATURE: f64 = 1e-10;

/// 按 Maxwell-Boltzmann 分布抽样，每个分量的标准差为 sqrt(kT/m)
pub fn maxwell_boltzmann<R: Rng + ?Sized>(masses: &[f64], temperature: f64, rng: &mut R) -> Vec<Vec3> {
    masses
        .iter()
        .map(|&m| {
            let sigma = (KB * temperature / (m * AMU_A2_FS2_TO_EV)).sqrt();
            let mut v = [0.0; 3];
            for x in &mut v {
                let n: f64 = StandardNormal.sample(rng);
                *x = n * sigma;
            }
            v
        })
        .collect()
}

/// 总动能 (eV)
pub fn kinetic_energy(masses: &[f64], velocities: &[Vec3]) -> f64 {
    masses
        .iter()
        .zip(velocities)
        .map(|(&m, v)| 0.5 * m * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]))
        .sum::<f64>()
        * AMU_A2_FS2_TO_EV
}

/// 动力学温度 (K)，按 3N 个自由度计算
pub fn temperature(masses: &[f64], velocities: &[Vec3]) -> f64 {
    if masses.is_empty() {
        return 0.0;
    }
    2.0 * kinetic_energy(masses, velocities) / (3.0 * masses.len() as f64 * KB)
}

/// 缩放速度使温度恰为 `target`；体系静止时无法缩放，返回 false
pub fn force_temperature(masses: &[f64], velocities: &mut [Vec3], target: f64) -> bool {
    let current = temperature(masses, velocities);
    if current < REST_TEMPERATURE {
        return false;
    }
    let factor = (target / current).sqrt();
    for v in velocities.iter_mut() {
        *v = scale(*v, factor);
    }
    true
}

/// 总动量 (amu·Å/fs)
pub fn total_momentum(masses: &[f64], velocities: &[Vec3]) -> Vec3 {
    masses
        .iter()
        .zip(velocities)
        .fold([0.0; 3], |acc, (&m, &v)| add(acc, scale(v, m)))
}

/// 去除质心平动
pub fn stationary(masses: &[f64], velocities: &mut [Vec3]) {
    let total_mass: f64 = masses.iter().sum();
    if total_mass <= 0.0 {
        return;
    }
    let v_cm = scale(total_momentum(masses, velocities), 1.0 / total_mass);
    for v in velocities.iter_mut() {
        *v = sub(*v, v_cm);
    }
}

fn center_of_mass(masses: &[f64], positions: &[Vec3]) -> Vec3 {
    let total_mass: f64 = masses.iter().sum();
    let weighted = masses
        .iter()
        .zip(positions)
        .fold([0.0; 3], |acc, (&m, &r)| add(acc, scale(r, m)));
    scale(weighted, 1.0 / total_mass)
}

/// 相对质心的角动量 (amu·Å²/fs)
pub fn angular_momentum(masses: &[f64], positions: &[Vec3], velocities: &[Vec3]) -> Vec3 {
    let com = center_of_mass(masses, positions);
    masses
        .iter()
        .zip(positions.iter().zip(velocities))
        .fold([0.0; 3], |acc, (&m, (&r, &v))| {
            add(acc, scale(cross(sub(r, com), v), m))
        })
}

/// 去除整体转动
///
/// 在惯量主轴系中求角速度 ω（主值为零的分量置零），再从每个原子减去 ω × r。
pub fn zero_rotation(masses: &[f64], positions: &[Vec3], velocities: &mut [Vec3]) {
    if masses.len() < 2 {
        return;
    }
    let com = center_of_mass(masses, positions);

    let mut inertia = Matrix3::<f64>::zeros();
    for (&m, &r) in masses.iter().zip(positions) {
        let d = Vector3::from(sub(r, com));
        inertia += (Matrix3::identity() * d.norm_squared() - d * d.transpose()) * m;
    }

    let l = Vector3::from(angular_momentum(masses, positions, velocities));
    let eigen = inertia.symmetric_eigen();

    let mut omega = Vector3::<f64>::zeros();
    for k in 0..3 {
        let moment = eigen.eigenvalues[k];
        if moment > MOMENT_EPS {
            let axis = eigen.eigenvectors.column(k);
            omega += axis * (axis.dot(&l) / moment);
        }
    }
    let omega: Vec3 = omega.into();

    for (v, &r) in velocities.iter_mut().zip(positions) {
        *v = sub(*v, cross(omega, sub(r, com)));
    }
}

/// 初始化结构中每个原子的速度，返回最终温度
///
/// 单原子体系去除平动后静止，最终温度为零，由调用方决定如何提示。
pub fn initialize_velocities(crystal: &mut Crystal, target: f64, seed: Option<u64>) -> Result<f64> {
    if !(target >= 0.0 && target.is_finite()) {
        return Err(VtoolsError::config(format!(
            "Temperature must be a non-negative number, got {}",
            target
        )));
    }

    let masses = crystal
        .atoms
        .iter()
        .map(|a| {
            atomic_mass(&a.element).ok_or_else(|| {
                VtoolsError::config(format!("Unknown element '{}': no atomic mass", a.element))
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    let positions = crystal.positions();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut velocities = maxwell_boltzmann(&masses, target, &mut rng);
    force_temperature(&masses, &mut velocities, target);
    stationary(&masses, &mut velocities);
    force_temperature(&masses, &mut velocities, target);
    zero_rotation(&masses, &positions, &mut velocities);
    force_temperature(&masses, &mut velocities, target);

    for (atom, v) in crystal.atoms.iter_mut().zip(&velocities) {
        atom.velocity = Some(*v);
    }
    Ok(temperature(&masses, &velocities))
}
