//! # 能量单位换算
//!
//! 在 eV、kJ/mol、cm⁻¹、nm、THz、fs、K 之间换算。波长 (nm) 与周期 (fs)
//! 和能量成反比，其余为线性关系。所有数值先换算为 eV，再换算到各单位。
//!
//! ## 数据来源
//! phonopy.units 中的物理常数
//!
//! ## 依赖关系
//! - 被 `commands/units.rs` 使用
//! - 纯静态数据，无外部依赖

use clap::ValueEnum;
use std::fmt;

/// Planck 常数 (eV·s)
pub const PLANCK_CONSTANT: f64 = 4.13566733e-15;
pub const AVOGADRO: f64 = 6.02214179e23;
/// 光速 (m/s)
pub const SPEED_OF_LIGHT: f64 = 299792458.0;
/// 1 eV (J)
pub const EV: f64 = 1.60217733e-19;
/// Boltzmann 常数 (eV/K)
pub const KB: f64 = 1.3806504e-23 / EV;

pub const THZ_TO_EV: f64 = PLANCK_CONSTANT * 1e12;
pub const THZ_TO_CM: f64 = 1.0e12 / (SPEED_OF_LIGHT * 100.0);
pub const CM_TO_EV: f64 = THZ_TO_EV / THZ_TO_CM;
pub const EV_TO_KJMOL: f64 = EV / 1000.0 * AVOGADRO;

/// 支持的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnergyUnit {
    #[value(name = "eV", alias = "ev")]
    Ev,
    #[value(name = "kJ/mol", alias = "kj/mol")]
    KjMol,
    #[value(name = "cm-1")]
    Wavenumber,
    #[value(name = "nm")]
    Wavelength,
    #[value(name = "THz", alias = "thz")]
    Terahertz,
    #[value(name = "fs")]
    Period,
    #[value(name = "K", alias = "k")]
    Kelvin,
}

impl EnergyUnit {
    pub const ALL: [EnergyUnit; 7] = [
        EnergyUnit::Ev,
        EnergyUnit::KjMol,
        EnergyUnit::Wavenumber,
        EnergyUnit::Wavelength,
        EnergyUnit::Terahertz,
        EnergyUnit::Period,
        EnergyUnit::Kelvin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnergyUnit::Ev => "eV",
            EnergyUnit::KjMol => "kJ/mol",
            EnergyUnit::Wavenumber => "cm-1",
            EnergyUnit::Wavelength => "nm",
            EnergyUnit::Terahertz => "THz",
            EnergyUnit::Period => "fs",
            EnergyUnit::Kelvin => "K",
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单位与 eV 的关系
#[derive(Debug, Clone, Copy)]
enum Relation {
    /// value = factor * E(eV)
    Linear(f64),
    /// value = factor / E(eV)
    Reciprocal(f64),
}

/// 换算表，顺序与 `EnergyUnit::ALL` 一致
static CONVERSIONS: [Relation; 7] = [
    Relation::Linear(1.0),
    Relation::Linear(EV_TO_KJMOL),
    Relation::Linear(1.0 / CM_TO_EV),
    Relation::Reciprocal(1e7 * CM_TO_EV),
    Relation::Linear(1.0 / THZ_TO_EV),
    Relation::Reciprocal(1000.0 * THZ_TO_EV),
    Relation::Linear(1.0 / KB),
];

fn relation(unit: EnergyUnit) -> Relation {
    CONVERSIONS[unit as usize]
}

/// eV -> unit
pub fn from_ev(ev: f64, unit: EnergyUnit) -> f64 {
    match relation(unit) {
        Relation::Linear(f) => ev * f,
        Relation::Reciprocal(f) => f / ev,
    }
}

/// unit -> eV
pub fn to_ev(value: f64, unit: EnergyUnit) -> f64 {
    match relation(unit) {
        Relation::Linear(f) => value / f,
        Relation::Reciprocal(f) => f / value,
    }
}

/// 把一个数值换算到全部单位，顺序与 `EnergyUnit::ALL` 一致
pub fn convert(value: f64, from: EnergyUnit) -> [f64; 7] {
    let ev = to_ev(value, from);
    EnergyUnit::ALL.map(|u| from_ev(ev, u))
}

/// 类似 C 的 `%.6G`：6 位有效数字，指数过大或过小时使用科学计数法
pub fn format_general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "NAN".to_string()
        } else if value > 0.0 {
            "INF".to_string()
        } else {
            "-INF".to_string()
        };
    }

    // 先按科学计数法舍入，再取指数，避免 9.999995 之类进位后指数改变
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION {
        let mantissa = trim_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs()
    }

    #[test]
    fn test_constants() {
        assert!(close(KB, 8.6173383e-05, 1e-7));
        assert!(close(THZ_TO_CM, 33.356410, 1e-7));
        assert!(close(CM_TO_EV, 1.2398419e-4, 1e-7));
        assert!(close(EV_TO_KJMOL, 96.4853910, 1e-7));
    }

    #[test]
    fn test_one_ev() {
        let row = convert(1.0, EnergyUnit::Ev);
        assert_eq!(row[0], 1.0);
        assert!(close(row[1], 96.485391, 1e-6));
        assert!(close(row[2], 8065.54, 1e-5));
        assert!(close(row[3], 1239.8419, 1e-6));
        assert!(close(row[4], 241.7989, 1e-6));
        assert!(close(row[5], 4.135667, 1e-6));
        assert!(close(row[6], 11604.5, 1e-5));
    }

    #[test]
    fn test_reciprocal_units_round_trip() {
        for unit in EnergyUnit::ALL {
            let ev = to_ev(from_ev(0.37, unit), unit);
            assert!(close(ev, 0.37, 1e-12), "{}", unit);
        }
        // 1239.84 nm 对应 1 eV
        let row = convert(1239.8419, EnergyUnit::Wavelength);
        assert!(close(row[0], 1.0, 1e-6));
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(1.0), "1");
        assert_eq!(format_general(96.4853910), "96.4854");
        assert_eq!(format_general(11604.5), "11604.5");
        assert_eq!(format_general(1234567.0), "1.23457E+06");
        assert_eq!(format_general(0.00012398419), "0.000123984");
        assert_eq!(format_general(0.0000123984), "1.23984E-05");
        assert_eq!(format_general(999999.6), "1E+06");
        assert_eq!(format_general(-2.5), "-2.5");
    }
}
