//! # units 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/units.rs` 定义的参数
//! - 使用 `units.rs` 换算，`tabled` 输出

use crate::cli::units::UnitsArgs;
use crate::error::Result;
use crate::units::{convert, format_general, EnergyUnit};
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct UnitRow {
    #[tabled(rename = "eV")]
    ev: String,
    #[tabled(rename = "kJ/mol")]
    kj_mol: String,
    #[tabled(rename = "cm-1")]
    wavenumber: String,
    #[tabled(rename = "nm")]
    wavelength: String,
    #[tabled(rename = "THz")]
    terahertz: String,
    #[tabled(rename = "fs")]
    period: String,
    #[tabled(rename = "K")]
    kelvin: String,
}

fn unit_row(value: f64, unit: EnergyUnit) -> UnitRow {
    let [ev, kj_mol, wavenumber, wavelength, terahertz, period, kelvin] =
        convert(value, unit).map(format_general);
    UnitRow {
        ev,
        kj_mol,
        wavenumber,
        wavelength,
        terahertz,
        period,
        kelvin,
    }
}

/// 执行 units 命令
pub fn execute(args: UnitsArgs) -> Result<()> {
    output::print_header(&format!("Energy conversion from {}", args.unit));

    let rows: Vec<UnitRow> = args.values.iter().map(|&v| unit_row(v, args.unit)).collect();
    println!("{}", Table::new(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_input_value() {
        let row = unit_row(1.0, EnergyUnit::Ev);
        assert_eq!(row.ev, "1");
        let row = unit_row(300.0, EnergyUnit::Kelvin);
        assert_eq!(row.kelvin, "300");
    }
}
