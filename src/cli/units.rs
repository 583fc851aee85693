//! # units 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/units.rs`

use crate::units::EnergyUnit;
use clap::Args;

/// units 子命令参数
#[derive(Args, Debug)]
pub struct UnitsArgs {
    /// Unit of the input values
    #[arg(short, long, value_enum, default_value = "eV", ignore_case = true)]
    pub unit: EnergyUnit,

    /// Values to convert
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}
