//! # 带隙分析
//!
//! 对每个 OUTCAR：读取本征值，按部分占据比例确定价带顶与导带底，
//! 打印每个自旋通道的结果；两个自旋通道时再给出整体带隙。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 的 GapArgs
//! - 使用 `parsers/outcar.rs`, `band/`
//! - 使用 `utils/output.rs`，`tabled` 输出表格

use crate::band::report::{describe_aggregate, edge_records, edge_rows, save_records_csv};
use crate::band::{aggregate_spin, resolve_spin_channels};
use crate::cli::analyze::GapArgs;
use crate::error::{Result, VtoolsError};
use crate::parsers::outcar;
use crate::utils::output;

use std::path::PathBuf;
use tabled::Table;

/// 执行 gap 分析
pub fn execute(args: GapArgs) -> Result<()> {
    let outcars = if args.outcars.is_empty() {
        vec![PathBuf::from("OUTCAR")]
    } else {
        args.outcars.clone()
    };

    let mut records = Vec::new();
    for path in &outcars {
        if !path.exists() {
            return Err(VtoolsError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let (info, bands) = outcar::parse_bands(path)?;
        let efermi = args.zero.unwrap_or(bands.efermi);
        let results = resolve_spin_channels(&bands, efermi, args.ratio)?;

        output::print_header(&path.display().to_string());
        output::print_info(&format!(
            "NSPIN = {}, NKPTS = {}, NBANDS = {}, E-fermi = {:.4} eV",
            info.nspin, info.nkpts, info.nbands, info.efermi
        ));
        if args.zero.is_some() {
            output::print_info(&format!("Reference energy: {:.4} eV", efermi));
        }
        println!("{}", Table::new(edge_rows(&bands, &results)));

        for (ispin, result) in results.iter().enumerate() {
            if !result.is_metal() && result.gap() < 0.0 {
                output::print_warning(&format!(
                    "Spin {}: CBM lies below VBM, check the ratio ({})",
                    ispin + 1,
                    args.ratio
                ));
            }
        }
        if results.len() == 2 {
            output::print_info(&describe_aggregate(&aggregate_spin(&results)));
        }

        records.extend(edge_records(
            &path.display().to_string(),
            efermi,
            &bands,
            &results,
        ));
    }

    if let Some(csv_path) = &args.csv {
        save_records_csv(&records, csv_path)?;
        output::print_success(&format!("Band edges saved to '{}'", csv_path.display()));
    }

    output::print_done(&format!("{} OUTCAR file(s) analyzed", outcars.len()));
    Ok(())
}
