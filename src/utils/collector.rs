//! # 文件收集器
//!
//! 根据输入路径和 glob 模式收集待处理的结构文件。
//!
//! ## 功能
//! - 文件与目录混合输入，文件按原样保留
//! - 目录内按逗号分隔的多个 glob 模式匹配文件名
//! - 可选递归搜索
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`、`commands/traj.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{Result, VtoolsError};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    patterns: Vec<Pattern>,
    recursive: bool,
}

impl FileCollector {
    /// 解析逗号分隔的多个模式，例如 `"POSCAR*,*.vasp"`
    pub fn new(patterns: &str) -> Result<Self> {
        let patterns = patterns
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    VtoolsError::config(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if patterns.is_empty() {
            return Err(VtoolsError::config("At least one file pattern is required"));
        }

        Ok(Self {
            patterns,
            recursive: false,
        })
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有输入：文件直接保留，目录展开为匹配的文件（排序）
    pub fn collect(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_file() {
                files.push(input.clone());
            } else if input.is_dir() {
                files.extend(self.collect_dir(input));
            } else {
                return Err(VtoolsError::FileNotFound {
                    path: input.display().to_string(),
                });
            }
        }

        Ok(files)
    }

    fn collect_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式
    fn matches(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => self.patterns.iter().any(|p| p.matches(name)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_pattern_matching() {
        let collector = FileCollector::new("POSCAR*, *.vasp").unwrap();
        assert!(collector.matches(Path::new("run/POSCAR")));
        assert!(collector.matches(Path::new("POSCAR_001")));
        assert!(collector.matches(Path::new("a/b/Cu.vasp")));
        assert!(!collector.matches(Path::new("OUTCAR")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileCollector::new("[").is_err());
        assert!(FileCollector::new(" , ").is_err());
    }

    #[test]
    fn test_collect_directory_sorted() {
        let dir = std::env::temp_dir().join(format!("vtools_collect_{}", std::process::id()));
        fs::create_dir_all(dir.join("sub")).unwrap();
        for name in ["b.vasp", "a.vasp", "notes.txt", "sub/c.vasp"] {
            fs::write(dir.join(name), "").unwrap();
        }

        let collector = FileCollector::new("*.vasp").unwrap();
        let flat = collector.collect(&[dir.clone()]).unwrap();
        assert_eq!(flat, vec![dir.join("a.vasp"), dir.join("b.vasp")]);

        let deep = FileCollector::new("*.vasp")
            .unwrap()
            .recursive(true)
            .collect(&[dir.clone()])
            .unwrap();
        assert_eq!(deep.len(), 3);

        let missing = collector.collect(&[dir.join("nope")]);
        assert!(matches!(missing, Err(VtoolsError::FileNotFound { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }
}
