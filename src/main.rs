//! # xrdpeak - XRD 峰检测与晶粒尺寸估算
//!
//! 从 X 射线衍射谱中自动寻峰、交互式选峰，并用 Scherrer 公式估算晶粒尺寸。
//!
//! ## 子命令
//! - `detect` - 自动寻峰（二阶导数候选峰 + 峰形拟合）
//! - `pick`   - 在指定 2θ 附近选取单个峰
//! - `size`   - Scherrer 晶粒尺寸估算
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (XY 谱图 / 峰 CSV 解析器)
//!   │     ├── xrd/       (寻峰、选峰、Scherrer、导出、绘图)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (终端输出与表格)
//!   └── error.rs    (错误处理)
//! ```
//!
//! 引擎日志通过 `RUST_LOG=debug` 开启。

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;
mod xrd;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
