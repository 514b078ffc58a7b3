//! CLI 命令定义

use clap::{Parser, Subcommand};

/// 级联选择命令行工具
#[derive(Parser, Debug)]
#[command(name = "cascade-select")]
#[command(version, about = "学校/年级/班级级联选择工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// 目录服务地址，覆盖配置文件
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 逐级选择并输出最终快照（JSON）
    ///
    /// 每一级都必须在上一级加载完成后的候选集中存在；省略的层级及其下级保持未选择。
    Walk {
        /// 学校 id
        #[arg(short, long)]
        school: Option<String>,

        /// 年级 id（需要同时指定学校）
        #[arg(short, long, requires = "school")]
        grade: Option<String>,

        /// 班级 id（需要同时指定年级）
        #[arg(short, long, requires = "grade")]
        class: Option<String>,
    },

    /// 输出阶段链定义（JSON）
    Chain,
}

impl Commands {
    /// walk 命令中按阶段顺序排列的 id，遇到第一个空值为止
    pub fn walk_ids(&self) -> Vec<String> {
        match self {
            Self::Walk {
                school,
                grade,
                class,
            } => [school, grade, class]
                .into_iter()
                .map_while(|id| id.clone())
                .collect(),
            Self::Chain => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_walk() {
        let cli = Cli::parse_from(["cascade-select", "walk"]);
        assert!(cli.log_level.is_none());
        assert!(cli.command.walk_ids().is_empty());

        let cli = Cli::parse_from([
            "cascade-select",
            "--base-url",
            "http://127.0.0.1:9000",
            "walk",
            "--school",
            "1",
            "--grade",
            "9",
            "-c",
            "A",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(cli.command.walk_ids(), ["1", "9", "A"]);
    }

    #[test]
    fn test_cli_walk_requires_ancestors() {
        let result = Cli::try_parse_from(["cascade-select", "walk", "--grade", "9"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["cascade-select", "walk", "--school", "1", "--class", "A"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_chain() {
        let cli = Cli::parse_from(["cascade-select", "-l", "debug", "chain"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Chain));
    }
}
