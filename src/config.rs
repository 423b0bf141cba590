use crate::error::{AppResult, ConfigError};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 参议院投票列表页
    pub listing_url: String,
    /// 单次投票 XML 的根路径
    pub vote_url_base: String,
    /// roll_id 前缀
    pub chamber_prefix: String,
    /// 议院名称
    pub chamber: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 向前检查的投票数量
    pub window_size: u32,
    /// 上游时间所在的时区
    pub time_zone: String,
    /// 数据库连接串
    pub database_url: String,
    /// 报告来源名称
    pub report_source: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url:
                "http://www.senate.gov/pagelayout/legislative/a_three_sections_with_teasers/votes.htm"
                    .to_string(),
            vote_url_base: "http://www.senate.gov/legislative/LIS/roll_call_votes".to_string(),
            chamber_prefix: "s".to_string(),
            chamber: "senate".to_string(),
            request_timeout_secs: 8,
            window_size: 20,
            time_zone: "America/New_York".to_string(),
            database_url: "sqlite://rolls.db?mode=rwc".to_string(),
            report_source: "RollsLiveSenate".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果设置了 `ROLLS_CONFIG_FILE`，先读取该 TOML 文件，再用其他环境变量覆盖
    pub fn from_env() -> AppResult<Self> {
        let base = match std::env::var("ROLLS_CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };

        let config = Self {
            listing_url: std::env::var("ROLLS_LISTING_URL").unwrap_or(base.listing_url),
            vote_url_base: std::env::var("ROLLS_VOTE_URL_BASE").unwrap_or(base.vote_url_base),
            chamber_prefix: std::env::var("ROLLS_CHAMBER_PREFIX").unwrap_or(base.chamber_prefix),
            chamber: std::env::var("ROLLS_CHAMBER").unwrap_or(base.chamber),
            request_timeout_secs: parse_env("ROLLS_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(base.request_timeout_secs),
            window_size: parse_env("ROLLS_WINDOW_SIZE", "u32")?.unwrap_or(base.window_size),
            time_zone: std::env::var("ROLLS_TIME_ZONE").unwrap_or(base.time_zone),
            database_url: std::env::var("ROLLS_DATABASE_URL").unwrap_or(base.database_url),
            report_source: std::env::var("ROLLS_REPORT_SOURCE").unwrap_or(base.report_source),
            verbose_logging: parse_env("ROLLS_VERBOSE_LOGGING", "bool")?
                .unwrap_or(base.verbose_logging),
        };

        // 提前校验时区，避免运行到一半才失败
        config.tz()?;
        Ok(config)
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    /// 报告中使用的议院名称，例如 `Senate`
    pub fn chamber_label(&self) -> String {
        let mut chars = self.chamber.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 解析配置中的时区
    pub fn tz(&self) -> AppResult<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimeZone(self.time_zone.clone()).into())
    }
}

/// 单次运行的可选参数
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// 覆盖当前年份
    pub year: Option<i32>,
    /// 直接指定要抓取的投票编号（调试用，跳过缺口检测）
    pub only: Option<Vec<u32>>,
}

impl RunOptions {
    /// 从 `ROLLS_YEAR` / `ROLLS_ONLY` 读取
    pub fn from_env() -> AppResult<Self> {
        let year = parse_env("ROLLS_YEAR", "i32")?;

        let only = match std::env::var("ROLLS_ONLY") {
            Ok(value) => {
                let numbers = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<u32>().map_err(|_| ConfigError::EnvVarParseFailed {
                            var_name: "ROLLS_ONLY".to_string(),
                            value: value.clone(),
                            expected_type: "逗号分隔的 u32 列表".to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Some(numbers)
            }
            Err(_) => None,
        };

        Ok(Self { year, only })
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
