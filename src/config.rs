// 该文件是 Shanan （山南西风） 项目的一部分。
// src/config.rs - 部位连接参数配置
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::str::FromStr;

use thiserror::Error;
use tracing::{error, warn};
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
  #[error("参数 {key} 的取值 {value} 无法解析")]
  InvalidValue { key: String, value: String },
  #[error("参数 {0} 必须是有限数值")]
  NotFinite(&'static str),
  #[error("缩放系数必须为正数, 实际为 {0}")]
  InvalidScale(f32),
}

/// 肢体连接与人物筛选的标量参数
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorConfig {
  /// 最多保留的人数，`None` 时使用峰值表的单部位峰值容量
  pub max_people: Option<usize>,
  /// 单个采样点计入的最小亲和场点积
  pub inter_threshold: f32,
  /// 计入采样点占比的下限（严格大于）
  pub inter_min_above_threshold: f32,
  pub min_subset_cnt: usize,
  pub min_subset_score: f32,
  pub scale_factor: f32,
  /// 放宽阈值，同时让脚部/手部参与完整度统计
  pub maximize_positives: bool,
  /// 两端都有峰值但未被接受的峰值也单独成为记录（默认与旧实现一致，直接丢弃）
  pub keep_unmatched_parts: bool,
}

impl Default for ConnectorConfig {
  fn default() -> Self {
    Self::with_maximize_positives(false)
  }
}

impl ConnectorConfig {
  pub fn with_maximize_positives(maximize_positives: bool) -> Self {
    Self {
      max_people: None,
      inter_threshold: if maximize_positives { 0.0 } else { 0.05 },
      inter_min_above_threshold: if maximize_positives { 0.75 } else { 0.95 },
      min_subset_cnt: if maximize_positives { 2 } else { 3 },
      min_subset_score: if maximize_positives { 0.05 } else { 0.4 },
      scale_factor: 1.0,
      maximize_positives,
      keep_unmatched_parts: false,
    }
  }

  pub fn max_people(mut self, max_people: usize) -> Self {
    self.max_people = Some(max_people);
    self
  }

  pub fn scale_factor(mut self, scale_factor: f32) -> Self {
    self.scale_factor = scale_factor;
    self
  }

  pub fn inter_threshold(mut self, threshold: f32) -> Self {
    self.inter_threshold = threshold;
    self
  }

  pub fn inter_min_above_threshold(mut self, threshold: f32) -> Self {
    self.inter_min_above_threshold = threshold;
    self
  }

  pub fn min_subset_cnt(mut self, count: usize) -> Self {
    self.min_subset_cnt = count;
    self
  }

  pub fn min_subset_score(mut self, score: f32) -> Self {
    self.min_subset_score = score;
    self
  }

  pub fn keep_unmatched_parts(mut self, keep: bool) -> Self {
    self.keep_unmatched_parts = keep;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let finite = [
      ("inter_threshold", self.inter_threshold),
      ("inter_min_above_threshold", self.inter_min_above_threshold),
      ("min_subset_score", self.min_subset_score),
      ("scale", self.scale_factor),
    ];
    for (key, value) in finite {
      if !value.is_finite() {
        return Err(ConfigError::NotFinite(key));
      }
    }
    if self.scale_factor <= 0.0 {
      return Err(ConfigError::InvalidScale(self.scale_factor));
    }
    Ok(())
  }

  /// 从 URL 查询参数读取配置
  ///
  /// `maximize_positives` 先决定默认阈值，其余参数在此基础上覆盖。
  pub fn from_query(url: &Url) -> Result<Self, ConfigError> {
    let maximize_positives = match url.query_pairs().find(|(k, _)| k == "maximize_positives") {
      Some((key, value)) if value.is_empty() => parse_value::<bool>(&key, "true")?,
      Some((key, value)) => parse_value(&key, &value)?,
      None => false,
    };

    let mut config = Self::with_maximize_positives(maximize_positives);
    for (key, value) in url.query_pairs() {
      match &*key {
        "maximize_positives" => {}
        "max_people" => config.max_people = Some(parse_value(&key, &value)?),
        "inter_threshold" => config.inter_threshold = parse_value(&key, &value)?,
        "inter_min_above_threshold" => config.inter_min_above_threshold = parse_value(&key, &value)?,
        "min_subset_cnt" => config.min_subset_cnt = parse_value(&key, &value)?,
        "min_subset_score" => config.min_subset_score = parse_value(&key, &value)?,
        "scale" | "scale_factor" => config.scale_factor = parse_value(&key, &value)?,
        "keep_unmatched" if value.is_empty() => config.keep_unmatched_parts = true,
        "keep_unmatched" => config.keep_unmatched_parts = parse_value(&key, &value)?,
        other => warn!("忽略未知参数: {}={}", other, value),
      }
    }

    config.validate()?;
    Ok(config)
  }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
  value.parse().map_err(|_| {
    error!("参数 {} 的取值 {} 无法解析", key, value);
    ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
    }
  })
}
