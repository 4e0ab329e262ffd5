// 该文件是 Shanan （山南西风） 项目的一部分。
// src/connector.rs - 身体部位连接（PAF 姿态组装）
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

use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
  config::{ConfigError, ConnectorConfig},
  frame::{Affinity, AffinityError, PeakTable, PeakTableError},
  model::{BodyModel, BodyModelParams, PoseKeypoints},
};

mod filter;
mod keypoints;
mod people;
mod score;

pub use self::filter::{effective_count, filter_people};
pub use self::keypoints::materialize;
pub use self::people::{CandidateEdge, PersonRecord, build_people};
pub use self::score::{points_in_line, score_connection};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectorError {
  #[error("不支持的身体模型: {0}")]
  UnsupportedModel(String),
  #[error("身体模型 {0} 仍处于实验阶段")]
  ExperimentalModel(BodyModel),
  #[error("身体模型 {0} 没有身体部位")]
  NoBodyParts(&'static str),
  #[error("身体模型 {0} 没有肢体连接")]
  NoLimbPairs(&'static str),
  #[error("配置错误: {0}")]
  Config(#[from] ConfigError),
  #[error("峰值表错误: {0}")]
  PeakTable(#[from] PeakTableError),
  #[error("亲和场错误: {0}")]
  Affinity(#[from] AffinityError),
  #[error("肢体 {limb} 需要的亲和场通道 {channel} 不存在")]
  MissingAffinityChannel { limb: usize, channel: usize },
  #[error("肢体 {limb} 超出连接分数张量形状 {shape:?}")]
  PairScoresShape { shape: [usize; 3], limb: usize },
  #[error("人物记录 {record} 的有效部位数 {count} 不合法")]
  InternalInconsistency { record: usize, count: isize },
  #[error("部位 {part} 的第 {index} 个峰值不存在")]
  InvalidPeakRef { part: usize, index: usize },
  #[error("人物记录 {record} 的部位 {part} 偏移 {offset} 不指向峰值")]
  InvalidOffset { record: usize, part: usize, offset: usize },
}

/// 对一个已知身体模型执行完整的组装流程
pub fn connect_body_parts(
  model: BodyModel,
  peaks: &PeakTable<'_>,
  affinity: &Affinity<'_>,
  config: &ConnectorConfig,
) -> Result<PoseKeypoints, ConnectorError> {
  if model.is_experimental() {
    error!("身体模型 {} 仍处于实验阶段, 拒绝处理", model);
    return Err(ConnectorError::ExperimentalModel(model));
  }
  connect_with_params(model.params(), peaks, affinity, config)
}

/// 对任意模型参数执行 建立记录 → 筛选 → 生成关键点
pub fn connect_with_params(
  params: &BodyModelParams,
  peaks: &PeakTable<'_>,
  affinity: &Affinity<'_>,
  config: &ConnectorConfig,
) -> Result<PoseKeypoints, ConnectorError> {
  if params.number_body_parts == 0 {
    return Err(ConnectorError::NoBodyParts(params.name));
  }
  if params.number_limb_pairs() == 0 {
    return Err(ConnectorError::NoLimbPairs(params.name));
  }
  config.validate()?;
  if peaks.number_parts() < params.number_body_parts {
    return Err(
      PeakTableError::TooFewParts {
        required: params.number_body_parts,
        actual: peaks.number_parts(),
      }
      .into(),
    );
  }

  let people = build_people(peaks, affinity, params, config)?;
  let max_people = config.max_people.unwrap_or_else(|| peaks.max_peaks());
  let kept = filter_people(&people, params, config, max_people)?;
  let keypoints = materialize(&kept, &people, peaks, params, config.scale_factor)?;

  debug!(
    "{}: {} 条记录, 筛选后 {} 人 (上限 {})",
    params.name,
    people.len(),
    kept.len(),
    max_people
  );
  if !keypoints.is_empty() {
    info!("{}: 检测到 {} 人", params.name, keypoints.number_people());
  }
  Ok(keypoints)
}
