// 该文件是 Shanan （山南西风） 项目的一部分。
// src/connector/filter.rs - 人物记录筛选
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

use tracing::{debug, error};

use crate::{
  config::ConnectorConfig,
  connector::{ConnectorError, PersonRecord},
  model::BodyModelParams,
};

/// 参与完整度判定的部位个数
///
/// 脚部（以及扩展模型的手部）误检太多，默认不计入；`maximize_positives` 时全部计入。
pub fn effective_count(person: &PersonRecord, params: &BodyModelParams, config: &ConnectorConfig) -> isize {
  let mut count = person.count() as isize;
  if !config.maximize_positives {
    count -= person
      .parts()
      .iter()
      .enumerate()
      .filter(|(part, slot)| slot.is_some() && params.is_completeness_excluded(*part))
      .count() as isize;
  }
  count
}

/// 返回保留下来的记录下标，保持原有顺序，最多 `max_people` 条
pub fn filter_people(
  people: &[PersonRecord],
  params: &BodyModelParams,
  config: &ConnectorConfig,
  max_people: usize,
) -> Result<Vec<usize>, ConnectorError> {
  let mut kept = Vec::with_capacity(max_people.min(people.len()));
  if max_people == 0 {
    return Ok(kept);
  }

  for (index, person) in people.iter().enumerate() {
    let count = effective_count(person, params, config);
    if count >= config.min_subset_cnt as isize && person.score() / count as f32 >= config.min_subset_score {
      kept.push(index);
      if kept.len() == max_people {
        break;
      }
    } else if (count < 1 && params.is_standard()) || count < 0 {
      error!("人物记录 {} 的有效部位数异常: {}", index, count);
      return Err(ConnectorError::InternalInconsistency { record: index, count });
    }
  }

  debug!("{} 条人物记录中保留 {} 条", people.len(), kept.len());
  Ok(kept)
}
