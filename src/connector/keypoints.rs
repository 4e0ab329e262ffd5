// 该文件是 Shanan （山南西风） 项目的一部分。
// src/connector/keypoints.rs - 人物记录转关键点数组
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

use tracing::error;

use crate::{
  connector::{ConnectorError, PersonRecord},
  frame::PeakTable,
  model::{BodyModelParams, Keypoint, PoseKeypoints},
};

/// 把保留的人物记录展开为稠密关键点数组
///
/// 坐标乘以 `scale_factor`，置信度不缩放；人物分数按 `部位数 + 肢体数` 归一化。
pub fn materialize(
  kept: &[usize],
  people: &[PersonRecord],
  peaks: &PeakTable<'_>,
  params: &BodyModelParams,
  scale_factor: f32,
) -> Result<PoseKeypoints, ConnectorError> {
  let number_parts = params.number_body_parts;
  let mut keypoints = PoseKeypoints::with_people(kept.len(), number_parts);
  let normalizer = (number_parts + params.number_limb_pairs()) as f32;

  for (person, &index) in kept.iter().enumerate() {
    let record = &people[index];
    for part in 0..number_parts {
      let Some(peak_ref) = record.part(part) else {
        continue;
      };
      let peak = peaks.resolve(peak_ref).ok_or_else(|| {
        error!("人物记录 {} 的部位 {} 偏移 {} 无效", index, part, peak_ref.offset());
        ConnectorError::InvalidOffset {
          record: index,
          part,
          offset: peak_ref.offset(),
        }
      })?;
      keypoints.set_keypoint(
        person,
        part,
        Keypoint {
          x: peak.x * scale_factor,
          y: peak.y * scale_factor,
          score: peak.score,
        },
      );
    }
    keypoints.set_score(person, record.score() / normalizer);
  }

  Ok(keypoints)
}
