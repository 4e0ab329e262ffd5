// 该文件是 Shanan （山南西风） 项目的一部分。
// src/connector/score.rs - 肢体连接打分
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

use crate::frame::{PafPlane, Peak, positive_int_round};

const MIN_POINTS_IN_LINE: i32 = 5;
const MAX_POINTS_IN_LINE: i32 = 25;
const MIN_VECTOR_NORM: f32 = 1e-6;

/// 沿 A→B 线段采样的点数
pub fn points_in_line(dx: f32, dy: f32) -> usize {
  let longest = dx.abs().max(dy.abs());
  positive_int_round((5.0 * longest).sqrt()).clamp(MIN_POINTS_IN_LINE, MAX_POINTS_IN_LINE) as usize
}

/// 用亲和场为峰值 A 到峰值 B 的连接打分
///
/// 返回值为超过 `inter_threshold` 的采样点点积均值；
/// 峰值重合或达标采样点占比不够时返回 0。
pub fn score_connection(
  a: Peak,
  b: Peak,
  map_x: PafPlane<'_>,
  map_y: PafPlane<'_>,
  inter_threshold: f32,
  inter_min_above_threshold: f32,
) -> f32 {
  let dx = b.x - a.x;
  let dy = b.y - a.y;
  let norm = (dx * dx + dy * dy).sqrt();
  // 重合的峰值不连接
  if norm <= MIN_VECTOR_NORM {
    return 0.0;
  }

  let number_points = points_in_line(dx, dy);
  let unit_x = dx / norm;
  let unit_y = dy / norm;
  let step_x = dx / number_points as f32;
  let step_y = dy / number_points as f32;

  let mut sum = 0.0f32;
  let mut count = 0usize;
  for lm in 0..number_points {
    let col = positive_int_round(a.x + lm as f32 * step_x);
    let row = positive_int_round(a.y + lm as f32 * step_y);
    let score = unit_x * map_x.at_clamped(col, row) + unit_y * map_y.at_clamped(col, row);
    if score > inter_threshold {
      sum += score;
      count += 1;
    }
  }

  if count as f32 / number_points as f32 > inter_min_above_threshold {
    sum / count as f32
  } else {
    0.0
  }
}
