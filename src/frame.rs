// 该文件是 Shanan （山南西风） 项目的一部分。
// src/frame.rs - 姿态组装输入帧定义
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

mod affinity;
mod peaks;

pub use self::affinity::{
  Affinity, AffinityBuffer, AffinityError, PafBuffer, PafMap, PafPlane, PairScoreBuffer, PairScores,
};
pub use self::peaks::{PEAK_WIDTH, Peak, PeakBuffer, PeakRef, PeakTable, PeakTableError};

pub(crate) use self::peaks::positive_int_round;

/// 一张图像对应的上游输出：峰值表和连接打分来源
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
  pub index: u64,
  pub peaks: PeakBuffer,
  pub affinity: AffinityBuffer,
}

impl PoseFrame {
  pub fn new(peaks: PeakBuffer, affinity: impl Into<AffinityBuffer>) -> Self {
    Self {
      index: 0,
      peaks,
      affinity: affinity.into(),
    }
  }

  pub fn with_index(mut self, index: u64) -> Self {
    self.index = index;
    self
  }

  pub fn peaks(&self) -> PeakTable<'_> {
    self.peaks.table()
  }

  pub fn affinity(&self) -> Affinity<'_> {
    self.affinity.view()
  }
}
