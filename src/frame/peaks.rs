// 该文件是 Shanan （山南西风） 项目的一部分。
// src/frame/peaks.rs - 关键点候选峰值表
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
use tracing::warn;

/// 每个峰值占用的标量个数 (x, y, score)
pub const PEAK_WIDTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeakTableError {
  #[error("峰值缓冲区长度不匹配: 期望至少 {expected}, 实际 {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  #[error("身体部位 {part} 超出范围 (共 {number_parts} 个部位)")]
  PartOutOfRange { part: usize, number_parts: usize },
  #[error("身体部位 {part} 的峰值已满 (最多 {max_peaks} 个)")]
  PartFull { part: usize, max_peaks: usize },
  #[error("峰值表部位数量不足: 模型需要 {required}, 实际 {actual}")]
  TooFewParts { required: usize, actual: usize },
  #[error("峰值表形状溢出: {number_parts} 个部位, 每部位最多 {max_peaks} 个峰值")]
  ShapeOverflow { number_parts: usize, max_peaks: usize },
  #[error("每部位最多 {max_peaks} 个峰值超过上限 {limit}")]
  TooManyPeaks { max_peaks: usize, limit: usize },
}

/// 单个候选峰值
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
  pub x: f32,
  pub y: f32,
  pub score: f32,
}

impl Peak {
  pub fn new(x: f32, y: f32, score: f32) -> Self {
    Self { x, y, score }
  }
}

/// 指向峰值缓冲区中某个峰值置信度字段的偏移
///
/// 偏移公式为 `part * stride + index * 3 + 2`，其中 `index` 从 1 开始，
/// `stride = 3 * (max_peaks + 1)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeakRef(usize);

impl PeakRef {
  pub fn offset(self) -> usize {
    self.0
  }
}

/// 按身体部位分段的峰值只读视图
///
/// 每段的第 0 个槽位保存该部位的峰值数量，其后依次是 `(x, y, score)`。
#[derive(Debug, Clone, Copy)]
pub struct PeakTable<'a> {
  data: &'a [f32],
  number_parts: usize,
  max_peaks: usize,
}

impl<'a> PeakTable<'a> {
  pub fn new(data: &'a [f32], number_parts: usize, max_peaks: usize) -> Result<Self, PeakTableError> {
    let expected = table_len(number_parts, max_peaks)?;
    if data.len() < expected {
      return Err(PeakTableError::LengthMismatch {
        expected,
        actual: data.len(),
      });
    }
    Ok(Self {
      data,
      number_parts,
      max_peaks,
    })
  }

  pub fn number_parts(&self) -> usize {
    self.number_parts
  }

  pub fn max_peaks(&self) -> usize {
    self.max_peaks
  }

  pub fn stride(&self) -> usize {
    stride_of(self.max_peaks)
  }

  /// 某个部位检测到的峰值个数，截断到 `[0, max_peaks]`
  pub fn count(&self, part: usize) -> usize {
    if part >= self.number_parts {
      return 0;
    }
    let raw = positive_int_round(self.data[part * self.stride()]);
    if raw < 0 {
      return 0;
    }
    let count = raw as usize;
    if count > self.max_peaks {
      warn!(
        "部位 {} 的峰值数量 {} 超过上限 {}, 已截断",
        part, count, self.max_peaks
      );
      return self.max_peaks;
    }
    count
  }

  /// 部位 `part` 的第 `index` 个峰值（从 1 开始）
  pub fn peak_ref(&self, part: usize, index: usize) -> Option<PeakRef> {
    if part >= self.number_parts || index == 0 || index > self.max_peaks {
      return None;
    }
    Some(PeakRef(part * self.stride() + index * PEAK_WIDTH + 2))
  }

  pub fn peak(&self, part: usize, index: usize) -> Option<Peak> {
    self.peak_ref(part, index).and_then(|r| self.resolve(r))
  }

  /// 将偏移还原为峰值，偏移必须指向某个置信度字段
  pub fn resolve(&self, peak_ref: PeakRef) -> Option<Peak> {
    let offset = peak_ref.offset();
    if offset >= self.data.len() || offset % PEAK_WIDTH != 2 || offset % self.stride() < PEAK_WIDTH {
      return None;
    }
    Some(Peak {
      x: self.data[offset - 2],
      y: self.data[offset - 1],
      score: self.data[offset],
    })
  }

  pub fn score(&self, peak_ref: PeakRef) -> Option<f32> {
    self.resolve(peak_ref).map(|p| p.score)
  }

  pub fn is_empty(&self) -> bool {
    (0..self.number_parts).all(|part| self.count(part) == 0)
  }
}

/// 自有内存的峰值缓冲区，布局与 [`PeakTable`] 相同
#[derive(Debug, Clone, PartialEq)]
pub struct PeakBuffer {
  data: Box<[f32]>,
  number_parts: usize,
  max_peaks: usize,
}

impl PeakBuffer {
  pub fn with_shape(number_parts: usize, max_peaks: usize) -> Result<Self, PeakTableError> {
    let len = table_len(number_parts, max_peaks)?;
    Ok(Self {
      data: vec![0.0; len].into_boxed_slice(),
      number_parts,
      max_peaks,
    })
  }

  pub fn from_raw(data: Vec<f32>, number_parts: usize, max_peaks: usize) -> Result<Self, PeakTableError> {
    let expected = table_len(number_parts, max_peaks)?;
    if data.len() != expected {
      return Err(PeakTableError::LengthMismatch {
        expected,
        actual: data.len(),
      });
    }
    Ok(Self {
      data: data.into_boxed_slice(),
      number_parts,
      max_peaks,
    })
  }

  /// 追加一个峰值，并更新该部位的计数槽位
  pub fn push(&mut self, part: usize, peak: Peak) -> Result<PeakRef, PeakTableError> {
    if part >= self.number_parts {
      return Err(PeakTableError::PartOutOfRange {
        part,
        number_parts: self.number_parts,
      });
    }
    let base = part * stride_of(self.max_peaks);
    let count = self.data[base] as usize;
    if count >= self.max_peaks {
      return Err(PeakTableError::PartFull {
        part,
        max_peaks: self.max_peaks,
      });
    }
    let index = count + 1;
    let slot = base + index * PEAK_WIDTH;
    self.data[slot] = peak.x;
    self.data[slot + 1] = peak.y;
    self.data[slot + 2] = peak.score;
    self.data[base] = index as f32;
    Ok(PeakRef(slot + 2))
  }

  pub fn table(&self) -> PeakTable<'_> {
    PeakTable {
      data: &self.data,
      number_parts: self.number_parts,
      max_peaks: self.max_peaks,
    }
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }
}

// 只对已通过 table_len 校验的形状调用
fn stride_of(max_peaks: usize) -> usize {
  PEAK_WIDTH * (max_peaks + 1)
}

fn table_len(number_parts: usize, max_peaks: usize) -> Result<usize, PeakTableError> {
  max_peaks
    .checked_add(1)
    .and_then(|slots| slots.checked_mul(PEAK_WIDTH))
    .and_then(|stride| stride.checked_mul(number_parts))
    .ok_or(PeakTableError::ShapeOverflow {
      number_parts,
      max_peaks,
    })
}

/// 非负数的四舍五入，与上游峰值提取保持一致
pub(crate) fn positive_int_round(value: f32) -> i32 {
  (value + 0.5) as i32
}
