// 该文件是 Shanan （山南西风） 项目的一部分。
// src/frame/affinity.rs - 部位亲和场与预计算连接分数
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

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffinityError {
  #[error("特征图尺寸无效: {width}x{height}")]
  InvalidSize { width: usize, height: usize },
  #[error("特征图长度 {len} 不是单通道面积 {area} 的整数倍")]
  LengthMismatch { len: usize, area: usize },
  #[error("连接分数张量形状 {shape:?} 与数据长度 {len} 不匹配")]
  ShapeMismatch { shape: [usize; 3], len: usize },
}

/// 单通道二维平面，按 `row * width + col` 寻址
#[derive(Debug, Clone, Copy)]
pub struct PafPlane<'a> {
  data: &'a [f32],
  width: usize,
  height: usize,
}

impl PafPlane<'_> {
  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  /// 坐标会被截断到平面范围内
  pub fn at_clamped(&self, col: i32, row: i32) -> f32 {
    let col = col.clamp(0, self.width as i32 - 1) as usize;
    let row = row.clamp(0, self.height as i32 - 1) as usize;
    self.data[row * self.width + col]
  }
}

/// 网络输出的热图张量视图，通道优先：`[channel][row][col]`
///
/// 前 `parts + background` 个通道是关键点热图，之后是每条肢体的 x/y 亲和场。
#[derive(Debug, Clone, Copy)]
pub struct PafMap<'a> {
  data: &'a [f32],
  width: usize,
  height: usize,
}

impl<'a> PafMap<'a> {
  pub fn new(data: &'a [f32], width: usize, height: usize) -> Result<Self, AffinityError> {
    let area = match width.checked_mul(height) {
      Some(area) if area > 0 => area,
      _ => return Err(AffinityError::InvalidSize { width, height }),
    };
    if data.len() % area != 0 {
      return Err(AffinityError::LengthMismatch {
        len: data.len(),
        area,
      });
    }
    Ok(Self {
      data,
      width,
      height,
    })
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn channels(&self) -> usize {
    self.data.len() / (self.width * self.height)
  }

  pub fn plane(&self, channel: usize) -> Option<PafPlane<'a>> {
    let area = self.width * self.height;
    let start = channel.checked_mul(area)?;
    let data = self.data.get(start..start + area)?;
    Some(PafPlane {
      data,
      width: self.width,
      height: self.height,
    })
  }
}

/// 预计算的连接分数张量 `[limb][peak_a][peak_b]`，峰值下标从 0 开始
#[derive(Debug, Clone, Copy)]
pub struct PairScores<'a> {
  data: &'a [f32],
  shape: [usize; 3],
}

impl<'a> PairScores<'a> {
  pub fn new(data: &'a [f32], shape: [usize; 3]) -> Result<Self, AffinityError> {
    let len = shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim));
    if len != Some(data.len()) {
      return Err(AffinityError::ShapeMismatch {
        shape,
        len: data.len(),
      });
    }
    Ok(Self { data, shape })
  }

  pub fn shape(&self) -> [usize; 3] {
    self.shape
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn score(&self, limb: usize, a: usize, b: usize) -> Option<f32> {
    let [limbs, dim_a, dim_b] = self.shape;
    if limb >= limbs || a >= dim_a || b >= dim_b {
      return None;
    }
    Some(self.data[(limb * dim_a + a) * dim_b + b])
  }
}

/// 连接打分的来源：亲和场或预计算分数，二者互斥
#[derive(Debug, Clone, Copy)]
pub enum Affinity<'a> {
  Paf(PafMap<'a>),
  PairScores(PairScores<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PafBuffer {
  data: Box<[f32]>,
  width: usize,
  height: usize,
}

impl PafBuffer {
  pub fn from_raw(data: Vec<f32>, width: usize, height: usize) -> Result<Self, AffinityError> {
    PafMap::new(&data, width, height)?;
    Ok(Self {
      data: data.into_boxed_slice(),
      width,
      height,
    })
  }

  pub fn with_shape(channels: usize, width: usize, height: usize) -> Result<Self, AffinityError> {
    if width == 0 || height == 0 {
      return Err(AffinityError::InvalidSize { width, height });
    }
    let len = width
      .checked_mul(height)
      .and_then(|area| area.checked_mul(channels))
      .ok_or(AffinityError::InvalidSize { width, height })?;
    Ok(Self {
      data: vec![0.0; len].into_boxed_slice(),
      width,
      height,
    })
  }

  /// 可写的单通道平面
  pub fn plane_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
    let area = self.width * self.height;
    let start = channel.checked_mul(area)?;
    self.data.get_mut(start..start + area)
  }

  pub fn map(&self) -> PafMap<'_> {
    PafMap {
      data: &self.data,
      width: self.width,
      height: self.height,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairScoreBuffer {
  data: Box<[f32]>,
  shape: [usize; 3],
}

impl PairScoreBuffer {
  pub fn from_raw(data: Vec<f32>, shape: [usize; 3]) -> Result<Self, AffinityError> {
    PairScores::new(&data, shape)?;
    Ok(Self {
      data: data.into_boxed_slice(),
      shape,
    })
  }

  pub fn scores(&self) -> PairScores<'_> {
    PairScores {
      data: &self.data,
      shape: self.shape,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AffinityBuffer {
  Paf(PafBuffer),
  PairScores(PairScoreBuffer),
}

impl AffinityBuffer {
  pub fn view(&self) -> Affinity<'_> {
    match self {
      AffinityBuffer::Paf(buffer) => Affinity::Paf(buffer.map()),
      AffinityBuffer::PairScores(buffer) => Affinity::PairScores(buffer.scores()),
    }
  }
}

impl From<PafBuffer> for AffinityBuffer {
  fn from(buffer: PafBuffer) -> Self {
    AffinityBuffer::Paf(buffer)
  }
}

impl From<PairScoreBuffer> for AffinityBuffer {
  fn from(buffer: PairScoreBuffer) -> Self {
    AffinityBuffer::PairScores(buffer)
  }
}
