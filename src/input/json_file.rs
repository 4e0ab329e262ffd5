// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input/json_file.rs - JSON 帧文件输入
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

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{AffinityBuffer, AffinityError, PafBuffer, PairScoreBuffer, Peak, PeakBuffer, PeakTableError, PoseFrame},
};

#[derive(Error, Debug)]
pub enum JsonFrameError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 解析错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("峰值表错误: {0}")]
  PeakTableError(#[from] PeakTableError),
  #[error("亲和场错误: {0}")]
  AffinityError(#[from] AffinityError),
  #[error("帧文件必须恰好包含 heatmaps 或 pair_scores 之一")]
  AffinitySource,
}

#[derive(Debug, Deserialize)]
struct HeatmapsDocument {
  width: usize,
  height: usize,
  data: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct PairScoresDocument {
  shape: [usize; 3],
  data: Vec<f32>,
}

/// 帧文件中每个部位允许的峰值上限
pub const MAX_DOCUMENT_PEAKS: usize = 4096;

/// 磁盘上的帧格式
#[derive(Debug, Deserialize)]
struct FrameDocument {
  #[serde(default)]
  index: Option<u64>,
  #[serde(default)]
  max_peaks: Option<usize>,
  peaks: Vec<Vec<[f32; 3]>>,
  #[serde(default)]
  heatmaps: Option<HeatmapsDocument>,
  #[serde(default)]
  pair_scores: Option<PairScoresDocument>,
}

impl FrameDocument {
  /// 返回帧以及文件中显式给出的编号
  fn into_parts(self) -> Result<(PoseFrame, Option<u64>), JsonFrameError> {
    let number_parts = self.peaks.len();
    let longest = self.peaks.iter().map(Vec::len).max().unwrap_or(0);
    let max_peaks = self.max_peaks.unwrap_or(longest);
    if max_peaks > MAX_DOCUMENT_PEAKS {
      return Err(
        PeakTableError::TooManyPeaks {
          max_peaks,
          limit: MAX_DOCUMENT_PEAKS,
        }
        .into(),
      );
    }

    let mut peaks = PeakBuffer::with_shape(number_parts, max_peaks)?;
    for (part, candidates) in self.peaks.iter().enumerate() {
      for &[x, y, score] in candidates {
        peaks.push(part, Peak::new(x, y, score))?;
      }
    }

    let affinity: AffinityBuffer = match (self.heatmaps, self.pair_scores) {
      (Some(maps), None) => PafBuffer::from_raw(maps.data, maps.width, maps.height)?.into(),
      (None, Some(scores)) => PairScoreBuffer::from_raw(scores.data, scores.shape)?.into(),
      _ => return Err(JsonFrameError::AffinitySource),
    };

    Ok((PoseFrame::new(peaks, affinity), self.index))
  }
}

/// 解析帧文件，未给出编号时帧编号为 0
pub fn parse_frame(text: &str) -> Result<PoseFrame, JsonFrameError> {
  let (frame, index) = parse_indexed(text)?;
  Ok(frame.with_index(index.unwrap_or(0)))
}

pub(crate) fn parse_indexed(text: &str) -> Result<(PoseFrame, Option<u64>), JsonFrameError> {
  let document: FrameDocument = serde_json::from_str(text)?;
  document.into_parts()
}

pub(crate) fn read_indexed(path: &Path) -> Result<(PoseFrame, Option<u64>), JsonFrameError> {
  debug!("读取帧文件: {}", path.display());
  let text = std::fs::read_to_string(path)?;
  parse_indexed(&text)
}

pub fn read_frame(path: &Path) -> Result<PoseFrame, JsonFrameError> {
  let (frame, index) = read_indexed(path)?;
  Ok(frame.with_index(index.unwrap_or(0)))
}

/// 单个 JSON 帧文件，只产生一帧
pub struct JsonFileInput {
  frame: Option<PoseFrame>,
}

impl FromUrlWithScheme for JsonFileInput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonFileInput {
  type Error = JsonFrameError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!("URI 方案不匹配: 期望 '{}', 实际 '{}'", Self::SCHEME, url.scheme());
      return Err(JsonFrameError::SchemeMismatch);
    }

    let frame = read_frame(Path::new(url.path()))?;
    Ok(JsonFileInput { frame: Some(frame) })
  }
}

impl Iterator for JsonFileInput {
  type Item = PoseFrame;

  fn next(&mut self) -> Option<Self::Item> {
    self.frame.take()
  }
}
