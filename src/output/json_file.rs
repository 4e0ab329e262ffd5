// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/json_file.rs - JSON 文件输出
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PoseFrame,
  model::PoseResult,
  output::{PoseRecord, Render},
};

#[derive(Error, Debug)]
pub enum JsonFileOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 每帧覆盖写入同一个文件，保留最新一帧的结果
pub struct JsonFileOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for JsonFileOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonFileOutput {
  type Error = JsonFileOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!("URI 方案不匹配: 期望 '{}', 实际 '{}'", Self::SCHEME, url.scheme());
      return Err(JsonFileOutputError::SchemeMismatch);
    }
    Ok(JsonFileOutput {
      path: PathBuf::from(url.path()),
    })
  }
}

impl JsonFileOutput {
  pub fn path(&self) -> &Path {
    &self.path
  }
}

pub(crate) fn write_record(path: &Path, result: &PoseResult) -> Result<(), JsonFileOutputError> {
  let record = PoseRecord::from(result);
  let text = serde_json::to_string_pretty(&record)?;
  std::fs::write(path, text)?;
  debug!("结果已写入 {}", path.display());
  Ok(())
}

impl Render<PoseFrame, PoseResult> for JsonFileOutput {
  type Error = JsonFileOutputError;

  fn render_result(&self, _frame: &PoseFrame, result: &PoseResult) -> Result<(), Self::Error> {
    write_record(&self.path, result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    frame::{PairScoreBuffer, Peak, PeakBuffer},
    model::{BodyModel, Model, OpenPoseBuilder},
  };

  #[test]
  fn detected_people_are_written_as_json() {
    // MPI_15 的 头-脖子 与 脖子-右肩 两条肢体
    let params = BodyModel::Mpi15.params();
    let mut peaks = PeakBuffer::with_shape(15, 1).unwrap();
    peaks.push(0, Peak::new(5.0, 1.0, 0.9)).unwrap();
    peaks.push(1, Peak::new(5.0, 4.0, 0.9)).unwrap();
    peaks.push(2, Peak::new(3.0, 4.0, 0.9)).unwrap();
    let limbs = params.number_limb_pairs();
    let mut data = vec![0.0; limbs];
    for limb in params.limb_pairs() {
      if matches!((limb.part_a, limb.part_b), (0, 1) | (1, 2)) {
        data[limb.index] = 1.0;
      }
    }
    let frame = PoseFrame::new(peaks, PairScoreBuffer::from_raw(data, [limbs, 1, 1]).unwrap()).with_index(5);
    let result = OpenPoseBuilder::new(BodyModel::Mpi15).build().unwrap().infer(&frame).unwrap();
    assert_eq!(result.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latest.json");
    let url = Url::parse(&format!("json://{}", path.display())).unwrap();
    let output = JsonFileOutput::from_url(&url).unwrap();
    output.render_result(&frame, &result).unwrap();

    let text = std::fs::read_to_string(output.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["model"], "MPI_15");
    assert_eq!(json["frame_index"], 5);
    let person = &json["people"][0];
    assert_eq!(person["keypoints"].as_array().unwrap().len(), 15);
    assert_eq!(person["keypoints"][0]["name"], "Head");
    assert_eq!(person["keypoints"][2]["x"], 3.0);
    assert_eq!(person["keypoints"][3]["score"], 0.0);
  }

  #[test]
  fn wrong_scheme_is_rejected() {
    let url = Url::parse("folder:///tmp").unwrap();
    assert!(matches!(
      JsonFileOutput::from_url(&url),
      Err(JsonFileOutputError::SchemeMismatch)
    ));
  }
}
