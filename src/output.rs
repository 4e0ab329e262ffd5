// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output.rs - 输出定义
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

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::frame::PoseFrame;
use crate::model::{Keypoint, PoseResult};
use crate::{FromUrl, FromUrlWithScheme};

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

mod json_file;
pub use self::json_file::{JsonFileOutput, JsonFileOutputError};

mod log_output;
pub use self::log_output::LogOutput;

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

/// 单个关键点的输出记录，未检测到的部位保留为全 0
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRecord {
  pub part: usize,
  pub name: &'static str,
  #[serde(flatten)]
  pub keypoint: Keypoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonOutput {
  pub score: f32,
  pub keypoints: Vec<PartRecord>,
}

/// 一帧结果的 JSON 表示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseRecord {
  pub model: &'static str,
  pub frame_index: u64,
  pub people: Vec<PersonOutput>,
}

impl From<&PoseResult> for PoseRecord {
  fn from(result: &PoseResult) -> Self {
    let params = result.model.params();
    let keypoints = &result.keypoints;
    let people = (0..keypoints.number_people())
      .map(|person| PersonOutput {
        score: keypoints.scores()[person],
        keypoints: keypoints
          .person(person)
          .unwrap_or_default()
          .into_iter()
          .enumerate()
          .map(|(part, keypoint)| PartRecord {
            part,
            name: params.part_name(part),
            keypoint,
          })
          .collect(),
      })
      .collect();

    PoseRecord {
      model: params.name,
      frame_index: result.frame_index,
      people,
    }
  }
}

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("JSON 文件输出错误: {0}")]
  JsonFileOutputError(#[from] JsonFileOutputError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  Log(LogOutput),
  JsonFile(JsonFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecord(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      LogOutput::SCHEME => Ok(OutputWrapper::Log(LogOutput::default())),
      JsonFileOutput::SCHEME => Ok(OutputWrapper::JsonFile(JsonFileOutput::from_url(url)?)),
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => Ok(OutputWrapper::DirectoryRecord(
        DirectoryRecordOutput::from_url(url)?,
      )),
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<PoseFrame, PoseResult> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &PoseFrame, result: &PoseResult) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::Log(output) => {
        output.render_result(frame, result).map_err(|never| match never {})
      }
      OutputWrapper::JsonFile(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecord(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{BodyModel, PoseKeypoints};

  #[test]
  fn record_names_every_part() {
    let result = PoseResult {
      model: BodyModel::Mpi15,
      frame_index: 9,
      keypoints: PoseKeypoints::empty(),
    };
    let record = PoseRecord::from(&result);
    assert_eq!(record.model, "MPI_15");
    assert_eq!(record.frame_index, 9);
    assert!(record.people.is_empty());

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["people"], serde_json::json!([]));
  }

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = Url::parse("rtsp://localhost/stream").unwrap();
    assert!(matches!(OutputWrapper::from_url(&url), Err(OutputError::SchemeMismatch)));
  }
}
