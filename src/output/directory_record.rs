// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use chrono::{DateTime, Datelike, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU16, Ordering};
use thiserror::Error;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PoseFrame,
  model::PoseResult,
  output::{
    Render,
    json_file::{JsonFileOutputError, write_record},
  },
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("记录写入错误: {0}")]
  RecordError(#[from] JsonFileOutputError),
}

/// 按日期分目录保存每帧的 JSON 记录
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: AtomicU16,
  always: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(uri.path()),
      frame_counter: AtomicU16::new(0),
      always,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }

  fn frame_path(&self, now: DateTime<Utc>) -> Result<PathBuf, DirectoryRecordOutputError> {
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!(
      "{}-{:04X}.json",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }
}

impl Render<PoseFrame, PoseResult> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, _frame: &PoseFrame, result: &PoseResult) -> Result<(), Self::Error> {
    if self.always || !result.is_empty() {
      let path = self.frame_path(Utc::now())?;
      write_record(&path, result)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    frame::{PairScoreBuffer, PeakBuffer},
    model::{BodyModel, PoseKeypoints},
  };

  fn empty_result() -> (PoseFrame, PoseResult) {
    let frame = PoseFrame::new(
      PeakBuffer::with_shape(18, 1).unwrap(),
      PairScoreBuffer::from_raw(vec![], [0, 0, 0]).unwrap(),
    );
    let result = PoseResult {
      model: BodyModel::Coco18,
      frame_index: 0,
      keypoints: PoseKeypoints::empty(),
    };
    (frame, result)
  }

  fn json_files(root: &std::path::Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
      for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
          pending.push(path);
        } else {
          files.push(path);
        }
      }
    }
    files
  }

  #[test]
  fn empty_frames_are_skipped_unless_always() {
    let dir = tempfile::tempdir().unwrap();
    let (frame, result) = empty_result();

    let url = url::Url::parse(&format!("folder://{}", dir.path().display())).unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    output.render_result(&frame, &result).unwrap();
    assert!(json_files(dir.path()).is_empty());

    let url = url::Url::parse(&format!("folder://{}?always", dir.path().display())).unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    output.render_result(&frame, &result).unwrap();
    output.render_result(&frame, &result).unwrap();
    let files = json_files(dir.path());
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|p| p.extension().is_some_and(|e| e == "json")));
  }

  #[test]
  fn records_are_grouped_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let url = url::Url::parse(&format!("folder://{}", dir.path().display())).unwrap();
    let output = DirectoryRecordOutput::from_url(&url).unwrap();
    let now = DateTime::parse_from_rfc3339("2026-03-04T05:06:07Z")
      .unwrap()
      .with_timezone(&Utc);
    let path = output.frame_path(now).unwrap();
    assert_eq!(path, dir.path().join("2026").join("03").join("04").join("05-06-07-0001.json"));
    let path = output.frame_path(now).unwrap();
    assert!(path.ends_with("05-06-07-0002.json"));
  }
}
