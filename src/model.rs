// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model.rs - 模型
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

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Keypoint {
  pub x: f32,
  pub y: f32,
  pub score: f32,
}

/// 稠密关键点数组 `[people, parts, 3]` 以及每个人的置信度
///
/// 没有检测到人时形状为空，而不是 0 行的张量。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseKeypoints {
  data: Box<[f32]>,
  scores: Box<[f32]>,
  shape: Vec<usize>,
}

impl PoseKeypoints {
  pub fn empty() -> Self {
    Self::default()
  }

  pub(crate) fn with_people(number_people: usize, number_parts: usize) -> Self {
    if number_people == 0 {
      return Self::empty();
    }
    Self {
      data: vec![0.0; number_people * number_parts * 3].into_boxed_slice(),
      scores: vec![0.0; number_people].into_boxed_slice(),
      shape: vec![number_people, number_parts, 3],
    }
  }

  pub fn shape(&self) -> &[usize] {
    &self.shape
  }

  pub fn is_empty(&self) -> bool {
    self.shape.is_empty()
  }

  pub fn number_people(&self) -> usize {
    self.shape.first().copied().unwrap_or(0)
  }

  pub fn number_parts(&self) -> usize {
    self.shape.get(1).copied().unwrap_or(0)
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }

  pub fn scores(&self) -> &[f32] {
    &self.scores
  }

  pub fn keypoint(&self, person: usize, part: usize) -> Option<Keypoint> {
    if person >= self.number_people() || part >= self.number_parts() {
      return None;
    }
    let base = (person * self.number_parts() + part) * 3;
    Some(Keypoint {
      x: self.data[base],
      y: self.data[base + 1],
      score: self.data[base + 2],
    })
  }

  pub fn person(&self, person: usize) -> Option<Vec<Keypoint>> {
    if person >= self.number_people() {
      return None;
    }
    (0..self.number_parts())
      .map(|part| self.keypoint(person, part))
      .collect()
  }

  pub(crate) fn set_keypoint(&mut self, person: usize, part: usize, keypoint: Keypoint) {
    let base = (person * self.number_parts() + part) * 3;
    self.data[base] = keypoint.x;
    self.data[base + 1] = keypoint.y;
    self.data[base + 2] = keypoint.score;
  }

  pub(crate) fn set_score(&mut self, person: usize, score: f32) {
    self.scores[person] = score;
  }
}

/// 单帧的姿态组装结果
#[derive(Debug, Clone, PartialEq)]
pub struct PoseResult {
  pub model: BodyModel,
  pub frame_index: u64,
  pub keypoints: PoseKeypoints,
}

impl PoseResult {
  pub fn is_empty(&self) -> bool {
    self.keypoints.is_empty()
  }

  pub fn len(&self) -> usize {
    self.keypoints.number_people()
  }
}

mod body;
pub use self::body::{BodyModel, BodyModelParams, LimbPair};

mod openpose;
pub use self::openpose::{OPENPOSE_SCHEME, OpenPose, OpenPoseBuilder};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_people_resets_shape() {
    let keypoints = PoseKeypoints::with_people(0, 18);
    assert!(keypoints.is_empty());
    assert!(keypoints.shape().is_empty());
    assert!(keypoints.scores().is_empty());
    assert_eq!(keypoints.number_parts(), 0);
  }

  #[test]
  fn keypoints_are_row_major() {
    let mut keypoints = PoseKeypoints::with_people(2, 3);
    keypoints.set_keypoint(1, 2, Keypoint { x: 1.0, y: 2.0, score: 0.5 });
    keypoints.set_score(1, 0.25);
    assert_eq!(keypoints.shape(), &[2, 3, 3]);
    assert_eq!(&keypoints.as_slice()[15..18], &[1.0, 2.0, 0.5]);
    assert_eq!(keypoints.keypoint(1, 2), Some(Keypoint { x: 1.0, y: 2.0, score: 0.5 }));
    assert_eq!(keypoints.keypoint(0, 0), Some(Keypoint::default()));
    assert_eq!(keypoints.keypoint(2, 0), None);
    assert_eq!(keypoints.person(1).unwrap().len(), 3);
    assert_eq!(keypoints.scores(), &[0.0, 0.25]);
  }
}
