// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/log_output.rs - 日志输出
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

use std::convert::Infallible;

use tracing::{debug, info};

use crate::{FromUrl, FromUrlWithScheme, frame::PoseFrame, model::PoseResult, output::Render};

/// 把每个人的分数和检测到的部位写入日志
#[derive(Debug, Default)]
pub struct LogOutput;

impl FromUrlWithScheme for LogOutput {
  const SCHEME: &'static str = "log";
}

impl FromUrl for LogOutput {
  type Error = Infallible;

  fn from_url(_url: &url::Url) -> Result<Self, Self::Error> {
    Ok(LogOutput)
  }
}

impl Render<PoseFrame, PoseResult> for LogOutput {
  type Error = Infallible;

  fn render_result(&self, frame: &PoseFrame, result: &PoseResult) -> Result<(), Self::Error> {
    info!("第 {} 帧: {} 人", frame.index, result.len());
    let params = result.model.params();
    for person in 0..result.keypoints.number_people() {
      let Some(keypoints) = result.keypoints.person(person) else {
        continue;
      };
      let detected = keypoints.iter().filter(|k| k.score > 0.0).count();
      info!(
        "  - 人物 {}: 分数 {:.4}, 部位 {}/{}",
        person,
        result.keypoints.scores()[person],
        detected,
        keypoints.len()
      );
      for (part, keypoint) in keypoints.iter().enumerate().filter(|(_, k)| k.score > 0.0) {
        debug!(
          "      {}: ({:.1}, {:.1}) {:.3}",
          params.part_name(part),
          keypoint.x,
          keypoint.y,
          keypoint.score
        );
      }
    }
    Ok(())
  }
}
