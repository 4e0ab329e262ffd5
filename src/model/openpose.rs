// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model/openpose.rs - OpenPose 身体部位连接模型
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

use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  config::ConnectorConfig,
  connector::{ConnectorError, connect_body_parts},
  frame::PoseFrame,
  model::{BodyModel, Model, PoseResult},
};

pub const OPENPOSE_SCHEME: &str = "openpose";

pub struct OpenPoseBuilder {
  model: BodyModel,
  config: ConnectorConfig,
}

impl FromUrlWithScheme for OpenPoseBuilder {
  const SCHEME: &'static str = OPENPOSE_SCHEME;
}

impl FromUrl for OpenPoseBuilder {
  type Error = ConnectorError;

  /// `openpose://body25?maximize_positives&scale=2`，模型名也可以写在路径里
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != OPENPOSE_SCHEME {
      error!("模型地址必须使用 {} 方案: {}", OPENPOSE_SCHEME, url);
      return Err(ConnectorError::UnsupportedModel(url.to_string()));
    }

    let name = url
      .host_str()
      .filter(|host| !host.is_empty())
      .unwrap_or_else(|| url.path().trim_matches('/'));
    let model: BodyModel = name.parse().map_err(ConnectorError::UnsupportedModel)?;
    let config = ConnectorConfig::from_query(url)?;

    Ok(Self { model, config })
  }
}

impl OpenPoseBuilder {
  pub fn new(model: BodyModel) -> Self {
    Self {
      model,
      config: ConnectorConfig::default(),
    }
  }

  pub fn config(mut self, config: ConnectorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Result<OpenPose, ConnectorError> {
    if self.model.is_experimental() {
      error!("身体模型 {} 仍处于实验阶段", self.model);
      return Err(ConnectorError::ExperimentalModel(self.model));
    }
    self.config.validate()?;

    let params = self.model.params();
    info!(
      "加载身体模型 {}: {} 个部位, {} 条肢体",
      params.name,
      params.number_body_parts,
      params.number_limb_pairs()
    );
    debug!("连接参数: {:?}", self.config);

    Ok(OpenPose {
      model: self.model,
      config: self.config,
    })
  }
}

/// 把峰值表和亲和场组装成人体姿态
#[derive(Debug, Clone)]
pub struct OpenPose {
  model: BodyModel,
  config: ConnectorConfig,
}

impl OpenPose {
  pub fn body_model(&self) -> BodyModel {
    self.model
  }

  pub fn config(&self) -> &ConnectorConfig {
    &self.config
  }
}

impl Model for OpenPose {
  type Input = PoseFrame;
  type Output = PoseResult;
  type Error = ConnectorError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let keypoints = connect_body_parts(self.model, &input.peaks(), &input.affinity(), &self.config)?;
    Ok(PoseResult {
      model: self.model,
      frame_index: input.index,
      keypoints,
    })
  }
}
