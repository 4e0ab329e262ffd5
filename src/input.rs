// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input.rs - 峰值表/亲和场帧输入
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

use crate::{FromUrl, FromUrlWithScheme, frame::PoseFrame};

mod folder;
mod json_file;

pub use self::folder::FolderInput;
pub use self::json_file::{JsonFileInput, JsonFrameError, parse_frame, read_frame};

#[derive(Error, Debug)]
pub enum InputError {
  #[error("JSON 帧输入错误: {0}")]
  JsonFrameError(#[from] JsonFrameError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum InputWrapper {
  JsonFile(JsonFileInput),
  Folder(FolderInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      JsonFileInput::SCHEME => Ok(InputWrapper::JsonFile(JsonFileInput::from_url(url)?)),
      FolderInput::SCHEME => Ok(InputWrapper::Folder(FolderInput::from_url(url)?)),
      _ => Err(InputError::SchemeMismatch),
    }
  }
}

impl Iterator for InputWrapper {
  type Item = PoseFrame;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::JsonFile(input) => input.next(),
      InputWrapper::Folder(input) => input.next(),
    }
  }
}
