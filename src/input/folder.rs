// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input/folder.rs - 目录帧序列输入
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

use std::path::PathBuf;

use tracing::{error, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PoseFrame,
  input::json_file::{JsonFrameError, read_indexed},
};

/// 目录下所有 `*.json` 帧文件，按文件名顺序逐个读取
///
/// 没有写 `index` 的帧按读取顺序编号；无法解析的文件会被跳过。
pub struct FolderInput {
  files: std::vec::IntoIter<PathBuf>,
  next_index: u64,
}

impl FromUrlWithScheme for FolderInput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for FolderInput {
  type Error = JsonFrameError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!("URI 方案不匹配: 期望 '{}', 实际 '{}'", Self::SCHEME, url.scheme());
      return Err(JsonFrameError::SchemeMismatch);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(url.path())? {
      let path = entry?.path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
        files.push(path);
      }
    }
    files.sort();
    info!("目录 {} 下共有 {} 个帧文件", url.path(), files.len());

    Ok(FolderInput {
      files: files.into_iter(),
      next_index: 0,
    })
  }
}

impl Iterator for FolderInput {
  type Item = PoseFrame;

  fn next(&mut self) -> Option<Self::Item> {
    for path in self.files.by_ref() {
      let index = self.next_index;
      self.next_index += 1;
      match read_indexed(&path) {
        Ok((frame, explicit)) => return Some(frame.with_index(explicit.unwrap_or(index))),
        Err(e) => warn!("跳过无法读取的帧文件 {}: {}", path.display(), e),
      }
    }
    None
  }
}
