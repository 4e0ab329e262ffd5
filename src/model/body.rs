// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model/body.rs - 人体骨架拓扑定义
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

use std::{fmt, ops::Range, str::FromStr};

/// 支持的人体骨架拓扑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyModel {
  Body25,
  Coco18,
  Mpi15,
  Mpi15_4,
  /// 实验分支，不可用于组装
  Body25D,
}

impl BodyModel {
  pub const ALL: [BodyModel; 5] = [
    BodyModel::Body25,
    BodyModel::Coco18,
    BodyModel::Mpi15,
    BodyModel::Mpi15_4,
    BodyModel::Body25D,
  ];

  pub fn params(self) -> &'static BodyModelParams {
    match self {
      BodyModel::Body25 => &BODY_25,
      BodyModel::Coco18 => &COCO_18,
      BodyModel::Mpi15 => &MPI_15,
      BodyModel::Mpi15_4 => &MPI_15_4,
      BodyModel::Body25D => &BODY_25D,
    }
  }

  pub fn is_experimental(self) -> bool {
    matches!(self, BodyModel::Body25D)
  }

  pub fn name(self) -> &'static str {
    self.params().name
  }
}

impl fmt::Display for BodyModel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for BodyModel {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized: String = s
      .chars()
      .filter(|c| *c != '_' && *c != '-')
      .map(|c| c.to_ascii_lowercase())
      .collect();
    match normalized.as_str() {
      "body25" => Ok(BodyModel::Body25),
      "coco" | "coco18" => Ok(BodyModel::Coco18),
      "mpi" | "mpi15" => Ok(BodyModel::Mpi15),
      "mpi4" | "mpi154" => Ok(BodyModel::Mpi15_4),
      "body25d" => Ok(BodyModel::Body25D),
      _ => Err(s.to_string()),
    }
  }
}

/// 一条肢体连接：两个端点部位及其 x/y 亲和场通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimbPair {
  pub index: usize,
  pub part_a: usize,
  pub part_b: usize,
  pub paf_x: usize,
  pub paf_y: usize,
}

/// 骨架拓扑的常量表
///
/// `pairs` 的顺序决定组装顺序：第一条肢体初始化人物记录，之后的肢体依次挂接。
#[derive(Debug, Clone, PartialEq)]
pub struct BodyModelParams {
  pub name: &'static str,
  pub number_body_parts: usize,
  pub background: bool,
  pub pairs: &'static [(usize, usize)],
  pub paf_index: &'static [(usize, usize)],
  /// 侧视肢体（耳朵方向），只补空槽位，不计入部位数和分数
  pub side_pairs: &'static [usize],
  /// 一端为空时，已存在于某条记录中的峰值不再新建记录
  pub suppress_duplicates: bool,
  /// 不计入完整度的部位槽位（脚部、手部）
  pub completeness_excluded: &'static [Range<usize>],
  pub part_names: &'static [&'static str],
}

impl BodyModelParams {
  pub fn number_limb_pairs(&self) -> usize {
    self.pairs.len()
  }

  /// 热图通道数（部位 + 背景），亲和场通道从这里开始
  pub fn heatmap_channels(&self) -> usize {
    self.number_body_parts + usize::from(self.background)
  }

  pub fn is_root_pair(&self, index: usize) -> bool {
    index == 0
  }

  pub fn is_side_pair(&self, index: usize) -> bool {
    self.side_pairs.contains(&index)
  }

  pub fn is_completeness_excluded(&self, part: usize) -> bool {
    self.completeness_excluded.iter().any(|range| range.contains(&part))
  }

  /// 标准模型的有效部位数不可能小于 1
  pub fn is_standard(&self) -> bool {
    self.number_body_parts != 25 && self.number_body_parts < 70
  }

  pub fn limb_pairs(&self) -> impl Iterator<Item = LimbPair> + '_ {
    self
      .pairs
      .iter()
      .enumerate()
      .map(move |(index, &(part_a, part_b))| {
        let (paf_x, paf_y) = self.paf_index.get(index).copied().unwrap_or((2 * index, 2 * index + 1));
        LimbPair {
          index,
          part_a,
          part_b,
          paf_x: self.heatmap_channels() + paf_x,
          paf_y: self.heatmap_channels() + paf_y,
        }
      })
  }

  pub fn part_name(&self, part: usize) -> &'static str {
    self.part_names.get(part).copied().unwrap_or("Unknown")
  }
}

const BODY_25_PAIRS: [(usize, usize); 26] = [
  (1, 8),
  (1, 2),
  (1, 5),
  (2, 3),
  (3, 4),
  (5, 6),
  (6, 7),
  (8, 9),
  (9, 10),
  (10, 11),
  (8, 12),
  (12, 13),
  (13, 14),
  (1, 0),
  (0, 15),
  (15, 17),
  (0, 16),
  (16, 18),
  (2, 17),
  (5, 18),
  (14, 19),
  (19, 20),
  (14, 21),
  (11, 22),
  (22, 23),
  (11, 24),
];

const BODY_25_PAF_INDEX: [(usize, usize); 26] = [
  (0, 1),
  (14, 15),
  (22, 23),
  (16, 17),
  (18, 19),
  (24, 25),
  (26, 27),
  (6, 7),
  (2, 3),
  (4, 5),
  (8, 9),
  (10, 11),
  (12, 13),
  (30, 31),
  (32, 33),
  (36, 37),
  (34, 35),
  (38, 39),
  (20, 21),
  (28, 29),
  (40, 41),
  (42, 43),
  (44, 45),
  (46, 47),
  (48, 49),
  (50, 51),
];

const BODY_25_PARTS: [&str; 25] = [
  "Nose",
  "Neck",
  "RShoulder",
  "RElbow",
  "RWrist",
  "LShoulder",
  "LElbow",
  "LWrist",
  "MidHip",
  "RHip",
  "RKnee",
  "RAnkle",
  "LHip",
  "LKnee",
  "LAnkle",
  "REye",
  "LEye",
  "REar",
  "LEar",
  "LBigToe",
  "LSmallToe",
  "LHeel",
  "RBigToe",
  "RSmallToe",
  "RHeel",
];

const COCO_18_PAIRS: [(usize, usize); 19] = [
  (1, 2),
  (1, 5),
  (2, 3),
  (3, 4),
  (5, 6),
  (6, 7),
  (1, 8),
  (8, 9),
  (9, 10),
  (1, 11),
  (11, 12),
  (12, 13),
  (1, 0),
  (0, 14),
  (14, 16),
  (0, 15),
  (15, 17),
  (2, 16),
  (5, 17),
];

const COCO_18_PAF_INDEX: [(usize, usize); 19] = [
  (12, 13),
  (20, 21),
  (14, 15),
  (16, 17),
  (22, 23),
  (24, 25),
  (0, 1),
  (2, 3),
  (4, 5),
  (6, 7),
  (8, 9),
  (10, 11),
  (28, 29),
  (30, 31),
  (34, 35),
  (32, 33),
  (36, 37),
  (18, 19),
  (26, 27),
];

const COCO_18_PARTS: [&str; 18] = [
  "Nose",
  "Neck",
  "RShoulder",
  "RElbow",
  "RWrist",
  "LShoulder",
  "LElbow",
  "LWrist",
  "RHip",
  "RKnee",
  "RAnkle",
  "LHip",
  "LKnee",
  "LAnkle",
  "REye",
  "LEye",
  "REar",
  "LEar",
];

const MPI_15_PAIRS: [(usize, usize); 14] = [
  (0, 1),
  (1, 2),
  (2, 3),
  (3, 4),
  (1, 5),
  (5, 6),
  (6, 7),
  (1, 14),
  (14, 8),
  (8, 9),
  (9, 10),
  (14, 11),
  (11, 12),
  (12, 13),
];

const MPI_15_PAF_INDEX: [(usize, usize); 14] = [
  (0, 1),
  (2, 3),
  (4, 5),
  (6, 7),
  (8, 9),
  (10, 11),
  (12, 13),
  (14, 15),
  (16, 17),
  (18, 19),
  (20, 21),
  (22, 23),
  (24, 25),
  (26, 27),
];

const MPI_15_PARTS: [&str; 15] = [
  "Head",
  "Neck",
  "RShoulder",
  "RElbow",
  "RWrist",
  "LShoulder",
  "LElbow",
  "LWrist",
  "RHip",
  "RKnee",
  "RAnkle",
  "LHip",
  "LKnee",
  "LAnkle",
  "Chest",
];

const BODY_25_PARAMS: BodyModelParams = BodyModelParams {
  name: "BODY_25",
  number_body_parts: 25,
  background: true,
  pairs: &BODY_25_PAIRS,
  paf_index: &BODY_25_PAF_INDEX,
  side_pairs: &[18, 19],
  suppress_duplicates: true,
  completeness_excluded: &[19..25],
  part_names: &BODY_25_PARTS,
};

const MPI_15_PARAMS: BodyModelParams = BodyModelParams {
  name: "MPI_15",
  number_body_parts: 15,
  background: true,
  pairs: &MPI_15_PAIRS,
  paf_index: &MPI_15_PAF_INDEX,
  side_pairs: &[],
  suppress_duplicates: false,
  completeness_excluded: &[],
  part_names: &MPI_15_PARTS,
};

static BODY_25: BodyModelParams = BODY_25_PARAMS;

static BODY_25D: BodyModelParams = BodyModelParams {
  name: "BODY_25D",
  ..BODY_25_PARAMS
};

static COCO_18: BodyModelParams = BodyModelParams {
  name: "COCO_18",
  number_body_parts: 18,
  background: true,
  pairs: &COCO_18_PAIRS,
  paf_index: &COCO_18_PAF_INDEX,
  side_pairs: &[17, 18],
  suppress_duplicates: true,
  completeness_excluded: &[],
  part_names: &COCO_18_PARTS,
};

static MPI_15: BodyModelParams = MPI_15_PARAMS;

static MPI_15_4: BodyModelParams = BodyModelParams {
  name: "MPI_15_4",
  ..MPI_15_PARAMS
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tables_are_consistent() {
    for model in BodyModel::ALL {
      let params = model.params();
      assert_eq!(params.pairs.len(), params.paf_index.len(), "{model}");
      assert_eq!(params.part_names.len(), params.number_body_parts, "{model}");
      for &(a, b) in params.pairs {
        assert!(a < params.number_body_parts && b < params.number_body_parts, "{model}");
      }
    }
  }

  #[test]
  fn side_pairs_connect_shoulders_to_ears() {
    let body25 = BodyModel::Body25.params();
    assert_eq!(body25.pairs[18], (2, 17));
    assert_eq!(body25.pairs[19], (5, 18));
    assert!(body25.is_side_pair(18) && body25.is_side_pair(19));
    assert!(!body25.is_side_pair(17));

    let coco = BodyModel::Coco18.params();
    assert_eq!(coco.pairs[17], (2, 16));
    assert_eq!(coco.pairs[18], (5, 17));
    assert!(coco.is_side_pair(17) && coco.is_side_pair(18));

    assert!(BodyModel::Mpi15.params().side_pairs.is_empty());
  }

  #[test]
  fn limb_pairs_offset_paf_channels_after_heatmaps() {
    let coco = BodyModel::Coco18.params();
    let first = coco.limb_pairs().next().unwrap();
    assert_eq!(first.part_a, 1);
    assert_eq!(first.part_b, 2);
    assert_eq!(first.paf_x, 19 + 12);
    assert_eq!(first.paf_y, 19 + 13);
    assert!(coco.is_root_pair(first.index));
    assert_eq!(coco.limb_pairs().count(), 19);
  }

  #[test]
  fn parse_model_names() {
    assert_eq!("body25".parse::<BodyModel>(), Ok(BodyModel::Body25));
    assert_eq!("BODY_25".parse::<BodyModel>(), Ok(BodyModel::Body25));
    assert_eq!("coco".parse::<BodyModel>(), Ok(BodyModel::Coco18));
    assert_eq!("MPI_15_4".parse::<BodyModel>(), Ok(BodyModel::Mpi15_4));
    assert_eq!("body25d".parse::<BodyModel>(), Ok(BodyModel::Body25D));
    assert!("hand".parse::<BodyModel>().is_err());
    assert_eq!(BodyModel::Mpi15_4.to_string(), "MPI_15_4");
    assert_eq!(BodyModel::Body25D.to_string(), "BODY_25D");
  }

  #[test]
  fn foot_slots_are_excluded_only_for_body25() {
    let body25 = BodyModel::Body25.params();
    assert!(body25.is_completeness_excluded(19));
    assert!(body25.is_completeness_excluded(24));
    assert!(!body25.is_completeness_excluded(18));
    assert!(!body25.is_standard());
    assert!(BodyModel::Coco18.params().is_standard());
    assert!(!BodyModel::Coco18.params().is_completeness_excluded(10));
  }
}
