// 该文件是 Shanan （山南西风） 项目的一部分。
// src/connector/people.rs - 候选连接匹配与人物聚类
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

use std::cmp::Ordering;

use tracing::{debug, error};

use crate::{
  config::ConnectorConfig,
  connector::{ConnectorError, score::score_connection},
  frame::{Affinity, PeakRef, PeakTable},
  model::{BodyModelParams, LimbPair},
};

const MIN_CONNECTION_SCORE: f32 = 1e-6;

/// 一个候选人物：每个部位槽位指向峰值表中的一个峰值
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
  parts: Vec<Option<PeakRef>>,
  count: usize,
  score: f32,
}

impl PersonRecord {
  fn new(number_body_parts: usize) -> Self {
    Self {
      parts: vec![None; number_body_parts],
      count: 0,
      score: 0.0,
    }
  }

  pub(crate) fn single(number_body_parts: usize, part: usize, peak: PeakRef, confidence: f32) -> Self {
    let mut record = Self::new(number_body_parts);
    record.parts[part] = Some(peak);
    record.count = 1;
    record.score = confidence;
    record
  }

  fn pair(number_body_parts: usize, limb: &LimbPair, connection: &Connection) -> Self {
    let mut record = Self::new(number_body_parts);
    record.parts[limb.part_a] = Some(connection.a);
    record.parts[limb.part_b] = Some(connection.b);
    record.count = 2;
    record.score = connection.confidence_a + connection.confidence_b + connection.score;
    record
  }

  pub fn part(&self, part: usize) -> Option<PeakRef> {
    self.parts.get(part).copied().flatten()
  }

  pub fn parts(&self) -> &[Option<PeakRef>] {
    &self.parts
  }

  /// 通过连接逻辑加入的部位个数
  pub fn count(&self) -> usize {
    self.count
  }

  pub fn score(&self) -> f32 {
    self.score
  }

  #[cfg(test)]
  pub(crate) fn from_parts(parts: Vec<Option<PeakRef>>, count: usize, score: f32) -> Self {
    Self { parts, count, score }
  }
}

/// 候选边 `(score, a, b)`，峰值下标从 1 开始
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEdge {
  pub score: f32,
  pub a: usize,
  pub b: usize,
}

impl CandidateEdge {
  /// 分数降序；同分时按 a 降序、再按 b 降序
  pub fn descending(lhs: &Self, rhs: &Self) -> Ordering {
    rhs
      .score
      .total_cmp(&lhs.score)
      .then(rhs.a.cmp(&lhs.a))
      .then(rhs.b.cmp(&lhs.b))
  }
}

/// 已接受的连接
#[derive(Debug, Clone, Copy, PartialEq)]
struct Connection {
  a: PeakRef,
  b: PeakRef,
  confidence_a: f32,
  confidence_b: f32,
  score: f32,
}

/// 按模型的肢体顺序把候选峰值聚成人物记录
///
/// 默认 (`keep_unmatched_parts == false`) 下，两端都有峰值但未被接受的峰值会被丢弃，
/// 不生成单部位记录；打开 `keep_unmatched_parts` 后它们各自成为单部位记录。
/// 两种模式在 `min_subset_cnt >= 2` 时的最终输出相同。
pub fn build_people(
  peaks: &PeakTable<'_>,
  affinity: &Affinity<'_>,
  params: &BodyModelParams,
  config: &ConnectorConfig,
) -> Result<Vec<PersonRecord>, ConnectorError> {
  let mut people: Vec<PersonRecord> = Vec::new();

  for limb in params.limb_pairs() {
    let count_a = peaks.count(limb.part_a);
    let count_b = peaks.count(limb.part_b);

    if count_a == 0 && count_b == 0 {
      continue;
    }
    if count_a == 0 {
      add_singletons(&mut people, peaks, params, limb.part_b, count_b, &[])?;
      continue;
    }
    if count_b == 0 {
      add_singletons(&mut people, peaks, params, limb.part_a, count_a, &[])?;
      continue;
    }

    let mut candidates = candidate_edges(peaks, affinity, &limb, count_a, count_b, config)?;
    candidates.sort_by(CandidateEdge::descending);
    let connections = select_connections(peaks, &limb, &candidates, count_a, count_b)?;
    debug!(
      "肢体 {} ({}-{}): {} 条候选连接, 接受 {} 条",
      limb.index,
      limb.part_a,
      limb.part_b,
      candidates.len(),
      connections.len()
    );

    if params.is_root_pair(limb.index) {
      people.extend(
        connections
          .iter()
          .map(|c| PersonRecord::pair(params.number_body_parts, &limb, c)),
      );
    } else if params.is_side_pair(limb.index) {
      fill_side_pair(&mut people, &limb, &connections);
    } else {
      attach_connections(&mut people, params, &limb, &connections);
    }

    if config.keep_unmatched_parts {
      let matched_a: Vec<PeakRef> = connections.iter().map(|c| c.a).collect();
      let matched_b: Vec<PeakRef> = connections.iter().map(|c| c.b).collect();
      add_singletons(&mut people, peaks, params, limb.part_a, count_a, &matched_a)?;
      add_singletons(&mut people, peaks, params, limb.part_b, count_b, &matched_b)?;
    }
  }

  debug!("共生成 {} 条人物记录", people.len());
  Ok(people)
}

/// 把部位 `part` 中未出现在 `matched` 里的峰值各自作为单部位记录加入
fn add_singletons(
  people: &mut Vec<PersonRecord>,
  peaks: &PeakTable<'_>,
  params: &BodyModelParams,
  part: usize,
  count: usize,
  matched: &[PeakRef],
) -> Result<(), ConnectorError> {
  for index in 1..=count {
    let peak = peaks
      .peak_ref(part, index)
      .ok_or(ConnectorError::InvalidPeakRef { part, index })?;
    if matched.contains(&peak) {
      continue;
    }
    if params.suppress_duplicates && people.iter().any(|person| person.part(part) == Some(peak)) {
      continue;
    }
    let confidence = confidence(peaks, peak, part, index)?;
    people.push(PersonRecord::single(params.number_body_parts, part, peak, confidence));
  }
  Ok(())
}

fn candidate_edges(
  peaks: &PeakTable<'_>,
  affinity: &Affinity<'_>,
  limb: &LimbPair,
  count_a: usize,
  count_b: usize,
  config: &ConnectorConfig,
) -> Result<Vec<CandidateEdge>, ConnectorError> {
  let mut candidates = Vec::new();
  match affinity {
    Affinity::Paf(map) => {
      let plane = |channel: usize| {
        map.plane(channel).ok_or_else(|| {
          error!("肢体 {} 缺少亲和场通道 {}", limb.index, channel);
          ConnectorError::MissingAffinityChannel {
            limb: limb.index,
            channel,
          }
        })
      };
      let map_x = plane(limb.paf_x)?;
      let map_y = plane(limb.paf_y)?;
      for i in 1..=count_a {
        let peak_a = peaks
          .peak(limb.part_a, i)
          .ok_or(ConnectorError::InvalidPeakRef { part: limb.part_a, index: i })?;
        for j in 1..=count_b {
          let peak_b = peaks
            .peak(limb.part_b, j)
            .ok_or(ConnectorError::InvalidPeakRef { part: limb.part_b, index: j })?;
          let score = score_connection(
            peak_a,
            peak_b,
            map_x,
            map_y,
            config.inter_threshold,
            config.inter_min_above_threshold,
          );
          if score > MIN_CONNECTION_SCORE {
            candidates.push(CandidateEdge { score, a: i, b: j });
          }
        }
      }
    }
    Affinity::PairScores(scores) => {
      for i in 1..=count_a {
        for j in 1..=count_b {
          let score = scores.score(limb.index, i - 1, j - 1).ok_or_else(|| {
            error!(
              "连接分数张量形状 {:?} 无法容纳肢体 {} 的峰值 ({}, {})",
              scores.shape(),
              limb.index,
              i,
              j
            );
            ConnectorError::PairScoresShape {
              shape: scores.shape(),
              limb: limb.index,
            }
          })?;
          if score > MIN_CONNECTION_SCORE {
            candidates.push(CandidateEdge { score, a: i, b: j });
          }
        }
      }
    }
  }
  Ok(candidates)
}

/// 贪心地一对一接受候选边，最多 `min(count_a, count_b)` 条
///
/// `candidates` 必须已经按 [`CandidateEdge::descending`] 排序。
fn select_connections(
  peaks: &PeakTable<'_>,
  limb: &LimbPair,
  candidates: &[CandidateEdge],
  count_a: usize,
  count_b: usize,
) -> Result<Vec<Connection>, ConnectorError> {
  let limit = count_a.min(count_b);
  let mut used_a = vec![false; count_a];
  let mut used_b = vec![false; count_b];
  let mut connections = Vec::with_capacity(limit);

  for edge in candidates {
    if connections.len() == limit {
      break;
    }
    if used_a[edge.a - 1] || used_b[edge.b - 1] {
      continue;
    }
    let a = peaks
      .peak_ref(limb.part_a, edge.a)
      .ok_or(ConnectorError::InvalidPeakRef { part: limb.part_a, index: edge.a })?;
    let b = peaks
      .peak_ref(limb.part_b, edge.b)
      .ok_or(ConnectorError::InvalidPeakRef { part: limb.part_b, index: edge.b })?;
    connections.push(Connection {
      a,
      b,
      confidence_a: confidence(peaks, a, limb.part_a, edge.a)?,
      confidence_b: confidence(peaks, b, limb.part_b, edge.b)?,
      score: edge.score,
    });
    used_a[edge.a - 1] = true;
    used_b[edge.b - 1] = true;
  }
  Ok(connections)
}

/// 侧视肢体只补全空缺的一端，部位数和分数保持不变
fn fill_side_pair(people: &mut [PersonRecord], limb: &LimbPair, connections: &[Connection]) {
  for connection in connections {
    for person in people.iter_mut() {
      let slot_a = person.parts[limb.part_a];
      let slot_b = person.parts[limb.part_b];
      if slot_a == Some(connection.a) && slot_b.is_none() {
        person.parts[limb.part_b] = Some(connection.b);
      } else if slot_b == Some(connection.b) && slot_a.is_none() {
        person.parts[limb.part_a] = Some(connection.a);
      }
    }
  }
}

/// A 端已在某条记录中时把 B 挂上去，否则新建记录
fn attach_connections(
  people: &mut Vec<PersonRecord>,
  params: &BodyModelParams,
  limb: &LimbPair,
  connections: &[Connection],
) {
  for connection in connections {
    match people
      .iter_mut()
      .find(|person| person.parts[limb.part_a] == Some(connection.a))
    {
      Some(person) => {
        person.parts[limb.part_b] = Some(connection.b);
        person.count += 1;
        person.score += connection.confidence_b + connection.score;
      }
      None => people.push(PersonRecord::pair(params.number_body_parts, limb, connection)),
    }
  }
}

fn confidence(peaks: &PeakTable<'_>, peak: PeakRef, part: usize, index: usize) -> Result<f32, ConnectorError> {
  peaks
    .score(peak)
    .ok_or(ConnectorError::InvalidPeakRef { part, index })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    frame::{PafBuffer, Peak, PeakBuffer, PairScoreBuffer},
    model::BodyModel,
  };

  static TWO_LIMBS: BodyModelParams = TWO_LIMBS_CONST;

  static SIDE_LIMB: BodyModelParams = BodyModelParams {
    side_pairs: &[1],
    ..TWO_LIMBS_CONST
  };

  static ONE_LIMB: BodyModelParams = BodyModelParams {
    number_body_parts: 2,
    pairs: &[(0, 1)],
    paf_index: &[(0, 1)],
    part_names: &["A", "B"],
    ..TWO_LIMBS_CONST
  };

  static LEGACY_15: BodyModelParams = BodyModelParams {
    suppress_duplicates: false,
    ..TWO_LIMBS_CONST
  };

  const TWO_LIMBS_CONST: BodyModelParams = BodyModelParams {
    name: "TEST",
    number_body_parts: 3,
    background: false,
    pairs: &[(0, 1), (1, 2)],
    paf_index: &[(0, 1), (2, 3)],
    side_pairs: &[],
    suppress_duplicates: true,
    completeness_excluded: &[],
    part_names: &["A", "B", "C"],
  };

  fn config() -> ConnectorConfig {
    ConnectorConfig::default()
  }

  /// 三个热图通道之后是两条肢体的亲和场，x 方向均为 `strength`
  fn horizontal_paf(width: usize, height: usize, strength: f32) -> PafBuffer {
    let mut buffer = PafBuffer::with_shape(7, width, height).unwrap();
    buffer.plane_mut(3).unwrap().fill(strength);
    buffer.plane_mut(5).unwrap().fill(strength);
    buffer
  }

  #[test]
  fn single_limb_with_strong_field_creates_one_person() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    let a = peaks.push(0, Peak::new(2.0, 5.0, 0.9)).unwrap();
    let b = peaks.push(1, Peak::new(10.0, 5.0, 0.8)).unwrap();
    let paf = horizontal_paf(16, 16, 0.7);
    let people = build_people(
      &peaks.table(),
      &Affinity::Paf(paf.map()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people[0].count(), 2);
    assert_eq!(people[0].part(0), Some(a));
    assert_eq!(people[0].part(1), Some(b));
    assert_eq!(people[0].part(2), None);
    assert!((people[0].score() - (0.9 + 0.8 + 0.7)).abs() < 1e-5);
  }

  #[test]
  fn weak_field_leaves_parts_unconnected() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    let a = peaks.push(0, Peak::new(2.0, 5.0, 0.9)).unwrap();
    let b = peaks.push(1, Peak::new(10.0, 5.0, 0.8)).unwrap();
    // 点积 0.01 低于 inter_threshold 0.05
    let paf = horizontal_paf(16, 16, 0.01);
    let people = build_people(
      &peaks.table(),
      &Affinity::Paf(paf.map()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    // 第一条肢体没有候选边；第二条肢体 C 端为空，B 单独成记录
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].part(1), Some(b));
    assert_eq!(people[0].count(), 1);
    assert!(people.iter().all(|p| p.part(0) != Some(a)));
  }

  #[test]
  fn empty_endpoint_adds_each_peak_once() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    let b1 = peaks.push(1, Peak::new(1.0, 1.0, 0.5)).unwrap();
    let b2 = peaks.push(1, Peak::new(5.0, 1.0, 0.6)).unwrap();
    let paf = horizontal_paf(8, 8, 0.0);
    let people = build_people(
      &peaks.table(),
      &Affinity::Paf(paf.map()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    // B 在两条肢体中都出现，但去重后只有两条记录
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].part(1), Some(b1));
    assert_eq!(people[1].part(1), Some(b2));
    assert_eq!(people[1].score(), 0.6);

    let legacy = build_people(
      &peaks.table(),
      &Affinity::Paf(paf.map()),
      &LEGACY_15,
      &config(),
    )
    .unwrap();
    assert_eq!(legacy.len(), 4);
  }

  #[test]
  fn greedy_matching_keeps_best_edge() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    let a1 = peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    let a2 = peaks.push(0, Peak::new(0.0, 1.0, 0.5)).unwrap();
    let b1 = peaks.push(1, Peak::new(0.0, 2.0, 0.5)).unwrap();
    // [limb][a][b]
    let scores = PairScoreBuffer::from_raw(vec![0.9, 0.95, 0.0, 0.0], [2, 2, 1]).unwrap();
    let people = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    // min(2, 1) = 1，只接受 0.95 的边 (a2, b1)
    let connected: Vec<_> = people.iter().filter(|p| p.count() == 2).collect();
    assert_eq!(connected.len(), 1);
    assert_eq!(connected[0].part(0), Some(a2));
    assert_eq!(connected[0].part(1), Some(b1));
    assert!((connected[0].score() - (0.5 + 0.5 + 0.95)).abs() < 1e-6);
    assert!(people.iter().all(|p| p.part(0) != Some(a1)));
  }

  #[test]
  fn equal_scores_prefer_higher_peak_indices() {
    let mut candidates = vec![
      CandidateEdge { score: 0.5, a: 1, b: 1 },
      CandidateEdge { score: 0.5, a: 2, b: 1 },
      CandidateEdge { score: 0.5, a: 2, b: 2 },
      CandidateEdge { score: 0.7, a: 1, b: 2 },
    ];
    candidates.sort_by(CandidateEdge::descending);
    let order: Vec<_> = candidates.iter().map(|e| (e.a, e.b)).collect();
    assert_eq!(order, vec![(1, 2), (2, 2), (2, 1), (1, 1)]);
  }

  #[test]
  fn later_limb_attaches_to_existing_person() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(1, Peak::new(0.0, 1.0, 0.6)).unwrap();
    let c = peaks.push(2, Peak::new(0.0, 2.0, 0.7)).unwrap();
    let scores = PairScoreBuffer::from_raw(vec![0.8, 0.9], [2, 1, 1]).unwrap();
    let people = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people[0].count(), 3);
    assert_eq!(people[0].part(2), Some(c));
    assert!((people[0].score() - (0.5 + 0.6 + 0.8 + 0.7 + 0.9)).abs() < 1e-5);
  }

  #[test]
  fn side_limb_fills_slot_without_counting() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(1, Peak::new(0.0, 1.0, 0.6)).unwrap();
    let c = peaks.push(2, Peak::new(0.0, 2.0, 0.7)).unwrap();
    let scores = PairScoreBuffer::from_raw(vec![0.8, 0.9], [2, 1, 1]).unwrap();
    let people = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &SIDE_LIMB,
      &config(),
    )
    .unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people[0].part(2), Some(c));
    assert_eq!(people[0].count(), 2);
    assert!((people[0].score() - (0.5 + 0.6 + 0.8)).abs() < 1e-5);
  }

  #[test]
  fn unmatched_connection_starts_new_person() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(1, Peak::new(0.0, 1.0, 0.6)).unwrap();
    peaks.push(1, Peak::new(5.0, 1.0, 0.6)).unwrap();
    let c = peaks.push(2, Peak::new(5.0, 2.0, 0.7)).unwrap();
    // 第一条肢体只连 (a1, b1)；第二条肢体只连 (b2, c1)
    let scores =
      PairScoreBuffer::from_raw(vec![0.8, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.0], [2, 2, 2]).unwrap();
    let people = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &TWO_LIMBS,
      &config(),
    )
    .unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(people[0].count(), 2);
    assert_eq!(people[1].count(), 2);
    assert_eq!(people[1].part(2), Some(c));
    assert_eq!(people[1].part(0), None);
  }

  #[test]
  fn undersized_pair_scores_are_reported() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(0, Peak::new(1.0, 0.0, 0.5)).unwrap();
    peaks.push(1, Peak::new(0.0, 1.0, 0.6)).unwrap();
    let scores = PairScoreBuffer::from_raw(vec![0.8, 0.9], [2, 1, 1]).unwrap();
    let result = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &TWO_LIMBS,
      &config(),
    );
    assert!(matches!(
      result,
      Err(ConnectorError::PairScoresShape { limb: 0, .. })
    ));
  }

  #[test]
  fn missing_paf_channel_is_reported() {
    let mut peaks = PeakBuffer::with_shape(25, 2).unwrap();
    peaks.push(1, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(8, Peak::new(0.0, 4.0, 0.5)).unwrap();
    let paf = PafBuffer::with_shape(4, 8, 8).unwrap();
    let result = build_people(
      &peaks.table(),
      &Affinity::Paf(paf.map()),
      BodyModel::Body25.params(),
      &config(),
    );
    assert!(matches!(
      result,
      Err(ConnectorError::MissingAffinityChannel { limb: 0, channel: 26 })
    ));
  }

  #[test]
  fn unmatched_peaks_are_kept_when_enabled() {
    let mut peaks = PeakBuffer::with_shape(2, 4).unwrap();
    let a = peaks.push(0, Peak::new(2.0, 5.0, 0.9)).unwrap();
    let b = peaks.push(1, Peak::new(10.0, 5.0, 0.8)).unwrap();
    let scores = PairScoreBuffer::from_raw(vec![0.0], [1, 1, 1]).unwrap();
    let affinity = Affinity::PairScores(scores.scores());

    let legacy = build_people(&peaks.table(), &affinity, &ONE_LIMB, &config()).unwrap();
    assert!(legacy.is_empty());

    let mut keep = config();
    keep.keep_unmatched_parts = true;
    let people = build_people(&peaks.table(), &affinity, &ONE_LIMB, &keep).unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].part(0), Some(a));
    assert_eq!(people[1].part(1), Some(b));
    assert!(people.iter().all(|p| p.count() == 1));
  }

  #[test]
  fn losing_edge_endpoint_starts_single_record_when_enabled() {
    let mut peaks = PeakBuffer::with_shape(2, 4).unwrap();
    let a1 = peaks.push(0, Peak::new(0.0, 0.0, 0.5)).unwrap();
    peaks.push(0, Peak::new(0.0, 1.0, 0.5)).unwrap();
    peaks.push(1, Peak::new(0.0, 2.0, 0.5)).unwrap();
    let scores = PairScoreBuffer::from_raw(vec![0.9, 0.95], [1, 2, 1]).unwrap();
    let mut keep = config();
    keep.keep_unmatched_parts = true;
    let people = build_people(
      &peaks.table(),
      &Affinity::PairScores(scores.scores()),
      &ONE_LIMB,
      &keep,
    )
    .unwrap();

    assert_eq!(people.len(), 2);
    assert_eq!(people[0].count(), 2);
    assert_eq!(people[1].count(), 1);
    assert_eq!(people[1].part(0), Some(a1));
    assert_eq!(people[1].score(), 0.5);
  }

  #[test]
  fn rebuilding_is_deterministic() {
    let mut peaks = PeakBuffer::with_shape(3, 4).unwrap();
    for i in 0..3 {
      peaks.push(0, Peak::new(2.0, 2.0 + 4.0 * i as f32, 0.9)).unwrap();
      peaks.push(1, Peak::new(10.0, 2.0 + 4.0 * i as f32, 0.8)).unwrap();
      peaks.push(2, Peak::new(14.0, 2.0 + 4.0 * i as f32, 0.7)).unwrap();
    }
    let paf = horizontal_paf(16, 16, 0.6);
    let run = || {
      build_people(
        &peaks.table(),
        &Affinity::Paf(paf.map()),
        &TWO_LIMBS,
        &config(),
      )
      .unwrap()
    };
    assert_eq!(run(), run());
  }
}
