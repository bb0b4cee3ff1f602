//! 题目 / 题组整理服务 - 业务能力层
//!
//! Canvas 返回的题目是平铺的，题组只以 `quiz_group_id` 的形式出现。
//! 这里分两步恢复测验的显示顺序：
//!
//! 1. `resolve_groups` 按需拉取题组（每个 id 只拉取一次）
//! 2. `reconcile` 计算每道题的最终位置（纯函数，不修改原始记录）

use crate::error::AppResult;
use crate::models::{GroupRecord, QuestionRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 按 id 查询题组的能力
#[allow(async_fn_in_trait)]
pub trait GroupSource {
    /// 题组不存在或为空时返回 `Ok(None)`
    async fn fetch_group(&self, group_id: u64) -> AppResult<Option<GroupRecord>>;
}

/// 已拉取的题组，`None` 表示该 id 查不到题组
pub type GroupCache = HashMap<u64, Option<GroupRecord>>;

/// 已确定位置的题目
#[derive(Debug, Clone)]
pub struct PlacedQuestion {
    pub record: QuestionRecord,
    /// 最终显示位置
    pub position: i64,
    /// 分值（属于题组时取题组的单题分值）
    pub points: f64,
    /// 实际存在的所属题组
    pub group_id: Option<u64>,
}

/// 整理结果
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// 按位置升序
    pub questions: Vec<PlacedQuestion>,
    /// 按位置升序
    pub groups: Vec<GroupRecord>,
}

impl Reconciled {
    pub fn group(&self, group_id: u64) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

/// 拉取题目引用到的所有题组
///
/// # 参数
/// - `questions`: Canvas 返回的题目（线上顺序）
/// - `source`: 题组查询能力
///
/// # 返回
/// 返回 id → 题组 的缓存，查不到的题组记为 `None`
pub async fn resolve_groups<S: GroupSource>(
    questions: &[QuestionRecord],
    source: &S,
) -> AppResult<GroupCache> {
    let mut cache = GroupCache::new();
    for question in questions {
        let Some(group_id) = question.quiz_group_id else {
            continue;
        };
        if cache.contains_key(&group_id) {
            continue;
        }
        let group = source.fetch_group(group_id).await?;
        match &group {
            Some(g) => debug!("题组 {} 位置 {}，抽取 {} 道", g.id, g.position, g.pick_count),
            None => warn!("⚠️ 题目 {} 引用的题组 {} 不存在，按普通题目处理", question.id, group_id),
        }
        cache.insert(group_id, group);
    }
    Ok(cache)
}

/// 计算题目和题组的最终顺序
///
/// - 属于题组的题目共享题组的位置，分值取题组的单题分值
/// - 其余题目按线上顺序从 1 开始编号
/// - 每个题组占一个位置：位置不小于该题组的普通题目整体后移一位，
///   每个题组只移动一次，与成员数量无关
pub fn reconcile(questions: Vec<QuestionRecord>, groups: &GroupCache) -> Reconciled {
    let mut next_position = 1;
    let mut placed: Vec<PlacedQuestion> = questions
        .into_iter()
        .map(|record| {
            let group = record
                .quiz_group_id
                .and_then(|id| groups.get(&id))
                .and_then(Option::as_ref);
            match group {
                Some(group) => PlacedQuestion {
                    position: group.position,
                    points: group.question_points,
                    group_id: Some(group.id),
                    record,
                },
                None => {
                    let position = next_position;
                    next_position += 1;
                    PlacedQuestion {
                        position,
                        points: record.points_possible,
                        group_id: None,
                        record,
                    }
                }
            }
        })
        .collect();

    let mut resolved: Vec<GroupRecord> = groups.values().flatten().cloned().collect();
    // 按位置从小到大插入题组，前面的题组后移不会影响后面题组的判断
    resolved.sort_by_key(|g| (g.position, g.id));

    for group in &resolved {
        for question in placed
            .iter_mut()
            .filter(|q| q.group_id.is_none() && q.position >= group.position)
        {
            question.position += 1;
        }
    }

    placed.sort_by_key(|q| q.position);

    Reconciled {
        questions: placed,
        groups: resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn question(id: u64, group: Option<u64>) -> QuestionRecord {
        serde_json::from_value(json!({
            "id": id,
            "quiz_group_id": group,
            "question_type": "multiple_choice_question",
            "points_possible": 1.0
        }))
        .unwrap()
    }

    fn group(id: u64, position: i64) -> GroupRecord {
        GroupRecord {
            id,
            name: format!("Group {}", id),
            pick_count: 1,
            question_points: 2.5,
            position,
        }
    }

    struct StubGroups {
        groups: Vec<GroupRecord>,
        calls: RefCell<Vec<u64>>,
    }

    impl GroupSource for StubGroups {
        async fn fetch_group(&self, group_id: u64) -> AppResult<Option<GroupRecord>> {
            self.calls.borrow_mut().push(group_id);
            Ok(self.groups.iter().find(|g| g.id == group_id).cloned())
        }
    }

    fn positions(reconciled: &Reconciled) -> Vec<(u64, i64)> {
        reconciled
            .questions
            .iter()
            .map(|q| (q.record.id, q.position))
            .collect()
    }

    #[test]
    fn test_ungrouped_keep_wire_order() {
        let questions = vec![question(30, None), question(10, None), question(20, None)];
        let reconciled = reconcile(questions, &GroupCache::new());
        assert_eq!(positions(&reconciled), vec![(30, 1), (10, 2), (20, 3)]);
    }

    #[test]
    fn test_group_shifts_later_questions_once() {
        // 题组位于第 2 位，有 3 道成员题
        let questions = vec![
            question(1, None),
            question(2, Some(7)),
            question(3, Some(7)),
            question(4, None),
            question(5, Some(7)),
            question(6, None),
        ];
        let cache = GroupCache::from([(7, Some(group(7, 2)))]);

        let reconciled = reconcile(questions, &cache);

        assert_eq!(
            positions(&reconciled),
            vec![(1, 1), (2, 2), (3, 2), (5, 2), (4, 3), (6, 4)]
        );
        for q in reconciled.questions.iter().filter(|q| q.group_id == Some(7)) {
            assert_eq!(q.points, 2.5);
        }
    }

    #[test]
    fn test_positions_form_permutation() {
        let questions = vec![
            question(1, Some(100)),
            question(2, None),
            question(3, Some(200)),
            question(4, None),
            question(5, Some(100)),
            question(6, None),
        ];
        // 线上顺序：题组100、题目2、题组200、题目4、题目6
        let cache = GroupCache::from([
            (200, Some(group(200, 3))),
            (100, Some(group(100, 1))),
        ]);

        let reconciled = reconcile(questions, &cache);

        let mut slots: Vec<i64> = reconciled
            .questions
            .iter()
            .filter(|q| q.group_id.is_none())
            .map(|q| q.position)
            .chain(reconciled.groups.iter().map(|g| g.position))
            .collect();
        slots.sort();
        assert_eq!(slots, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            reconciled.groups.iter().map(|g| g.id).collect::<Vec<_>>(),
            vec![100, 200]
        );
    }

    #[test]
    fn test_missing_group_is_ungrouped() {
        let questions = vec![question(1, None), question(2, Some(99)), question(3, None)];
        let cache = GroupCache::from([(99, None)]);

        let reconciled = reconcile(questions, &cache);

        assert_eq!(positions(&reconciled), vec![(1, 1), (2, 2), (3, 3)]);
        assert_eq!(reconciled.questions[1].group_id, None);
        assert_eq!(reconciled.questions[1].points, 1.0);
        assert!(reconciled.groups.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_groups_fetches_each_id_once() {
        let questions = vec![
            question(1, Some(7)),
            question(2, Some(7)),
            question(3, Some(8)),
            question(4, Some(8)),
            question(5, None),
        ];
        let source = StubGroups {
            groups: vec![group(7, 1)],
            calls: RefCell::new(Vec::new()),
        };

        let cache = resolve_groups(&questions, &source).await.unwrap();

        assert_eq!(*source.calls.borrow(), vec![7, 8]);
        assert_eq!(cache.get(&7), Some(&Some(group(7, 1))));
        assert_eq!(cache.get(&8), Some(&None));
    }
}
