//! 후보 이름 → 테이블 노드 매칭
//!
//! 후보 목록은 호출자가 우선순위(가장 구체적인 것 먼저) 순으로 넘깁니다.
//! 단수/복수 변환 같은 추측은 후보를 만드는 쪽(`candidate`)의 책임입니다.

use crate::schema::TableNode;

/// 이름 매처
pub struct NameMatcher;

impl NameMatcher {
    /// 후보 순서대로 정확히 일치하는 첫 테이블 반환
    ///
    /// 대소문자를 구분하며 정규화하지 않습니다. 빈 후보는 건너뜁니다.
    pub fn resolve<'a, S: AsRef<str>>(candidates: &[S], forest: &'a [TableNode]) -> Option<&'a TableNode> {
        if forest.is_empty() {
            return None;
        }

        candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .filter(|candidate| !candidate.is_empty())
            .find_map(|candidate| forest.iter().find(|table| table.name == candidate))
    }

    /// 매칭 실패 시 첫 테이블로 대체
    pub fn resolve_or_first<'a, S: AsRef<str>>(
        candidates: &[S],
        forest: &'a [TableNode],
    ) -> Option<&'a TableNode> {
        Self::resolve(candidates, forest).or_else(|| forest.first())
    }
}
