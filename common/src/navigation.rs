//! ページ遷移先

use crate::types::AnalysisResult;

/// 遷移先のパスとクエリ（エンコードはブラウザ側で行う）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Destination {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// 解析結果をレビュー画面へ渡す
    pub fn review(path: &str, result: &AnalysisResult) -> Self {
        result
            .query_pairs()
            .into_iter()
            .fold(Self::new(path), |dest, (k, v)| dest.with_param(k, v))
    }
}
