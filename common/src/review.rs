//! レビュー画面
//!
//! AIが推定したカテゴリを選択済みにし、ユーザーが編集した内容を `/submit` に送る。

use crate::api::{SubmitRequest, SubmitResponse};
use crate::error::{Error, Result};
use crate::navigation::Destination;
use crate::types::AnalysisResult;

pub const SUBMIT_REJECTED_ALERT: &str = "Failed to send email. Please try again later.";
pub const SUBMIT_ERROR_ALERT: &str = "An error occurred. Please try again later.";

/// 推定カテゴリと完全一致する選択肢の位置
pub fn preselect_category<S: AsRef<str>>(options: &[S], guessed: &str) -> Option<usize> {
    options.iter().position(|option| option.as_ref() == guessed)
}

/// 送信結果に応じた画面の動き
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Navigate(Destination),
    Alert(&'static str),
}

impl SubmitResponse {
    pub fn outcome(&self, success_path: &str) -> SubmitOutcome {
        if !self.success {
            if let Some(detail) = self.message.as_ref().or(self.error.as_ref()) {
                log::warn!("submission rejected: {}", detail);
            }
            return SubmitOutcome::Alert(SUBMIT_REJECTED_ALERT);
        }
        let destination = match &self.recipient {
            Some(recipient) => Destination::new(success_path).with_param("recipient", recipient.clone()),
            None => Destination::new(success_path),
        };
        SubmitOutcome::Navigate(destination)
    }
}

/// レビュー画面のコントローラ
#[derive(Debug, Clone)]
pub struct ReviewController {
    categories: Vec<String>,
    selected: Option<usize>,
    draft: AnalysisResult,
    submitting: bool,
}

impl ReviewController {
    /// `guessed` はサーバがページに埋め込んだ推定カテゴリ
    pub fn new(categories: Vec<String>, guessed: &str, draft: AnalysisResult) -> Self {
        let selected = preselect_category(&categories, guessed.trim());
        if selected.is_none() {
            log::debug!("suggested category {:?} is not an option", guessed);
        }
        Self {
            categories,
            selected,
            draft,
            submitting: false,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn draft(&self) -> &AnalysisResult {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn select_category(&mut self, value: &str) {
        self.selected = preselect_category(&self.categories, value);
    }

    pub fn edit_draft_en(&mut self, text: String) {
        self.draft.draft_en = text;
    }

    /// 選択中のカテゴリ（未選択なら先頭、ブラウザの select と同じ挙動）
    pub fn category(&self) -> Option<&str> {
        self.categories
            .get(self.selected.unwrap_or(0))
            .map(String::as_str)
    }

    /// 送信リクエストを組み立てて送信中にする
    pub fn begin_submit(&mut self) -> Result<SubmitRequest> {
        if self.submitting {
            return Err(Error::NotReady);
        }
        let category = self
            .category()
            .ok_or_else(|| Error::Config("no categories configured".into()))?
            .to_string();
        self.submitting = true;
        Ok(SubmitRequest {
            category,
            draft_en: self.draft.draft_en.clone(),
        })
    }

    pub fn submit_finished(&mut self, response: &SubmitResponse, success_path: &str) -> SubmitOutcome {
        let outcome = response.outcome(success_path);
        if matches!(outcome, SubmitOutcome::Alert(_)) {
            self.submitting = false;
        }
        outcome
    }

    pub fn submit_failed(&mut self, error: &Error) -> &'static str {
        log::error!("submit request failed: {}", error);
        self.submitting = false;
        SUBMIT_ERROR_ALERT
    }
}
