//! ライト/ダークテーマの切替と保存

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// 保存値から復元（"dark" 以外はすべてライト）
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    /// アイコンのクラス（ダーク→月、ライト→太陽）
    pub fn icon_class(&self) -> &'static str {
        match self {
            Theme::Light => "fa-sun",
            Theme::Dark => "fa-moon",
        }
    }
}

/// body に付与するダークモードのクラス
pub const DARK_BODY_CLASS: &str = "theme-dark";

/// 設定の永続化先
pub trait ThemeStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

pub struct ThemeController<S: ThemeStore> {
    store: S,
    key: String,
    theme: Theme,
}

impl<S: ThemeStore> ThemeController<S> {
    /// 保存済みの設定を読み込む
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let theme = Theme::from_stored(store.load(&key).as_deref());
        Self { store, key, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// 切り替えて即座に保存する
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.store.save(&self.key, next.as_str())?;
        self.theme = next;
        Ok(next)
    }
}
