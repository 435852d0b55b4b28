//! テスト用のフェイク実装

use crate::device::CameraStream;
use crate::error::Result;
use crate::map::{MapCanvas, MapView};
use crate::platform::Platform;
use crate::theme::ThemeStore;
use crate::types::Coordinates;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// 停止状態を共有するカメラストリーム
#[derive(Clone, Debug)]
pub struct FakeStream {
    active: Rc<Cell<bool>>,
}

impl FakeStream {
    pub fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
        }
    }
}

impl CameraStream for FakeStream {
    fn stop(&self) {
        self.active.set(false);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }
}

#[derive(Default, Debug)]
struct MapLog {
    views: Vec<MapView>,
    markers_added: usize,
    moves: Vec<Coordinates>,
    destroyed: bool,
}

/// 呼び出し履歴を記録する地図
#[derive(Clone, Default, Debug)]
pub struct FakeMap {
    log: Rc<RefCell<MapLog>>,
}

impl FakeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<MapView> {
        self.log.borrow().views.clone()
    }

    pub fn markers_added(&self) -> usize {
        self.log.borrow().markers_added
    }

    pub fn moves(&self) -> Vec<Coordinates> {
        self.log.borrow().moves.clone()
    }

    pub fn destroyed(&self) -> bool {
        self.log.borrow().destroyed
    }
}

impl MapCanvas for FakeMap {
    fn set_view(&mut self, view: MapView) {
        self.log.borrow_mut().views.push(view);
    }

    fn add_marker(&mut self, _at: Coordinates) {
        self.log.borrow_mut().markers_added += 1;
    }

    fn move_marker(&mut self, at: Coordinates) {
        self.log.borrow_mut().moves.push(at);
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed = true;
    }
}

pub struct FakePlatform;

impl Platform for FakePlatform {
    type Stream = FakeStream;
    type Map = FakeMap;
    type Image = String;
}

/// メモリ上のキーバリューストア
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl ThemeStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.value(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
