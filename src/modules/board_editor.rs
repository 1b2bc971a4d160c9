use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraggableItem {
    pub id: String,
    pub kind: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_item: Option<DraggableItem>,
    pub drag_offset: Point,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraggableItemUpdate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<Point>,
}

/// Ordered item list plus the transient state of an in-flight drag. Drops
/// are plain splices: an unknown id is inserted, a known id is moved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardEditor {
    items: Vec<DraggableItem>,
    drag: DragState,
}

impl BoardEditor {
    pub fn new(items: Vec<DraggableItem>) -> Self {
        Self {
            items,
            drag: DragState::default(),
        }
    }

    pub fn items(&self) -> &[DraggableItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<DraggableItem>) {
        self.items = items;
        self.drag = DragState::default();
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn begin_drag(&mut self, item: DraggableItem, offset: Point) {
        self.drag = DragState {
            is_dragging: true,
            dragged_item: Some(item),
            drag_offset: offset,
        };
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::default();
    }

    /// Insert a new item at the target index/position, or move an existing
    /// one by id. The drag state is cleared either way.
    pub fn drop_item(
        &mut self,
        dropped: DraggableItem,
        target_index: Option<usize>,
        target_position: Option<Point>,
    ) {
        let existing = self.items.iter().position(|item| item.id == dropped.id);
        match existing {
            None => {
                let mut item = dropped;
                if target_position.is_some() {
                    item.position = target_position;
                }
                match target_index {
                    Some(index) => {
                        let index = index.min(self.items.len());
                        self.items.insert(index, item);
                    }
                    None => self.items.push(item),
                }
            }
            Some(from) => {
                let mut item = self.items.remove(from);
                match target_index {
                    Some(index) => {
                        let index = index.min(self.items.len());
                        self.items.insert(index, item);
                    }
                    None => {
                        if target_position.is_some() {
                            item.position = target_position;
                        }
                        self.items.push(item);
                    }
                }
            }
        }
        self.end_drag();
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.items.len() {
            return;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
    }

    pub fn add_item(&mut self, item: DraggableItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    pub fn update_item(&mut self, id: &str, updates: DraggableItemUpdate) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            if let Some(content) = updates.content {
                item.content = content;
            }
            if let Some(title) = updates.title {
                item.title = Some(title);
            }
            if let Some(position) = updates.position {
                item.position = Some(position);
            }
        }
    }
}
