//! Slice-and-dice treemap layout for the spending-by-category chart.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{category, MonthSummary};
use crate::models::transaction::from_cents;

pub const CHART_COLORS: [&str; 12] = [
    "#0d9488", "#dc2626", "#ea580c", "#ca8a04", "#16a34a", "#2563eb", "#7c3aed", "#c026d3",
    "#db2777", "#64748b", "#0891b2", "#65a30d",
];

/// A row or column counts as full once less than this much span is left.
const EXHAUSTED_SPAN: f64 = 0.1;

const LABEL_MIN_HEIGHT: f64 = 25.0;
const MAX_FONT_SIZE: f64 = 11.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapItem {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub name: String,
    pub value: f64,
    pub percentage: f64,
    pub color: String,
}

impl TreemapRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn shows_label(&self) -> bool {
        self.height > LABEL_MIN_HEIGHT
    }

    pub fn font_size(&self) -> f64 {
        (self.width.min(self.height) / 6.0).min(MAX_FONT_SIZE)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Slices stack left to right, each spanning the remaining height.
    Horizontal,
    /// Slices stack top to bottom, each spanning the remaining width.
    Vertical,
}

/// Lay `items` out inside a `width` x `height` rectangle, one rect per item
/// with area proportional to its value. Largest items are placed first.
pub fn layout(items: &[TreemapItem], width: f64, height: f64) -> Vec<TreemapRect> {
    if items.is_empty() || !(width > 0.0) || !(height > 0.0) {
        return Vec::new();
    }

    let mut sorted: Vec<&TreemapItem> = items.iter().filter(|item| item.value > 0.0).collect();
    let total: f64 = sorted.iter().map(|item| item.value).sum();
    if !(total > 0.0) {
        return Vec::new();
    }
    sorted.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    let mut direction = if width >= height {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let (mut x, mut y) = (0.0, 0.0);
    let (mut remaining_w, mut remaining_h) = (width, height);
    let mut rects = Vec::with_capacity(sorted.len());

    for item in sorted {
        let area = item.value / total * width * height;

        match direction {
            Direction::Horizontal => {
                let mut node_h = remaining_h;
                let mut node_w = area / node_h;
                if node_w > remaining_w {
                    node_w = remaining_w;
                    node_h = area / node_w;
                }
                rects.push(place(item, x, y, node_w, node_h, width, height));

                x += node_w;
                remaining_w -= node_w;
                if remaining_w <= EXHAUSTED_SPAN {
                    x = 0.0;
                    y += node_h;
                    remaining_h -= node_h;
                    remaining_w = width;
                    direction = if remaining_h > remaining_w {
                        Direction::Vertical
                    } else {
                        Direction::Horizontal
                    };
                }
            }
            Direction::Vertical => {
                let mut node_w = remaining_w;
                let mut node_h = area / node_w;
                if node_h > remaining_h {
                    node_h = remaining_h;
                    node_w = area / node_h;
                }
                rects.push(place(item, x, y, node_w, node_h, width, height));

                y += node_h;
                remaining_h -= node_h;
                if remaining_h <= EXHAUSTED_SPAN {
                    y = 0.0;
                    x += node_w;
                    remaining_w -= node_w;
                    remaining_h = height;
                    direction = if remaining_w >= remaining_h {
                        Direction::Horizontal
                    } else {
                        Direction::Vertical
                    };
                }
            }
        }
    }

    rects
}

/// Build the rect, clipped to the target bounds.
fn place(
    item: &TreemapItem,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    bound_w: f64,
    bound_h: f64,
) -> TreemapRect {
    let clip = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
    let (x0, x1) = (clip(x, bound_w), clip(x + w, bound_w));
    let (y0, y1) = (clip(y, bound_h), clip(y + h, bound_h));

    TreemapRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        name: item.name.clone(),
        value: item.value,
        percentage: item.percentage,
        color: item.color.clone(),
    }
}

/// Chart items for the real-spending categories of a month, colored in order.
pub fn items_from_summary(summary: &MonthSummary) -> Vec<TreemapItem> {
    summary
        .by_category
        .iter()
        .enumerate()
        .map(|(i, cat)| TreemapItem {
            name: category::get_or_other(&cat.category_id).label.to_string(),
            value: from_cents(cat.total_cents),
            percentage: cat.percentage,
            color: CHART_COLORS[i % CHART_COLORS.len()].to_string(),
        })
        .collect()
}
