use ldbv_core::Focus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SEARCH_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Search and key list on the left, value on the right.
    Horizontal,
    /// Search, key list and value stacked.
    Vertical,
    /// Search plus whichever of list or value has focus.
    Compact,
}

#[derive(Debug, Clone, Copy)]
pub struct PaneLayout {
    pub kind: LayoutKind,
    pub search: Rect,
    pub list: Rect,
    pub value: Rect,
}

pub fn compute_pane_layout(area: Rect, focus: Focus, split_ratio: u16) -> PaneLayout {
    if area.height < 12 {
        return compact_layout(area, focus);
    }

    if area.width >= 80 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(split_ratio),
                Constraint::Percentage(100 - split_ratio),
            ])
            .split(area);
        let left = split_search(columns[0]);
        return PaneLayout {
            kind: LayoutKind::Horizontal,
            search: left[0],
            list: left[1],
            value: columns[1],
        };
    }

    let rows = split_search(area);
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(split_ratio),
            Constraint::Percentage(100 - split_ratio),
        ])
        .split(rows[1]);
    PaneLayout {
        kind: LayoutKind::Vertical,
        search: rows[0],
        list: panes[0],
        value: panes[1],
    }
}

fn split_search(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(1)])
        .split(area)
}

fn compact_layout(area: Rect, focus: Focus) -> PaneLayout {
    let rows = split_search(area);
    let zero = Rect {
        x: rows[1].x,
        y: rows[1].y,
        width: 0,
        height: 0,
    };
    let (list, value) = if focus == Focus::Value {
        (zero, rows[1])
    } else {
        (rows[1], zero)
    };
    PaneLayout {
        kind: LayoutKind::Compact,
        search: rows[0],
        list,
        value,
    }
}
