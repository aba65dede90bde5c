//! Masonry frame rendered as bordered blocks on the terminal grid.

use super::tree::TerminalTree;
use crate::config::CellMetrics;
use crate::layout::MasonryFrame;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Where one item lands, in cells relative to the widget origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPlacement {
    /// Item label.
    pub label: String,
    /// 0-based column.
    pub column: usize,
    /// Left edge in cells.
    pub x: u16,
    /// Top edge in cells.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Whether images are still loading.
    pub pending_images: bool,
}

/// Paints a [`MasonryFrame`] over a [`TerminalTree`].
pub struct MasonryWidget<'a> {
    tree: &'a TerminalTree,
    frame: &'a MasonryFrame,
    cell: CellMetrics,
}

impl<'a> MasonryWidget<'a> {
    /// Widget for `frame` over `tree` at the given cell size.
    pub fn new(tree: &'a TerminalTree, frame: &'a MasonryFrame, cell: CellMetrics) -> Self {
        Self { tree, frame, cell }
    }

    /// Stack items into their ordered columns and scale px geometry to cells.
    ///
    /// Items without an order go to the first column.
    pub fn placements(&self) -> Vec<CellPlacement> {
        let columns = self.frame.layout.column_count().as_usize();
        let block = self.frame.style.effective(self.tree.active_breakpoint());
        let container_margin = block.container_margin.unwrap_or(0.0);

        let mut column_tops = vec![container_margin; columns];
        let mut placements = Vec::new();

        for (index, item) in self.tree.boxes_with(&self.frame.style).into_iter().enumerate() {
            let order = self
                .frame
                .order_of(&item.id, index + 1)
                .unwrap_or(1)
                .clamp(1, columns);
            let column = order - 1;
            let outer_width = item.width + 2.0 * item.margin;

            let x_px = container_margin + column as f64 * outer_width + item.margin;
            let y_px = column_tops[column] + item.margin;
            column_tops[column] += item.height + 2.0 * item.margin;

            placements.push(CellPlacement {
                label: item.label,
                column,
                x: to_cells(x_px, self.cell.width_px),
                y: to_cells(y_px, self.cell.height_px),
                width: to_cells(item.width, self.cell.width_px).max(1),
                height: to_cells(item.height, self.cell.height_px).max(1),
                pending_images: item.pending_images,
            });
        }
        placements
    }

    fn status_line(&self) -> Line<'static> {
        let layout = &self.frame.layout;
        let height = match layout.max_column_height() {
            Some(max) => format!("max {max}px"),
            None if self.frame.is_ssr => "static".to_string(),
            None => "unmeasured".to_string(),
        };
        Line::from(format!(
            " {} cols | {} | {} | {}px ",
            layout.column_count(),
            self.tree.active_breakpoint(),
            height,
            self.tree.viewport_width_px(),
        ))
        .style(Style::default().fg(Color::Black).bg(Color::Cyan))
    }
}

fn to_cells(px: f64, cell_px: f64) -> u16 {
    let cells = (px / cell_px).round();
    if cells.is_finite() && cells > 0.0 {
        cells.min(f64::from(u16::MAX)) as u16
    } else {
        0
    }
}

impl<'a> Widget for MasonryWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let (content, status) = if area.height > 1 {
            let content = Rect::new(area.x, area.y, area.width, area.height - 1);
            let status = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
            (content, Some(status))
        } else {
            (area, None)
        };

        for placement in self.placements() {
            let rect = Rect::new(
                content.x.saturating_add(placement.x),
                content.y.saturating_add(placement.y),
                placement.width,
                placement.height,
            )
            .intersection(content);
            if rect.is_empty() {
                continue;
            }

            let style = if placement.pending_images {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            if rect.height >= 2 && rect.width >= 2 {
                let mut title = format!(" {} ", placement.label);
                if placement.pending_images {
                    title.push_str("… ");
                }
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .style(style)
                    .render(rect, buf);
            } else {
                Paragraph::new(placement.label)
                    .style(style.add_modifier(Modifier::REVERSED))
                    .render(rect, buf);
            }
        }

        if let Some(status) = status {
            Paragraph::new(self.status_line()).render(status, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{line_breaks, static_descriptor};
    use crate::model::{Breakpoints, ColumnCount, LayoutResult};
    use crate::scene::Scene;
    use std::collections::BTreeMap;

    fn static_frame() -> MasonryFrame {
        MasonryFrame {
            layout: LayoutResult::initial(Some(ColumnCount::new(4))),
            style: static_descriptor(ColumnCount::new(4), 450.0, 0.0),
            placements: BTreeMap::new(),
            separators: line_breaks(3),
            is_ssr: true,
        }
    }

    #[test]
    fn to_cells_rounds_and_clamps() {
        assert_eq!(to_cells(16.0, 8.0), 2);
        assert_eq!(to_cells(11.0, 8.0), 1);
        assert_eq!(to_cells(-4.0, 8.0), 0);
        assert_eq!(to_cells(f64::NAN, 8.0), 0);
    }

    #[test]
    fn static_frame_spreads_items_round_robin() {
        let tree = TerminalTree::new(Scene::demo(), 320.0, Breakpoints::DEFAULT);
        let frame = static_frame();
        let widget = MasonryWidget::new(&tree, &frame, CellMetrics::DEFAULT);

        let placements = widget.placements();
        let columns: Vec<usize> = placements.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);

        // 80px columns over 8px cells
        assert_eq!(placements[1].x, 10);
        assert_eq!(placements[1].width, 10);
        // Item 5 sits below item 1 (150px = 9.375 rows)
        assert_eq!(placements[4].y, 9);
    }

    #[test]
    fn render_draws_labels_and_status() {
        let tree = TerminalTree::new(Scene::demo(), 320.0, Breakpoints::DEFAULT);
        let frame = static_frame();
        let area = Rect::new(0, 0, 40, 30);
        let mut buf = Buffer::empty(area);

        MasonryWidget::new(&tree, &frame, CellMetrics::DEFAULT).render(area, &mut buf);

        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains(" 1 "), "first item title missing:\n{text}");
        assert!(text.contains("4 cols"), "status line missing:\n{text}");
        assert!(text.contains("static"), "status line missing:\n{text}");
    }
}
